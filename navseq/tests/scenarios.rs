use futures::FutureExt;
use navseq::prelude::*;
use navseq::sample::{setup_device_sequence, SetupDevicePage};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{oneshot, Notify};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Form {
    Account,
    Profile,
    Confirm,
}

impl StepIdentity for Form {
    fn all() -> &'static [Self] {
        &[Form::Account, Form::Profile, Form::Confirm]
    }

    fn name(&self) -> &'static str {
        match self {
            Form::Account => "account",
            Form::Profile => "profile",
            Form::Confirm => "confirm",
        }
    }
}

/// Answers with `outcome` once released.
struct Gate {
    release: Arc<Notify>,
    outcome: Option<String>,
}

impl Gate {
    fn new(outcome: Option<&str>) -> (Self, Arc<Notify>) {
        let release = Arc::new(Notify::new());
        let gate = Self {
            release: Arc::clone(&release),
            outcome: outcome.map(str::to_string),
        };
        (gate, release)
    }
}

impl StepValidator for Gate {
    fn can_submit(&self) -> bool {
        true
    }

    fn validate_fields(&self) -> ValidationFuture {
        let release = Arc::clone(&self.release);
        let outcome = self.outcome.clone();
        async move {
            release.notified().await;
            outcome
        }
        .boxed()
    }
}

/// Fails its first `failures` calls with "Invalid input", then passes.
struct FailsThenPasses {
    calls: AtomicUsize,
    failures: usize,
}

impl StepValidator for FailsThenPasses {
    fn can_submit(&self) -> bool {
        true
    }

    fn validate_fields(&self) -> ValidationFuture {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        let outcome = (call < self.failures).then(|| "Invalid input".to_string());
        async move { outcome }.boxed()
    }
}

fn form_with(step: Form, validator: impl StepValidator + 'static) -> Arc<SequenceController<Form>> {
    let mut builder = SequenceBuilder::new();
    for other in Form::all() {
        if *other != step {
            builder = builder.validator(*other, FnValidator::accept());
        }
    }
    Arc::new(builder.validator(step, validator).build().unwrap())
}

#[tokio::test]
async fn test_success_sets_loading_until_validation_completes() {
    let (gate, release) = Gate::new(None);
    let controller = form_with(Form::Account, gate);
    let (tx, rx) = oneshot::channel();

    controller.can_proceed_to_next_step(0, move |passed| {
        let _ = tx.send(passed);
    });

    assert!(controller.is_step_loading(0));
    release.notify_one();

    assert!(rx.await.unwrap());
    assert!(!controller.is_step_loading(0));
    assert_eq!(controller.step_state(0), Some(StepState::ReadyToAdvance));
}

#[tokio::test]
async fn test_failure_stores_description_and_clears_loading() {
    let controller = form_with(Form::Profile, FnValidator::reject("Invalid input"));
    let (tx, rx) = oneshot::channel();

    controller.can_proceed_to_next_step(1, move |passed| {
        let _ = tx.send(passed);
    });

    assert!(!rx.await.unwrap());
    assert_eq!(controller.get_error_message(1), "Invalid input");
    assert!(!controller.is_step_loading(1));
}

#[tokio::test]
async fn test_out_of_range_index_answers_false_immediately() {
    let controller = form_with(Form::Account, FnValidator::accept());
    let before = controller.snapshot();
    let (tx, mut rx) = oneshot::channel();

    controller.can_proceed_to_next_step(5, move |passed| {
        let _ = tx.send(passed);
    });

    assert_eq!(rx.try_recv(), Ok(false));
    assert_eq!(controller.snapshot(), before);
}

#[tokio::test]
async fn test_final_step_completion_keeps_loading_and_index() {
    let setup = setup_device_sequence().unwrap();
    let (host, mut events) = ChannelHost::new();
    let coordinator = FlowCoordinator::new(setup.controller.clone()).with_host(host);

    assert_eq!(coordinator.continue_flow().await, ContinueOutcome::Advanced(1));
    assert_eq!(coordinator.continue_flow().await, ContinueOutcome::Advanced(2));
    assert_eq!(coordinator.current_step(), Some(SetupDevicePage::AutomaticUpdates));

    assert_eq!(coordinator.continue_flow().await, ContinueOutcome::Finished);
    assert_eq!(coordinator.current_index(), 2);
    assert!(setup.controller.is_step_loading(2));
    assert_eq!(setup.controller.step_state(2), Some(StepState::Submitting));
    assert!(!coordinator.can_continue());

    let mut last = None;
    while let Ok(event) = events.try_recv() {
        last = Some(event);
    }
    assert_eq!(last, Some(NavigationEvent::Finished { index: 2 }));
}

#[tokio::test]
async fn test_stale_error_survives_later_success_documents_existing_behavior() {
    let controller = form_with(
        Form::Profile,
        FailsThenPasses {
            calls: AtomicUsize::new(0),
            failures: 1,
        },
    );

    assert!(!controller.validate_step(1).await);
    assert_eq!(controller.get_error_message(1), "Invalid input");

    assert!(controller.validate_step(1).await);
    assert_eq!(controller.get_error_message(1), "Invalid input");
    assert!(!controller.is_step_loading(1));
}

#[tokio::test]
async fn test_coordinator_retries_after_failure_and_dismissal() {
    let controller = form_with(
        Form::Account,
        FailsThenPasses {
            calls: AtomicUsize::new(0),
            failures: 1,
        },
    );
    let coordinator = FlowCoordinator::new(controller);

    assert_eq!(
        coordinator.continue_flow().await,
        ContinueOutcome::Blocked {
            message: "Invalid input".to_string()
        }
    );
    let alert = coordinator.alert().unwrap();
    assert_eq!(alert.title, "Unable to Continue");

    coordinator.dismiss_alert();
    assert!(coordinator.alert().is_none());

    assert_eq!(coordinator.continue_flow().await, ContinueOutcome::Advanced(1));
    assert_eq!(coordinator.presented_indices(), vec![0, 1]);
}
