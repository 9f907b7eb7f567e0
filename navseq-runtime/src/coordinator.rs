use crate::host::{NoopHost, PresentationHost};
use navseq_context::StepIdentity;
use navseq_core::{ContentDescriptor, SequenceController};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// A step pushed onto the navigation stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresentedStep<I> {
    pub index: usize,
    pub step: I,
    pub content: ContentDescriptor,
}

/// What a continue action ended in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContinueOutcome {
    /// Moved forward to the given index.
    Advanced(usize),
    /// The final step validated; the sequence is submitting.
    Finished,
    /// Validation failed; the flow stays on the current step.
    Blocked { message: String },
    /// The continue action was disabled and nothing was attempted.
    Disabled,
}

/// The dismissible alert shown while the current step holds an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub title: String,
    pub message: String,
    pub dismiss_label: String,
}

/// Everything a presentation layer needs to draw the current step's
/// navigation affordances.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresentationState {
    pub index: usize,
    pub total: usize,
    pub is_final: bool,
    /// Show a progress indicator instead of the continue label.
    pub is_loading: bool,
    pub can_continue: bool,
    pub continue_label: String,
    pub alert: Option<Alert>,
}

/// Drives forward-only traversal of a sequence.
///
/// Presented steps live on an explicit stack keyed by index; advancing
/// pushes the next step, nothing is ever popped.
pub struct FlowCoordinator<I: StepIdentity> {
    controller: Arc<SequenceController<I>>,
    stack: Arc<Mutex<Vec<PresentedStep<I>>>>,
    host: Arc<dyn PresentationHost<I>>,
}

impl<I: StepIdentity> Clone for FlowCoordinator<I> {
    fn clone(&self) -> Self {
        Self {
            controller: Arc::clone(&self.controller),
            stack: Arc::clone(&self.stack),
            host: Arc::clone(&self.host),
        }
    }
}

impl<I: StepIdentity> FlowCoordinator<I> {
    /// Creates a coordinator positioned on the first step.
    pub fn new(controller: Arc<SequenceController<I>>) -> Self {
        let root = Self::render(&controller, 0);
        Self {
            controller,
            stack: Arc::new(Mutex::new(root.into_iter().collect())),
            host: Arc::new(NoopHost),
        }
    }

    pub fn with_host<H>(self, host: H) -> Self
    where
        H: PresentationHost<I> + 'static,
    {
        self.with_shared_host(Arc::new(host))
    }

    pub fn with_shared_host(mut self, host: Arc<dyn PresentationHost<I>>) -> Self {
        self.host = host;
        self
    }

    /// Presents the current step to the host.
    pub fn start(&self) {
        let current = self.stack.lock().last().cloned();
        if let Some(entry) = current {
            info!(
                trace_id = %self.controller.trace_id(),
                index = entry.index,
                step = entry.step.name(),
                "presenting step"
            );
            self.host.present_step(entry.index, entry.step, &entry.content);
        }
    }

    pub fn controller(&self) -> &Arc<SequenceController<I>> {
        &self.controller
    }

    pub fn current_index(&self) -> usize {
        self.stack.lock().last().map(|entry| entry.index).unwrap_or(0)
    }

    pub fn current_step(&self) -> Option<I> {
        self.stack.lock().last().map(|entry| entry.step)
    }

    pub fn current_content(&self) -> ContentDescriptor {
        self.stack
            .lock()
            .last()
            .map(|entry| entry.content.clone())
            .unwrap_or_default()
    }

    /// Indices presented so far, root first.
    pub fn presented_indices(&self) -> Vec<usize> {
        self.stack.lock().iter().map(|entry| entry.index).collect()
    }

    pub fn depth(&self) -> usize {
        self.stack.lock().len()
    }

    pub fn is_final_step(&self) -> bool {
        self.controller.is_final_step(self.current_index())
    }

    /// Whether the continue action is enabled for the current step.
    pub fn can_continue(&self) -> bool {
        let idx = self.current_index();
        self.controller.can_submit(idx) && !self.controller.is_step_loading(idx)
    }

    pub fn alert(&self) -> Option<Alert> {
        let message = self.controller.get_error_message(self.current_index());
        if message.is_empty() {
            return None;
        }
        let labels = &self.controller.config().labels;
        Some(Alert {
            title: labels.error_title.clone(),
            message,
            dismiss_label: labels.dismiss_label.clone(),
        })
    }

    /// Clears the current step's error, closing its alert.
    pub fn dismiss_alert(&self) {
        self.controller.clear_error_message(self.current_index());
    }

    pub fn presentation(&self) -> PresentationState {
        let index = self.current_index();
        PresentationState {
            index,
            total: self.controller.len(),
            is_final: self.controller.is_final_step(index),
            is_loading: self.controller.is_step_loading(index),
            can_continue: self.can_continue(),
            continue_label: self.controller.config().labels.continue_label.clone(),
            alert: self.alert(),
        }
    }

    /// The continue action: validates the current step, then advances,
    /// finishes, or stays put with the step's error surfaced.
    pub async fn continue_flow(&self) -> ContinueOutcome {
        let idx = self.current_index();
        let trace_id = self.controller.trace_id();

        if !self.can_continue() {
            debug!(trace_id = %trace_id, index = idx, "continue is disabled");
            return ContinueOutcome::Disabled;
        }

        if !self.controller.validate_step(idx).await {
            let message = self.controller.get_error_message(idx);
            warn!(trace_id = %trace_id, index = idx, error = %message, "cannot continue");
            if !message.is_empty() {
                self.host.present_error(idx, &message);
            }
            return ContinueOutcome::Blocked { message };
        }

        if self.controller.is_final_step(idx) {
            self.controller.finished_sequence();
            self.host.sequence_finished(idx);
            return ContinueOutcome::Finished;
        }

        let Some(next) = Self::render(&self.controller, idx + 1) else {
            return ContinueOutcome::Blocked {
                message: String::new(),
            };
        };

        {
            let mut stack = self.stack.lock();
            if stack.last().map(|entry| entry.index) != Some(idx) {
                debug!(trace_id = %trace_id, index = idx, "stack moved during validation");
                return ContinueOutcome::Advanced(stack.last().map_or(idx, |entry| entry.index));
            }
            stack.push(next.clone());
        }

        info!(
            trace_id = %trace_id,
            index = next.index,
            step = next.step.name(),
            "advanced to step"
        );
        self.host.present_step(next.index, next.step, &next.content);
        ContinueOutcome::Advanced(next.index)
    }

    /// Callback-style continue action for hosts that cannot await.
    pub fn on_continue(&self) -> JoinHandle<ContinueOutcome> {
        let coordinator = self.clone();
        tokio::spawn(async move { coordinator.continue_flow().await })
    }

    fn render(controller: &SequenceController<I>, index: usize) -> Option<PresentedStep<I>> {
        let step = controller.identity_at(index)?;
        Some(PresentedStep {
            index,
            step,
            content: controller.get_content_descriptor(index),
        })
    }
}
