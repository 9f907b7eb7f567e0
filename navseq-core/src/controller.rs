use crate::sequence_builder::FinishedHook;
use crate::{
    ContentDescriptor, ContentRenderer, ReentrancyPolicy, SequenceConfig, StepValidator,
    ValidatorRegistry,
};
use navseq_context::{SequenceSnapshot, StepIdentity, StepRecord, StepState};
use parking_lot::RwLock;
use std::future::Future;
use std::sync::Arc;
use tokio::runtime::Handle;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Source of truth for a linear sequence of steps.
///
/// Owns one [`StepRecord`] per identity of `I`, in enumeration order, and
/// runs the validate-then-advance protocol against the registered
/// validators. Indices are the only addressing scheme; every operation
/// taking an index answers with a neutral default when it is out of range.
///
/// The record lock is never held across an `.await`, a validator call, a
/// renderer call or a host callback.
pub struct SequenceController<I: StepIdentity> {
    trace_id: String,
    steps: RwLock<Vec<StepRecord<I>>>,
    validators: ValidatorRegistry<I>,
    renderer: Option<Box<dyn ContentRenderer<I>>>,
    config: SequenceConfig,
    on_finished: Option<FinishedHook<I>>,
}

impl<I: StepIdentity> std::fmt::Debug for SequenceController<I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SequenceController")
            .field("trace_id", &self.trace_id)
            .field("steps", &*self.steps.read())
            .field("validators", &self.validators.len())
            .field("config", &self.config)
            .finish()
    }
}

impl<I: StepIdentity> SequenceController<I> {
    pub(crate) fn from_parts(
        validators: ValidatorRegistry<I>,
        renderer: Option<Box<dyn ContentRenderer<I>>>,
        config: SequenceConfig,
        on_finished: Option<FinishedHook<I>>,
    ) -> Self {
        let steps = StepRecord::all();
        let trace_id = Uuid::new_v4().to_string();
        info!(trace_id = %trace_id, steps = steps.len(), "sequence created");

        Self {
            trace_id,
            steps: RwLock::new(steps),
            validators,
            renderer,
            config,
            on_finished,
        }
    }

    pub fn trace_id(&self) -> &str {
        &self.trace_id
    }

    pub fn config(&self) -> &SequenceConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.steps.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.read().is_empty()
    }

    pub fn final_step_index(&self) -> usize {
        self.len().saturating_sub(1)
    }

    pub fn is_valid_index(&self, idx: usize) -> bool {
        idx < self.len()
    }

    pub fn is_final_step(&self, idx: usize) -> bool {
        let len = self.len();
        len > 0 && idx == len - 1
    }

    pub fn identity_at(&self, idx: usize) -> Option<I> {
        self.steps.read().get(idx).map(StepRecord::identity)
    }

    pub fn step_state(&self, idx: usize) -> Option<StepState> {
        self.steps.read().get(idx).map(StepRecord::state)
    }

    /// Whether the validator bound to step `idx` reports it ready to submit.
    pub fn can_submit(&self, idx: usize) -> bool {
        self.identity_at(idx)
            .and_then(|step| self.validators.resolve(step))
            .map(|validator| validator.can_submit())
            .unwrap_or(false)
    }

    pub fn get_error_message(&self, idx: usize) -> String {
        self.steps
            .read()
            .get(idx)
            .map(|record| record.error_message().to_string())
            .unwrap_or_default()
    }

    pub fn set_error_message(&self, message: impl Into<String>, idx: usize) {
        if let Some(record) = self.steps.write().get_mut(idx) {
            record.set_error_message(message);
        }
    }

    pub fn clear_error_message(&self, idx: usize) {
        self.set_error_message(String::new(), idx);
    }

    pub fn is_step_loading(&self, idx: usize) -> bool {
        self.steps
            .read()
            .get(idx)
            .map(StepRecord::is_loading)
            .unwrap_or(false)
    }

    pub fn set_loading_status(&self, is_loading: bool, idx: usize) {
        if let Some(record) = self.steps.write().get_mut(idx) {
            record.set_loading(is_loading);
        }
    }

    /// Validates step `idx` and reports through `on_result` whether the
    /// flow may move past it.
    ///
    /// The loading flag is set before this returns. The validation itself
    /// runs on the ambient tokio runtime; `on_result` is called once it
    /// completes, after the loading flag has been cleared. Out-of-range
    /// indices, steps without a validator and rejected re-entrant calls
    /// call `on_result(false)` before returning, as does a call made
    /// outside a tokio runtime, which leaves the step untouched.
    pub fn can_proceed_to_next_step<F>(self: &Arc<Self>, idx: usize, on_result: F)
    where
        F: FnOnce(bool) + Send + 'static,
    {
        let Ok(runtime) = Handle::try_current() else {
            warn!(trace_id = %self.trace_id, index = idx, "no tokio runtime, cannot validate step");
            on_result(false);
            return;
        };

        let Some((step, validator)) = self.admit(idx) else {
            on_result(false);
            return;
        };

        let controller = Arc::clone(self);
        runtime.spawn(async move {
            let error = validator.validate_fields().await;
            let passed = controller.complete_validation(idx, step, error);
            on_result(passed);
        });
    }

    /// Awaitable form of [`Self::can_proceed_to_next_step`].
    ///
    /// Admission and the loading flag are handled when this is called, not
    /// when the returned future is first polled.
    pub fn validate_step(&self, idx: usize) -> impl Future<Output = bool> + Send + '_ {
        let admitted = self.admit(idx);
        async move {
            let Some((step, validator)) = admitted else {
                return false;
            };
            let error = validator.validate_fields().await;
            self.complete_validation(idx, step, error)
        }
    }

    /// Marks the final step as submitting and hands control to the host's
    /// completion hook. No step transition happens.
    pub fn finished_sequence(&self) {
        let final_step = {
            let mut steps = self.steps.write();
            let Some(record) = steps.last_mut() else {
                return;
            };
            record.mark_submitting();
            record.identity()
        };

        info!(trace_id = %self.trace_id, step = final_step.name(), "sequence finished");

        if let Some(hook) = &self.on_finished {
            hook(final_step);
        }
    }

    pub fn get_content_descriptor(&self, idx: usize) -> ContentDescriptor {
        match (self.identity_at(idx), &self.renderer) {
            (Some(step), Some(renderer)) => renderer.render(step, self),
            _ => ContentDescriptor::empty(),
        }
    }

    pub fn snapshot(&self) -> SequenceSnapshot {
        let steps = self.steps.read();
        SequenceSnapshot {
            trace_id: self.trace_id.clone(),
            steps: steps
                .iter()
                .enumerate()
                .map(|(index, record)| record.snapshot(index))
                .collect(),
        }
    }

    /// Synchronous half of a validation request: range check, re-entrancy
    /// check, loading flag, validator lookup.
    fn admit(&self, idx: usize) -> Option<(I, Arc<dyn StepValidator>)> {
        let mut steps = self.steps.write();
        let Some(record) = steps.get_mut(idx) else {
            debug!(trace_id = %self.trace_id, index = idx, "validation requested for out-of-range index");
            return None;
        };

        let step = record.identity();
        if record.is_loading() && self.config.reentrancy == ReentrancyPolicy::Reject {
            warn!(
                trace_id = %self.trace_id,
                index = idx,
                step = step.name(),
                "validation already in flight, rejecting request"
            );
            return None;
        }

        record.begin_validation();

        match self.validators.resolve(step) {
            Some(validator) => {
                info!(trace_id = %self.trace_id, index = idx, step = step.name(), "validating step");
                Some((step, validator))
            }
            None => {
                record.set_loading(false);
                debug!(trace_id = %self.trace_id, index = idx, step = step.name(), "no validator registered");
                None
            }
        }
    }

    fn complete_validation(&self, idx: usize, step: I, error: Option<String>) -> bool {
        let passed = {
            let mut steps = self.steps.write();
            match steps.get_mut(idx) {
                Some(record) => {
                    if let Some(message) = &error {
                        warn!(
                            trace_id = %self.trace_id,
                            index = idx,
                            step = step.name(),
                            error = %message,
                            "step validation failed"
                        );
                    }
                    record.finish_validation(error, self.config.clear_error_on_success)
                }
                None => false,
            }
        };

        if passed {
            info!(trace_id = %self.trace_id, index = idx, step = step.name(), "step validated");
        }
        passed
    }
}
