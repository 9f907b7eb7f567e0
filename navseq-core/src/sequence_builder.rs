use crate::{
    ContentRenderer, SequenceConfig, SequenceController, StepValidator, ValidatorRegistry,
};
use navseq_context::{check_enumeration, StepIdentity};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

/// Hook run by [`SequenceController::finished_sequence`] with the final step.
pub type FinishedHook<I> = Box<dyn Fn(I) + Send + Sync>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SequenceError {
    #[error("step enumeration is empty")]
    EmptySequence,
    #[error("invalid step enumeration: {0}")]
    InvalidEnumeration(String),
}

/// Builder for a [`SequenceController`] with a fluent API.
pub struct SequenceBuilder<I: StepIdentity> {
    validators: ValidatorRegistry<I>,
    renderer: Option<Box<dyn ContentRenderer<I>>>,
    config: SequenceConfig,
    on_finished: Option<FinishedHook<I>>,
}

impl<I: StepIdentity> Default for SequenceBuilder<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: StepIdentity> SequenceBuilder<I> {
    pub fn new() -> Self {
        Self {
            validators: ValidatorRegistry::new(),
            renderer: None,
            config: SequenceConfig::default(),
            on_finished: None,
        }
    }

    /// Registers the validator for `step`
    pub fn validator<V>(self, step: I, validator: V) -> Self
    where
        V: StepValidator + 'static,
    {
        self.shared_validator(step, Arc::new(validator))
    }

    /// Registers a validator the host keeps a handle to
    pub fn shared_validator(mut self, step: I, validator: Arc<dyn StepValidator>) -> Self {
        if self.validators.register(step, validator).is_some() {
            warn!(step = step.name(), "replacing previously registered validator");
        }
        self
    }

    pub fn renderer<R>(mut self, renderer: R) -> Self
    where
        R: ContentRenderer<I> + 'static,
    {
        self.renderer = Some(Box::new(renderer));
        self
    }

    pub fn config(mut self, config: SequenceConfig) -> Self {
        self.config = config;
        self
    }

    /// Runs when the sequence reaches logical completion on its final step
    pub fn on_finished<F>(mut self, hook: F) -> Self
    where
        F: Fn(I) + Send + Sync + 'static,
    {
        self.on_finished = Some(Box::new(hook));
        self
    }

    /// Builds the controller, one record per identity in enumeration order
    pub fn build(self) -> Result<SequenceController<I>, SequenceError> {
        if I::all().is_empty() {
            return Err(SequenceError::EmptySequence);
        }
        check_enumeration::<I>().map_err(SequenceError::InvalidEnumeration)?;

        let missing = self.validators.missing();
        if !missing.is_empty() {
            debug!(
                missing = ?missing,
                "steps without a validator will never be submittable"
            );
        }

        Ok(SequenceController::from_parts(
            self.validators,
            self.renderer,
            self.config,
            self.on_finished,
        ))
    }
}
