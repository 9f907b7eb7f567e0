use futures::future::{BoxFuture, FutureExt};
use navseq_context::StepIdentity;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

/// Resolves to `None` when the fields are valid, or to a human readable
/// description of what is wrong.
pub type ValidationFuture = BoxFuture<'static, Option<String>>;

/// Readiness and field validation for one step kind.
///
/// Implementations are owned by the host, usually behind an `Arc` so the
/// host can keep editing the fields the validator reads.
pub trait StepValidator: Send + Sync {
    /// Whether the step's inputs are complete enough to submit. Read on
    /// every query, never cached by the controller.
    fn can_submit(&self) -> bool;

    /// Validates the step's fields. The future may resolve immediately or
    /// after an arbitrary delay; the controller waits for it indefinitely.
    fn validate_fields(&self) -> ValidationFuture;
}

/// A validator assembled from two closures.
pub struct FnValidator {
    can_submit: Box<dyn Fn() -> bool + Send + Sync>,
    validate: Box<dyn Fn() -> ValidationFuture + Send + Sync>,
}

impl FnValidator {
    pub fn new<S, V, Fut>(can_submit: S, validate: V) -> Self
    where
        S: Fn() -> bool + Send + Sync + 'static,
        V: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Option<String>> + Send + 'static,
    {
        Self {
            can_submit: Box::new(can_submit),
            validate: Box::new(move || validate().boxed()),
        }
    }

    /// Always submittable, always valid.
    pub fn accept() -> Self {
        Self::new(|| true, || async { None })
    }

    /// Always submittable, always fails with `message`.
    pub fn reject(message: impl Into<String>) -> Self {
        let message = message.into();
        Self::new(
            || true,
            move || {
                let message = message.clone();
                async move { Some(message) }
            },
        )
    }
}

impl StepValidator for FnValidator {
    fn can_submit(&self) -> bool {
        (self.can_submit)()
    }

    fn validate_fields(&self) -> ValidationFuture {
        (self.validate)()
    }
}

/// Identity to validator mapping, fixed once the controller is built.
pub struct ValidatorRegistry<I: StepIdentity> {
    validators: HashMap<I, Arc<dyn StepValidator>>,
}

impl<I: StepIdentity> Default for ValidatorRegistry<I> {
    fn default() -> Self {
        Self {
            validators: HashMap::new(),
        }
    }
}

impl<I: StepIdentity> ValidatorRegistry<I> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `validator` for `step`, returning the one it replaced.
    pub fn register(
        &mut self,
        step: I,
        validator: Arc<dyn StepValidator>,
    ) -> Option<Arc<dyn StepValidator>> {
        self.validators.insert(step, validator)
    }

    pub fn resolve(&self, step: I) -> Option<Arc<dyn StepValidator>> {
        self.validators.get(&step).cloned()
    }

    pub fn contains(&self, step: I) -> bool {
        self.validators.contains_key(&step)
    }

    /// Identities of `I` with no registered validator, in sequence order.
    pub fn missing(&self) -> Vec<I> {
        I::all()
            .iter()
            .copied()
            .filter(|step| !self.contains(*step))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }
}
