//! # navseq Context
//!
//! Step identities and the per-step ephemeral state owned by a sequence
//! controller.

use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A finite, ordered set of step kinds.
///
/// The order of [`StepIdentity::all`] is the order of the sequence. It is
/// fixed for the lifetime of the program; controllers read it once, at
/// construction.
pub trait StepIdentity: Copy + Eq + Hash + fmt::Debug + Send + Sync + 'static {
    /// Every step kind, in sequence order.
    fn all() -> &'static [Self];

    /// Stable integer id, equal to the position in [`StepIdentity::all`].
    fn id(&self) -> usize {
        Self::all()
            .iter()
            .position(|step| step == self)
            .unwrap_or(usize::MAX)
    }

    /// Human readable name used in logs and snapshots.
    fn name(&self) -> &'static str;
}

/// Checks that the ids of `I` are unique and contiguous from 0, and that
/// every id matches its position in the enumeration.
pub fn check_enumeration<I: StepIdentity>() -> Result<(), String> {
    let mut seen = HashSet::new();
    for (position, step) in I::all().iter().enumerate() {
        let id = step.id();
        if !seen.insert(id) {
            return Err(format!("duplicate step id {id} ({})", step.name()));
        }
        if id != position {
            return Err(format!(
                "step '{}' has id {id} but sits at position {position}",
                step.name()
            ));
        }
    }
    Ok(())
}

/// Where a single step is in its validate-then-advance cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StepState {
    /// Nothing in flight, no recorded failure.
    #[default]
    Idle,
    /// Field validation is in flight.
    Validating,
    /// The last validation failed; the error message holds the reason.
    Failed,
    /// The last validation passed.
    ReadyToAdvance,
    /// The sequence finished on this step and the host is submitting.
    Submitting,
}

impl StepState {
    pub fn is_loading(&self) -> bool {
        matches!(self, StepState::Validating | StepState::Submitting)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StepState::Idle => "idle",
            StepState::Validating => "validating",
            StepState::Failed => "failed",
            StepState::ReadyToAdvance => "ready_to_advance",
            StepState::Submitting => "submitting",
        }
    }
}

impl fmt::Display for StepState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mutable state of one step in a sequence.
///
/// Two records are equal when their identities share an id, whatever
/// their transient error or loading state.
#[derive(Debug, Clone)]
pub struct StepRecord<I: StepIdentity> {
    identity: I,
    error_message: String,
    state: StepState,
    /// State to fall back to when loading is cleared by hand.
    resume: StepState,
}

impl<I: StepIdentity> StepRecord<I> {
    pub fn new(identity: I) -> Self {
        Self {
            identity,
            error_message: String::new(),
            state: StepState::Idle,
            resume: StepState::Idle,
        }
    }

    /// One record per identity, in enumeration order.
    pub fn all() -> Vec<Self> {
        I::all().iter().copied().map(Self::new).collect()
    }

    pub fn identity(&self) -> I {
        self.identity
    }

    pub fn id(&self) -> usize {
        self.identity.id()
    }

    pub fn error_message(&self) -> &str {
        &self.error_message
    }

    pub fn state(&self) -> StepState {
        self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    pub fn set_error_message(&mut self, message: impl Into<String>) {
        self.error_message = message.into();
        if self.is_loading() {
            return;
        }
        self.state = if !self.error_message.is_empty() {
            StepState::Failed
        } else if self.state == StepState::Failed {
            StepState::Idle
        } else {
            self.state
        };
    }

    pub fn clear_error_message(&mut self) {
        self.set_error_message(String::new());
    }

    /// Raises or clears the loading flag without a validation outcome.
    ///
    /// Clearing it returns the step to where it was before loading began,
    /// so a passed step stays passed even while it holds an old message.
    pub fn set_loading(&mut self, loading: bool) {
        match (loading, self.is_loading()) {
            (true, false) => self.enter(StepState::Validating),
            (false, true) => self.state = self.settled(),
            _ => {}
        }
    }

    pub fn begin_validation(&mut self) {
        tracing::trace!(step = self.identity.name(), from = %self.state, "begin validation");
        self.enter(StepState::Validating);
    }

    /// Applies a validator's outcome and reports whether the step may advance.
    ///
    /// A failure stores the description verbatim. A success keeps any
    /// previous message unless `clear_on_success` is set.
    pub fn finish_validation(&mut self, error: Option<String>, clear_on_success: bool) -> bool {
        match error {
            Some(message) => {
                self.error_message = message;
                self.state = StepState::Failed;
                false
            }
            None => {
                if clear_on_success {
                    self.error_message.clear();
                }
                self.state = StepState::ReadyToAdvance;
                true
            }
        }
    }

    pub fn mark_submitting(&mut self) {
        self.enter(StepState::Submitting);
    }

    fn enter(&mut self, loading: StepState) {
        if !self.is_loading() {
            self.resume = self.state;
        }
        self.state = loading;
    }

    fn settled(&self) -> StepState {
        match (self.resume, self.error_message.is_empty()) {
            (StepState::ReadyToAdvance, _) => StepState::ReadyToAdvance,
            (_, true) => StepState::Idle,
            (_, false) => StepState::Failed,
        }
    }

    pub fn snapshot(&self, index: usize) -> StepSnapshot {
        StepSnapshot {
            index,
            id: self.id(),
            name: self.identity.name(),
            state: self.state,
            error_message: self.error_message.clone(),
        }
    }
}

impl<I: StepIdentity> PartialEq for StepRecord<I> {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl<I: StepIdentity> Eq for StepRecord<I> {}

impl<I: StepIdentity> Hash for StepRecord<I> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id().hash(state);
    }
}

/// Plain copy of one step's state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepSnapshot {
    pub index: usize,
    pub id: usize,
    pub name: &'static str,
    pub state: StepState,
    pub error_message: String,
}

impl StepSnapshot {
    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }
}

/// Plain copy of a whole sequence, taken under a single read lock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceSnapshot {
    pub trace_id: String,
    pub steps: Vec<StepSnapshot>,
}

impl SequenceSnapshot {
    pub fn count(&self, state: StepState) -> usize {
        self.steps.iter().filter(|step| step.state == state).count()
    }

    pub fn failed_steps(&self) -> impl Iterator<Item = &StepSnapshot> {
        self.steps
            .iter()
            .filter(|step| !step.error_message.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Page {
        First,
        Second,
        Third,
    }

    impl StepIdentity for Page {
        fn all() -> &'static [Self] {
            &[Page::First, Page::Second, Page::Third]
        }

        fn name(&self) -> &'static str {
            match self {
                Page::First => "first",
                Page::Second => "second",
                Page::Third => "third",
            }
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Shuffled {
        A,
        B,
    }

    impl StepIdentity for Shuffled {
        fn all() -> &'static [Self] {
            &[Shuffled::A, Shuffled::B]
        }

        fn id(&self) -> usize {
            match self {
                Shuffled::A => 1,
                Shuffled::B => 0,
            }
        }

        fn name(&self) -> &'static str {
            "shuffled"
        }
    }

    #[test]
    fn test_default_ids_follow_enumeration_order() {
        assert_eq!(Page::First.id(), 0);
        assert_eq!(Page::Third.id(), 2);
        assert!(check_enumeration::<Page>().is_ok());
    }

    #[test]
    fn test_out_of_order_ids_are_rejected() {
        let err = check_enumeration::<Shuffled>().unwrap_err();
        assert!(err.contains("position"));
    }

    #[test]
    fn test_record_equality_ignores_transient_state() {
        let mut busy = StepRecord::new(Page::Second);
        busy.set_loading(true);
        busy.set_error_message("boom");

        assert_eq!(busy, StepRecord::new(Page::Second));
        assert_ne!(busy, StepRecord::new(Page::First));

        let set: HashSet<_> = [busy, StepRecord::new(Page::Second)].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_validation_cycle() {
        let mut record = StepRecord::new(Page::First);
        assert_eq!(record.state(), StepState::Idle);

        record.begin_validation();
        assert!(record.is_loading());

        assert!(!record.finish_validation(Some("Invalid input".into()), false));
        assert_eq!(record.state(), StepState::Failed);
        assert_eq!(record.error_message(), "Invalid input");

        record.begin_validation();
        assert!(record.finish_validation(None, false));
        assert_eq!(record.state(), StepState::ReadyToAdvance);
        assert_eq!(record.error_message(), "Invalid input");

        record.begin_validation();
        assert!(record.finish_validation(None, true));
        assert_eq!(record.error_message(), "");
    }

    #[test]
    fn test_raw_setters_keep_state_consistent() {
        let mut record = StepRecord::new(Page::First);

        record.set_error_message("bad");
        assert_eq!(record.state(), StepState::Failed);
        record.clear_error_message();
        assert_eq!(record.state(), StepState::Idle);

        record.set_loading(true);
        assert_eq!(record.state(), StepState::Validating);
        record.set_error_message("late");
        assert!(record.is_loading());
        record.set_loading(false);
        assert_eq!(record.state(), StepState::Failed);

        record.mark_submitting();
        assert!(record.is_loading());
    }

    #[test]
    fn test_clearing_loading_keeps_a_passed_step_passed() {
        let mut record = StepRecord::new(Page::Second);
        record.begin_validation();
        record.finish_validation(Some("Invalid input".into()), false);
        record.begin_validation();
        record.finish_validation(None, false);
        assert_eq!(record.state(), StepState::ReadyToAdvance);

        record.set_loading(true);
        record.set_loading(false);
        assert_eq!(record.state(), StepState::ReadyToAdvance);
        assert_eq!(record.error_message(), "Invalid input");

        record.mark_submitting();
        record.set_loading(false);
        assert_eq!(record.state(), StepState::ReadyToAdvance);
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Repeated {
        A,
        B,
    }

    impl StepIdentity for Repeated {
        fn all() -> &'static [Self] {
            &[Repeated::A, Repeated::B]
        }

        fn id(&self) -> usize {
            0
        }

        fn name(&self) -> &'static str {
            match self {
                Repeated::A => "a",
                Repeated::B => "b",
            }
        }
    }

    #[test]
    fn test_repeated_ids_are_rejected() {
        let err = check_enumeration::<Repeated>().unwrap_err();
        assert!(err.contains("duplicate"));
        assert!(err.contains("b"));
    }

    #[test]
    fn test_snapshot_counts() {
        let mut records = StepRecord::<Page>::all();
        records[1].set_error_message("nope");
        let snapshot = SequenceSnapshot {
            trace_id: "t".into(),
            steps: records
                .iter()
                .enumerate()
                .map(|(index, record)| record.snapshot(index))
                .collect(),
        };

        assert_eq!(snapshot.count(StepState::Idle), 2);
        assert_eq!(snapshot.count(StepState::Failed), 1);
        assert_eq!(snapshot.failed_steps().next().map(|s| s.name), Some("second"));
    }
}
