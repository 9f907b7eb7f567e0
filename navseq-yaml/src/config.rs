use navseq_core::{ContentDescriptor, SequenceConfig};
use serde::{Deserialize, Serialize};

/// A sequence described declaratively: controller behaviour plus the
/// content shown for each step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceDocument {
    #[serde(default)]
    pub sequence: SequenceConfig,
    #[serde(default)]
    pub steps: Vec<StepContentConfig>,
}

/// Content for the step whose identity has `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepContentConfig {
    pub id: usize,
    #[serde(flatten)]
    pub content: ContentDescriptor,
}

impl SequenceDocument {
    pub fn step(&self, id: usize) -> Option<&StepContentConfig> {
        self.steps.iter().find(|step| step.id == id)
    }
}
