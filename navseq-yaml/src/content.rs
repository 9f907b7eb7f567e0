use crate::config::SequenceDocument;
use navseq_context::StepIdentity;
use navseq_core::{ContentDescriptor, ContentRenderer, SequenceController};
use std::collections::HashMap;

/// Renders the content configured in a [`SequenceDocument`], keyed by
/// step id. Steps without configured content render empty.
#[derive(Debug, Clone, Default)]
pub struct ConfiguredContent {
    by_id: HashMap<usize, ContentDescriptor>,
}

impl ConfiguredContent {
    pub fn from_document(document: &SequenceDocument) -> Self {
        Self {
            by_id: document
                .steps
                .iter()
                .map(|step| (step.id, step.content.clone()))
                .collect(),
        }
    }

    pub fn get(&self, id: usize) -> Option<&ContentDescriptor> {
        self.by_id.get(&id)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

impl<I: StepIdentity> ContentRenderer<I> for ConfiguredContent {
    fn render(&self, step: I, _controller: &SequenceController<I>) -> ContentDescriptor {
        self.get(step.id()).cloned().unwrap_or_default()
    }
}
