use crate::SequenceController;
use navseq_context::StepIdentity;
use serde::{Deserialize, Serialize};

/// Host-renderable description of a step's content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentDescriptor {
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer: Option<String>,
    /// Icon or symbol name, interpreted by the host.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
}

impl ContentDescriptor {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            footer: None,
            symbol: None,
        }
    }

    /// Placeholder for invalid indices and unmatched identities.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_empty()
            && self.body.is_empty()
            && self.footer.is_none()
            && self.symbol.is_none()
    }

    pub fn with_footer(mut self, footer: impl Into<String>) -> Self {
        self.footer = Some(footer.into());
        self
    }

    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = Some(symbol.into());
        self
    }
}

/// Maps a step identity to displayable content.
pub trait ContentRenderer<I: StepIdentity>: Send + Sync {
    fn render(&self, step: I, controller: &SequenceController<I>) -> ContentDescriptor;
}

/// Renderer backed by a closure.
pub struct FnRenderer<I: StepIdentity> {
    render: Box<dyn Fn(I, &SequenceController<I>) -> ContentDescriptor + Send + Sync>,
}

impl<I: StepIdentity> FnRenderer<I> {
    pub fn new<F>(render: F) -> Self
    where
        F: Fn(I, &SequenceController<I>) -> ContentDescriptor + Send + Sync + 'static,
    {
        Self {
            render: Box::new(render),
        }
    }
}

impl<I: StepIdentity> ContentRenderer<I> for FnRenderer<I> {
    fn render(&self, step: I, controller: &SequenceController<I>) -> ContentDescriptor {
        (self.render)(step, controller)
    }
}
