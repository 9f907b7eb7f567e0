use navseq_context::StepIdentity;
use navseq_core::ContentDescriptor;
use tokio::sync::mpsc;

/// The presentation side of a coordinator: whatever pushes screens and
/// shows alerts. Every method defaults to doing nothing.
pub trait PresentationHost<I: StepIdentity>: Send + Sync {
    /// A step became the current one and should be shown.
    fn present_step(&self, _index: usize, _step: I, _content: &ContentDescriptor) {}

    /// Validation of the current step failed. Replaces any error shown before.
    fn present_error(&self, _index: usize, _message: &str) {}

    /// The final step validated and the sequence is submitting.
    fn sequence_finished(&self, _index: usize) {}
}

/// Host that ignores every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHost;

impl<I: StepIdentity> PresentationHost<I> for NoopHost {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationEvent<I> {
    Presented {
        index: usize,
        step: I,
        content: ContentDescriptor,
    },
    Error {
        index: usize,
        message: String,
    },
    Finished {
        index: usize,
    },
}

/// Host that forwards every notification over an unbounded channel.
#[derive(Debug, Clone)]
pub struct ChannelHost<I> {
    tx: mpsc::UnboundedSender<NavigationEvent<I>>,
}

impl<I: StepIdentity> ChannelHost<I> {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<NavigationEvent<I>>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    fn send(&self, event: NavigationEvent<I>) {
        if self.tx.send(event).is_err() {
            tracing::debug!("navigation event dropped, receiver closed");
        }
    }
}

impl<I: StepIdentity> PresentationHost<I> for ChannelHost<I> {
    fn present_step(&self, index: usize, step: I, content: &ContentDescriptor) {
        self.send(NavigationEvent::Presented {
            index,
            step,
            content: content.clone(),
        });
    }

    fn present_error(&self, index: usize, message: &str) {
        self.send(NavigationEvent::Error {
            index,
            message: message.to_string(),
        });
    }

    fn sequence_finished(&self, index: usize) {
        self.send(NavigationEvent::Finished { index });
    }
}
