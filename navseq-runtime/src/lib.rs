//! # navseq Runtime
//!
//! Forward navigation over a [`navseq_core::SequenceController`]: the
//! continue action, the navigation stack and the presentation host seam.

mod coordinator;
mod host;


pub use coordinator::{
    Alert, ContinueOutcome, FlowCoordinator, PresentationState, PresentedStep,
};
pub use host::{ChannelHost, NavigationEvent, NoopHost, PresentationHost};
