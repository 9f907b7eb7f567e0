//! # navseq Core
//!
//! The step-sequence state machine: validators, content rendering, the
//! sequence controller and its builder.

#![cfg_attr(docsrs, feature(doc_cfg))]

mod config;
mod content;
mod controller;
mod sequence_builder;
mod validator;


pub use config::{NavigationLabels, ReentrancyPolicy, SequenceConfig};
pub use content::{ContentDescriptor, ContentRenderer, FnRenderer};
pub use controller::SequenceController;
pub use sequence_builder::{FinishedHook, SequenceBuilder, SequenceError};
pub use validator::{FnValidator, StepValidator, ValidationFuture, ValidatorRegistry};

/// Prelude module for core functionality
pub mod prelude {
    pub use crate::{
        ContentDescriptor, ContentRenderer, FnRenderer, FnValidator, NavigationLabels,
        ReentrancyPolicy, SequenceBuilder, SequenceConfig, SequenceController, SequenceError,
        StepValidator, ValidationFuture,
    };
    pub use navseq_context::{SequenceSnapshot, StepIdentity, StepRecord, StepSnapshot, StepState};
}
