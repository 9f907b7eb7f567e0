//! # navseq - Linear Step Sequences
//!
//! navseq manages an ordered sequence of steps, each backed by a validator
//! that reports readiness and validates its fields asynchronously, and
//! exposes a uniform navigation contract (can-submit, advance, error,
//! loading) for a presentation layer to drive.
//!
//! ## Features
//!
//! - `runtime` (default): [`runtime::FlowCoordinator`] and presentation hosts
//! - `yaml` (default): sequence documents loaded from YAML/JSON
//! - `logger` (default): tracing initialisation and sequence summaries
//!
//! ## Quick Start
//!
//! ```rust
//! use navseq::prelude::*;
//! use navseq::sample::setup_device_sequence;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let setup = setup_device_sequence()?;
//!     let coordinator = FlowCoordinator::new(setup.controller.clone());
//!
//!     while coordinator.continue_flow().await != ContinueOutcome::Finished {}
//!
//!     assert!(setup.controller.is_step_loading(2));
//!     Ok(())
//! }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod sample;

pub use navseq_context as context;
pub use navseq_core::*;

#[cfg(feature = "runtime")]
#[cfg_attr(docsrs, doc(cfg(feature = "runtime")))]
pub use navseq_runtime as runtime;

#[cfg(feature = "yaml")]
#[cfg_attr(docsrs, doc(cfg(feature = "yaml")))]
pub use navseq_yaml as yaml;

#[cfg(feature = "logger")]
#[cfg_attr(docsrs, doc(cfg(feature = "logger")))]
pub use navseq_logger as logger;

/// Prelude module for easy imports
pub mod prelude {
    pub use navseq_core::prelude::*;

    #[cfg(feature = "runtime")]
    #[cfg_attr(docsrs, doc(cfg(feature = "runtime")))]
    pub use navseq_runtime::{
        Alert, ChannelHost, ContinueOutcome, FlowCoordinator, NavigationEvent, NoopHost,
        PresentationHost, PresentationState,
    };

    #[cfg(feature = "yaml")]
    #[cfg_attr(docsrs, doc(cfg(feature = "yaml")))]
    pub use navseq_yaml::prelude::*;

    #[cfg(feature = "logger")]
    #[cfg_attr(docsrs, doc(cfg(feature = "logger")))]
    pub use navseq_logger::Logger;
}
