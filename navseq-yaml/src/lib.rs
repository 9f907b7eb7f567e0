//! # navseq YAML
//!
//! Sequence documents (controller configuration and per-step content)
//! loaded from YAML or JSON.

mod config;
mod content;
mod loader;

pub use config::*;
pub use content::*;
pub use loader::*;

/// Prelude module for YAML functionality
pub mod prelude {
    pub use crate::{ConfiguredContent, SequenceDocument, SequenceLoader, StepContentConfig};
}
