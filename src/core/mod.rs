//! Core data structures.
//!
//! - Project layout (the fixed paths the bootstrap works on)
//! - Steps and their outcomes

pub mod layout;
pub mod step;

pub use layout::ProjectLayout;
pub use step::{BootstrapReport, Step, StepOutcome, StepRecord};
