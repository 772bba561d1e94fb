//! darknext-setup - bootstrap tool for the DARKNEXT monitor
//!
//! This crate provides the library behind the `darknext-setup` binary:
//! the project layout, the sequential bootstrap procedure (virtual
//! environment, dependencies, configuration file, self-test), and a
//! read-only doctor.

pub mod core;
pub mod ops;
pub mod util;

/// Test utilities and mocks for unit tests.
///
/// Only available when compiling tests. Provides a recording command
/// runner and a minimal project fixture.
#[cfg(test)]
pub mod test_support;

pub use crate::core::{BootstrapReport, ProjectLayout, Step, StepOutcome};
pub use ops::{bootstrap, BootstrapError, BootstrapOptions};
pub use util::context::GlobalContext;
