//! High-level operations.
//!
//! This module contains the implementation of the CLI commands.

pub mod bootstrap;
pub mod doctor;
pub mod errors;
pub mod hints;
pub mod runner;

pub use bootstrap::{bootstrap, BootstrapOptions};
pub use doctor::{doctor, format_report, DoctorOptions, DoctorReport};
pub use errors::BootstrapError;
pub use hints::usage_hints;
pub use runner::{CommandRunner, RunStatus, SystemRunner};
