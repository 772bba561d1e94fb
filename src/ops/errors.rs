//! Bootstrap error types and diagnostics.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

use crate::core::Step;

/// Error that stops the bootstrap procedure.
#[derive(Debug, Error, Diagnostic)]
pub enum BootstrapError {
    #[error("no Python interpreter found")]
    #[diagnostic(
        code(darknext::bootstrap::no_python),
        help("Install Python 3.10+ or point DARKNEXT_PYTHON / --python at an interpreter")
    )]
    NoPython,

    #[error("failed to spawn `{command}` for step {step}")]
    #[diagnostic(code(darknext::bootstrap::spawn))]
    Spawn {
        step: Step,
        command: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("step {step} failed: `{command}` exited with {}", describe_code(.code))]
    #[diagnostic(
        code(darknext::bootstrap::step_failed),
        help("Run with --verbose to see the commands being executed")
    )]
    StepFailed {
        step: Step,
        command: String,
        code: Option<i32>,
    },

    #[error("self-test failed: entry point exited with {}", describe_code(.code))]
    #[diagnostic(
        code(darknext::bootstrap::self_test_failed),
        help("Check the entry point output above; edit the configuration file and rerun")
    )]
    SelfTestFailed { code: Option<i32> },

    #[error("virtual environment was not created at {}", .path.display())]
    #[diagnostic(code(darknext::bootstrap::environment_missing))]
    EnvironmentMissing { path: PathBuf },

    #[error("cannot put {} on PATH for step {step}", .path.display())]
    #[diagnostic(
        code(darknext::bootstrap::activation_failed),
        help("Move the project or the virtual environment to a directory whose path has no path-list separator")
    )]
    ActivationFailed {
        step: Step,
        path: PathBuf,
        #[source]
        source: std::env::JoinPathsError,
    },

    #[error("dependency manifest not found: {}", .path.display())]
    #[diagnostic(code(darknext::bootstrap::missing_manifest))]
    MissingManifest { path: PathBuf },

    #[error("configuration template not found: {}", .path.display())]
    #[diagnostic(
        code(darknext::bootstrap::missing_template),
        help("Restore the template from version control or create the configuration file by hand")
    )]
    MissingTemplate { path: PathBuf },

    #[error("failed to create configuration file {}", .path.display())]
    #[diagnostic(code(darknext::bootstrap::copy_failed))]
    CopyFailed {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },
}

impl BootstrapError {
    /// Process exit code the CLI should use for this error.
    ///
    /// A failing external step hands its own exit code through; anything
    /// else (or a signal-terminated child) maps to 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            BootstrapError::StepFailed { code: Some(c), .. }
            | BootstrapError::SelfTestFailed { code: Some(c) }
                if *c != 0 =>
            {
                *c
            }
            _ => 1,
        }
    }

    /// The step the error belongs to, if any.
    pub fn step(&self) -> Option<Step> {
        match self {
            BootstrapError::NoPython | BootstrapError::EnvironmentMissing { .. } => {
                Some(Step::EnsureEnvironment)
            }
            BootstrapError::Spawn { step, .. }
            | BootstrapError::StepFailed { step, .. }
            | BootstrapError::ActivationFailed { step, .. } => Some(*step),
            BootstrapError::SelfTestFailed { .. } => Some(Step::SelfTest),
            BootstrapError::MissingManifest { .. } => Some(Step::InstallDependencies),
            BootstrapError::MissingTemplate { .. } | BootstrapError::CopyFailed { .. } => {
                Some(Step::EnsureConfiguration)
            }
        }
    }
}

fn describe_code(code: &Option<i32>) -> String {
    match code {
        Some(c) => format!("exit code {}", c),
        None => "no exit code (terminated by signal)".to_string(),
    }
}
