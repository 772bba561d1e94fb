//! External command execution seam.
//!
//! Every step that delegates to an outside tool goes through a
//! [`CommandRunner`], so the procedure can be exercised without spawning
//! real interpreters.

use anyhow::Result;

use crate::util::ProcessBuilder;

/// Exit state of a finished external command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunStatus {
    /// Exit code, `None` when the child was terminated by a signal.
    pub code: Option<i32>,
}

impl RunStatus {
    pub fn from_code(code: i32) -> Self {
        RunStatus { code: Some(code) }
    }

    pub fn success() -> Self {
        Self::from_code(0)
    }

    pub fn is_success(&self) -> bool {
        self.code == Some(0)
    }
}

impl From<std::process::ExitStatus> for RunStatus {
    fn from(status: std::process::ExitStatus) -> Self {
        RunStatus {
            code: status.code(),
        }
    }
}

/// Runs external commands to completion.
///
/// Runs are blocking and sequential. There is no timeout and no retry.
pub trait CommandRunner {
    /// Run `cmd`, streaming its output to the caller, and wait for it.
    ///
    /// Returns an error only when the command could not be started.
    fn run(&mut self, cmd: &ProcessBuilder) -> Result<RunStatus>;
}

/// Runner that spawns real processes with inherited stdio.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&mut self, cmd: &ProcessBuilder) -> Result<RunStatus> {
        tracing::debug!("running `{}`", cmd.display_command());
        let status = cmd.status()?;
        tracing::debug!("`{}` exited with {:?}", cmd.display_command(), status.code());
        Ok(status.into())
    }
}
