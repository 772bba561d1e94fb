//! Test utilities and mocks for unit tests.
//!
//! Provides a recording [`CommandRunner`] that never spawns real
//! processes, and fixtures for a minimal project checkout.
//!
//! # Example
//!
//! ```rust,ignore
//! let mut runner = RecordingRunner::new().simulate_venv();
//! runner.fail_when_contains("pip install", 1);
//!
//! let layout = project_fixture(tmp.path());
//! let err = bootstrap(&layout, &opts, &mut runner, &Shell::quiet()).unwrap_err();
//! assert_eq!(runner.calls().len(), 2);
//! ```

use std::fs;
use std::path::Path;

use anyhow::Result;

use crate::core::layout::{venv_bin_name, venv_python_name, ProjectLayout};
use crate::ops::runner::{CommandRunner, RunStatus};
use crate::util::ProcessBuilder;

/// Template contents written by [`project_fixture`].
pub const FIXTURE_TEMPLATE: &str = "\
TOR_PROXY_HOST=127.0.0.1
TOR_PROXY_PORT=9050
TELEGRAM_BOT_TOKEN=
TELEGRAM_CHAT_ID=
";

/// Create a minimal checkout under `root`: manifest, template and entry point.
pub fn project_fixture(root: &Path) -> ProjectLayout {
    let layout = ProjectLayout::new(root);
    fs::write(layout.manifest(), "requests\nbeautifulsoup4\n").unwrap();
    fs::write(layout.config_template(), FIXTURE_TEMPLATE).unwrap();
    fs::create_dir_all(layout.entry_point().parent().unwrap()).unwrap();
    fs::write(layout.entry_point(), "print('ok')\n").unwrap();
    layout
}

/// Mock runner that records every command instead of running it.
#[derive(Default)]
pub struct RecordingRunner {
    commands: Vec<ProcessBuilder>,
    calls: Vec<String>,
    failures: Vec<(String, i32)>,
    simulate_venv: bool,
    observer: Option<Box<dyn FnMut(&ProcessBuilder)>>,
}

impl RecordingRunner {
    /// Create a runner where every command succeeds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `-m venv <dir>` create the directory and its interpreter file.
    pub fn simulate_venv(mut self) -> Self {
        self.simulate_venv = true;
        self
    }

    /// Return `code` for any command whose display string contains `needle`.
    pub fn fail_when_contains(&mut self, needle: &str, code: i32) -> &mut Self {
        self.failures.push((needle.to_string(), code));
        self
    }

    /// Call `f` with each command before it is recorded.
    pub fn observe(&mut self, f: impl FnMut(&ProcessBuilder) + 'static) -> &mut Self {
        self.observer = Some(Box::new(f));
        self
    }

    /// Display strings of all commands run so far.
    pub fn calls(&self) -> &[String] {
        &self.calls
    }

    /// All commands run so far.
    pub fn commands(&self) -> &[ProcessBuilder] {
        &self.commands
    }

    /// Clear all recorded calls.
    pub fn clear_calls(&mut self) {
        self.calls.clear();
        self.commands.clear();
    }

    fn create_venv(&self, cmd: &ProcessBuilder) {
        let args = cmd.get_args();
        if args.len() == 3 && args[0] == "-m" && args[1] == "venv" {
            let bin = Path::new(&args[2]).join(venv_bin_name());
            fs::create_dir_all(&bin).unwrap();
            fs::write(bin.join(venv_python_name()), "").unwrap();
        }
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&mut self, cmd: &ProcessBuilder) -> Result<RunStatus> {
        if let Some(observer) = self.observer.as_mut() {
            observer(cmd);
        }

        let display = cmd.display_command();
        self.calls.push(display.clone());
        self.commands.push(cmd.clone());

        if let Some((_, code)) = self.failures.iter().find(|(n, _)| display.contains(n)) {
            return Ok(RunStatus::from_code(*code));
        }

        if self.simulate_venv {
            self.create_venv(cmd);
        }

        Ok(RunStatus::success())
    }
}
