//! The bootstrap procedure.
//!
//! Brings a checkout to a runnable state and self-tests it:
//!
//! 1. create the virtual environment if its directory is missing
//! 2. install dependencies from the manifest with the environment's pip
//! 3. copy the configuration template if the config file is missing
//! 4. run the entry point once in test mode
//!
//! Steps run strictly in that order and block on every external command.
//! The first external command that exits non-zero stops the run. Nothing
//! that already exists is recreated or overwritten, so running the
//! procedure twice in a row is safe.
//!
//! There is no shell activation: commands after step 1 call the
//! environment's own interpreter with `VIRTUAL_ENV` and `PATH` set the way
//! an activation script would set them.

use std::path::PathBuf;

use crate::core::{BootstrapReport, ProjectLayout, Step, StepOutcome, StepRecord};
use crate::ops::errors::BootstrapError;
use crate::ops::runner::CommandRunner;
use crate::util::config::{Config, DEFAULT_SELF_TEST_MODE};
use crate::util::fs::copy_if_absent;
use crate::util::process::{find_python, ProcessBuilder};
use crate::util::shell::{Shell, Status};

/// Options for a bootstrap run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapOptions {
    /// Base interpreter used to create the environment. Looked up on PATH
    /// when unset, and only when the environment has to be created.
    pub python: Option<PathBuf>,

    /// Extra arguments for `pip install -r <manifest>`
    pub install_args: Vec<String>,

    /// Value of the entry point's `--mode` flag
    pub self_test_mode: String,

    /// Extra arguments for the entry point
    pub self_test_args: Vec<String>,

    /// Skip the dependency installation step
    pub skip_install: bool,

    /// Skip the self-test step
    pub skip_self_test: bool,

    /// Report what would happen without touching disk or spawning anything
    pub dry_run: bool,
}

impl Default for BootstrapOptions {
    fn default() -> Self {
        BootstrapOptions {
            python: None,
            install_args: Vec::new(),
            self_test_mode: DEFAULT_SELF_TEST_MODE.to_string(),
            self_test_args: Vec::new(),
            skip_install: false,
            skip_self_test: false,
            dry_run: false,
        }
    }
}

impl BootstrapOptions {
    /// Options seeded from configuration.
    pub fn from_config(config: &Config) -> Self {
        BootstrapOptions {
            python: config.python.interpreter.clone(),
            install_args: config.install.extra_args().to_vec(),
            self_test_mode: config.self_test.mode().to_string(),
            self_test_args: config.self_test.extra_args().to_vec(),
            ..Default::default()
        }
    }
}

/// Run the bootstrap procedure.
pub fn bootstrap(
    layout: &ProjectLayout,
    opts: &BootstrapOptions,
    runner: &mut dyn CommandRunner,
    shell: &Shell,
) -> Result<BootstrapReport, BootstrapError> {
    let mut report = BootstrapReport::new();

    let record = ensure_environment(layout, opts, runner, shell)?;
    emit(shell, &record);
    report.push(record);

    let record = install_dependencies(layout, opts, runner, shell)?;
    emit(shell, &record);
    report.push(record);

    let record = ensure_configuration(layout, opts)?;
    emit(shell, &record);
    report.push(record);

    let (record, code) = self_test(layout, opts, runner, shell)?;
    emit(shell, &record);
    report.push(record);
    report.self_test_code = code;

    Ok(report)
}

/// Create the virtual environment unless its directory already exists.
fn ensure_environment(
    layout: &ProjectLayout,
    opts: &BootstrapOptions,
    runner: &mut dyn CommandRunner,
    shell: &Shell,
) -> Result<StepRecord, BootstrapError> {
    let step = Step::EnsureEnvironment;
    let venv_dir = layout.venv_dir();
    let shown = layout.display(&venv_dir);

    if venv_dir.is_dir() {
        tracing::info!("virtual environment present at {}", venv_dir.display());
        return Ok(StepRecord::new(step, StepOutcome::AlreadyPresent, shown));
    }

    let python = match opts.python.clone().or_else(find_python) {
        Some(p) => p,
        None if opts.dry_run => PathBuf::from("python"),
        None => return Err(BootstrapError::NoPython),
    };

    let cmd = ProcessBuilder::new(&python)
        .args(["-m", "venv"])
        .arg(&venv_dir)
        .cwd(layout.root())
        .stdout_to_stderr(shell.is_json());

    if opts.dry_run {
        return Ok(StepRecord::new(step, StepOutcome::Planned, cmd.display_command()));
    }

    shell.status(Status::Creating, format!("virtual environment `{}`", shown));
    run_checked(step, &cmd, runner, shell)?;

    if !venv_dir.is_dir() {
        return Err(BootstrapError::EnvironmentMissing { path: venv_dir });
    }

    Ok(StepRecord::new(step, StepOutcome::Created, shown))
}

/// Install dependencies with the environment's pip. Runs every time.
fn install_dependencies(
    layout: &ProjectLayout,
    opts: &BootstrapOptions,
    runner: &mut dyn CommandRunner,
    shell: &Shell,
) -> Result<StepRecord, BootstrapError> {
    let step = Step::InstallDependencies;

    if opts.skip_install {
        return Ok(StepRecord::new(step, StepOutcome::Skipped, "--skip-install"));
    }

    let manifest = layout.manifest();
    if !manifest.is_file() {
        return Err(BootstrapError::MissingManifest { path: manifest });
    }

    let cmd = activated(
        step,
        ProcessBuilder::new(layout.venv_python())
            .args(["-m", "pip", "install", "-r"])
            .arg(&manifest)
            .args(&opts.install_args),
        layout,
        shell,
    )?;

    if opts.dry_run {
        return Ok(StepRecord::new(step, StepOutcome::Planned, cmd.display_command()));
    }

    shell.status(
        Status::Installing,
        format!("dependencies from `{}`", layout.display(&manifest)),
    );
    run_checked(step, &cmd, runner, shell)?;

    Ok(StepRecord::new(step, StepOutcome::Ran, cmd.display_command()))
}

/// Copy the template to the config file unless the config file exists.
fn ensure_configuration(
    layout: &ProjectLayout,
    opts: &BootstrapOptions,
) -> Result<StepRecord, BootstrapError> {
    let step = Step::EnsureConfiguration;
    let config = layout.config_file();
    let template = layout.config_template();
    let shown = layout.display(&config);

    if config.exists() {
        tracing::info!("configuration file present at {}", config.display());
        return Ok(StepRecord::new(step, StepOutcome::AlreadyPresent, shown));
    }

    if !template.is_file() {
        return Err(BootstrapError::MissingTemplate { path: template });
    }

    if opts.dry_run {
        return Ok(StepRecord::new(
            step,
            StepOutcome::Planned,
            format!("{} -> {}", layout.display(&template), shown),
        ));
    }

    let copied = copy_if_absent(&template, &config).map_err(|source| {
        BootstrapError::CopyFailed {
            path: config.clone(),
            source,
        }
    })?;

    let outcome = if copied {
        tracing::info!("copied {} to {}", template.display(), config.display());
        StepOutcome::Created
    } else {
        StepOutcome::AlreadyPresent
    };

    Ok(StepRecord::new(step, outcome, shown))
}

/// Run the entry point once in test mode.
fn self_test(
    layout: &ProjectLayout,
    opts: &BootstrapOptions,
    runner: &mut dyn CommandRunner,
    shell: &Shell,
) -> Result<(StepRecord, Option<i32>), BootstrapError> {
    let step = Step::SelfTest;

    if opts.skip_self_test {
        return Ok((
            StepRecord::new(step, StepOutcome::Skipped, "--skip-self-test"),
            None,
        ));
    }

    let entry_point = layout.entry_point();
    if !entry_point.is_file() {
        shell.warn(format!(
            "entry point `{}` does not exist",
            layout.display(&entry_point)
        ));
    }

    let cmd = activated(
        step,
        ProcessBuilder::new(layout.venv_python())
            .arg(&entry_point)
            .args(["--mode", opts.self_test_mode.as_str()])
            .args(&opts.self_test_args),
        layout,
        shell,
    )?;

    if opts.dry_run {
        return Ok((
            StepRecord::new(step, StepOutcome::Planned, cmd.display_command()),
            None,
        ));
    }

    shell.status(
        Status::Testing,
        format!("`{}` --mode {}", layout.display(&entry_point), opts.self_test_mode),
    );
    shell.verbose_status(Status::Running, cmd.display_command());

    let status = runner.run(&cmd).map_err(|source| BootstrapError::Spawn {
        step,
        command: cmd.display_command(),
        source,
    })?;

    if !status.is_success() {
        return Err(BootstrapError::SelfTestFailed { code: status.code });
    }

    Ok((
        StepRecord::new(step, StepOutcome::Ran, cmd.display_command()),
        status.code,
    ))
}

/// Run a command and turn a non-zero exit into a step failure.
fn run_checked(
    step: Step,
    cmd: &ProcessBuilder,
    runner: &mut dyn CommandRunner,
    shell: &Shell,
) -> Result<(), BootstrapError> {
    shell.verbose_status(Status::Running, cmd.display_command());

    let status = runner.run(cmd).map_err(|source| BootstrapError::Spawn {
        step,
        command: cmd.display_command(),
        source,
    })?;

    if !status.is_success() {
        return Err(BootstrapError::StepFailed {
            step,
            command: cmd.display_command(),
            code: status.code,
        });
    }
    Ok(())
}

/// Give a command the environment an activation script would set up.
///
/// In JSON mode the child's stdout goes to stderr so stdout carries only
/// JSON events.
fn activated(
    step: Step,
    cmd: ProcessBuilder,
    layout: &ProjectLayout,
    shell: &Shell,
) -> Result<ProcessBuilder, BootstrapError> {
    let bin_dir = layout.venv_bin_dir();

    let mut entries = vec![bin_dir.clone()];
    if let Some(path) = std::env::var_os("PATH") {
        entries.extend(std::env::split_paths(&path));
    }
    let path = std::env::join_paths(entries).map_err(|source| {
        BootstrapError::ActivationFailed {
            step,
            path: bin_dir,
            source,
        }
    })?;

    Ok(cmd
        .env("VIRTUAL_ENV", layout.venv_dir())
        .env("PATH", path)
        .env_remove("PYTHONHOME")
        .cwd(layout.root())
        .stdout_to_stderr(shell.is_json()))
}

fn emit(shell: &Shell, record: &StepRecord) {
    shell.step_event(record);

    match record.outcome {
        StepOutcome::Created => match record.step {
            Step::EnsureConfiguration => shell.status(
                Status::Copied,
                format!("configuration template to `{}`", record.detail),
            ),
            _ => shell.status(Status::Created, format!("`{}`", record.detail)),
        },
        StepOutcome::AlreadyPresent => {
            shell.status(Status::Fresh, format!("`{}` already exists", record.detail))
        }
        StepOutcome::Ran => match record.step {
            Step::SelfTest => shell.status(Status::Passed, "self-test"),
            _ => shell.status(Status::Finished, record.step.as_str()),
        },
        StepOutcome::Skipped => {
            shell.status(Status::Skipped, format!("{} ({})", record.step, record.detail))
        }
        StepOutcome::Planned => shell.status(Status::Planned, &record.detail),
    }
}
