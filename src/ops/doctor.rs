//! Read-only health checks for a checkout.
//!
//! `darknext-setup doctor` reports what the bootstrap would find without
//! creating, copying or spawning anything beyond `python --version`.
//!
//! ## Checks Performed
//!
//! - Base Python interpreter (required only while the environment is missing)
//! - Dependency manifest (required)
//! - Configuration template (required)
//! - Entry point (optional, the bootstrap only warns when it is missing)
//! - Virtual environment (optional, created by the bootstrap)
//! - Configuration file (optional, copied by the bootstrap)

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::core::ProjectLayout;
use crate::util::fs::files_identical;
use crate::util::process::{find_python, ProcessBuilder};

/// Result of a single health check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    /// Name of the check
    pub name: String,

    /// Whether the check passed
    pub passed: bool,

    /// Human-readable status message
    pub message: String,

    /// Path to the file or tool (if applicable)
    pub path: Option<PathBuf>,

    /// Version string (if applicable)
    pub version: Option<String>,

    /// How long the check took
    pub duration: Duration,

    /// Whether this check is required or optional
    pub required: bool,
}

impl CheckResult {
    /// Create a passing check result.
    pub fn pass(name: impl Into<String>, message: impl Into<String>) -> Self {
        CheckResult {
            name: name.into(),
            passed: true,
            message: message.into(),
            path: None,
            version: None,
            duration: Duration::ZERO,
            required: true,
        }
    }

    /// Create a failing check result.
    pub fn fail(name: impl Into<String>, message: impl Into<String>) -> Self {
        CheckResult {
            passed: false,
            ..Self::pass(name, message)
        }
    }

    /// Mark this check as optional.
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Set the path.
    pub fn with_path(mut self, path: PathBuf) -> Self {
        self.path = Some(path);
        self
    }

    /// Set the version.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Set the duration.
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }
}

/// Summary of all health checks.
#[derive(Debug, Clone, Default)]
pub struct DoctorReport {
    /// Individual check results
    pub checks: Vec<CheckResult>,

    /// Total time taken
    pub total_duration: Duration,

    /// Environment information
    pub environment: BTreeMap<String, String>,
}

impl DoctorReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, check: CheckResult) {
        self.checks.push(check);
    }

    /// Check if all required checks passed.
    pub fn all_required_passed(&self) -> bool {
        self.checks.iter().filter(|c| c.required).all(|c| c.passed)
    }

    pub fn passed_count(&self) -> usize {
        self.checks.iter().filter(|c| c.passed).count()
    }

    pub fn failed_count(&self) -> usize {
        self.checks.iter().filter(|c| !c.passed).count()
    }

    pub fn required_failed_count(&self) -> usize {
        self.checks
            .iter()
            .filter(|c| c.required && !c.passed)
            .count()
    }

    /// Find a check by name.
    pub fn check(&self, name: &str) -> Option<&CheckResult> {
        self.checks.iter().find(|c| c.name == name)
    }
}

/// Options for the doctor command.
#[derive(Debug, Clone, Default)]
pub struct DoctorOptions {
    /// Interpreter to check instead of looking one up on PATH
    pub python: Option<PathBuf>,
}

/// Run all checks against a project layout.
pub fn doctor(layout: &ProjectLayout, options: &DoctorOptions) -> DoctorReport {
    let start = Instant::now();
    let mut report = DoctorReport::new();

    report
        .environment
        .insert("os".to_string(), std::env::consts::OS.to_string());
    report
        .environment
        .insert("arch".to_string(), std::env::consts::ARCH.to_string());
    report
        .environment
        .insert("root".to_string(), layout.root().display().to_string());

    let python = check_python(options.python.as_deref());
    if layout.venv_dir().is_dir() {
        report.add(python.optional());
    } else {
        report.add(python);
    }
    report.add(check_file("Manifest", &layout.manifest()));
    report.add(check_file("Config Template", &layout.config_template()));
    report.add(check_file("Entry Point", &layout.entry_point()).optional());
    report.add(check_environment(layout));
    report.add(check_config(layout));

    report.total_duration = start.elapsed();
    report
}

/// Check for a base interpreter able to create environments.
fn check_python(configured: Option<&Path>) -> CheckResult {
    let start = Instant::now();

    let python = match configured.map(Path::to_path_buf).or_else(find_python) {
        Some(p) => p,
        None => {
            return CheckResult::fail("Python", "No Python interpreter found")
                .with_duration(start.elapsed())
        }
    };

    match ProcessBuilder::new(&python).arg("--version").exec_and_check() {
        Ok(output) => {
            // Old interpreters print the version to stderr
            let text = if output.stdout.is_empty() {
                String::from_utf8_lossy(&output.stderr).into_owned()
            } else {
                String::from_utf8_lossy(&output.stdout).into_owned()
            };
            let version = text.lines().next().unwrap_or("unknown version").trim();
            CheckResult::pass("Python", format!("Found {}", python.display()))
                .with_version(version)
                .with_path(python)
                .with_duration(start.elapsed())
        }
        Err(e) => CheckResult::fail("Python", format!("{:#}", e))
            .with_path(python)
            .with_duration(start.elapsed()),
    }
}

fn check_file(name: &str, path: &Path) -> CheckResult {
    if path.is_file() {
        CheckResult::pass(name, "Found").with_path(path.to_path_buf())
    } else {
        CheckResult::fail(name, format!("Missing {}", path.display())).with_path(path.to_path_buf())
    }
}

fn check_environment(layout: &ProjectLayout) -> CheckResult {
    let venv_dir = layout.venv_dir();
    let python = layout.venv_python();

    let result = if !venv_dir.is_dir() {
        CheckResult::fail("Virtual Environment", "Not created yet; run the bootstrap")
    } else if !python.is_file() {
        CheckResult::fail(
            "Virtual Environment",
            format!("Directory exists but {} is missing", python.display()),
        )
    } else {
        CheckResult::pass("Virtual Environment", "Found")
    };

    result.with_path(venv_dir).optional()
}

fn check_config(layout: &ProjectLayout) -> CheckResult {
    let config = layout.config_file();
    let template = layout.config_template();

    let result = if !config.is_file() {
        CheckResult::fail("Config File", "Not created yet; run the bootstrap")
    } else if template.is_file() && files_identical(&config, &template).unwrap_or(false) {
        CheckResult::fail(
            "Config File",
            "Still identical to the template; fill in your settings",
        )
    } else {
        CheckResult::pass("Config File", "Found")
    };

    result.with_path(config).optional()
}

/// Format the doctor report for display.
pub fn format_report(report: &DoctorReport, verbose: bool) -> String {
    use std::fmt::Write;

    let mut output = String::new();

    let _ = writeln!(output, "DARKNEXT Setup Doctor");
    let _ = writeln!(output, "=====================\n");

    if verbose {
        let _ = writeln!(output, "Environment:");
        for (key, value) in &report.environment {
            let _ = writeln!(output, "  {}: {}", key, value);
        }
        let _ = writeln!(output);
    }

    let _ = writeln!(output, "Checks:");
    for check in &report.checks {
        let status = if check.passed { "[OK]" } else { "[!!]" };
        let required = if check.required { "" } else { " (optional)" };

        let _ = writeln!(output, "  {} {}{}", status, check.name, required);

        if verbose || !check.passed {
            let _ = writeln!(output, "      {}", check.message);
        }
        if verbose {
            if let Some(path) = &check.path {
                let _ = writeln!(output, "      Path: {}", path.display());
            }
            if let Some(version) = &check.version {
                let _ = writeln!(output, "      Version: {}", version);
            }
        }
    }

    let _ = writeln!(output);

    let passed = report.passed_count();
    let failed = report.failed_count();
    let required_failed = report.required_failed_count();

    let _ = writeln!(output, "Summary: {} passed, {} failed", passed, failed);

    if required_failed > 0 {
        let _ = writeln!(
            output,
            "\n{} required check(s) failed. The bootstrap cannot complete.",
            required_failed
        );
    } else if failed > 0 {
        let _ = writeln!(
            output,
            "\nAll required checks passed. {} optional check(s) need attention.",
            failed
        );
    } else {
        let _ = writeln!(output, "\nAll checks passed.");
    }

    output
}
