//! Bootstrap steps and their recorded outcomes.

use std::fmt;

/// One step of the bootstrap procedure.
///
/// Steps always run in the order of [`Step::ALL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    /// Create the virtual environment if its directory is missing.
    EnsureEnvironment,
    /// Install dependencies from the manifest.
    InstallDependencies,
    /// Copy the configuration template if the config file is missing.
    EnsureConfiguration,
    /// Run the entry point in test mode.
    SelfTest,
}

impl Step {
    /// All steps, in execution order.
    pub const ALL: [Step; 4] = [
        Step::EnsureEnvironment,
        Step::InstallDependencies,
        Step::EnsureConfiguration,
        Step::SelfTest,
    ];

    /// Stable identifier used in JSON output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Step::EnsureEnvironment => "ensure-environment",
            Step::InstallDependencies => "install-dependencies",
            Step::EnsureConfiguration => "ensure-configuration",
            Step::SelfTest => "self-test",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What happened when a step was visited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The step created something that was missing.
    Created,
    /// The thing the step ensures was already there; nothing ran.
    AlreadyPresent,
    /// An external command ran and succeeded.
    Ran,
    /// Skipped on request.
    Skipped,
    /// Dry run: the step would have done work.
    Planned,
}

impl StepOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            StepOutcome::Created => "created",
            StepOutcome::AlreadyPresent => "already-present",
            StepOutcome::Ran => "ran",
            StepOutcome::Skipped => "skipped",
            StepOutcome::Planned => "planned",
        }
    }
}

/// A visited step together with its outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepRecord {
    pub step: Step,
    pub outcome: StepOutcome,
    /// Human-readable detail, e.g. the command line or the file copied.
    pub detail: String,
}

impl StepRecord {
    pub fn new(step: Step, outcome: StepOutcome, detail: impl Into<String>) -> Self {
        StepRecord {
            step,
            outcome,
            detail: detail.into(),
        }
    }
}

/// Result of a full bootstrap run.
#[derive(Debug, Clone, Default)]
pub struct BootstrapReport {
    /// Visited steps, in order.
    pub steps: Vec<StepRecord>,

    /// Exit code of the self-test, when it ran.
    pub self_test_code: Option<i32>,
}

impl BootstrapReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: StepRecord) {
        self.steps.push(record);
    }

    /// Outcome recorded for a step, if it was visited.
    pub fn outcome(&self, step: Step) -> Option<StepOutcome> {
        self.steps
            .iter()
            .find(|r| r.step == step)
            .map(|r| r.outcome)
    }

    /// Whether anything on disk was created during the run.
    pub fn created_anything(&self) -> bool {
        self.steps
            .iter()
            .any(|r| r.outcome == StepOutcome::Created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_order() {
        assert_eq!(Step::ALL[0], Step::EnsureEnvironment);
        assert_eq!(Step::ALL[3], Step::SelfTest);
    }

    #[test]
    fn test_report_lookup() {
        let mut report = BootstrapReport::new();
        report.push(StepRecord::new(
            Step::EnsureEnvironment,
            StepOutcome::AlreadyPresent,
            "venv",
        ));
        report.push(StepRecord::new(
            Step::EnsureConfiguration,
            StepOutcome::Created,
            ".env",
        ));

        assert_eq!(
            report.outcome(Step::EnsureEnvironment),
            Some(StepOutcome::AlreadyPresent)
        );
        assert_eq!(report.outcome(Step::SelfTest), None);
        assert!(report.created_anything());
    }
}
