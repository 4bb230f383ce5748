//! Verification steps and the run report.

use std::fmt;
use std::time::Duration;

/// One verification step, in run order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    /// Resolve, deploy, confirm, check balances.
    Deployment,
    /// `getName()` equals the initial name.
    ReadAfterDeploy,
    /// `owner()` equals the primary identity.
    Owner,
    /// The owner renames the store.
    AuthorizedMutation,
    /// The secondary identity is refused.
    UnauthorizedMutation,
}

impl Step {
    /// All steps in the order they run.
    pub const ALL: [Step; 5] = [
        Step::Deployment,
        Step::ReadAfterDeploy,
        Step::Owner,
        Step::AuthorizedMutation,
        Step::UnauthorizedMutation,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Step::Deployment => "deployment",
            Step::ReadAfterDeploy => "read-after-deploy",
            Step::Owner => "owner",
            Step::AuthorizedMutation => "authorized-mutation",
            Step::UnauthorizedMutation => "unauthorized-mutation",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Passed { detail: String },
    Failed { error: String },
    /// Not run because an earlier step failed.
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReport {
    pub step: Step,
    pub outcome: StepOutcome,
    pub elapsed: Duration,
}

impl StepReport {
    #[must_use]
    pub fn passed(&self) -> bool {
        matches!(self.outcome, StepOutcome::Passed { .. })
    }
}

/// Ordered step results of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub environment: String,
    pub steps: Vec<StepReport>,
}

impl RunReport {
    #[must_use]
    pub fn new(environment: impl Into<String>) -> Self {
        Self {
            environment: environment.into(),
            steps: Vec::with_capacity(Step::ALL.len()),
        }
    }

    pub fn record(&mut self, step: Step, outcome: StepOutcome, elapsed: Duration) {
        self.steps.push(StepReport {
            step,
            outcome,
            elapsed,
        });
    }

    /// Marks every step not yet recorded as skipped.
    pub fn skip_remaining(&mut self) {
        for step in Step::ALL {
            if self.outcome(step).is_none() {
                self.record(step, StepOutcome::Skipped, Duration::ZERO);
            }
        }
    }

    #[must_use]
    pub fn outcome(&self, step: Step) -> Option<&StepOutcome> {
        self.steps
            .iter()
            .find(|r| r.step == step)
            .map(|r| &r.outcome)
    }

    /// True when every step ran and passed.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.steps.len() == Step::ALL.len() && self.steps.iter().all(StepReport::passed)
    }

    #[must_use]
    pub fn failed_step(&self) -> Option<&StepReport> {
        self.steps
            .iter()
            .find(|r| matches!(r.outcome, StepOutcome::Failed { .. }))
    }

    /// Process exit code: 0 when all steps passed, 1 otherwise.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        u8::from(!self.passed())
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "verification of '{}'", self.environment)?;
        for report in &self.steps {
            match &report.outcome {
                StepOutcome::Passed { detail } => writeln!(
                    f,
                    "  PASS  {:<22} {} ({} ms)",
                    report.step,
                    detail,
                    report.elapsed.as_millis()
                )?,
                StepOutcome::Failed { error } => {
                    writeln!(f, "  FAIL  {:<22} {}", report.step, error)?;
                }
                StepOutcome::Skipped => writeln!(f, "  SKIP  {}", report.step)?,
            }
        }
        write!(
            f,
            "result: {}",
            if self.passed() { "passed" } else { "failed" }
        )
    }
}
