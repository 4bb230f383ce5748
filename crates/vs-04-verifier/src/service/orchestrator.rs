//! # Verification Orchestrator
//!
//! ```text
//! deployment ──► read-after-deploy ──► owner ──► authorized-mutation ──► unauthorized-mutation
//!     │                 │                │               │                        │
//!     └── failure ──────┴────────────────┴───────────────┴────────────────────────┴──► remaining steps skipped
//! ```
//!
//! Steps run strictly in order on one connection. Each mutation is
//! confirmed before the next step starts. Nothing is retried.

use std::time::Instant;

use tracing::{error, info, instrument, warn};

use crate::domain::{RunReport, Step, StepOutcome, VerifierConfig};
use crate::errors::VerificationError;
use crate::service::deployment::{DeploymentVerifier, VerificationContext};

/// Runs the ordered verification steps against one environment.
pub struct Orchestrator {
    verifier: DeploymentVerifier,
    config: VerifierConfig,
}

impl Orchestrator {
    #[must_use]
    pub fn new(verifier: DeploymentVerifier, config: VerifierConfig) -> Self {
        Self { verifier, config }
    }

    #[must_use]
    pub fn config(&self) -> &VerifierConfig {
        &self.config
    }

    /// Runs every step against `environment`.
    ///
    /// The first failing step stops the run; the steps after it are
    /// reported as skipped.
    #[instrument(skip(self))]
    pub async fn run(&self, environment: &str) -> RunReport {
        let mut report = RunReport::new(environment);

        let started = Instant::now();
        let deployed = self
            .verifier
            .verify_deployment(environment, &self.config.initial_name, self.config.funding)
            .await;
        let mut context = match deployed {
            Ok(context) => {
                let detail = format!(
                    "store {} holds {} wei",
                    context.contract().address(),
                    context.instance_balance
                );
                Self::record(&mut report, Step::Deployment, Ok(detail), started);
                context
            }
            Err(e) => {
                Self::record(&mut report, Step::Deployment, Err(e), started);
                report.skip_remaining();
                return report;
            }
        };

        for step in &Step::ALL[1..] {
            let started = Instant::now();
            let result = self.run_step(*step, &mut context).await;
            let failed = result.is_err();
            Self::record(&mut report, *step, result, started);
            if failed {
                report.skip_remaining();
                break;
            }
        }

        if report.passed() {
            info!(environment, "all verification steps passed");
        }
        report
    }

    fn record(
        report: &mut RunReport,
        step: Step,
        result: Result<String, VerificationError>,
        started: Instant,
    ) {
        let outcome = match result {
            Ok(detail) => {
                info!(%step, %detail, "step passed");
                StepOutcome::Passed { detail }
            }
            Err(e) => {
                error!(%step, error = %e, "step failed");
                StepOutcome::Failed {
                    error: e.to_string(),
                }
            }
        };
        report.record(step, outcome, started.elapsed());
    }

    async fn run_step(
        &self,
        step: Step,
        context: &mut VerificationContext,
    ) -> Result<String, VerificationError> {
        match step {
            Step::Deployment => Ok("already deployed".to_string()),
            Step::ReadAfterDeploy => self.read_after_deploy(context).await,
            Step::Owner => self.owner(context).await,
            Step::AuthorizedMutation => self.authorized_mutation(context).await,
            Step::UnauthorizedMutation => self.unauthorized_mutation(context).await,
        }
    }

    async fn read_after_deploy(
        &self,
        context: &VerificationContext,
    ) -> Result<String, VerificationError> {
        let name = context.contract().get_name(context.connection()).await?;
        if name != context.deployment.initial_name {
            return Err(VerificationError::assertion(
                Step::ReadAfterDeploy,
                format!(
                    "getName() returned '{name}', expected '{}'",
                    context.deployment.initial_name
                ),
            ));
        }
        Ok(format!("getName() == '{name}'"))
    }

    async fn owner(&self, context: &VerificationContext) -> Result<String, VerificationError> {
        let owner = context.contract().owner(context.connection()).await?;
        if owner != context.owner() {
            return Err(VerificationError::assertion(
                Step::Owner,
                format!("owner() returned {owner}, expected {}", context.owner()),
            ));
        }
        Ok(format!("owner() == {owner}"))
    }

    async fn authorized_mutation(
        &self,
        context: &mut VerificationContext,
    ) -> Result<String, VerificationError> {
        let new_name = &self.config.new_name;
        let event = context
            .contract()
            .change_name(context.connection(), &context.environment.primary, new_name)
            .await?;
        if &event.new_name != new_name {
            return Err(VerificationError::assertion(
                Step::AuthorizedMutation,
                format!("NameSet carried '{}', expected '{new_name}'", event.new_name),
            ));
        }

        let name = context.contract().get_name(context.connection()).await?;
        if &name != new_name {
            return Err(VerificationError::assertion(
                Step::AuthorizedMutation,
                format!("getName() returned '{name}' after the change, expected '{new_name}'"),
            ));
        }
        context.last_authorized_name = name;
        Ok(format!("NameSet('{new_name}') observed"))
    }

    async fn unauthorized_mutation(
        &self,
        context: &VerificationContext,
    ) -> Result<String, VerificationError> {
        let step = Step::UnauthorizedMutation;
        let intruder = &context.environment.secondary;
        if intruder.address() == context.owner() {
            return Err(VerificationError::assertion(
                step,
                "secondary identity equals the owner",
            ));
        }

        let attempt = context
            .contract()
            .change_name(context.connection(), intruder, &self.config.rejected_name)
            .await;
        match attempt {
            Err(e) if e.is_not_owner() => {
                info!(caller = %intruder.address(), "non-owner mutation rejected");
            }
            Err(e) => return Err(e.into()),
            Ok(event) => {
                warn!(caller = %intruder.address(), "non-owner mutation accepted");
                return Err(VerificationError::assertion(
                    step,
                    format!("non-owner changeName('{}') was accepted", event.new_name),
                ));
            }
        }

        let name = context.contract().get_name(context.connection()).await?;
        if name != context.last_authorized_name {
            return Err(VerificationError::assertion(
                step,
                format!(
                    "getName() returned '{name}', expected '{}'",
                    context.last_authorized_name
                ),
            ));
        }
        Ok(format!("rejected with NotOwner, name still '{name}'"))
    }
}
