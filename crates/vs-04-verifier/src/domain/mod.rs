//! Domain layer: run parameters and reports.

pub mod config;
pub mod report;

pub use config::VerifierConfig;
pub use report::{RunReport, Step, StepOutcome, StepReport};
