//! Service layer: the deployment verifier and the step orchestrator.

pub mod deployment;
pub mod orchestrator;

pub use deployment::{DeploymentVerifier, VerificationContext};
pub use orchestrator::Orchestrator;
