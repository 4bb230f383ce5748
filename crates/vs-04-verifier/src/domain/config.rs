//! Verification run parameters.

use shared_types::U256;
use vs_01_ledger_client::ConfirmationPolicy;

/// Names, funding and confirmation policy of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifierConfig {
    /// Constructor argument of the deployment.
    pub initial_name: String,
    /// Name written by the owner.
    pub new_name: String,
    /// Name the secondary identity attempts to write. Differs from
    /// `new_name` so an accepted write would be visible.
    pub rejected_name: String,
    /// Wei sent with the deployment.
    pub funding: U256,
    pub confirmation: ConfirmationPolicy,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            initial_name: "hossein".to_string(),
            new_name: "ali".to_string(),
            rejected_name: "mallory".to_string(),
            funding: U256::from(5),
            confirmation: ConfirmationPolicy::default(),
        }
    }
}
