//! Tunables shared by every provider workflow.

use super::wait::WaitPolicy;

/// Title under which the GitOps deploy key is stored.
pub const DEFAULT_DEPLOY_KEY_NAME: &str = "wego-deploy-key";

/// Description given to repositories the tool creates.
pub const DEFAULT_REPOSITORY_DESCRIPTION: &str = "Weave Gitops repo";

/// Settings applied by [`crate::GitProvider`] workflows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderSettings {
    /// Deploy key title looked up and uploaded.
    pub deploy_key_name: String,
    /// Description for newly created repositories.
    pub repository_description: String,
    /// Cadence and bound for confirming writes.
    pub wait: WaitPolicy,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            deploy_key_name: DEFAULT_DEPLOY_KEY_NAME.to_owned(),
            repository_description: DEFAULT_REPOSITORY_DESCRIPTION.to_owned(),
            wait: WaitPolicy::default(),
        }
    }
}
