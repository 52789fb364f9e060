//! Gateways performing the raw provider calls.
//!
//! [`ProviderGateway`] is the seam between the provider-agnostic workflows in
//! [`crate::GitProvider`] and the hosted services. The Octocrab and reqwest
//! implementations issue real HTTP requests; [`DryRunGateway`] fabricates
//! plausible answers without touching the network; tests use the generated
//! `MockProviderGateway`.

mod client;
mod dry_run;
mod error_mapping;
mod github;
mod gitlab;

pub use dry_run::DryRunGateway;
pub use github::OctocrabGitHubGateway;
pub use gitlab::GitLabGateway;

use async_trait::async_trait;

use super::error::ProviderError;
use super::models::{
    Commit, CommitFile, CreateRepositoryRequest, DeployKey, DeployKeyInfo, PullRequest,
    PullRequestRequest, RepositoryInfo, RepositoryRef,
};
use super::token::PersonalAccessToken;
use super::url::GitProviderName;

/// Raw operations every supported provider offers.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProviderGateway: Send + Sync {
    /// Looks up an organization (GitHub) or group (GitLab).
    async fn organization(&self, name: &str) -> Result<(), ProviderError>;

    /// Fetches repository metadata.
    async fn repository(&self, repository: &RepositoryRef)
    -> Result<RepositoryInfo, ProviderError>;

    /// Creates a repository under the reference's owner.
    async fn create_repository(
        &self,
        repository: &RepositoryRef,
        request: &CreateRepositoryRequest,
    ) -> Result<RepositoryInfo, ProviderError>;

    /// Fetches the deploy key stored under `name`.
    async fn deploy_key(
        &self,
        repository: &RepositoryRef,
        name: &str,
    ) -> Result<DeployKey, ProviderError>;

    /// Uploads a deploy key.
    async fn create_deploy_key(
        &self,
        repository: &RepositoryRef,
        key: &DeployKeyInfo,
    ) -> Result<DeployKey, ProviderError>;

    /// Lists one page of commits on `branch`, newest first. Pages are 1-based.
    async fn list_commits(
        &self,
        repository: &RepositoryRef,
        branch: &str,
        page_size: u32,
        page: u32,
    ) -> Result<Vec<Commit>, ProviderError>;

    /// Creates `branch` pointing at `sha`.
    async fn create_branch(
        &self,
        repository: &RepositoryRef,
        branch: &str,
        sha: &str,
    ) -> Result<(), ProviderError>;

    /// Commits `files` on `branch` as a child of `parent` and moves the branch
    /// to the new commit.
    async fn create_commit(
        &self,
        repository: &RepositoryRef,
        branch: &str,
        parent: &str,
        message: &str,
        files: &[CommitFile],
    ) -> Result<Commit, ProviderError>;

    /// Opens a pull request (GitLab: merge request).
    async fn create_pull_request(
        &self,
        repository: &RepositoryRef,
        request: &PullRequestRequest,
    ) -> Result<PullRequest, ProviderError>;
}

/// Builds the HTTP gateway for `provider`.
///
/// `api_base` overrides the provider's public API endpoint, which is how
/// self-hosted instances and test servers are reached.
///
/// # Errors
///
/// Returns [`ProviderError::InvalidUrl`] when `api_base` cannot be parsed, or
/// [`ProviderError::Configuration`] when the HTTP client cannot be built.
pub fn build_gateway(
    provider: GitProviderName,
    token: &PersonalAccessToken,
    api_base: Option<&str>,
) -> Result<Box<dyn ProviderGateway>, ProviderError> {
    let base = api_base.unwrap_or_else(|| provider.default_api_base());
    match provider {
        GitProviderName::GitHub => Ok(Box::new(OctocrabGitHubGateway::for_token(token, base)?)),
        GitProviderName::GitLab => Ok(Box::new(GitLabGateway::for_token(token, base)?)),
    }
}
