//! Gateway that answers every call without contacting a provider.
//!
//! Reads report a plausible, already-provisioned repository; writes are
//! logged and acknowledged. Organization lookups always miss, so owners
//! resolve as personal accounts.

use async_trait::async_trait;
use tracing::info;

use crate::provider::error::ProviderError;
use crate::provider::models::{
    Commit, CommitFile, CreateRepositoryRequest, DeployKey, DeployKeyInfo, PullRequest,
    PullRequestRequest, RepositoryInfo, RepositoryRef, Visibility,
};
use crate::provider::url::GitProviderName;

use super::ProviderGateway;

const DRY_RUN_BRANCH: &str = "main";
const DRY_RUN_SHA: &str = "0000000000000000000000000000000000000000";

/// Gateway used by `--dry-run`.
#[derive(Debug, Clone, Copy)]
pub struct DryRunGateway {
    provider: GitProviderName,
}

impl DryRunGateway {
    /// Creates a dry-run gateway reporting as `provider`.
    #[must_use]
    pub const fn new(provider: GitProviderName) -> Self {
        Self { provider }
    }

    fn repository_info(repository: &RepositoryRef) -> RepositoryInfo {
        RepositoryInfo {
            name: repository.repository().to_owned(),
            default_branch: Some(DRY_RUN_BRANCH.to_owned()),
            visibility: Some(Visibility::Private),
            description: None,
            html_url: Some(repository.to_string()),
        }
    }
}

#[async_trait]
impl ProviderGateway for DryRunGateway {
    async fn organization(&self, name: &str) -> Result<(), ProviderError> {
        Err(ProviderError::NotFound {
            message: format!("dry run: {} organization {name} not looked up", self.provider),
        })
    }

    async fn repository(
        &self,
        repository: &RepositoryRef,
    ) -> Result<RepositoryInfo, ProviderError> {
        Ok(Self::repository_info(repository))
    }

    async fn create_repository(
        &self,
        repository: &RepositoryRef,
        request: &CreateRepositoryRequest,
    ) -> Result<RepositoryInfo, ProviderError> {
        info!(
            repository = %repository,
            visibility = %request.visibility,
            "dry run: would create repository"
        );
        Ok(Self::repository_info(repository))
    }

    async fn deploy_key(
        &self,
        _repository: &RepositoryRef,
        name: &str,
    ) -> Result<DeployKey, ProviderError> {
        Ok(DeployKey {
            name: name.to_owned(),
            read_only: Some(false),
        })
    }

    async fn create_deploy_key(
        &self,
        repository: &RepositoryRef,
        key: &DeployKeyInfo,
    ) -> Result<DeployKey, ProviderError> {
        info!(repository = %repository, key = %key.name, "dry run: would upload deploy key");
        Ok(DeployKey {
            name: key.name.clone(),
            read_only: Some(key.read_only),
        })
    }

    async fn list_commits(
        &self,
        _repository: &RepositoryRef,
        branch: &str,
        _page_size: u32,
        _page: u32,
    ) -> Result<Vec<Commit>, ProviderError> {
        Ok(vec![Commit {
            sha: DRY_RUN_SHA.to_owned(),
            message: Some(format!("dry run head of {branch}")),
            author: None,
            html_url: None,
        }])
    }

    async fn create_branch(
        &self,
        repository: &RepositoryRef,
        branch: &str,
        sha: &str,
    ) -> Result<(), ProviderError> {
        info!(repository = %repository, branch, sha, "dry run: would create branch");
        Ok(())
    }

    async fn create_commit(
        &self,
        repository: &RepositoryRef,
        branch: &str,
        parent: &str,
        message: &str,
        files: &[CommitFile],
    ) -> Result<Commit, ProviderError> {
        info!(
            repository = %repository,
            branch,
            parent,
            files = files.len(),
            "dry run: would commit"
        );
        Ok(Commit {
            sha: DRY_RUN_SHA.to_owned(),
            message: Some(message.to_owned()),
            author: None,
            html_url: None,
        })
    }

    async fn create_pull_request(
        &self,
        repository: &RepositoryRef,
        request: &PullRequestRequest,
    ) -> Result<PullRequest, ProviderError> {
        info!(
            repository = %repository,
            head = %request.head,
            base = %request.base,
            "dry run: would open pull request"
        );
        Ok(PullRequest {
            number: 0,
            url: format!("{repository}/pull/0"),
        })
    }
}
