//! Octocrab implementation of the provider gateway for GitHub.

use async_trait::async_trait;
use octocrab::{Octocrab, Page};
use serde_json::json;

use crate::provider::error::ProviderError;
use crate::provider::models::{
    Commit, CommitFile, CreateRepositoryRequest, DeployKey, DeployKeyInfo, LicenseTemplate,
    PullRequest, PullRequestRequest, RepositoryInfo, RepositoryRef,
};
use crate::provider::token::PersonalAccessToken;

use super::ProviderGateway;
use super::client::build_octocrab_client;
use super::error_mapping::map_octocrab_error;

mod types;

#[cfg(test)]
mod tests;

use types::{
    ApiCommit, ApiDeployKey, ApiGitCommit, ApiPullRequest, ApiRepository, CreateCommitBody,
    CreateDeployKeyBody, CreatePullRequestBody, CreateRefBody, CreateRepositoryBody,
    UpdateRefBody,
};

const KEYS_PAGE_SIZE: &str = "100";
const BLOB_MODE: &str = "100644";

/// Octocrab-backed GitHub gateway.
pub struct OctocrabGitHubGateway {
    client: Octocrab,
}

impl OctocrabGitHubGateway {
    /// Creates a new gateway from an Octocrab client.
    #[must_use]
    pub const fn new(client: Octocrab) -> Self {
        Self { client }
    }

    /// Builds an Octocrab client for the given token and API base URL.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::InvalidUrl` when the base URI cannot be parsed
    /// or `ProviderError::Api` when Octocrab fails to construct a client.
    pub fn for_token(token: &PersonalAccessToken, api_base: &str) -> Result<Self, ProviderError> {
        let octocrab = build_octocrab_client(token, api_base)?;
        Ok(Self::new(octocrab))
    }

    async fn git_commit(
        &self,
        repository: &RepositoryRef,
        sha: &str,
    ) -> Result<ApiGitCommit, ProviderError> {
        self.client
            .get::<ApiGitCommit, _, _>(
                format!("{}/git/commits/{sha}", repo_path(repository)),
                None::<&()>,
            )
            .await
            .map_err(|error| map_octocrab_error("get parent commit", &error))
    }
}

fn repo_path(repository: &RepositoryRef) -> String {
    format!(
        "/repos/{}/{}",
        repository.owner(),
        repository.repository()
    )
}

fn tree_entry(file: &CommitFile) -> serde_json::Value {
    match &file.content {
        Some(content) => json!({
            "path": file.path,
            "mode": BLOB_MODE,
            "type": "blob",
            "content": content,
        }),
        None => json!({
            "path": file.path,
            "mode": BLOB_MODE,
            "type": "blob",
            "sha": null,
        }),
    }
}

#[async_trait]
impl ProviderGateway for OctocrabGitHubGateway {
    async fn organization(&self, name: &str) -> Result<(), ProviderError> {
        self.client
            .get::<serde_json::Value, _, _>(format!("/orgs/{name}"), None::<&()>)
            .await
            .map(|_| ())
            .map_err(|error| map_octocrab_error("get organization", &error))
    }

    async fn repository(
        &self,
        repository: &RepositoryRef,
    ) -> Result<RepositoryInfo, ProviderError> {
        self.client
            .get::<ApiRepository, _, _>(repo_path(repository), None::<&()>)
            .await
            .map(ApiRepository::into)
            .map_err(|error| map_octocrab_error("get repository", &error))
    }

    async fn create_repository(
        &self,
        repository: &RepositoryRef,
        request: &CreateRepositoryRequest,
    ) -> Result<RepositoryInfo, ProviderError> {
        let route = match repository {
            RepositoryRef::Organization { organization, .. } => {
                format!("/orgs/{organization}/repos")
            }
            RepositoryRef::User { .. } => "/user/repos".to_owned(),
        };
        let body = CreateRepositoryBody {
            name: repository.repository(),
            description: &request.description,
            private: request.visibility.is_private(),
            auto_init: request.auto_init,
            license_template: request.license_template.map(LicenseTemplate::as_str),
        };

        let created: ApiRepository = self
            .client
            .post(route, Some(&body))
            .await
            .map_err(|error| map_octocrab_error("create repository", &error))?;
        Ok(created.into())
    }

    async fn deploy_key(
        &self,
        repository: &RepositoryRef,
        name: &str,
    ) -> Result<DeployKey, ProviderError> {
        let page = self
            .client
            .get::<Page<ApiDeployKey>, _, _>(
                format!("{}/keys", repo_path(repository)),
                Some(&[("per_page", KEYS_PAGE_SIZE)]),
            )
            .await
            .map_err(|error| map_octocrab_error("list deploy keys", &error))?;
        let keys = self
            .client
            .all_pages(page)
            .await
            .map_err(|error| map_octocrab_error("list deploy keys", &error))?;

        keys.into_iter()
            .find(|key| key.title == name)
            .map(ApiDeployKey::into)
            .ok_or_else(|| ProviderError::NotFound {
                message: format!("deploy key {name} not found on {}", repository.full_name()),
            })
    }

    async fn create_deploy_key(
        &self,
        repository: &RepositoryRef,
        key: &DeployKeyInfo,
    ) -> Result<DeployKey, ProviderError> {
        let key_text = key.key_text();
        let body = CreateDeployKeyBody {
            title: &key.name,
            key: &key_text,
            read_only: key.read_only,
        };

        let created: ApiDeployKey = self
            .client
            .post(format!("{}/keys", repo_path(repository)), Some(&body))
            .await
            .map_err(|error| map_octocrab_error("create deploy key", &error))?;
        Ok(created.into())
    }

    async fn list_commits(
        &self,
        repository: &RepositoryRef,
        branch: &str,
        page_size: u32,
        page: u32,
    ) -> Result<Vec<Commit>, ProviderError> {
        let per_page = page_size.to_string();
        let page_number = page.to_string();
        let query = [
            ("sha", branch),
            ("per_page", per_page.as_str()),
            ("page", page_number.as_str()),
        ];

        self.client
            .get::<Vec<ApiCommit>, _, _>(format!("{}/commits", repo_path(repository)), Some(&query))
            .await
            .map(|commits| commits.into_iter().map(ApiCommit::into).collect())
            .map_err(|error| map_octocrab_error("list commits", &error))
    }

    async fn create_branch(
        &self,
        repository: &RepositoryRef,
        branch: &str,
        sha: &str,
    ) -> Result<(), ProviderError> {
        let body = CreateRefBody {
            reference: format!("refs/heads/{branch}"),
            sha,
        };

        let _created: serde_json::Value = self
            .client
            .post(format!("{}/git/refs", repo_path(repository)), Some(&body))
            .await
            .map_err(|error| map_octocrab_error("create branch", &error))?;
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
        let base = repo_path(repository);
        let base_tree = self
            .git_commit(repository, parent)
            .await?
            .tree
            .map(|tree| tree.sha)
            .ok_or_else(|| ProviderError::Api {
                message: format!("commit {parent} did not report a tree"),
            })?;

        let tree_body = json!({
            "base_tree": base_tree,
            "tree": files.iter().map(tree_entry).collect::<Vec<_>>(),
        });
        let tree: serde_json::Value = self
            .client
            .post(format!("{base}/git/trees"), Some(&tree_body))
            .await
            .map_err(|error| map_octocrab_error("create tree", &error))?;
        let tree_sha = tree
            .get("sha")
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| ProviderError::Api {
                message: "create tree response did not include a sha".to_owned(),
            })?;

        let commit_body = CreateCommitBody {
            message,
            tree: tree_sha,
            parents: [parent],
        };
        let commit: ApiGitCommit = self
            .client
            .post(format!("{base}/git/commits"), Some(&commit_body))
            .await
            .map_err(|error| map_octocrab_error("create commit", &error))?;

        let update_body = UpdateRefBody {
            sha: &commit.sha,
            force: false,
        };
        let _updated: serde_json::Value = self
            .client
            .patch(format!("{base}/git/refs/heads/{branch}"), Some(&update_body))
            .await
            .map_err(|error| map_octocrab_error("update branch", &error))?;

        Ok(commit.into())
    }

    async fn create_pull_request(
        &self,
        repository: &RepositoryRef,
        request: &PullRequestRequest,
    ) -> Result<PullRequest, ProviderError> {
        let body = CreatePullRequestBody {
            title: &request.title,
            head: &request.head,
            base: &request.base,
            body: &request.description,
        };

        let created: ApiPullRequest = self
            .client
            .post(format!("{}/pulls", repo_path(repository)), Some(&body))
            .await
            .map_err(|error| map_octocrab_error("create pull request", &error))?;
        Ok(created.into())
    }
}
