//! reqwest implementation of the provider gateway for GitLab.
//!
//! Projects and groups are addressed by their URL-encoded full path
//! (`group%2Fsubgroup%2Fproject`), so nested namespaces need no id lookups
//! except when a project is created inside a group.

use std::fmt;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::provider::error::ProviderError;
use crate::provider::models::{
    Commit, CommitFile, CreateRepositoryRequest, DeployKey, DeployKeyInfo, PullRequest,
    PullRequestRequest, RepositoryInfo, RepositoryRef,
};
use crate::provider::token::PersonalAccessToken;

use super::ProviderGateway;
use super::client::{build_http_client, parse_api_base};
use super::error_mapping::{extract_message, map_http_error, map_reqwest_error};

mod types;


use types::{
    ApiCommit, ApiDeployKey, ApiGroup, ApiMergeRequest, ApiProject, CommitAction,
    CreateCommitBody, CreateDeployKeyBody, CreateMergeRequestBody, CreateProjectBody,
};

const TOKEN_HEADER: &str = "PRIVATE-TOKEN";
const PROVIDER_LABEL: &str = "GitLab";
const KEYS_PAGE_SIZE: &str = "100";
const NEXT_PAGE_HEADER: &str = "x-next-page";

/// reqwest-backed GitLab gateway.
pub struct GitLabGateway {
    client: Client,
    api_base: Url,
    token: PersonalAccessToken,
}

impl GitLabGateway {
    /// Creates a gateway from an HTTP client and a parsed API base.
    #[must_use]
    pub const fn new(client: Client, api_base: Url, token: PersonalAccessToken) -> Self {
        Self {
            client,
            api_base,
            token,
        }
    }

    /// Builds a gateway for the given token and API base URL
    /// (e.g. `https://gitlab.com/api/v4`).
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::InvalidUrl` when the base URL cannot be parsed
    /// or `ProviderError::Configuration` when the HTTP client cannot be built.
    pub fn for_token(token: &PersonalAccessToken, api_base: &str) -> Result<Self, ProviderError> {
        let client = build_http_client()?;
        let base = parse_api_base(api_base)?;
        Ok(Self::new(client, base, token.clone()))
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.api_base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn project_endpoint(&self, repository: &RepositoryRef, rest: &[&str]) -> Url {
        let full_name = repository.full_name();
        let mut segments = vec!["projects", full_name.as_str()];
        segments.extend_from_slice(rest);
        self.endpoint(&segments)
    }

    /// Sends `request` and returns the response when its status is a success.
    async fn dispatch(
        &self,
        operation: &str,
        request: RequestBuilder,
    ) -> Result<Response, ProviderError> {
        let response = request
            .header(TOKEN_HEADER, self.token.value())
            .send()
            .await
            .map_err(|error| map_reqwest_error(operation, &error))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = failure_message(response.text().await);
        Err(map_http_error(PROVIDER_LABEL, operation, status, message))
    }

    async fn send<T: DeserializeOwned>(
        &self,
        operation: &str,
        request: RequestBuilder,
    ) -> Result<T, ProviderError> {
        self.dispatch(operation, request)
            .await?
            .json::<T>()
            .await
            .map_err(|error| map_reqwest_error(operation, &error))
    }

    async fn group(&self, path: &str) -> Result<ApiGroup, ProviderError> {
        let url = self.endpoint(&["groups", path]);
        self.send("get group", self.client.get(url)).await
    }

    async fn file_exists(
        &self,
        repository: &RepositoryRef,
        revision: &str,
        file_path: &str,
    ) -> Result<bool, ProviderError> {
        let url = self.project_endpoint(repository, &["repository", "files", file_path]);
        let request = self.client.head(url).query(&[("ref", revision)]);
        match self.send_without_body("check file", request).await {
            Ok(()) => Ok(true),
            Err(error) if error.is_not_found() => Ok(false),
            Err(error) => Err(error),
        }
    }

    async fn send_without_body(
        &self,
        operation: &str,
        request: RequestBuilder,
    ) -> Result<(), ProviderError> {
        let response = request
            .header(TOKEN_HEADER, self.token.value())
            .send()
            .await
            .map_err(|error| map_reqwest_error(operation, &error))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(map_http_error(PROVIDER_LABEL, operation, status, None))
        }
    }
}

/// Message carried by an error response, or why its body could not be read.
fn failure_message<E: fmt::Display>(body: Result<String, E>) -> Option<String> {
    match body {
        Ok(text) => extract_message(&text),
        Err(error) => Some(format!("failed to read error body: {error}")),
    }
}

/// Page number GitLab reports in `x-next-page`; blank on the last page.
fn next_page(response: &Response) -> Option<String> {
    response
        .headers()
        .get(NEXT_PAGE_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
}

#[async_trait]
impl ProviderGateway for GitLabGateway {
    async fn organization(&self, name: &str) -> Result<(), ProviderError> {
        self.group(name).await.map(|_| ())
    }

    async fn repository(
        &self,
        repository: &RepositoryRef,
    ) -> Result<RepositoryInfo, ProviderError> {
        let url = self.project_endpoint(repository, &[]);
        self.send::<ApiProject>("get project", self.client.get(url))
            .await
            .map(ApiProject::into)
    }

    async fn create_repository(
        &self,
        repository: &RepositoryRef,
        request: &CreateRepositoryRequest,
    ) -> Result<RepositoryInfo, ProviderError> {
        let namespace_id = match repository {
            RepositoryRef::Organization { organization, .. } => {
                Some(self.group(organization).await?.id)
            }
            RepositoryRef::User { .. } => None,
        };
        if let Some(license) = request.license_template {
            debug!(
                license = license.as_str(),
                "GitLab has no license templates; skipping"
            );
        }

        let body = CreateProjectBody {
            name: repository.repository(),
            path: repository.repository(),
            namespace_id,
            description: &request.description,
            visibility: request.visibility.as_str(),
            initialize_with_readme: request.auto_init,
        };
        let url = self.endpoint(&["projects"]);
        self.send::<ApiProject>("create project", self.client.post(url).json(&body))
            .await
            .map(ApiProject::into)
    }

    async fn deploy_key(
        &self,
        repository: &RepositoryRef,
        name: &str,
    ) -> Result<DeployKey, ProviderError> {
        let url = self.project_endpoint(repository, &["deploy_keys"]);
        let mut page = String::from("1");
        loop {
            let request = self
                .client
                .get(url.clone())
                .query(&[("per_page", KEYS_PAGE_SIZE), ("page", page.as_str())]);
            let response = self.dispatch("list deploy keys", request).await?;
            let next_page = next_page(&response);
            let keys: Vec<ApiDeployKey> = response
                .json()
                .await
                .map_err(|error| map_reqwest_error("list deploy keys", &error))?;

            if let Some(key) = keys.into_iter().find(|key| key.title == name) {
                return Ok(key.into());
            }
            let Some(next) = next_page else {
                return Err(ProviderError::NotFound {
                    message: format!("deploy key {name} not found on {}", repository.full_name()),
                });
            };
            page = next;
        }
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
            can_push: !key.read_only,
        };
        let url = self.project_endpoint(repository, &["deploy_keys"]);
        self.send::<ApiDeployKey>("create deploy key", self.client.post(url).json(&body))
            .await
            .map(ApiDeployKey::into)
    }

    async fn list_commits(
        &self,
        repository: &RepositoryRef,
        branch: &str,
        page_size: u32,
        page: u32,
    ) -> Result<Vec<Commit>, ProviderError> {
        let url = self.project_endpoint(repository, &["repository", "commits"]);
        let per_page = page_size.to_string();
        let page_number = page.to_string();
        let query = [
            ("ref_name", branch),
            ("per_page", per_page.as_str()),
            ("page", page_number.as_str()),
        ];

        self.send::<Vec<ApiCommit>>("list commits", self.client.get(url).query(&query))
            .await
            .map(|commits| commits.into_iter().map(ApiCommit::into).collect())
    }

    async fn create_branch(
        &self,
        repository: &RepositoryRef,
        branch: &str,
        sha: &str,
    ) -> Result<(), ProviderError> {
        let url = self.project_endpoint(repository, &["repository", "branches"]);
        let request = self
            .client
            .post(url)
            .query(&[("branch", branch), ("ref", sha)]);
        self.send::<serde_json::Value>("create branch", request)
            .await
            .map(|_| ())
    }

    async fn create_commit(
        &self,
        repository: &RepositoryRef,
        branch: &str,
        parent: &str,
        message: &str,
        files: &[CommitFile],
    ) -> Result<Commit, ProviderError> {
        let mut actions = Vec::with_capacity(files.len());
        for file in files {
            let action = if file.content.is_none() {
                "delete"
            } else if self.file_exists(repository, parent, &file.path).await? {
                "update"
            } else {
                "create"
            };
            actions.push(CommitAction {
                action,
                file_path: &file.path,
                content: file.content.as_deref(),
            });
        }

        let body = CreateCommitBody {
            branch,
            commit_message: message,
            actions,
        };
        let url = self.project_endpoint(repository, &["repository", "commits"]);
        self.send::<ApiCommit>("create commit", self.client.post(url).json(&body))
            .await
            .map(ApiCommit::into)
    }

    async fn create_pull_request(
        &self,
        repository: &RepositoryRef,
        request: &PullRequestRequest,
    ) -> Result<PullRequest, ProviderError> {
        let body = CreateMergeRequestBody {
            source_branch: &request.head,
            target_branch: &request.base,
            title: &request.title,
            description: &request.description,
        };
        let url = self.project_endpoint(repository, &["merge_requests"]);
        self.send::<ApiMergeRequest>("create merge request", self.client.post(url).json(&body))
            .await
            .map(ApiMergeRequest::into)
    }
}
