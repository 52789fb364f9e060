//! Request and response shapes for the GitHub REST API.

use serde::{Deserialize, Serialize};

use crate::provider::models::{Commit, DeployKey, PullRequest, RepositoryInfo, Visibility};

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiRepository {
    pub(super) name: String,
    pub(super) default_branch: Option<String>,
    pub(super) private: Option<bool>,
    pub(super) visibility: Option<String>,
    pub(super) description: Option<String>,
    pub(super) html_url: Option<String>,
}

impl From<ApiRepository> for RepositoryInfo {
    fn from(value: ApiRepository) -> Self {
        let visibility = match value.visibility.as_deref() {
            Some("public") => Some(Visibility::Public),
            Some("private" | "internal") => Some(Visibility::Private),
            _ => value.private.map(Visibility::from_private),
        };
        Self {
            name: value.name,
            default_branch: value.default_branch,
            visibility,
            description: value.description,
            html_url: value.html_url,
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct CreateRepositoryBody<'a> {
    pub(super) name: &'a str,
    pub(super) description: &'a str,
    pub(super) private: bool,
    pub(super) auto_init: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) license_template: Option<&'static str>,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiDeployKey {
    pub(super) title: String,
    pub(super) read_only: Option<bool>,
}

impl From<ApiDeployKey> for DeployKey {
    fn from(value: ApiDeployKey) -> Self {
        Self {
            name: value.title,
            read_only: value.read_only,
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct CreateDeployKeyBody<'a> {
    pub(super) title: &'a str,
    pub(super) key: &'a str,
    pub(super) read_only: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiCommit {
    pub(super) sha: String,
    pub(super) html_url: Option<String>,
    pub(super) commit: ApiCommitDetail,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiCommitDetail {
    pub(super) message: Option<String>,
    pub(super) author: Option<ApiCommitAuthor>,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiCommitAuthor {
    pub(super) name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiObjectRef {
    pub(super) sha: String,
}

impl From<ApiCommit> for Commit {
    fn from(value: ApiCommit) -> Self {
        Self {
            sha: value.sha,
            message: value.commit.message,
            author: value.commit.author.and_then(|author| author.name),
            html_url: value.html_url,
        }
    }
}

/// Commit object returned by the Git data API.
#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiGitCommit {
    pub(super) sha: String,
    pub(super) message: Option<String>,
    pub(super) author: Option<ApiCommitAuthor>,
    pub(super) html_url: Option<String>,
    pub(super) tree: Option<ApiObjectRef>,
}

impl From<ApiGitCommit> for Commit {
    fn from(value: ApiGitCommit) -> Self {
        Self {
            sha: value.sha,
            message: value.message,
            author: value.author.and_then(|author| author.name),
            html_url: value.html_url,
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct CreateRefBody<'a> {
    #[serde(rename = "ref")]
    pub(super) reference: String,
    pub(super) sha: &'a str,
}

#[derive(Debug, Serialize)]
pub(super) struct UpdateRefBody<'a> {
    pub(super) sha: &'a str,
    pub(super) force: bool,
}

#[derive(Debug, Serialize)]
pub(super) struct CreateCommitBody<'a> {
    pub(super) message: &'a str,
    pub(super) tree: &'a str,
    pub(super) parents: [&'a str; 1],
}

#[derive(Debug, Serialize)]
pub(super) struct CreatePullRequestBody<'a> {
    pub(super) title: &'a str,
    pub(super) head: &'a str,
    pub(super) base: &'a str,
    pub(super) body: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiPullRequest {
    pub(super) number: u64,
    pub(super) html_url: String,
}

impl From<ApiPullRequest> for PullRequest {
    fn from(value: ApiPullRequest) -> Self {
        Self {
            number: value.number,
            url: value.html_url,
        }
    }
}
