//! Request and response shapes for the GitLab REST API.

use serde::{Deserialize, Serialize};

use crate::provider::models::{Commit, DeployKey, PullRequest, RepositoryInfo, Visibility};

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiGroup {
    pub(super) id: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiProject {
    pub(super) path: String,
    pub(super) default_branch: Option<String>,
    pub(super) visibility: Option<String>,
    pub(super) description: Option<String>,
    pub(super) web_url: Option<String>,
}

impl From<ApiProject> for RepositoryInfo {
    fn from(value: ApiProject) -> Self {
        let visibility = match value.visibility.as_deref() {
            Some("public") => Some(Visibility::Public),
            Some("private" | "internal") => Some(Visibility::Private),
            _ => None,
        };
        Self {
            name: value.path,
            default_branch: value.default_branch,
            visibility,
            description: value.description,
            html_url: value.web_url,
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct CreateProjectBody<'a> {
    pub(super) name: &'a str,
    pub(super) path: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) namespace_id: Option<u64>,
    pub(super) description: &'a str,
    pub(super) visibility: &'static str,
    pub(super) initialize_with_readme: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiDeployKey {
    pub(super) title: String,
    pub(super) can_push: Option<bool>,
}

impl From<ApiDeployKey> for DeployKey {
    fn from(value: ApiDeployKey) -> Self {
        Self {
            name: value.title,
            read_only: value.can_push.map(|can_push| !can_push),
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct CreateDeployKeyBody<'a> {
    pub(super) title: &'a str,
    pub(super) key: &'a str,
    pub(super) can_push: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiCommit {
    pub(super) id: String,
    pub(super) message: Option<String>,
    pub(super) author_name: Option<String>,
    pub(super) web_url: Option<String>,
}

impl From<ApiCommit> for Commit {
    fn from(value: ApiCommit) -> Self {
        Self {
            sha: value.id,
            message: value.message,
            author: value.author_name,
            html_url: value.web_url,
        }
    }
}

/// One file operation inside a GitLab commit.
#[derive(Debug, Serialize)]
pub(super) struct CommitAction<'a> {
    pub(super) action: &'static str,
    pub(super) file_path: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(super) content: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub(super) struct CreateCommitBody<'a> {
    pub(super) branch: &'a str,
    pub(super) commit_message: &'a str,
    pub(super) actions: Vec<CommitAction<'a>>,
}

#[derive(Debug, Serialize)]
pub(super) struct CreateMergeRequestBody<'a> {
    pub(super) source_branch: &'a str,
    pub(super) target_branch: &'a str,
    pub(super) title: &'a str,
    pub(super) description: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiMergeRequest {
    pub(super) iid: u64,
    pub(super) web_url: String,
}

impl From<ApiMergeRequest> for PullRequest {
    fn from(value: ApiMergeRequest) -> Self {
        Self {
            number: value.iid,
            url: value.web_url,
        }
    }
}
