//! Value types exchanged between the provider facade and its gateways.
//!
//! Everything here is an owned value produced by one workflow step and
//! consumed by the next; nothing is shared mutably.

use std::fmt;

/// Whether an owner string names a personal account or an organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderAccountType {
    /// A personal account.
    User,
    /// An organization (GitHub) or group (GitLab).
    Organization,
}

impl ProviderAccountType {
    /// Lowercase label used in messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Organization => "organization",
        }
    }
}

impl fmt::Display for ProviderAccountType {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Repository visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    /// Readable by anyone.
    Public,
    /// Readable only by members.
    #[default]
    Private,
}

impl Visibility {
    /// Maps a "private" flag onto a visibility.
    #[must_use]
    pub const fn from_private(private: bool) -> Self {
        if private { Self::Private } else { Self::Public }
    }

    /// Returns true for [`Visibility::Private`].
    #[must_use]
    pub const fn is_private(self) -> bool {
        matches!(self, Self::Private)
    }

    /// Lowercase label, matching the providers' API spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Private => "private",
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Reference to a repository scoped to either a user or an organization.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RepositoryRef {
    /// Repository owned by a personal account.
    User {
        /// Provider hostname.
        domain: String,
        /// Account login.
        user: String,
        /// Repository name.
        repository: String,
    },
    /// Repository owned by an organization or group.
    Organization {
        /// Provider hostname.
        domain: String,
        /// Organization login or GitLab group path.
        organization: String,
        /// Repository name.
        repository: String,
    },
}

impl RepositoryRef {
    /// Builds a user-scoped reference.
    #[must_use]
    pub fn user(domain: &str, user: &str, repository: &str) -> Self {
        Self::User {
            domain: domain.to_owned(),
            user: user.to_owned(),
            repository: repository.to_owned(),
        }
    }

    /// Builds an organization-scoped reference.
    #[must_use]
    pub fn organization(domain: &str, organization: &str, repository: &str) -> Self {
        Self::Organization {
            domain: domain.to_owned(),
            organization: organization.to_owned(),
            repository: repository.to_owned(),
        }
    }

    /// Builds the reference variant matching a resolved account type.
    #[must_use]
    pub fn for_account(
        account_type: ProviderAccountType,
        domain: &str,
        owner: &str,
        repository: &str,
    ) -> Self {
        match account_type {
            ProviderAccountType::User => Self::user(domain, owner, repository),
            ProviderAccountType::Organization => Self::organization(domain, owner, repository),
        }
    }

    /// Provider hostname.
    #[must_use]
    pub const fn domain(&self) -> &str {
        match self {
            Self::User { domain, .. } | Self::Organization { domain, .. } => domain.as_str(),
        }
    }

    /// Owning account or organization.
    #[must_use]
    pub const fn owner(&self) -> &str {
        match self {
            Self::User { user, .. } => user.as_str(),
            Self::Organization { organization, .. } => organization.as_str(),
        }
    }

    /// Repository name.
    #[must_use]
    pub const fn repository(&self) -> &str {
        match self {
            Self::User { repository, .. } | Self::Organization { repository, .. } => {
                repository.as_str()
            }
        }
    }

    /// Account type the reference is scoped to.
    #[must_use]
    pub const fn account_type(&self) -> ProviderAccountType {
        match self {
            Self::User { .. } => ProviderAccountType::User,
            Self::Organization { .. } => ProviderAccountType::Organization,
        }
    }

    /// `owner/repository` path as used by provider APIs.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner(), self.repository())
    }
}

impl fmt::Display for RepositoryRef {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "https://{}/{}/{}",
            self.domain(),
            self.owner(),
            self.repository()
        )
    }
}

/// Repository metadata as reported by a provider.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepositoryInfo {
    /// Repository name.
    pub name: String,
    /// Default branch, when the provider records one.
    pub default_branch: Option<String>,
    /// Visibility, when the provider reports it.
    pub visibility: Option<Visibility>,
    /// Free-form description.
    pub description: Option<String>,
    /// Browser URL.
    pub html_url: Option<String>,
}

/// License templates a repository can be initialized with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LicenseTemplate {
    /// Apache License 2.0.
    Apache2,
}

impl LicenseTemplate {
    /// Template key understood by the provider APIs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Apache2 => "apache-2.0",
        }
    }
}

/// Parameters for creating a repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateRepositoryRequest {
    /// Repository description.
    pub description: String,
    /// Requested visibility.
    pub visibility: Visibility,
    /// Whether to create an initial commit.
    pub auto_init: bool,
    /// License to seed the repository with.
    pub license_template: Option<LicenseTemplate>,
}

/// Deploy key to upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployKeyInfo {
    /// Title the key is stored under.
    pub name: String,
    /// Public key in OpenSSH format.
    pub key: Vec<u8>,
    /// Whether the key is limited to reads.
    pub read_only: bool,
}

impl DeployKeyInfo {
    /// Public key as text with surrounding whitespace removed.
    #[must_use]
    pub fn key_text(&self) -> String {
        String::from_utf8_lossy(&self.key).trim().to_owned()
    }
}

/// Deploy key as stored by the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployKey {
    /// Key title.
    pub name: String,
    /// Whether the key is limited to reads, when reported.
    pub read_only: Option<bool>,
}

/// Commit summary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Commit {
    /// Commit SHA.
    pub sha: String,
    /// Commit message.
    pub message: Option<String>,
    /// Author name.
    pub author: Option<String>,
    /// Browser URL.
    pub html_url: Option<String>,
}

/// File written (or removed) by a proposed commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitFile {
    /// Repository-relative path.
    pub path: String,
    /// New content; `None` deletes the file.
    pub content: Option<String>,
}

impl CommitFile {
    /// A file to create or overwrite.
    #[must_use]
    pub fn write(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: Some(content.into()),
        }
    }

    /// A file to delete.
    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: None,
        }
    }
}

/// Pull request (or GitLab merge request) creation parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestRequest {
    /// Title.
    pub title: String,
    /// Source branch.
    pub head: String,
    /// Branch the change merges into.
    pub base: String,
    /// Body text.
    pub description: String,
}

/// Opened pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequest {
    /// Provider-assigned number (GitLab `iid`).
    pub number: u64,
    /// Browser URL.
    pub url: String,
}

/// Everything needed to propose a change through a pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeProposal {
    /// Branch to merge into; empty selects the repository default.
    pub target_branch: String,
    /// Branch created to carry the change.
    pub new_branch: String,
    /// Files written by the commit.
    pub files: Vec<CommitFile>,
    /// Commit message.
    pub commit_message: String,
    /// Pull request title.
    pub title: String,
    /// Pull request description.
    pub description: String,
}
