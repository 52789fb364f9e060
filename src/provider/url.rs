//! Repository URL normalization and provider detection.
//!
//! Users hand the tool repository URLs in several shapes: `ssh://` URLs,
//! `https://` URLs, and the git-scp shorthand `git@host:owner/repo`, with or
//! without a `.git` suffix. [`NormalizedRepoUrl`] folds all of them into one
//! canonical SSH-form identity.
//!
//! # Example
//!
//! ```
//! use gitops_providers::{GitProviderName, NormalizedRepoUrl, RepositoryUrlProtocol};
//!
//! let url = NormalizedRepoUrl::parse("git@github.com:acme/widgets")
//!     .expect("should normalize scp shorthand");
//! assert_eq!(url.as_str(), "ssh://git@github.com/acme/widgets.git");
//! assert_eq!(url.owner(), "acme");
//! assert_eq!(url.repository_name(), "widgets");
//! assert_eq!(url.provider(), GitProviderName::GitHub);
//! assert_eq!(url.protocol(), RepositoryUrlProtocol::Ssh);
//! ```

use std::fmt;
use std::hash::{Hash, Hasher};

use url::Url;

use super::error::ProviderError;

const GIT_SUFFIX: &str = ".git";
const SCP_USER_PREFIX: &str = "git@";

/// Supported git hosting providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GitProviderName {
    /// github.com
    GitHub,
    /// gitlab.com
    GitLab,
}

impl GitProviderName {
    /// Short lowercase provider name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::GitHub => "github",
            Self::GitLab => "gitlab",
        }
    }

    /// Hostname repositories of this provider live under.
    #[must_use]
    pub const fn domain(self) -> &'static str {
        match self {
            Self::GitHub => "github.com",
            Self::GitLab => "gitlab.com",
        }
    }

    /// REST API base used when no override is configured.
    #[must_use]
    pub const fn default_api_base(self) -> &'static str {
        match self {
            Self::GitHub => "https://api.github.com",
            Self::GitLab => "https://gitlab.com/api/v4",
        }
    }

    /// Environment variable conventionally holding a token for this provider.
    #[must_use]
    pub const fn token_env_var(self) -> &'static str {
        match self {
            Self::GitHub => "GITHUB_TOKEN",
            Self::GitLab => "GITLAB_TOKEN",
        }
    }

    fn from_host(host: &str) -> Option<Self> {
        if host.eq_ignore_ascii_case(Self::GitHub.domain()) {
            Some(Self::GitHub)
        } else if host.eq_ignore_ascii_case(Self::GitLab.domain()) {
            Some(Self::GitLab)
        } else {
            None
        }
    }
}

impl fmt::Display for GitProviderName {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Transport of the normalized repository URL.
///
/// Provider HTTPS URLs normalize to SSH, so `Https` only survives for inputs
/// that keep their own form, such as ones carrying credentials or a port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryUrlProtocol {
    /// `ssh://` or git-scp shorthand.
    Ssh,
    /// `https://`.
    Https,
}

impl fmt::Display for RepositoryUrlProtocol {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(match self {
            Self::Ssh => "ssh",
            Self::Https => "https",
        })
    }
}

/// Canonical identity of a hosted repository.
///
/// Two values are equal exactly when their canonical SSH strings are equal;
/// the raw input is kept for display only.
#[derive(Debug, Clone)]
pub struct NormalizedRepoUrl {
    provider: GitProviderName,
    owner: String,
    repository_name: String,
    protocol: RepositoryUrlProtocol,
    url: Url,
    canonical: String,
    raw: String,
}

impl NormalizedRepoUrl {
    /// Parses and normalizes a repository URL.
    ///
    /// GitLab namespaces may nest: every path segment between the host and
    /// the repository becomes part of the owner (`group/subgroup`). GitHub has
    /// no nesting, so more than two path segments are rejected.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::InvalidUrl`] when the input cannot be parsed,
    /// uses a scheme other than `ssh`/`https`, names an unknown host, or lacks
    /// an owner and repository.
    pub fn parse(raw: &str) -> Result<Self, ProviderError> {
        let trimmed = raw.trim().trim_end_matches('/');
        let parsed_raw = parse_with_scp_rewrite(trimmed)?;
        let provider = provider_for(&parsed_raw, trimmed)?;

        let normalized = normalize_repo_url_string(trimmed, provider);
        let url = Url::parse(&normalized)
            .map_err(|error| ProviderError::InvalidUrl(format!("{normalized}: {error}")))?;
        let protocol = if url.scheme() == "https" {
            RepositoryUrlProtocol::Https
        } else {
            RepositoryUrlProtocol::Ssh
        };

        let owner = owner_from_url(&url, provider)?;
        let repository_name = url_to_repo_name(trimmed);
        if repository_name.is_empty() {
            return Err(ProviderError::InvalidUrl(format!(
                "could not get repository name from {raw}"
            )));
        }

        let canonical = canonical_string(provider, &owner, &repository_name);

        Ok(Self {
            provider,
            owner,
            repository_name,
            protocol,
            url,
            canonical,
            raw: raw.to_owned(),
        })
    }

    /// Provider hosting the repository.
    #[must_use]
    pub const fn provider(&self) -> GitProviderName {
        self.provider
    }

    /// Owning user, organization, or GitLab group path.
    #[must_use]
    pub const fn owner(&self) -> &str {
        self.owner.as_str()
    }

    /// Repository name without a `.git` suffix.
    #[must_use]
    pub const fn repository_name(&self) -> &str {
        self.repository_name.as_str()
    }

    /// Protocol of the normalized URL.
    #[must_use]
    pub const fn protocol(&self) -> RepositoryUrlProtocol {
        self.protocol
    }

    /// Parsed form of the normalized URL.
    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }

    /// Canonical `ssh://git@<host>/<owner>/<repo>.git` string.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.canonical.as_str()
    }

    /// The input this value was parsed from.
    #[must_use]
    pub const fn raw(&self) -> &str {
        self.raw.as_str()
    }
}

impl fmt::Display for NormalizedRepoUrl {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.canonical)
    }
}

impl PartialEq for NormalizedRepoUrl {
    fn eq(&self, other: &Self) -> bool {
        self.canonical == other.canonical
    }
}

impl Eq for NormalizedRepoUrl {}

impl Hash for NormalizedRepoUrl {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical.hash(state);
    }
}

/// Detects which provider hosts the repository behind `raw`.
///
/// # Errors
///
/// Returns [`ProviderError::InvalidUrl`] when the URL cannot be parsed or its
/// host is neither GitHub nor GitLab.
pub fn detect_provider(raw: &str) -> Result<GitProviderName, ProviderError> {
    let parsed = parse_with_scp_rewrite(raw)?;
    provider_for(&parsed, raw)
}

/// Extracts the repository name from a URL, dropping path and `.git`.
#[must_use]
pub fn url_to_repo_name(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    let base = trimmed.rsplit(['/', ':']).next().unwrap_or(trimmed);
    base.strip_suffix(GIT_SUFFIX).unwrap_or(base).to_owned()
}

/// Rewrites `git@host:owner/repo` into `ssh://git@host/owner/repo` so that a
/// URL parser accepts it; other inputs are returned unchanged.
fn rewrite_scp_shorthand(raw: &str) -> String {
    raw.strip_prefix(SCP_USER_PREFIX)
        .and_then(|rest| rest.split_once(':'))
        .map_or_else(
            || raw.to_owned(),
            |(host, path)| format!("ssh://{SCP_USER_PREFIX}{host}/{path}"),
        )
}

fn parse_with_scp_rewrite(raw: &str) -> Result<Url, ProviderError> {
    let rewritten = rewrite_scp_shorthand(raw);
    let parsed = Url::parse(&rewritten).map_err(|error| {
        ProviderError::InvalidUrl(format!("could not parse git repo url {raw:?}: {error}"))
    })?;

    match parsed.scheme() {
        "ssh" | "https" => Ok(parsed),
        other => Err(ProviderError::InvalidUrl(format!(
            "unsupported scheme {other:?} in {raw:?}"
        ))),
    }
}

fn provider_for(parsed: &Url, raw: &str) -> Result<GitProviderName, ProviderError> {
    parsed
        .host_str()
        .and_then(GitProviderName::from_host)
        .ok_or_else(|| ProviderError::InvalidUrl(format!("no git providers found for {raw:?}")))
}

/// Folds the scp and HTTPS spellings into `ssh://git@<host>/...`, appending
/// `.git` when missing. Inputs already in another form pass through with only
/// the suffix added.
fn normalize_repo_url_string(raw: &str, provider: GitProviderName) -> String {
    let with_suffix = if raw.ends_with(GIT_SUFFIX) {
        raw.to_owned()
    } else {
        format!("{raw}{GIT_SUFFIX}")
    };

    let domain = provider.domain();
    let ssh_prefix = format!("{SCP_USER_PREFIX}{domain}:");
    let https_prefix = format!("https://{domain}/");

    strip_prefix_ignore_case(&with_suffix, &ssh_prefix)
        .or_else(|| strip_prefix_ignore_case(&with_suffix, &https_prefix))
        .filter(|path| !path.is_empty())
        .map_or_else(
            || with_suffix.clone(),
            |path| format!("ssh://{SCP_USER_PREFIX}{domain}/{path}"),
        )
}

/// Host names are case-insensitive, so the scp and HTTPS prefixes are too.
fn strip_prefix_ignore_case<'input>(value: &'input str, prefix: &str) -> Option<&'input str> {
    let head = value.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| value.get(prefix.len()..))
        .flatten()
}

fn owner_from_url(url: &Url, provider: GitProviderName) -> Result<String, ProviderError> {
    let segments: Vec<&str> = url
        .path_segments()
        .map(|segments| segments.filter(|segment| !segment.is_empty()).collect())
        .unwrap_or_default();

    let Some((_repository, namespace)) = segments.split_last() else {
        return Err(missing_owner(url));
    };

    match (provider, namespace) {
        (_, []) => Err(missing_owner(url)),
        (GitProviderName::GitHub, [owner]) => Ok((*owner).to_owned()),
        (GitProviderName::GitHub, _) => Err(ProviderError::InvalidUrl(format!(
            "GitHub repository URLs take the form owner/repository: {url}"
        ))),
        (GitProviderName::GitLab, groups) => Ok(groups.join("/")),
    }
}

fn missing_owner(url: &Url) -> ProviderError {
    ProviderError::InvalidUrl(format!("could not get owner from url {url}"))
}

fn canonical_string(provider: GitProviderName, owner: &str, repository_name: &str) -> String {
    format!(
        "ssh://{SCP_USER_PREFIX}{domain}/{owner}/{repository_name}{GIT_SUFFIX}",
        domain = provider.domain()
    )
}
