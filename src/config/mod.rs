//! Application configuration loaded from CLI, environment, and files.
//!
//! This module provides a unified configuration struct that merges values
//! from command-line arguments, environment variables, and configuration
//! files using ortho-config's layered approach.
//!
//! # Precedence
//!
//! Configuration values are loaded with the following precedence (lowest to
//! highest):
//!
//! 1. **Defaults** – Built-in application defaults
//! 2. **Configuration file** – `.gitops-providers.toml` in current directory,
//!    home directory, or XDG config directory
//! 3. **Environment variables** – `GITOPS_REPO_URL`, `GITOPS_TOKEN`, or the
//!    provider's conventional `GITHUB_TOKEN` / `GITLAB_TOKEN`
//! 4. **Command-line arguments** – `--repo-url`/`-u`, `--command`/`-c`,
//!    `--token`/`-t` and friends
//!
//! # Configuration File
//!
//! Place `.gitops-providers.toml` in the current directory, home directory,
//! or XDG config directory with:
//!
//! ```toml
//! repo_url = "git@github.com:acme/fleet-infra.git"
//! command = "propose-change"
//! new_branch = "add-podinfo"
//! files = ["apps/podinfo.yaml=./podinfo.yaml"]
//! commit_message = "Add podinfo"
//! pr_title = "Add podinfo"
//! wait_timeout_seconds = 60
//! ```

use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

use crate::provider::error::ProviderError;
use crate::provider::models::Visibility;
use crate::provider::settings::ProviderSettings;
use crate::provider::token::PersonalAccessToken;
use crate::provider::url::{GitProviderName, NormalizedRepoUrl};
use crate::provider::wait::{DEFAULT_WAIT_TIMEOUT, WaitPolicy};

/// Workflow selected by the `command` setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Print what the providers report about a repository.
    Inspect,
    /// Create the repository unless it already exists.
    CreateRepository,
    /// Upload the GitOps deploy key unless it is already present.
    UploadDeployKey,
    /// Commit files on a new branch and open a pull request.
    ProposeChange,
}

impl Command {
    /// Spelling accepted on the command line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Inspect => "inspect",
            Self::CreateRepository => "create-repository",
            Self::UploadDeployKey => "upload-deploy-key",
            Self::ProposeChange => "propose-change",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for Command {
    type Err = ProviderError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "inspect" => Ok(Self::Inspect),
            "create-repository" => Ok(Self::CreateRepository),
            "upload-deploy-key" => Ok(Self::UploadDeployKey),
            "propose-change" => Ok(Self::ProposeChange),
            other => Err(ProviderError::Configuration {
                message: format!(
                    "unknown command '{other}' (expected inspect, create-repository, \
                     upload-deploy-key or propose-change)"
                ),
            }),
        }
    }
}

/// Application configuration supporting CLI, environment, and file sources.
///
/// # Environment Variables
///
/// - `GITOPS_REPO_URL` or `--repo-url`: Repository URL to operate on
/// - `GITOPS_COMMAND` or `--command`: Workflow to run
/// - `GITOPS_TOKEN`, `GITHUB_TOKEN`/`GITLAB_TOKEN`, or `--token`: Access token
/// - `GITOPS_API_BASE` or `--api-base`: Provider API endpoint override
///
/// # Example
///
/// ```no_run
/// use gitops_providers::GitopsConfig;
/// use ortho_config::OrthoConfig;
///
/// let config = GitopsConfig::load().expect("failed to load configuration");
/// let url = config.require_repo_url().expect("repository URL required");
/// let token = config.resolve_token(url.provider()).expect("token required");
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, OrthoConfig)]
#[serde(default)]
#[ortho_config(
    prefix = "GITOPS",
    discovery(
        dotfile_name = ".gitops-providers.toml",
        config_file_name = "gitops-providers.toml",
        app_name = "gitops-providers"
    )
)]
pub struct GitopsConfig {
    /// Repository URL in SCP (`git@host:owner/repo`), `ssh://` or `https://`
    /// form.
    ///
    /// Can be provided via:
    /// - CLI: `--repo-url <URL>` or `-u <URL>`
    /// - Environment: `GITOPS_REPO_URL`
    /// - Config file: `repo_url = "..."`
    #[ortho_config(cli_short = 'u')]
    pub repo_url: Option<String>,

    /// Workflow to run: `inspect`, `create-repository`, `upload-deploy-key`
    /// or `propose-change`. Defaults to `inspect`.
    ///
    /// Can be provided via:
    /// - CLI: `--command <NAME>` or `-c <NAME>`
    /// - Environment: `GITOPS_COMMAND`
    /// - Config file: `command = "..."`
    #[ortho_config(cli_short = 'c')]
    pub command: Option<String>,

    /// Personal access token for the provider API.
    ///
    /// Can be provided via:
    /// - CLI: `--token <TOKEN>` or `-t <TOKEN>`
    /// - Environment: `GITOPS_TOKEN`, or `GITHUB_TOKEN` / `GITLAB_TOKEN`
    ///   depending on the repository's provider
    /// - Config file: `token = "..."`
    #[ortho_config(cli_short = 't')]
    pub token: Option<String>,

    /// Creates repositories as public instead of private.
    ///
    /// Can be provided via:
    /// - CLI: `--public` / `-P`
    /// - Config file: `public = true`
    ///
    /// Note: Environment variable `GITOPS_PUBLIC` is not supported because
    /// `ortho_config` does not load boolean values from the environment.
    #[ortho_config(cli_short = 'P')]
    pub public: bool,

    /// Path to the public key uploaded by `upload-deploy-key`.
    ///
    /// Can be provided via:
    /// - CLI: `--deploy-key-path <PATH>` or `-k <PATH>`
    /// - Environment: `GITOPS_DEPLOY_KEY_PATH`
    /// - Config file: `deploy_key_path = "..."`
    #[ortho_config(cli_short = 'k')]
    pub deploy_key_path: Option<String>,

    /// Branch a change is proposed against. Empty means the repository's
    /// default branch.
    #[ortho_config(cli_short = 'b')]
    pub target_branch: Option<String>,

    /// Branch created to carry a proposed change.
    #[ortho_config(cli_short = 'B')]
    pub new_branch: Option<String>,

    /// Files committed by `propose-change`, each written as
    /// `repository/path=local/file`. A spec without `=local/file` deletes the
    /// repository path.
    ///
    /// Can be provided via:
    /// - CLI: `--files <SPEC>` (repeatable) or `-f <SPEC>`
    /// - Config file: `files = ["..."]`
    #[ortho_config(cli_short = 'f')]
    pub files: Vec<String>,

    /// Commit message for the proposed change.
    #[ortho_config(cli_short = 'm')]
    pub commit_message: Option<String>,

    /// Pull request title for the proposed change.
    #[ortho_config(cli_short = 'T')]
    pub pr_title: Option<String>,

    /// Pull request description for the proposed change.
    #[ortho_config(cli_short = 'D')]
    pub pr_description: Option<String>,

    /// Provider API endpoint override, for self-hosted instances.
    ///
    /// Can be provided via:
    /// - CLI: `--api-base <URL>` or `-a <URL>`
    /// - Environment: `GITOPS_API_BASE`
    /// - Config file: `api_base = "..."`
    #[ortho_config(cli_short = 'a')]
    pub api_base: Option<String>,

    /// Delay between confirmation probes after a write, in milliseconds.
    ///
    /// Defaults to one second.
    #[ortho_config(cli_short = 'i')]
    pub wait_interval_ms: u64,

    /// Upper bound on confirming a write, in seconds.
    ///
    /// Defaults to 30 seconds.
    #[ortho_config(cli_short = 'w')]
    pub wait_timeout_seconds: u64,

    /// Runs against a gateway that performs no network calls.
    ///
    /// Can be provided via:
    /// - CLI: `--dry-run` / `-n`
    /// - Config file: `dry_run = true`
    #[ortho_config(cli_short = 'n')]
    pub dry_run: bool,
}

/// Milliseconds between confirmation probes unless configured.
pub const DEFAULT_WAIT_INTERVAL_MS: u64 = 1_000;

/// Seconds allowed for confirming a write unless configured.
pub const DEFAULT_WAIT_TIMEOUT_SECONDS: u64 = DEFAULT_WAIT_TIMEOUT.as_secs();

impl Default for GitopsConfig {
    fn default() -> Self {
        Self {
            repo_url: None,
            command: None,
            token: None,
            public: false,
            deploy_key_path: None,
            target_branch: None,
            new_branch: None,
            files: Vec::new(),
            commit_message: None,
            pr_title: None,
            pr_description: None,
            api_base: None,
            wait_interval_ms: DEFAULT_WAIT_INTERVAL_MS,
            wait_timeout_seconds: DEFAULT_WAIT_TIMEOUT_SECONDS,
            dry_run: false,
        }
    }
}

impl GitopsConfig {
    /// Resolves the token from configuration or the provider's conventional
    /// environment variable.
    ///
    /// When no token is provided via `GITOPS_TOKEN`, the CLI, or a
    /// configuration file, this method falls back to `GITHUB_TOKEN` for
    /// GitHub and `GITLAB_TOKEN` for GitLab.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::MissingToken`] when no token source provides a
    /// non-blank value.
    pub fn resolve_token(
        &self,
        provider: GitProviderName,
    ) -> Result<PersonalAccessToken, ProviderError> {
        let token = self
            .token
            .clone()
            .filter(|value| !value.trim().is_empty())
            .or_else(|| {
                env::var(provider.token_env_var())
                    .ok()
                    .filter(|value| !value.trim().is_empty())
            })
            .ok_or_else(|| ProviderError::MissingToken {
                provider: provider.to_string(),
            })?;
        PersonalAccessToken::new(provider, token)
    }

    /// Parses the configured repository URL.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Configuration`] when no URL is configured and
    /// [`ProviderError::InvalidUrl`] when it cannot be normalized.
    pub fn require_repo_url(&self) -> Result<NormalizedRepoUrl, ProviderError> {
        let raw = require("repository URL", "--repo-url or -u", self.repo_url.as_deref())?;
        NormalizedRepoUrl::parse(raw)
    }

    /// Determines the workflow to run, defaulting to [`Command::Inspect`].
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Configuration`] for an unknown command name.
    pub fn command(&self) -> Result<Command, ProviderError> {
        self.command
            .as_deref()
            .map_or(Ok(Command::Inspect), str::parse)
    }

    /// Visibility given to repositories created by this run.
    #[must_use]
    pub const fn visibility(&self) -> Visibility {
        Visibility::from_private(!self.public)
    }

    /// Confirmation cadence and bound built from the wait settings.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Configuration`] when the interval is zero or
    /// longer than the timeout.
    pub fn wait_policy(&self) -> Result<WaitPolicy, ProviderError> {
        let interval = Duration::from_millis(self.wait_interval_ms);
        let timeout = Duration::from_secs(self.wait_timeout_seconds);
        if interval.is_zero() {
            return Err(ProviderError::Configuration {
                message: "wait_interval_ms must be greater than zero".to_owned(),
            });
        }
        if interval > timeout {
            return Err(ProviderError::Configuration {
                message: format!(
                    "wait_interval_ms ({}) exceeds wait_timeout_seconds ({})",
                    self.wait_interval_ms, self.wait_timeout_seconds
                ),
            });
        }
        Ok(WaitPolicy::new(interval, timeout))
    }

    /// Provider settings with the configured wait policy applied.
    ///
    /// # Errors
    ///
    /// Propagates [`GitopsConfig::wait_policy`] failures.
    pub fn provider_settings(&self) -> Result<ProviderSettings, ProviderError> {
        Ok(ProviderSettings {
            wait: self.wait_policy()?,
            ..ProviderSettings::default()
        })
    }

    /// Returns the deploy key path or an error if missing.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Configuration`] when no path is configured.
    pub fn require_deploy_key_path(&self) -> Result<&str, ProviderError> {
        require(
            "deploy key path",
            "--deploy-key-path or -k",
            self.deploy_key_path.as_deref(),
        )
    }

    /// Returns the branch to create for a proposed change.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Configuration`] when no branch is configured.
    pub fn require_new_branch(&self) -> Result<&str, ProviderError> {
        require("new branch", "--new-branch or -B", self.new_branch.as_deref())
    }

    /// Returns the commit message for a proposed change.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Configuration`] when no message is configured.
    pub fn require_commit_message(&self) -> Result<&str, ProviderError> {
        require(
            "commit message",
            "--commit-message or -m",
            self.commit_message.as_deref(),
        )
    }

    /// Pull request title, falling back to the commit message.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Configuration`] when neither is configured.
    pub fn pr_title_or_commit_message(&self) -> Result<&str, ProviderError> {
        match self.pr_title.as_deref().filter(|title| !title.trim().is_empty()) {
            Some(title) => Ok(title),
            None => self.require_commit_message(),
        }
    }

    /// Target branch for a proposed change; empty selects the default branch.
    #[must_use]
    pub fn target_branch(&self) -> &str {
        self.target_branch.as_deref().unwrap_or_default().trim()
    }
}

fn require<'value>(
    name: &str,
    flags: &str,
    value: Option<&'value str>,
) -> Result<&'value str, ProviderError> {
    value
        .map(str::trim)
        .filter(|candidate| !candidate.is_empty())
        .ok_or_else(|| ProviderError::Configuration {
            message: format!("{name} is required (use {flags})"),
        })
}

#[cfg(test)]
mod tests;
