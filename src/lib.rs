//! Git hosting provider layer for a GitOps command-line tool.
//!
//! The library normalizes repository URLs, resolves whether an owner is a
//! user or an organization, and drives the provider workflows a GitOps
//! bootstrap needs: creating repositories, provisioning deploy keys and
//! proposing changes through pull requests. GitHub is reached through
//! Octocrab and GitLab through its REST API; writes the providers publish
//! eventually are confirmed by polling with a bounded wait.

pub mod config;
pub mod provider;

pub use config::GitopsConfig;
pub use provider::GitProvider;
pub use provider::error::ProviderError;
pub use provider::gateway::{
    DryRunGateway, GitLabGateway, OctocrabGitHubGateway, ProviderGateway, build_gateway,
};
pub use provider::models::{
    ChangeProposal, Commit, CommitFile, CreateRepositoryRequest, DeployKey, DeployKeyInfo,
    LicenseTemplate, ProviderAccountType, PullRequest, PullRequestRequest, RepositoryInfo,
    RepositoryRef, Visibility,
};
pub use provider::settings::ProviderSettings;
pub use provider::token::PersonalAccessToken;
pub use provider::url::{GitProviderName, NormalizedRepoUrl, RepositoryUrlProtocol};
pub use provider::wait::WaitPolicy;
