//! CLI command handlers.
//!
//! This module contains the implementations for each configured command:
//! - [`inspect`]: Report account type, default branch and visibility
//! - [`create_repository`]: Create the repository unless it exists
//! - [`deploy_key`]: Upload the GitOps deploy key unless it is present
//! - [`propose_change`]: Commit files on a new branch and open a pull request
//!
//! Output formatting utilities are in [`output`]; `--files` parsing is in
//! [`files`].

use std::io::Write;

use gitops_providers::config::Command;
use gitops_providers::{
    DryRunGateway, GitProvider, GitProviderName, GitopsConfig, ProviderError, ProviderGateway,
    build_gateway,
};
use tracing::info;

pub mod create_repository;
pub mod deploy_key;
pub mod files;
pub mod inspect;
pub mod output;
pub mod propose_change;

/// Runs the configured command, writing its report to `writer`.
///
/// # Errors
///
/// Returns configuration errors for missing or invalid settings and
/// propagates provider failures.
pub async fn run<W: Write>(config: &GitopsConfig, writer: &mut W) -> Result<(), ProviderError> {
    let command = config.command()?;
    let url = config.require_repo_url()?;
    let settings = config.provider_settings()?;
    let gateway = connect(config, url.provider())?;
    let provider = GitProvider::new(gateway.as_ref(), url.provider(), settings);
    info!(%command, repository = %url, dry_run = config.dry_run, "running command");

    match command {
        Command::Inspect => inspect::run(&provider, &url, writer).await,
        Command::CreateRepository => {
            create_repository::run(&provider, &url, config.visibility(), writer).await
        }
        Command::UploadDeployKey => {
            let key_path = config.require_deploy_key_path()?;
            deploy_key::run(&provider, &url, key_path, writer).await
        }
        Command::ProposeChange => {
            let text = propose_change::ChangeText {
                target_branch: config.target_branch(),
                new_branch: config.require_new_branch()?,
                commit_message: config.require_commit_message()?,
                title: config.pr_title_or_commit_message()?,
                description: config.pr_description.as_deref().unwrap_or_default(),
            };
            let commit_files = files::load_commit_files(&config.files)?;
            propose_change::run(&provider, &url, text, commit_files, writer).await
        }
    }
}

/// Builds the gateway for `provider`, or a network-free one for dry runs.
fn connect(
    config: &GitopsConfig,
    provider: GitProviderName,
) -> Result<Box<dyn ProviderGateway>, ProviderError> {
    if config.dry_run {
        return Ok(Box::new(DryRunGateway::new(provider)));
    }
    let token = config.resolve_token(provider)?;
    build_gateway(provider, &token, config.api_base.as_deref())
}
