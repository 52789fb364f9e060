//! Commits files on a new branch and opens a pull request.

use std::io::Write;

use gitops_providers::{
    ChangeProposal, CommitFile, GitProvider, NormalizedRepoUrl, ProviderError, ProviderGateway,
};

use super::output::write_pull_request;

/// Text describing the change, taken from configuration.
#[derive(Debug, Clone, Copy)]
pub struct ChangeText<'config> {
    /// Branch proposed against; empty selects the default branch.
    pub target_branch: &'config str,
    /// Branch created for the change.
    pub new_branch: &'config str,
    /// Commit message.
    pub commit_message: &'config str,
    /// Pull request title.
    pub title: &'config str,
    /// Pull request description.
    pub description: &'config str,
}

/// Proposes `files` against `url`'s repository and prints the pull request.
///
/// # Errors
///
/// Propagates provider failures, including a target branch without commits.
pub async fn run<Gateway, W>(
    provider: &GitProvider<'_, Gateway>,
    url: &NormalizedRepoUrl,
    text: ChangeText<'_>,
    files: Vec<CommitFile>,
    writer: &mut W,
) -> Result<(), ProviderError>
where
    Gateway: ProviderGateway + ?Sized,
    W: Write,
{
    let repository = provider
        .repository_ref(url.owner(), url.repository_name())
        .await?;
    let proposal = ChangeProposal {
        target_branch: text.target_branch.to_owned(),
        new_branch: text.new_branch.to_owned(),
        files,
        commit_message: text.commit_message.to_owned(),
        title: text.title.to_owned(),
        description: text.description.to_owned(),
    };

    let pull_request = provider.propose_change(&repository, &proposal).await?;
    write_pull_request(writer, &pull_request)
}
