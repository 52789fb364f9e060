//! Proposing changes through a branch, a commit and a pull request.

use tracing::debug;

use super::GitProvider;
use super::error::ProviderError;
use super::gateway::ProviderGateway;
use super::models::{ChangeProposal, Commit, PullRequest, PullRequestRequest, RepositoryRef};
use super::repository::FALLBACK_DEFAULT_BRANCH;

/// Commits fetched when locating the head of the target branch.
const HEAD_PAGE_SIZE: u32 = 1;
const FIRST_PAGE: u32 = 1;

impl<Gateway> GitProvider<'_, Gateway>
where
    Gateway: ProviderGateway + ?Sized,
{
    /// Opens a pull request carrying `proposal.files` from a new branch.
    ///
    /// Steps run strictly in order: resolve the target branch, read its head
    /// commit, create the new branch, commit the files, open the pull request.
    /// A failure stops the sequence; branches and commits created by earlier
    /// steps are left in place.
    ///
    /// # Errors
    ///
    /// Returns a wrapped [`ProviderError::TargetBranchMissing`] when the
    /// target branch has no commits, otherwise the wrapped failure of
    /// whichever step failed.
    pub async fn propose_change(
        &self,
        reference: &RepositoryRef,
        proposal: &ChangeProposal,
    ) -> Result<PullRequest, ProviderError> {
        let full_name = reference.full_name();
        let info = self
            .gateway
            .repository(reference)
            .await
            .map_err(|error| error.within(format!("error getting repository {full_name}")))?;

        let target_branch = if proposal.target_branch.is_empty() {
            info.default_branch
                .unwrap_or_else(|| FALLBACK_DEFAULT_BRANCH.to_owned())
        } else {
            proposal.target_branch.clone()
        };
        let new_branch = proposal.new_branch.as_str();

        let commits = self
            .list_commits(reference, &target_branch, HEAD_PAGE_SIZE, FIRST_PAGE)
            .await?;
        let Some(head) = commits.first() else {
            return Err(ProviderError::TargetBranchMissing {
                branch: target_branch.clone(),
            }
            .within(format!("error proposing change to {full_name}")));
        };
        debug!(repository = %reference, branch = %target_branch, sha = %head.sha, "found target head");

        self.gateway
            .create_branch(reference, new_branch, &head.sha)
            .await
            .map_err(|error| {
                error.within(format!(
                    "error creating branch {new_branch} for repository {full_name}"
                ))
            })?;

        self.gateway
            .create_commit(
                reference,
                new_branch,
                &head.sha,
                &proposal.commit_message,
                &proposal.files,
            )
            .await
            .map_err(|error| {
                error.within(format!(
                    "error creating commit on branch {new_branch} for repository {full_name}"
                ))
            })?;

        let request = PullRequestRequest {
            title: proposal.title.clone(),
            head: new_branch.to_owned(),
            base: target_branch.clone(),
            description: proposal.description.clone(),
        };
        self.gateway
            .create_pull_request(reference, &request)
            .await
            .map_err(|error| {
                error.within(format!(
                    "error creating pull request from {new_branch} to {target_branch} \
                     for repository {full_name}"
                ))
            })
    }

    /// Lists one page of commits on `branch`. Pages are 1-based.
    ///
    /// # Errors
    ///
    /// Returns the wrapped gateway failure.
    pub async fn list_commits(
        &self,
        reference: &RepositoryRef,
        branch: &str,
        page_size: u32,
        page: u32,
    ) -> Result<Vec<Commit>, ProviderError> {
        self.gateway
            .list_commits(reference, branch, page_size, page)
            .await
            .map_err(|error| {
                error.within(format!(
                    "error getting commits for repository {} branch {branch}",
                    reference.full_name()
                ))
            })
    }
}
