//! Reports what the provider knows about a repository.

use std::io::Write;

use gitops_providers::{GitProvider, NormalizedRepoUrl, ProviderError, ProviderGateway};

use super::output::{Inspection, write_inspection};

/// Resolves the owner's account type, default branch and visibility.
///
/// # Errors
///
/// Propagates provider failures, including a repository that reports no
/// visibility.
pub async fn run<Gateway, W>(
    provider: &GitProvider<'_, Gateway>,
    url: &NormalizedRepoUrl,
    writer: &mut W,
) -> Result<(), ProviderError>
where
    Gateway: ProviderGateway + ?Sized,
    W: Write,
{
    let account_type = provider.account_type(url.owner()).await?;
    let default_branch = provider.default_branch(url).await?;
    let visibility = provider.repository_visibility(url).await?;

    write_inspection(
        writer,
        &Inspection {
            url,
            account_type,
            default_branch,
            visibility,
        },
    )
}
