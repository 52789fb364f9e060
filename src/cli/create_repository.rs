//! Creates the repository unless it already exists.

use std::io::Write;

use gitops_providers::{
    GitProvider, NormalizedRepoUrl, ProviderError, ProviderGateway, Visibility,
};

use super::output::write_provisioning;

/// Creates `url`'s repository with `visibility` when it is missing.
///
/// # Errors
///
/// Propagates provider failures and confirmation timeouts.
pub async fn run<Gateway, W>(
    provider: &GitProvider<'_, Gateway>,
    url: &NormalizedRepoUrl,
    visibility: Visibility,
    writer: &mut W,
) -> Result<(), ProviderError>
where
    Gateway: ProviderGateway + ?Sized,
    W: Write,
{
    let owner = url.owner();
    let name = url.repository_name();
    let subject = format!("Repository {owner}/{name}");

    if provider.repository_exists(name, owner).await? {
        return write_provisioning(writer, &subject, true);
    }
    provider.create_repository(name, owner, visibility).await?;
    write_provisioning(writer, &subject, false)
}
