//! Uploads the GitOps deploy key unless it is already present.

use std::fs;
use std::io::Write;

use gitops_providers::{GitProvider, NormalizedRepoUrl, ProviderError, ProviderGateway};

use super::output::write_provisioning;

/// Reads the public key at `key_path` and uploads it when missing.
///
/// # Errors
///
/// Returns [`ProviderError::Io`] when the key cannot be read and propagates
/// provider failures.
pub async fn run<Gateway, W>(
    provider: &GitProvider<'_, Gateway>,
    url: &NormalizedRepoUrl,
    key_path: &str,
    writer: &mut W,
) -> Result<(), ProviderError>
where
    Gateway: ProviderGateway + ?Sized,
    W: Write,
{
    let public_key = fs::read(key_path).map_err(|error| ProviderError::Io {
        message: format!("could not read deploy key {key_path}: {error}"),
    })?;
    let owner = url.owner();
    let name = url.repository_name();
    let subject = format!(
        "Deploy key {} on {owner}/{name}",
        provider.settings().deploy_key_name
    );

    if provider.deploy_key_exists(owner, name).await? {
        return write_provisioning(writer, &subject, true);
    }
    provider.upload_deploy_key(owner, name, &public_key).await?;
    write_provisioning(writer, &subject, false)
}
