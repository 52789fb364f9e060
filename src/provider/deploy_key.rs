//! Deploy key provisioning.

use tracing::{debug, info};

use super::GitProvider;
use super::error::ProviderError;
use super::gateway::ProviderGateway;
use super::models::DeployKeyInfo;
use super::wait::wait_until;

impl<Gateway> GitProvider<'_, Gateway>
where
    Gateway: ProviderGateway + ?Sized,
{
    /// Reports whether the configured deploy key is present on `owner/repo`.
    ///
    /// A "key is already in use" answer counts as present.
    ///
    /// # Errors
    ///
    /// Returns wrapped account type or repository failures, and any deploy
    /// key failure other than not-found or key-in-use.
    pub async fn deploy_key_exists(&self, owner: &str, repo: &str) -> Result<bool, ProviderError> {
        let reference = self.repository_ref(owner, repo).await?;
        self.gateway
            .repository(&reference)
            .await
            .map_err(|error| error.within(format!("error getting repository {owner}/{repo}")))?;

        let key_name = self.settings.deploy_key_name.as_str();
        match self.gateway.deploy_key(&reference, key_name).await {
            Ok(_) => Ok(true),
            Err(error) if error.is_key_in_use() => {
                debug!(repository = %reference, %error, "deploy key already in use");
                Ok(true)
            }
            Err(error) if error.is_not_found() => Ok(false),
            Err(error) => Err(error.within(format!(
                "error getting deploy key {key_name} for repository {owner}/{repo}"
            ))),
        }
    }

    /// Uploads `public_key` as a writable deploy key and waits until the
    /// provider serves it.
    ///
    /// # Errors
    ///
    /// Returns the wrapped upload failure, or a wrapped
    /// [`ProviderError::Timeout`] when the key never became readable.
    pub async fn upload_deploy_key(
        &self,
        owner: &str,
        repo: &str,
        public_key: &[u8],
    ) -> Result<(), ProviderError> {
        let reference = self.repository_ref(owner, repo).await?;
        self.gateway
            .repository(&reference)
            .await
            .map_err(|error| error.within(format!("error getting repository {owner}/{repo}")))?;

        let key_name = self.settings.deploy_key_name.as_str();
        let key = DeployKeyInfo {
            name: key_name.to_owned(),
            key: public_key.to_vec(),
            read_only: false,
        };

        info!(repository = %reference, key = key_name, "uploading deploy key");
        self.gateway
            .create_deploy_key(&reference, &key)
            .await
            .map_err(|error| {
                error.within(format!(
                    "error uploading deploy key {key_name} to repository {owner}/{repo}"
                ))
            })?;

        let gateway = self.gateway;
        let probe_ref = &reference;
        wait_until(self.settings.wait, "deploy key upload", || async move {
            gateway.deploy_key(probe_ref, key_name).await.map(|_| ())
        })
        .await
        .map_err(|error| {
            error.within(format!(
                "error verifying deploy key {key_name} exists for repository {owner}/{repo}"
            ))
        })
    }
}
