//! Repository existence, creation and metadata.

use tracing::{debug, info};

use super::GitProvider;
use super::error::ProviderError;
use super::gateway::ProviderGateway;
use super::models::{
    CreateRepositoryRequest, LicenseTemplate, ProviderAccountType, RepositoryInfo, RepositoryRef,
    Visibility,
};
use super::url::NormalizedRepoUrl;
use super::wait::wait_until;

/// Branch reported when the provider records no default branch.
pub const FALLBACK_DEFAULT_BRANCH: &str = "main";

impl<Gateway> GitProvider<'_, Gateway>
where
    Gateway: ProviderGateway + ?Sized,
{
    /// Reports whether `owner/name` can be fetched.
    ///
    /// Any failure of the fetch itself counts as absence; callers cannot tell
    /// a transient error from a missing repository here.
    ///
    /// # Errors
    ///
    /// Returns an error only when the owner's account type cannot be
    /// resolved.
    pub async fn repository_exists(&self, name: &str, owner: &str) -> Result<bool, ProviderError> {
        let reference = self.repository_ref(owner, name).await?;
        match self.gateway.repository(&reference).await {
            Ok(_) => Ok(true),
            Err(error) => {
                debug!(repository = %reference, %error, "repository fetch failed; treating as absent");
                Ok(false)
            }
        }
    }

    /// Creates `owner/name` and waits until the provider serves it.
    ///
    /// The repository is auto-initialised with an Apache-2.0 license and the
    /// configured description.
    ///
    /// # Errors
    ///
    /// Returns the wrapped creation failure, or a wrapped
    /// [`ProviderError::Timeout`] when the repository never became readable.
    pub async fn create_repository(
        &self,
        name: &str,
        owner: &str,
        visibility: Visibility,
    ) -> Result<(), ProviderError> {
        let reference = self.repository_ref(owner, name).await?;
        let request = CreateRepositoryRequest {
            description: self.settings.repository_description.clone(),
            visibility,
            auto_init: true,
            license_template: Some(LicenseTemplate::Apache2),
        };

        info!(repository = %reference, %visibility, "creating repository");
        self.gateway
            .create_repository(&reference, &request)
            .await
            .map_err(|error| error.within(format!("error creating repository {owner}/{name}")))?;

        let gateway = self.gateway;
        let probe_ref = &reference;
        wait_until(self.settings.wait, "repository creation", || async move {
            gateway.repository(probe_ref).await.map(|_| ())
        })
        .await
        .map_err(|error| error.within(format!("could not verify repository {owner}/{name} exists")))
    }

    /// Fetches metadata for `owner/name` scoped by a known account type.
    ///
    /// # Errors
    ///
    /// Returns the wrapped gateway failure.
    pub async fn repository_info(
        &self,
        account_type: ProviderAccountType,
        owner: &str,
        name: &str,
    ) -> Result<RepositoryInfo, ProviderError> {
        let reference =
            RepositoryRef::for_account(account_type, self.provider_domain(), owner, name);
        self.gateway
            .repository(&reference)
            .await
            .map_err(|error| error.within(format!("error getting repository {owner}/{name}")))
    }

    /// Fetches metadata for the repository a normalized URL points at.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::InvalidUrl`] when the URL belongs to another
    /// provider, and propagates account type and fetch failures.
    pub async fn repository_info_from_url(
        &self,
        url: &NormalizedRepoUrl,
    ) -> Result<RepositoryInfo, ProviderError> {
        if url.provider() != self.provider {
            return Err(ProviderError::InvalidUrl(format!(
                "{url} is hosted on {}, not {}",
                url.provider(),
                self.provider
            )));
        }

        let account_type = self
            .account_type(url.owner())
            .await
            .map_err(|error| error.within(format!("could not get account type for {}", url.owner())))?;
        self.repository_info(account_type, url.owner(), url.repository_name())
            .await
    }

    /// Default branch of the repository, or `main` when none is recorded.
    ///
    /// # Errors
    ///
    /// Propagates failures from [`Self::repository_info_from_url`].
    pub async fn default_branch(&self, url: &NormalizedRepoUrl) -> Result<String, ProviderError> {
        let info = self.repository_info_from_url(url).await?;
        Ok(info
            .default_branch
            .unwrap_or_else(|| FALLBACK_DEFAULT_BRANCH.to_owned()))
    }

    /// Visibility of the repository.
    ///
    /// # Errors
    ///
    /// Propagates failures from [`Self::repository_info_from_url`] and returns
    /// [`ProviderError::Api`] when the provider does not report a visibility.
    pub async fn repository_visibility(
        &self,
        url: &NormalizedRepoUrl,
    ) -> Result<Visibility, ProviderError> {
        self.repository_info_from_url(url)
            .await?
            .visibility
            .ok_or_else(|| ProviderError::Api {
                message: format!("unable to obtain repository visibility for: {url}"),
            })
    }
}
