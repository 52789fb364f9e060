//! Account type resolution.

use tracing::debug;

use super::GitProvider;
use super::error::ProviderError;
use super::gateway::ProviderGateway;
use super::models::{ProviderAccountType, RepositoryRef};

impl<Gateway> GitProvider<'_, Gateway>
where
    Gateway: ProviderGateway + ?Sized,
{
    /// Determines whether `owner` is a personal account or an organization.
    ///
    /// A successful organization lookup means [`ProviderAccountType::Organization`];
    /// a not-found answer (including GitLab's group-not-found) means
    /// [`ProviderAccountType::User`]. The result is not cached.
    ///
    /// # Errors
    ///
    /// Any other lookup failure is returned unchanged.
    pub async fn account_type(&self, owner: &str) -> Result<ProviderAccountType, ProviderError> {
        let account_type = match self.gateway.organization(owner).await {
            Ok(()) => ProviderAccountType::Organization,
            Err(error) if error.is_not_found() => ProviderAccountType::User,
            Err(error) => return Err(error),
        };
        debug!(owner, %account_type, provider = %self.provider, "resolved account type");
        Ok(account_type)
    }

    /// Resolves the account type of `owner` and scopes a reference to it.
    ///
    /// # Errors
    ///
    /// Propagates failures from [`Self::account_type`], annotated with the
    /// owner.
    pub async fn repository_ref(
        &self,
        owner: &str,
        name: &str,
    ) -> Result<RepositoryRef, ProviderError> {
        let account_type = self
            .account_type(owner)
            .await
            .map_err(|error| error.within(format!("could not get account type for {owner}")))?;
        Ok(RepositoryRef::for_account(
            account_type,
            self.provider_domain(),
            owner,
            name,
        ))
    }
}
