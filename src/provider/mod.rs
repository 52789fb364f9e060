//! Git hosting provider abstraction.
//!
//! [`GitProvider`] drives the multi-step workflows (repository creation,
//! deploy key provisioning, proposing changes through pull requests) on top of
//! a [`ProviderGateway`], which performs the individual remote calls. Writes
//! that providers publish eventually are confirmed with [`wait::wait_until`].

mod account;
mod deploy_key;
pub mod error;
pub mod gateway;
pub mod models;
mod pull_request;
mod repository;
pub mod settings;
pub mod token;
pub mod url;
pub mod wait;

#[cfg(test)]
mod tests;

use self::gateway::ProviderGateway;
use self::settings::ProviderSettings;
use self::url::GitProviderName;

/// Provider-agnostic facade over a gateway.
pub struct GitProvider<'client, Gateway>
where
    Gateway: ProviderGateway + ?Sized,
{
    gateway: &'client Gateway,
    provider: GitProviderName,
    settings: ProviderSettings,
}

impl<'client, Gateway> GitProvider<'client, Gateway>
where
    Gateway: ProviderGateway + ?Sized,
{
    /// Create a facade for `provider` using the given gateway and settings.
    #[must_use]
    pub const fn new(
        gateway: &'client Gateway,
        provider: GitProviderName,
        settings: ProviderSettings,
    ) -> Self {
        Self {
            gateway,
            provider,
            settings,
        }
    }

    /// Provider this facade talks to.
    #[must_use]
    pub const fn provider(&self) -> GitProviderName {
        self.provider
    }

    /// Hostname of the provider, e.g. `github.com`.
    #[must_use]
    pub const fn provider_domain(&self) -> &'static str {
        self.provider.domain()
    }

    /// Settings applied to every workflow.
    #[must_use]
    pub const fn settings(&self) -> &ProviderSettings {
        &self.settings
    }
}
