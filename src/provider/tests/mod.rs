//! Unit tests for the provider facade.

use std::time::Duration;

use super::GitProvider;
use super::error::ProviderError;
use super::gateway::MockProviderGateway;
use super::models::RepositoryInfo;
use super::settings::ProviderSettings;
use super::url::GitProviderName;
use super::wait::WaitPolicy;

mod deploy_key;

/// Settings with a short wait bound so timeouts resolve quickly under a
/// paused clock.
fn quick_settings() -> ProviderSettings {
    ProviderSettings {
        wait: WaitPolicy::new(Duration::from_secs(1), Duration::from_secs(3)),
        ..ProviderSettings::default()
    }
}

fn github_provider(gateway: &MockProviderGateway) -> GitProvider<'_, MockProviderGateway> {
    GitProvider::new(gateway, GitProviderName::GitHub, quick_settings())
}

fn gitlab_provider(gateway: &MockProviderGateway) -> GitProvider<'_, MockProviderGateway> {
    GitProvider::new(gateway, GitProviderName::GitLab, quick_settings())
}

fn not_found() -> ProviderError {
    ProviderError::NotFound {
        message: "Not Found".to_owned(),
    }
}

fn sample_info(default_branch: Option<&str>) -> RepositoryInfo {
    RepositoryInfo {
        name: "widgets".to_owned(),
        default_branch: default_branch.map(ToOwned::to_owned),
        ..RepositoryInfo::default()
    }
}

/// Expects one organization lookup for `owner` answering as `is_org`.
fn expect_account(gateway: &mut MockProviderGateway, owner: &'static str, is_org: bool) {
    gateway
        .expect_organization()
        .withf(move |name| name == owner)
        .times(1)
        .returning(move |_| if is_org { Ok(()) } else { Err(not_found()) });
}
