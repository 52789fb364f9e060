//! HTTP client construction helpers for gateway implementations.

use std::time::Duration;

use http::Uri;
use octocrab::Octocrab;
use reqwest::Client;
use url::Url;

use crate::provider::error::ProviderError;
use crate::provider::token::PersonalAccessToken;

use super::error_mapping::map_octocrab_error;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Builds an Octocrab client for the given token and API base URL.
///
/// # Errors
///
/// Returns `ProviderError::InvalidUrl` when the base URI cannot be parsed or
/// `ProviderError::Api` when Octocrab fails to construct a client.
pub(super) fn build_octocrab_client(
    token: &PersonalAccessToken,
    api_base: &str,
) -> Result<Octocrab, ProviderError> {
    let base_uri: Uri = api_base
        .parse::<Uri>()
        .map_err(|error| ProviderError::InvalidUrl(format!("{api_base}: {error}")))?;

    Octocrab::builder()
        .personal_token(token.as_ref())
        .base_uri(base_uri)
        .map_err(|error| ProviderError::Api {
            message: format!("build client failed: {error}"),
        })?
        .build()
        .map_err(|error| map_octocrab_error("build client", &error))
}

/// Builds the reqwest client used by REST gateways.
///
/// # Errors
///
/// Returns `ProviderError::Configuration` when the TLS backend cannot be
/// initialised.
pub(super) fn build_http_client() -> Result<Client, ProviderError> {
    Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .user_agent(USER_AGENT)
        .build()
        .map_err(|error| ProviderError::Configuration {
            message: format!("failed to configure provider HTTP client: {error}"),
        })
}

/// Parses an API base URL.
///
/// # Errors
///
/// Returns `ProviderError::InvalidUrl` when `api_base` is not an absolute URL
/// that can carry path segments.
pub(super) fn parse_api_base(api_base: &str) -> Result<Url, ProviderError> {
    let parsed = Url::parse(api_base)
        .map_err(|error| ProviderError::InvalidUrl(format!("{api_base}: {error}")))?;
    if parsed.cannot_be_a_base() {
        return Err(ProviderError::InvalidUrl(format!(
            "{api_base} cannot be used as an API base"
        )));
    }
    Ok(parsed)
}
