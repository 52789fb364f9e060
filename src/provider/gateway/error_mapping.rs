//! Error mapping helpers for the gateway implementations.

use http::StatusCode;

use crate::provider::error::ProviderError;

/// Checks if an error status indicates an authentication failure.
pub(super) const fn is_auth_failure(status: StatusCode) -> bool {
    matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
}

/// Checks if an octocrab error represents a network/transport issue.
pub(super) const fn is_network_error(error: &octocrab::Error) -> bool {
    matches!(
        error,
        octocrab::Error::Http { .. }
            | octocrab::Error::Hyper { .. }
            | octocrab::Error::Service { .. }
    )
}

/// Flattens GitHub's `message` plus any validation `errors` entries.
///
/// GitHub reports deploy key collisions as `422 Validation Failed` with the
/// actual reason ("key is already in use") inside `errors`.
fn describe_github_error(source: &octocrab::GitHubError) -> String {
    let details: Vec<String> = source
        .errors
        .iter()
        .flatten()
        .filter_map(|entry| {
            entry
                .get("message")
                .and_then(serde_json::Value::as_str)
                .map(ToOwned::to_owned)
                .or_else(|| entry.as_str().map(ToOwned::to_owned))
        })
        .collect();

    if details.is_empty() {
        source.message.clone()
    } else {
        format!("{} ({})", source.message, details.join("; "))
    }
}

pub(super) fn map_octocrab_error(operation: &str, error: &octocrab::Error) -> ProviderError {
    if let octocrab::Error::GitHub { source, .. } = error {
        return map_http_error(
            "GitHub",
            operation,
            source.status_code,
            Some(describe_github_error(source)),
        );
    }

    if is_network_error(error) {
        return ProviderError::Network {
            message: format!("{operation} failed: {error}"),
        };
    }

    ProviderError::Api {
        message: format!("{operation} failed: {error}"),
    }
}

pub(super) fn map_http_error(
    provider: &str,
    operation: &str,
    status: StatusCode,
    maybe_message: Option<String>,
) -> ProviderError {
    let message = maybe_message.unwrap_or_else(|| "unknown error".to_owned());
    if status == StatusCode::NOT_FOUND {
        let detail = format!("{operation} failed: {provider} returned {message}");
        return if message.contains(ProviderError::group_not_found_marker()) {
            ProviderError::GroupNotFound { message: detail }
        } else {
            ProviderError::NotFound { message: detail }
        };
    }

    if is_auth_failure(status) {
        ProviderError::Authentication {
            message: format!("{operation} failed: {provider} returned {status} {message}"),
        }
    } else {
        ProviderError::Api {
            message: format!("{operation} failed with status {status}: {message}"),
        }
    }
}

pub(super) fn map_reqwest_error(operation: &str, error: &reqwest::Error) -> ProviderError {
    if error.is_decode() {
        ProviderError::Api {
            message: format!("{operation} returned an unexpected body: {error}"),
        }
    } else {
        ProviderError::Network {
            message: format!("{operation} failed: {error}"),
        }
    }
}

/// Pulls a human-readable message out of a provider error body.
///
/// GitLab answers with `message` as either a string or a field-keyed object,
/// and some endpoints use `error` instead.
pub(super) fn extract_message(body: &str) -> Option<String> {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        let trimmed = body.trim();
        return (!trimmed.is_empty()).then(|| trimmed.to_owned());
    };

    match value.get("message").or_else(|| value.get("error")) {
        Some(serde_json::Value::String(message)) => Some(message.clone()),
        Some(other) => Some(other.to_string()),
        None => None,
    }
}
