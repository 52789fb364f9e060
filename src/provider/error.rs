//! Error types exposed by the git provider layer.

use std::time::Duration;

use thiserror::Error;

/// Message GitLab returns when a group lookup misses.
const GROUP_NOT_FOUND_MESSAGE: &str = "404 Group Not Found";

/// Message providers reuse when a deploy key collides with an existing one.
const KEY_IN_USE_MESSAGE: &str = "key is already in use";

/// Errors surfaced while parsing input or communicating with a provider.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProviderError {
    /// The repository URL could not be parsed or names no known provider.
    #[error("repository URL is invalid: {0}")]
    InvalidUrl(String),

    /// No access token was available for the provider.
    #[error("access token for {provider} is required")]
    MissingToken {
        /// Provider the token was needed for.
        provider: String,
    },

    /// The provider reported that the requested resource does not exist.
    #[error("not found: {message}")]
    NotFound {
        /// Provider response describing the missing resource.
        message: String,
    },

    /// GitLab reported that the requested group does not exist.
    #[error("group not found: {message}")]
    GroupNotFound {
        /// Provider response describing the missing group.
        message: String,
    },

    /// The provider rejected the access token.
    #[error("provider rejected the token: {message}")]
    Authentication {
        /// Response detail returned with the 401/403 status.
        message: String,
    },

    /// The provider returned a non-authentication API error.
    #[error("provider API error: {message}")]
    Api {
        /// Response body from the provider describing the failure.
        message: String,
    },

    /// Networking failed while calling the provider.
    #[error("network error talking to provider: {message}")]
    Network {
        /// Transport-level error detail.
        message: String,
    },

    /// The branch a change was proposed against has no commits.
    #[error("target branch [{branch}] does not exist")]
    TargetBranchMissing {
        /// Name of the missing branch.
        branch: String,
    },

    /// A write did not become visible before the wait bound ran out.
    #[error("timed out after {timeout:?} waiting for {operation}: {last_error}")]
    Timeout {
        /// The confirmation step that was being waited on.
        operation: String,
        /// The bound that was exhausted.
        timeout: Duration,
        /// Error returned by the final probe.
        #[source]
        last_error: Box<ProviderError>,
    },

    /// An error annotated with the operation and parameters that produced it.
    #[error("{context}: {source}")]
    Operation {
        /// Operation name and identifying parameters.
        context: String,
        /// The underlying failure.
        source: Box<ProviderError>,
    },

    /// Configuration could not be loaded or is incomplete.
    #[error("configuration error: {message}")]
    Configuration {
        /// Details about the configuration failure.
        message: String,
    },

    /// Local I/O operation failed.
    #[error("I/O error: {message}")]
    Io {
        /// Error detail from the underlying I/O operation.
        message: String,
    },
}

impl ProviderError {
    /// Wraps the error with the operation and parameters that produced it.
    #[must_use]
    pub fn within(self, context: impl Into<String>) -> Self {
        Self::Operation {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Returns true when the provider signalled that a resource is absent.
    ///
    /// GitLab's group lookup is included whether it arrives as the dedicated
    /// variant or as a plain API error carrying the group-not-found text.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound { .. } | Self::GroupNotFound { .. } => true,
            Self::Api { message } => message.contains(GROUP_NOT_FOUND_MESSAGE),
            _ => false,
        }
    }

    /// Returns true when the error text reports a deploy key collision.
    #[must_use]
    pub fn is_key_in_use(&self) -> bool {
        self.to_string().contains(KEY_IN_USE_MESSAGE)
    }

    /// Returns the innermost error beneath any [`ProviderError::Operation`]
    /// wrappers.
    #[must_use]
    pub fn root_cause(&self) -> &Self {
        match self {
            Self::Operation { source, .. } => source.root_cause(),
            other => other,
        }
    }

    pub(crate) const fn group_not_found_marker() -> &'static str {
        GROUP_NOT_FOUND_MESSAGE
    }
}
