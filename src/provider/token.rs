//! Access token wrapper.

use super::error::ProviderError;
use super::url::GitProviderName;

/// Personal access token wrapper enforcing presence.
#[derive(Clone, PartialEq, Eq)]
pub struct PersonalAccessToken(String);

impl PersonalAccessToken {
    /// Validates that the token is non-empty and trims whitespace.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::MissingToken` naming `provider` when the
    /// supplied string is blank.
    pub fn new(provider: GitProviderName, token: impl AsRef<str>) -> Result<Self, ProviderError> {
        let trimmed = token.as_ref().trim();
        if trimmed.is_empty() {
            return Err(ProviderError::MissingToken {
                provider: provider.to_string(),
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the token value.
    #[must_use]
    pub const fn value(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for PersonalAccessToken {
    fn as_ref(&self) -> &str {
        self.value()
    }
}

impl std::fmt::Debug for PersonalAccessToken {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str("PersonalAccessToken(***)")
    }
}
