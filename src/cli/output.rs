//! Output formatting utilities for CLI operations.

use std::io::{self, Write};

use gitops_providers::{
    NormalizedRepoUrl, ProviderAccountType, ProviderError, PullRequest, Visibility,
};

/// What `inspect` learned about a repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inspection<'url> {
    /// Normalized repository URL.
    pub url: &'url NormalizedRepoUrl,
    /// Whether the owner is a user or an organization.
    pub account_type: ProviderAccountType,
    /// Default branch, or `main` when the provider records none.
    pub default_branch: String,
    /// Visibility reported by the provider.
    pub visibility: Visibility,
}

/// Writes an inspection report to the given writer.
pub fn write_inspection<W: Write>(
    writer: &mut W,
    inspection: &Inspection<'_>,
) -> Result<(), ProviderError> {
    let url = inspection.url;
    let message = format!(
        "Repository: {url}\nProvider: {} ({})\nOwner: {}\nName: {}\nProtocol: {}\n\
         Account type: {}\nDefault branch: {}\nVisibility: {}",
        url.provider(),
        url.provider().domain(),
        url.owner(),
        url.repository_name(),
        url.protocol(),
        inspection.account_type,
        inspection.default_branch,
        inspection.visibility,
    );

    writeln!(writer, "{message}").map_err(|error| io_error(&error))
}

/// Writes the outcome of a step that is skipped when already satisfied.
pub fn write_provisioning<W: Write>(
    writer: &mut W,
    subject: &str,
    already_present: bool,
) -> Result<(), ProviderError> {
    let outcome = if already_present {
        "already exists"
    } else {
        "created"
    };
    writeln!(writer, "{subject} {outcome}").map_err(|error| io_error(&error))
}

/// Writes the pull request opened for a proposed change.
pub fn write_pull_request<W: Write>(
    writer: &mut W,
    pull_request: &PullRequest,
) -> Result<(), ProviderError> {
    writeln!(
        writer,
        "Opened pull request #{}: {}",
        pull_request.number, pull_request.url
    )
    .map_err(|error| io_error(&error))
}

/// Converts an I/O error to a [`ProviderError::Io`].
pub(crate) fn io_error(error: &io::Error) -> ProviderError {
    ProviderError::Io {
        message: error.to_string(),
    }
}
