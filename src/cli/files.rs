//! Parsing of `--files` specs into commit contents.
//!
//! A spec is `repository/path=local/file`: the local file's contents are
//! written to the repository path. A bare `repository/path` deletes it.

use std::fs;

use gitops_providers::{CommitFile, ProviderError};

/// One parsed `--files` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileSpec<'spec> {
    /// Write the contents of `local` to `path`.
    Write {
        /// Repository path.
        path: &'spec str,
        /// Local file providing the contents.
        local: &'spec str,
    },
    /// Delete `path` from the repository.
    Delete {
        /// Repository path.
        path: &'spec str,
    },
}

/// Parses a single spec.
///
/// # Errors
///
/// Returns [`ProviderError::Configuration`] when the repository path or the
/// local file name is blank.
pub fn parse_file_spec(spec: &str) -> Result<FileSpec<'_>, ProviderError> {
    let invalid = || ProviderError::Configuration {
        message: format!("invalid file spec '{spec}' (expected repository/path=local/file)"),
    };
    match spec.split_once('=') {
        Some((path, local)) => {
            let repository_path = path.trim().trim_start_matches('/');
            let local_path = local.trim();
            if repository_path.is_empty() || local_path.is_empty() {
                return Err(invalid());
            }
            Ok(FileSpec::Write {
                path: repository_path,
                local: local_path,
            })
        }
        None => {
            let repository_path = spec.trim().trim_start_matches('/');
            if repository_path.is_empty() {
                return Err(invalid());
            }
            Ok(FileSpec::Delete {
                path: repository_path,
            })
        }
    }
}

/// Parses every spec and reads the referenced local files.
///
/// # Errors
///
/// Returns [`ProviderError::Configuration`] when no specs are given or one is
/// malformed, and [`ProviderError::Io`] when a local file cannot be read.
pub fn load_commit_files(specs: &[String]) -> Result<Vec<CommitFile>, ProviderError> {
    if specs.is_empty() {
        return Err(ProviderError::Configuration {
            message: "at least one file is required (use --files or -f)".to_owned(),
        });
    }
    specs
        .iter()
        .map(|spec| match parse_file_spec(spec)? {
            FileSpec::Write { path, local } => {
                let content = fs::read_to_string(local).map_err(|error| ProviderError::Io {
                    message: format!("could not read {local}: {error}"),
                })?;
                Ok(CommitFile::write(path, content))
            }
            FileSpec::Delete { path } => Ok(CommitFile::delete(path)),
        })
        .collect()
}
