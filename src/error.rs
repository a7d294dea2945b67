//! Error types for ide_packager operations.
//!
//! Each layer keeps its own error enum; [`PackagerError`] collects them at the
//! command boundary and adds actionable recovery suggestions.

use crate::bundler;
use crate::release::ResolveError;
use thiserror::Error;

/// Result type alias for ide_packager operations
pub type Result<T> = std::result::Result<T, PackagerError>;

/// Main error type for all ide_packager operations
#[derive(Error, Debug)]
pub enum PackagerError {
    /// Command line errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// Release resolution errors
    #[error("{0}")]
    Resolve(#[from] ResolveError),

    /// Packaging errors
    #[error("{0}")]
    Bundler(#[from] bundler::Error),

    /// I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Version pattern failed to compile
    #[error("Invalid version pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },

    /// IDE key not present in the catalog
    #[error("Unsupported IDE '{ide}'")]
    UnsupportedIde {
        /// Requested key
        ide: String,
    },
}

impl PackagerError {
    /// Get actionable recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<String> {
        match self {
            PackagerError::Bundler(e) => match e.root_cause() {
                bundler::Error::MissingTools { tools } => vec![
                    format!("Install the missing tools: {}", tools.join(" ")),
                    "On Debian and Ubuntu: apt install tar dpkg fakeroot".to_string(),
                ],
                bundler::Error::MissingTemplate { path } => vec![
                    format!("Restore {} from the packager's data directory", path.display()),
                    "Point --root at the directory that contains data/".to_string(),
                ],
                bundler::Error::DownloadRejected { .. } | bundler::Error::DownloadTimeout { .. } => {
                    vec![
                        "Check your network connection and retry".to_string(),
                        "Raise IDE_PACKAGER_DOWNLOAD_TIMEOUT for slow connections".to_string(),
                    ]
                }
                bundler::Error::CommandTimeout { .. } => {
                    vec!["Raise IDE_PACKAGER_COMMAND_TIMEOUT and retry".to_string()]
                }
                _ => vec!["Check the error message above for specific details".to_string()],
            },
            PackagerError::Resolve(ResolveError::NoLink { .. }) => vec![
                "Check that data.services.jetbrains.com is reachable".to_string(),
                "Run with RUST_LOG=debug for the full diagnostic".to_string(),
            ],
            PackagerError::Resolve(ResolveError::NoVersion { .. }) => {
                vec!["The vendor changed its archive naming; update the version pattern".to_string()]
            }
            PackagerError::Cli(CliError::UnsupportedIde { .. }) => {
                vec!["List supported IDEs with --list".to_string()]
            }
            _ => vec!["Check the error message above for specific details".to_string()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_tools_suggestion_names_tools() {
        let err = PackagerError::from(bundler::Error::MissingTools {
            tools: vec!["fakeroot".to_string()],
        });
        assert!(err.recovery_suggestions()[0].contains("fakeroot"));
    }

    #[test]
    fn test_resolve_message_passes_through() {
        let err = PackagerError::from(ResolveError::NoLink {
            ide: "idea".to_string(),
        });
        assert_eq!(err.to_string(), "Could not get url for idea.");
    }

    #[test]
    fn test_invalid_arguments_message() {
        let err = CliError::InvalidArguments {
            reason: "Root directory must not be empty".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid arguments: Root directory must not be empty"
        );
    }
}
