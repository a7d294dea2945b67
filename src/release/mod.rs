//! Release resolution against the vendor's release-listing API.
//!
//! One request per invocation yields the Linux download link of the latest
//! release; the version is read from the archive file name.

mod resolver;

pub use resolver::{DEFAULT_API_URL, LinkError, LinuxDownload, ReleaseResolver, extract_linux_download};

use thiserror::Error;

/// The release selected for packaging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseInfo {
    /// Version extracted from the archive file name
    pub version: String,
    /// Archive download URL
    pub download_url: String,
    /// Final path segment of the download URL
    pub file_name: String,
    /// Archive size announced by the API, if any
    pub size: Option<u64>,
}

/// Release resolution failures.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The API did not yield a Linux download link.
    #[error("Could not get url for {ide}.")]
    NoLink {
        /// Product key
        ide: String,
    },

    /// The download link has no usable file name.
    #[error("Could not determine file name of '{url}'.")]
    NoFileName {
        /// Download link
        url: String,
    },

    /// The version pattern did not match the archive name.
    #[error("Could not parse version out of '{file_name}'.")]
    NoVersion {
        /// Archive file name
        file_name: String,
    },

    /// HTTP client construction failed.
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}
