use super::{ReleaseInfo, ResolveError};
use crate::catalog::{Edition, IdeDescriptor};
use serde::{Deserialize, Deserializer, de::DeserializeOwned};
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

/// Release-listing endpoint of the vendor API.
pub const DEFAULT_API_URL: &str = "https://data.services.jetbrains.com/products/releases";

/// Reasons the listing did not yield a Linux download.
#[derive(Debug, Error)]
pub enum LinkError {
    /// Transport failure or timeout.
    #[error("Error while opening {url}. Error was '{source}'.")]
    Request {
        /// Listing URL
        url: String,
        /// Underlying client error
        #[source]
        source: reqwest::Error,
    },

    /// Server answered with something other than 200.
    #[error("Error while opening {url}. Server answered with status {status}.")]
    Status {
        /// Listing URL
        url: String,
        /// HTTP status code
        status: u16,
    },

    /// Body is not UTF-8.
    #[error("Error while retrieving {url}. Response is not valid UTF-8.")]
    Encoding {
        /// Listing URL
        url: String,
    },

    /// Body is not the expected JSON shape.
    #[error("Error while parsing json from {url}. Error was '{source}'.")]
    Json {
        /// Listing URL
        url: String,
        /// Decoder error
        #[source]
        source: serde_json::Error,
    },

    /// No entry for the product code.
    #[error("Error while parsing '{url}': No '{code}' in dictionary.")]
    MissingCode {
        /// Listing URL
        url: String,
        /// Vendor product code
        code: String,
    },

    /// The product code maps to an empty release list.
    #[error("Error while parsing '{url}': No entries in list.")]
    NoEntries {
        /// Listing URL
        url: String,
    },

    /// The latest release has no `downloads`.
    #[error("Error while parsing '{url}': No 'downloads' in dictionary.")]
    MissingDownloads {
        /// Listing URL
        url: String,
    },

    /// The latest release has no Linux download.
    #[error("Error while parsing '{url}': No 'linux' in dictionary.")]
    MissingLinux {
        /// Listing URL
        url: String,
    },

    /// The Linux download has no usable `link`.
    #[error("Error while parsing '{url}': No 'link' in dictionary.")]
    MissingLink {
        /// Listing URL
        url: String,
    },
}

/// Linux download of the latest release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinuxDownload {
    /// Archive URL
    pub link: String,
    /// Archive size in bytes, if announced
    pub size: Option<u64>,
}

/// The `linux` node of a release's downloads.
///
/// Only this node is decoded; malformed sibling platforms or later releases
/// do not affect the result. Fields with an unexpected type read as absent.
#[derive(Debug, Deserialize)]
struct LinuxNode {
    #[serde(default, deserialize_with = "lenient")]
    link: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    size: Option<u64>,
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Extracts `<code>[0].downloads.linux` from a listing body.
///
/// `url` is only used in diagnostics.
pub fn extract_linux_download(
    body: &str,
    code: &str,
    url: &str,
) -> Result<LinuxDownload, LinkError> {
    let json_err = |source| LinkError::Json {
        url: url.to_string(),
        source,
    };

    let mut listing: HashMap<String, Value> = serde_json::from_str(body).map_err(json_err)?;
    let releases = listing.remove(code).ok_or_else(|| LinkError::MissingCode {
        url: url.to_string(),
        code: code.to_string(),
    })?;
    let releases: Vec<Value> = serde_json::from_value(releases).map_err(json_err)?;

    let latest = releases.into_iter().next().ok_or_else(|| LinkError::NoEntries {
        url: url.to_string(),
    })?;
    let downloads = latest
        .get("downloads")
        .ok_or_else(|| LinkError::MissingDownloads {
            url: url.to_string(),
        })?;
    let linux = downloads.get("linux").ok_or_else(|| LinkError::MissingLinux {
        url: url.to_string(),
    })?;

    let node = LinuxNode::deserialize(linux).ok();
    match node {
        Some(LinuxNode {
            link: Some(link),
            size,
        }) if !link.is_empty() => Ok(LinuxDownload { link, size }),
        _ => Err(LinkError::MissingLink {
            url: url.to_string(),
        }),
    }
}

/// Final path segment of a download URL.
fn file_name_of(link: &str) -> Option<String> {
    let name = match url::Url::parse(link) {
        Ok(parsed) => parsed
            .path_segments()
            .and_then(|mut segments| segments.next_back().map(str::to_string)),
        Err(_) => link.rsplit('/').next().map(str::to_string),
    };
    name.filter(|n| !n.is_empty())
}

/// Client for the release-listing API.
#[derive(Debug, Clone)]
pub struct ReleaseResolver {
    client: reqwest::Client,
    api_url: String,
}

impl ReleaseResolver {
    /// Creates a resolver querying `api_url` with a request `timeout`.
    pub fn new(api_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_url: api_url.into(),
        })
    }

    fn listing_url(&self, code: &str) -> String {
        format!("{}?code={}&latest=true&type=release", self.api_url, code)
    }

    async fn try_fetch(&self, code: &str) -> Result<LinuxDownload, LinkError> {
        let url = self.listing_url(code);
        let request_err = |source| LinkError::Request {
            url: url.clone(),
            source,
        };

        let response = self
            .client
            .get(&self.api_url)
            .query(&[("code", code), ("latest", "true"), ("type", "release")])
            .send()
            .await
            .map_err(request_err)?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(request_err)?;
        let body = std::str::from_utf8(&bytes).map_err(|_| LinkError::Encoding { url: url.clone() })?;

        if status != reqwest::StatusCode::OK {
            return Err(LinkError::Status {
                url,
                status: status.as_u16(),
            });
        }

        extract_linux_download(body, code, &url)
    }

    /// Fetches the Linux download of the latest release for a product code.
    ///
    /// Every failure is logged with its specific diagnostic and reported as `None`.
    pub async fn fetch_linux_download(&self, code: &str) -> Option<LinuxDownload> {
        match self.try_fetch(code).await {
            Ok(download) => Some(download),
            Err(e) => {
                log::error!("{}", e);
                None
            }
        }
    }

    /// Resolves the latest release of an IDE edition.
    pub async fn resolve(
        &self,
        ide: &IdeDescriptor,
        edition: Edition,
    ) -> Result<ReleaseInfo, ResolveError> {
        let download = self
            .fetch_linux_download(ide.product_code(edition))
            .await
            .ok_or_else(|| ResolveError::NoLink {
                ide: ide.key().to_string(),
            })?;

        let file_name = file_name_of(&download.link).ok_or_else(|| ResolveError::NoFileName {
            url: download.link.clone(),
        })?;
        let version = ide
            .extract_version(&file_name)
            .ok_or_else(|| ResolveError::NoVersion {
                file_name: file_name.clone(),
            })?;

        log::debug!("Resolved {} {} to {} ({})", ide.key(), edition, version, download.link);

        Ok(ReleaseInfo {
            version,
            download_url: download.link,
            file_name,
            size: download.size,
        })
    }
}
