//! HTTP download of release archives.
//!
//! Streams the archive to disk and rejects responses that look truncated or
//! like an error page: the connection must be marked closed and the announced
//! `Content-Length` must reach a minimum size.

use crate::bundler::error::{Error, ErrorExt, Result};
use reqwest::header::{CONNECTION, HeaderMap};
use std::{path::Path, time::Duration};
use tokio::io::AsyncWriteExt;

/// Smallest archive accepted by default.
pub const MIN_CONTENT_LENGTH: u64 = 100_000;

/// Response properties inspected before the body is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseMeta {
    /// Value of the `Connection` header, if any.
    pub connection: Option<String>,
    /// Announced body length.
    pub content_length: Option<u64>,
    /// True for HTTP/2 and later, which carry no connection header.
    pub multiplexed: bool,
}

impl ResponseMeta {
    /// Extracts the inspected properties from a response.
    pub fn from_response(response: &reqwest::Response) -> Self {
        Self::from_parts(
            response.headers(),
            response.content_length(),
            response.version() >= reqwest::Version::HTTP_2,
        )
    }

    fn from_parts(headers: &HeaderMap, content_length: Option<u64>, multiplexed: bool) -> Self {
        Self {
            connection: headers
                .get(CONNECTION)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string),
            content_length,
            multiplexed,
        }
    }

    /// Checks the response against the integrity rules.
    ///
    /// Returns the announced length on success and the reason on rejection.
    pub fn validate(&self, min_length: u64) -> std::result::Result<u64, String> {
        let closed = self.multiplexed
            || self
                .connection
                .as_deref()
                .is_some_and(|c| c.eq_ignore_ascii_case("close"));
        if !closed {
            return Err(format!(
                "connection was not closed by the server (Connection: {})",
                self.connection.as_deref().unwrap_or("<none>")
            ));
        }

        match self.content_length {
            None => Err("response has no Content-Length".to_string()),
            Some(len) if len < min_length => Err(format!(
                "Content-Length {} is below the minimum of {} bytes",
                len, min_length
            )),
            Some(len) => Ok(len),
        }
    }
}

/// Downloads `url` into `dest`.
///
/// Asks the server to close the connection, validates the response headers,
/// then streams the body to disk. The whole transfer is bounded by `timeout`.
/// Returns the number of bytes written.
pub async fn download_to_file(
    client: &reqwest::Client,
    url: &str,
    dest: &Path,
    min_length: u64,
    timeout: Duration,
) -> Result<u64> {
    log::info!("Downloading {}", url);

    match tokio::time::timeout(timeout, transfer(client, url, dest, min_length)).await {
        Ok(result) => result,
        Err(_elapsed) => Err(Error::DownloadTimeout {
            url: url.to_string(),
            timeout,
        }),
    }
}

async fn transfer(
    client: &reqwest::Client,
    url: &str,
    dest: &Path,
    min_length: u64,
) -> Result<u64> {
    let mut response = client
        .get(url)
        .header(CONNECTION, "close")
        .send()
        .await?
        .error_for_status()?;

    let expected = ResponseMeta::from_response(&response)
        .validate(min_length)
        .map_err(|reason| Error::DownloadRejected {
            url: url.to_string(),
            reason,
        })?;

    let file = tokio::fs::File::create(dest)
        .await
        .fs_context("creating download file", dest)?;
    let mut writer = tokio::io::BufWriter::new(file);

    let mut written = 0u64;
    while let Some(chunk) = response.chunk().await? {
        writer
            .write_all(&chunk)
            .await
            .fs_context("writing download file", dest)?;
        written += chunk.len() as u64;
    }
    writer.flush().await.fs_context("flushing download file", dest)?;

    if written != expected {
        return Err(Error::DownloadRejected {
            url: url.to_string(),
            reason: format!("received {} of {} bytes", written, expected),
        });
    }

    log::debug!("Wrote {} bytes to {}", written, dest.display());
    Ok(written)
}
