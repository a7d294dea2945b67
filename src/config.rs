//! Runtime configuration for packaging runs.
//!
//! Paths derive from the root directory given on the command line; network
//! and process budgets come from defaults that environment variables may
//! override. Invalid overrides are ignored with a warning.

use crate::bundler::utils::text::clean_quote_space;
use crate::release::DEFAULT_API_URL;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Fixed timeout of the release-listing request.
pub const METADATA_TIMEOUT: Duration = Duration::from_secs(10);

/// Default budget for the archive download.
pub const DEFAULT_DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(1800);

/// Default budget for each external command.
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(900);

/// Overrides the release-listing endpoint.
pub const ENV_API_URL: &str = "IDE_PACKAGER_API_URL";

/// Overrides the download budget, in seconds.
pub const ENV_DOWNLOAD_TIMEOUT: &str = "IDE_PACKAGER_DOWNLOAD_TIMEOUT";

/// Overrides the per-command budget, in seconds.
pub const ENV_COMMAND_TIMEOUT: &str = "IDE_PACKAGER_COMMAND_TIMEOUT";

/// Settings shared by every stage of a run.
#[derive(Debug, Clone)]
pub struct PackagerConfig {
    /// Directory holding `data/`, `tmp/` and `output/`
    pub root: PathBuf,
    /// Release-listing endpoint
    pub api_url: String,
    /// Release-listing request timeout
    pub metadata_timeout: Duration,
    /// Archive download budget
    pub download_timeout: Duration,
    /// Budget for each external command
    pub command_timeout: Duration,
    /// Smallest acceptable archive size in bytes
    pub min_download_size: u64,
}

impl PackagerConfig {
    /// Configuration with built-in defaults rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            api_url: DEFAULT_API_URL.to_string(),
            metadata_timeout: METADATA_TIMEOUT,
            download_timeout: DEFAULT_DOWNLOAD_TIMEOUT,
            command_timeout: DEFAULT_COMMAND_TIMEOUT,
            min_download_size: crate::bundler::utils::http::MIN_CONTENT_LENGTH,
        }
    }

    /// Configuration rooted at `root` with environment overrides applied.
    pub fn from_env(root: impl Into<PathBuf>) -> Self {
        Self::new(root).with_overrides(|name| std::env::var(name).ok())
    }

    /// Applies overrides from a variable lookup.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_API_URL).map(|v| clean_quote_space(&v)) {
            if !url.is_empty() {
                self.api_url = url;
            }
        }
        self.download_timeout =
            parse_seconds(ENV_DOWNLOAD_TIMEOUT, lookup(ENV_DOWNLOAD_TIMEOUT), self.download_timeout);
        self.command_timeout =
            parse_seconds(ENV_COMMAND_TIMEOUT, lookup(ENV_COMMAND_TIMEOUT), self.command_timeout);
        self
    }

    /// Template inputs: `<root>/data`.
    pub fn data_dir(&self) -> PathBuf {
        self.root.join("data")
    }

    /// Transient workspace: `<root>/tmp`.
    pub fn workspace_dir(&self) -> PathBuf {
        self.root.join("tmp")
    }

    /// Persistent artifacts: `<root>/output`.
    pub fn output_dir(&self) -> PathBuf {
        self.root.join("output")
    }

    /// The root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Parses a positive number of seconds, falling back to `default`.
fn parse_seconds(name: &str, value: Option<String>, default: Duration) -> Duration {
    let Some(raw) = value else {
        return default;
    };
    match clean_quote_space(&raw).parse::<u64>() {
        Ok(secs) if secs > 0 => Duration::from_secs(secs),
        _ => {
            log::warn!("Ignoring invalid value '{}' for {}", raw, name);
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = PackagerConfig::new("/srv/pkg");
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.metadata_timeout, Duration::from_secs(10));
        assert_eq!(config.min_download_size, 100_000);
        assert_eq!(config.workspace_dir(), PathBuf::from("/srv/pkg/tmp"));
        assert_eq!(config.output_dir(), PathBuf::from("/srv/pkg/output"));
        assert_eq!(config.data_dir(), PathBuf::from("/srv/pkg/data"));
    }

    #[test]
    fn test_overrides_are_normalized() {
        let config = PackagerConfig::new(".").with_overrides(lookup(&[
            (ENV_API_URL, " 'http://127.0.0.1:8080/releases' "),
            (ENV_DOWNLOAD_TIMEOUT, "\"600\""),
            (ENV_COMMAND_TIMEOUT, " 30 "),
        ]));
        assert_eq!(config.api_url, "http://127.0.0.1:8080/releases");
        assert_eq!(config.download_timeout, Duration::from_secs(600));
        assert_eq!(config.command_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_invalid_overrides_fall_back() {
        let config = PackagerConfig::new(".").with_overrides(lookup(&[
            (ENV_API_URL, "''"),
            (ENV_DOWNLOAD_TIMEOUT, "soon"),
            (ENV_COMMAND_TIMEOUT, "0"),
        ]));
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.download_timeout, DEFAULT_DOWNLOAD_TIMEOUT);
        assert_eq!(config.command_timeout, DEFAULT_COMMAND_TIMEOUT);
    }
}
