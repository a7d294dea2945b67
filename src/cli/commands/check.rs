//! Check command implementation.
//!
//! Compares the installed package version, as reported by `dpkg -l`, with
//! the latest release.

use crate::bundler::{Context, utils::process::Cmd, utils::text::clean_newline_space};
use crate::catalog::{Edition, IdeDescriptor};
use crate::cli::RuntimeConfig;
use crate::error::Result;
use crate::release::ReleaseInfo;

use super::{EXIT_SUCCESS, EXIT_UPGRADE};

/// Outcome of comparing installed and available versions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpgradeStatus {
    /// No installed package matches the IDE
    NotInstalled,
    /// The installed version equals the latest release
    UpToDate,
    /// A newer release than the installed one exists
    UpgradeAvailable {
        /// Installed version
        installed: String,
        /// Latest release version
        available: String,
    },
}

impl UpgradeStatus {
    /// Process exit code for this outcome
    pub fn exit_code(&self) -> i32 {
        match self {
            UpgradeStatus::UpgradeAvailable { .. } => EXIT_UPGRADE,
            _ => EXIT_SUCCESS,
        }
    }
}

/// Compares the normalized installed version with the latest release.
///
/// Any difference counts as an upgrade; versions are not ordered.
pub fn compare_installed(installed: &str, available: &str) -> UpgradeStatus {
    if installed.is_empty() {
        UpgradeStatus::NotInstalled
    } else if installed == available {
        UpgradeStatus::UpToDate
    } else {
        UpgradeStatus::UpgradeAvailable {
            installed: installed.to_string(),
            available: available.to_string(),
        }
    }
}

/// Extracts the installed version from `dpkg -l` output.
///
/// Only lines naming the IDE are considered; the first version match wins.
/// Returns an empty string when nothing matches.
pub fn installed_version(listing: &str, ide: &IdeDescriptor) -> String {
    let found = listing
        .lines()
        .filter(|line| line.contains(ide.key()))
        .find_map(|line| ide.version_pattern().find(line))
        .map(|m| m.as_str())
        .unwrap_or_default();
    clean_newline_space(found)
}

/// Execute check command
pub(super) async fn execute_check(
    ide: &IdeDescriptor,
    edition: Edition,
    release: &ReleaseInfo,
    config: &RuntimeConfig,
) -> Result<i32> {
    let listing = Cmd::new("dpkg")
        .arg("-l")
        .quiet()
        .output(config.packager.command_timeout)
        .await
        .context("Error while querying the package database")?;

    let installed = installed_version(&listing.stdout, ide);
    log::debug!("Installed {} version: '{}'", ide.key(), installed);

    let status = compare_installed(&installed, &release.version);
    match &status {
        UpgradeStatus::NotInstalled => {
            config.println(&format!("{} {} is not installed.", ide.key(), edition));
        }
        UpgradeStatus::UpToDate => {}
        UpgradeStatus::UpgradeAvailable {
            installed,
            available,
        } => {
            config.println(&format!(
                "There is a newer version ({}) than installed ({}) available!",
                available, installed
            ));
        }
    }
    Ok(status.exit_code())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    const LISTING: &str = "\
Desired=Unknown/Install/Remove/Purge/Hold
||/ Name                 Version      Architecture Description
+++-====================-============-============-==============================
ii  bash                 5.2.15-2     amd64        GNU Bourne Again SHell
ii  pycharm-community    2023.1.1     all          PyCharm community edition
";

    #[test]
    fn test_compare_installed() {
        assert_eq!(compare_installed("", "2023.1.2"), UpgradeStatus::NotInstalled);
        assert_eq!(compare_installed("2023.1.2", "2023.1.2"), UpgradeStatus::UpToDate);
        let status = compare_installed("2023.1.1", "2023.1.2");
        assert_eq!(
            status,
            UpgradeStatus::UpgradeAvailable {
                installed: "2023.1.1".to_string(),
                available: "2023.1.2".to_string(),
            }
        );
        assert_eq!(status.exit_code(), 1);
        assert_eq!(UpgradeStatus::NotInstalled.exit_code(), 0);
        assert_eq!(UpgradeStatus::UpToDate.exit_code(), 0);
    }

    #[test]
    fn test_installed_version_from_listing() {
        let catalog = Catalog::builtin().unwrap();
        assert_eq!(installed_version(LISTING, catalog.get("pycharm").unwrap()), "2023.1.1");
        assert_eq!(installed_version(LISTING, catalog.get("idea").unwrap()), "");
    }
}
