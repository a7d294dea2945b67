//! The transient package-root tree under `tmp/`.
//!
//! A workspace is rebuilt from scratch for every run and removed when the run
//! ends, whatever the outcome. Removing a workspace that does not exist is a
//! successful no-op.

use crate::bundler::error::{Context, Result};
use crate::bundler::utils::fs::{check_folder, create_folder, delete_folder};
use std::path::{Path, PathBuf};

/// Vendor directory under `usr/share`.
pub const VENDOR_DIR: &str = "jetbrains";

/// Layout of the workspace for one IDE.
#[derive(Debug, Clone)]
pub struct Workspace {
    dir: PathBuf,
    ide: String,
}

impl Workspace {
    /// Describes the workspace at `dir` for the IDE `ide`. Nothing is created.
    pub fn new(dir: impl Into<PathBuf>, ide: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            ide: ide.into(),
        }
    }

    /// The workspace directory (`tmp/`).
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Future package root filesystem: `tmp/root`.
    pub fn package_root(&self) -> PathBuf {
        self.dir.join("root")
    }

    /// Unpacked IDE: `root/usr/share/jetbrains/<ide>`.
    pub fn install_dir(&self) -> PathBuf {
        self.package_root()
            .join("usr/share")
            .join(VENDOR_DIR)
            .join(&self.ide)
    }

    /// `root/usr/share/applications`.
    pub fn applications_dir(&self) -> PathBuf {
        self.package_root().join("usr/share/applications")
    }

    /// `root/usr/bin`.
    pub fn bin_dir(&self) -> PathBuf {
        self.package_root().join("usr/bin")
    }

    /// `root/etc/<ide>`.
    pub fn config_dir(&self) -> PathBuf {
        self.package_root().join("etc").join(&self.ide)
    }

    /// `root/etc/sysctl.d`.
    pub fn sysctl_dir(&self) -> PathBuf {
        self.package_root().join("etc/sysctl.d")
    }

    /// Packaging metadata: `root/DEBIAN`.
    pub fn control_dir(&self) -> PathBuf {
        self.package_root().join("DEBIAN")
    }

    /// Ownership database shared by the `fakeroot` invocations.
    pub fn fakeroot_state(&self) -> PathBuf {
        self.dir.join("fakeroot.save")
    }

    /// A file directly inside the workspace directory.
    pub fn file(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    /// Every directory of the tree, parents first.
    pub fn directories(&self) -> Vec<PathBuf> {
        vec![
            self.dir.clone(),
            self.install_dir(),
            self.applications_dir(),
            self.bin_dir(),
            self.config_dir(),
            self.sysctl_dir(),
            self.control_dir(),
        ]
    }

    /// Removes any stale workspace and creates the full tree fresh.
    pub async fn prepare(&self) -> Result<()> {
        self.cleanup().await.context("removing stale workspace")?;
        for dir in self.directories() {
            create_folder(&dir)
                .await
                .with_context(|| format!("{} can not be created", dir.display()))?;
        }
        Ok(())
    }

    /// Removes the workspace if it exists.
    pub async fn cleanup(&self) -> Result<()> {
        if !check_folder(&self.dir, false, true) {
            return Ok(());
        }
        log::debug!("Removing workspace {}", self.dir.display());
        delete_folder(&self.dir, true)
            .await
            .with_context(|| format!("{} does exist and can not be deleted", self.dir.display()))
    }
}
