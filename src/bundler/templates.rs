//! Template inputs under `data/<ide>/`.

use crate::bundler::error::{Error, Result};
use crate::bundler::utils::fs::{check_file_readable, check_folder};
use std::path::{Path, PathBuf};

/// Per-IDE Debian inputs under `data/<ide>/debian/`.
pub const DEBIAN_FILES: &[&str] = &["control.in", "postinst", "sysctl-99.conf"];

/// Common inputs under `data/<ide>/`.
pub const COMMON_FILES: &[&str] = &[
    "LICENSE",
    "Makefile",
    "pkginfo.in",
    "prototype.in",
    "icon.desktop",
    "start.sh",
    "vmoptions.README",
];

/// Template directory of one IDE.
#[derive(Debug, Clone)]
pub struct TemplateSet {
    data_dir: PathBuf,
    ide: String,
}

impl TemplateSet {
    /// Templates for `ide` below `data_dir`.
    pub fn new(data_dir: impl Into<PathBuf>, ide: impl Into<String>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ide: ide.into(),
        }
    }

    /// `data/<ide>`.
    pub fn ide_dir(&self) -> PathBuf {
        self.data_dir.join(&self.ide)
    }

    /// `data/<ide>/debian`.
    pub fn debian_dir(&self) -> PathBuf {
        self.ide_dir().join("debian")
    }

    /// A common input, e.g. `start.sh`.
    pub fn common(&self, name: &str) -> PathBuf {
        self.ide_dir().join(name)
    }

    /// A Debian input, e.g. `control.in`.
    pub fn debian(&self, name: &str) -> PathBuf {
        self.debian_dir().join(name)
    }

    /// Checks that all template directories and files exist and are readable.
    ///
    /// Fails on the first missing entry.
    pub fn validate(&self) -> Result<()> {
        for dir in [self.data_dir.clone(), self.ide_dir(), self.debian_dir()] {
            require_dir(&dir)?;
        }
        for name in DEBIAN_FILES {
            require_file(&self.debian(name))?;
        }
        for name in COMMON_FILES {
            require_file(&self.common(name))?;
        }
        Ok(())
    }
}

fn require_dir(path: &Path) -> Result<()> {
    if check_folder(path, false, false) {
        Ok(())
    } else {
        Err(Error::MissingTemplate {
            path: path.to_path_buf(),
        })
    }
}

fn require_file(path: &Path) -> Result<()> {
    if check_file_readable(path) {
        Ok(())
    } else {
        log::error!("{} does not exist or is not readable.", path.display());
        Err(Error::MissingTemplate {
            path: path.to_path_buf(),
        })
    }
}
