//! Package formats produced by the bundler.
//!
//! Only Debian packages are built; the format layer is kept separate from the
//! orchestration in [`crate::bundler::Bundler`] so the package compiler can be
//! swapped per format.

pub mod linux;

use std::fmt;

/// Supported package types.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[non_exhaustive]
pub enum PackageType {
    /// Debian package (.deb), built with `fakeroot` and `dpkg-deb`.
    Deb,
}

impl PackageType {
    /// Lowercase identifier used in CLI output.
    pub fn short_name(&self) -> &'static str {
        match self {
            PackageType::Deb => "deb",
        }
    }

    /// File extension of the produced artifact.
    pub fn extension(&self) -> &'static str {
        match self {
            PackageType::Deb => "deb",
        }
    }

    /// Artifact file name for one IDE release: `<ide>-<edition>-<version>.<ext>`.
    pub fn artifact_name(&self, ide: &str, edition: &str, version: &str) -> String {
        format!("{}-{}-{}.{}", ide, edition, version, self.extension())
    }
}

impl fmt::Display for PackageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.short_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_name() {
        assert_eq!(
            PackageType::Deb.artifact_name("pycharm", "community", "2023.1.2"),
            "pycharm-community-2023.1.2.deb"
        );
        assert_eq!(PackageType::Deb.to_string(), "deb");
    }
}
