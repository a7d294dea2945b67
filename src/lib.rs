//! # IDE Packager
//!
//! Repackages the latest JetBrains IDE release as a Debian package.
//!
//! The release-listing API is queried once for the Linux archive of the
//! selected IDE edition; the archive is downloaded, unpacked into a package
//! root together with a launcher, desktop entry, sysctl snippet and control
//! file, and compiled with `fakeroot` + `dpkg-deb`.
//!
//! ## Usage
//!
//! ```bash
//! ide_packager                                   # PyCharm Community
//! ide_packager -i idea -e professional           # IntelliJ IDEA Ultimate
//! ide_packager -i idea --check                   # exit 1 if an upgrade exists
//! ide_packager --list
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod bundler;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod release;

pub use bundler::{BundledArtifact, Bundler, PackageType};
pub use catalog::{Catalog, Edition, IdeDescriptor};
pub use cli::Args;
pub use config::PackagerConfig;
pub use error::{CliError, PackagerError, Result};
pub use release::{ReleaseInfo, ReleaseResolver};
