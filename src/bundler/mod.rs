//! Debian packaging of a resolved IDE release.
//!
//! The bundler owns everything between "we know which archive to fetch" and
//! "the package is in `output/`": the transient workspace, the template
//! inputs, the download, the package-root layout and the external package
//! compiler.
//!
//! # Layout
//!
//! | Path | Content |
//! |------|---------|
//! | `data/<ide>/` | template inputs, see [`templates`] |
//! | `tmp/` | workspace, see [`Workspace`] |
//! | `tmp/root/` | future package root filesystem |
//! | `output/` | finished packages |
//!
//! # Integration
//!
//! ```no_run
//! use ide_packager::bundler::{check_required_tools, REQUIRED_TOOLS};
//!
//! check_required_tools(REQUIRED_TOOLS)?;
//! # Ok::<(), ide_packager::bundler::Error>(())
//! ```

#![warn(missing_docs)]

mod builder;
mod error;
pub(crate) mod platform;
pub mod templates;
mod tools;
pub mod utils;
mod workspace;

pub use builder::{Bundler, Stage};
pub use error::{Context, Error, ErrorExt, Result};
pub use platform::PackageType;
pub use templates::TemplateSet;
pub use tools::{REQUIRED_TOOLS, check_required_tools, tool_exists};
pub use workspace::{VENDOR_DIR, Workspace};

/// A package produced by the bundler.
#[derive(Debug, Clone)]
pub struct BundledArtifact {
    /// The package format that was created.
    pub package_type: PackageType,

    /// Location of the package in `output/`.
    pub path: std::path::PathBuf,

    /// Release version that was packaged.
    pub version: String,

    /// Size of the package in bytes.
    pub size: u64,

    /// SHA-256 checksum of the package, hex-encoded.
    pub checksum: String,
}
