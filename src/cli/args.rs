//! Command line argument parsing.

use crate::catalog::{Edition, SUPPORTED_IDES};
use crate::config::PackagerConfig;
use clap::{ArgAction, Parser, builder::PossibleValuesParser};
use std::path::PathBuf;

/// Package JetBrains IDE releases as Debian packages
#[derive(Parser, Debug)]
#[command(
    name = "ide_packager",
    version,
    disable_version_flag = true,
    about = "Package the latest JetBrains IDE release as a Debian package",
    long_about = "Download the latest release of a JetBrains IDE and repackage it as an \
installable .deb, or check whether the installed version is outdated.

Usage:
  ide_packager --ide pycharm --edition professional
  ide_packager --ide idea --check
  ide_packager --list",
    after_help = "Run with --list to show the supported IDEs."
)]
pub struct Args {
    /// Edition to package
    #[arg(short, long, value_enum, default_value_t = Edition::Community)]
    pub edition: Edition,

    /// IDE to package
    #[arg(
        short,
        long,
        default_value = "pycharm",
        value_parser = PossibleValuesParser::new(SUPPORTED_IDES)
    )]
    pub ide: String,

    /// List supported IDEs and exit
    #[arg(short, long)]
    pub list: bool,

    /// Only check whether a newer release than the installed one exists
    #[arg(short, long)]
    pub check: bool,

    /// Only print errors
    #[arg(short, long)]
    pub quiet: bool,

    /// Directory holding data/, tmp/ and output/
    #[arg(short, long, env = "IDE_PACKAGER_ROOT", default_value = ".")]
    pub root: PathBuf,

    /// Print version
    #[arg(short = 'v', long = "version", action = ArgAction::Version)]
    version: Option<bool>,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), String> {
        if self.root.as_os_str().is_empty() {
            return Err("Root directory must not be empty".to_string());
        }
        Ok(())
    }
}

/// Configuration derived from command line arguments
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Output manager for colored terminal output
    output: super::OutputManager,
    /// Paths, endpoint and time budgets
    pub packager: PackagerConfig,
}

impl RuntimeConfig {
    /// Create runtime configuration around a packager configuration
    pub fn new(packager: PackagerConfig, quiet: bool) -> Self {
        Self {
            output: super::OutputManager::new(quiet),
            packager,
        }
    }

    /// Get a reference to the output manager
    pub fn output(&self) -> &super::OutputManager {
        &self.output
    }
}

impl From<&Args> for RuntimeConfig {
    fn from(args: &Args) -> Self {
        Self::new(PackagerConfig::from_env(args.root.clone()), args.quiet)
    }
}

impl RuntimeConfig {
    /// Print message
    pub fn println(&self, message: &str) {
        let _ = self.output.println(message);
    }

    /// Print progress message
    pub fn progress_println(&self, message: &str) {
        let _ = self.output.progress(message);
    }

    /// Print error message (always shown)
    pub fn error_println(&self, message: &str) {
        self.output.error(message);
    }

    /// Print success message
    pub fn success_println(&self, message: &str) {
        let _ = self.output.success(message);
    }

    /// Print indented text
    pub fn indent(&self, message: &str) {
        let _ = self.output.indent(message);
    }
}
