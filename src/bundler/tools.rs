//! External tool detection.
//!
//! Every executable the workflow shells out to must resolve on `PATH` before
//! anything is downloaded or written.

use crate::bundler::error::{Error, Result};

/// Executables required by the packaging workflow.
///
/// `tar` unpacks the archive, `fakeroot` normalizes ownership, `dpkg-deb`
/// compiles the package and `dpkg` answers the installed-version query.
pub const REQUIRED_TOOLS: &[&str] = &["tar", "dpkg", "fakeroot", "dpkg-deb"];

/// Returns true if `tool` resolves to an executable on `PATH`.
pub fn tool_exists(tool: &str) -> bool {
    match which::which(tool) {
        Ok(path) => {
            log::debug!("Found {} at: {}", tool, path.display());
            true
        }
        Err(e) => {
            log::debug!("{} not found in PATH: {}", tool, e);
            false
        }
    }
}

/// Checks that all `tools` are available.
///
/// Reports every missing tool at once.
pub fn check_required_tools(tools: &[&str]) -> Result<()> {
    let missing: Vec<String> = tools
        .iter()
        .filter(|tool| !tool_exists(tool))
        .map(|tool| tool.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        for tool in &missing {
            log::error!("{} not found or not usable.", tool);
        }
        Err(Error::MissingTools { tools: missing })
    }
}
