//! Command execution.
//!
//! Dispatches the parsed arguments to list, check or package mode and maps
//! every outcome to a process exit code.

mod check;
mod list;
mod package;

pub use check::{UpgradeStatus, compare_installed, installed_version};

use crate::bundler::{REQUIRED_TOOLS, check_required_tools};
use crate::catalog::Catalog;
use crate::cli::{Args, RuntimeConfig};
use crate::error::{CliError, Result};
use crate::release::{ReleaseResolver, ResolveError};

use check::execute_check;
use list::execute_list;
use package::execute_package;

/// Exit code for success
pub const EXIT_SUCCESS: i32 = 0;

/// Exit code of check mode when a newer release is available
pub const EXIT_UPGRADE: i32 = 1;

/// Exit code for any failure
pub const EXIT_FAILURE: i32 = -1;

/// Execute the command selected by the parsed arguments
pub async fn execute_command(args: Args) -> i32 {
    if let Err(reason) = args.validate() {
        let output = super::OutputManager::new(false);
        output.error(&CliError::InvalidArguments { reason }.to_string());
        return EXIT_FAILURE;
    }

    let config = RuntimeConfig::from(&args);

    match execute_mode(&args, &config).await {
        Ok(exit_code) => exit_code,
        Err(e) => {
            config.error_println(&e.to_string());

            let suggestions = e.recovery_suggestions();
            if !suggestions.is_empty() {
                config.println("\n💡 Recovery suggestions:");
                for suggestion in suggestions {
                    config.println(&format!("  • {}", suggestion));
                }
            }

            EXIT_FAILURE
        }
    }
}

/// List the catalog, or resolve the latest release and check or package it
async fn execute_mode(args: &Args, config: &RuntimeConfig) -> Result<i32> {
    let catalog = Catalog::builtin()?;
    if args.list {
        return execute_list(&catalog, config);
    }

    let ide = catalog.get(&args.ide).ok_or_else(|| CliError::UnsupportedIde {
        ide: args.ide.clone(),
    })?;

    check_required_tools(REQUIRED_TOOLS)?;

    let resolver = ReleaseResolver::new(
        config.packager.api_url.clone(),
        config.packager.metadata_timeout,
    )
    .map_err(ResolveError::from)?;
    let release = resolver.resolve(ide, args.edition).await?;

    if args.check {
        execute_check(ide, args.edition, &release, config).await
    } else {
        execute_package(ide, args.edition, release, config).await
    }
}
