//! Command line interface for ide_packager.
//!
//! Parses arguments, dispatches to list, check or package mode and reports
//! progress and results through colored terminal output.

mod args;
pub mod commands;
mod output;

pub use args::{Args, RuntimeConfig};
pub use commands::{EXIT_FAILURE, EXIT_SUCCESS, EXIT_UPGRADE, execute_command};
pub use output::OutputManager;

/// Main CLI entry point, returning the process exit code
pub async fn run() -> i32 {
    let args = Args::parse_args();
    execute_command(args).await
}

