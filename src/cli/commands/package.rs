//! Package command implementation.
//!
//! Runs the bundler and owns workspace cleanup: the workspace is removed
//! exactly once, after success or failure, and a failed cleanup is itself
//! fatal. The result is reported before cleanup starts.

use crate::bundler::Bundler;
use crate::catalog::{Edition, IdeDescriptor};
use crate::cli::RuntimeConfig;
use crate::error::Result;
use crate::release::ReleaseInfo;

use super::EXIT_SUCCESS;

/// Execute package command
pub(super) async fn execute_package(
    ide: &IdeDescriptor,
    edition: Edition,
    release: ReleaseInfo,
    config: &RuntimeConfig,
) -> Result<i32> {
    let _ = config.output().info(&format!(
        "Packaging {} {} {}",
        ide.key(),
        edition,
        release.version
    ));

    let bundler = Bundler::new(&config.packager, ide, edition, release)?;
    let outcome = bundler
        .bundle_with(|stage| config.progress_println(&stage.to_string()))
        .await;

    if let Ok(artifact) = &outcome {
        let path = std::path::absolute(&artifact.path).unwrap_or_else(|_| artifact.path.clone());
        config.success_println(&format!(
            "Finished packaging {} to {}. Install now with dpkg -i {}.",
            ide.key(),
            path.display(),
            path.display()
        ));
        config.indent(&format!("{} bytes, SHA256 {}", artifact.size, artifact.checksum));
    }

    if let Err(cleanup_error) = bundler.workspace().cleanup().await {
        if let Err(e) = &outcome {
            config.error_println(&e.to_string());
        }
        return Err(cleanup_error.into());
    }

    outcome?;
    Ok(EXIT_SUCCESS)
}
