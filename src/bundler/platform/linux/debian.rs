//! Debian package (.deb) assembly.
//!
//! Fills in the control template, rewrites the IDE's VM-options files and
//! drives `fakeroot` + `dpkg-deb` over the workspace's package root.
//!
//! The control template uses plain placeholder tokens that are replaced in a
//! fixed order, longest-first where tokens overlap:
//!
//! | Token | Replacement |
//! |-------|-------------|
//! | `OTHER_EDITION2` | other edition, upper case |
//! | `OTHER_EDITION` | other edition |
//! | `VERSION` | release version |
//! | `EDITION2` | edition, upper case |
//! | `EDITION` | edition |
//! | `OLD1` / `OLD2` | own legacy abbreviation, lower / upper case |
//! | `OLD3` / `OLD4` | other legacy abbreviation, lower / upper case |

use crate::bundler::{
    error::{Context, ErrorExt, Result},
    utils::{
        fs::{copy_file, delete_file},
        process::Cmd,
    },
    workspace::Workspace,
};
use crate::catalog::Edition;
use std::{
    path::{Path, PathBuf},
    time::Duration,
};
use tokio::io::AsyncWriteExt;

/// Marker of the bundled profiling agent; lines containing it are dropped
/// from the VM options.
pub const PROFILER_MARKER: &str = "yjpagent";

/// Placeholder tokens recognized in `control.in`, in replacement order.
pub const CONTROL_TOKENS: &[&str] = &[
    "OTHER_EDITION2",
    "OTHER_EDITION",
    "VERSION",
    "EDITION2",
    "EDITION",
    "OLD1",
    "OLD2",
    "OLD3",
    "OLD4",
];

/// Substitutes every control placeholder for `edition` and `version`.
pub fn render_control(template: &str, edition: Edition, version: &str) -> String {
    let other = edition.other();
    let values = [
        other.name().to_uppercase(),
        other.name().to_string(),
        version.to_string(),
        edition.name().to_uppercase(),
        edition.name().to_string(),
        edition.abbreviation().to_string(),
        edition.abbreviation().to_uppercase(),
        other.abbreviation().to_string(),
        other.abbreviation().to_uppercase(),
    ];

    CONTROL_TOKENS
        .iter()
        .zip(values.iter())
        .fold(template.to_string(), |text, (token, value)| {
            text.replace(token, value)
        })
}

/// Renders `control.in` into `DEBIAN/control`, replacing any previous file.
pub async fn write_control(
    template: &Path,
    dest: &Path,
    edition: Edition,
    version: &str,
) -> Result<()> {
    let text = tokio::fs::read_to_string(template)
        .await
        .fs_context("reading control template", template)?;
    tokio::fs::write(dest, render_control(&text, edition, version))
        .await
        .fs_context("writing control file", dest)
}

/// Drops every line that loads the profiling agent, keeping order and line endings.
pub fn filter_vmoptions(content: &str) -> String {
    content
        .split_inclusive('\n')
        .filter(|line| !line.contains(PROFILER_MARKER))
        .collect()
}

/// VM-options files shipped in `<install>/bin` for `ide` (e.g. `idea64.vmoptions`).
pub fn find_vmoptions(install_dir: &Path, ide: &str) -> Result<Vec<PathBuf>> {
    let bin_dir = install_dir.join("bin");
    let base = bin_dir
        .to_str()
        .context("install directory contains invalid UTF-8")?;
    let pattern = format!("{}/{}*.vmoptions", glob::Pattern::escape(base), ide);

    let mut found = Vec::new();
    for entry in glob::glob(&pattern)? {
        let path = entry?;
        if path.is_file() {
            found.push(path);
        }
    }
    found.sort();
    Ok(found)
}

/// Rewrites the IDE's VM-options files without the profiling agent.
///
/// The original content of each file is appended to `readme` for reference.
/// Returns the rewritten files; finding none is an error.
pub async fn rewrite_vmoptions(install_dir: &Path, ide: &str, readme: &Path) -> Result<Vec<PathBuf>> {
    let files = find_vmoptions(install_dir, ide)?;
    if files.is_empty() {
        crate::bail!(
            "no {}*.vmoptions found in {}",
            ide,
            install_dir.join("bin").display()
        );
    }

    let mut notes = tokio::fs::OpenOptions::new()
        .append(true)
        .open(readme)
        .await
        .fs_context("opening vmoptions README", readme)?;

    for original in &files {
        let name = original
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let content = tokio::fs::read_to_string(original)
            .await
            .fs_context("reading vmoptions", original)?;

        notes
            .write_all(format!("\nOriginal {}:\n{}", name, content).as_bytes())
            .await
            .fs_context("appending to vmoptions README", readme)?;

        let filtered = original.with_file_name(format!("{}2", name));
        tokio::fs::write(&filtered, filter_vmoptions(&content))
            .await
            .fs_context("writing filtered vmoptions", &filtered)?;
        delete_file(original, false).await?;
        copy_file(&filtered, original).await?;
        delete_file(&filtered, false).await?;

        log::debug!("Rewrote {}", original.display());
    }

    notes.flush().await.fs_context("flushing vmoptions README", readme)?;
    Ok(files)
}

/// Normalizes ownership to root and compiles the package root into `artifact`.
///
/// Both steps share one `fakeroot` state file so the ownership change is
/// visible to `dpkg-deb`.
pub async fn build_package(workspace: &Workspace, artifact: &Path, timeout: Duration) -> Result<()> {
    let state = workspace.fakeroot_state();
    delete_file(&state, true).await?;
    tokio::fs::write(&state, "")
        .await
        .fs_context("creating fakeroot state", &state)?;

    let package_root = workspace.package_root();
    let fakeroot = || {
        Cmd::new("fakeroot")
            .arg("-i")
            .arg(&state)
            .arg("-s")
            .arg(&state)
            .arg("--")
    };

    fakeroot()
        .args(["chown", "-R", "root:root"])
        .arg(&package_root)
        .run(timeout)
        .await
        .context("failed to normalize file ownership")?;

    fakeroot()
        .args(["dpkg-deb", "-b"])
        .arg(&package_root)
        .arg(artifact)
        .run(timeout)
        .await
        .context("failed to build package")?;

    Ok(())
}
