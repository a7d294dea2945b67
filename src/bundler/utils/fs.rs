//! File system utilities for assembling the package tree.
//!
//! Existence checks report through a `bool` and log what is missing; every
//! mutating operation returns a [`Result`] carrying the offending path so the
//! caller can abort the workflow on the first failure.

use crate::bundler::error::{Error, ErrorExt, Result};
use std::{io, path::Path};
use tokio::fs;

/// Returns true if `path` is an existing regular file.
pub fn check_file_exists(path: &Path) -> bool {
    path.is_file()
}

/// Returns true if `path` is an existing regular file that can be opened for reading.
pub fn check_file_readable(path: &Path) -> bool {
    check_file_exists(path) && std::fs::File::open(path).is_ok()
}

/// Checks a directory's presence.
///
/// With `reverse` unset this succeeds when the directory exists; with
/// `reverse` set it succeeds when the directory is absent. A failed check is
/// logged unless `quiet` is set.
pub fn check_folder(path: &Path, reverse: bool, quiet: bool) -> bool {
    let exists = path.is_dir();
    if exists != reverse {
        return true;
    }
    if !quiet {
        if exists {
            log::error!("{} does exist.", path.display());
        } else {
            log::error!("{} does not exist.", path.display());
        }
    }
    false
}

/// Removes a directory tree.
///
/// A missing directory is an error unless `tolerate_missing` is set.
pub async fn delete_folder(path: &Path, tolerate_missing: bool) -> Result<()> {
    if !check_folder(path, false, tolerate_missing) {
        if tolerate_missing {
            return Ok(());
        }
        return Err(Error::Fs {
            context: "deleting directory",
            path: path.to_path_buf(),
            error: io::Error::from(io::ErrorKind::NotFound),
        });
    }
    fs::remove_dir_all(path)
        .await
        .fs_context("deleting directory", path)
}

/// Removes a single file.
///
/// A missing file is an error unless `tolerate_missing` is set.
pub async fn delete_file(path: &Path, tolerate_missing: bool) -> Result<()> {
    if !path.is_file() {
        if tolerate_missing {
            return Ok(());
        }
        return Err(Error::Fs {
            context: "deleting file",
            path: path.to_path_buf(),
            error: io::Error::from(io::ErrorKind::NotFound),
        });
    }
    fs::remove_file(path).await.fs_context("deleting file", path)
}

/// Creates a directory and any missing parents.
///
/// Fails if the path already exists.
pub async fn create_folder(path: &Path) -> Result<()> {
    if path.exists() {
        return Err(Error::Fs {
            context: "creating directory",
            path: path.to_path_buf(),
            error: io::Error::from(io::ErrorKind::AlreadyExists),
        });
    }
    fs::create_dir_all(path)
        .await
        .fs_context("creating directory", path)
}

/// Makes a symbolic link to a directory.
#[cfg(unix)]
fn symlink_dir(src: &Path, dst: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(src, dst)
}

/// Makes a symbolic link to a file.
#[cfg(unix)]
fn symlink_file(src: &Path, dst: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(src, dst)
}

/// Copies a regular file from one path to another, creating any parent
/// directories of the destination path as necessary. An existing
/// destination is overwritten.
///
/// Fails if the source path is a directory or doesn't exist.
pub async fn copy_file(from: &Path, to: &Path) -> Result<()> {
    if !from.exists() {
        return Err(Error::GenericError(format!("{} does not exist", from.display())));
    }
    if !from.is_file() {
        return Err(Error::GenericError(format!("{} is not a file", from.display())));
    }
    if let Some(dest_dir) = to.parent() {
        fs::create_dir_all(dest_dir)
            .await
            .fs_context("creating directory", dest_dir)?;
    }
    fs::copy(from, to).await.fs_context("copying file", from)?;
    Ok(())
}

/// Recursively copies a directory from one path to another, creating any
/// parent directories of the destination path as necessary.
///
/// Preserves symlinks. Fails if the source path is not a directory or
/// doesn't exist, or if the destination path already exists.
pub async fn copy_folder(from: &Path, to: &Path) -> Result<()> {
    if !from.is_dir() {
        return Err(Error::GenericError(format!(
            "{} does not exist or is not a directory",
            from.display()
        )));
    }
    if to.exists() {
        return Err(Error::Fs {
            context: "copying directory to",
            path: to.to_path_buf(),
            error: io::Error::from(io::ErrorKind::AlreadyExists),
        });
    }
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent)
            .await
            .fs_context("creating directory", parent)?;
    }

    for entry in walkdir::WalkDir::new(from) {
        let entry = entry?;
        let rel_path = entry.path().strip_prefix(from)?;
        let dest_path = to.join(rel_path);

        if entry.file_type().is_symlink() {
            let target = fs::read_link(entry.path())
                .await
                .fs_context("reading symlink", entry.path())?;
            #[cfg(unix)]
            {
                let linked = if entry.path().is_dir() {
                    symlink_dir(&target, &dest_path)
                } else {
                    symlink_file(&target, &dest_path)
                };
                linked.fs_context("creating symlink", &dest_path)?;
            }
            #[cfg(not(unix))]
            {
                let _ = target;
                fs::copy(entry.path(), &dest_path)
                    .await
                    .fs_context("copying file", entry.path())?;
            }
        } else if entry.file_type().is_dir() {
            fs::create_dir_all(&dest_path)
                .await
                .fs_context("creating directory", &dest_path)?;
        } else {
            fs::copy(entry.path(), &dest_path)
                .await
                .fs_context("copying file", entry.path())?;
        }
    }

    Ok(())
}

/// Adds read and execute permission for user, group and others (`chmod +rx`).
#[cfg(unix)]
pub async fn set_readable_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let metadata = fs::metadata(path)
        .await
        .fs_context("reading permissions of", path)?;
    let mode = metadata.permissions().mode() | 0o555;
    fs::set_permissions(path, std::fs::Permissions::from_mode(mode))
        .await
        .fs_context("setting executable permission on", path)
}

/// Permission bits are a no-op outside Unix.
#[cfg(not(unix))]
pub async fn set_readable_executable(_path: &Path) -> Result<()> {
    Ok(())
}
