//! Error types for packaging operations.
//!
//! Provides contextual error chaining, filesystem errors that carry the
//! offending path, and the failure classes of the packaging workflow
//! (missing tools, missing templates, rejected downloads, failed commands).
//!
//! # Example
//!
//! ```no_run
//! use ide_packager::bundler::{Context, ErrorExt, Result};
//! use std::path::Path;
//!
//! fn read_template(path: &Path) -> Result<String> {
//!     let contents = std::fs::read_to_string(path)
//!         .fs_context("reading template", path)?;
//!
//!     if contents.is_empty() {
//!         ide_packager::bail!("template {} is empty", path.display());
//!     }
//!
//!     Ok(contents)
//! }
//!
//! fn load(path: &Path) -> Result<String> {
//!     read_template(path).context("failed to load control template")
//! }
//! ```

use std::{
    fmt::Display,
    io,
    path::{self, PathBuf},
    time::Duration,
};
use thiserror::Error as DeriveError;

/// Errors returned by the packaging workflow.
#[derive(Debug, DeriveError)]
#[non_exhaustive]
pub enum Error {
    /// Error with context. Created by the [`Context`] trait.
    #[error("{0}: {1}")]
    Context(String, Box<Self>),

    /// File system error with path context.
    ///
    /// Created by the [`ErrorExt`] trait's `fs_context` method.
    #[error("{context} {path}: {error}")]
    Fs {
        /// Context describing the operation (e.g., "reading control template")
        context: &'static str,
        /// Path that was being accessed
        path: PathBuf,
        /// The underlying I/O error
        error: io::Error,
    },

    /// Child process could not be spawned or awaited.
    #[error("failed to run command {command}: {error}")]
    CommandFailed {
        /// Command line that failed to execute
        command: String,
        /// The underlying error
        error: io::Error,
    },

    /// Child process exited with a non-zero status.
    #[error("command {command} exited with status {}", code.map_or_else(|| "signal".to_string(), |c| c.to_string()))]
    CommandStatus {
        /// Command line that was executed
        command: String,
        /// Exit code, `None` when terminated by a signal
        code: Option<i32>,
    },

    /// Child process exceeded its time budget and was killed.
    #[error("command {command} timed out after {}s", timeout.as_secs())]
    CommandTimeout {
        /// Command line that was executed
        command: String,
        /// Budget that was exceeded
        timeout: Duration,
    },

    /// Required external executables are not on `PATH`.
    #[error("required tools not found or not usable: {}", tools.join(", "))]
    MissingTools {
        /// Names of the missing executables
        tools: Vec<String>,
    },

    /// A template input is missing or unreadable.
    #[error("{} does not exist or is not readable", path.display())]
    MissingTemplate {
        /// Path of the template file or directory
        path: PathBuf,
    },

    /// The archive response failed the integrity check.
    #[error("error while downloading {url}: {reason}")]
    DownloadRejected {
        /// URL that was downloaded
        url: String,
        /// Why the response was rejected
        reason: String,
    },

    /// The download did not finish within its time budget.
    #[error("download of {url} timed out after {}s", timeout.as_secs())]
    DownloadTimeout {
        /// URL that was downloaded
        url: String,
        /// Budget that was exceeded
        timeout: Duration,
    },

    /// The package compiler reported success but produced no file.
    #[error("{} was not created", .0.display())]
    ArtifactMissing(PathBuf),

    /// Generic I/O error.
    #[error("{0}")]
    IoError(#[from] io::Error),

    /// Error walking directory (recursive copy).
    #[error("{0}")]
    WalkdirError(#[from] walkdir::Error),

    /// Path prefix stripping error.
    #[error("{0}")]
    StripError(#[from] path::StripPrefixError),

    /// HTTP client error.
    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Invalid glob pattern.
    #[error("{0}")]
    GlobPattern(#[from] glob::PatternError),

    /// Glob execution error.
    #[error("{0}")]
    Glob(#[from] glob::GlobError),

    /// Generic error with custom message.
    #[error("{0}")]
    GenericError(String),
}

/// Convenient type alias for Result.
pub type Result<T> = std::result::Result<T, Error>;

/// Trait for adding context to errors.
///
/// Similar to `anyhow::Context` but integrated with the packager's Error type.
/// Works with both `Result<T, E>` and `Option<T>`.
pub trait Context<T> {
    /// Add context to an error.
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display + Send + Sync + 'static;

    /// Add context to an error using a closure (lazy evaluation).
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C;
}

impl<T> Context<T> for Result<T> {
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
    {
        self.map_err(|e| Error::Context(context.to_string(), Box::new(e)))
    }

    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.map_err(|e| Error::Context(f().to_string(), Box::new(e)))
    }
}

impl<T> Context<T> for Option<T> {
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
    {
        self.ok_or_else(|| Error::GenericError(context.to_string()))
    }

    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.ok_or_else(|| Error::GenericError(f().to_string()))
    }
}

/// Extension trait for filesystem operations with automatic path context.
pub trait ErrorExt<T> {
    /// Add filesystem context to an I/O error.
    ///
    /// The `context` should be a present-tense verb phrase describing the operation,
    /// e.g., "reading file", "creating directory", "copying launcher".
    fn fs_context(self, context: &'static str, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, std::io::Error> {
    fn fs_context(self, context: &'static str, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|error| Error::Fs {
            context,
            path: path.into(),
            error,
        })
    }
}

impl Error {
    /// Returns the innermost error, skipping [`Error::Context`] wrappers.
    pub fn root_cause(&self) -> &Error {
        match self {
            Error::Context(_, inner) => inner.root_cause(),
            other => other,
        }
    }
}

/// Macro for early return with error.
///
/// Converts the message into a [`Error::GenericError`] and returns immediately.
///
/// ```ignore
/// bail!("operation failed");
/// bail!("invalid value: {}", value);
/// ```
#[macro_export]
macro_rules! bail {
    ($msg:literal $(,)?) => {
        return Err($crate::bundler::Error::GenericError(format!($msg)))
    };
    ($err:expr $(,)?) => {
        return Err($crate::bundler::Error::GenericError($err.to_string()))
    };
    ($fmt:expr, $($arg:tt)*) => {
        return Err($crate::bundler::Error::GenericError(format!($fmt, $($arg)*)))
    };
}
