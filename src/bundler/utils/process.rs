//! External command execution with captured output and a time budget.
//!
//! Commands are spawned directly (no shell), their stdout and stderr are
//! captured, and a non-zero exit is logged together with both streams
//! unless the caller asked for quiet execution. A command that outlives its
//! budget is killed and reported as [`Error::CommandTimeout`].

use crate::bundler::error::{Error, Result};
use std::{
    ffi::{OsStr, OsString},
    process::Stdio,
    time::Duration,
};

/// Captured result of a finished command.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// Decoded standard output
    pub stdout: String,
    /// Decoded standard error
    pub stderr: String,
}

/// An external command line.
#[derive(Debug, Clone)]
pub struct Cmd {
    program: OsString,
    args: Vec<OsString>,
    quiet: bool,
}

impl Cmd {
    /// Starts a command line for `program`.
    pub fn new(program: impl AsRef<OsStr>) -> Self {
        Self {
            program: program.as_ref().to_os_string(),
            args: Vec::new(),
            quiet: false,
        }
    }

    /// Appends one argument.
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    /// Appends several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|a| a.as_ref().to_os_string()));
        self
    }

    /// Suppresses the error log on non-zero exit.
    pub fn quiet(mut self) -> Self {
        self.quiet = true;
        self
    }

    /// Renders the command line for diagnostics.
    pub fn display(&self) -> String {
        std::iter::once(&self.program)
            .chain(self.args.iter())
            .map(|part| part.to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Runs the command and only reports success or failure.
    pub async fn run(&self, timeout: Duration) -> Result<()> {
        self.output(timeout).await.map(|_| ())
    }

    /// Runs the command and returns its captured output.
    pub async fn output(&self, timeout: Duration) -> Result<CommandOutput> {
        let command = self.display();
        log::debug!("Running {}", command);

        let child = tokio::process::Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|error| Error::CommandFailed {
                command: command.clone(),
                error,
            })?;

        // Dropping the pending future on timeout kills the child.
        let output = match tokio::time::timeout(timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(error)) => return Err(Error::CommandFailed { command, error }),
            Err(_elapsed) => {
                log::error!(
                    "Command '{}' did not finish within {}s and was killed.",
                    command,
                    timeout.as_secs()
                );
                return Err(Error::CommandTimeout { command, timeout });
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !output.status.success() {
            if !self.quiet {
                log::error!(
                    "Command '{}' returned {:?} with the following output: '{}' and the following error output: '{}'",
                    command,
                    output.status.code(),
                    stdout.trim_end(),
                    stderr.trim_end()
                );
            }
            return Err(Error::CommandStatus {
                command,
                code: output.status.code(),
            });
        }

        Ok(CommandOutput { stdout, stderr })
    }
}
