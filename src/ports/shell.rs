//! Shell executor port for running external commands.

use std::io;
use std::path::Path;
use std::time::Duration;

/// Exit code reported when no real exit status exists (the command was
/// killed at its deadline). Real exit codes are never negative.
pub const TIMEOUT_EXIT_CODE: i32 = -1;

/// Parameters for one command execution.
#[derive(Debug, Clone, Copy)]
pub struct ShellRequest<'a> {
    /// Command text, handed to the shell interpreter unparsed.
    pub command: &'a str,
    /// Directory the command runs in.
    pub working_dir: &'a Path,
    /// Hard deadline for the whole execution.
    pub timeout: Duration,
    /// Whether stdout and stderr are captured or discarded.
    pub capture_output: bool,
}

/// The output of a shell command execution.
#[derive(Debug, Clone, Default)]
pub struct ShellOutput {
    /// The exit code of the process; meaningless when `timed_out` is set.
    pub exit_code: i32,
    /// The captured standard output.
    pub stdout: String,
    /// The captured standard error.
    pub stderr: String,
    /// Whether the process was killed at the deadline.
    pub timed_out: bool,
    /// Whether either stream exceeded the output cap.
    pub truncated: bool,
}

/// Executes shell commands.
///
/// The command text is never inspected: quoting, chaining and any other
/// shell syntax are the caller's responsibility.
pub trait ShellExecutor: Send + Sync {
    /// Runs a command string in the configured shell and returns its output.
    ///
    /// Implementations must not leave the process (or the processes it
    /// spawned) running once they report a timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot be spawned or waited on.
    fn run(&self, request: &ShellRequest<'_>) -> io::Result<ShellOutput>;
}
