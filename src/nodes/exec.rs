//! `ShellExecutor` node: run one command text under the configured shell.

use std::ops::RangeInclusive;
use std::time::Duration;

use serde_json::{json, Value};

use crate::context::ServiceContext;
use crate::error::GatewayError;
use crate::model::CommandResult;
use crate::path;
use crate::ports::shell::{ShellRequest, TIMEOUT_EXIT_CODE};

/// Accepted values for [`ExecInput::timeout_seconds`].
pub const TIMEOUT_RANGE: RangeInclusive<u64> = 1..=300;

/// Inputs of a command execution.
#[derive(Debug, Clone)]
pub struct ExecInput {
    /// Command text; handed to the shell as is.
    pub command: String,
    /// Directory the command runs in.
    pub working_directory: String,
    /// Hard deadline in seconds.
    pub timeout_seconds: u64,
    /// Capture stdout and stderr instead of discarding them.
    pub capture_output: bool,
}

impl Default for ExecInput {
    fn default() -> Self {
        Self {
            command: String::new(),
            working_directory: "~".to_string(),
            timeout_seconds: 30,
            capture_output: true,
        }
    }
}

/// Runs a command. A non-zero exit code is a result, not a failure.
///
/// The command text is not inspected: quoting and chaining are the
/// caller's business, and nothing here makes running it safe.
///
/// # Errors
///
/// Fails with `InvalidInput` for an out-of-range timeout, `NotFound` or
/// `NotADirectory` for the working directory, `Io` when the shell cannot
/// be spawned, and `Timeout` once the deadline kills the command.
pub fn run(ctx: &ServiceContext, input: &ExecInput) -> Result<CommandResult, GatewayError> {
    if !TIMEOUT_RANGE.contains(&input.timeout_seconds) {
        return Err(GatewayError::InvalidInput {
            field: "timeout_seconds",
            reason: format!(
                "{} is outside {}..={}",
                input.timeout_seconds,
                TIMEOUT_RANGE.start(),
                TIMEOUT_RANGE.end()
            ),
        });
    }
    let cwd = path::resolve(&input.working_directory, &ctx.config)?;
    let meta = ctx.fs.stat(&cwd).map_err(|e| GatewayError::from_read(e, &cwd))?;
    if !meta.is_dir {
        return Err(GatewayError::NotADirectory { path: cwd });
    }

    let request = ShellRequest {
        command: &input.command,
        working_dir: &cwd,
        timeout: Duration::from_secs(input.timeout_seconds),
        capture_output: input.capture_output,
    };
    let output = ctx
        .shell
        .run(&request)
        .map_err(|source| GatewayError::Io { path: cwd.clone(), source })?;

    if output.timed_out {
        return Err(GatewayError::Timeout { seconds: input.timeout_seconds });
    }
    tracing::info!(exit_code = output.exit_code, truncated = output.truncated, "command completed");
    Ok(CommandResult {
        stdout: output.stdout,
        stderr: output.stderr,
        exit_code: output.exit_code,
        truncated: output.truncated,
    })
}

/// Failure report with the command channels filled in: empty stdout, the
/// message on stderr and the sentinel exit code.
#[must_use]
pub fn failure(err: &GatewayError) -> Value {
    let mut report = err.report();
    if let Value::Object(fields) = &mut report {
        fields.insert("stdout".into(), json!(""));
        fields.insert("stderr".into(), json!(format!("Error: {err}")));
        fields.insert("exit_code".into(), json!(TIMEOUT_EXIT_CODE));
    }
    report
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::adapters::live::LiveFileSystem;
    use crate::config::GatewayConfig;
    use crate::error::ErrorKind;
    use crate::ports::shell::{ShellExecutor, ShellOutput};

    /// Records the request and replays a canned output.
    type Seen = Arc<Mutex<Option<(String, PathBuf, Duration, bool)>>>;

    struct CannedShell {
        output: ShellOutput,
        seen: Seen,
    }

    impl ShellExecutor for CannedShell {
        fn run(&self, request: &ShellRequest<'_>) -> io::Result<ShellOutput> {
            *self.seen.lock().unwrap() = Some((
                request.command.to_string(),
                request.working_dir.to_path_buf(),
                request.timeout,
                request.capture_output,
            ));
            Ok(self.output.clone())
        }
    }

    fn context(output: ShellOutput) -> ServiceContext {
        context_with_log(output).0
    }

    fn context_with_log(output: ShellOutput) -> (ServiceContext, Seen) {
        let seen = Seen::default();
        let shell = CannedShell { output, seen: Arc::clone(&seen) };
        let config = GatewayConfig {
            home_dir: std::env::temp_dir(),
            working_dir: std::env::temp_dir(),
            ..GatewayConfig::default()
        };
        (ServiceContext::new(Box::new(LiveFileSystem), Box::new(shell), config), seen)
    }

    fn input(command: &str) -> ExecInput {
        ExecInput { command: command.to_string(), ..ExecInput::default() }
    }

    #[test]
    fn request_carries_resolved_directory_and_flags() {
        let (ctx, seen) = context_with_log(ShellOutput::default());

        let input = ExecInput {
            working_directory: "~/.".into(),
            timeout_seconds: 7,
            capture_output: false,
            ..input("echo a && echo b")
        };
        run(&ctx, &input).unwrap();

        let (command, cwd, timeout, capture) = seen.lock().unwrap().clone().unwrap();
        assert_eq!(command, "echo a && echo b");
        assert_eq!(cwd, crate::path::normalize(&std::env::temp_dir()));
        assert_eq!(timeout, Duration::from_secs(7));
        assert!(!capture);
    }

    #[test]
    fn non_zero_exit_is_a_result() {
        let ctx = context(ShellOutput {
            exit_code: 2,
            stderr: "boom\n".into(),
            ..ShellOutput::default()
        });

        let result = run(&ctx, &input("false")).unwrap();
        assert_eq!(result.exit_code, 2);
        assert_eq!(result.stderr, "boom\n");
    }

    #[test]
    fn timed_out_output_becomes_timeout_error() {
        let ctx = context(ShellOutput {
            timed_out: true,
            exit_code: TIMEOUT_EXIT_CODE,
            ..ShellOutput::default()
        });

        let err = run(&ctx, &ExecInput { timeout_seconds: 1, ..input("sleep 5") }).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Timeout);
        assert_eq!(err.to_string(), "command timed out after 1 seconds");
    }

    #[test]
    fn timeout_outside_range_is_rejected() {
        let ctx = context(ShellOutput::default());
        for seconds in [0, 301] {
            let err = run(&ctx, &ExecInput { timeout_seconds: seconds, ..input("true") }).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidInput);
        }
    }

    #[test]
    fn missing_working_directory_is_not_found() {
        let ctx = context(ShellOutput::default());
        let err = run(
            &ctx,
            &ExecInput { working_directory: "no/such/dir/here".into(), ..input("true") },
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn failure_report_fills_command_channels() {
        let report = failure(&GatewayError::Timeout { seconds: 3 });
        assert_eq!(report["success"], json!(false));
        assert_eq!(report["kind"], json!("timeout"));
        assert_eq!(report["stdout"], json!(""));
        assert_eq!(report["stderr"], json!("Error: command timed out after 3 seconds"));
        assert_eq!(report["exit_code"], json!(-1));
    }

    #[cfg(unix)]
    #[test]
    fn live_shell_runs_in_resolved_directory() {
        let dir = std::env::temp_dir().join(format!("filegate_exec_cwd_{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        let config = GatewayConfig { home_dir: dir.clone(), ..GatewayConfig::default() };
        let ctx = ServiceContext::live(config);

        let result = run(&ctx, &input("ls; echo err >&2; exit 4")).unwrap();
        assert_eq!(result.exit_code, 4);
        assert_eq!(result.stdout, "");
        assert_eq!(result.stderr, "err\n");

        let _ = std::fs::remove_dir_all(&dir);
    }
}
