//! Command dispatch: turn parsed arguments into node inputs and print the
//! node's single JSON channel.

use serde::Serialize;
use serde_json::{json, Value};

use crate::cli::{Cli, Command};
use crate::config::GatewayConfig;
use crate::context::ServiceContext;
use crate::error::GatewayError;
use crate::nodes::browse::{self, BrowseInput};
use crate::nodes::catalog;
use crate::nodes::copy::{self, CopyInput};
use crate::nodes::delete::{self, DeleteInput};
use crate::nodes::exec::{self, ExecInput};
use crate::nodes::mkdir::{self, MkdirInput};
use crate::nodes::read::{self, ReadInput};
use crate::nodes::write::{self, WriteInput};

/// What one command produced: the JSON body printed on stdout and, for
/// failures, the message for stderr.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    /// Success output or failure report.
    pub body: Value,
    /// Failure message; `None` on success.
    pub error: Option<String>,
}

impl Outcome {
    fn from_result<T: Serialize>(
        result: Result<T, GatewayError>,
        failure: fn(&GatewayError) -> Value,
    ) -> Self {
        match result.map(serde_json::to_value) {
            Ok(Ok(body)) => Self { body, error: None },
            Ok(Err(e)) => {
                let message = format!("failed to serialize output: {e}");
                Self { body: json!({ "success": false, "error": message }), error: Some(message) }
            }
            Err(err) => {
                tracing::debug!(kind = ?err.kind(), "node failed: {err}");
                Self { body: failure(&err), error: Some(err.to_string()) }
            }
        }
    }

    /// Whether the command succeeded.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Dispatch a parsed command line against the live filesystem and shell.
///
/// # Errors
///
/// Returns the failure message after printing the failure report.
pub fn dispatch(cli: &Cli) -> Result<(), String> {
    let outcome = match GatewayConfig::load(cli.config.as_deref()) {
        Ok(config) => execute(&cli.command, &ServiceContext::live(config)),
        Err(err) => Outcome::from_result::<()>(Err(err), GatewayError::report),
    };
    emit(outcome)
}

/// Print an outcome as pretty JSON on stdout.
///
/// # Errors
///
/// Returns the failure message carried by the outcome.
pub fn emit(outcome: Outcome) -> Result<(), String> {
    let text = serde_json::to_string_pretty(&outcome.body)
        .map_err(|e| format!("failed to render output: {e}"))?;
    println!("{text}");
    outcome.error.map_or(Ok(()), Err)
}

/// Run one command with the given service context.
#[must_use]
pub fn execute(command: &Command, ctx: &ServiceContext) -> Outcome {
    let report = GatewayError::report;
    match command {
        Command::Browse(args) => {
            let input = BrowseInput {
                directory_path: args.directory.clone(),
                show_hidden: args.show_hidden,
                filter_pattern: args.filter.clone(),
            };
            Outcome::from_result(browse::run(ctx, &input), report)
        }
        Command::Read(args) => {
            let input = ReadInput {
                file_path: args.file.clone(),
                encoding: args.encoding,
                max_size_mb: args.max_size_mb,
            };
            Outcome::from_result(read::run(ctx, &input), report)
        }
        Command::Write(args) => {
            let input = WriteInput {
                file_path: args.file.clone(),
                content: args.content.clone(),
                encoding: args.encoding,
                overwrite: args.overwrite,
            };
            Outcome::from_result(write::run(ctx, &input), report)
        }
        Command::Copy(args) => {
            let input = CopyInput {
                source_path: args.source.clone(),
                destination_path: args.destination.clone(),
                overwrite: args.overwrite,
            };
            Outcome::from_result(copy::run(ctx, &input), report)
        }
        Command::Exec(args) => {
            let input = ExecInput {
                command: args.command.clone(),
                working_directory: args.cwd.clone(),
                timeout_seconds: args.timeout,
                capture_output: !args.no_capture,
            };
            Outcome::from_result(exec::run(ctx, &input), exec::failure)
        }
        Command::Mkdir(args) => {
            let input = MkdirInput {
                directory_path: args.directory.clone(),
                create_parents: !args.no_parents,
            };
            Outcome::from_result(mkdir::run(ctx, &input), report)
        }
        Command::Delete(args) => {
            let input = DeleteInput { file_path: args.file.clone(), confirm_delete: args.confirm };
            Outcome::from_result(delete::run(ctx, &input), report)
        }
        Command::Nodes => Outcome::from_result(Ok(catalog::catalog()), report),
    }
}
