//! Core library entry for the `filegate` CLI.
//!
//! `filegate` exposes seven filesystem and process operations ("nodes")
//! behind port traits so a workflow host, or the bundled CLI, can call
//! them with typed inputs and get JSON back.

pub mod adapters;
pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod encoding;
pub mod error;
pub mod logging;
pub mod model;
pub mod nodes;
pub mod path;
pub mod ports;

use clap::error::ErrorKind as ClapErrorKind;
use clap::Parser;

/// Run the CLI with the provided arguments.
///
/// # Errors
///
/// Returns an error string when argument parsing fails or the command fails.
pub fn run<I, T>(args: I) -> Result<(), String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = match cli::Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err)
            if matches!(err.kind(), ClapErrorKind::DisplayHelp | ClapErrorKind::DisplayVersion) =>
        {
            print!("{err}");
            return Ok(());
        }
        Err(err) => return Err(err.to_string()),
    };
    logging::init(&cli.log_level);
    commands::dispatch(&cli)
}
