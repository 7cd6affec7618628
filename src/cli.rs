//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::encoding::{ReadEncoding, TextEncoding};

/// Top-level CLI parser for `filegate`.
#[derive(Debug, Parser)]
#[command(name = "filegate", version, about = "Local file and command gateway")]
pub struct Cli {
    /// YAML configuration file.
    #[arg(long, global = true, env = "FILEGATE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level used when `RUST_LOG` is not set.
    #[arg(long, global = true, env = "FILEGATE_LOG", default_value = "warn")]
    pub log_level: String,

    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands, one per node plus the catalog.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the files and directories inside a directory.
    Browse(BrowseArgs),
    /// Read a file as text or base64.
    Read(ReadArgs),
    /// Write text to a file.
    Write(WriteArgs),
    /// Copy a file.
    Copy(CopyArgs),
    /// Run a command through the configured shell.
    Exec(ExecArgs),
    /// Create a directory.
    Mkdir(MkdirArgs),
    /// Delete a file.
    Delete(DeleteArgs),
    /// Print the node catalog.
    Nodes,
}

/// Arguments of `browse`.
#[derive(Debug, Args)]
pub struct BrowseArgs {
    /// Directory to list.
    #[arg(default_value = "~")]
    pub directory: String,
    /// Include dotfiles.
    #[arg(long)]
    pub show_hidden: bool,
    /// Glob applied to entry names.
    #[arg(long, default_value = "*")]
    pub filter: String,
}

/// Arguments of `read`.
#[derive(Debug, Args)]
pub struct ReadArgs {
    /// File to read.
    pub file: String,
    /// How to decode the bytes.
    #[arg(long, value_enum, default_value_t = ReadEncoding::Utf8)]
    pub encoding: ReadEncoding,
    /// Size cap in megabytes.
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u32).range(1..=100))]
    pub max_size_mb: u32,
}

/// Arguments of `write`.
#[derive(Debug, Args)]
pub struct WriteArgs {
    /// Destination file.
    pub file: String,
    /// Text to write.
    #[arg(long, allow_hyphen_values = true)]
    pub content: String,
    /// Encoding applied to the content.
    #[arg(long, value_enum, default_value_t = TextEncoding::Utf8)]
    pub encoding: TextEncoding,
    /// Replace an existing file.
    #[arg(long)]
    pub overwrite: bool,
}

/// Arguments of `copy`.
#[derive(Debug, Args)]
pub struct CopyArgs {
    /// File to copy.
    pub source: String,
    /// Destination path.
    pub destination: String,
    /// Replace an existing destination.
    #[arg(long)]
    pub overwrite: bool,
}

/// Arguments of `exec`.
#[derive(Debug, Args)]
pub struct ExecArgs {
    /// Command text, passed to the shell unparsed.
    #[arg(allow_hyphen_values = true)]
    pub command: String,
    /// Working directory.
    #[arg(long, default_value = "~")]
    pub cwd: String,
    /// Timeout in seconds.
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u64).range(1..=300))]
    pub timeout: u64,
    /// Discard stdout and stderr.
    #[arg(long)]
    pub no_capture: bool,
}

/// Arguments of `mkdir`.
#[derive(Debug, Args)]
pub struct MkdirArgs {
    /// Directory to create.
    pub directory: String,
    /// Fail instead of creating missing parents.
    #[arg(long)]
    pub no_parents: bool,
}

/// Arguments of `delete`.
#[derive(Debug, Args)]
pub struct DeleteArgs {
    /// File to delete.
    pub file: String,
    /// Confirm the deletion.
    #[arg(long)]
    pub confirm: bool,
}
