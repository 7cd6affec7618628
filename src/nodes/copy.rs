//! `FileCopy` node: byte-exact copy of one regular file.

use serde::Serialize;

use crate::context::ServiceContext;
use crate::error::GatewayError;
use crate::model::{EntryMetadata, OperationStatus};
use crate::nodes::write::{check_destination, ensure_parent};
use crate::path;

/// Inputs of a copy.
#[derive(Debug, Clone, Default)]
pub struct CopyInput {
    /// File to copy.
    pub source_path: String,
    /// Where the copy goes.
    pub destination_path: String,
    /// Replace an existing destination file.
    pub overwrite: bool,
}

/// Metadata of the new copy plus where it came from.
#[derive(Debug, Clone, Serialize)]
pub struct CopyInfo {
    /// Destination metadata.
    #[serde(flatten)]
    pub entry: EntryMetadata,
    /// Resolved source path.
    pub source: String,
}

/// Confirmation plus metadata of the destination.
#[derive(Debug, Clone, Serialize)]
pub struct CopyOutput {
    /// Success message.
    pub status: OperationStatus,
    /// Destination metadata.
    pub file_info: CopyInfo,
}

/// Copies a file, preserving its bytes and permission bits.
///
/// # Errors
///
/// Fails with `NotFound` or `NotAFile` for the source, `IsADirectory` or
/// `AlreadyExists` for the destination, or `WriteFailed`.
pub fn run(ctx: &ServiceContext, input: &CopyInput) -> Result<CopyOutput, GatewayError> {
    let source = path::resolve(&input.source_path, &ctx.config)?;
    let dest = path::resolve(&input.destination_path, &ctx.config)?;

    let source_meta = ctx.fs.stat(&source).map_err(|e| GatewayError::from_read(e, &source))?;
    if !source_meta.is_file {
        return Err(GatewayError::NotAFile { path: source });
    }

    check_destination(ctx, &dest, input.overwrite)?;
    ensure_parent(ctx, &dest)?;
    ctx.fs
        .copy_atomic(&source, &dest, input.overwrite)
        .map_err(|e| GatewayError::from_write(e, &dest))?;

    let entry = ctx.fs.stat(&dest).map_err(|e| GatewayError::from_read(e, &dest))?;
    tracing::info!(from = %source.display(), to = %dest.display(), bytes = entry.size, "copied file");

    let status = OperationStatus::ok(format!(
        "Successfully copied {} to {}",
        source_meta.name,
        dest.display()
    ));
    Ok(CopyOutput {
        status,
        file_info: CopyInfo { entry, source: source.display().to_string() },
    })
}
