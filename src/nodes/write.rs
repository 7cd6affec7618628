//! `FileWriter` node: write text to a file, creating parent directories.

use std::io;
use std::path::Path;

use serde::Serialize;

use crate::context::ServiceContext;
use crate::encoding::TextEncoding;
use crate::error::GatewayError;
use crate::model::{FileInfo, OperationStatus};
use crate::path;

/// Inputs of a file write.
#[derive(Debug, Clone)]
pub struct WriteInput {
    /// Destination file.
    pub file_path: String,
    /// Text to write.
    pub content: String,
    /// Encoding applied to `content`.
    pub encoding: TextEncoding,
    /// Replace an existing file.
    pub overwrite: bool,
}

impl Default for WriteInput {
    fn default() -> Self {
        Self {
            file_path: String::new(),
            content: String::new(),
            encoding: TextEncoding::Utf8,
            overwrite: false,
        }
    }
}

/// Confirmation plus metadata of the written file.
#[derive(Debug, Clone, Serialize)]
pub struct WriteOutput {
    /// Success message.
    pub status: OperationStatus,
    /// Metadata of the file as written.
    pub file_info: FileInfo,
}

/// Writes a file.
///
/// The content is encoded before anything touches the disk, and the file
/// is replaced atomically: readers see either the old or the new content.
///
/// # Errors
///
/// Fails with `EncodeError`, `AlreadyExists` (nothing is written),
/// `IsADirectory`, or `WriteFailed`.
pub fn run(ctx: &ServiceContext, input: &WriteInput) -> Result<WriteOutput, GatewayError> {
    let file = path::resolve(&input.file_path, &ctx.config)?;
    let bytes = input.encoding.encode(&input.content)?;

    check_destination(ctx, &file, input.overwrite)?;
    ensure_parent(ctx, &file)?;
    ctx.fs
        .write_atomic(&file, &bytes, input.overwrite)
        .map_err(|e| GatewayError::from_write(e, &file))?;

    let entry = ctx.fs.stat(&file).map_err(|e| GatewayError::from_read(e, &file))?;
    tracing::info!(path = %file.display(), bytes = bytes.len(), encoding = %input.encoding, "wrote file");

    let status = OperationStatus::ok(format!(
        "Successfully wrote {} characters to {}",
        input.content.chars().count(),
        entry.name
    ));
    Ok(WriteOutput { status, file_info: FileInfo { entry, encoding: input.encoding.into() } })
}

/// Enforces the overwrite contract shared by writes and copies: any
/// existing entry blocks a call without `overwrite`, and a directory is
/// never replaced.
pub(crate) fn check_destination(
    ctx: &ServiceContext,
    dest: &Path,
    overwrite: bool,
) -> Result<(), GatewayError> {
    let existing = match ctx.fs.stat(dest) {
        Ok(meta) => meta,
        // A file in place of an ancestor directory also means nothing is there yet.
        Err(e) if matches!(e.kind(), io::ErrorKind::NotFound | io::ErrorKind::NotADirectory) => {
            return Ok(());
        }
        Err(e) => return Err(GatewayError::from_read(e, dest)),
    };
    if !overwrite {
        return Err(GatewayError::AlreadyExists { path: dest.to_path_buf() });
    }
    if existing.is_dir {
        return Err(GatewayError::IsADirectory { path: dest.to_path_buf() });
    }
    Ok(())
}

/// Creates the missing ancestors of `dest`.
pub(crate) fn ensure_parent(ctx: &ServiceContext, dest: &Path) -> Result<(), GatewayError> {
    let Some(parent) = dest.parent() else {
        return Ok(());
    };
    if ctx.fs.exists(parent) {
        return Ok(());
    }
    tracing::debug!(parent = %parent.display(), "creating parent directories");
    ctx.fs
        .create_dir(parent, true)
        .map_err(|source| GatewayError::WriteFailed { path: parent.to_path_buf(), source })
}
