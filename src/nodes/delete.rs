//! `FileDelete` node: remove a single file behind a confirmation gate.

use serde::Serialize;

use crate::context::ServiceContext;
use crate::error::GatewayError;
use crate::model::OperationStatus;
use crate::path;

/// Inputs of a deletion.
#[derive(Debug, Clone, Default)]
pub struct DeleteInput {
    /// File to delete.
    pub file_path: String,
    /// Must be true for anything to happen.
    pub confirm_delete: bool,
}

/// Confirmation of the deletion.
#[derive(Debug, Clone, Serialize)]
pub struct DeleteOutput {
    /// Success message.
    pub status: OperationStatus,
}

/// Deletes a file. Directories are never removed.
///
/// The confirmation flag is checked before the path is looked at, so an
/// unconfirmed call has no observable effect whatever the path.
///
/// # Errors
///
/// Fails with `ConfirmationRequired`, `NotFound`, `IsADirectory`,
/// `NotAFile` or `WriteFailed`.
pub fn run(ctx: &ServiceContext, input: &DeleteInput) -> Result<DeleteOutput, GatewayError> {
    if !input.confirm_delete {
        return Err(GatewayError::ConfirmationRequired);
    }
    let file = path::resolve(&input.file_path, &ctx.config)?;

    let meta = ctx.fs.stat(&file).map_err(|e| GatewayError::from_read(e, &file))?;
    if meta.is_dir {
        return Err(GatewayError::IsADirectory { path: file });
    }
    // Symlinks are unlinked, never followed; only a dangling one lacks is_file.
    if !meta.is_file && !meta.is_symlink {
        return Err(GatewayError::NotAFile { path: file });
    }

    ctx.fs.remove_file(&file).map_err(|e| GatewayError::from_write(e, &file))?;
    tracing::info!(path = %file.display(), "deleted file");

    Ok(DeleteOutput {
        status: OperationStatus::ok(format!("Successfully deleted: {}", file.display())),
    })
}
