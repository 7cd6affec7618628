//! `DirectoryCreator` node: idempotent directory creation.

use serde::Serialize;

use crate::context::ServiceContext;
use crate::error::GatewayError;
use crate::model::{EntryMetadata, OperationStatus};
use crate::path;

/// Inputs of a directory creation.
#[derive(Debug, Clone)]
pub struct MkdirInput {
    /// Directory to create.
    pub directory_path: String,
    /// Create missing ancestors as well.
    pub create_parents: bool,
}

impl Default for MkdirInput {
    fn default() -> Self {
        Self { directory_path: String::new(), create_parents: true }
    }
}

/// Directory metadata plus whether this call created it.
#[derive(Debug, Clone, Serialize)]
pub struct DirectoryInfo {
    /// Directory metadata.
    #[serde(flatten)]
    pub entry: EntryMetadata,
    /// False when the directory was already there.
    pub created: bool,
}

/// Confirmation plus metadata of the directory.
#[derive(Debug, Clone, Serialize)]
pub struct MkdirOutput {
    /// Success message.
    pub status: OperationStatus,
    /// Directory metadata.
    pub directory_info: DirectoryInfo,
}

/// Creates a directory. An existing directory is a success.
///
/// # Errors
///
/// Fails with `AlreadyExists` when a non-directory occupies the path,
/// `ParentMissing` when parents were not requested, or `WriteFailed`.
pub fn run(ctx: &ServiceContext, input: &MkdirInput) -> Result<MkdirOutput, GatewayError> {
    let dir = path::resolve(&input.directory_path, &ctx.config)?;

    if let Ok(existing) = ctx.fs.stat(&dir) {
        if !existing.is_dir {
            return Err(GatewayError::AlreadyExists { path: dir });
        }
        tracing::debug!(dir = %dir.display(), "directory already present");
        return Ok(MkdirOutput {
            status: OperationStatus::ok(format!("Directory already exists: {}", dir.display())),
            directory_info: DirectoryInfo { entry: existing, created: false },
        });
    }

    if !input.create_parents {
        if let Some(parent) = dir.parent().filter(|p| !ctx.fs.exists(p)) {
            return Err(GatewayError::ParentMissing { parent: parent.to_path_buf() });
        }
    }

    ctx.fs
        .create_dir(&dir, input.create_parents)
        .map_err(|e| GatewayError::from_write(e, &dir))?;
    let entry = ctx.fs.stat(&dir).map_err(|e| GatewayError::from_read(e, &dir))?;
    tracing::info!(dir = %dir.display(), parents = input.create_parents, "created directory");

    Ok(MkdirOutput {
        status: OperationStatus::ok(format!("Successfully created directory: {}", dir.display())),
        directory_info: DirectoryInfo { entry, created: true },
    })
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use super::*;
    use crate::config::GatewayConfig;
    use crate::error::ErrorKind;

    fn scratch(name: &str) -> (ServiceContext, PathBuf) {
        let dir = std::env::temp_dir().join(format!("filegate_mkdir_{name}_{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        let config = GatewayConfig { working_dir: dir.clone(), ..GatewayConfig::default() };
        (ServiceContext::live(config), dir)
    }

    fn input(path: &str, create_parents: bool) -> MkdirInput {
        MkdirInput { directory_path: path.to_string(), create_parents }
    }

    #[test]
    fn nested_creation_is_idempotent() {
        let (ctx, dir) = scratch("nested");

        let first = run(&ctx, &input("x/y/z", true)).unwrap();
        assert!(first.directory_info.created);
        assert!(dir.join("x/y/z").is_dir());
        assert_eq!(
            first.status.message,
            format!("Successfully created directory: {}", dir.join("x/y/z").display())
        );

        let second = run(&ctx, &input("x/y/z", true)).unwrap();
        assert!(second.status.success);
        assert!(!second.directory_info.created);
        assert!(second.status.message.starts_with("Directory already exists: "));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_parent_without_flag_is_refused() {
        let (ctx, dir) = scratch("no_parents");

        let err = run(&ctx, &input("a/b", false)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ParentMissing);
        assert!(!dir.join("a").exists());

        run(&ctx, &input("a", false)).unwrap();
        assert!(dir.join("a").is_dir());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn file_in_the_way_is_already_exists() {
        let (ctx, dir) = scratch("file_in_way");
        fs::write(dir.join("taken"), "x").unwrap();

        let err = run(&ctx, &input("taken", true)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AlreadyExists);
        assert!(dir.join("taken").is_file());

        let _ = fs::remove_dir_all(&dir);
    }
}
