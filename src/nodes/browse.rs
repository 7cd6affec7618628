//! `FileBrowser` node: list the immediate children of a directory.

use glob::Pattern;
use serde::Serialize;

use crate::context::ServiceContext;
use crate::error::GatewayError;
use crate::model::EntryMetadata;
use crate::path;

/// Inputs of the directory listing.
#[derive(Debug, Clone)]
pub struct BrowseInput {
    /// Directory to list.
    pub directory_path: String,
    /// Include entries whose name starts with a dot.
    pub show_hidden: bool,
    /// Glob applied to entry names.
    pub filter_pattern: String,
}

impl Default for BrowseInput {
    fn default() -> Self {
        Self { directory_path: "~".to_string(), show_hidden: false, filter_pattern: "*".to_string() }
    }
}

/// Listing split into files and directories, each sorted by name.
#[derive(Debug, Clone, Serialize)]
pub struct BrowseOutput {
    /// Regular files (after following symlinks).
    pub files: Vec<EntryMetadata>,
    /// Directories (after following symlinks).
    pub directories: Vec<EntryMetadata>,
    /// The resolved directory that was listed.
    pub current_path: String,
}

/// Lists a directory.
///
/// Entries that are neither files nor directories (dangling symlinks,
/// sockets, fifos) are left out.
///
/// # Errors
///
/// Fails with `NotFound`, `NotADirectory`, `AccessDenied` or
/// `InvalidPattern`.
pub fn run(ctx: &ServiceContext, input: &BrowseInput) -> Result<BrowseOutput, GatewayError> {
    let pattern = Pattern::new(&input.filter_pattern).map_err(|e| GatewayError::InvalidPattern {
        pattern: input.filter_pattern.clone(),
        reason: e.msg.to_string(),
    })?;
    let dir = path::resolve(&input.directory_path, &ctx.config)?;

    let meta = ctx.fs.stat(&dir).map_err(|e| GatewayError::from_read(e, &dir))?;
    if !meta.is_dir {
        return Err(GatewayError::NotADirectory { path: dir });
    }

    let mut files = Vec::new();
    let mut directories = Vec::new();
    for entry in ctx.fs.list_dir(&dir).map_err(|e| GatewayError::from_read(e, &dir))? {
        if !input.show_hidden && entry.name.starts_with('.') {
            continue;
        }
        if !pattern.matches(&entry.name) {
            continue;
        }
        if entry.is_dir {
            directories.push(entry);
        } else if entry.is_file {
            files.push(entry);
        }
    }
    sort_by_name(&mut files);
    sort_by_name(&mut directories);

    tracing::debug!(
        dir = %dir.display(),
        files = files.len(),
        directories = directories.len(),
        "listed directory"
    );
    Ok(BrowseOutput { files, directories, current_path: dir.display().to_string() })
}

fn sort_by_name(entries: &mut [EntryMetadata]) {
    entries.sort_by_cached_key(|e| (e.name.to_lowercase(), e.name.clone()));
}
