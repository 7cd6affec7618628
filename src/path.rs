//! Turns user-supplied path strings into absolute, normalized paths.
//!
//! Resolution is lexical: `~` is expanded from the configured home
//! directory, relative paths are joined onto the configured working
//! directory, and `.`/`..` segments are folded away. Symlinks are not
//! followed and existence is not checked. Unless a root is configured
//! this is normalization, not containment.

use std::path::{Component, Path, PathBuf};

use crate::config::GatewayConfig;
use crate::error::GatewayError;

/// Resolves `input` against `config`.
///
/// # Errors
///
/// Returns [`GatewayError::InvalidPath`] for empty input or embedded NUL
/// bytes, and [`GatewayError::OutsideRoot`] when a configured root would
/// be escaped.
pub fn resolve(input: &str, config: &GatewayConfig) -> Result<PathBuf, GatewayError> {
    if input.is_empty() {
        return Err(GatewayError::InvalidPath { reason: "path is empty".to_string() });
    }
    if input.contains('\0') {
        return Err(GatewayError::InvalidPath {
            reason: format!("path contains a NUL byte: {:?}", input.replace('\0', "\\0")),
        });
    }

    let expanded = expand_home(input, &config.home_dir);
    let absolute =
        if expanded.is_absolute() { expanded } else { config.working_dir.join(expanded) };
    let resolved = normalize(&absolute);

    if let Some(root) = &config.root {
        let root = normalize(root);
        if !resolved.starts_with(&root) {
            return Err(GatewayError::OutsideRoot { path: resolved, root });
        }
    }

    tracing::debug!(input, resolved = %resolved.display(), "resolved path");
    Ok(resolved)
}

fn expand_home(input: &str, home: &Path) -> PathBuf {
    if input == "~" {
        return home.to_path_buf();
    }
    match input.strip_prefix("~/").or_else(|| input.strip_prefix("~\\")) {
        Some(rest) => home.join(rest),
        None => PathBuf::from(input),
    }
}

/// Folds `.` and `..` segments without touching the filesystem.
///
/// `..` at the root stays at the root.
#[must_use]
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => out.push(component),
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            Component::Normal(part) => out.push(part),
        }
    }
    out
}
