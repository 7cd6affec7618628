//! Filesystem port for the gateway's file operations.

use std::io;
use std::path::Path;

use crate::model::EntryMetadata;

/// Provides the filesystem primitives the nodes are built from.
///
/// Paths handed to the port are already resolved. Errors are plain
/// `io::Error`s; the nodes classify them into gateway error kinds.
pub trait FileSystem: Send + Sync {
    /// Describes a single entry. Type flags follow symlinks, `is_symlink`
    /// does not.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry does not exist or cannot be inspected.
    fn stat(&self, path: &Path) -> io::Result<EntryMetadata>;

    /// Lists the immediate children of a directory, in no particular order.
    ///
    /// Children that vanish or cannot be inspected mid-listing are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory itself cannot be read.
    fn list_dir(&self, path: &Path) -> io::Result<Vec<EntryMetadata>>;

    /// Reads at most `limit` bytes from the start of a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or read.
    fn read_limited(&self, path: &Path, limit: u64) -> io::Result<Vec<u8>>;

    /// Replaces the file at `path` with `contents`, atomically.
    ///
    /// The parent directory must exist. With `overwrite` false the call
    /// fails with `AlreadyExists` instead of replacing an existing entry.
    /// No partially written file is ever visible at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the temporary file cannot be written or moved.
    fn write_atomic(&self, path: &Path, contents: &[u8], overwrite: bool) -> io::Result<()>;

    /// Copies the bytes of `from` to `to`, atomically, under the same
    /// overwrite contract as [`FileSystem::write_atomic`].
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be read or the copy cannot be
    /// moved into place.
    fn copy_atomic(&self, from: &Path, to: &Path, overwrite: bool) -> io::Result<()>;

    /// Creates a directory, and its missing ancestors when `parents` is set.
    ///
    /// # Errors
    ///
    /// Returns an error if any directory cannot be created.
    fn create_dir(&self, path: &Path, parents: bool) -> io::Result<()>;

    /// Removes a file (or a symlink) without touching directories.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry cannot be removed.
    fn remove_file(&self, path: &Path) -> io::Result<()>;

    /// Returns `true` if something exists at `path` (following symlinks).
    fn exists(&self, path: &Path) -> bool;
}
