//! Live filesystem adapter using `std::fs` and `tempfile`.

use std::fs::{self, File, Metadata};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Utc};
use tempfile::NamedTempFile;

use crate::model::EntryMetadata;
use crate::ports::filesystem::FileSystem;

/// Live filesystem adapter backed by real disk I/O.
pub struct LiveFileSystem;

impl LiveFileSystem {
    fn describe(path: &Path, link: &Metadata, target: Option<&Metadata>) -> EntryMetadata {
        let is_dir = target.is_some_and(Metadata::is_dir);
        let is_file = target.is_some_and(Metadata::is_file);
        let modified = target
            .unwrap_or(link)
            .modified()
            .unwrap_or(SystemTime::UNIX_EPOCH);

        EntryMetadata {
            name: path
                .file_name()
                .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned()),
            path: path.display().to_string(),
            size: if is_file { target.map_or(0, Metadata::len) } else { 0 },
            modified_at: DateTime::<Utc>::from(modified),
            is_dir,
            is_file,
            is_symlink: link.file_type().is_symlink(),
        }
    }

    /// Creates a hidden temporary file next to `path`, named after it.
    fn temp_beside(path: &Path) -> io::Result<NamedTempFile> {
        let parent = path.parent().ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidInput, "path has no parent directory")
        })?;
        let prefix = format!(
            ".{}.",
            path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default()
        );

        let mut builder = tempfile::Builder::new();
        builder.prefix(&prefix).suffix(".tmp");
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            // Regular umask-governed mode instead of tempfile's private 0600.
            builder.permissions(fs::Permissions::from_mode(0o666));
        }
        builder.tempfile_in(parent)
    }

    /// Where a replacement of `path` lands: the link target when `path` is
    /// a symlink, so the link survives and its target gets the new content.
    fn replacement_target(path: &Path) -> io::Result<PathBuf> {
        let is_link = fs::symlink_metadata(path).is_ok_and(|m| m.file_type().is_symlink());
        if !is_link {
            return Ok(path.to_path_buf());
        }
        match fs::canonicalize(path) {
            Ok(target) => Ok(target),
            // Dangling link: create the file it names.
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                let link = fs::read_link(path)?;
                Ok(path.parent().map_or_else(|| link.clone(), |parent| parent.join(&link)))
            }
            Err(e) => Err(e),
        }
    }

    fn persist(temp: NamedTempFile, path: &Path, overwrite: bool) -> io::Result<()> {
        temp.as_file().sync_all()?;
        let persisted = if overwrite { temp.persist(path) } else { temp.persist_noclobber(path) };
        // On failure the returned handle is dropped, which deletes the temp file.
        persisted.map(drop).map_err(|e| e.error)
    }
}

impl FileSystem for LiveFileSystem {
    fn stat(&self, path: &Path) -> io::Result<EntryMetadata> {
        let link = fs::symlink_metadata(path)?;
        if link.file_type().is_symlink() {
            let target = fs::metadata(path).ok();
            Ok(Self::describe(path, &link, target.as_ref()))
        } else {
            Ok(Self::describe(path, &link, Some(&link)))
        }
    }

    fn list_dir(&self, path: &Path) -> io::Result<Vec<EntryMetadata>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(path)? {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    tracing::warn!(dir = %path.display(), "skipping dir entry: {e}");
                    continue;
                }
            };
            match self.stat(&entry.path()) {
                Ok(meta) => entries.push(meta),
                Err(e) => tracing::warn!(entry = %entry.path().display(), "skipping: {e}"),
            }
        }
        Ok(entries)
    }

    fn read_limited(&self, path: &Path, limit: u64) -> io::Result<Vec<u8>> {
        let mut bytes = Vec::new();
        File::open(path)?.take(limit).read_to_end(&mut bytes)?;
        Ok(bytes)
    }

    fn write_atomic(&self, path: &Path, contents: &[u8], overwrite: bool) -> io::Result<()> {
        let target = Self::replacement_target(path)?;
        let mut temp = Self::temp_beside(&target)?;
        if let Ok(existing) = fs::metadata(&target) {
            fs::set_permissions(temp.path(), existing.permissions())?;
        }
        temp.write_all(contents)?;
        Self::persist(temp, &target, overwrite)
    }

    fn copy_atomic(&self, from: &Path, to: &Path, overwrite: bool) -> io::Result<()> {
        let mut source = File::open(from)?;
        let permissions = source.metadata()?.permissions();
        let target = Self::replacement_target(to)?;
        let mut temp = Self::temp_beside(&target)?;
        io::copy(&mut source, temp.as_file_mut())?;
        fs::set_permissions(temp.path(), permissions)?;
        Self::persist(temp, &target, overwrite)
    }

    fn create_dir(&self, path: &Path, parents: bool) -> io::Result<()> {
        if parents {
            fs::create_dir_all(path)
        } else {
            fs::create_dir(path)
        }
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}
