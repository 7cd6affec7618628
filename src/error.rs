//! Gateway error type and its stable machine-readable kinds.

use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

use crate::encoding::TextEncoding;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Stable, machine-readable classification of a [`GatewayError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The path string could not be turned into a usable path.
    InvalidPath,
    /// The target does not exist.
    NotFound,
    /// A directory was required.
    NotADirectory,
    /// A regular file was required.
    NotAFile,
    /// The target is a directory where a file was expected.
    IsADirectory,
    /// The OS or the configured root refused access.
    AccessDenied,
    /// The target already exists and overwriting was not allowed.
    AlreadyExists,
    /// The parent directory is missing and parents were not requested.
    ParentMissing,
    /// The file exceeds the configured size cap.
    TooLarge,
    /// The bytes are not valid in the requested encoding.
    DecodeError,
    /// The text cannot be represented in the requested encoding.
    EncodeError,
    /// A destructive operation was called without confirmation.
    ConfirmationRequired,
    /// The command did not finish before its deadline.
    Timeout,
    /// A write, copy, create or delete failed.
    WriteFailed,
    /// A numeric or textual input was out of range.
    InvalidInput,
    /// The glob filter pattern is malformed.
    InvalidPattern,
    /// Configuration could not be loaded.
    Config,
    /// Any other OS failure while reading.
    IoError,
}

/// Errors surfaced at a node boundary.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Malformed path input.
    #[error("invalid path: {reason}")]
    InvalidPath {
        /// Why the input was rejected.
        reason: String,
    },

    /// The path does not exist.
    #[error("path does not exist: {}", .path.display())]
    NotFound {
        /// Resolved path that was looked up.
        path: PathBuf,
    },

    /// The path exists but is not a directory.
    #[error("path is not a directory: {}", .path.display())]
    NotADirectory {
        /// Offending path.
        path: PathBuf,
    },

    /// The path exists but is not a regular file.
    #[error("path is not a file: {}", .path.display())]
    NotAFile {
        /// Offending path.
        path: PathBuf,
    },

    /// The path is a directory.
    #[error("path is a directory: {}", .path.display())]
    IsADirectory {
        /// Offending path.
        path: PathBuf,
    },

    /// Permission denied by the OS.
    #[error("permission denied: {}", .path.display())]
    AccessDenied {
        /// Path the OS refused.
        path: PathBuf,
    },

    /// The resolved path escapes the configured root.
    #[error("path {} is outside of the allowed root {}", .path.display(), .root.display())]
    OutsideRoot {
        /// Resolved path.
        path: PathBuf,
        /// Configured root.
        root: PathBuf,
    },

    /// The target already exists.
    #[error("path already exists and overwrite is false: {}", .path.display())]
    AlreadyExists {
        /// Existing path.
        path: PathBuf,
    },

    /// The immediate parent is missing.
    #[error("parent directory does not exist: {}", .parent.display())]
    ParentMissing {
        /// Missing parent directory.
        parent: PathBuf,
    },

    /// File exceeds the read cap.
    #[error("file too large ({:.2} MB > {limit_mb} MB)", megabytes(*.size))]
    TooLarge {
        /// Actual size in bytes.
        size: u64,
        /// Cap in megabytes.
        limit_mb: u32,
    },

    /// Invalid byte sequence for the requested encoding.
    #[error("file is not valid {encoding}: invalid byte at offset {offset}")]
    DecodeError {
        /// Requested encoding.
        encoding: TextEncoding,
        /// Offset of the first invalid byte.
        offset: usize,
    },

    /// Character not representable in the requested encoding.
    #[error("cannot encode character {character:?} at position {position} as {encoding}")]
    EncodeError {
        /// Requested encoding.
        encoding: TextEncoding,
        /// First unrepresentable character.
        character: char,
        /// Character index in the content.
        position: usize,
    },

    /// Destructive operation refused without an explicit flag.
    #[error("confirm_delete must be true to delete files")]
    ConfirmationRequired,

    /// Command exceeded its timeout.
    #[error("command timed out after {seconds} seconds")]
    Timeout {
        /// Timeout that elapsed.
        seconds: u64,
    },

    /// Mutation failed.
    #[error("write failed for {}: {source}", .path.display())]
    WriteFailed {
        /// Target of the mutation.
        path: PathBuf,
        /// Underlying OS error.
        #[source]
        source: io::Error,
    },

    /// Out-of-range input.
    #[error("invalid {field}: {reason}")]
    InvalidInput {
        /// Input field name.
        field: &'static str,
        /// What was wrong with it.
        reason: String,
    },

    /// Malformed glob.
    #[error("invalid filter pattern {pattern:?}: {reason}")]
    InvalidPattern {
        /// The pattern as given.
        pattern: String,
        /// Parser message.
        reason: String,
    },

    /// Configuration problem.
    #[error("configuration error: {0}")]
    Config(String),

    /// Other OS failure on a read path.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        /// Path being accessed.
        path: PathBuf,
        /// Underlying OS error.
        #[source]
        source: io::Error,
    },
}

#[allow(clippy::cast_precision_loss)]
fn megabytes(bytes: u64) -> f64 {
    bytes as f64 / BYTES_PER_MB
}

impl GatewayError {
    /// Returns the stable kind of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidPath { .. } => ErrorKind::InvalidPath,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::NotADirectory { .. } => ErrorKind::NotADirectory,
            Self::NotAFile { .. } => ErrorKind::NotAFile,
            Self::IsADirectory { .. } => ErrorKind::IsADirectory,
            Self::AccessDenied { .. } | Self::OutsideRoot { .. } => ErrorKind::AccessDenied,
            Self::AlreadyExists { .. } => ErrorKind::AlreadyExists,
            Self::ParentMissing { .. } => ErrorKind::ParentMissing,
            Self::TooLarge { .. } => ErrorKind::TooLarge,
            Self::DecodeError { .. } => ErrorKind::DecodeError,
            Self::EncodeError { .. } => ErrorKind::EncodeError,
            Self::ConfirmationRequired => ErrorKind::ConfirmationRequired,
            Self::Timeout { .. } => ErrorKind::Timeout,
            Self::WriteFailed { .. } => ErrorKind::WriteFailed,
            Self::InvalidInput { .. } => ErrorKind::InvalidInput,
            Self::InvalidPattern { .. } => ErrorKind::InvalidPattern,
            Self::Config(_) => ErrorKind::Config,
            Self::Io { .. } => ErrorKind::IoError,
        }
    }

    /// Renders the error as the JSON object carried on a node's string channel.
    #[must_use]
    pub fn report(&self) -> Value {
        json!({
            "success": false,
            "error": self.to_string(),
            "kind": self.kind(),
        })
    }

    /// Maps an OS error raised while reading `path`.
    pub(crate) fn from_read(source: io::Error, path: &Path) -> Self {
        Self::classify(source, path).unwrap_or_else(|source| Self::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Maps an OS error raised while mutating `path`.
    pub(crate) fn from_write(source: io::Error, path: &Path) -> Self {
        Self::classify(source, path).unwrap_or_else(|source| Self::WriteFailed {
            path: path.to_path_buf(),
            source,
        })
    }

    fn classify(source: io::Error, path: &Path) -> Result<Self, io::Error> {
        let path = path.to_path_buf();
        match source.kind() {
            io::ErrorKind::NotFound => Ok(Self::NotFound { path }),
            io::ErrorKind::PermissionDenied => Ok(Self::AccessDenied { path }),
            io::ErrorKind::AlreadyExists => Ok(Self::AlreadyExists { path }),
            _ => Err(source),
        }
    }
}
