//! Transient value records produced by gateway operations.
//!
//! Nothing here is cached: every record describes the filesystem (or a
//! finished process) at the moment of the call.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::encoding::ReadEncoding;

/// Descriptive record about one filesystem entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryMetadata {
    /// Final path component.
    pub name: String,
    /// Absolute path.
    pub path: String,
    /// Size in bytes; 0 for directories.
    pub size: u64,
    /// Last modification time, carried on the wire as fractional Unix seconds.
    #[serde(rename = "modified", with = "unix_seconds")]
    pub modified_at: DateTime<Utc>,
    /// Whether the entry (after following symlinks) is a directory.
    pub is_dir: bool,
    /// Whether the entry (after following symlinks) is a regular file.
    pub is_file: bool,
    /// Whether the entry itself is a symlink.
    pub is_symlink: bool,
}

/// Success confirmation or human-readable failure description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationStatus {
    /// Whether the operation succeeded.
    pub success: bool,
    /// Human-readable description.
    pub message: String,
}

impl OperationStatus {
    /// A successful status with the given message.
    pub fn ok(message: impl Into<String>) -> Self {
        Self { success: true, message: message.into() }
    }
}

/// Outcome of one external command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandResult {
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
    /// Process exit code.
    pub exit_code: i32,
    /// Whether either stream hit the output cap.
    pub truncated: bool,
}

/// Metadata of a file that was read, tagged with how it was decoded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileInfo {
    /// Entry metadata.
    #[serde(flatten)]
    pub entry: EntryMetadata,
    /// Encoding used for the content channel.
    pub encoding: ReadEncoding,
}

mod unix_seconds {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    #[allow(clippy::cast_precision_loss)]
    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        let secs = value.timestamp() as f64 + f64::from(value.timestamp_subsec_nanos()) / 1e9;
        serializer.serialize_f64(secs)
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        let whole = secs.floor();
        let nanos = ((secs - whole) * 1e9).round().min(999_999_999.0) as u32;
        DateTime::from_timestamp(whole as i64, nanos)
            .ok_or_else(|| serde::de::Error::custom(format!("timestamp out of range: {secs}")))
    }
}
