//! `FileReader` node: read a file under a size cap and decode it.

use std::ops::RangeInclusive;

use serde::Serialize;

use crate::context::ServiceContext;
use crate::encoding::ReadEncoding;
use crate::error::GatewayError;
use crate::model::FileInfo;
use crate::path;

/// Accepted values for [`ReadInput::max_size_mb`].
pub const MAX_SIZE_MB_RANGE: RangeInclusive<u32> = 1..=100;

const BYTES_PER_MB: u64 = 1024 * 1024;

/// Inputs of a file read.
#[derive(Debug, Clone)]
pub struct ReadInput {
    /// File to read.
    pub file_path: String,
    /// How to turn bytes into channel text.
    pub encoding: ReadEncoding,
    /// Size cap in megabytes.
    pub max_size_mb: u32,
}

impl Default for ReadInput {
    fn default() -> Self {
        Self { file_path: String::new(), encoding: ReadEncoding::Utf8, max_size_mb: 10 }
    }
}

/// Decoded content plus metadata of the file read.
#[derive(Debug, Clone, Serialize)]
pub struct ReadOutput {
    /// Decoded text, or the base64 form for binary reads.
    pub content: String,
    /// Metadata of the file, tagged with the encoding.
    pub file_info: FileInfo,
}

/// Reads a file.
///
/// # Errors
///
/// Fails with `InvalidInput` for an out-of-range cap, `NotFound`,
/// `NotAFile`, `TooLarge` (no content is returned) or `DecodeError`.
pub fn run(ctx: &ServiceContext, input: &ReadInput) -> Result<ReadOutput, GatewayError> {
    if !MAX_SIZE_MB_RANGE.contains(&input.max_size_mb) {
        return Err(GatewayError::InvalidInput {
            field: "max_size_mb",
            reason: format!(
                "{} is outside {}..={}",
                input.max_size_mb,
                MAX_SIZE_MB_RANGE.start(),
                MAX_SIZE_MB_RANGE.end()
            ),
        });
    }
    let file = path::resolve(&input.file_path, &ctx.config)?;

    let mut entry = ctx.fs.stat(&file).map_err(|e| GatewayError::from_read(e, &file))?;
    if !entry.is_file {
        return Err(GatewayError::NotAFile { path: file });
    }

    let limit = u64::from(input.max_size_mb) * BYTES_PER_MB;
    let too_large = |size| GatewayError::TooLarge { size, limit_mb: input.max_size_mb };
    if entry.size > limit {
        return Err(too_large(entry.size));
    }

    // One byte past the cap is enough to notice a file that grew since stat.
    let bytes = ctx
        .fs
        .read_limited(&file, limit + 1)
        .map_err(|e| GatewayError::from_read(e, &file))?;
    let read = u64::try_from(bytes.len()).unwrap_or(u64::MAX);
    if read > limit {
        return Err(too_large(ctx.fs.stat(&file).map_or(read, |m| m.size)));
    }

    let content = input.encoding.render(&bytes)?;
    entry.size = read;
    tracing::debug!(path = %file.display(), bytes = read, encoding = %input.encoding, "read file");
    Ok(ReadOutput { content, file_info: FileInfo { entry, encoding: input.encoding } })
}
