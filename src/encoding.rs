//! Closed sets of supported encodings and the codecs behind them.

use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::GatewayError;

/// Marker line prepended to base64 content produced by binary reads.
pub const BINARY_HEADER: &str = "[Binary file - Base64 encoded]\n";

/// Text encodings accepted for writing (and, via [`ReadEncoding`], reading).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum TextEncoding {
    /// UTF-8.
    #[serde(rename = "utf-8", alias = "utf8")]
    #[value(name = "utf-8", alias = "utf8")]
    Utf8,
    /// 7-bit ASCII.
    #[serde(rename = "ascii")]
    #[value(name = "ascii")]
    Ascii,
    /// ISO-8859-1: every byte maps to the code point of the same value.
    #[serde(rename = "latin-1", alias = "latin1")]
    #[value(name = "latin-1", alias = "latin1")]
    Latin1,
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Utf8 => "utf-8",
            Self::Ascii => "ascii",
            Self::Latin1 => "latin-1",
        })
    }
}

impl TextEncoding {
    /// Decodes `bytes`, failing on the first byte sequence invalid for this encoding.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::DecodeError`] with the offset of the first bad byte.
    pub fn decode(self, bytes: &[u8]) -> Result<String, GatewayError> {
        match self {
            Self::Utf8 => std::str::from_utf8(bytes).map(str::to_owned).map_err(|e| {
                GatewayError::DecodeError { encoding: self, offset: e.valid_up_to() }
            }),
            Self::Ascii => match bytes.iter().position(|b| !b.is_ascii()) {
                Some(offset) => Err(GatewayError::DecodeError { encoding: self, offset }),
                None => Ok(bytes.iter().map(|&b| char::from(b)).collect()),
            },
            Self::Latin1 => Ok(bytes.iter().map(|&b| char::from(b)).collect()),
        }
    }

    /// Encodes `text`, failing on the first character this encoding cannot represent.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::EncodeError`] naming the offending character.
    pub fn encode(self, text: &str) -> Result<Vec<u8>, GatewayError> {
        let limit = match self {
            Self::Utf8 => return Ok(text.as_bytes().to_vec()),
            Self::Ascii => 0x7f,
            Self::Latin1 => 0xff,
        };
        text.chars()
            .enumerate()
            .map(|(position, character)| {
                u8::try_from(u32::from(character))
                    .ok()
                    .filter(|&b| u32::from(b) <= limit)
                    .ok_or(GatewayError::EncodeError { encoding: self, character, position })
            })
            .collect()
    }
}

/// Encodings accepted for reading: any text encoding, or binary passthrough.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum ReadEncoding {
    /// UTF-8 text.
    #[serde(rename = "utf-8", alias = "utf8")]
    #[value(name = "utf-8", alias = "utf8")]
    Utf8,
    /// ASCII text.
    #[serde(rename = "ascii")]
    #[value(name = "ascii")]
    Ascii,
    /// Latin-1 text.
    #[serde(rename = "latin-1", alias = "latin1")]
    #[value(name = "latin-1", alias = "latin1")]
    Latin1,
    /// Raw bytes, returned as base64.
    #[serde(rename = "binary")]
    #[value(name = "binary")]
    Binary,
}

impl ReadEncoding {
    /// The text encoding this selects, or `None` for binary.
    #[must_use]
    pub fn text(self) -> Option<TextEncoding> {
        match self {
            Self::Utf8 => Some(TextEncoding::Utf8),
            Self::Ascii => Some(TextEncoding::Ascii),
            Self::Latin1 => Some(TextEncoding::Latin1),
            Self::Binary => None,
        }
    }

    /// Turns raw file bytes into string-channel content.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::DecodeError`] when a text encoding rejects the bytes.
    pub fn render(self, bytes: &[u8]) -> Result<String, GatewayError> {
        match self.text() {
            Some(encoding) => encoding.decode(bytes),
            None => Ok(format!("{BINARY_HEADER}{}", STANDARD.encode(bytes))),
        }
    }
}

impl fmt::Display for ReadEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.text() {
            Some(encoding) => encoding.fmt(f),
            None => f.write_str("binary"),
        }
    }
}

impl From<TextEncoding> for ReadEncoding {
    fn from(encoding: TextEncoding) -> Self {
        match encoding {
            TextEncoding::Utf8 => Self::Utf8,
            TextEncoding::Ascii => Self::Ascii,
            TextEncoding::Latin1 => Self::Latin1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn utf8_rejects_invalid_sequences_with_offset() {
        let err = TextEncoding::Utf8.decode(b"ok\xff").unwrap_err();
        assert!(matches!(err, GatewayError::DecodeError { offset: 2, .. }));
    }

    #[test]
    fn ascii_rejects_high_bytes() {
        let err = TextEncoding::Ascii.decode(b"abc\xe9").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DecodeError);
        assert_eq!(TextEncoding::Ascii.decode(b"plain").unwrap(), "plain");
    }

    #[test]
    fn latin1_maps_every_byte() {
        let text = TextEncoding::Latin1.decode(&[0x63, 0x61, 0x66, 0xe9]).unwrap();
        assert_eq!(text, "café");
        assert_eq!(TextEncoding::Latin1.encode("café").unwrap(), vec![0x63, 0x61, 0x66, 0xe9]);
    }

    #[test]
    fn encode_reports_first_unrepresentable_character() {
        let err = TextEncoding::Latin1.encode("ok €").unwrap_err();
        assert!(matches!(err, GatewayError::EncodeError { character: '€', position: 3, .. }));

        let err = TextEncoding::Ascii.encode("é").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EncodeError);
    }

    #[test]
    fn binary_render_is_prefixed_base64() {
        let content = ReadEncoding::Binary.render(&[0, 1, 2, 255]).unwrap();
        assert_eq!(content, "[Binary file - Base64 encoded]\nAAEC/w==");
    }

    #[test]
    fn display_matches_host_choice_names() {
        assert_eq!(TextEncoding::Latin1.to_string(), "latin-1");
        assert_eq!(ReadEncoding::Binary.to_string(), "binary");
        assert_eq!(ReadEncoding::from(TextEncoding::Utf8).to_string(), "utf-8");
    }
}
