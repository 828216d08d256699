//! Character encodings seen in VDF files.
//!
//! Text files are UTF-8 in practice, but older clients wrote Windows-1252, so a whole-file UTF-8
//! failure falls back to a strict Windows-1252 decode. Binary catalog strings fall back to
//! ISO-8859-1 instead, which accepts every byte.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Code points for bytes 0x80..=0x9F; `None` marks the five bytes Windows-1252 leaves undefined.
const CP1252_HIGH: [Option<char>; 32] = [
    Some('\u{20AC}'),
    None,
    Some('\u{201A}'),
    Some('\u{0192}'),
    Some('\u{201E}'),
    Some('\u{2026}'),
    Some('\u{2020}'),
    Some('\u{2021}'),
    Some('\u{02C6}'),
    Some('\u{2030}'),
    Some('\u{0160}'),
    Some('\u{2039}'),
    Some('\u{0152}'),
    None,
    Some('\u{017D}'),
    None,
    None,
    Some('\u{2018}'),
    Some('\u{2019}'),
    Some('\u{201C}'),
    Some('\u{201D}'),
    Some('\u{2022}'),
    Some('\u{2013}'),
    Some('\u{2014}'),
    Some('\u{02DC}'),
    Some('\u{2122}'),
    Some('\u{0161}'),
    Some('\u{203A}'),
    Some('\u{0153}'),
    None,
    Some('\u{017E}'),
    Some('\u{0178}'),
];

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
/// Encoding a text document was read with, and will be written back in.
pub enum TextEncoding {
    /// Primary encoding.
    Utf8,
    /// Legacy single-byte fallback.
    Windows1252,
}

impl TextEncoding {
    /// Decodes a whole file, trying UTF-8 first and Windows-1252 second.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Encoding`] if neither encoding accepts the bytes.
    pub fn detect(bytes: &[u8]) -> Result<(String, Self)> {
        match std::str::from_utf8(bytes) {
            Ok(text) => Ok((text.to_owned(), Self::Utf8)),
            Err(utf8_err) => {
                tracing::debug!(
                    offset = utf8_err.valid_up_to(),
                    "not UTF-8, retrying as Windows-1252"
                );
                let text = Self::Windows1252.decode(bytes)?;
                Ok((text, Self::Windows1252))
            }
        }
    }

    /// Decodes bytes strictly in this encoding.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Encoding`] on the first byte sequence the encoding does not define.
    pub fn decode(self, bytes: &[u8]) -> Result<String> {
        match self {
            Self::Utf8 => std::str::from_utf8(bytes)
                .map(str::to_owned)
                .map_err(|e| Error::encoding(format!("invalid UTF-8: {e}"))),
            Self::Windows1252 => bytes
                .iter()
                .enumerate()
                .map(|(offset, &byte)| {
                    cp1252_char(byte).ok_or_else(|| {
                        Error::encoding(format!(
                            "byte 0x{byte:02x} at offset {offset} is undefined in Windows-1252"
                        ))
                    })
                })
                .collect(),
        }
    }

    /// Encodes text back into this encoding.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Encoding`] if a character has no Windows-1252 representation.
    pub fn encode(self, text: &str, out: &mut Vec<u8>) -> Result<()> {
        match self {
            Self::Utf8 => out.extend_from_slice(text.as_bytes()),
            Self::Windows1252 => {
                for ch in text.chars() {
                    let byte = cp1252_byte(ch).ok_or_else(|| {
                        Error::encoding(format!("{ch:?} cannot be written as Windows-1252"))
                    })?;
                    out.push(byte);
                }
            }
        }
        Ok(())
    }
}

fn cp1252_char(byte: u8) -> Option<char> {
    match byte {
        0x80..=0x9F => CP1252_HIGH[usize::from(byte - 0x80)],
        _ => Some(char::from(byte)),
    }
}

fn cp1252_byte(ch: char) -> Option<u8> {
    let code = u32::from(ch);
    if code < 0x80 || (0xA0..=0xFF).contains(&code) {
        return u8::try_from(code).ok();
    }
    CP1252_HIGH
        .iter()
        .position(|mapped| *mapped == Some(ch))
        .and_then(|index| u8::try_from(0x80 + index).ok())
}

/// Decodes a binary-catalog string: UTF-8 when valid, otherwise ISO-8859-1.
#[must_use]
pub fn decode_lossless(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => err.into_bytes().into_iter().map(char::from).collect(),
    }
}

#[cfg(test)]
#[path = "tests/encoding.rs"]
mod tests;
