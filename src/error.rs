//! Error types shared by the text and binary halves of the crate.
//!
//! Every failure is fatal for the operation that raised it: a catalog decode never returns a
//! partial record set and a text load never returns a half-built tree. Recoverable conditions
//! (a file that is not UTF-8, an id outside the caller's filter) are handled where they occur and
//! never surface here.

use std::path::PathBuf;
use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Error, Debug)]
/// Failure raised while reading, decoding or rewriting a VDF file.
pub enum Error {
    /// The underlying file or stream could not be read or written, including truncated input.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Text could be decoded neither as UTF-8 nor as Windows-1252, or an inserted line cannot be
    /// represented in the document's encoding on write.
    #[error("encoding error: {message}")]
    Encoding {
        /// What could not be decoded or encoded.
        message: String,
        /// File involved, when known.
        path: Option<PathBuf>,
    },

    /// The text format is structurally broken (unbalanced braces, dangling key, open quote).
    #[error("syntax error on line {}: {message}", line + 1)]
    Syntax {
        /// Zero-based line where the problem was detected.
        line: usize,
        /// Description of the problem.
        message: String,
    },

    /// A binary dict carried a tag byte outside the known set.
    #[error("unknown tag 0x{tag:02x} for key {key:?} at offset {offset}")]
    Format {
        /// The offending tag byte.
        tag: u8,
        /// Key that followed the tag.
        key: String,
        /// Stream offset of the tag byte.
        offset: u64,
    },

    /// Binary dicts nested deeper than the decoder accepts.
    #[error("dicts nested deeper than {limit} levels at offset {offset}")]
    TooDeep {
        /// Maximum accepted nesting.
        limit: usize,
        /// Stream offset of the tag that went too deep.
        offset: u64,
    },

    /// An app record decoded to a different length than its declared `dataSize`.
    #[error("app {id}: declared {expected} payload bytes but decoded {actual}")]
    Integrity {
        /// Record id.
        id: u32,
        /// Declared payload length.
        expected: u64,
        /// Bytes actually consumed while decoding.
        actual: u64,
    },

    /// A caller named a share id that is not present in either device list.
    #[error("unknown share: {0}")]
    UnknownShare(String),

    /// A section required by an operation is absent from the document.
    #[error("missing section: {0}")]
    MissingSection(String),

    /// Configuration could not be resolved.
    #[error("config error: {0}")]
    Config(String),
}

impl Error {
    pub(crate) fn encoding(message: impl Into<String>) -> Self {
        Self::Encoding {
            message: message.into(),
            path: None,
        }
    }

    pub(crate) fn syntax(line: usize, message: impl Into<String>) -> Self {
        Self::Syntax {
            line,
            message: message.into(),
        }
    }

    #[must_use]
    /// Attaches a file path to encoding errors; other variants pass through unchanged.
    pub fn with_path(self, path: impl Into<PathBuf>) -> Self {
        match self {
            Self::Encoding { message, .. } => Self::Encoding {
                message,
                path: Some(path.into()),
            },
            other => other,
        }
    }

    #[must_use]
    /// Short category label, used by the CLI when reporting failures.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Io(_) => "io",
            Self::Encoding { .. } => "encoding",
            Self::Syntax { .. } => "syntax",
            Self::Format { .. } | Self::TooDeep { .. } => "format",
            Self::Integrity { .. } => "integrity",
            Self::UnknownShare(_) => "share",
            Self::MissingSection(_) => "section",
            Self::Config(_) => "config",
        }
    }
}
