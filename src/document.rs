//! A loaded text VDF file: its frozen original lines, its parsed tree and its encoding.
//!
//! The document itself is never mutated. Callers build an [`EditPlan`] from section operations
//! and hand it back to [`TextDocument::compile`] or [`TextDocument::write_to`], which replay the
//! plan over the original lines. With an empty plan the output is byte-identical to the input.

use crate::edit_plan::EditPlan;
use crate::encoding::TextEncoding;
use crate::error::{Error, Result};
use crate::parser;
use crate::section::{Section, Span};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

#[derive(Debug)]
/// Parsed text document with the original line array it was built from.
pub struct TextDocument {
    path: Option<PathBuf>,
    encoding: TextEncoding,
    lines: Vec<String>,
    root: Section,
}

impl TextDocument {
    /// Reads and parses a text VDF file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read, [`Error::Encoding`] if it is neither
    /// UTF-8 nor Windows-1252, and [`Error::Syntax`] if it is structurally broken.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path)?;
        let mut doc = Self::parse_bytes(&bytes).map_err(|e| e.with_path(path))?;
        if doc.encoding == TextEncoding::Windows1252 {
            tracing::warn!(path = %path.display(), "file is not UTF-8, read as Windows-1252");
        }
        tracing::debug!(path = %path.display(), lines = doc.lines.len(), "loaded text vdf");
        doc.path = Some(path.to_path_buf());
        Ok(doc)
    }

    /// Parses an in-memory document.
    ///
    /// # Errors
    ///
    /// Same as [`TextDocument::load`], minus I/O.
    pub fn parse_bytes(bytes: &[u8]) -> Result<Self> {
        let (text, encoding) = TextEncoding::detect(bytes)?;
        let lines: Vec<String> = text.split_inclusive('\n').map(String::from).collect();
        let root = parser::parse(&text, lines.len())?;
        Ok(Self {
            path: None,
            encoding,
            lines,
            root,
        })
    }

    #[must_use]
    /// Top-level section spanning the whole file.
    pub fn root(&self) -> &Section {
        &self.root
    }

    #[must_use]
    /// Encoding the file was read with; output is written back in the same encoding.
    pub fn encoding(&self) -> TextEncoding {
        self.encoding
    }

    #[must_use]
    /// File the document was loaded from, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    #[must_use]
    /// Original lines, terminators included.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    #[must_use]
    /// Original lines covered by `span`, clamped to the file.
    pub fn lines_in(&self, span: Span) -> &[String] {
        let end = span.end.min(self.lines.len());
        let start = span.start.min(end);
        &self.lines[start..end]
    }

    /// Replays `plan` over the original lines and encodes the result.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Encoding`] if an inserted line cannot be represented in the document's
    /// encoding.
    pub fn compile(&self, plan: &EditPlan) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        for line in plan.replay(&self.lines) {
            self.encoding.encode(line, &mut out)?;
        }
        Ok(out)
    }

    /// Compiles `plan` and atomically replaces `target` with the result.
    ///
    /// Output goes to a temporary file in the target's directory first and is renamed over the
    /// target only once fully written, so a failure leaves the old file intact.
    ///
    /// # Errors
    ///
    /// Returns compile errors from [`TextDocument::compile`] and I/O errors from the write.
    pub fn write_to(&self, plan: &EditPlan, target: impl AsRef<Path>) -> Result<()> {
        let target = target.as_ref();
        let bytes = self.compile(plan)?;
        let dir = match target.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(&bytes)?;
        tmp.as_file().sync_all()?;
        tmp.persist(target).map_err(|e| Error::Io(e.error))?;
        tracing::info!(
            path = %target.display(),
            edits = plan.edits.len(),
            bytes = bytes.len(),
            "rewrote text vdf"
        );
        Ok(())
    }

    /// Compiles `plan` over the file the document was loaded from.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for a document parsed from memory, otherwise as
    /// [`TextDocument::write_to`].
    pub fn save(&self, plan: &EditPlan) -> Result<()> {
        let path = self
            .path
            .as_deref()
            .ok_or_else(|| Error::Config("document was not loaded from a file".to_string()))?;
        self.write_to(plan, path)
    }
}

#[cfg(test)]
#[path = "tests/document.rs"]
mod tests;
