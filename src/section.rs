//! Tree representation of a parsed text VDF document.
//!
//! Every node remembers the half-open range of source lines it occupies. Nodes are read-only: an
//! edit never changes the tree, it records line-level actions in an [`EditPlan`] that are replayed
//! against the untouched original lines when the document is compiled.

use crate::document::TextDocument;
use crate::edit_plan::EditPlan;
use crate::ordered_map::OrderedMap;
use serde::ser::{Serialize, Serializer};
use std::ops::Range;

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// Half-open range `[start, end)` of zero-based source lines.
pub struct Span {
    /// First line occupied by the node.
    pub start: usize,
    /// One past the last line occupied by the node.
    pub end: usize,
}

impl Span {
    #[must_use]
    /// Span of a node that lives on a single line.
    pub fn line(line: usize) -> Self {
        Self {
            start: line,
            end: line + 1,
        }
    }

    #[must_use]
    /// Whether `other` lies entirely inside this span.
    pub fn contains(&self, other: &Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    #[must_use]
    /// Whether the two spans share at least one line.
    pub fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }

    #[must_use]
    /// The span as a slice range.
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

#[derive(Clone, Debug)]
/// A node of the text tree.
pub enum Value {
    /// A nested block of entries.
    Section(Section),
    /// A plain string value.
    Scalar(Scalar),
}

impl Value {
    #[must_use]
    /// Lines this node occupies in the source file.
    pub fn span(&self) -> Span {
        match self {
            Self::Section(section) => section.span(),
            Self::Scalar(scalar) => scalar.span(),
        }
    }

    #[must_use]
    /// Original source lines of this node, terminators included, ready to be appended elsewhere.
    pub fn raw<'d>(&self, doc: &'d TextDocument) -> &'d [String] {
        doc.lines_in(self.span())
    }

    #[must_use]
    /// The nested section, if this is one.
    pub fn as_section(&self) -> Option<&Section> {
        match self {
            Self::Section(section) => Some(section),
            Self::Scalar(_) => None,
        }
    }

    #[must_use]
    /// The string value, if this is a scalar.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Scalar(scalar) => Some(&scalar.value),
            Self::Section(_) => None,
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Section(section) => section.serialize(serializer),
            Self::Scalar(scalar) => serializer.serialize_str(&scalar.value),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// A string value and the line it was written on.
pub struct Scalar {
    /// Unquoted, unescaped value.
    pub value: String,
    /// Zero-based line of the value token.
    pub line: usize,
}

impl Scalar {
    #[must_use]
    /// `[line, line + 1)`.
    pub fn span(&self) -> Span {
        Span::line(self.line)
    }
}

#[derive(Clone, Debug)]
/// Ordered key/value block with the source lines it occupies.
///
/// Keys keep the order of their first appearance. A repeated key replaces the earlier value for
/// lookups, but the earlier occurrence's lines stay in the file untouched.
pub struct Section {
    span: Span,
    body: Range<usize>,
    entries: OrderedMap<Value>,
}

impl Section {
    pub(crate) fn root(total_lines: usize) -> Self {
        Self::with_lines(0, 0..total_lines)
    }

    pub(crate) fn with_lines(start: usize, body: Range<usize>) -> Self {
        Self {
            span: Span {
                start,
                end: body.end,
            },
            body,
            entries: OrderedMap::default(),
        }
    }

    /// Records the closing brace line, fixing the span end and the body range.
    pub(crate) fn close(&mut self, close_line: usize) {
        self.span.end = close_line + 1;
        self.body = self.body.start.min(close_line)..close_line;
    }

    pub(crate) fn insert(&mut self, key: String, value: Value) {
        self.entries.insert(key, value);
    }

    #[must_use]
    /// Lines from the key (or file start, for the root) through the closing brace.
    pub fn span(&self) -> Span {
        self.span
    }

    #[must_use]
    /// Interior lines strictly between the opening and closing braces.
    ///
    /// For the root section this is the whole file.
    pub fn body(&self) -> Range<usize> {
        self.body.clone()
    }

    #[must_use]
    /// Looks up a direct child. Absent keys return `None`; nothing is created.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    #[must_use]
    /// Looks up a direct child that must be a section.
    pub fn section(&self, key: &str) -> Option<&Section> {
        self.get(key).and_then(Value::as_section)
    }

    #[must_use]
    /// Looks up a direct child that must be a scalar.
    pub fn scalar(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    #[must_use]
    /// Follows a chain of section keys, e.g. `["InstallConfigStore", "AuthorizedDevice"]`.
    pub fn path(&self, keys: &[&str]) -> Option<&Section> {
        keys.iter().try_fold(self, |section, key| section.section(key))
    }

    /// Entries in first-appearance order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter()
    }

    #[must_use]
    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    /// Whether the section has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Queues deletion of every interior line, leaving both brace lines in place.
    pub fn clear(&self, plan: &mut EditPlan) {
        plan.delete(self.body());
    }

    /// Queues raw lines to be written immediately before the closing brace.
    ///
    /// Lines are inserted verbatim, so each should carry its own terminator.
    pub fn append<I, S>(&self, plan: &mut EditPlan, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        plan.insert_before(self.body.end, lines);
    }
}

impl Serialize for Section {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.entries.serialize(serializer)
    }
}
