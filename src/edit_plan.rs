//! The edit plan records line-level changes to a text document without touching it.
//!
//! Section operations append actions to an ordered list. Nothing is applied until the document is
//! compiled, when the whole list is replayed over the original lines in a single forward pass.
//! Lines no action refers to are emitted exactly as they were read.

use serde::{Deserialize, Serialize};
use std::ops::Range;

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
/// Serialisable, ordered collection of line edits for one document.
pub struct EditPlan {
    /// Actions in the order they were requested.
    pub edits: Vec<Edit>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "action", rename_all = "snake_case")]
/// A single line-level action.
pub enum Edit {
    /// Drop original lines `[line_start, line_end)`.
    Delete {
        /// First dropped line (inclusive).
        line_start: usize,
        /// Line after the last dropped line (exclusive).
        line_end: usize,
    },
    /// Emit `lines` immediately before original line `before`.
    ///
    /// `before` may equal the line count, meaning the end of the file.
    Insert {
        /// Original line the new lines precede.
        before: usize,
        /// Raw lines, each with its own terminator.
        lines: Vec<String>,
    },
}

impl EditPlan {
    #[must_use]
    /// An empty plan; compiling with it reproduces the source.
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    /// Whether the plan has no actions.
    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// Queues deletion of a line range. Empty ranges are ignored.
    pub fn delete(&mut self, lines: Range<usize>) {
        if lines.is_empty() {
            return;
        }
        self.edits.push(Edit::Delete {
            line_start: lines.start,
            line_end: lines.end,
        });
    }

    /// Queues raw lines for insertion before `before`. Repeated calls accumulate in call order.
    pub fn insert_before<I, S>(&mut self, before: usize, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let lines: Vec<String> = lines.into_iter().map(Into::into).collect();
        if lines.is_empty() {
            return;
        }
        self.edits.push(Edit::Insert { before, lines });
    }

    /// Replays the plan over `original`, yielding output lines in file order.
    ///
    /// For each original line, queued insertions come first, then the line itself unless it was
    /// deleted. Out-of-range positions are clamped to the end of the file.
    #[must_use]
    pub fn replay<'a>(&'a self, original: &'a [String]) -> Vec<&'a str> {
        let total = original.len();
        let mut deleted = vec![false; total];
        let mut inserted: Vec<Vec<&str>> = vec![Vec::new(); total + 1];

        for edit in &self.edits {
            match edit {
                Edit::Delete {
                    line_start,
                    line_end,
                } => {
                    let end = (*line_end).min(total);
                    let start = (*line_start).min(end);
                    deleted[start..end].fill(true);
                }
                Edit::Insert { before, lines } => {
                    inserted[(*before).min(total)].extend(lines.iter().map(String::as_str));
                }
            }
        }

        let mut out = Vec::with_capacity(total);
        for (index, line) in original.iter().enumerate() {
            out.append(&mut inserted[index]);
            if !deleted[index] {
                out.push(line.as_str());
            }
        }
        out.append(&mut inserted[total]);
        out
    }
}

#[cfg(test)]
#[path = "tests/edit_plan.rs"]
mod tests;
