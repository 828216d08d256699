//! Builds a [`Section`] tree from the token stream, recording source spans as it goes.

use crate::error::{Error, Result};
use crate::lexer::{Lexer, TokenKind};
use crate::section::{Scalar, Section, Value};

/// Deepest section nesting accepted.
pub const MAX_DEPTH: usize = 512;

/// Parses decoded text into a root section spanning `[0, total_lines)`.
///
/// The parser keeps an explicit stack of `(parent, key)` pairs for the sections still open; a
/// section is attached to its parent when its closing brace is read.
///
/// # Errors
///
/// Returns [`Error::Syntax`] for unbalanced braces, a key without a value, sections nested more
/// than [`MAX_DEPTH`] levels, or a lexer failure.
pub fn parse(text: &str, total_lines: usize) -> Result<Section> {
    let mut lexer = Lexer::new(text);
    let mut stack: Vec<(Section, String)> = Vec::new();
    let mut current = Section::root(total_lines);

    while let Some(token) = lexer.next_token()? {
        match token.kind {
            TokenKind::Close => {
                let (parent, key) = stack
                    .pop()
                    .ok_or_else(|| Error::syntax(token.line, "`}` without an open section"))?;
                let mut closed = std::mem::replace(&mut current, parent);
                closed.close(token.line);
                tracing::trace!(key = %key, start = closed.span().start, end = closed.span().end, "section");
                current.insert(key, Value::Section(closed));
            }
            TokenKind::Open => {
                return Err(Error::syntax(token.line, "`{` where a key was expected"));
            }
            TokenKind::Word(key) => {
                let key_line = token.line;
                let value = lexer
                    .next_token()?
                    .ok_or_else(|| Error::syntax(key_line, format!("key {key:?} has no value")))?;
                match value.kind {
                    TokenKind::Open if stack.len() >= MAX_DEPTH => {
                        return Err(Error::syntax(
                            value.line,
                            format!("section {key:?} nests deeper than {MAX_DEPTH} levels"),
                        ));
                    }
                    TokenKind::Open => {
                        let body_start = value.line + 1;
                        let section = Section::with_lines(key_line, body_start..body_start);
                        stack.push((std::mem::replace(&mut current, section), key));
                    }
                    TokenKind::Word(text) => {
                        current.insert(
                            key,
                            Value::Scalar(Scalar {
                                value: text,
                                line: value.line,
                            }),
                        );
                    }
                    TokenKind::Close => {
                        return Err(Error::syntax(
                            value.line,
                            format!("key {key:?} is followed by `}}` instead of a value"),
                        ));
                    }
                }
            }
        }
    }

    if let Some((_, key)) = stack.last() {
        return Err(Error::syntax(
            total_lines.saturating_sub(1),
            format!("section {key:?} is never closed"),
        ));
    }
    Ok(current)
}

#[cfg(test)]
#[path = "tests/parser.rs"]
mod tests;
