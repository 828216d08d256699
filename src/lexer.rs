//! Shell-word tokenizer for the text VDF format.
//!
//! Tokens are bare words, double-quoted strings and the structural braces. The lexer only tracks
//! which physical line each token ends on; it never looks at raw line content again, so comments
//! and layout survive untouched in the document's line array.
//!
//! Comments follow Valve's KeyValues convention rather than shell rules: `//` where a token could
//! start runs to end of line, while `//` inside a bare or quoted word is ordinary text. An unquoted
//! value that starts with `//` is therefore read as a comment, so values like that must be quoted.

use crate::error::{Error, Result};
use std::str::Chars;

const BOM: char = '\u{feff}';

#[derive(Clone, Debug, PartialEq, Eq)]
/// Lexical category of a token.
pub enum TokenKind {
    /// A key or value, with quotes removed and escapes resolved.
    Word(String),
    /// An unquoted `{`.
    Open,
    /// An unquoted `}`.
    Close,
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// A token and the zero-based line its last character was read from.
pub struct Token {
    /// What was read.
    pub kind: TokenKind,
    /// Zero-based physical line of the token's final character.
    pub line: usize,
}

/// Streaming tokenizer over decoded text.
pub struct Lexer<'a> {
    chars: Chars<'a>,
    line: usize,
    last_line: usize,
}

impl<'a> Lexer<'a> {
    #[must_use]
    /// Starts tokenizing `text` at line 0.
    pub fn new(text: &'a str) -> Self {
        Self {
            chars: text.chars(),
            line: 0,
            last_line: 0,
        }
    }

    /// Returns the next token, or `None` at end of input.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Syntax`] for an unterminated quoted string or a trailing backslash.
    pub fn next_token(&mut self) -> Result<Option<Token>> {
        self.skip_blank();
        let Some(ch) = self.peek() else {
            return Ok(None);
        };
        let kind = match ch {
            '{' => {
                self.bump();
                TokenKind::Open
            }
            '}' => {
                self.bump();
                TokenKind::Close
            }
            _ => TokenKind::Word(self.word()?),
        };
        Ok(Some(Token {
            kind,
            line: self.last_line,
        }))
    }

    fn peek(&self) -> Option<char> {
        self.chars.clone().next()
    }

    fn peek_second(&self) -> Option<char> {
        self.chars.clone().nth(1)
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.chars.next()?;
        self.last_line = self.line;
        if ch == '\n' {
            self.line += 1;
        }
        Some(ch)
    }

    fn skip_blank(&mut self) {
        while let Some(ch) = self.peek() {
            if ch.is_whitespace() || ch == BOM {
                self.bump();
            } else if ch == '/' && self.peek_second() == Some('/') {
                while let Some(c) = self.bump() {
                    if c == '\n' {
                        break;
                    }
                }
            } else {
                break;
            }
        }
    }

    fn word(&mut self) -> Result<String> {
        let mut text = String::new();
        while let Some(ch) = self.peek() {
            match ch {
                '{' | '}' | BOM => break,
                c if c.is_whitespace() => break,
                '"' => {
                    self.bump();
                    self.quoted(&mut text)?;
                }
                '\\' => {
                    self.bump();
                    let escaped = self
                        .bump()
                        .ok_or_else(|| Error::syntax(self.line, "no character after backslash"))?;
                    text.push(escaped);
                }
                _ => {
                    self.bump();
                    text.push(ch);
                }
            }
        }
        Ok(text)
    }

    fn quoted(&mut self, text: &mut String) -> Result<()> {
        let opened_on = self.last_line;
        loop {
            match self.bump() {
                None => return Err(Error::syntax(opened_on, "unterminated quoted string")),
                Some('"') => return Ok(()),
                Some('\\') => match self.peek() {
                    Some(next @ ('"' | '\\')) => {
                        self.bump();
                        text.push(next);
                    }
                    _ => text.push('\\'),
                },
                Some(ch) => text.push(ch),
            }
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token().transpose()
    }
}

#[cfg(test)]
#[path = "tests/lexer.rs"]
mod tests;
