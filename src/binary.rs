//! Binary VDF primitives shared by both catalog kinds.
//!
//! Integers are little-endian, strings are NUL-terminated, and dict bodies are tag-prefixed
//! entry streams closed by an end tag.

pub mod cursor;
pub mod dict;
