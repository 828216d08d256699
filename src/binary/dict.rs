//! Tag-driven decoder for nested binary dicts.
//!
//! A dict body is a run of `(tag, key, value)` entries closed by [`TAG_END`]. Both catalog kinds
//! store their payload this way.

use crate::binary::cursor::BinaryCursor;
use crate::error::{Error, Result};
use crate::ordered_map::OrderedMap;
use serde::ser::{Serialize, Serializer};
use std::io::BufRead;

/// Nested dict follows.
pub const TAG_DICT: u8 = 0x00;
/// NUL-terminated string follows.
pub const TAG_STR: u8 = 0x01;
/// Little-endian `u32` follows.
pub const TAG_U32: u8 = 0x02;
/// Little-endian `u64` follows.
pub const TAG_U64: u8 = 0x07;
/// Closes the current dict; no key follows.
pub const TAG_END: u8 = 0x08;

/// Deepest dict nesting accepted below the top-level body.
pub const MAX_DEPTH: usize = 512;

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(untagged)]
/// A decoded binary value.
pub enum BinValue {
    /// Nested mapping.
    Dict(Dict),
    /// String value.
    Str(String),
    /// 32-bit integer.
    UInt32(u32),
    /// 64-bit integer.
    UInt64(u64),
}

impl BinValue {
    #[must_use]
    /// The nested dict, if this is one.
    pub fn as_dict(&self) -> Option<&Dict> {
        match self {
            Self::Dict(dict) => Some(dict),
            _ => None,
        }
    }

    #[must_use]
    /// The string, if this is one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(text) => Some(text),
            _ => None,
        }
    }

    #[must_use]
    /// The value as a `u32`, if it is a 32-bit integer.
    pub fn as_u32(&self) -> Option<u32> {
        match self {
            Self::UInt32(value) => Some(*value),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
/// Mapping in the order keys were first read; a repeated key replaces the earlier value.
pub struct Dict {
    entries: OrderedMap<BinValue>,
}

impl Dict {
    #[must_use]
    /// An empty dict.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a value, keeping the key's original position.
    pub fn insert(&mut self, key: String, value: BinValue) {
        self.entries.insert(key, value);
    }

    #[must_use]
    /// Looks up a key.
    pub fn get(&self, key: &str) -> Option<&BinValue> {
        self.entries.get(key)
    }

    #[must_use]
    /// Follows a chain of nested dict keys and returns the final value.
    pub fn path(&self, keys: &[&str]) -> Option<&BinValue> {
        let (last, parents) = keys.split_last()?;
        parents
            .iter()
            .try_fold(self, |dict, key| dict.get(key)?.as_dict())?
            .get(last)
    }

    /// Entries in read order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BinValue)> {
        self.entries.iter()
    }

    #[must_use]
    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    /// Whether the dict has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for Dict {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.entries.serialize(serializer)
    }
}

/// Decodes one dict body, up to and including its end tag.
///
/// # Errors
///
/// Returns [`Error::Format`] on an unknown tag byte, [`Error::TooDeep`] when dicts nest more
/// than [`MAX_DEPTH`] levels, and I/O errors on truncated input. Any of these aborts the whole
/// decode; no partial dict is returned.
pub fn read_dict<R: BufRead>(cursor: &mut BinaryCursor<R>) -> Result<Dict> {
    read_nested(cursor, 0)
}

fn read_nested<R: BufRead>(cursor: &mut BinaryCursor<R>, depth: usize) -> Result<Dict> {
    let mut dict = Dict::new();
    loop {
        let offset = cursor.position();
        let tag = cursor.read_u8()?;
        if tag == TAG_END {
            return Ok(dict);
        }
        let key = cursor.read_cstring()?;
        let value = match tag {
            TAG_DICT if depth >= MAX_DEPTH => {
                return Err(Error::TooDeep {
                    limit: MAX_DEPTH,
                    offset,
                })
            }
            TAG_DICT => BinValue::Dict(read_nested(cursor, depth + 1)?),
            TAG_STR => BinValue::Str(cursor.read_cstring()?),
            TAG_U32 => BinValue::UInt32(cursor.read_u32()?),
            TAG_U64 => BinValue::UInt64(cursor.read_u64()?),
            _ => return Err(Error::Format { tag, key, offset }),
        };
        dict.insert(key, value);
    }
}

#[cfg(test)]
#[path = "../tests/dict.rs"]
mod tests;
