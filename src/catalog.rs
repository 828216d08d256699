//! Readers for the two binary catalog files, `packageinfo.vdf` and `appinfo.vdf`.
//!
//! Both start with the same `(version, universe)` header and then stream records until a
//! kind-specific sentinel id. They share only the dict decoder; each kind has its own loop.

pub mod app;
pub mod index;
pub mod package;

use crate::binary::cursor::BinaryCursor;
use crate::error::Result;
use serde::{Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt;
use std::io::BufRead;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
/// Set of record ids a caller wants; an empty set keeps everything.
pub struct IdFilter {
    ids: BTreeSet<u32>,
}

impl IdFilter {
    #[must_use]
    /// Keeps every record.
    pub fn all() -> Self {
        Self::default()
    }

    #[must_use]
    /// Keeps only the listed ids.
    pub fn only(ids: impl IntoIterator<Item = u32>) -> Self {
        Self {
            ids: ids.into_iter().collect(),
        }
    }

    #[must_use]
    /// Whether a record with this id should be kept.
    pub fn accepts(&self, id: u32) -> bool {
        self.ids.is_empty() || self.ids.contains(&id)
    }

    #[must_use]
    /// Whether the filter keeps every id.
    pub fn is_all(&self) -> bool {
        self.ids.is_empty()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
/// Header common to both catalog kinds.
pub struct CatalogHeader {
    /// Format version word.
    pub version: u32,
    /// Steam universe the catalog belongs to.
    pub universe: u32,
}

impl CatalogHeader {
    pub(crate) fn read<R: BufRead>(cursor: &mut BinaryCursor<R>) -> Result<Self> {
        Ok(Self {
            version: cursor.read_u32()?,
            universe: cursor.read_u32()?,
        })
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
/// 20-byte content hash carried by every record.
pub struct Sha1(pub [u8; 20]);

impl fmt::Display for Sha1 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.iter().try_for_each(|byte| write!(f, "{byte:02X}"))
    }
}

impl fmt::Debug for Sha1 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sha1({self})")
    }
}

impl Serialize for Sha1 {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
