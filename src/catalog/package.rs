//! `packageinfo.vdf`: records without a length prefix, so every record is decoded.

use crate::binary::cursor::BinaryCursor;
use crate::binary::dict::{read_dict, Dict};
use crate::catalog::{CatalogHeader, IdFilter, Sha1};
use crate::error::Result;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Id that ends the record stream.
pub const SENTINEL: u32 = 0xFFFF_FFFF;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
/// One package record.
pub struct PackageRecord {
    /// Package id.
    pub id: u32,
    /// Content hash.
    pub sha1: Sha1,
    /// Change number the record was last updated in.
    pub change: u32,
    /// Decoded payload; normally holds one dict keyed by the id in decimal.
    pub data: Dict,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
/// A decoded package catalog.
pub struct PackageCatalog {
    /// File header.
    pub header: CatalogHeader,
    /// Records kept by the filter, by id.
    pub records: BTreeMap<u32, PackageRecord>,
}

/// Decodes a package catalog from a buffered stream.
///
/// The filter only decides which records are retained; with no length prefix to skip by, every
/// record is still decoded in full.
///
/// # Errors
///
/// Returns [`crate::Error::Format`] for an unknown dict tag and I/O errors for truncated input.
pub fn read<R: BufRead>(reader: R, filter: &IdFilter) -> Result<PackageCatalog> {
    let mut cursor = BinaryCursor::new(reader);
    let header = CatalogHeader::read(&mut cursor)?;
    let mut records = BTreeMap::new();
    let mut seen = 0usize;

    loop {
        let id = cursor.read_u32()?;
        if id == SENTINEL {
            break;
        }
        let sha1 = Sha1(cursor.read_array()?);
        let change = cursor.read_u32()?;
        let data = read_dict(&mut cursor)?;
        seen += 1;
        if filter.accepts(id) {
            tracing::trace!(id, change, "package");
            records.insert(
                id,
                PackageRecord {
                    id,
                    sha1,
                    change,
                    data,
                },
            );
        }
    }

    tracing::debug!(
        version = header.version,
        seen,
        kept = records.len(),
        bytes = cursor.position(),
        "decoded package catalog"
    );
    Ok(PackageCatalog { header, records })
}

/// Opens and decodes a package catalog file.
///
/// # Errors
///
/// As [`read`], plus I/O errors opening the file.
pub fn read_path(path: impl AsRef<Path>, filter: &IdFilter) -> Result<PackageCatalog> {
    read(BufReader::new(File::open(path)?), filter)
}

#[cfg(test)]
#[path = "../tests/package.rs"]
mod tests;
