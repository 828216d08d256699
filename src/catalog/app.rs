//! `appinfo.vdf`: length-prefixed records, so unwanted ones are skipped without decoding.

use crate::binary::cursor::BinaryCursor;
use crate::binary::dict::{read_dict, Dict};
use crate::catalog::{CatalogHeader, IdFilter, Sha1};
use crate::error::{Error, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Seek};
use std::path::Path;

/// Id that ends the record stream.
pub const SENTINEL: u32 = 0;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
/// One app record.
pub struct AppRecord {
    /// App id.
    pub id: u32,
    /// Declared byte length of everything after the size field.
    pub data_size: u32,
    /// Stream offset where the payload starts.
    pub data_pos: u64,
    /// Leading word of unknown meaning.
    pub unknown1: u32,
    /// Unix timestamp of the last update.
    pub last_updated: u32,
    /// PICS access token.
    pub access_token: u64,
    /// Content hash.
    pub sha1: Sha1,
    /// Change number the record was last updated in.
    pub change: u32,
    /// Decoded payload.
    pub data: Dict,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
/// A decoded app catalog.
pub struct AppCatalog {
    /// File header.
    pub header: CatalogHeader,
    /// Records kept by the filter, by id.
    pub records: BTreeMap<u32, AppRecord>,
    /// Payload bytes jumped over for records outside the filter.
    #[serde(skip)]
    pub skipped_bytes: u64,
}

/// Decodes an app catalog from a buffered, seekable stream.
///
/// Records outside `filter` are skipped by their declared size. Every decoded record must end
/// exactly `data_size` bytes after its payload started.
///
/// # Errors
///
/// Returns [`Error::Integrity`] when a record's decoded length disagrees with its declared size,
/// [`Error::Format`] for an unknown dict tag, and I/O errors for truncated input.
pub fn read<R: BufRead + Seek>(reader: R, filter: &IdFilter) -> Result<AppCatalog> {
    let mut cursor = BinaryCursor::new(reader);
    let header = CatalogHeader::read(&mut cursor)?;
    let mut records = BTreeMap::new();
    let mut skipped_bytes = 0u64;

    loop {
        let id = cursor.read_u32()?;
        if id == SENTINEL {
            break;
        }
        let data_size = cursor.read_u32()?;
        if !filter.accepts(id) {
            cursor.skip(u64::from(data_size))?;
            skipped_bytes += u64::from(data_size);
            continue;
        }

        let data_pos = cursor.position();
        let record = AppRecord {
            id,
            data_size,
            data_pos,
            unknown1: cursor.read_u32()?,
            last_updated: cursor.read_u32()?,
            access_token: cursor.read_u64()?,
            sha1: Sha1(cursor.read_array()?),
            change: cursor.read_u32()?,
            data: read_dict(&mut cursor)?,
        };
        let actual = cursor.position() - data_pos;
        if actual != u64::from(data_size) {
            return Err(Error::Integrity {
                id,
                expected: u64::from(data_size),
                actual,
            });
        }
        tracing::trace!(id, data_size, "app");
        records.insert(id, record);
    }

    tracing::debug!(
        version = header.version,
        kept = records.len(),
        skipped_bytes,
        bytes = cursor.position(),
        "decoded app catalog"
    );
    Ok(AppCatalog {
        header,
        records,
        skipped_bytes,
    })
}

/// Opens and decodes an app catalog file.
///
/// # Errors
///
/// As [`read`], plus I/O errors opening the file.
pub fn read_path(path: impl AsRef<Path>, filter: &IdFilter) -> Result<AppCatalog> {
    read(BufReader::new(File::open(path)?), filter)
}

#[cfg(test)]
#[path = "../tests/app.rs"]
mod tests;
