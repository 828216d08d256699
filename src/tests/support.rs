//! Byte builders for binary catalog fixtures.

use crate::binary::dict::{TAG_DICT, TAG_END, TAG_STR, TAG_U32, TAG_U64};
use std::io::{BufReader, Cursor};

#[derive(Default)]
pub(crate) struct DictBytes {
    bytes: Vec<u8>,
}

impl DictBytes {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn key(&mut self, tag: u8, key: &str) {
        self.bytes.push(tag);
        self.bytes.extend_from_slice(key.as_bytes());
        self.bytes.push(0);
    }

    pub(crate) fn dict(mut self, key: &str, inner: DictBytes) -> Self {
        self.key(TAG_DICT, key);
        self.bytes.extend(inner.finish());
        self
    }

    pub(crate) fn str(mut self, key: &str, value: &str) -> Self {
        self.key(TAG_STR, key);
        self.bytes.extend_from_slice(value.as_bytes());
        self.bytes.push(0);
        self
    }

    pub(crate) fn u32(mut self, key: &str, value: u32) -> Self {
        self.key(TAG_U32, key);
        self.bytes.extend_from_slice(&value.to_le_bytes());
        self
    }

    pub(crate) fn u64(mut self, key: &str, value: u64) -> Self {
        self.key(TAG_U64, key);
        self.bytes.extend_from_slice(&value.to_le_bytes());
        self
    }

    pub(crate) fn raw(mut self, bytes: &[u8]) -> Self {
        self.bytes.extend_from_slice(bytes);
        self
    }

    pub(crate) fn finish(mut self) -> Vec<u8> {
        self.bytes.push(TAG_END);
        self.bytes
    }
}

pub(crate) const VERSION: u32 = 0x0756_4427;
pub(crate) const UNIVERSE: u32 = 1;

fn header() -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&VERSION.to_le_bytes());
    bytes.extend_from_slice(&UNIVERSE.to_le_bytes());
    bytes
}

/// Fixed app fields followed by the dict body; this is what `dataSize` counts.
pub(crate) fn app_payload(id: u32, body: Vec<u8>) -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&0x0000_0002u32.to_le_bytes());
    bytes.extend_from_slice(&(1_600_000_000 + id).to_le_bytes());
    bytes.extend_from_slice(&u64::from(id).to_le_bytes());
    bytes.extend_from_slice(&[u8::try_from(id % 251).unwrap(); 20]);
    bytes.extend_from_slice(&(id * 3).to_le_bytes());
    bytes.extend(body);
    bytes
}

pub(crate) fn app_catalog(records: &[(u32, Vec<u8>)]) -> Vec<u8> {
    let mut bytes = header();
    for (id, payload) in records {
        bytes.extend_from_slice(&id.to_le_bytes());
        bytes.extend_from_slice(&u32::try_from(payload.len()).unwrap().to_le_bytes());
        bytes.extend_from_slice(payload);
    }
    bytes.extend_from_slice(&0u32.to_le_bytes());
    bytes
}

pub(crate) fn app_named(id: u32, name: &str) -> (u32, Vec<u8>) {
    let body = DictBytes::new()
        .dict(
            "appinfo",
            DictBytes::new().u32("appid", id).dict(
                "common",
                DictBytes::new().str("name", name).str("type", "Game"),
            ),
        )
        .finish();
    (id, app_payload(id, body))
}

pub(crate) fn package_catalog(records: &[(u32, Vec<u8>)]) -> Vec<u8> {
    let mut bytes = header();
    for (id, body) in records {
        bytes.extend_from_slice(&id.to_le_bytes());
        bytes.extend_from_slice(&[0xAB; 20]);
        bytes.extend_from_slice(&(id + 100).to_le_bytes());
        bytes.extend_from_slice(body);
    }
    bytes.extend_from_slice(&u32::MAX.to_le_bytes());
    bytes
}

pub(crate) fn package_with_apps(id: u32, apps: &[u32]) -> (u32, Vec<u8>) {
    let appids = apps
        .iter()
        .enumerate()
        .fold(DictBytes::new(), |dict, (i, app)| dict.u32(&i.to_string(), *app));
    let body = DictBytes::new()
        .dict(
            &id.to_string(),
            DictBytes::new()
                .u32("packageid", id)
                .u32("billingtype", 10)
                .dict("appids", appids),
        )
        .finish();
    (id, body)
}

pub(crate) fn reader(bytes: Vec<u8>, capacity: usize) -> BufReader<Cursor<Vec<u8>>> {
    BufReader::with_capacity(capacity, Cursor::new(bytes))
}
