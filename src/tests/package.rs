use super::{read, read_path, SENTINEL};
use crate::binary::dict::BinValue;
use crate::catalog::IdFilter;
use crate::error::Error;
use crate::test_support::{package_catalog, package_with_apps, reader, DictBytes, UNIVERSE, VERSION};
use proptest::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_header_then_sentinel_is_empty() {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&VERSION.to_le_bytes());
    bytes.extend_from_slice(&UNIVERSE.to_le_bytes());
    bytes.extend_from_slice(&SENTINEL.to_le_bytes());

    let catalog = read(reader(bytes, 8), &IdFilter::all()).unwrap();
    assert!(catalog.records.is_empty());
    assert_eq!(catalog.header.version, VERSION);
    assert_eq!(catalog.header.universe, UNIVERSE);
}

#[test]
fn test_records_are_decoded_in_full() {
    let bytes = package_catalog(&[package_with_apps(0, &[7]), package_with_apps(44, &[10, 20])]);
    let catalog = read(reader(bytes, 16), &IdFilter::all()).unwrap();

    assert_eq!(catalog.records.len(), 2);
    let pkg = &catalog.records[&44];
    assert_eq!(pkg.change, 144);
    assert_eq!(pkg.sha1.to_string(), "AB".repeat(20));
    assert_eq!(
        pkg.data.path(&["44", "appids", "1"]),
        Some(&BinValue::UInt32(20))
    );
    // Id 0 is an ordinary package here, not the sentinel
    assert!(catalog.records.contains_key(&0));
}

#[test]
fn test_filter_only_controls_retention() {
    let bytes = package_catalog(&[
        package_with_apps(1, &[10]),
        package_with_apps(2, &[20]),
        package_with_apps(3, &[30]),
    ]);
    let catalog = read(reader(bytes, 32), &IdFilter::only([2, 99])).unwrap();
    assert_eq!(catalog.records.keys().copied().collect::<Vec<_>>(), vec![2]);
}

#[test]
fn test_bad_tag_in_unwanted_record_still_fails() {
    let bad = DictBytes::new().raw(b"\x03x\0").finish();
    let bytes = package_catalog(&[(1, bad), package_with_apps(2, &[20])]);
    let err = read(reader(bytes, 32), &IdFilter::only([2])).unwrap_err();
    assert!(matches!(err, Error::Format { tag: 3, .. }), "got {err:?}");
}

#[test]
fn test_missing_sentinel_is_eof() {
    let mut bytes = package_catalog(&[package_with_apps(5, &[1])]);
    bytes.truncate(bytes.len() - 4);
    let err = read(reader(bytes, 32), &IdFilter::all()).unwrap_err();
    assert!(matches!(err, Error::Io(_)), "got {err:?}");
}

#[test]
fn test_read_path() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(&package_catalog(&[package_with_apps(9, &[90])]))
        .unwrap();
    let catalog = read_path(file.path(), &IdFilter::all()).unwrap();
    assert_eq!(catalog.records.len(), 1);

    let json = serde_json::to_value(&catalog).unwrap();
    assert_eq!(json["records"]["9"]["data"]["9"]["appids"]["0"], 90);
}

proptest! {
    #[test]
    fn prop_disjoint_filters_merge_to_union(
        ids in prop::collection::btree_set(1u32..500, 0..12),
        split in prop::collection::vec(any::<bool>(), 12),
    ) {
        let records: Vec<_> = ids.iter().map(|&id| package_with_apps(id, &[id * 10])).collect();
        let bytes = package_catalog(&records);
        // Never empty, so neither side turns into a keep-all filter
        let mut a = vec![1000];
        let mut b = vec![1001];
        for (id, left) in ids.iter().zip(split) {
            if left { a.push(*id) } else { b.push(*id) }
        }

        let mut merged = read(reader(bytes.clone(), 16), &IdFilter::only(a.clone())).unwrap().records;
        merged.extend(read(reader(bytes.clone(), 16), &IdFilter::only(b.clone())).unwrap().records);
        let union = read(reader(bytes, 16), &IdFilter::only(a.into_iter().chain(b))).unwrap().records;
        prop_assert_eq!(merged, union);
    }
}
