use super::{app_name, app_packages, sources, Source};
use crate::catalog::{app, package, IdFilter};
use crate::test_support::{app_catalog, app_named, package_catalog, package_with_apps, reader, DictBytes};
use std::collections::{BTreeMap, BTreeSet};

#[test]
fn test_apps_map_to_granting_packages() {
    let odd = DictBytes::new().u32("packageid", 3).finish();
    let bytes = package_catalog(&[
        package_with_apps(1, &[10, 20]),
        package_with_apps(2, &[20]),
        (3, odd),
    ]);
    let catalog = package::read(reader(bytes, 32), &IdFilter::all()).unwrap();
    let index = app_packages(&catalog);

    assert_eq!(index[&10], BTreeSet::from([1]));
    assert_eq!(index[&20], BTreeSet::from([1, 2]));
    assert_eq!(index.len(), 2);
}

#[test]
fn test_app_name_lookup() {
    let bare = DictBytes::new().u32("x", 1).finish();
    let bytes = app_catalog(&[
        app_named(70, "Half-Life"),
        (71, crate::test_support::app_payload(71, bare)),
    ]);
    let catalog = app::read(reader(bytes, 32), &IdFilter::all()).unwrap();
    assert_eq!(app_name(&catalog.records[&70]), Some("Half-Life"));
    assert_eq!(app_name(&catalog.records[&71]), None);
}

#[test]
fn test_sources_keep_only_owned_packages() {
    let bytes = package_catalog(&[
        package_with_apps(1, &[10]),
        package_with_apps(2, &[10]),
        package_with_apps(3, &[10, 30]),
    ]);
    let catalog = package::read(reader(bytes, 32), &IdFilter::all()).unwrap();
    let by_app = app_packages(&catalog);
    let owners = BTreeMap::from([
        (1, vec!["333".to_string(), "111".to_string()]),
        (3, vec!["222".to_string()]),
        (99, vec!["111".to_string()]),
    ]);

    assert_eq!(
        sources(&by_app, &owners, 10),
        vec![
            Source {
                package: 1,
                shares: vec!["333".to_string(), "111".to_string()],
            },
            Source {
                package: 3,
                shares: vec!["222".to_string()],
            },
        ]
    );
    assert!(sources(&by_app, &owners, 42).is_empty());
}
