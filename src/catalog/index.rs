//! Cross-references between decoded catalogs.

use crate::binary::dict::BinValue;
use crate::catalog::app::AppRecord;
use crate::catalog::package::PackageCatalog;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
/// A package that grants an app, with the shares that own it.
pub struct Source {
    /// Package id.
    pub package: u32,
    /// Owning share ids, highest priority first.
    pub shares: Vec<String>,
}

/// Maps each app id to the packages that grant it.
///
/// Reads `data[<package id>]["appids"]` of every package; packages without that shape contribute
/// nothing.
#[must_use]
pub fn app_packages(catalog: &PackageCatalog) -> BTreeMap<u32, BTreeSet<u32>> {
    let mut index: BTreeMap<u32, BTreeSet<u32>> = BTreeMap::new();
    for (&package, record) in &catalog.records {
        let key = package.to_string();
        let Some(appids) = record
            .data
            .path(&[key.as_str(), "appids"])
            .and_then(BinValue::as_dict)
        else {
            continue;
        };
        for app in appids.iter().filter_map(|(_, value)| value.as_u32()) {
            index.entry(app).or_default().insert(package);
        }
    }
    index
}

/// Packages granting `app` that at least one share owns, in package id order.
///
/// `owners` maps package ids to owning shares, as built by
/// [`ShareSet::licenses`](crate::shares::ShareSet::licenses).
#[must_use]
pub fn sources(
    app_packages: &BTreeMap<u32, BTreeSet<u32>>,
    owners: &BTreeMap<u32, Vec<String>>,
    app: u32,
) -> Vec<Source> {
    app_packages
        .get(&app)
        .into_iter()
        .flatten()
        .filter_map(|package| {
            owners.get(package).map(|shares| Source {
                package: *package,
                shares: shares.clone(),
            })
        })
        .collect()
}

/// Display name of an app, from `appinfo/common/name`.
#[must_use]
pub fn app_name(record: &AppRecord) -> Option<&str> {
    record
        .data
        .path(&["appinfo", "common", "name"])
        .and_then(BinValue::as_str)
}

#[cfg(test)]
#[path = "../tests/index.rs"]
mod tests;
