//! Family-sharing device list, split across Steam's `config.vdf` and a companion file.
//!
//! Steam honours the `AuthorizedDevice` entries of `config.vdf` in file order. Shares that are
//! switched off are parked, verbatim, in a second text file with the same layout. Rewriting both
//! lists means clearing each `AuthorizedDevice` block and appending every share's original lines
//! to whichever file matches its state, so nothing outside those two blocks changes.

use crate::document::TextDocument;
use crate::edit_plan::EditPlan;
use crate::error::{Error, Result};
use crate::section::Section;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

/// Location of the device list in both files.
pub const DEVICE_PATH: [&str; 2] = ["InstallConfigStore", "AuthorizedDevice"];

/// Location of an account's owned packages in its `localconfig.vdf`.
pub const LICENSES_PATH: [&str; 2] = ["UserLocalConfigStore", "Licenses"];

/// Content written when the companion file does not exist yet.
pub const DISABLED_SKELETON: &str = "\"InstallConfigStore\"\n{\n\t\"AuthorizedDevice\"\n\t{\n\t}\n}\n";

#[derive(Clone, Debug, Serialize)]
/// One lender's authorisation entry.
pub struct Share {
    /// Lender account id, the entry's key.
    pub id: String,
    /// Whether the entry lives in `config.vdf`.
    pub enabled: bool,
    /// `timeused` value, 0 when absent or not numeric.
    pub time_used: u64,
    #[serde(skip)]
    raw: Vec<String>,
}

impl Share {
    #[must_use]
    /// Original lines of the entry, moved as-is between files.
    pub fn raw(&self) -> &[String] {
        &self.raw
    }
}

/// Both device lists, merged into one priority order.
pub struct ShareSet {
    config: TextDocument,
    disabled: TextDocument,
    shares: Vec<Share>,
}

fn device_section<'d>(doc: &'d TextDocument, path: &Path) -> Result<&'d Section> {
    doc.root().path(&DEVICE_PATH).ok_or_else(|| {
        Error::MissingSection(format!("{} in {}", DEVICE_PATH.join("/"), path.display()))
    })
}

fn collect(doc: &TextDocument, section: &Section, enabled: bool) -> Vec<Share> {
    let mut entries: Vec<_> = section.iter().collect();
    entries.sort_by_key(|(_, value)| value.span().start);
    entries
        .into_iter()
        .map(|(id, value)| Share {
            id: id.to_string(),
            enabled,
            time_used: value
                .as_section()
                .and_then(|s| s.scalar("timeused"))
                .and_then(|t| t.parse().ok())
                .unwrap_or(0),
            raw: value.raw(doc).to_vec(),
        })
        .collect()
}

impl ShareSet {
    /// Loads both device lists, creating the companion file if it is missing.
    ///
    /// Enabled shares come first in `config.vdf` order, then shares found only in the companion
    /// file. An id present in both counts as enabled.
    ///
    /// # Errors
    ///
    /// Returns load errors from either file and [`Error::MissingSection`] if a file lacks the
    /// device list.
    pub fn load(config_path: impl AsRef<Path>, disabled_path: impl AsRef<Path>) -> Result<Self> {
        let (config_path, disabled_path) = (config_path.as_ref(), disabled_path.as_ref());
        if !disabled_path.exists() {
            tracing::info!(path = %disabled_path.display(), "creating disabled share list");
            fs::write(disabled_path, DISABLED_SKELETON)?;
        }
        let config = TextDocument::load(config_path)?;
        let disabled = TextDocument::load(disabled_path)?;

        let mut shares = collect(&config, device_section(&config, config_path)?, true);
        let known: HashSet<String> = shares.iter().map(|s| s.id.clone()).collect();
        shares.extend(
            collect(&disabled, device_section(&disabled, disabled_path)?, false)
                .into_iter()
                .filter(|s| !known.contains(&s.id)),
        );
        tracing::debug!(count = shares.len(), "loaded shares");

        Ok(Self {
            config,
            disabled,
            shares,
        })
    }

    #[must_use]
    /// Shares in priority order.
    pub fn shares(&self) -> &[Share] {
        &self.shares
    }

    fn check_known(&self, ids: &[&str]) -> Result<()> {
        match ids
            .iter()
            .find(|id| !self.shares.iter().any(|s| s.id == **id))
        {
            Some(unknown) => Err(Error::UnknownShare((*unknown).to_string())),
            None => Ok(()),
        }
    }

    fn set_enabled(&mut self, ids: &[&str], enabled: bool) -> Result<()> {
        self.check_known(ids)?;
        for share in &mut self.shares {
            if ids.contains(&share.id.as_str()) {
                share.enabled = enabled;
            }
        }
        Ok(())
    }

    /// Moves the given shares into `config.vdf` on the next write.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownShare`] without changing anything if an id is not known.
    pub fn enable(&mut self, ids: &[&str]) -> Result<()> {
        self.set_enabled(ids, true)
    }

    /// Moves the given shares into the companion file on the next write.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownShare`] without changing anything if an id is not known.
    pub fn disable(&mut self, ids: &[&str]) -> Result<()> {
        self.set_enabled(ids, false)
    }

    /// Enables or disables every share.
    pub fn set_all(&mut self, enabled: bool) {
        for share in &mut self.shares {
            share.enabled = enabled;
        }
    }

    /// Puts `high` first (in the order given) and `low` last; everything else keeps its place.
    ///
    /// An id named in both lists stays in `high`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownShare`] without changing anything if an id is not known.
    pub fn prioritize(&mut self, high: &[&str], low: &[&str]) -> Result<()> {
        self.check_known(high)?;
        self.check_known(low)?;

        let mut remaining = std::mem::take(&mut self.shares);
        let mut take = |id: &str| {
            remaining
                .iter()
                .position(|s| s.id == id)
                .map(|at| remaining.remove(at))
        };
        let first: Vec<Share> = high.iter().filter_map(|&id| take(id)).collect();
        let last: Vec<Share> = low.iter().filter_map(|&id| take(id)).collect();

        self.shares = first;
        self.shares.append(&mut remaining);
        self.shares.extend(last);
        Ok(())
    }

    #[must_use]
    /// Maps each package id to the shares that own it, in priority order.
    ///
    /// `localconfig` gives the `localconfig.vdf` path for a share id. Every share is consulted,
    /// enabled or not. A share whose file is missing, unreadable or lacks a license list simply
    /// owns nothing; license keys that are not package ids are ignored.
    pub fn licenses<F>(&self, localconfig: F) -> BTreeMap<u32, Vec<String>>
    where
        F: Fn(&str) -> PathBuf,
    {
        let mut owners: BTreeMap<u32, Vec<String>> = BTreeMap::new();
        for share in &self.shares {
            let path = localconfig(&share.id);
            let doc = match TextDocument::load(&path) {
                Ok(doc) => doc,
                Err(Error::Io(e)) => {
                    tracing::debug!(share = %share.id, path = %path.display(), "no local config: {e}");
                    continue;
                }
                Err(e) => {
                    tracing::warn!(share = %share.id, path = %path.display(), "skipping local config: {e}");
                    continue;
                }
            };
            let Some(licenses) = doc.root().path(&LICENSES_PATH) else {
                tracing::debug!(share = %share.id, "local config has no license list");
                continue;
            };
            for package in licenses.iter().filter_map(|(key, _)| key.parse::<u32>().ok()) {
                owners.entry(package).or_default().push(share.id.clone());
            }
        }
        owners
    }

    /// Edit plans for `config.vdf` and the companion file, in that order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingSection`] if a document lacks the device list.
    pub fn plans(&self) -> Result<(EditPlan, EditPlan)> {
        let config_path = self.config.path().unwrap_or(Path::new("config"));
        let disabled_path = self.disabled.path().unwrap_or(Path::new("disabled"));
        let on = device_section(&self.config, config_path)?;
        let off = device_section(&self.disabled, disabled_path)?;

        let mut config_plan = EditPlan::new();
        let mut disabled_plan = EditPlan::new();
        on.clear(&mut config_plan);
        off.clear(&mut disabled_plan);
        for share in &self.shares {
            if share.enabled {
                on.append(&mut config_plan, share.raw.iter().cloned());
            } else {
                off.append(&mut disabled_plan, share.raw.iter().cloned());
            }
        }
        Ok((config_plan, disabled_plan))
    }

    /// Rewrites both files. The companion file is written first.
    ///
    /// The set is consumed because its documents no longer match disk afterwards; load again to
    /// continue.
    ///
    /// # Errors
    ///
    /// Returns errors from [`ShareSet::plans`] and from the atomic writes.
    pub fn write(self) -> Result<()> {
        let (config_plan, disabled_plan) = self.plans()?;
        self.disabled.save(&disabled_plan)?;
        self.config.save(&config_plan)?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/shares.rs"]
mod tests;
