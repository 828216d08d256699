//! Configuration to acknowledge developer preferences as well as set defaults.
//!
//! Specifically, we try to find a vdfkit.toml, and if present we load settings from there.
//! This provides the Steam install location and the name of the disabled-share file.

use facet::Facet;
use std::fs;
use std::path::{Path, PathBuf};

/// File looked up in the working directory.
pub const CONFIG_FILE: &str = "vdfkit.toml";

#[derive(Facet, Clone, Debug, PartialEq)]
/// User preferences loaded from vdfkit.toml or falling back to defaults.
pub struct Config {
    #[facet(default = ".".to_string())]
    /// Steam data directory holding `config/` and `appcache/`.
    pub steam_path: String,
    #[facet(default = "sfs-disabled.vdf".to_string())]
    /// Companion file that parks disabled shares.
    pub disabled_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            steam_path: ".".to_string(),
            disabled_file: "sfs-disabled.vdf".to_string(),
        }
    }
}

impl Config {
    #[must_use]
    /// Load configuration from vdfkit.toml if present.
    pub fn load() -> Self {
        Self::load_from(Path::new(CONFIG_FILE))
    }

    #[must_use]
    /// Load configuration from `path`, using defaults if it is missing or invalid.
    pub fn load_from(path: &Path) -> Self {
        if let Ok(contents) = fs::read_to_string(path) {
            if let Ok(config) = facet_toml::from_str::<Self>(&contents) {
                return config;
            }
            tracing::warn!(path = %path.display(), "ignoring unparseable config");
        }
        Self::default()
    }

    #[must_use]
    /// `config/config.vdf`, which holds the enabled shares.
    pub fn config_vdf(&self) -> PathBuf {
        Path::new(&self.steam_path).join("config").join("config.vdf")
    }

    #[must_use]
    /// `appcache/appinfo.vdf`.
    pub fn appinfo_vdf(&self) -> PathBuf {
        Path::new(&self.steam_path).join("appcache").join("appinfo.vdf")
    }

    #[must_use]
    /// `appcache/packageinfo.vdf`.
    pub fn packageinfo_vdf(&self) -> PathBuf {
        Path::new(&self.steam_path)
            .join("appcache")
            .join("packageinfo.vdf")
    }

    #[must_use]
    /// `userdata/`, holding one directory per account that has logged in on this machine.
    pub fn userdata_dir(&self) -> PathBuf {
        Path::new(&self.steam_path).join("userdata")
    }

    #[must_use]
    /// `userdata/<account>/config/localconfig.vdf`, which lists the account's licenses.
    pub fn localconfig_vdf(&self, account: &str) -> PathBuf {
        self.userdata_dir()
            .join(account)
            .join("config")
            .join("localconfig.vdf")
    }

    #[must_use]
    /// The disabled-share file.
    pub fn disabled_vdf(&self) -> PathBuf {
        PathBuf::from(&self.disabled_file)
    }
}

#[cfg(test)]
#[path = "tests/config.rs"]
mod tests;
