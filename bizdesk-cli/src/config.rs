//! Configuration loading using Figment.
//!
//! Sources, later overriding earlier:
//! 1. Built-in defaults
//! 2. `bizdesk.toml`, `bizdesk.yaml`, `bizdesk.json` in the working directory
//! 3. `BIZDESK_`-prefixed environment variables (`BIZDESK_DATA_DIR`, ...)
//! 4. Command line flags, applied by the caller

use std::path::{Path, PathBuf};

use bizdesk_query::SortMode;
use figment::{
    providers::{Env, Format, Json, Serialized, Toml, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Base name of the configuration files.
pub const CONFIG_FILE_STEM: &str = "bizdesk";

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "BIZDESK_";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BizdeskConfig {
    /// Where layouts and records are stored.
    pub data_dir: PathBuf,
    /// Compare every sort key as text, including numbers.
    pub legacy_string_sort: bool,
    /// Fixed table width; detected from the terminal when unset.
    pub table_width: Option<u16>,
}

impl Default for BizdeskConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".bizdesk"),
            legacy_string_sort: false,
            table_width: None,
        }
    }
}

impl BizdeskConfig {
    /// Load configuration with `dir` as the working directory.
    pub fn load_from(dir: &Path) -> Result<Self, figment::Error> {
        let config: Self = Self::figment(dir).extract()?;
        debug!(?config, "loaded configuration");
        Ok(config)
    }

    /// Load configuration from the current directory.
    pub fn load() -> Result<Self, figment::Error> {
        Self::load_from(Path::new("."))
    }

    fn figment(dir: &Path) -> Figment {
        let file = |ext: &str| dir.join(format!("{CONFIG_FILE_STEM}.{ext}"));
        Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Toml::file(file("toml")))
            .merge(Yaml::file(file("yaml")))
            .merge(Json::file(file("json")))
            .merge(Env::prefixed(ENV_PREFIX))
    }

    /// Apply command line overrides.
    pub fn with_data_dir(mut self, data_dir: Option<PathBuf>) -> Self {
        if let Some(dir) = data_dir {
            self.data_dir = dir;
        }
        self
    }

    pub fn sort_mode(&self) -> SortMode {
        if self.legacy_string_sort {
            SortMode::Legacy
        } else {
            SortMode::Typed
        }
    }
}
