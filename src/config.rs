use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::{debug, error};

use crate::error::{Error, Result};

static DEFAULT_CONFIG: &str = include_str!("default_config.toml");

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub links: LinksConfig,
    pub page: PageConfig,
    pub html: HtmlConfig,
    pub layout: LayoutConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LinksConfig {
    pub color: String,
    pub underline: bool,
    /// Open links in a new browser tab (HTML only).
    pub new_tab: bool,
}

impl Default for LinksConfig {
    fn default() -> Self {
        Self {
            color: "#88c0d0".to_string(),
            underline: true,
            new_tab: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct PageConfig {
    pub numbers: bool,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct HtmlConfig {
    /// Class of the wrapping `<div>`.
    pub class: String,
}

impl Default for HtmlConfig {
    fn default() -> Self {
        Self {
            class: "lesson-notes".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LayoutConfig {
    /// Keep each heading on the same page as the block after it.
    pub keep_headings_with_next: bool,
    /// Lists with at most this many items are never split across pages.
    pub unbreakable_list_max: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            keep_headings_with_next: true,
            unbreakable_list_max: 5,
        }
    }
}

impl Config {
    /// The defaults compiled into the binary from `default_config.toml`.
    pub fn compiled_default() -> Self {
        match toml::from_str(DEFAULT_CONFIG) {
            Ok(config) => config,
            Err(e) => {
                error!("compiled default config is invalid, using built-in values: {e}");
                Self::default()
            }
        }
    }

    /// Load config from a TOML file layered over `default_config.toml`.
    ///
    /// Keys the file leaves out keep their compiled default.
    pub fn load(path: &Path) -> Result<Self> {
        let parse_error = |source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        };

        let content = fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let overrides: toml::Table = toml::from_str(&content).map_err(parse_error)?;

        let mut merged: toml::Table = toml::from_str(DEFAULT_CONFIG).unwrap_or_default();
        merge_tables(&mut merged, overrides);
        let config = toml::Value::Table(merged).try_into().map_err(parse_error)?;

        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }
}

/// Overlay `overrides` onto `base`, recursing into tables present in both.
fn merge_tables(base: &mut toml::Table, overrides: toml::Table) {
    for (key, value) in overrides {
        match (base.get_mut(&key), value) {
            (Some(toml::Value::Table(existing)), toml::Value::Table(inner)) => {
                merge_tables(existing, inner);
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}
