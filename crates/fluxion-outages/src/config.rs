// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of FluxION.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

//! Configuration for the outage pipeline
//!
//! Everything tied to the upstream page lives here: the page address, the
//! alt-text marker of the schedule image, the pixel geometry of the grid and
//! the classifier palette. When the operator changes the image layout only
//! this file (or the TOML it is loaded from) has to change.

use crate::classifier::ClassifierConfig;
use crate::error::{OutageError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

pub const HOURS_PER_DAY: u32 = 24;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutagesConfig {
    #[serde(default)]
    pub source: SourceSettings,
    #[serde(default)]
    pub grid: GridConfig,
    #[serde(default)]
    pub classifier: ClassifierConfig,
    #[serde(default)]
    pub cache: CacheSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSettings {
    /// Page that embeds the schedule image
    #[serde(default = "default_page_url")]
    pub page_url: String,

    /// Substring of the `alt` attribute identifying the schedule image
    #[serde(default = "default_image_alt_marker")]
    pub image_alt_marker: String,

    /// Timeout for each upstream request
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// Pixel geometry of the schedule table. Rows are subqueues in image order,
/// columns are the 24 hours of the day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridConfig {
    #[serde(default = "default_left")]
    pub left: u32,
    #[serde(default = "default_top")]
    pub top: u32,
    #[serde(default = "default_cell_width")]
    pub cell_width: u32,
    #[serde(default = "default_cell_height")]
    pub cell_height: u32,
    #[serde(default = "default_hours")]
    pub hours: u32,
    #[serde(default = "default_subqueues")]
    pub subqueues: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheSettings {
    /// Directory holding the cached schedule
    #[serde(default = "default_cache_dir")]
    pub dir: PathBuf,

    /// Key (file stem) of the cached record
    #[serde(default = "default_cache_key")]
    pub key: String,
}

fn default_page_url() -> String {
    "https://hoe.com.ua/page/pogodinni-vidkljuchennja".to_owned()
}

fn default_image_alt_marker() -> String {
    "ГПВ".to_owned()
}

fn default_timeout_secs() -> u64 {
    15
}

fn default_user_agent() -> String {
    format!("fluxion-outages/{}", env!("CARGO_PKG_VERSION"))
}

fn default_left() -> u32 {
    160
}

fn default_top() -> u32 {
    312
}

fn default_cell_width() -> u32 {
    58
}

fn default_cell_height() -> u32 {
    53
}

fn default_hours() -> u32 {
    HOURS_PER_DAY
}

fn default_subqueues() -> Vec<String> {
    (1..=6)
        .flat_map(|queue| [format!("{queue}.1"), format!("{queue}.2")])
        .collect()
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_cache_key() -> String {
    "latest".to_owned()
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            page_url: default_page_url(),
            image_alt_marker: default_image_alt_marker(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            left: default_left(),
            top: default_top(),
            cell_width: default_cell_width(),
            cell_height: default_cell_height(),
            hours: default_hours(),
            subqueues: default_subqueues(),
        }
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            dir: default_cache_dir(),
            key: default_cache_key(),
        }
    }
}

impl GridConfig {
    pub fn rows(&self) -> usize {
        self.subqueues.len()
    }

    pub fn validate(&self) -> Result<()> {
        if self.hours != HOURS_PER_DAY {
            return Err(OutageError::Config(format!(
                "grid.hours must be {HOURS_PER_DAY}, got {}",
                self.hours
            )));
        }
        if self.cell_width == 0 || self.cell_height == 0 {
            return Err(OutageError::Config("grid cell size must be non-zero".to_owned()));
        }
        if self.subqueues.is_empty() {
            return Err(OutageError::Config(
                "grid.subqueues must list at least one subqueue".to_owned(),
            ));
        }
        let mut seen = HashSet::new();
        for id in &self.subqueues {
            if !seen.insert(id.as_str()) {
                return Err(OutageError::Config(format!(
                    "duplicate subqueue in grid.subqueues: {id}"
                )));
            }
        }
        Ok(())
    }
}

impl OutagesConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            OutageError::Config(format!("Failed to read {}: {e}", path.display()))
        })?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| OutageError::Config(format!("Failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path` if it exists, fall back to defaults otherwise
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::from_file(path)
        } else {
            tracing::info!("Config file {} not found, using defaults", path.display());
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.grid.validate()?;
        if self.source.image_alt_marker.is_empty() {
            return Err(OutageError::Config("source.image_alt_marker must not be empty".to_owned()));
        }
        if self.source.timeout_secs == 0 {
            return Err(OutageError::Config(
                "source.timeout_secs must be greater than zero".to_owned(),
            ));
        }
        if self.cache.key.is_empty() {
            return Err(OutageError::Config("cache.key must not be empty".to_owned()));
        }
        Ok(())
    }
}
