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

//! Cell color classification
//!
//! The schedule image uses a small fixed palette: blue cells for confirmed
//! outages, light gray for partial or pending hours and white for power on.
//! Reference colors and tolerances were calibrated by hand against the
//! published images and are kept here as configuration.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single sampled pixel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "[u8; 3]", into = "[u8; 3]")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Euclidean distance in RGB space
    pub fn distance(self, other: Rgb) -> f64 {
        let dr = f64::from(self.r) - f64::from(other.r);
        let dg = f64::from(self.g) - f64::from(other.g);
        let db = f64::from(self.b) - f64::from(other.b);
        (dr * dr + dg * dg + db * db).sqrt()
    }
}

impl From<[u8; 3]> for Rgb {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self { r, g, b }
    }
}

impl From<Rgb> for [u8; 3] {
    fn from(c: Rgb) -> Self {
        [c.r, c.g, c.b]
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellState {
    /// Confirmed power cut
    Outage,
    /// Ambiguous cell, see [`GrayPolicy`]
    Gray,
    /// Power available
    On,
}

/// How gray cells are interpreted when building slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GrayPolicy {
    /// Gray counts as an outage hour (conservative)
    #[default]
    Outage,
    /// Gray counts as power available
    On,
}

impl GrayPolicy {
    /// Whether a cell in `state` belongs inside an outage slot
    pub fn is_off(self, state: CellState) -> bool {
        match state {
            CellState::Outage => true,
            CellState::Gray => self == GrayPolicy::Outage,
            CellState::On => false,
        }
    }
}

fn default_outage_reference() -> Rgb {
    Rgb::new(143, 170, 220)
}

fn default_gray_reference() -> Rgb {
    Rgb::new(224, 224, 224)
}

fn default_outage_tolerance() -> f64 {
    45.0
}

fn default_gray_tolerance() -> f64 {
    35.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Color of an outage cell ("outage blue")
    #[serde(default = "default_outage_reference")]
    pub outage_reference: Rgb,

    /// Color of an ambiguous cell ("grid gray")
    #[serde(default = "default_gray_reference")]
    pub gray_reference: Rgb,

    /// Max distance from `outage_reference` still classified as outage
    #[serde(default = "default_outage_tolerance")]
    pub outage_tolerance: f64,

    /// Max distance from `gray_reference` still classified as gray
    #[serde(default = "default_gray_tolerance")]
    pub gray_tolerance: f64,

    #[serde(default)]
    pub gray_policy: GrayPolicy,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            outage_reference: default_outage_reference(),
            gray_reference: default_gray_reference(),
            outage_tolerance: default_outage_tolerance(),
            gray_tolerance: default_gray_tolerance(),
            gray_policy: GrayPolicy::default(),
        }
    }
}

impl ClassifierConfig {
    /// Classify one sample. Outage is checked before gray.
    pub fn classify(&self, sample: Rgb) -> CellState {
        if sample.distance(self.outage_reference) < self.outage_tolerance {
            CellState::Outage
        } else if sample.distance(self.gray_reference) < self.gray_tolerance {
            CellState::Gray
        } else {
            CellState::On
        }
    }
}
