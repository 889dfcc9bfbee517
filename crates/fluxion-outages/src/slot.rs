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

//! Time slots within a single day

use crate::error::{OutageError, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

pub const MINUTES_PER_DAY: u16 = 24 * 60;

/// Half-open interval `[start, end)` in minutes since midnight.
///
/// Serialized as `"HH:MM - HH:MM"`; the end of the day is written `24:00`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Slot {
    start: u16,
    end: u16,
}

impl Slot {
    pub fn new(start: u16, end: u16) -> Result<Self> {
        if start >= end || end > MINUTES_PER_DAY {
            return Err(OutageError::InvalidSlot(format!(
                "{} - {}",
                format_minutes(start),
                format_minutes(end)
            )));
        }
        Ok(Self { start, end })
    }

    pub fn from_hours(start: u8, end: u8) -> Result<Self> {
        Self::new(u16::from(start) * 60, u16::from(end) * 60)
    }

    /// Caller guarantees `start < end <= 24`.
    pub(crate) fn between_hours(start: usize, end: usize) -> Self {
        debug_assert!(start < end && end <= 24);
        Self {
            start: (start * 60) as u16,
            end: (end * 60) as u16,
        }
    }

    pub(crate) fn between_minutes(start: u16, end: u16) -> Self {
        debug_assert!(start < end && end <= MINUTES_PER_DAY);
        Self { start, end }
    }

    pub fn start_minutes(&self) -> u16 {
        self.start
    }

    pub fn end_minutes(&self) -> u16 {
        self.end
    }

    pub fn duration_minutes(&self) -> u16 {
        self.end - self.start
    }
}

/// First pair of neighbours that is out of order, overlaps or touches.
/// A subqueue schedule has none.
pub fn find_conflict(slots: &[Slot]) -> Option<(Slot, Slot)> {
    slots
        .windows(2)
        .find(|pair| pair[0].end >= pair[1].start)
        .map(|pair| (pair[0], pair[1]))
}

fn format_minutes(minutes: u16) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

fn parse_minutes(s: &str) -> Option<u16> {
    let (h, m) = s.trim().split_once(':')?;
    let h: u16 = h.parse().ok()?;
    let m: u16 = m.parse().ok()?;
    if m >= 60 || h > 24 || (h == 24 && m != 0) {
        return None;
    }
    Some(h * 60 + m)
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {}",
            format_minutes(self.start),
            format_minutes(self.end)
        )
    }
}

impl FromStr for Slot {
    type Err = OutageError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || OutageError::InvalidSlot(s.to_owned());
        let (start, end) = s.split_once('-').ok_or_else(invalid)?;
        let start = parse_minutes(start).ok_or_else(invalid)?;
        let end = parse_minutes(end).ok_or_else(invalid)?;
        Self::new(start, end).map_err(|_| invalid())
    }
}

impl Serialize for Slot {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Slot {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
