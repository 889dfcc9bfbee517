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

//! Extracted schedule records

use crate::error::{OutageError, Result};
use crate::slot::{self, Slot};
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

static ALT_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{2})\.(\d{2})\.(\d{4}|\d{2})").expect("valid date pattern")
});

/// Day the schedule applies to, as printed on the source image (`DD.MM`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleDate {
    pub day: u8,
    pub month: u8,
}

impl ScheduleDate {
    pub fn new(day: u8, month: u8) -> Result<Self> {
        if !(1..=31).contains(&day) || !(1..=12).contains(&month) {
            return Err(OutageError::MalformedDate(format!("{day:02}.{month:02}")));
        }
        Ok(Self { day, month })
    }

    /// Find a `DD.MM.YY` / `DD.MM.YYYY` date inside image alt text.
    /// The year is only used to anchor the match.
    pub fn from_alt_text(alt: &str) -> Result<Self> {
        let caps = ALT_DATE
            .captures(alt)
            .ok_or_else(|| OutageError::MalformedDate(format!("no date in {alt:?}")))?;

        let day: u8 = caps[1]
            .parse()
            .map_err(|_| OutageError::MalformedDate(caps[0].to_owned()))?;
        let month: u8 = caps[2]
            .parse()
            .map_err(|_| OutageError::MalformedDate(caps[0].to_owned()))?;

        Self::new(day, month).map_err(|_| OutageError::MalformedDate(caps[0].to_owned()))
    }
}

impl fmt::Display for ScheduleDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}.{:02}", self.day, self.month)
    }
}

impl FromStr for ScheduleDate {
    type Err = OutageError;

    fn from_str(s: &str) -> Result<Self> {
        let malformed = || OutageError::MalformedDate(s.to_owned());
        let (day, month) = s.trim().split_once('.').ok_or_else(malformed)?;
        let day = day.parse().map_err(|_| malformed())?;
        let month = month.parse().map_err(|_| malformed())?;
        Self::new(day, month).map_err(|_| malformed())
    }
}

impl Serialize for ScheduleDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ScheduleDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// One successful extraction: every subqueue's outage slots for one day.
///
/// This is also the wire format served to display clients and the record
/// kept in the schedule cache.
///
/// Deserialization rejects subqueues whose slots are out of order, overlap
/// or touch, so records read back from a cache file or a remote server have
/// the same shape as freshly encoded ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "ScheduleRecord")]
pub struct DailySchedule {
    pub date: Option<ScheduleDate>,
    pub updated_at: DateTime<Utc>,
    pub subqueues: BTreeMap<String, Vec<Slot>>,
}

/// Unchecked wire form of [`DailySchedule`]
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScheduleRecord {
    date: Option<ScheduleDate>,
    updated_at: DateTime<Utc>,
    subqueues: BTreeMap<String, Vec<Slot>>,
}

impl TryFrom<ScheduleRecord> for DailySchedule {
    type Error = OutageError;

    fn try_from(record: ScheduleRecord) -> Result<Self> {
        let schedule = Self {
            date: record.date,
            updated_at: record.updated_at,
            subqueues: record.subqueues,
        };
        schedule.validate()?;
        Ok(schedule)
    }
}

impl DailySchedule {
    pub fn validate(&self) -> Result<()> {
        for (subqueue, slots) in &self.subqueues {
            if let Some((first, second)) = slot::find_conflict(slots) {
                return Err(OutageError::InvalidSlot(format!(
                    "subqueue {subqueue}: {first} and {second} overlap or are out of order"
                )));
            }
        }
        Ok(())
    }

    pub fn slots(&self, subqueue: &str) -> Option<&[Slot]> {
        self.subqueues.get(subqueue).map(Vec::as_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_date_from_alt() {
        let date = ScheduleDate::from_alt_text("ГПВ на 17.10.25").unwrap();
        assert_eq!(date.to_string(), "17.10");

        let date = ScheduleDate::from_alt_text("графік ГПВ 03.01.2026 оновлено").unwrap();
        assert_eq!(date, ScheduleDate::new(3, 1).unwrap());
    }

    #[test]
    fn test_date_from_alt_missing_or_invalid() {
        assert!(matches!(
            ScheduleDate::from_alt_text("ГПВ"),
            Err(OutageError::MalformedDate(_))
        ));
        assert!(matches!(
            ScheduleDate::from_alt_text("ГПВ 45.13.25"),
            Err(OutageError::MalformedDate(_))
        ));
    }

    #[test]
    fn test_date_string_roundtrip() {
        let date: ScheduleDate = "07.11".parse().unwrap();
        assert_eq!(date.day, 7);
        assert_eq!(date.month, 11);
        assert!("7-11".parse::<ScheduleDate>().is_err());
        assert!("00.11".parse::<ScheduleDate>().is_err());
    }

    #[test]
    fn test_wire_format() {
        let schedule = DailySchedule {
            date: Some(ScheduleDate::new(17, 10).unwrap()),
            updated_at: Utc.with_ymd_and_hms(2025, 10, 17, 6, 30, 0).unwrap(),
            subqueues: BTreeMap::from([(
                "1.1".to_owned(),
                vec!["10:00 - 12:00".parse().unwrap()],
            )]),
        };

        let value = serde_json::to_value(&schedule).unwrap();
        assert_eq!(value["date"], "17.10");
        assert_eq!(value["updatedAt"], "2025-10-17T06:30:00Z");
        assert_eq!(value["subqueues"]["1.1"][0], "10:00 - 12:00");

        let back: DailySchedule = serde_json::from_value(value).unwrap();
        assert_eq!(back, schedule);
    }

    #[test]
    fn test_overlapping_slots_rejected() {
        let result = serde_json::from_str::<DailySchedule>(
            r#"{"date": "17.10", "updatedAt": "2025-10-17T06:30:00Z",
                "subqueues": {"1.1": ["10:00 - 12:00", "11:00 - 13:00"]}}"#,
        );
        let err = result.unwrap_err().to_string();
        assert!(err.contains("subqueue 1.1"), "{err}");
    }

    #[test]
    fn test_null_date_accepted() {
        let schedule: DailySchedule = serde_json::from_str(
            r#"{"date": null, "updatedAt": "2025-10-17T06:30:00Z", "subqueues": {"3.2": []}}"#,
        )
        .unwrap();
        assert!(schedule.date.is_none());
        assert_eq!(schedule.slots("3.2"), Some(&[][..]));
        assert_eq!(schedule.slots("9.9"), None);
    }
}
