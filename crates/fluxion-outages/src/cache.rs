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

//! Fresh-or-cached schedule access
//!
//! Display clients must always get something renderable. Every request
//! attempts a fresh extraction; a success replaces the cached record, a
//! failure falls back to the last good record, and with nothing cached the
//! result is simply empty. Errors never reach the caller.

use crate::error::{OutageError, Result};
use crate::schedule::{DailySchedule, ScheduleDate};
use crate::slot::Slot;
use crate::store::ScheduleStore;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{error, info, warn};

/// Response header carrying the [`Freshness`] of a served schedule
pub const FRESHNESS_HEADER: &str = "x-schedule-freshness";

/// Source of fresh schedules
#[async_trait]
pub trait ScheduleProvider: Send + Sync {
    async fn fetch_schedule(&self) -> Result<DailySchedule>;

    /// Schedule together with how current the source itself considers it.
    /// Sources that extract on every call are always fresh.
    async fn fetch_with_freshness(&self) -> Result<(DailySchedule, Freshness)> {
        Ok((self.fetch_schedule().await?, Freshness::Fresh))
    }
}

#[async_trait]
impl<T: ScheduleProvider + ?Sized> ScheduleProvider for Box<T> {
    async fn fetch_schedule(&self) -> Result<DailySchedule> {
        (**self).fetch_schedule().await
    }

    async fn fetch_with_freshness(&self) -> Result<(DailySchedule, Freshness)> {
        (**self).fetch_with_freshness().await
    }
}

/// Cache over type-erased provider and store, for long-lived services
pub type DynScheduleCache =
    ResilientScheduleCache<Box<dyn ScheduleProvider>, Box<dyn ScheduleStore>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Freshness {
    /// Extracted by this request
    Fresh,
    /// Last good record, the extraction just failed
    Stale,
    /// Extraction failed and nothing is cached
    Missing,
}

impl fmt::Display for Freshness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Fresh => "fresh",
            Self::Stale => "stale",
            Self::Missing => "missing",
        };
        f.write_str(s)
    }
}

impl FromStr for Freshness {
    type Err = OutageError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fresh" => Ok(Self::Fresh),
            "stale" => Ok(Self::Stale),
            "missing" => Ok(Self::Missing),
            other => Err(OutageError::UnknownFreshness(other.to_owned())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleSnapshot {
    pub schedule: Option<DailySchedule>,
    pub freshness: Freshness,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubqueueLookup {
    pub subqueue: String,
    pub date: Option<ScheduleDate>,
    pub updated_at: Option<DateTime<Utc>>,
    pub freshness: Freshness,
    /// Subqueue is listed in the schedule. Empty slots only mean "no
    /// outages" when this is set.
    pub known: bool,
    pub slots: Vec<Slot>,
}

#[derive(Debug)]
pub struct ResilientScheduleCache<P, S> {
    provider: P,
    store: S,
}

impl<P: ScheduleProvider, S: ScheduleStore> ResilientScheduleCache<P, S> {
    pub fn new(provider: P, store: S) -> Self {
        Self { provider, store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Whole schedule, fresh if possible
    pub async fn snapshot(&self) -> ScheduleSnapshot {
        match self.provider.fetch_with_freshness().await {
            Ok((schedule, upstream)) => {
                if let Err(e) = self.store.save(&schedule) {
                    error!("Failed to persist schedule cache: {e}");
                }
                let freshness = match upstream {
                    Freshness::Fresh => Freshness::Fresh,
                    Freshness::Stale | Freshness::Missing => {
                        info!("Source is serving a cached schedule from {}", schedule.updated_at);
                        Freshness::Stale
                    }
                };
                ScheduleSnapshot {
                    schedule: Some(schedule),
                    freshness,
                }
            }
            Err(e) => {
                warn!("Schedule extraction failed, falling back to cache: {e}");
                match self.store.load() {
                    Ok(Some(schedule)) => {
                        info!("Serving cached schedule from {}", schedule.updated_at);
                        ScheduleSnapshot {
                            schedule: Some(schedule),
                            freshness: Freshness::Stale,
                        }
                    }
                    Ok(None) => {
                        warn!("No cached schedule available");
                        ScheduleSnapshot {
                            schedule: None,
                            freshness: Freshness::Missing,
                        }
                    }
                    Err(e) => {
                        error!("Failed to read schedule cache: {e}");
                        ScheduleSnapshot {
                            schedule: None,
                            freshness: Freshness::Missing,
                        }
                    }
                }
            }
        }
    }

    /// Slots of one subqueue; empty and not `known` when the schedule
    /// does not list it
    pub async fn get(&self, subqueue: &str) -> SubqueueLookup {
        let snapshot = self.snapshot().await;
        let schedule = snapshot.schedule.as_ref();
        let slots = schedule.and_then(|s| s.slots(subqueue));
        if schedule.is_some() && slots.is_none() {
            warn!("Subqueue {subqueue} is not in the schedule");
        }
        SubqueueLookup {
            subqueue: subqueue.to_owned(),
            date: schedule.and_then(|s| s.date),
            updated_at: schedule.map(|s| s.updated_at),
            freshness: snapshot.freshness,
            known: slots.is_some(),
            slots: slots.map(<[Slot]>::to_vec).unwrap_or_default(),
        }
    }
}
