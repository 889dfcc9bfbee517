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

use std::fmt;

use chrono::{DateTime, Utc};
use tracing::debug;

use fluxion_outages::{
    Freshness, ResilientScheduleCache, ScheduleDate, ScheduleProvider, ScheduleStore, Slot,
    SubqueueLookup, invert,
};

use crate::param::WidgetParameter;

/// What the widget shows for one subqueue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetView {
    pub subqueue: String,
    pub date: Option<ScheduleDate>,
    pub updated_at: Option<DateTime<Utc>>,
    pub freshness: Freshness,
    pub known: bool,
    pub inverted: bool,
    pub slots: Vec<Slot>,
}

impl WidgetView {
    /// Inversion is only applied to a subqueue the schedule lists. A listed
    /// subqueue with no outages inverts to the whole day.
    pub fn from_lookup(lookup: SubqueueLookup, invert_requested: bool) -> Self {
        let inverted = invert_requested && lookup.known;
        let slots = if inverted {
            invert(&lookup.slots)
        } else {
            lookup.slots
        };
        Self {
            subqueue: lookup.subqueue,
            date: lookup.date,
            updated_at: lookup.updated_at,
            freshness: lookup.freshness,
            known: lookup.known,
            inverted,
            slots,
        }
    }
}

pub async fn load_view<P: ScheduleProvider, S: ScheduleStore>(
    cache: &ResilientScheduleCache<P, S>,
    param: &WidgetParameter,
) -> WidgetView {
    let lookup = cache.get(&param.subqueue).await;
    debug!(
        subqueue = %lookup.subqueue,
        freshness = %lookup.freshness,
        slots = lookup.slots.len(),
        "Subqueue lookup"
    );
    WidgetView::from_lookup(lookup, param.inverted)
}

impl fmt::Display for WidgetView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.date {
            Some(date) => writeln!(f, "{} на {date}:", self.subqueue)?,
            None => writeln!(f, "{}:", self.subqueue)?,
        }

        match self.freshness {
            Freshness::Fresh => {}
            Freshness::Stale => match self.updated_at {
                Some(at) => writeln!(f, "(cached {})", at.format("%d.%m %H:%M UTC"))?,
                None => writeln!(f, "(cached)")?,
            },
            Freshness::Missing => return writeln!(f, "schedule unavailable"),
        }
        if !self.known {
            return writeln!(f, "not in schedule");
        }

        for slot in &self.slots {
            writeln!(f, "{slot}")?;
        }
        Ok(())
    }
}
