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

//! Run-length encoding of hourly cell states into outage slots

use crate::classifier::{CellState, GrayPolicy};
use crate::config::HOURS_PER_DAY;
use crate::slot::Slot;

/// One cell state per hour of the day
pub type DayStates = [CellState; HOURS_PER_DAY as usize];

/// Compress one day of hourly states into chronological outage slots.
///
/// Consecutive off hours always end up in a single slot. A run that is still
/// open at the end of the day is closed at `24:00`.
pub fn encode(states: &DayStates, policy: GrayPolicy) -> Vec<Slot> {
    let mut slots = Vec::new();
    let mut run_start: Option<usize> = None;

    for (hour, &state) in states.iter().enumerate() {
        let off = policy.is_off(state);
        match (off, run_start) {
            (true, None) => run_start = Some(hour),
            (false, Some(start)) => {
                slots.push(Slot::between_hours(start, hour));
                run_start = None;
            }
            _ => {}
        }
    }

    if let Some(start) = run_start {
        slots.push(Slot::between_hours(start, states.len()));
    }

    slots
}
