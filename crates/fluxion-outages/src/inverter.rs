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

//! Outage slots to "power available" slots

use crate::slot::{MINUTES_PER_DAY, Slot};

/// Complement of `slots` over one day.
///
/// Input is expected sorted and non-overlapping; overlapping slots are
/// treated as their union.
pub fn invert(slots: &[Slot]) -> Vec<Slot> {
    let mut inverted = Vec::with_capacity(slots.len() + 1);
    let mut cursor = 0;

    for slot in slots {
        if slot.start_minutes() > cursor {
            inverted.push(Slot::between_minutes(cursor, slot.start_minutes()));
        }
        cursor = cursor.max(slot.end_minutes());
    }

    if cursor < MINUTES_PER_DAY {
        inverted.push(Slot::between_minutes(cursor, MINUTES_PER_DAY));
    }

    inverted
}
