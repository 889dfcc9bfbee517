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

//! FluxION Outages - outage schedule extraction
//!
//! The grid operator publishes the daily outage schedule only as an image.
//! This crate finds that image on the operator's page, samples it on a fixed
//! grid, classifies every cell by color and turns each subqueue row into
//! `HH:MM - HH:MM` slots. Results are cached so display clients keep working
//! while the upstream page is unavailable.

pub mod cache;
pub mod classifier;
pub mod config;
pub mod encoder;
pub mod error;
pub mod extractor;
pub mod http;
pub mod inverter;
pub mod locator;
pub mod remote;
pub mod sampler;
pub mod schedule;
pub mod slot;
pub mod store;

pub use cache::{
    DynScheduleCache, FRESHNESS_HEADER, Freshness, ResilientScheduleCache, ScheduleProvider,
    ScheduleSnapshot, SubqueueLookup,
};
pub use classifier::{CellState, ClassifierConfig, GrayPolicy, Rgb};
pub use config::{CacheSettings, GridConfig, OutagesConfig, SourceSettings};
pub use encoder::{DayStates, encode};
pub use error::{OutageError, Result};
pub use extractor::{ScheduleExtractor, schedule_from_image};
pub use inverter::invert;
pub use locator::{LocatedImage, ScheduleImageLocator};
pub use remote::RemoteScheduleProvider;
pub use sampler::sample;
pub use schedule::{DailySchedule, ScheduleDate};
pub use slot::Slot;
pub use store::{FileScheduleStore, MemoryScheduleStore, ScheduleStore};
