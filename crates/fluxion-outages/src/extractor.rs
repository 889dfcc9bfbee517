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

//! Schedule extraction pipeline
//!
//! page → image URL + date → image bytes → decoded pixels → grid samples →
//! cell states → slots per subqueue.

use crate::cache::ScheduleProvider;
use crate::classifier::{CellState, ClassifierConfig};
use crate::config::{GridConfig, HOURS_PER_DAY, OutagesConfig};
use crate::encoder::{DayStates, encode};
use crate::error::{OutageError, Result};
use crate::http;
use crate::locator::ScheduleImageLocator;
use crate::sampler::sample;
use crate::schedule::{DailySchedule, ScheduleDate};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use image::RgbImage;
use reqwest::Client;
use std::collections::BTreeMap;
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct ScheduleExtractor {
    client: Client,
    locator: ScheduleImageLocator,
    grid: GridConfig,
    classifier: ClassifierConfig,
}

impl ScheduleExtractor {
    pub fn new(config: &OutagesConfig) -> Result<Self> {
        config.validate()?;
        let client = http::build_client(&config.source)?;
        let page_url = http::parse_url(&config.source.page_url)?;
        let locator = ScheduleImageLocator::new(
            client.clone(),
            page_url,
            config.source.image_alt_marker.clone(),
        );
        Ok(Self {
            client,
            locator,
            grid: config.grid.clone(),
            classifier: config.classifier.clone(),
        })
    }

    /// Run the whole pipeline once. The first failure aborts the run.
    pub async fn extract(&self) -> Result<DailySchedule> {
        let located = self.locator.locate().await?;
        let bytes = http::get_bytes(&self.client, &located.image_url).await?;
        let image = decode_image(&bytes)?;
        debug!(
            "Decoded schedule image {}x{} from {}",
            image.width(),
            image.height(),
            located.image_url
        );

        let schedule = schedule_from_image(
            &image,
            &self.grid,
            &self.classifier,
            located.date,
            Utc::now(),
        )?;

        info!(
            "Extracted outage schedule for {} subqueues (date: {})",
            schedule.subqueues.len(),
            schedule
                .date
                .map_or_else(|| "unknown".to_owned(), |d| d.to_string())
        );
        Ok(schedule)
    }
}

#[async_trait]
impl ScheduleProvider for ScheduleExtractor {
    async fn fetch_schedule(&self) -> Result<DailySchedule> {
        self.extract().await
    }
}

pub fn decode_image(bytes: &[u8]) -> Result<RgbImage> {
    image::load_from_memory(bytes)
        .map(|img| img.to_rgb8())
        .map_err(|e| {
            OutageError::SourceUnavailable(format!("Failed to decode schedule image: {e}"))
        })
}

/// Sample, classify and encode an already decoded schedule image
pub fn schedule_from_image(
    image: &RgbImage,
    grid: &GridConfig,
    classifier: &ClassifierConfig,
    date: Option<ScheduleDate>,
    updated_at: DateTime<Utc>,
) -> Result<DailySchedule> {
    let samples = sample(image, grid)?;

    let subqueues = grid
        .subqueues
        .iter()
        .zip(samples)
        .map(|(subqueue, row)| {
            let states: Vec<CellState> =
                row.into_iter().map(|px| classifier.classify(px)).collect();
            let states = <DayStates>::try_from(states).map_err(|cells| {
                OutageError::Config(format!(
                    "Row {subqueue} has {} cells, expected {HOURS_PER_DAY}",
                    cells.len()
                ))
            })?;
            let slots = encode(&states, classifier.gray_policy);
            debug!("Subqueue {subqueue}: {} outage slots", slots.len());
            Ok((subqueue.clone(), slots))
        })
        .collect::<Result<BTreeMap<_, _>>>()?;

    Ok(DailySchedule {
        date,
        updated_at,
        subqueues,
    })
}
