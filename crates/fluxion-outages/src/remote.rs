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

//! Schedules published by a remote outage server

use crate::cache::{FRESHNESS_HEADER, Freshness, ScheduleProvider};
use crate::config::SourceSettings;
use crate::error::{OutageError, Result};
use crate::http;
use crate::schedule::DailySchedule;
use async_trait::async_trait;
use reqwest::header::HeaderValue;
use reqwest::{Client, Url};
use tracing::warn;

/// Reads the schedule record served at `GET <base>/outages`
#[derive(Debug, Clone)]
pub struct RemoteScheduleProvider {
    client: Client,
    url: Url,
}

impl RemoteScheduleProvider {
    pub fn new(base_url: &str, settings: &SourceSettings) -> Result<Self> {
        let mut base = http::parse_url(base_url)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let url = base
            .join("outages")
            .map_err(|e| OutageError::Config(format!("Invalid outage server URL: {e}")))?;
        Ok(Self {
            client: http::build_client(settings)?,
            url,
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl ScheduleProvider for RemoteScheduleProvider {
    async fn fetch_schedule(&self) -> Result<DailySchedule> {
        self.fetch_with_freshness()
            .await
            .map(|(schedule, _)| schedule)
    }

    /// A server that fell back to its own cache says so in the
    /// freshness header; absent or unreadable means fresh.
    async fn fetch_with_freshness(&self) -> Result<(DailySchedule, Freshness)> {
        let (headers, body) = http::get_text_with_headers(&self.client, &self.url).await?;
        let schedule = serde_json::from_str(&body).map_err(|e| {
            OutageError::SourceUnavailable(format!("Invalid schedule from {}: {e}", self.url))
        })?;
        let freshness = match headers.get(FRESHNESS_HEADER).map(HeaderValue::to_str) {
            Some(Ok(value)) => value.parse().unwrap_or_else(|e| {
                warn!("Ignoring freshness header from {}: {e}", self.url);
                Freshness::Fresh
            }),
            Some(Err(_)) | None => Freshness::Fresh,
        };
        Ok((schedule, freshness))
    }
}
