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

//! Upstream HTTP access
//!
//! Every failure here (connect, timeout, non-2xx, unreadable body) is
//! reported as [`OutageError::SourceUnavailable`].

use crate::config::SourceSettings;
use crate::error::{OutageError, Result};
use reqwest::header::HeaderMap;
use reqwest::{Client, Response, Url};
use std::time::Duration;

pub fn build_client(settings: &SourceSettings) -> Result<Client> {
    Client::builder()
        .user_agent(settings.user_agent.as_str())
        .timeout(Duration::from_secs(settings.timeout_secs))
        .build()
        .map_err(|e| {
            OutageError::SourceUnavailable(format!("Failed to build HTTP client: {e}"))
        })
}

async fn get(client: &Client, url: &Url) -> Result<Response> {
    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|e| OutageError::SourceUnavailable(format!("Request to {url} failed: {e}")))?;

    if !response.status().is_success() {
        return Err(OutageError::SourceUnavailable(format!(
            "{url} returned status {}",
            response.status()
        )));
    }

    Ok(response)
}

pub async fn get_text(client: &Client, url: &Url) -> Result<String> {
    get_text_with_headers(client, url)
        .await
        .map(|(_, body)| body)
}

/// Body along with the response headers
pub async fn get_text_with_headers(client: &Client, url: &Url) -> Result<(HeaderMap, String)> {
    let response = get(client, url).await?;
    let headers = response.headers().clone();
    let body = response
        .text()
        .await
        .map_err(|e| OutageError::SourceUnavailable(format!("Failed to read {url}: {e}")))?;
    Ok((headers, body))
}

pub async fn get_bytes(client: &Client, url: &Url) -> Result<Vec<u8>> {
    let bytes = get(client, url)
        .await?
        .bytes()
        .await
        .map_err(|e| {
            OutageError::SourceUnavailable(format!("Failed to download {url}: {e}"))
        })?;
    Ok(bytes.to_vec())
}

pub fn parse_url(raw: &str) -> Result<Url> {
    Url::parse(raw).map_err(|e| OutageError::Config(format!("Invalid URL {raw:?}: {e}")))
}
