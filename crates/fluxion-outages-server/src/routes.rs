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
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderName, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, warn};

pub use fluxion_outages::FRESHNESS_HEADER;
use fluxion_outages::{DynScheduleCache, Freshness, ScheduleDate, Slot, invert};

#[derive(Clone)]
pub struct OutagesState {
    pub cache: Arc<DynScheduleCache>,
}

impl OutagesState {
    pub fn new(cache: DynScheduleCache) -> Self {
        Self {
            cache: Arc::new(cache),
        }
    }
}

impl fmt::Debug for OutagesState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutagesState").finish_non_exhaustive()
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SubqueueQuery {
    #[serde(default)]
    pub inverted: bool,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubqueueResponse {
    pub subqueue: String,
    pub date: Option<ScheduleDate>,
    pub updated_at: Option<DateTime<Utc>>,
    pub freshness: Freshness,
    /// Subqueue is listed in the served schedule
    pub known: bool,
    pub inverted: bool,
    pub slots: Vec<Slot>,
}

pub fn router(state: OutagesState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/outages", get(schedule_handler))
        .route("/outages/{subqueue}", get(subqueue_handler))
        .with_state(state)
}

fn schedule_headers(freshness: Freshness) -> [(HeaderName, String); 2] {
    [
        (header::CACHE_CONTROL, "no-store".to_owned()),
        (HeaderName::from_static(FRESHNESS_HEADER), freshness.to_string()),
    ]
}

#[expect(clippy::unused_async, reason = "axum handler must be async")]
pub async fn health_handler() -> &'static str {
    "ok"
}

/// Whole schedule record; 503 only when nothing was ever extracted
pub async fn schedule_handler(State(state): State<OutagesState>) -> Response {
    let snapshot = state.cache.snapshot().await;
    let headers = schedule_headers(snapshot.freshness);

    match snapshot.schedule {
        Some(schedule) => (StatusCode::OK, headers, Json(schedule)).into_response(),
        None => {
            warn!("Responding without schedule");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                headers,
                Json(json!({ "error": "No outage schedule available" })),
            )
                .into_response()
        }
    }
}

pub async fn subqueue_handler(
    State(state): State<OutagesState>,
    Path(subqueue): Path<String>,
    Query(query): Query<SubqueueQuery>,
) -> Response {
    let lookup = state.cache.get(&subqueue).await;
    let headers = schedule_headers(lookup.freshness);

    // only a listed subqueue has a meaningful complement
    let inverted = query.inverted && lookup.known;
    let slots = if inverted {
        invert(&lookup.slots)
    } else {
        lookup.slots
    };
    debug!(subqueue = %lookup.subqueue, inverted, slots = slots.len(), "Subqueue lookup");

    let body = SubqueueResponse {
        subqueue: lookup.subqueue,
        date: lookup.date,
        updated_at: lookup.updated_at,
        freshness: lookup.freshness,
        known: lookup.known,
        inverted,
        slots,
    };
    (StatusCode::OK, headers, Json(body)).into_response()
}
