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

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use serde_json::Value;

use fluxion_outages::{
    DailySchedule, DynScheduleCache, MemoryScheduleStore, OutageError, ScheduleProvider,
    ScheduleStore,
};
use fluxion_outages_server::routes::{self, FRESHNESS_HEADER, OutagesState, SubqueueResponse};

// ---------------------------------------------------------------------------
// Test helpers
// ---------------------------------------------------------------------------

struct Upstream(Option<DailySchedule>);

#[async_trait]
impl ScheduleProvider for Upstream {
    async fn fetch_schedule(&self) -> fluxion_outages::Result<DailySchedule> {
        self.0
            .clone()
            .ok_or_else(|| OutageError::SourceUnavailable("page returned 502".to_owned()))
    }
}

fn sample_schedule() -> DailySchedule {
    let slots = |list: &[&str]| list.iter().map(|s| s.parse().unwrap()).collect();
    DailySchedule {
        date: Some("17.10".parse().unwrap()),
        updated_at: Utc.with_ymd_and_hms(2025, 10, 17, 6, 30, 0).unwrap(),
        subqueues: BTreeMap::from([
            ("1.1".to_owned(), slots(&["10:00 - 12:00"])),
            ("3.2".to_owned(), slots(&["00:00 - 04:00", "20:00 - 24:00"])),
            ("6.2".to_owned(), Vec::new()),
        ]),
    }
}

struct TestServer {
    port: u16,
    client: reqwest::Client,
}

impl TestServer {
    async fn start(upstream: Upstream, store: MemoryScheduleStore) -> Self {
        let provider: Box<dyn ScheduleProvider> = Box::new(upstream);
        let store: Box<dyn ScheduleStore> = Box::new(store);
        let app = routes::router(OutagesState::new(DynScheduleCache::new(provider, store)));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let port = listener.local_addr().expect("No local addr").port();

        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Test server error");
        });

        Self {
            port,
            client: reqwest::Client::new(),
        }
    }

    async fn healthy() -> Self {
        Self::start(Upstream(Some(sample_schedule())), MemoryScheduleStore::new()).await
    }

    fn url(&self, path: &str) -> String {
        format!("http://127.0.0.1:{}{path}", self.port)
    }

    async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send request")
    }
}

fn freshness_header(response: &reqwest::Response) -> &str {
    response
        .headers()
        .get(FRESHNESS_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

fn slot_strings(response: &SubqueueResponse) -> Vec<String> {
    response.slots.iter().map(ToString::to_string).collect()
}

// ---------------------------------------------------------------------------
// Full schedule
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_returns_ok() {
    let server = TestServer::healthy().await;
    let response = server.get("/health").await;
    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await.unwrap(), "ok");
}

#[tokio::test]
async fn fresh_schedule_record() {
    let server = TestServer::healthy().await;
    let response = server.get("/outages").await;

    assert_eq!(response.status(), 200);
    assert_eq!(freshness_header(&response), "fresh");
    assert_eq!(response.headers().get("cache-control").unwrap(), "no-store");

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["date"], "17.10");
    assert_eq!(body["updatedAt"], "2025-10-17T06:30:00Z");
    assert_eq!(body["subqueues"]["1.1"][0], "10:00 - 12:00");
    assert_eq!(body["subqueues"]["6.2"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn stale_schedule_when_upstream_fails() {
    let server = TestServer::start(
        Upstream(None),
        MemoryScheduleStore::with_schedule(sample_schedule()),
    )
    .await;
    let response = server.get("/outages").await;

    assert_eq!(response.status(), 200);
    assert_eq!(freshness_header(&response), "stale");
    let body: DailySchedule = response.json().await.unwrap();
    assert_eq!(body, sample_schedule());
}

#[tokio::test]
async fn missing_schedule_is_unavailable() {
    let server = TestServer::start(Upstream(None), MemoryScheduleStore::new()).await;
    let response = server.get("/outages").await;

    assert_eq!(response.status(), 503);
    assert_eq!(freshness_header(&response), "missing");
    assert_eq!(response.headers().get("cache-control").unwrap(), "no-store");
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].is_string());
}

// ---------------------------------------------------------------------------
// Single subqueue
// ---------------------------------------------------------------------------

#[tokio::test]
async fn subqueue_slots() {
    let server = TestServer::healthy().await;
    let response = server.get("/outages/3.2").await;
    assert_eq!(response.status(), 200);

    let body: SubqueueResponse = response.json().await.unwrap();
    assert_eq!(body.subqueue, "3.2");
    assert!(!body.inverted);
    assert_eq!(slot_strings(&body), vec!["00:00 - 04:00", "20:00 - 24:00"]);
    assert_eq!(body.date.unwrap().to_string(), "17.10");
}

#[tokio::test]
async fn subqueue_inverted() {
    let server = TestServer::healthy().await;

    let body: SubqueueResponse = server
        .get("/outages/1.1?inverted=true")
        .await
        .json()
        .await
        .unwrap();
    assert!(body.known);
    assert!(body.inverted);
    assert_eq!(slot_strings(&body), vec!["00:00 - 10:00", "12:00 - 24:00"]);

    // no outages at all means power the whole day
    let body: SubqueueResponse = server
        .get("/outages/6.2?inverted=true")
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(slot_strings(&body), vec!["00:00 - 24:00"]);
}

#[tokio::test]
async fn unknown_subqueue_is_empty() {
    let server = TestServer::healthy().await;
    let response = server.get("/outages/9.9").await;
    assert_eq!(response.status(), 200);

    let body: SubqueueResponse = response.json().await.unwrap();
    assert!(!body.known);
    assert!(body.slots.is_empty());
}

#[tokio::test]
async fn unknown_subqueue_is_never_inverted() {
    let server = TestServer::healthy().await;
    let response = server.get("/outages/9.9?inverted=true").await;
    assert_eq!(freshness_header(&response), "fresh");

    let body: SubqueueResponse = response.json().await.unwrap();
    assert!(!body.known);
    assert!(!body.inverted);
    assert!(body.slots.is_empty());
}

#[tokio::test]
async fn missing_subqueue_is_never_inverted() {
    let server = TestServer::start(Upstream(None), MemoryScheduleStore::new()).await;
    let response = server.get("/outages/1.1?inverted=true").await;

    assert_eq!(response.status(), 200);
    assert_eq!(freshness_header(&response), "missing");
    let body: SubqueueResponse = response.json().await.unwrap();
    assert!(!body.known);
    assert!(!body.inverted);
    assert!(body.slots.is_empty());
    assert!(body.updated_at.is_none());
}
