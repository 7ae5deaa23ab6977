//! gauge against an in-process wqsrv

#![allow(clippy::disallowed_methods)] // Integration test - unwrap is acceptable

use clearflow_quality::{OverallStatus, PhCategory};
use gauge::sender::{run_sender, send_reading, MockReading, SendMode};
use gauge::{poll_once, GaugeClient, Poller};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use wqsrv::{create_router, AppState};

async fn spawn_server() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = create_router(AppState::new("wqsrv"));
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

#[tokio::test]
async fn test_empty_service_is_waiting() {
    let client = GaugeClient::new(spawn_server().await).unwrap();
    let assessment = poll_once(&client).await.unwrap();
    assert_eq!(assessment.overall, OverallStatus::Waiting);
    assert!(assessment.ph_value.is_none());
    assert!(assessment.timestamp.is_some());
}

#[tokio::test]
async fn test_split_send_then_status() {
    let client = GaugeClient::new(spawn_server().await).unwrap();
    let reading = MockReading {
        ph: 7.25,
        turbidity: 3.0,
        ts: "2025-06-01T09:30:00.000Z".into(),
    };
    send_reading(&client, &reading, SendMode::Split).await.unwrap();

    let assessment = poll_once(&client).await.unwrap();
    assert_eq!(assessment.overall, OverallStatus::Optimal);
    assert_eq!(assessment.ph_value, Some(7.25));
    assert_eq!(assessment.turbidity_value, Some(3.0));
}

#[tokio::test]
async fn test_legacy_send_only_updates_ph() {
    let client = GaugeClient::new(spawn_server().await).unwrap();
    let reading = MockReading {
        ph: 5.5,
        turbidity: 3.0,
        ts: "2025-06-01T09:30:00.000Z".into(),
    };
    send_reading(&client, &reading, SendMode::Legacy).await.unwrap();

    let assessment = poll_once(&client).await.unwrap();
    assert_eq!(assessment.ph.category, PhCategory::TooAcidic);
    assert!(assessment.turbidity_value.is_none());
    assert_eq!(assessment.overall, OverallStatus::Waiting);
}

#[tokio::test]
async fn test_sender_and_poller_loops() {
    let client = GaugeClient::new(spawn_server().await).unwrap();

    let delivered = run_sender(
        &client,
        SendMode::Split,
        Duration::from_millis(5),
        Some(3),
        CancellationToken::new(),
    )
    .await;
    assert_eq!(delivered, 3);

    let token = CancellationToken::new();
    let canceller = token.clone();
    let mut seen = Vec::new();
    let poller = Poller::new(client, Duration::from_millis(10));
    let stats = poller
        .run(token, |assessment| {
            seen.push(assessment.overall);
            if seen.len() == 2 {
                canceller.cancel();
            }
        })
        .await;

    assert!(stats.succeeded >= 2);
    assert!(seen.len() >= 2);
    assert!(seen.iter().all(|s| *s == OverallStatus::Optimal));
}
