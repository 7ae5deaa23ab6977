//! Cancellable polling of the combined snapshot
//!
//! Every tick fetches `/api/water-quality`, passes it through the freshness
//! gate and classifies it locally. A failed poll is logged and the loop
//! simply waits for the next tick.

use crate::client::GaugeClient;
use clearflow_quality::{Assessment, FreshReadings};
use errors::ClearFlowResult;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Fetch, gate and classify one snapshot
pub async fn poll_once(client: &GaugeClient) -> ClearFlowResult<Assessment> {
    let wire = client.fetch_snapshot().await?;
    let fresh = FreshReadings::admit(&wire);
    Ok(Assessment::from_fresh(&fresh))
}

/// Outcome counters of a finished poll loop
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollStats {
    pub succeeded: u64,
    pub failed: u64,
}

pub struct Poller {
    client: GaugeClient,
    interval: Duration,
}

impl Poller {
    pub fn new(client: GaugeClient, interval: Duration) -> Self {
        Self { client, interval }
    }

    /// Poll until `token` is cancelled, handing every assessment to `on_update`
    pub async fn run<F>(&self, token: CancellationToken, mut on_update: F) -> PollStats
    where
        F: FnMut(&Assessment),
    {
        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut stats = PollStats::default();

        info!(
            "Polling {} every {}ms",
            self.client.base_url(),
            self.interval.as_millis()
        );

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    match poll_once(&self.client).await {
                        Ok(assessment) => {
                            stats.succeeded += 1;
                            on_update(&assessment);
                        },
                        Err(e) => {
                            stats.failed += 1;
                            warn!("Poll failed: {}", e);
                        },
                    }
                }
                _ = token.cancelled() => {
                    debug!("Poller stopping");
                    break;
                }
            }
        }

        stats
    }
}
