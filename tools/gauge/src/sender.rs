//! Mock device sender
//!
//! Posts plausible readings on a fixed period, either split across the
//! per-quantity endpoints or pH-only to the legacy `/api/data` path.

use crate::client::GaugeClient;
use chrono::{SecondsFormat, Utc};
use clearflow_quality::coerce::round_to;
use rand::Rng;
use serde::Serialize;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// pH range of generated readings
pub const PH_RANGE: (f64, f64) = (6.5, 8.5);
/// Turbidity range of generated readings, in NTU
pub const TURBIDITY_RANGE: (f64, f64) = (1.0, 9.0);

#[derive(Debug, Clone, PartialEq)]
pub struct MockReading {
    pub ph: f64,
    pub turbidity: f64,
    pub ts: String,
}

impl MockReading {
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let ph = rng.gen_range(PH_RANGE.0..=PH_RANGE.1);
        let turbidity = rng.gen_range(TURBIDITY_RANGE.0..=TURBIDITY_RANGE.1);
        Self {
            ph: round_to(ph, 2),
            turbidity: round_to(turbidity, 2),
            ts: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }

    fn ph_body(&self) -> PhBody<'_> {
        PhBody {
            ph: self.ph,
            ts: &self.ts,
        }
    }

    fn turbidity_body(&self) -> TurbidityBody<'_> {
        TurbidityBody {
            turbidity: self.turbidity,
            ts: &self.ts,
        }
    }
}

#[derive(Debug, Serialize)]
struct PhBody<'a> {
    ph: f64,
    ts: &'a str,
}

#[derive(Debug, Serialize)]
struct TurbidityBody<'a> {
    turbidity: f64,
    ts: &'a str,
}

/// Where readings are posted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendMode {
    /// `/api/ph` and `/api/turbidity`
    Split,
    /// pH only, to `/api/data`
    Legacy,
}

/// Post one reading
pub async fn send_reading(
    client: &GaugeClient,
    reading: &MockReading,
    mode: SendMode,
) -> errors::ClearFlowResult<()> {
    match mode {
        SendMode::Split => {
            client.post("/api/ph", &reading.ph_body()).await?;
            client
                .post("/api/turbidity", &reading.turbidity_body())
                .await?;
        },
        SendMode::Legacy => {
            client.post("/api/data", &reading.ph_body()).await?;
        },
    }
    Ok(())
}

/// Send `count` readings (forever when `None`) until cancelled
///
/// Returns the number of readings delivered.
pub async fn run_sender(
    client: &GaugeClient,
    mode: SendMode,
    period: Duration,
    count: Option<u64>,
    token: CancellationToken,
) -> u64 {
    let mut interval = tokio::time::interval(period);
    let mut attempts = 0u64;
    let mut delivered = 0u64;

    info!("Starting mock sender -> {} every {}ms", client.base_url(), period.as_millis());

    while count.map_or(true, |limit| attempts < limit) {
        tokio::select! {
            _ = interval.tick() => {
                attempts += 1;
                let reading = MockReading::random(&mut rand::thread_rng());
                match send_reading(client, &reading, mode).await {
                    Ok(()) => {
                        delivered += 1;
                        match mode {
                            SendMode::Split => info!("Sent mock pH {:.2} | NTU {:.2}", reading.ph, reading.turbidity),
                            SendMode::Legacy => info!("Sent mock pH {:.2}", reading.ph),
                        }
                    },
                    Err(e) => error!("Send failed: {}", e),
                }
            }
            _ = token.cancelled() => break,
        }
    }

    delivered
}
