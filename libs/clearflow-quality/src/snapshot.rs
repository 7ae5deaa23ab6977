//! Wire views of the store served by the query gateway
//!
//! Absent readings serialize every field as `null`; nothing is ever filled
//! with a numeric default.

use crate::reading::{PhSample, Reading, TurbiditySample};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};
use serde_json::Value;

/// RFC 3339 with millisecond precision and a `Z` suffix
pub fn format_timestamp(instant: &DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn serialize_instant<S: Serializer>(instant: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&format_timestamp(instant))
}

fn serialize_opt_instant<S: Serializer>(
    instant: &Option<DateTime<Utc>>,
    s: S,
) -> Result<S::Ok, S::Error> {
    match instant {
        Some(instant) => serialize_instant(instant, s),
        None => s.serialize_none(),
    }
}

/// `{ ph, ts, timestamp }`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhReadingView {
    pub ph: Option<f64>,
    pub ts: Option<Value>,
    #[serde(serialize_with = "serialize_opt_instant")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl From<Option<&Reading<PhSample>>> for PhReadingView {
    fn from(reading: Option<&Reading<PhSample>>) -> Self {
        match reading {
            Some(r) => Self {
                ph: Some(r.sample.ph),
                ts: r.device_ts.clone(),
                timestamp: Some(r.arrived_at),
            },
            None => Self {
                ph: None,
                ts: None,
                timestamp: None,
            },
        }
    }
}

/// `{ turbidity, status, ts, timestamp }` plus sender metadata when present
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TurbidityReadingView {
    pub turbidity: Option<f64>,
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub safe: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub standard: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub ts: Option<Value>,
    #[serde(serialize_with = "serialize_opt_instant")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl From<Option<&Reading<TurbiditySample>>> for TurbidityReadingView {
    fn from(reading: Option<&Reading<TurbiditySample>>) -> Self {
        match reading {
            Some(r) => Self {
                turbidity: Some(r.sample.ntu),
                status: Some(r.sample.status.clone()),
                safe: r.sample.safe,
                standard: r.sample.standard.clone(),
                message: r.sample.message.clone(),
                ts: r.device_ts.clone(),
                timestamp: Some(r.arrived_at),
            },
            None => Self {
                turbidity: None,
                status: None,
                safe: None,
                standard: None,
                message: None,
                ts: None,
                timestamp: None,
            },
        }
    }
}

/// Combined view with its own generation time
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WaterQualitySnapshot {
    pub ph: PhReadingView,
    pub turbidity: TurbidityReadingView,
    #[serde(serialize_with = "serialize_instant")]
    pub timestamp: DateTime<Utc>,
}
