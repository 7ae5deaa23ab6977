//! Client-side intake of the combined snapshot
//!
//! A polled snapshot is decoded without trusting its shape, then passed
//! through [`FreshReadings::admit`]. A quantity counts as "arrived" only when
//! the server stamped it with an arrival timestamp and its value is a finite
//! number. Zero is a valid reading; a missing timestamp is not.

use crate::classify::TurbidityMeta;
use crate::coerce::coerce_finite;
use crate::reading::{PhSample, Reading, TurbiditySample};
use crate::snapshot::format_timestamp;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

/// `{ ph, ts, timestamp }` as received; every field may be missing or null
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PhWire {
    pub ph: Option<Value>,
    pub ts: Option<Value>,
    pub timestamp: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TurbidityWire {
    pub turbidity: Option<Value>,
    pub status: Option<Value>,
    pub safe: Option<Value>,
    pub standard: Option<Value>,
    pub message: Option<Value>,
    pub ts: Option<Value>,
    pub timestamp: Option<Value>,
}

/// Combined snapshot as received from `GET /api/water-quality`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WaterQualityWire {
    pub ph: Option<PhWire>,
    pub turbidity: Option<TurbidityWire>,
    pub timestamp: Option<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FreshPh {
    pub value: f64,
    pub ts: Option<Value>,
    pub arrived_at: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FreshTurbidity {
    pub value: f64,
    pub meta: TurbidityMeta,
    pub ts: Option<Value>,
    pub arrived_at: String,
}

/// Readings that passed the gate, ready for classification
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FreshReadings {
    pub ph: Option<FreshPh>,
    pub turbidity: Option<FreshTurbidity>,
    pub timestamp: Option<String>,
}

fn non_empty_text(raw: Option<&Value>) -> Option<String> {
    match raw? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn text(raw: Option<&Value>) -> Option<String> {
    raw.and_then(Value::as_str).map(str::to_string)
}

impl FreshReadings {
    /// Apply the gate to a decoded snapshot
    pub fn admit(wire: &WaterQualityWire) -> Self {
        let ph = wire.ph.as_ref().and_then(|p| {
            let arrived_at = non_empty_text(p.timestamp.as_ref())?;
            let value = coerce_finite(p.ph.as_ref()?)?;
            Some(FreshPh {
                value,
                ts: p.ts.clone(),
                arrived_at,
            })
        });

        let turbidity = wire.turbidity.as_ref().and_then(|t| {
            let arrived_at = non_empty_text(t.timestamp.as_ref())?;
            let value = coerce_finite(t.turbidity.as_ref()?)?;
            Some(FreshTurbidity {
                value,
                meta: TurbidityMeta {
                    status: text(t.status.as_ref()),
                    message: text(t.message.as_ref()),
                    safe: t.safe.as_ref().and_then(Value::as_bool),
                    standard: text(t.standard.as_ref()),
                },
                ts: t.ts.clone(),
                arrived_at,
            })
        });

        let timestamp = non_empty_text(wire.timestamp.as_ref())
            .or_else(|| ph.as_ref().map(|p| p.arrived_at.clone()))
            .or_else(|| turbidity.as_ref().map(|t| t.arrived_at.clone()));

        Self {
            ph,
            turbidity,
            timestamp,
        }
    }

    /// Build directly from store contents; the store is authoritative so
    /// nothing is filtered
    pub fn from_readings(
        ph: Option<&Reading<PhSample>>,
        turbidity: Option<&Reading<TurbiditySample>>,
        generated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            ph: ph.map(|r| FreshPh {
                value: r.sample.ph,
                ts: r.device_ts.clone(),
                arrived_at: format_timestamp(&r.arrived_at),
            }),
            turbidity: turbidity.map(|r| FreshTurbidity {
                value: r.sample.ntu,
                meta: TurbidityMeta {
                    status: Some(r.sample.status.clone()),
                    message: r.sample.message.clone(),
                    safe: r.sample.safe,
                    standard: r.sample.standard.clone(),
                },
                ts: r.device_ts.clone(),
                arrived_at: format_timestamp(&r.arrived_at),
            }),
            timestamp: Some(format_timestamp(&generated_at)),
        }
    }

    pub fn ph_value(&self) -> Option<f64> {
        self.ph.as_ref().map(|p| p.value)
    }

    pub fn turbidity_value(&self) -> Option<f64> {
        self.turbidity.as_ref().map(|t| t.value)
    }

    pub fn turbidity_meta(&self) -> TurbidityMeta {
        self.turbidity
            .as_ref()
            .map(|t| t.meta.clone())
            .unwrap_or_default()
    }
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)] // Tests can use unwrap for clarity
mod tests {
    use super::*;
    use serde_json::json;

    fn wire(value: Value) -> WaterQualityWire {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_empty_store_snapshot_admits_nothing() {
        let fresh = FreshReadings::admit(&wire(json!({
            "ph": {"ph": null, "ts": null, "timestamp": null},
            "turbidity": {"turbidity": null, "status": null, "ts": null, "timestamp": null},
            "timestamp": "2025-01-01T00:00:00.000Z"
        })));
        assert!(fresh.ph.is_none());
        assert!(fresh.turbidity.is_none());
        assert_eq!(fresh.timestamp.as_deref(), Some("2025-01-01T00:00:00.000Z"));
    }

    #[test]
    fn test_zero_without_timestamp_is_not_data() {
        let fresh = FreshReadings::admit(&wire(json!({
            "ph": {"ph": 0, "timestamp": ""},
            "turbidity": {"turbidity": 0}
        })));
        assert!(fresh.ph.is_none());
        assert!(fresh.turbidity.is_none());
        assert!(fresh.timestamp.is_none());
    }

    #[test]
    fn test_zero_with_timestamp_is_data() {
        let fresh = FreshReadings::admit(&wire(json!({
            "turbidity": {"turbidity": 0, "timestamp": "2025-01-01T00:00:00.000Z"}
        })));
        assert_eq!(fresh.turbidity_value(), Some(0.0));
    }

    #[test]
    fn test_numeric_strings_are_coerced() {
        let fresh = FreshReadings::admit(&wire(json!({
            "ph": {"ph": "7.00", "timestamp": "t1"}
        })));
        assert_eq!(fresh.ph_value(), Some(7.0));
    }

    #[test]
    fn test_non_numeric_value_is_dropped() {
        let fresh = FreshReadings::admit(&wire(json!({
            "ph": {"ph": "abc", "timestamp": "t1"}
        })));
        assert!(fresh.ph.is_none());
    }

    #[test]
    fn test_metadata_travels_with_fresh_turbidity_only() {
        let fresh = FreshReadings::admit(&wire(json!({
            "turbidity": {
                "turbidity": 12.5,
                "status": "Acceptable",
                "safe": true,
                "standard": "WHO",
                "timestamp": "t2"
            }
        })));
        let meta = fresh.turbidity_meta();
        assert_eq!(meta.status.as_deref(), Some("Acceptable"));
        assert_eq!(meta.safe, Some(true));
        assert_eq!(meta.standard.as_deref(), Some("WHO"));

        let stale = FreshReadings::admit(&wire(json!({
            "turbidity": {"turbidity": 12.5, "status": "Acceptable", "safe": true}
        })));
        assert_eq!(stale.turbidity_meta(), TurbidityMeta::default());
    }

    #[test]
    fn test_snapshot_timestamp_falls_back_to_ph_then_turbidity() {
        let fresh = FreshReadings::admit(&wire(json!({
            "ph": {"ph": 7, "timestamp": "ph-time"},
            "turbidity": {"turbidity": 3, "timestamp": "turbidity-time"}
        })));
        assert_eq!(fresh.timestamp.as_deref(), Some("ph-time"));

        let fresh = FreshReadings::admit(&wire(json!({
            "turbidity": {"turbidity": 3, "timestamp": "turbidity-time"}
        })));
        assert_eq!(fresh.timestamp.as_deref(), Some("turbidity-time"));
    }
}
