//! Reading model
//!
//! A slot in the store is `Option<Reading<S>>`: `None` means nothing has
//! arrived yet, and a present reading always carries its arrival timestamp.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Status label stored when a turbidity sender omits one
pub const UNKNOWN_STATUS: &str = "Unknown";

/// Placeholder status used by senders that have no classification yet
pub const NO_DATA_STATUS: &str = "No data";

/// Measured quantities tracked by the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quantity {
    Ph,
    Turbidity,
}

impl Quantity {
    /// JSON field carrying the value in submissions and views
    pub fn field(self) -> &'static str {
        match self {
            Quantity::Ph => "ph",
            Quantity::Turbidity => "turbidity",
        }
    }

    /// Decimal places kept when a value is accepted
    pub fn precision(self) -> u32 {
        match self {
            Quantity::Ph => 2,
            Quantity::Turbidity => 1,
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            Quantity::Ph => "pH",
            Quantity::Turbidity => "NTU",
        }
    }

    /// Caller-facing rejection message
    pub fn invalid_message(self) -> &'static str {
        match self {
            Quantity::Ph => "Invalid pH value",
            Quantity::Turbidity => "Invalid turbidity value",
        }
    }

    /// Caller-facing acceptance message
    pub fn accepted_message(self) -> &'static str {
        match self {
            Quantity::Ph => "pH data received",
            Quantity::Turbidity => "Turbidity data received",
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quantity::Ph => f.write_str("pH"),
            Quantity::Turbidity => f.write_str("Turbidity"),
        }
    }
}

/// Latest accepted sample plus its metadata
#[derive(Debug, Clone, PartialEq)]
pub struct Reading<S> {
    pub sample: S,
    /// Sender-supplied timestamp, passed through untouched
    pub device_ts: Option<Value>,
    /// Server-assigned instant of acceptance
    pub arrived_at: DateTime<Utc>,
}

impl<S> Reading<S> {
    pub fn new(sample: S, device_ts: Option<Value>, arrived_at: DateTime<Utc>) -> Self {
        Self {
            sample,
            device_ts,
            arrived_at,
        }
    }
}

/// pH sample, already rounded to two decimals
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhSample {
    pub ph: f64,
}

/// Turbidity sample, already rounded to one decimal
#[derive(Debug, Clone, PartialEq)]
pub struct TurbiditySample {
    pub ntu: f64,
    pub status: String,
    /// Sender's own safety verdict, overrides the local NTU buckets
    pub safe: Option<bool>,
    /// Name of the standard the sender classified against
    pub standard: Option<String>,
    pub message: Option<String>,
}

impl TurbiditySample {
    pub fn new(ntu: f64) -> Self {
        Self {
            ntu,
            status: UNKNOWN_STATUS.to_string(),
            safe: None,
            standard: None,
            message: None,
        }
    }
}

/// True for status strings senders use when they have nothing to say
pub fn is_placeholder_status(status: &str) -> bool {
    status == NO_DATA_STATUS || status == UNKNOWN_STATUS
}
