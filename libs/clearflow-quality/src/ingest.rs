//! Ingestion gateway
//!
//! Validates raw submissions, rounds accepted values to their display
//! precision and writes them into the store together with a fresh arrival
//! timestamp. A rejected submission never touches the store.

use crate::clock::{Clock, SystemClock};
use crate::coerce::{coerce_finite, round_to};
use crate::reading::{PhSample, Quantity, Reading, TurbiditySample, UNKNOWN_STATUS};
use crate::store::ReadingStore;
use errors::{ClearFlowError, ClearFlowResult};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

/// Raw pH submission, as sent by devices on `/api/ph` and `/api/data`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PhSubmission {
    #[serde(default)]
    pub ph: Option<Value>,
    #[serde(default)]
    pub ts: Option<Value>,
}

/// Raw turbidity submission
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TurbiditySubmission {
    #[serde(default)]
    pub turbidity: Option<Value>,
    #[serde(default)]
    pub status: Option<Value>,
    #[serde(default)]
    pub safe: Option<Value>,
    #[serde(default)]
    pub standard: Option<Value>,
    #[serde(default)]
    pub message: Option<Value>,
    #[serde(default)]
    pub ts: Option<Value>,
}

/// Decode a request body without ever failing
///
/// Malformed JSON or a non-object body yields the empty submission, which the
/// validators then reject as "value missing".
pub fn decode_lenient<T: DeserializeOwned + Default>(body: &[u8]) -> T {
    if body.is_empty() {
        return T::default();
    }
    serde_json::from_slice::<Value>(body)
        .ok()
        .filter(Value::is_object)
        .and_then(|value| serde_json::from_value(value).ok())
        .unwrap_or_default()
}

fn finite_value(quantity: Quantity, raw: Option<&Value>) -> ClearFlowResult<f64> {
    let raw = raw.ok_or_else(|| {
        ClearFlowError::invalid_reading(
            quantity.field(),
            quantity.invalid_message(),
            "value is missing",
        )
    })?;
    coerce_finite(raw).ok_or_else(|| {
        ClearFlowError::invalid_reading(
            quantity.field(),
            quantity.invalid_message(),
            format!("{} is not a finite number", raw),
        )
    })
}

fn text(raw: Option<&Value>) -> Option<String> {
    raw.and_then(Value::as_str).map(str::to_string)
}

/// Validate a pH submission into its rounded sample
pub fn validate_ph(submission: &PhSubmission) -> ClearFlowResult<PhSample> {
    let value = finite_value(Quantity::Ph, submission.ph.as_ref())?;
    Ok(PhSample {
        ph: round_to(value, Quantity::Ph.precision()),
    })
}

/// Validate a turbidity submission into its rounded sample
pub fn validate_turbidity(submission: &TurbiditySubmission) -> ClearFlowResult<TurbiditySample> {
    let value = finite_value(Quantity::Turbidity, submission.turbidity.as_ref())?;
    Ok(TurbiditySample {
        ntu: round_to(value, Quantity::Turbidity.precision()),
        status: text(submission.status.as_ref()).unwrap_or_else(|| UNKNOWN_STATUS.to_string()),
        safe: submission.safe.as_ref().and_then(Value::as_bool),
        standard: text(submission.standard.as_ref()),
        message: text(submission.message.as_ref()),
    })
}

/// Entry point for every write into the [`ReadingStore`]
#[derive(Clone)]
pub struct IngestionGateway {
    store: Arc<ReadingStore>,
    clock: Arc<dyn Clock>,
}

impl IngestionGateway {
    pub fn new(store: Arc<ReadingStore>) -> Self {
        Self::with_clock(store, Arc::new(SystemClock))
    }

    pub fn with_clock(store: Arc<ReadingStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    fn store_ph(&self, submission: PhSubmission) -> ClearFlowResult<Reading<PhSample>> {
        let sample = validate_ph(&submission)?;
        Ok(self.store.put_ph_with(self.clock.as_ref(), |arrived| {
            Reading::new(sample, submission.ts, arrived)
        }))
    }

    /// Canonical pH path: reject invalid input, otherwise replace the pH slot
    pub fn accept_ph(&self, submission: PhSubmission) -> ClearFlowResult<Reading<PhSample>> {
        let reading = self.store_ph(submission)?;
        info!("[pH] Received: {:.2}", reading.sample.ph);
        Ok(reading)
    }

    /// Canonical turbidity path
    pub fn accept_turbidity(
        &self,
        submission: TurbiditySubmission,
    ) -> ClearFlowResult<Reading<TurbiditySample>> {
        let sample = validate_turbidity(&submission)?;
        let reading = self.store.put_turbidity_with(self.clock.as_ref(), |arrived| {
            Reading::new(sample, submission.ts, arrived)
        });
        info!(
            "[Turbidity] Received: {:.1} NTU | Status: {}",
            reading.sample.ntu, reading.sample.status
        );
        Ok(reading)
    }

    /// Legacy pH path for older senders
    ///
    /// Same mutation as [`IngestionGateway::accept_ph`], but a rejected value
    /// is swallowed: the caller always reports success.
    pub fn accept_legacy(&self, submission: PhSubmission) -> Option<Reading<PhSample>> {
        match self.store_ph(submission) {
            Ok(reading) => {
                info!("[pH via /api/data] Received: {:.2}", reading.sample.ph);
                Some(reading)
            },
            Err(e) => {
                debug!("Legacy pH submission ignored: {:?}", e);
                None
            },
        }
    }
}
