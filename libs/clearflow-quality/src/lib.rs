//! ClearFlow water-quality core
//!
//! Holds the latest pH and turbidity readings, enforces the ingestion
//! contract, and classifies readings into safety categories and
//! purification guidance. No I/O happens in this crate.

pub mod assessment;
pub mod classify;
pub mod clock;
pub mod coerce;
pub mod freshness;
pub mod ingest;
pub mod purification;
pub mod query;
pub mod reading;
pub mod snapshot;
pub mod store;

pub use assessment::Assessment;
pub use classify::{
    classify_ph, classify_turbidity, combine, Category, Classification, OverallStatus,
    PhCategory, Tone, TurbidityCategory, TurbidityClassification, TurbidityMeta,
};
pub use clock::{Clock, FixedClock, ManualClock, SystemClock};
pub use freshness::{FreshReadings, WaterQualityWire};
pub use ingest::{decode_lenient, IngestionGateway, PhSubmission, TurbiditySubmission};
pub use purification::{recommend, Recommendation, RecommendationKind, TREATMENT_METHODS};
pub use query::QueryGateway;
pub use reading::{PhSample, Quantity, Reading, TurbiditySample};
pub use snapshot::{PhReadingView, TurbidityReadingView, WaterQualitySnapshot};
pub use store::ReadingStore;
