//! Bundled classification of a pair of readings

use crate::classify::{
    classify_ph, classify_turbidity, combine, Classification, OverallStatus, PhCategory,
    TurbidityClassification,
};
use crate::freshness::FreshReadings;
use crate::purification::{recommend, Recommendation};
use serde::Serialize;

/// Everything a dashboard renders for one poll
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assessment {
    pub overall: OverallStatus,
    pub ph_value: Option<f64>,
    pub turbidity_value: Option<f64>,
    pub ph: Classification<PhCategory>,
    pub turbidity: TurbidityClassification,
    /// Empty until both quantities have arrived
    pub recommendations: Vec<Recommendation>,
    pub timestamp: Option<String>,
}

impl Assessment {
    pub fn from_fresh(fresh: &FreshReadings) -> Self {
        let ph_value = fresh.ph_value();
        let turbidity_value = fresh.turbidity_value();

        let ph = classify_ph(ph_value);
        let turbidity = classify_turbidity(turbidity_value, &fresh.turbidity_meta());
        let overall = combine(&ph, &turbidity.status);

        let recommendations = match (ph_value, turbidity_value) {
            (Some(ph), Some(ntu)) => recommend(ph, ntu),
            _ => Vec::new(),
        };

        Self {
            overall,
            ph_value,
            turbidity_value,
            ph,
            turbidity,
            recommendations,
            timestamp: fresh.timestamp.clone(),
        }
    }

    pub fn is_optimal(&self) -> bool {
        self.overall == OverallStatus::Optimal
    }
}
