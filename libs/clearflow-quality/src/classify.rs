//! Safety classification
//!
//! pH and turbidity are classified independently against fixed thresholds,
//! then folded into one overall status with a strict AND: both quantities
//! must be safe for the water to be "Optimal".

use crate::reading::is_placeholder_status;
use serde::Serialize;

/// Label shown while a quantity has never been reported
pub const WAITING_LABEL: &str = "Waiting for data";

/// Lowest pH still considered safe (inclusive)
pub const PH_MIN_SAFE: f64 = 6.5;
/// Highest pH still considered safe (inclusive)
pub const PH_MAX_SAFE: f64 = 8.5;

/// Upper bound of "Clear Water", in NTU (inclusive)
pub const TURBIDITY_CLEAR_MAX: f64 = 49.0;
/// Upper bound of "Cloudy", in NTU (inclusive)
pub const TURBIDITY_CLOUDY_MAX: f64 = 75.0;
/// Upper bound of "Very Cloudy", in NTU (inclusive)
pub const TURBIDITY_VERY_CLOUDY_MAX: f64 = 150.0;

const DEFAULT_TURBIDITY_MESSAGE: &str = "Monitoring turbidity levels.";

/// Display tone for a status, mapped to colours by renderers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Neutral,
    Good,
    Warning,
    Critical,
}

/// Common behaviour of a per-quantity category
pub trait Category: Copy {
    fn label(self) -> &'static str;
    fn suggestion(self) -> &'static str;
    fn tone(self) -> Tone;
    /// `None` while waiting for data
    fn is_safe(self) -> Option<bool>;

    fn is_waiting(self) -> bool {
        self.is_safe().is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PhCategory {
    Waiting,
    TooAcidic,
    TooAlkaline,
    Safe,
}

impl PhCategory {
    pub fn of(ph: Option<f64>) -> Self {
        match ph {
            None => PhCategory::Waiting,
            Some(v) if v < PH_MIN_SAFE => PhCategory::TooAcidic,
            Some(v) if v > PH_MAX_SAFE => PhCategory::TooAlkaline,
            Some(_) => PhCategory::Safe,
        }
    }
}

impl Category for PhCategory {
    fn label(self) -> &'static str {
        match self {
            PhCategory::Waiting => WAITING_LABEL,
            PhCategory::TooAcidic => "Too Acidic",
            PhCategory::TooAlkaline => "Too Alkaline",
            PhCategory::Safe => "Safe",
        }
    }

    fn suggestion(self) -> &'static str {
        match self {
            PhCategory::Waiting => "Awaiting first sensor reading.",
            PhCategory::TooAcidic => "Add mild base (like baking soda) to neutralize.",
            PhCategory::TooAlkaline => "Add mild acid (like vinegar or CO2 infusion).",
            PhCategory::Safe => "No purification needed, water is balanced.",
        }
    }

    fn tone(self) -> Tone {
        match self {
            PhCategory::Waiting => Tone::Neutral,
            PhCategory::TooAcidic => Tone::Critical,
            PhCategory::TooAlkaline => Tone::Warning,
            PhCategory::Safe => Tone::Good,
        }
    }

    fn is_safe(self) -> Option<bool> {
        match self {
            PhCategory::Waiting => None,
            PhCategory::Safe => Some(true),
            PhCategory::TooAcidic | PhCategory::TooAlkaline => Some(false),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TurbidityCategory {
    Waiting,
    ClearWater,
    ExtremelyTurbid,
    VeryCloudy,
    Cloudy,
    ModerateTurbidity,
}

impl TurbidityCategory {
    /// Bucket an NTU value, honouring the sender's own safety verdict
    ///
    /// With no override, `ntu <= 49` is safe. Boundaries fall into the
    /// lower-severity bucket. `ModerateTurbidity` is only reachable when the
    /// sender marks a low reading unsafe.
    pub fn of(ntu: Option<f64>, safe_override: Option<bool>) -> Self {
        let Some(ntu) = ntu else {
            return TurbidityCategory::Waiting;
        };

        if safe_override.unwrap_or(ntu <= TURBIDITY_CLEAR_MAX) {
            TurbidityCategory::ClearWater
        } else if ntu > TURBIDITY_VERY_CLOUDY_MAX {
            TurbidityCategory::ExtremelyTurbid
        } else if ntu > TURBIDITY_CLOUDY_MAX {
            TurbidityCategory::VeryCloudy
        } else if ntu > TURBIDITY_CLEAR_MAX {
            TurbidityCategory::Cloudy
        } else {
            TurbidityCategory::ModerateTurbidity
        }
    }
}

impl Category for TurbidityCategory {
    fn label(self) -> &'static str {
        match self {
            TurbidityCategory::Waiting => WAITING_LABEL,
            TurbidityCategory::ClearWater => "Clear Water",
            TurbidityCategory::ExtremelyTurbid => "Extremely Turbid",
            TurbidityCategory::VeryCloudy => "Very Cloudy",
            TurbidityCategory::Cloudy => "Cloudy",
            TurbidityCategory::ModerateTurbidity => "Moderate Turbidity",
        }
    }

    fn suggestion(self) -> &'static str {
        match self {
            TurbidityCategory::Waiting => "Awaiting turbidity reading.",
            TurbidityCategory::ClearWater => {
                "No purification needed, water clarity is excellent."
            },
            TurbidityCategory::ExtremelyTurbid => {
                "Apply coagulation & flocculation, followed by membrane filtration for best results."
            },
            TurbidityCategory::VeryCloudy => {
                "Use sedimentation + filtration or membrane filtration to reduce turbidity."
            },
            TurbidityCategory::Cloudy => {
                "Apply rapid sand filtration or multimedia filters to clarify water."
            },
            TurbidityCategory::ModerateTurbidity => {
                "Monitor closely. Consider filtration if levels rise above 50 NTU."
            },
        }
    }

    fn tone(self) -> Tone {
        match self {
            TurbidityCategory::Waiting => Tone::Neutral,
            TurbidityCategory::ClearWater => Tone::Good,
            TurbidityCategory::ExtremelyTurbid | TurbidityCategory::VeryCloudy => Tone::Critical,
            TurbidityCategory::Cloudy | TurbidityCategory::ModerateTurbidity => Tone::Warning,
        }
    }

    fn is_safe(self) -> Option<bool> {
        match self {
            TurbidityCategory::Waiting => None,
            TurbidityCategory::ClearWater => Some(true),
            _ => Some(false),
        }
    }
}

/// Classified state of one quantity, ready for display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification<C> {
    pub category: C,
    /// Category label, or the sender's status when it overrides it
    pub label: String,
    pub safe: Option<bool>,
    pub suggestion: &'static str,
    pub tone: Tone,
}

impl<C: Category> Classification<C> {
    fn new(category: C, label_override: Option<&str>) -> Self {
        Self {
            category,
            label: label_override.unwrap_or(category.label()).to_string(),
            safe: category.is_safe(),
            suggestion: category.suggestion(),
            tone: category.tone(),
        }
    }

    pub fn is_waiting(&self) -> bool {
        self.category.is_waiting()
    }
}

/// Sender-supplied turbidity metadata
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TurbidityMeta {
    pub status: Option<String>,
    pub message: Option<String>,
    pub safe: Option<bool>,
    pub standard: Option<String>,
}

/// Turbidity classification plus the sender's display detail
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TurbidityClassification {
    #[serde(flatten)]
    pub status: Classification<TurbidityCategory>,
    pub message: String,
    /// `" (Standard: X)"` when the sender named a standard
    #[serde(skip_serializing_if = "Option::is_none")]
    pub standard_detail: Option<String>,
}

pub fn classify_ph(ph: Option<f64>) -> Classification<PhCategory> {
    Classification::new(PhCategory::of(ph), None)
}

/// Classify turbidity; a non-placeholder sender status replaces the label
///
/// The sender's status never replaces the "waiting" label.
pub fn classify_turbidity(ntu: Option<f64>, meta: &TurbidityMeta) -> TurbidityClassification {
    let category = TurbidityCategory::of(ntu, meta.safe);
    let status_text = meta
        .status
        .as_deref()
        .filter(|s| !is_placeholder_status(s) && !category.is_waiting());

    TurbidityClassification {
        status: Classification::new(category, status_text),
        message: meta
            .message
            .clone()
            .unwrap_or_else(|| DEFAULT_TURBIDITY_MESSAGE.to_string()),
        standard_detail: meta
            .standard
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(|s| format!(" (Standard: {})", s)),
    }
}

/// Overall water status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OverallStatus {
    #[serde(rename = "Waiting for data")]
    Waiting,
    #[serde(rename = "Optimal")]
    Optimal,
    #[serde(rename = "Attention Needed")]
    AttentionNeeded,
}

impl OverallStatus {
    pub fn label(self) -> &'static str {
        match self {
            OverallStatus::Waiting => WAITING_LABEL,
            OverallStatus::Optimal => "Optimal",
            OverallStatus::AttentionNeeded => "Attention Needed",
        }
    }

    pub fn tone(self) -> Tone {
        match self {
            OverallStatus::Waiting => Tone::Neutral,
            OverallStatus::Optimal => Tone::Good,
            OverallStatus::AttentionNeeded => Tone::Warning,
        }
    }
}

/// Fold both classifications: any waiting wins, then strict AND of safety
pub fn combine(
    ph: &Classification<PhCategory>,
    turbidity: &Classification<TurbidityCategory>,
) -> OverallStatus {
    if ph.is_waiting() || turbidity.is_waiting() {
        return OverallStatus::Waiting;
    }
    if ph.safe == Some(true) && turbidity.safe == Some(true) {
        OverallStatus::Optimal
    } else {
        OverallStatus::AttentionNeeded
    }
}
