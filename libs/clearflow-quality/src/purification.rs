//! Purification guidance
//!
//! [`recommend`] turns a pH/turbidity pair into an ordered action list.
//! Order is fixed for reproducible output: pH correction, then filtration,
//! then coagulation. [`TREATMENT_METHODS`] is the static reference catalog
//! shown alongside it.

use crate::classify::{PH_MAX_SAFE, PH_MIN_SAFE};
use serde::Serialize;

/// Turbidity above which filtration is recommended, in NTU
pub const FILTRATION_THRESHOLD_NTU: f64 = 5.0;
/// Turbidity above which coagulation is additionally recommended, in NTU
pub const COAGULATION_THRESHOLD_NTU: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    PhNeutralization,
    PhAdjustment,
    Filtration,
    Coagulation,
    StandardMaintenance,
}

impl RecommendationKind {
    pub fn title(self) -> &'static str {
        match self {
            RecommendationKind::PhNeutralization => "pH Neutralization",
            RecommendationKind::PhAdjustment => "pH Adjustment",
            RecommendationKind::Filtration => "Filtration Required",
            RecommendationKind::Coagulation => "Coagulation & Flocculation",
            RecommendationKind::StandardMaintenance => "Standard Maintenance",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            RecommendationKind::PhNeutralization => {
                "Water is too acidic. Use pH neutralizers or baking soda to increase pH levels."
            },
            RecommendationKind::PhAdjustment => {
                "Water is too alkaline. Use pH reducers or citric acid to lower pH levels."
            },
            RecommendationKind::Filtration => {
                "High turbidity detected. Use sediment filters or activated carbon filtration."
            },
            RecommendationKind::Coagulation => {
                "Very high turbidity. Consider using alum or other coagulants before filtration."
            },
            RecommendationKind::StandardMaintenance => {
                "Water quality is good. Continue regular monitoring and basic filtration."
            },
        }
    }
}

/// One remediation action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    pub kind: RecommendationKind,
    pub title: &'static str,
    pub description: &'static str,
}

impl From<RecommendationKind> for Recommendation {
    fn from(kind: RecommendationKind) -> Self {
        Self {
            kind,
            title: kind.title(),
            description: kind.description(),
        }
    }
}

/// Ordered remediation actions for a pH/turbidity pair
pub fn recommend(ph: f64, turbidity_ntu: f64) -> Vec<Recommendation> {
    let mut kinds = Vec::with_capacity(3);

    if ph < PH_MIN_SAFE {
        kinds.push(RecommendationKind::PhNeutralization);
    } else if ph > PH_MAX_SAFE {
        kinds.push(RecommendationKind::PhAdjustment);
    }

    if turbidity_ntu > FILTRATION_THRESHOLD_NTU {
        kinds.push(RecommendationKind::Filtration);
    }

    if turbidity_ntu > COAGULATION_THRESHOLD_NTU {
        kinds.push(RecommendationKind::Coagulation);
    }

    if kinds.is_empty() {
        kinds.push(RecommendationKind::StandardMaintenance);
    }

    kinds.into_iter().map(Recommendation::from).collect()
}

/// Reference entry in the treatment catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TreatmentMethod {
    pub method: &'static str,
    pub description: &'static str,
    pub equipment: &'static str,
    /// Typical removal efficiency range, in percent
    pub efficiency: &'static str,
}

/// Turbidity-reduction methods, in treatment-train order
pub const TREATMENT_METHODS: [TreatmentMethod; 5] = [
    TreatmentMethod {
        method: "Sedimentation",
        description: "Allows suspended solids to settle by gravity before downstream treatment, reducing turbidity upfront.",
        equipment: "Settling tanks, clarifiers, detention basins",
        efficiency: "50-70",
    },
    TreatmentMethod {
        method: "Coagulation & Flocculation",
        description: "Coagulants neutralize particle charges while gentle mixing forms larger flocs that settle or filter easily.",
        equipment: "Flash mixers, flocculation basins, chemical feed systems",
        efficiency: "70-90",
    },
    TreatmentMethod {
        method: "Filtration",
        description: "Passes partially clarified water through granular media to capture remaining suspended solids.",
        equipment: "Rapid sand filters, multimedia filters, pressure filters",
        efficiency: "85-95",
    },
    TreatmentMethod {
        method: "Membrane Filtration",
        description: "Uses micro/ultrafiltration membranes to screen fine particles, colloids, and microorganisms.",
        equipment: "Hollow-fiber modules, spiral-wound membranes, crossflow systems",
        efficiency: "95-99",
    },
    TreatmentMethod {
        method: "Disinfection",
        description: "Inactivates remaining pathogens after turbidity reduction to ensure microbiological safety.",
        equipment: "Chlorination systems, UV reactors, ozone generators",
        efficiency: "90-99",
    },
];
