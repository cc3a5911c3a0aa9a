use serde::{Deserialize, Serialize};

/// Gauge reference point the delta is measured against.
pub const GAUGE_REFERENCE_PCT: f64 = 50.0;

const EXCELLENT_ABOVE_PCT: f64 = 70.0;
const FAIR_ABOVE_PCT: f64 = 40.0;

/// Coarse bucket for an approval probability, matching the gauge bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreditHealthTier {
    Excellent,
    Fair,
    Poor,
}

impl CreditHealthTier {
    /// Buckets a probability expressed in percent (0-100).
    pub fn from_percentage(pct: f64) -> Self {
        if pct > EXCELLENT_ABOVE_PCT {
            CreditHealthTier::Excellent
        } else if pct > FAIR_ABOVE_PCT {
            CreditHealthTier::Fair
        } else {
            CreditHealthTier::Poor
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CreditHealthTier::Excellent => "Excellent",
            CreditHealthTier::Fair => "Fair",
            CreditHealthTier::Poor => "Poor",
        }
    }

    pub fn guidance(&self) -> &'static str {
        match self {
            CreditHealthTier::Excellent => "High probability of credit approval.",
            CreditHealthTier::Fair => {
                "Moderate chance of approval. Consider improving income or reducing liabilities."
            }
            CreditHealthTier::Poor => {
                "Low approval probability. Try adjusting your financial parameters."
            }
        }
    }

    /// Gauge band covered by the tier, in percent.
    pub fn band(&self) -> (f64, f64) {
        match self {
            CreditHealthTier::Excellent => (EXCELLENT_ABOVE_PCT, 100.0),
            CreditHealthTier::Fair => (FAIR_ABOVE_PCT, EXCELLENT_ABOVE_PCT),
            CreditHealthTier::Poor => (0.0, FAIR_ABOVE_PCT),
        }
    }
}

/// Numbers a gauge chart needs; drawing is up to the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ApprovalGauge {
    pub value_pct: f64,
    pub reference_pct: f64,
    pub delta_pct: f64,
    pub tier: CreditHealthTier,
}

impl ApprovalGauge {
    /// Builds the gauge from a probability in `[0, 1]`.
    pub fn from_probability(probability: f64) -> Self {
        let value_pct = (probability * 100.0).clamp(0.0, 100.0);
        Self {
            value_pct,
            reference_pct: GAUGE_REFERENCE_PCT,
            delta_pct: value_pct - GAUGE_REFERENCE_PCT,
            tier: CreditHealthTier::from_percentage(value_pct),
        }
    }
}
