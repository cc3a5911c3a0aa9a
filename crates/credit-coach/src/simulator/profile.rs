use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

/// Number of model features.
pub const FEATURE_COUNT: usize = 6;

/// Column names in the order the scaler, model and training sample expect them.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "Employed_Years",
    "Annual_income",
    "Age",
    "Type_Income",
    "Education",
    "Marital_status",
];

pub(crate) const EMPLOYED_YEARS_RANGE: RangeInclusive<u32> = 0..=50;
pub(crate) const AGE_RANGE: RangeInclusive<u8> = 18..=70;
pub(crate) const ANNUAL_INCOME_RANGE: RangeInclusive<f64> = 0.0..=2_000_000.0;

/// Encoded snapshot of one simulated applicant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ApplicantProfile {
    pub employed_years: u32,
    pub annual_income: f64,
    pub age: u8,
    pub income_type: u32,
    pub education: u32,
    pub marital_status: u32,
}

impl ApplicantProfile {
    /// Unscaled model input in [`FEATURE_NAMES`] order.
    pub fn feature_vector(&self) -> FeatureVector {
        FeatureVector([
            f64::from(self.employed_years),
            self.annual_income,
            f64::from(self.age),
            f64::from(self.income_type),
            f64::from(self.education),
            f64::from(self.marital_status),
        ])
    }
}

/// Form values as entered, with categorical fields still carrying their labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicantInput {
    pub employed_years: u32,
    pub annual_income: f64,
    pub age: u8,
    pub income_type: String,
    pub education: String,
    pub marital_status: String,
}

impl ApplicantInput {
    /// Rejects values outside the ranges the simulator form offers.
    pub fn validate(&self) -> Result<(), InputError> {
        if !EMPLOYED_YEARS_RANGE.contains(&self.employed_years) {
            return Err(InputError::OutOfRange {
                field: "employed_years",
                value: f64::from(self.employed_years),
                min: f64::from(*EMPLOYED_YEARS_RANGE.start()),
                max: f64::from(*EMPLOYED_YEARS_RANGE.end()),
            });
        }

        if !AGE_RANGE.contains(&self.age) {
            return Err(InputError::OutOfRange {
                field: "age",
                value: f64::from(self.age),
                min: f64::from(*AGE_RANGE.start()),
                max: f64::from(*AGE_RANGE.end()),
            });
        }

        if !self.annual_income.is_finite() || !ANNUAL_INCOME_RANGE.contains(&self.annual_income) {
            return Err(InputError::OutOfRange {
                field: "annual_income",
                value: self.annual_income,
                min: *ANNUAL_INCOME_RANGE.start(),
                max: *ANNUAL_INCOME_RANGE.end(),
            });
        }

        Ok(())
    }
}

/// Fixed-width numeric row fed to the scaler, model and explainer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector(pub [f64; FEATURE_COUNT]);

impl FeatureVector {
    pub fn values(&self) -> &[f64; FEATURE_COUNT] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.0.iter().copied()
    }

    pub fn is_finite(&self) -> bool {
        self.0.iter().all(|value| value.is_finite())
    }
}

impl From<[f64; FEATURE_COUNT]> for FeatureVector {
    fn from(values: [f64; FEATURE_COUNT]) -> Self {
        Self(values)
    }
}

/// Raised when form input falls outside the accepted ranges.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InputError {
    #[error("{field} must be between {min} and {max} (got {value})")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
}
