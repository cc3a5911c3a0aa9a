use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use super::super::profile::{FeatureVector, FEATURE_COUNT, FEATURE_NAMES};

#[derive(Debug)]
pub enum TrainingDataError {
    Io(std::io::Error),
    Csv(csv::Error),
    Header { found: Vec<String> },
    Empty,
}

impl std::fmt::Display for TrainingDataError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrainingDataError::Io(err) => write!(f, "failed to read training sample: {}", err),
            TrainingDataError::Csv(err) => write!(f, "invalid training CSV data: {}", err),
            TrainingDataError::Header { found } => write!(
                f,
                "training CSV header must be {} (found {})",
                FEATURE_NAMES.join(","),
                found.join(",")
            ),
            TrainingDataError::Empty => write!(f, "training sample has no rows"),
        }
    }
}

impl std::error::Error for TrainingDataError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TrainingDataError::Io(err) => Some(err),
            TrainingDataError::Csv(err) => Some(err),
            TrainingDataError::Header { .. } | TrainingDataError::Empty => None,
        }
    }
}

impl From<std::io::Error> for TrainingDataError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for TrainingDataError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

#[derive(Debug, Deserialize)]
struct TrainingRow {
    #[serde(rename = "Employed_Years")]
    employed_years: f64,
    #[serde(rename = "Annual_income")]
    annual_income: f64,
    #[serde(rename = "Age")]
    age: f64,
    #[serde(rename = "Type_Income")]
    income_type: f64,
    #[serde(rename = "Education")]
    education: f64,
    #[serde(rename = "Marital_status")]
    marital_status: f64,
}

impl From<TrainingRow> for FeatureVector {
    fn from(row: TrainingRow) -> Self {
        FeatureVector([
            row.employed_years,
            row.annual_income,
            row.age,
            row.income_type,
            row.education,
            row.marital_status,
        ])
    }
}

/// Cached, already scaled training rows the explainer samples around.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingSample {
    rows: Vec<FeatureVector>,
}

impl TrainingSample {
    pub fn new(rows: Vec<FeatureVector>) -> Result<Self, TrainingDataError> {
        if rows.is_empty() {
            return Err(TrainingDataError::Empty);
        }
        Ok(Self { rows })
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, TrainingDataError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, TrainingDataError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = csv_reader.headers()?;
        if !headers.iter().eq(FEATURE_NAMES.iter().copied()) {
            return Err(TrainingDataError::Header {
                found: headers.iter().map(str::to_string).collect(),
            });
        }

        let mut rows = Vec::new();
        for record in csv_reader.deserialize::<TrainingRow>() {
            rows.push(FeatureVector::from(record?));
        }

        Self::new(rows)
    }

    pub fn rows(&self) -> &[FeatureVector] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_means(&self) -> [f64; FEATURE_COUNT] {
        let mut sums = [0.0; FEATURE_COUNT];
        for row in &self.rows {
            for (sum, value) in sums.iter_mut().zip(row.iter()) {
                *sum += value;
            }
        }

        let count = self.rows.len() as f64;
        sums.map(|sum| sum / count)
    }

    /// Population standard deviation per column.
    pub fn column_std_devs(&self) -> [f64; FEATURE_COUNT] {
        let means = self.column_means();
        let mut squares = [0.0; FEATURE_COUNT];
        for row in &self.rows {
            for (index, value) in row.iter().enumerate() {
                let diff = value - means[index];
                squares[index] += diff * diff;
            }
        }

        let count = self.rows.len() as f64;
        squares.map(|square| (square / count).sqrt())
    }
}
