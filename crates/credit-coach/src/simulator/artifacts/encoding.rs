use serde::{Deserialize, Serialize};

/// Bijective label-to-code mapping; codes are positions in the sorted class list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoricalEncoder {
    feature: &'static str,
    classes: Vec<String>,
}

impl CategoricalEncoder {
    pub fn new<I, S>(feature: &'static str, classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut classes: Vec<String> = classes.into_iter().map(Into::into).collect();
        classes.sort();
        classes.dedup();
        Self { feature, classes }
    }

    pub fn feature(&self) -> &'static str {
        self.feature
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn encode(&self, label: &str) -> Result<u32, EncodingError> {
        self.classes
            .binary_search_by(|class| class.as_str().cmp(label))
            .map(|index| index as u32)
            .map_err(|_| EncodingError::UnknownLabel {
                feature: self.feature,
                label: label.to_string(),
            })
    }

    pub fn decode(&self, code: u32) -> Option<&str> {
        self.classes.get(code as usize).map(String::as_str)
    }
}

/// The three categorical encoders used by the simulator form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoricalEncoders {
    pub income_type: CategoricalEncoder,
    pub education: CategoricalEncoder,
    pub marital_status: CategoricalEncoder,
}

#[derive(Debug, Deserialize)]
struct EncoderClasses {
    income_type: Vec<String>,
    education: Vec<String>,
    marital_status: Vec<String>,
}

impl<'de> Deserialize<'de> for CategoricalEncoders {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = EncoderClasses::deserialize(deserializer)?;
        let encoders = CategoricalEncoders::from_classes(
            raw.income_type,
            raw.education,
            raw.marital_status,
        );

        for encoder in encoders.iter() {
            if encoder.classes().is_empty() {
                return Err(serde::de::Error::custom(format!(
                    "encoder for {} has no classes",
                    encoder.feature()
                )));
            }
        }

        Ok(encoders)
    }
}

impl CategoricalEncoders {
    pub fn from_classes(
        income_type: Vec<String>,
        education: Vec<String>,
        marital_status: Vec<String>,
    ) -> Self {
        Self {
            income_type: CategoricalEncoder::new("Type_Income", income_type),
            education: CategoricalEncoder::new("Education", education),
            marital_status: CategoricalEncoder::new("Marital_status", marital_status),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &CategoricalEncoder> {
        [&self.income_type, &self.education, &self.marital_status].into_iter()
    }
}

/// Label lookup failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodingError {
    #[error("unknown {feature} label '{label}'")]
    UnknownLabel {
        feature: &'static str,
        label: String,
    },
}
