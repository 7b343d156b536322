use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::Serialize;
use strum::{EnumCount, IntoEnumIterator};

use crate::classifier::Temperature;

/// The number of decimal places probabilities are rounded to when persisted.
pub const PROBABILITY_DECIMALS: i32 = 8;

pub fn round_probability(probability: f64) -> f64 {
    let scale = 10f64.powi(PROBABILITY_DECIMALS);
    (probability * scale).round() / scale
}

/// Duplex probabilities for one probe, one per supported temperature, ascending.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProbabilityVector(pub [f64; Temperature::COUNT]);

impl ProbabilityVector {
    pub fn at(&self, temperature: Temperature) -> f64 {
        self.0[temperature.index()]
    }

    pub fn rounded(&self) -> Self {
        Self(self.0.map(round_probability))
    }

    /// (temperature, probability) pairs, ascending by temperature
    pub fn points(&self) -> impl Iterator<Item = (Temperature, f64)> + '_ {
        Temperature::iter().map(|t| (t, self.at(t)))
    }
}

impl Display for ProbabilityVector {
    /// Writes the rounded probabilities as a bracketed list, e.g. `[0.5, 0.25, ...]`
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[")?;
        for (idx, probability) in self.rounded().0.iter().enumerate() {
            if idx > 0 {
                write!(f, ", ")?;
            }
            // Debug keeps the trailing ".0" on whole numbers
            write!(f, "{probability:?}")?;
        }
        write!(f, "]")
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("can't parse probability vector: {text}")]
pub struct ProbabilityVectorParseError {
    text: String,
}

impl FromStr for ProbabilityVector {
    type Err = ProbabilityVectorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ProbabilityVectorParseError {
            text: s.to_string(),
        };

        let inner = s
            .trim()
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
            .ok_or_else(err)?;

        let values = inner
            .split(',')
            .map(|token| token.trim().parse::<f64>())
            .collect::<Result<Vec<f64>, _>>()
            .map_err(|_| err())?;

        let probabilities: [f64; Temperature::COUNT] = values.try_into().map_err(|_| err())?;
        Ok(Self(probabilities))
    }
}
