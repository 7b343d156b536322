use std::str::FromStr;

use serde::Serialize;
use strum::{Display, EnumCount, EnumIter, IntoEnumIterator};

use crate::alphabet::gc_content;
use crate::errors::InvalidTemperatureError;
use crate::structs::ProbabilityVector;

/// The hybridization temperatures that have a calibrated duplex classifier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumIter, EnumCount, Serialize,
)]
#[serde(into = "u32")]
pub enum Temperature {
    #[strum(serialize = "32")]
    C32,
    #[strum(serialize = "37")]
    C37,
    #[strum(serialize = "42")]
    C42,
    #[strum(serialize = "47")]
    C47,
    #[strum(serialize = "52")]
    C52,
    #[strum(serialize = "57")]
    C57,
}

impl Temperature {
    pub fn celsius(&self) -> u32 {
        match self {
            Temperature::C32 => 32,
            Temperature::C37 => 37,
            Temperature::C42 => 42,
            Temperature::C47 => 47,
            Temperature::C52 => 52,
            Temperature::C57 => 57,
        }
    }

    /// The position of this temperature in a ProbabilityVector.
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// All supported temperatures in degrees Celsius, ascending.
    pub fn supported() -> Vec<u32> {
        Temperature::iter().map(|t| t.celsius()).collect()
    }
}

impl From<Temperature> for u32 {
    fn from(temperature: Temperature) -> Self {
        temperature.celsius()
    }
}

impl TryFrom<u32> for Temperature {
    type Error = InvalidTemperatureError;

    fn try_from(celsius: u32) -> Result<Self, Self::Error> {
        Temperature::iter()
            .find(|t| t.celsius() == celsius)
            .ok_or_else(|| InvalidTemperatureError {
                value: celsius.to_string(),
                valid: Temperature::supported(),
            })
    }
}

impl FromStr for Temperature {
    type Err = InvalidTemperatureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().parse::<u32>() {
            Ok(celsius) => Temperature::try_from(celsius),
            Err(_) => Err(InvalidTemperatureError {
                value: s.to_string(),
                valid: Temperature::supported(),
            }),
        }
    }
}

/// The class labels of the two-class discriminant.
pub const NO_DUPLEX_CLASS: i8 = -1;
pub const DUPLEX_CLASS: i8 = 1;

/// A fitted two-class linear discriminant for one temperature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassifierParameters {
    pub temperature: Temperature,
    /// Weights for [length, alignment score, GC content]
    pub coefficients: [f64; 3],
    pub intercept: f64,
    pub classes: [i8; 2],
}

// Values from the models published in Beliveau, et al. (2018).
// These are never refit.
pub const CLASSIFIER_PARAMETERS: [ClassifierParameters; Temperature::COUNT] = [
    ClassifierParameters {
        temperature: Temperature::C32,
        coefficients: [-0.14494789, 0.18791679, 0.02588474],
        intercept: -1.17545204,
        classes: [NO_DUPLEX_CLASS, DUPLEX_CLASS],
    },
    ClassifierParameters {
        temperature: Temperature::C37,
        coefficients: [-0.13364364, 0.22510179, 0.05494031],
        intercept: -5.40436344,
        classes: [NO_DUPLEX_CLASS, DUPLEX_CLASS],
    },
    ClassifierParameters {
        temperature: Temperature::C42,
        coefficients: [-0.09006122, 0.25660706, 0.10783030],
        intercept: -12.45549846,
        classes: [NO_DUPLEX_CLASS, DUPLEX_CLASS],
    },
    ClassifierParameters {
        temperature: Temperature::C47,
        coefficients: [-0.01593182, 0.24498485, 0.15753649],
        intercept: -19.32670233,
        classes: [NO_DUPLEX_CLASS, DUPLEX_CLASS],
    },
    ClassifierParameters {
        temperature: Temperature::C52,
        coefficients: [0.01860365, 0.17501740, 0.17003374],
        intercept: -20.11992898,
        classes: [NO_DUPLEX_CLASS, DUPLEX_CLASS],
    },
    ClassifierParameters {
        temperature: Temperature::C57,
        coefficients: [0.03236755, 0.11624593, 0.24306498],
        intercept: -23.98652919,
        classes: [NO_DUPLEX_CLASS, DUPLEX_CLASS],
    },
];

/// The three classifier inputs describing one probe.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeFeatures {
    pub length: usize,
    pub alignment_score: i64,
    /// Percentage, 0-100
    pub gc_content: f64,
}

impl ProbeFeatures {
    pub fn new(sequence: &str, alignment_score: i64) -> Self {
        Self {
            length: sequence.len(),
            alignment_score,
            gc_content: gc_content(sequence),
        }
    }

    pub fn as_array(&self) -> [f64; 3] {
        [
            self.length as f64,
            self.alignment_score as f64,
            self.gc_content,
        ]
    }
}

impl ClassifierParameters {
    /// The signed distance-like score of the features from the decision boundary.
    pub fn decision(&self, features: &ProbeFeatures) -> f64 {
        self.coefficients
            .iter()
            .zip(features.as_array())
            .map(|(coefficient, feature)| coefficient * feature)
            .sum::<f64>()
            + self.intercept
    }

    /// The posterior probability of the duplex-forming class.
    pub fn probability(&self, features: &ProbeFeatures) -> f64 {
        logistic(self.decision(features))
    }
}

/// The logistic function, which maps a binary discriminant's
/// decision value to the posterior of the positive class.
pub fn logistic(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Predicts the probability that a probe forms a duplex with its target.
#[derive(Debug, Clone, Copy)]
pub struct DuplexClassifier {
    parameters: &'static [ClassifierParameters; Temperature::COUNT],
}

impl Default for DuplexClassifier {
    fn default() -> Self {
        Self {
            parameters: &CLASSIFIER_PARAMETERS,
        }
    }
}

impl DuplexClassifier {
    pub fn parameters(&self, temperature: Temperature) -> &ClassifierParameters {
        &self.parameters[temperature.index()]
    }

    pub fn probability(&self, features: &ProbeFeatures, temperature: Temperature) -> f64 {
        self.parameters(temperature).probability(features)
    }

    /// Score one probe at every supported temperature.
    pub fn probability_vector(&self, features: &ProbeFeatures) -> ProbabilityVector {
        let mut probabilities = [0.0; Temperature::COUNT];
        Temperature::iter().for_each(|t| probabilities[t.index()] = self.probability(features, t));
        ProbabilityVector(probabilities)
    }

    /// Score a probe sequence at a temperature given in degrees Celsius.
    pub fn score_probe(
        &self,
        sequence: &str,
        alignment_score: i64,
        temperature: u32,
    ) -> Result<f64, InvalidTemperatureError> {
        let temperature = Temperature::try_from(temperature)?;
        Ok(self.probability(&ProbeFeatures::new(sequence, alignment_score), temperature))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::{assert, let_assert};

    #[test]
    fn test_temperature_table_order() {
        assert!(Temperature::supported() == vec![32, 37, 42, 47, 52, 57]);
        CLASSIFIER_PARAMETERS
            .iter()
            .zip(Temperature::iter())
            .for_each(|(params, t)| assert!(params.temperature == t));
    }

    #[test]
    fn test_invalid_temperature() {
        let classifier = DuplexClassifier::default();
        let_assert!(Err(err) = classifier.score_probe("GATC", 10, 100));
        assert!(err.value == "100");
        assert!(err.valid == vec![32, 37, 42, 47, 52, 57]);
        assert!(
            err.to_string() == "invalid temperature value: 100, valid values are [32, 37, 42, 47, 52, 57]"
        );

        let_assert!(Err(err) = "warm".parse::<Temperature>());
        assert!(err.value == "warm");
    }

    #[test]
    fn test_temperature_from_str() {
        let_assert!(Ok(Temperature::C42) = "42".parse::<Temperature>());
        let_assert!(Ok(Temperature::C57) = " 57 ".parse::<Temperature>());
        assert!(Temperature::C37.to_string() == "37");
    }

    #[test]
    fn test_score_probe_reference() {
        // decision = -0.9006122 + 5.1321412 + 5.391515 - 12.45549846 = -2.83245446
        let classifier = DuplexClassifier::default();
        let features = ProbeFeatures::new("GATCGATCGA", 20);
        assert!(features.gc_content == 50.0);

        let decision = classifier.parameters(Temperature::C42).decision(&features);
        assert!((decision - -2.83245446).abs() < 1e-10);

        let_assert!(Ok(p) = classifier.score_probe("GATCGATCGA", 20, 42));
        assert!((p - 0.05559539).abs() < 5e-9);
    }

    #[test]
    fn test_probability_vector_reference() {
        let classifier = DuplexClassifier::default();
        let expected = [
            0.91891099, 0.62439649, 0.05559539, 0.00121779, 0.00035899, 0.00010259,
        ];
        let vector = classifier.probability_vector(&ProbeFeatures::new("GATCGATCGA", 20));
        vector
            .0
            .iter()
            .zip(expected)
            .for_each(|(p, e)| assert!((p - e).abs() < 5e-9));
    }

    #[test]
    fn test_probabilities_are_bounded() {
        let classifier = DuplexClassifier::default();
        for length in [0usize, 1, 20, 40, 200, 5000] {
            for alignment_score in [0i64, 10, 80, 1000, 100_000] {
                for gc_content in [0.0, 35.0, 50.0, 100.0] {
                    let features = ProbeFeatures {
                        length,
                        alignment_score,
                        gc_content,
                    };
                    for t in Temperature::iter() {
                        let p = classifier.probability(&features, t);
                        assert!((0.0..=1.0).contains(&p));
                    }
                }
            }
        }
    }
}
