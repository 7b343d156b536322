use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::Serialize;

use crate::alphabet::is_nucleotide_sequence;
use crate::classifier::Temperature;
use crate::errors::FormatError;
use crate::structs::ProbabilityVector;

/// The column separator used in filtered probe files.
pub const FILTERED_SEPARATOR: &str = " \t ";

/// A probe that passed duplex probability filtering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilteredProbeRecord {
    /// 1-based position in the filtered output
    pub index: usize,
    pub sequence: String,
    pub probabilities: ProbabilityVector,
}

impl FilteredProbeRecord {
    pub fn probability_at(&self, temperature: Temperature) -> f64 {
        self.probabilities.at(temperature)
    }
}

impl Display for FilteredProbeRecord {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}{FILTERED_SEPARATOR}{}{FILTERED_SEPARATOR}{}",
            self.index, self.sequence, self.probabilities
        )
    }
}

/// A probe that passed both duplex probability and secondary structure filtering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StructureFilteredProbeRecord {
    #[serde(flatten)]
    pub probe: FilteredProbeRecord,
    /// Minimum free energy of the probe's own secondary structure
    pub mfe: f64,
}

/// One record line of a probability- or structure-filtered probe file.
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredProbeLine {
    /// The record line, trimmed of surrounding whitespace
    pub line: String,
    pub probe: FilteredProbeRecord,
    /// Only present in structure-filtered files
    pub mfe: Option<f64>,
}

impl FilteredProbeLine {
    pub fn with_mfe(&self, mfe: f64) -> StructureFilteredProbeRecord {
        StructureFilteredProbeRecord {
            probe: self.probe.clone(),
            mfe,
        }
    }

    /// The original line with an MFE column appended.
    pub fn append_mfe(&self, mfe: f64) -> String {
        format!("{}{FILTERED_SEPARATOR}{mfe:?}", self.line)
    }
}

impl FromStr for FilteredProbeLine {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let line = s.trim();
        let err = || FormatError::FilteredRecord {
            line: line.to_string(),
        };

        let fields: Vec<&str> = line.split('\t').map(str::trim).collect();

        let mfe = match fields.len() {
            3 => None,
            4 => Some(fields[3].parse::<f64>().map_err(|_| err())?),
            _ => return Err(err()),
        };

        let index = fields[0].parse::<usize>().map_err(|_| err())?;

        let sequence = fields[1];
        if !is_nucleotide_sequence(sequence) {
            return Err(err());
        }

        let probabilities = fields[2].parse::<ProbabilityVector>().map_err(|_| err())?;

        Ok(Self {
            line: line.to_string(),
            probe: FilteredProbeRecord {
                index,
                sequence: sequence.to_string(),
                probabilities,
            },
            mfe,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::{assert, let_assert};

    fn record() -> FilteredProbeRecord {
        FilteredProbeRecord {
            index: 3,
            sequence: "GATCGATCGA".to_string(),
            probabilities: ProbabilityVector([
                0.918910991, 0.62439649, 0.05559539, 0.00121779, 0.00035899, 0.00010259,
            ]),
        }
    }

    #[test]
    fn test_display_record() {
        assert!(
            record().to_string()
                == "3 \t GATCGATCGA \t [0.91891099, 0.62439649, 0.05559539, 0.00121779, 0.00035899, 0.00010259]"
        );
    }

    #[test]
    fn test_parse_record_line() {
        let text = format!("{} \n", record());
        let_assert!(Ok(parsed) = text.parse::<FilteredProbeLine>());
        assert!(parsed.probe.index == 3);
        assert!(parsed.probe.sequence == "GATCGATCGA");
        assert!(parsed.probe.probability_at(Temperature::C42) == 0.05559539);
        assert!(parsed.mfe == None);
        assert!(parsed.line == text.trim());
    }

    #[test]
    fn test_append_and_parse_mfe() {
        let_assert!(Ok(parsed) = record().to_string().parse::<FilteredProbeLine>());
        let with_mfe = parsed.append_mfe(-1.5);
        assert!(with_mfe.ends_with(" \t -1.5"));

        let_assert!(Ok(reparsed) = with_mfe.parse::<FilteredProbeLine>());
        assert!(reparsed.mfe == Some(-1.5));
        assert!(reparsed.probe == parsed.probe);
        assert!(parsed.with_mfe(-1.5).mfe == -1.5);
    }

    #[test]
    fn test_malformed_record_lines() {
        let_assert!(Err(FormatError::FilteredRecord { .. }) =
            "1 \t GATC".parse::<FilteredProbeLine>());
        let_assert!(Err(FormatError::FilteredRecord { .. }) =
            "one \t GATC \t [0.1, 0.2, 0.3, 0.4, 0.5, 0.6]".parse::<FilteredProbeLine>());
        let_assert!(Err(FormatError::FilteredRecord { .. }) =
            "1 \t GAUC \t [0.1, 0.2, 0.3, 0.4, 0.5, 0.6]".parse::<FilteredProbeLine>());
        let_assert!(Err(FormatError::FilteredRecord { .. }) =
            "1 \t GATC \t [0.1, 0.2]".parse::<FilteredProbeLine>());
        let_assert!(Err(FormatError::FilteredRecord { .. }) =
            "1 \t GATC \t [0.1, 0.2, 0.3, 0.4, 0.5, 0.6] \t stable".parse::<FilteredProbeLine>());
    }
}
