use std::str::FromStr;

use crate::alphabet::is_nucleotide_sequence;
use crate::errors::{FormatError, RecordKind};

/// The number of leading tab-separated fields that are validated in a probe line.
pub const PROBE_MIN_FIELDS: usize = 5;

/// One validated line of a BED-like probe coordinate file.
///
/// Columns past the fifth are tolerated and ignored.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeRecord {
    pub chromosome: String,
    pub start: i64,
    /// Not required to be >= start
    pub end: i64,
    pub sequence: String,
    pub score: f64,
}

impl FromStr for ProbeRecord {
    type Err = FormatError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim_end_matches(['\n', '\r']);
        let fields: Vec<&str> = line.split('\t').collect();

        if fields.len() < PROBE_MIN_FIELDS {
            return Err(FormatError::FieldCount {
                kind: RecordKind::Probe,
                found: fields.len(),
                expected: PROBE_MIN_FIELDS,
            });
        }

        let (start, end) = match (
            fields[1].trim().parse::<i64>(),
            fields[2].trim().parse::<i64>(),
        ) {
            (Ok(start), Ok(end)) => (start, end),
            _ => {
                return Err(FormatError::Coordinates {
                    start: fields[1].to_string(),
                    end: fields[2].to_string(),
                })
            }
        };

        let sequence = fields[3];
        if !is_nucleotide_sequence(sequence) {
            return Err(FormatError::SequenceAlphabet {
                kind: RecordKind::Probe,
                sequence: sequence.to_string(),
            });
        }

        let score = fields[4]
            .trim()
            .parse::<f64>()
            .map_err(|_| FormatError::ProbeScore {
                score: fields[4].to_string(),
            })?;

        Ok(Self {
            chromosome: fields[0].to_string(),
            start,
            end,
            sequence: sequence.to_string(),
            score,
        })
    }
}
