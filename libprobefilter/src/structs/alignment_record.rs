use std::str::FromStr;

use crate::alphabet::is_nucleotide_sequence;
use crate::errors::{FormatError, RecordKind};

/// The minimum number of tab-separated fields in an alignment line.
pub const ALIGNMENT_MIN_FIELDS: usize = 19;
/// The (0-based) field holding the probe sequence.
pub const ALIGNMENT_SEQUENCE_FIELD: usize = 9;
/// The (0-based) field holding the colon-delimited alignment score tag, e.g. AS:i:20
pub const ALIGNMENT_SCORE_TAG_FIELD: usize = 12;

/// One validated line of SAM-like aligner output.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignmentRecord {
    /// The aligned probe sequence
    pub sequence: String,
    /// The score pulled out of the third component of the score tag
    pub alignment_score: i64,
    /// The line the record was parsed from, without its line terminator
    pub raw: String,
}

fn parse_score_tag(tag: &str) -> Result<i64, FormatError> {
    if !tag.contains(':') {
        return Err(FormatError::ScoreTagSeparator {
            tag: tag.to_string(),
        });
    }

    let score_token = tag.split(':').nth(2).ok_or_else(|| FormatError::ScoreTag {
        tag: tag.to_string(),
    })?;

    if score_token.is_empty() || !score_token.bytes().all(|b| b.is_ascii_digit()) {
        return Err(FormatError::ScoreTag {
            tag: tag.to_string(),
        });
    }

    // all digits, so the only way this fails is overflow
    score_token.parse::<i64>().map_err(|_| FormatError::ScoreTag {
        tag: tag.to_string(),
    })
}

impl FromStr for AlignmentRecord {
    type Err = FormatError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim_end_matches(['\n', '\r']);
        let fields: Vec<&str> = line.split('\t').collect();

        if fields.len() < ALIGNMENT_MIN_FIELDS {
            return Err(FormatError::FieldCount {
                kind: RecordKind::Alignment,
                found: fields.len(),
                expected: ALIGNMENT_MIN_FIELDS,
            });
        }

        let sequence = fields[ALIGNMENT_SEQUENCE_FIELD];
        if !is_nucleotide_sequence(sequence) {
            return Err(FormatError::SequenceAlphabet {
                kind: RecordKind::Alignment,
                sequence: sequence.to_string(),
            });
        }

        let alignment_score = parse_score_tag(fields[ALIGNMENT_SCORE_TAG_FIELD])?;

        Ok(Self {
            sequence: sequence.to_string(),
            alignment_score,
            raw: line.to_string(),
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use assert2::{assert, let_assert};

    /// Build a 19 field alignment line around a sequence and a score tag.
    pub fn alignment_line(sequence: &str, tag: &str) -> String {
        let mut fields = vec![
            "probe_1", "0", "chr2L", "1001", "255", "10M", "*", "0", "0",
        ];
        fields.push(sequence);
        fields.extend(["IIIIIIIIII", "XS:i:0", tag]);
        fields.extend(["XN:i:0", "XM:i:0", "XO:i:0", "XG:i:0", "NM:i:0", "YT:Z:UU"]);
        fields.join("\t")
    }

    #[test]
    fn test_parse_alignment_record() {
        let line = alignment_line("GATCGATCGA", "AS:i:20");
        let_assert!(Ok(record) = line.parse::<AlignmentRecord>());
        assert!(record.sequence == "GATCGATCGA");
        assert!(record.alignment_score == 20);
        assert!(record.raw == line);
    }

    #[test]
    fn test_parse_alignment_record_strips_line_terminator() {
        let line = format!("{}\r\n", alignment_line("GGCC", "AS:i:7"));
        let_assert!(Ok(record) = line.parse::<AlignmentRecord>());
        assert!(record.alignment_score == 7);
        assert!(!record.raw.ends_with('\n'));
    }

    #[test]
    fn test_too_few_fields() {
        let line = "probe_1\t0\tchr2L\t1001";
        let_assert!(Err(FormatError::FieldCount { found, expected, .. }) =
            line.parse::<AlignmentRecord>());
        assert!(found == 4);
        assert!(expected == ALIGNMENT_MIN_FIELDS);
    }

    #[test]
    fn test_bad_sequence_alphabet() {
        let line = alignment_line("GATNGATCGA", "AS:i:20");
        let_assert!(Err(FormatError::SequenceAlphabet { sequence, .. }) =
            line.parse::<AlignmentRecord>());
        assert!(sequence == "GATNGATCGA");
    }

    #[test]
    fn test_bad_score_tags() {
        let_assert!(Err(FormatError::ScoreTagSeparator { .. }) =
            alignment_line("GATC", "AS-i-20").parse::<AlignmentRecord>());
        let_assert!(Err(FormatError::ScoreTag { .. }) =
            alignment_line("GATC", "AS:i").parse::<AlignmentRecord>());
        let_assert!(Err(FormatError::ScoreTag { .. }) =
            alignment_line("GATC", "AS:i:twenty").parse::<AlignmentRecord>());
        let_assert!(Err(FormatError::ScoreTag { .. }) =
            alignment_line("GATC", "AS:i:-3").parse::<AlignmentRecord>());
        let_assert!(Err(FormatError::ScoreTag { .. }) =
            alignment_line("GATC", "AS:i:").parse::<AlignmentRecord>());
    }
}
