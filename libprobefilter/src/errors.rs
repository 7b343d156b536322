use strum::Display;
use thiserror::Error;

/// The kind of input file a record was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum RecordKind {
    #[strum(serialize = "SAM")]
    Alignment,
    #[strum(serialize = "BED")]
    Probe,
    #[strum(serialize = "filtered probe")]
    Filtered,
}

/// An Error that is thrown when a record, a file header,
/// or a file name does not follow the expected schema.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormatError {
    #[error("{kind} record has {found} fields, expected at least {expected}")]
    FieldCount {
        kind: RecordKind,
        found: usize,
        expected: usize,
    },
    #[error("probe sequence must contain only G, A, T, C in {kind} file: {sequence}")]
    SequenceAlphabet { kind: RecordKind, sequence: String },
    #[error("alignment score tag does not contain expected characters: {tag}")]
    ScoreTagSeparator { tag: String },
    #[error("alignment score tag format is incorrect: {tag}")]
    ScoreTag { tag: String },
    #[error("start and end positions must be integers: {start}, {end}")]
    Coordinates { start: String, end: String },
    #[error("score must be a floating-point number: {score}")]
    ProbeScore { score: String },
    #[error("the file {path} is not a {kind} file")]
    FileExtension { path: String, kind: RecordKind },
    #[error("malformed filtered probe header: {header}")]
    Header { header: String },
    #[error("malformed filtered probe record: {line}")]
    FilteredRecord { line: String },
    #[error("filtered probe header declares {declared} probes, found {found}")]
    RecordCount { declared: usize, found: usize },
}

/// An Error that is thrown when an input path does not exist.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("the file {path} does not exist")]
pub struct MissingFileError {
    pub path: String,
}

/// An Error that is thrown when a temperature has no duplex classifier.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("invalid temperature value: {value}, valid values are {valid:?}")]
pub struct InvalidTemperatureError {
    pub value: String,
    pub valid: Vec<u32>,
}

/// An Error that is thrown when a threshold can't be read as a float.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{name} must be a float, unacceptable value: {value}")]
pub struct TypeMismatchError {
    pub name: &'static str,
    pub value: String,
}
