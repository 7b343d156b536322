use std::fmt::{Display, Formatter};
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

use crate::classifier::Temperature;
use crate::errors::FormatError;
use crate::structs::{FilteredProbeLine, FilteredProbeRecord};
use crate::util::PathBufExt;
use crate::validate::check_exists;

// this static regex matches the header line of a filtered probe file
lazy_static! {
    static ref HEADER_RE: Regex = Regex::new(
        r"^(\d+) probes passed filtering with thresholds set to T=(\d+)C and PDup=(\S+)(?: and MFE=(\S+))?$"
    )
    .unwrap();
}

/// The thresholds a filtered probe file was produced with.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FilterThresholds {
    pub temperature: Temperature,
    pub probability_threshold: f64,
    pub mfe_threshold: Option<f64>,
}

impl Display for FilterThresholds {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "T={}C and PDup={}",
            self.temperature, self.probability_threshold
        )?;
        if let Some(mfe) = self.mfe_threshold {
            write!(f, " and MFE={mfe}")?;
        }
        Ok(())
    }
}

impl FilterThresholds {
    /// The first line of a filtered probe file.
    pub fn header(&self, passed: usize) -> String {
        format!("{passed} probes passed filtering with thresholds set to {self}")
    }

    /// Parse a header line into the number of probes it declares and its thresholds.
    pub fn from_header(header: &str) -> Result<(usize, Self), FormatError> {
        let header = header.trim();
        let err = || FormatError::Header {
            header: header.to_string(),
        };

        let captures = HEADER_RE.captures(header).ok_or_else(err)?;

        let passed = captures[1].parse::<usize>().map_err(|_| err())?;
        let temperature = captures[2].parse::<Temperature>().map_err(|_| err())?;
        let probability_threshold = captures[3].parse::<f64>().map_err(|_| err())?;
        let mfe_threshold = match captures.get(4) {
            Some(m) => Some(m.as_str().parse::<f64>().map_err(|_| err())?),
            None => None,
        };

        Ok((
            passed,
            Self {
                temperature,
                probability_threshold,
                mfe_threshold,
            },
        ))
    }
}

/// A parsed probability- or structure-filtered probe file.
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredProbeFile {
    pub thresholds: FilterThresholds,
    pub lines: Vec<FilteredProbeLine>,
}

impl FilteredProbeFile {
    pub fn read(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        check_exists(path)?;

        let file = File::open(path).context(format!(
            "failed to open filtered probe file: {}",
            path.to_string_lossy()
        ))?;
        let mut lines = BufReader::new(file).lines();

        let header = match lines.next() {
            Some(line) => line.context("failed to read filtered probe header")?,
            None => String::new(),
        };

        let (declared, thresholds) = FilterThresholds::from_header(&header).context(format!(
            "invalid header in {}",
            path.to_string_lossy()
        ))?;

        let mut records = vec![];
        for (line_idx, line) in lines.enumerate() {
            let line = line.context("failed to read filtered probe record")?;
            // header is line 1
            let record = line.parse::<FilteredProbeLine>().context(format!(
                "invalid record on line {} of {}",
                line_idx + 2,
                path.to_string_lossy()
            ))?;
            records.push(record);
        }

        if declared != records.len() {
            return Err(anyhow::Error::new(FormatError::RecordCount {
                declared,
                found: records.len(),
            })
            .context(format!("invalid header in {}", path.to_string_lossy())));
        }

        Ok(Self {
            thresholds,
            lines: records,
        })
    }
}

/// Write a header followed by one line per record.
///
/// Everything is rendered before the file is touched.
pub fn write_filtered_file(
    path: &PathBuf,
    allow_overwrite: bool,
    header: &str,
    record_lines: &[String],
) -> anyhow::Result<()> {
    let mut text = String::with_capacity(header.len() + record_lines.len() * 96);
    text.push_str(header);
    text.push('\n');
    record_lines.iter().for_each(|line| {
        text.push_str(line);
        text.push('\n');
    });

    let mut writer = path.open(allow_overwrite)?;
    writer
        .write_all(text.as_bytes())
        .with_context(|| format!("failed to write to: {}", path.to_string_lossy()))?;
    writer.flush()?;
    Ok(())
}

pub fn write_probability_filtered(
    path: &PathBuf,
    allow_overwrite: bool,
    thresholds: &FilterThresholds,
    records: &[FilteredProbeRecord],
) -> anyhow::Result<()> {
    let lines: Vec<String> = records.iter().map(|r| r.to_string()).collect();
    write_filtered_file(
        path,
        allow_overwrite,
        &thresholds.header(records.len()),
        &lines,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structs::ProbabilityVector;
    use assert2::{assert, let_assert};
    use std::fs;

    #[test]
    fn test_header_round_trip() {
        let thresholds = FilterThresholds {
            temperature: Temperature::C42,
            probability_threshold: 0.2,
            mfe_threshold: None,
        };
        let header = thresholds.header(12);
        assert!(header == "12 probes passed filtering with thresholds set to T=42C and PDup=0.2");
        let_assert!(Ok((12, parsed)) = FilterThresholds::from_header(&header));
        assert!(parsed == thresholds);

        let thresholds = FilterThresholds {
            mfe_threshold: Some(-3.5),
            ..thresholds
        };
        let header = thresholds.header(1);
        assert!(header.ends_with("T=42C and PDup=0.2 and MFE=-3.5"));
        let_assert!(Ok((1, parsed)) = FilterThresholds::from_header(&format!("{header} \n")));
        assert!(parsed == thresholds);
    }

    #[test]
    fn test_bad_headers() {
        let_assert!(Err(FormatError::Header { .. }) = FilterThresholds::from_header(""));
        let_assert!(Err(FormatError::Header { .. }) = FilterThresholds::from_header(
            "3 probes passed filtering with thresholds set to T=40C and PDup=0.2"
        ));
        let_assert!(Err(FormatError::Header { .. }) = FilterThresholds::from_header(
            "3 probes passed filtering with thresholds set to T=XXXC and PDup=XXX and MFE=0"
        ));
    }

    #[test]
    fn test_write_and_read_filtered_file() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("probes_pDup_filtered.bed");
        let thresholds = FilterThresholds {
            temperature: Temperature::C37,
            probability_threshold: 0.5,
            mfe_threshold: None,
        };
        let records = vec![
            FilteredProbeRecord {
                index: 1,
                sequence: "GATC".to_string(),
                probabilities: ProbabilityVector([0.9, 0.8, 0.7, 0.6, 0.5, 0.4]),
            },
            FilteredProbeRecord {
                index: 2,
                sequence: "GGCC".to_string(),
                probabilities: ProbabilityVector([0.99, 0.98, 0.97, 0.96, 0.95, 0.94]),
            },
        ];

        write_probability_filtered(&path, false, &thresholds, &records)?;
        let_assert!(Err(_) = write_probability_filtered(&path, false, &thresholds, &records));

        let file = FilteredProbeFile::read(&path)?;
        assert!(file.thresholds == thresholds);
        assert!(file.lines.len() == 2);
        assert!(file.lines[1].probe == records[1]);
        Ok(())
    }

    #[test]
    fn test_record_count_mismatch() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("probes_pDup_filtered.bed");
        fs::write(
            &path,
            "2 probes passed filtering with thresholds set to T=37C and PDup=0.5\n\
             1 \t GATC \t [0.9, 0.8, 0.7, 0.6, 0.5, 0.4]\n",
        )?;
        let_assert!(Err(err) = FilteredProbeFile::read(&path));
        let_assert!(Some(FormatError::RecordCount { declared: 2, found: 1 }) =
            err.downcast_ref::<FormatError>());
        Ok(())
    }
}
