use std::path::{Path, PathBuf};

use anyhow::Context;
use derive_builder::Builder;
use serde::Serialize;
use tracing::{debug, info};

use crate::errors::{FormatError, TypeMismatchError};
use crate::fold::FoldingOracle;
use crate::output::{write_filtered_file, FilterThresholds, FilteredProbeFile};
use crate::structs::StructureFilteredProbeRecord;
use crate::util::sibling_with_suffix;

pub const PROBABILITY_FILTERED_MARKER: &str = "_pDup_filtered";
pub const STRUCTURE_FILTERED_FILE_SUFFIX: &str = "_pDup_MFE_filtered.bed";

/// Read an MFE threshold given as text.
pub fn parse_mfe_threshold(value: &str) -> Result<f64, TypeMismatchError> {
    match value.trim().parse::<f64>() {
        Ok(mfe) if !mfe.is_nan() => Ok(mfe),
        _ => Err(TypeMismatchError {
            name: "MFE threshold",
            value: value.to_string(),
        }),
    }
}

/// `x_pDup_filtered.bed` becomes `x_pDup_MFE_filtered.bed`; any other
/// name gets the suffix appended to its stem.
pub fn default_output_path(input_path: impl AsRef<Path>) -> PathBuf {
    let input_path = input_path.as_ref();
    let file_name = input_path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    match file_name.split_once(PROBABILITY_FILTERED_MARKER) {
        Some((prefix, _)) => {
            input_path.with_file_name(format!("{prefix}{STRUCTURE_FILTERED_FILE_SUFFIX}"))
        }
        None => sibling_with_suffix(input_path, STRUCTURE_FILTERED_FILE_SUFFIX),
    }
}

#[derive(Builder, Debug, Clone)]
#[builder(setter(into))]
pub struct StructureFilterConfig {
    /// A probability-filtered probe file
    pub input_path: PathBuf,
    /// Probes must have a minimum free energy strictly above this
    pub mfe_threshold: f64,
    #[builder(setter(into, strip_option), default)]
    pub output_path: Option<PathBuf>,
    #[builder(default = "false")]
    pub allow_overwrite: bool,
}

impl StructureFilterConfig {
    pub fn resolved_output_path(&self) -> PathBuf {
        self.output_path
            .clone()
            .unwrap_or_else(|| default_output_path(&self.input_path))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StructureFilterSummary {
    pub input_probes: usize,
    pub passed: usize,
    pub thresholds: FilterThresholds,
    pub output_path: PathBuf,
    pub survivors: Vec<StructureFilteredProbeRecord>,
}

/// Keep the probes of a probability-filtered file whose secondary
/// structure MFE is strictly above the threshold.
///
/// The oracle is called once per probe, in file order. Survivors keep
/// their upstream index and line, with the MFE appended.
pub fn filter_secondary_structure(
    config: &StructureFilterConfig,
    oracle: &mut dyn FoldingOracle,
) -> anyhow::Result<StructureFilterSummary> {
    if config.mfe_threshold.is_nan() {
        return Err(TypeMismatchError {
            name: "MFE threshold",
            value: config.mfe_threshold.to_string(),
        }
        .into());
    }

    let input = FilteredProbeFile::read(&config.input_path)?;

    if input.thresholds.mfe_threshold.is_some() {
        return Err(anyhow::Error::new(FormatError::Header {
            header: input.thresholds.header(input.lines.len()),
        })
        .context(format!(
            "{} has already been filtered by secondary structure",
            config.input_path.to_string_lossy()
        )));
    }

    let mut survivors = vec![];
    let mut survivor_lines = vec![];
    for line in &input.lines {
        let sequence = &line.probe.sequence;
        let mfe = oracle
            .minimum_free_energy(sequence)
            .with_context(|| format!("failed to compute MFE for probe {}", line.probe.index))?;

        debug!("probe {} ({sequence}): MFE {mfe}", line.probe.index);

        if mfe > config.mfe_threshold {
            survivor_lines.push(line.append_mfe(mfe));
            survivors.push(line.with_mfe(mfe));
        }
    }

    let thresholds = FilterThresholds {
        mfe_threshold: Some(config.mfe_threshold),
        ..input.thresholds
    };

    let output_path = config.resolved_output_path();
    write_filtered_file(
        &output_path,
        config.allow_overwrite,
        &thresholds.header(survivors.len()),
        &survivor_lines,
    )?;

    info!(
        "{}/{} probes passed secondary structure filtering ({}), written to {}",
        survivors.len(),
        input.lines.len(),
        thresholds,
        output_path.to_string_lossy()
    );

    Ok(StructureFilterSummary {
        input_probes: input.lines.len(),
        passed: survivors.len(),
        thresholds,
        output_path,
        survivors,
    })
}
