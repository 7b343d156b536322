use std::path::{Path, PathBuf};

use derive_builder::Builder;
use indexmap::IndexSet;
use serde::Serialize;
use tracing::{debug, info};

use crate::classifier::{DuplexClassifier, ProbeFeatures, Temperature};
use crate::errors::{RecordKind, TypeMismatchError};
use crate::output::{write_probability_filtered, FilterThresholds};
use crate::structs::{AlignmentRecord, FilteredProbeRecord, ProbabilityVector};
use crate::util::sibling_with_suffix;
use crate::validate::{
    check_exists, check_extension, probe_sequence_set, read_alignment_records,
    read_probe_records, ALIGNMENT_EXTENSION, PROBE_EXTENSION,
};

/// Appended to the probe file stem to name the probability-filtered output.
pub const PROBABILITY_FILTERED_FILE_SUFFIX: &str = "_pDup_filtered.bed";

pub fn default_output_path(probe_path: impl AsRef<Path>) -> PathBuf {
    sibling_with_suffix(probe_path, PROBABILITY_FILTERED_FILE_SUFFIX)
}

#[derive(Builder, Debug, Clone)]
#[builder(setter(into))]
pub struct ProbabilityFilterConfig {
    /// SAM-like aligner output for the candidate probes
    pub alignment_path: PathBuf,
    /// BED-like probe coordinate file
    pub probe_path: PathBuf,
    /// The temperature the probability threshold applies to
    pub temperature: Temperature,
    /// Probes must have a duplex probability strictly above this
    pub probability_threshold: f64,
    #[builder(setter(into, strip_option), default)]
    pub output_path: Option<PathBuf>,
    #[builder(default = "false")]
    pub allow_overwrite: bool,
}

impl ProbabilityFilterConfig {
    pub fn resolved_output_path(&self) -> PathBuf {
        self.output_path
            .clone()
            .unwrap_or_else(|| default_output_path(&self.probe_path))
    }

    pub fn thresholds(&self) -> FilterThresholds {
        FilterThresholds {
            temperature: self.temperature,
            probability_threshold: self.probability_threshold,
            mfe_threshold: None,
        }
    }
}

/// A probe from the alignment file that is also in the probe set, scored at every temperature.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredProbe {
    pub sequence: String,
    pub alignment_score: i64,
    pub probabilities: ProbabilityVector,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProbabilityFilterSummary {
    pub alignment_records: usize,
    pub probe_records: usize,
    pub scored_probes: usize,
    pub passed: usize,
    pub thresholds: FilterThresholds,
    pub output_path: PathBuf,
    pub survivors: Vec<FilteredProbeRecord>,
}

/// Score every alignment record whose sequence is in the probe set.
///
/// This is an exact sequence join: the output follows the alignment file order,
/// and probes without an alignment record are dropped.
pub fn score_probes(
    alignments: &[AlignmentRecord],
    probe_sequences: &IndexSet<String>,
    classifier: &DuplexClassifier,
) -> Vec<ScoredProbe> {
    alignments
        .iter()
        .filter(|a| probe_sequences.contains(&a.sequence))
        .map(|a| ScoredProbe {
            sequence: a.sequence.clone(),
            alignment_score: a.alignment_score,
            probabilities: classifier
                .probability_vector(&ProbeFeatures::new(&a.sequence, a.alignment_score)),
        })
        .collect()
}

/// Keep the probes above the threshold at `temperature`, put them in
/// probe file order, and give them 1-based indices.
pub fn select_survivors(
    scored: Vec<ScoredProbe>,
    probe_sequences: &IndexSet<String>,
    temperature: Temperature,
    probability_threshold: f64,
) -> Vec<FilteredProbeRecord> {
    let mut passed: Vec<ScoredProbe> = scored
        .into_iter()
        .filter(|p| p.probabilities.at(temperature) > probability_threshold)
        .collect();

    // sort_by_key is stable, so repeated sequences keep alignment file order
    passed.sort_by_key(|p| probe_sequences.get_index_of(&p.sequence));

    passed
        .into_iter()
        .enumerate()
        .map(|(idx, p)| FilteredProbeRecord {
            index: idx + 1,
            sequence: p.sequence,
            probabilities: p.probabilities,
        })
        .collect()
}

/// The duplex probability at `temperature` (C) of every probe
/// in the probe file that has a matching alignment record.
pub fn compute_probabilities(
    alignment_path: impl AsRef<Path>,
    probe_path: impl AsRef<Path>,
    temperature: u32,
) -> anyhow::Result<Vec<f64>> {
    let temperature = Temperature::try_from(temperature)?;

    let alignments = read_alignment_records(alignment_path)?;
    let probe_sequences = probe_sequence_set(&read_probe_records(probe_path)?);

    Ok(
        score_probes(&alignments, &probe_sequences, &DuplexClassifier::default())
            .iter()
            .map(|p| p.probabilities.at(temperature))
            .collect(),
    )
}

pub fn filter_duplex_probability(
    config: &ProbabilityFilterConfig,
) -> anyhow::Result<ProbabilityFilterSummary> {
    check_exists(&config.alignment_path)?;
    check_exists(&config.probe_path)?;
    check_extension(
        &config.alignment_path,
        ALIGNMENT_EXTENSION,
        RecordKind::Alignment,
    )?;
    check_extension(&config.probe_path, PROBE_EXTENSION, RecordKind::Probe)?;

    if !config.probability_threshold.is_finite() {
        return Err(TypeMismatchError {
            name: "probability threshold",
            value: config.probability_threshold.to_string(),
        }
        .into());
    }

    let alignments = read_alignment_records(&config.alignment_path)?;
    let probes = read_probe_records(&config.probe_path)?;
    let probe_sequences = probe_sequence_set(&probes);
    debug!(
        "{} alignment records, {} probe records, {} distinct probe sequences",
        alignments.len(),
        probes.len(),
        probe_sequences.len()
    );

    let scored = score_probes(&alignments, &probe_sequences, &DuplexClassifier::default());
    let scored_probes = scored.len();

    let survivors = select_survivors(
        scored,
        &probe_sequences,
        config.temperature,
        config.probability_threshold,
    );

    let thresholds = config.thresholds();
    let output_path = config.resolved_output_path();
    write_probability_filtered(
        &output_path,
        config.allow_overwrite,
        &thresholds,
        &survivors,
    )?;

    info!(
        "{}/{} probes passed duplex filtering ({}), written to {}",
        survivors.len(),
        scored_probes,
        thresholds,
        output_path.to_string_lossy()
    );

    Ok(ProbabilityFilterSummary {
        alignment_records: alignments.len(),
        probe_records: probes.len(),
        scored_probes,
        passed: survivors.len(),
        thresholds,
        output_path,
        survivors,
    })
}
