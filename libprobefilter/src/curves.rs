use std::path::Path;

use serde::Serialize;
use strum::IntoEnumIterator;
use thiserror::Error;

use crate::classifier::Temperature;
use crate::output::FilteredProbeFile;
use crate::structs::FilteredProbeRecord;

/// Probes with a duplex probability below this line at the hybridization
/// temperature are unlikely to bind off-target.
pub const SUFFICIENT_BINDING_PROBABILITY: f64 = 0.2;

#[derive(Error, Debug, Clone, PartialEq)]
#[error("no probe with index {index}, {available} probes are available")]
pub struct ProbeNotFoundError {
    pub index: usize,
    pub available: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CurvePoint {
    pub temperature: Temperature,
    pub probability: f64,
}

/// Duplex probability as a function of temperature for one probe.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProbeCurve {
    pub index: usize,
    pub sequence: String,
    pub points: Vec<CurvePoint>,
}

impl From<&FilteredProbeRecord> for ProbeCurve {
    fn from(record: &FilteredProbeRecord) -> Self {
        Self {
            index: record.index,
            sequence: record.sequence.clone(),
            points: record
                .probabilities
                .points()
                .map(|(temperature, probability)| CurvePoint {
                    temperature,
                    probability,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CurveSelection {
    #[default]
    All,
    /// The probe with this 1-based index
    Probe(usize),
}

/// Everything needed to draw the probability curves of a filtered file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurvePlot {
    pub temperatures: Vec<u32>,
    pub reference_probability: f64,
    pub curves: Vec<ProbeCurve>,
}

impl CurvePlot {
    pub fn new(curves: Vec<ProbeCurve>) -> Self {
        Self {
            temperatures: Temperature::supported(),
            reference_probability: SUFFICIENT_BINDING_PROBABILITY,
            curves,
        }
    }
}

/// Read the probability curves out of a probability- or structure-filtered file.
pub fn read_curves(path: impl AsRef<Path>, selection: CurveSelection) -> anyhow::Result<CurvePlot> {
    let file = FilteredProbeFile::read(path)?;

    let curves: Vec<ProbeCurve> = match selection {
        CurveSelection::All => file.lines.iter().map(|l| ProbeCurve::from(&l.probe)).collect(),
        CurveSelection::Probe(index) => {
            let line = file
                .lines
                .iter()
                .find(|l| l.probe.index == index)
                .ok_or(ProbeNotFoundError {
                    index,
                    available: file.lines.len(),
                })?;
            vec![ProbeCurve::from(&line.probe)]
        }
    };

    Ok(CurvePlot::new(curves))
}

/// Render curves as a tab-delimited table, one row per probe.
pub fn tabulate(plot: &CurvePlot) -> String {
    let mut table = String::from("index\tsequence");
    Temperature::iter().for_each(|t| table.push_str(&format!("\t{t}")));
    table.push('\n');

    for curve in &plot.curves {
        table.push_str(&format!("{}\t{}", curve.index, curve.sequence));
        for point in &curve.points {
            table.push_str(&format!("\t{:?}", point.probability));
        }
        table.push('\n');
    }
    table
}
