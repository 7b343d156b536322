use serde::Serialize;
use tracing::info;

use libprobefilter::filter::{
    filter_duplex_probability, filter_secondary_structure, ProbabilityFilterSummary,
    StructureFilterSummary,
};

use crate::args::RunArgs;
use crate::pipeline::{folding_oracle, probability_config, structure_config, write_summary};

#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub duplex: ProbabilityFilterSummary,
    pub structure: StructureFilterSummary,
}

pub fn run(args: &RunArgs) -> anyhow::Result<RunSummary> {
    // fail on a missing folding program before any output is written
    let mut oracle = folding_oracle(&args.fold_args)?;

    let duplex_config = probability_config(
        &args.alignment_path,
        &args.probe_path,
        &args.threshold_args,
        None,
        &args.common_args,
    )?;
    let duplex = filter_duplex_probability(&duplex_config)?;

    let mfe_config = structure_config(
        &duplex.output_path,
        args.mfe_threshold,
        None,
        &args.common_args,
    )?;
    let structure = filter_secondary_structure(&mfe_config, oracle.as_mut())?;

    info!(
        "{}/{} probes passed both filters",
        structure.passed, duplex.probe_records
    );

    let summary = RunSummary { duplex, structure };

    if let Some(path) = &args.common_args.summary_path {
        write_summary(&summary, path, args.common_args.allow_overwrite)?;
    }

    Ok(summary)
}
