use std::path::PathBuf;

use libprobefilter::filter::{
    filter_duplex_probability, ProbabilityFilterConfig, ProbabilityFilterConfigBuilder,
    ProbabilityFilterSummary,
};

use crate::args::{CommonArgs, DuplexArgs, DuplexThresholdArgs};
use crate::pipeline::write_summary;

pub fn probability_config(
    alignment_path: &PathBuf,
    probe_path: &PathBuf,
    threshold_args: &DuplexThresholdArgs,
    output_path: Option<&PathBuf>,
    common_args: &CommonArgs,
) -> anyhow::Result<ProbabilityFilterConfig> {
    let mut builder = ProbabilityFilterConfigBuilder::default();
    builder
        .alignment_path(alignment_path)
        .probe_path(probe_path)
        .temperature(threshold_args.temperature)
        .probability_threshold(threshold_args.probability_threshold)
        .allow_overwrite(common_args.allow_overwrite);

    if let Some(path) = output_path {
        builder.output_path(path);
    }

    Ok(builder.build()?)
}

pub fn duplex(args: &DuplexArgs) -> anyhow::Result<ProbabilityFilterSummary> {
    let config = probability_config(
        &args.alignment_path,
        &args.probe_path,
        &args.threshold_args,
        args.output_path.as_ref(),
        &args.common_args,
    )?;

    let summary = filter_duplex_probability(&config)?;

    if let Some(path) = &args.common_args.summary_path {
        write_summary(&summary, path, args.common_args.allow_overwrite)?;
    }

    Ok(summary)
}
