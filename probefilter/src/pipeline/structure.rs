use std::path::PathBuf;

use libprobefilter::filter::{
    filter_secondary_structure, StructureFilterConfig, StructureFilterConfigBuilder,
    StructureFilterSummary,
};
use libprobefilter::fold::{CommandFoldingOracle, FoldingOracle, MfeTableOracle};

use crate::args::{CommonArgs, FoldArgs, StructureArgs};
use crate::pipeline::write_summary;

/// Build the folding oracle the arguments ask for.
///
/// An MFE table takes precedence over the folding program.
pub fn folding_oracle(args: &FoldArgs) -> anyhow::Result<Box<dyn FoldingOracle>> {
    match &args.mfe_table_path {
        Some(path) => Ok(Box::new(MfeTableOracle::from_path(path)?)),
        None => {
            let oracle = CommandFoldingOracle::new(
                &args.fold_program,
                vec!["-t".to_string(), args.fold_temperature.to_string()],
            );
            oracle.check_installed()?;
            Ok(Box::new(oracle))
        }
    }
}

pub fn structure_config(
    input_path: &PathBuf,
    mfe_threshold: f64,
    output_path: Option<&PathBuf>,
    common_args: &CommonArgs,
) -> anyhow::Result<StructureFilterConfig> {
    let mut builder = StructureFilterConfigBuilder::default();
    builder
        .input_path(input_path)
        .mfe_threshold(mfe_threshold)
        .allow_overwrite(common_args.allow_overwrite);

    if let Some(path) = output_path {
        builder.output_path(path);
    }

    Ok(builder.build()?)
}

pub fn structure(args: &StructureArgs) -> anyhow::Result<StructureFilterSummary> {
    let config = structure_config(
        &args.input_path,
        args.mfe_threshold,
        args.output_path.as_ref(),
        &args.common_args,
    )?;

    let mut oracle = folding_oracle(&args.fold_args)?;
    let summary = filter_secondary_structure(&config, oracle.as_mut())?;

    if let Some(path) = &args.common_args.summary_path {
        write_summary(&summary, path, args.common_args.allow_overwrite)?;
    }

    Ok(summary)
}
