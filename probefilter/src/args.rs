use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use libprobefilter::classifier::Temperature;
use libprobefilter::filter::parse_mfe_threshold;
use libprobefilter::fold::{DEFAULT_FOLD_PROGRAM, DEFAULT_FOLD_TEMPERATURE};

#[derive(Subcommand)]
pub enum SubCommands {
    #[command(about = "Filter probes by their predicted probability of off-target duplex formation")]
    Duplex(DuplexArgs),
    #[command(about = "Filter probability-filtered probes by secondary structure stability")]
    Structure(StructureArgs),
    #[command(about = "Run the duplex and structure filters back to back")]
    Run(RunArgs),
    #[command(about = "Print the duplex probability curves of a filtered probe file")]
    Curves(CurvesArgs),
}

#[derive(Parser)]
#[command(name = "probefilter")]
#[command(
    about = "Filter hybridization probes by predicted duplex probability and secondary structure"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: SubCommands,

    /// Log at debug level (overridden by RUST_LOG)
    #[arg(short = 'v', long = "verbose", global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Args, Debug, Clone, Default)]
pub struct CommonArgs {
    /// Allow probefilter to overwrite files
    #[arg(short = 'q', long = "allow-overwrite", default_value_t = false)]
    pub allow_overwrite: bool,

    /// Write a JSON summary of the run to this path
    #[arg(long = "summary", value_name = "PATH")]
    pub summary_path: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct DuplexThresholdArgs {
    /// Hybridization temperature (C): one of 32, 37, 42, 47, 52, 57
    #[arg(short = 'T', long = "temperature", value_name = "C")]
    pub temperature: Temperature,

    /// Probes with a duplex probability strictly above this value pass
    #[arg(
        short = 'P',
        long = "probability",
        value_name = "F",
        allow_hyphen_values = true
    )]
    pub probability_threshold: f64,
}

#[derive(Args, Debug, Clone)]
pub struct FoldArgs {
    /// The folding program, called as `<PROG> <SEQUENCE> -t <C>`
    #[arg(long = "fold-cmd", value_name = "PROG", default_value = DEFAULT_FOLD_PROGRAM)]
    pub fold_program: String,

    /// The temperature (C) passed to the folding program
    #[arg(long = "fold-temp", value_name = "C", default_value_t = DEFAULT_FOLD_TEMPERATURE)]
    pub fold_temperature: f64,

    /// Look minimum free energies up in a tab-delimited `sequence<TAB>mfe` table
    /// instead of running a folding program
    #[arg(long = "mfe-table", value_name = "PATH")]
    pub mfe_table_path: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct DuplexArgs {
    /// Alignment file
    #[arg(value_name = "ALIGN.sam")]
    pub alignment_path: PathBuf,

    /// Probe coordinate file
    #[arg(value_name = "PROBES.bed")]
    pub probe_path: PathBuf,

    #[command(flatten)]
    pub threshold_args: DuplexThresholdArgs,

    /// Where to place the filtered probes [default: <PROBES>_pDup_filtered.bed]
    #[arg(short = 'o', long = "output", value_name = "PATH")]
    pub output_path: Option<PathBuf>,

    /// Arguments that are common across all probefilter subcommands
    #[command(flatten)]
    pub common_args: CommonArgs,
}

#[derive(Debug, Args)]
pub struct StructureArgs {
    /// A probability-filtered probe file
    #[arg(value_name = "FILTERED.bed")]
    pub input_path: PathBuf,

    /// Probes with a minimum free energy strictly above this value pass
    #[arg(
        short = 'M',
        long = "mfe",
        value_name = "F",
        allow_hyphen_values = true,
        value_parser = parse_mfe_threshold
    )]
    pub mfe_threshold: f64,

    /// Where to place the filtered probes [default: <FILTERED>_pDup_MFE_filtered.bed]
    #[arg(short = 'o', long = "output", value_name = "PATH")]
    pub output_path: Option<PathBuf>,

    #[command(flatten)]
    pub fold_args: FoldArgs,

    /// Arguments that are common across all probefilter subcommands
    #[command(flatten)]
    pub common_args: CommonArgs,
}

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Alignment file
    #[arg(value_name = "ALIGN.sam")]
    pub alignment_path: PathBuf,

    /// Probe coordinate file
    #[arg(value_name = "PROBES.bed")]
    pub probe_path: PathBuf,

    #[command(flatten)]
    pub threshold_args: DuplexThresholdArgs,

    /// Probes with a minimum free energy strictly above this value pass
    #[arg(
        short = 'M',
        long = "mfe",
        value_name = "F",
        allow_hyphen_values = true,
        value_parser = parse_mfe_threshold
    )]
    pub mfe_threshold: f64,

    #[command(flatten)]
    pub fold_args: FoldArgs,

    /// Arguments that are common across all probefilter subcommands
    #[command(flatten)]
    pub common_args: CommonArgs,
}

#[derive(Debug, Args)]
pub struct CurvesArgs {
    /// A probability- or structure-filtered probe file
    #[arg(value_name = "FILTERED.bed")]
    pub input_path: PathBuf,

    /// Only print the curve of the probe with this index
    #[arg(short = 'p', long = "probe", value_name = "N")]
    pub probe_index: Option<usize>,

    /// Print JSON instead of a tab-delimited table
    #[arg(long = "json", default_value_t = false)]
    pub json: bool,
}
