use std::io::Write;

use libprobefilter::curves::{read_curves, tabulate, CurveSelection};

use crate::args::CurvesArgs;

pub fn curves(args: &CurvesArgs, out: &mut impl Write) -> anyhow::Result<()> {
    let selection = match args.probe_index {
        Some(index) => CurveSelection::Probe(index),
        None => CurveSelection::All,
    };

    let plot = read_curves(&args.input_path, selection)?;

    match args.json {
        true => writeln!(out, "{}", serde_json::to_string_pretty(&plot)?)?,
        false => write!(out, "{}", tabulate(&plot))?,
    }
    Ok(())
}
