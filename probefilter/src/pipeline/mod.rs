mod curves;
pub use curves::*;

mod duplex;
pub use duplex::*;

mod run;
pub use run::*;

mod structure;
pub use structure::*;

use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use serde::Serialize;
use tracing::info;

use libprobefilter::util::PathBufExt;

/// Write a run summary as pretty JSON.
pub fn write_summary<T: Serialize>(
    summary: &T,
    path: &PathBuf,
    allow_overwrite: bool,
) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(summary).context("failed to serialize summary")?;

    let mut writer = path.open(allow_overwrite)?;
    writeln!(writer, "{json}")?;
    writer.flush()?;

    info!("summary written to {}", path.to_string_lossy());
    Ok(())
}
