use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result};
use thiserror::Error;
use tracing::{debug, error};

#[cfg(test)]
#[ctor::ctor]
fn init_backtrace() {
    color_backtrace::install();
}

#[derive(Error, Debug)]
#[error("command exited without success")]
struct CommandExitStatusError;

/// An extension trait that is intended to add run methods to the std::process::Command struct.
pub trait CommandExt {
    fn run(&mut self) -> Result<()>;
    fn run_stdout(&mut self) -> Result<String>;
}

impl CommandExt for Command {
    fn run(&mut self) -> Result<()> {
        self.run_stdout().map(|_| ())
    }

    fn run_stdout(&mut self) -> Result<String> {
        debug!("running command: {self:?}");
        let output = self.output().context("failed to run command")?;

        let stdout =
            String::from_utf8(output.stdout).context("failed to convert stdout to UTF8")?;

        match output.status.success() {
            true => Ok(stdout),
            false => {
                let stderr = std::str::from_utf8(&output.stderr)
                    .context("failed to convert stderr to UTF8")?;

                error!("command:\n{self:?}\n");
                error!("stdout:\n{stdout}\n");
                error!("stderr:\n{stderr}\n");
                Err(CommandExitStatusError.into())
            }
        }
    }
}

pub trait PathBufExt {
    fn open(&self, allow_overwrite: bool) -> Result<BufWriter<File>>;
}

impl PathBufExt for PathBuf {
    fn open(&self, allow_overwrite: bool) -> Result<BufWriter<File>> {
        let mut file_options = File::options();

        if allow_overwrite {
            file_options.write(true).truncate(true).create(true);
        } else {
            file_options.write(true).create_new(true);
        };

        let file = file_options
            .open(self)
            .context(format!("failed to create file: {}", self.to_string_lossy()))?;

        Ok(BufWriter::new(file))
    }
}

/// Produce a sibling of `path` named `<file stem><suffix>`.
///
/// The stem is cut at the first '.', so `probes.final.bed` + `_x.bed` gives `probes_x.bed`.
pub fn sibling_with_suffix(path: impl AsRef<Path>, suffix: &str) -> PathBuf {
    let path = path.as_ref();
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let stem = file_name.split('.').next().unwrap_or_default();
    path.with_file_name(format!("{stem}{suffix}"))
}
