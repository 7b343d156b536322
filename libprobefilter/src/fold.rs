use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::process::Command;

use anyhow::Context;
use thiserror::Error;
use tracing::debug;

use crate::util::CommandExt;
use crate::validate::check_exists;

/// The folding program used when none is configured.
pub const DEFAULT_FOLD_PROGRAM: &str = "seqfold";
/// The folding temperature (C) used when none is configured.
pub const DEFAULT_FOLD_TEMPERATURE: f64 = 37.0;

/// Something that can predict the minimum free energy of a sequence's secondary structure.
pub trait FoldingOracle {
    fn minimum_free_energy(&mut self, sequence: &str) -> anyhow::Result<f64>;
}

impl<F> FoldingOracle for F
where
    F: FnMut(&str) -> anyhow::Result<f64>,
{
    fn minimum_free_energy(&mut self, sequence: &str) -> anyhow::Result<f64> {
        self(sequence)
    }
}

#[derive(Error, Debug)]
#[error("no minimum free energy in folding program output: {output}")]
pub struct MissingMfeOutputError {
    output: String,
}

#[derive(Error, Debug)]
#[error("no minimum free energy for sequence: {sequence}")]
pub struct MissingMfeError {
    sequence: String,
}

/// Pull the MFE out of a folding program's stdout.
///
/// This is the last token that reads as a float once parentheses are stripped,
/// which covers both a bare `-13.4` and a trailing `(-13.40)` on a structure line.
pub fn parse_mfe_output(output: &str) -> Option<f64> {
    output
        .split_whitespace()
        .rev()
        .map(|token| token.trim_matches(|c| c == '(' || c == ')'))
        .find_map(|token| token.parse::<f64>().ok())
}

/// Runs an external folding program once per sequence.
///
/// The program is called as `<program> <SEQUENCE> <args...>`.
#[derive(Debug, Clone)]
pub struct CommandFoldingOracle {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandFoldingOracle {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// `seqfold <SEQUENCE> -t <temperature>`
    pub fn seqfold(temperature: f64) -> Self {
        Self::new(
            DEFAULT_FOLD_PROGRAM,
            vec!["-t".to_string(), temperature.to_string()],
        )
    }

    /// Make sure the folding program can be run at all.
    pub fn check_installed(&self) -> anyhow::Result<()> {
        Command::new(&self.program)
            .arg("-h")
            .run()
            .context(format!(
                "{} does not appear to be in the system path",
                self.program
            ))
    }
}

impl FoldingOracle for CommandFoldingOracle {
    fn minimum_free_energy(&mut self, sequence: &str) -> anyhow::Result<f64> {
        let stdout = Command::new(&self.program)
            .arg(sequence)
            .args(&self.args)
            .run_stdout()
            .context(format!("failed to fold sequence: {sequence}"))?;

        let mfe = parse_mfe_output(&stdout).ok_or_else(|| MissingMfeOutputError {
            output: stdout.trim().to_string(),
        })?;

        debug!("{sequence}: {mfe}");
        Ok(mfe)
    }
}

/// Looks MFEs up in a precomputed two column (sequence, mfe) table.
#[derive(Debug, Clone, Default)]
pub struct MfeTableOracle {
    energies: HashMap<String, f64>,
}

impl MfeTableOracle {
    pub fn new(energies: HashMap<String, f64>) -> Self {
        Self { energies }
    }

    pub fn from_path(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        check_exists(path)?;

        let file = File::open(path).context(format!(
            "failed to open MFE table: {}",
            path.to_string_lossy()
        ))?;

        let mut energies = HashMap::new();
        for (line_idx, line) in BufReader::new(file).lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }

            let mut tokens = line.split('\t').map(str::trim);
            let (sequence, mfe) = match (tokens.next(), tokens.next()) {
                (Some(sequence), Some(mfe)) => (sequence, mfe),
                _ => anyhow::bail!(
                    "expected <sequence>\\t<mfe> on line {} of {}",
                    line_idx + 1,
                    path.to_string_lossy()
                ),
            };

            let mfe = mfe.parse::<f64>().context(format!(
                "invalid MFE on line {} of {}",
                line_idx + 1,
                path.to_string_lossy()
            ))?;
            energies.insert(sequence.to_string(), mfe);
        }

        Ok(Self { energies })
    }
}

impl FoldingOracle for MfeTableOracle {
    fn minimum_free_energy(&mut self, sequence: &str) -> anyhow::Result<f64> {
        self.energies.get(sequence).copied().ok_or_else(|| {
            MissingMfeError {
                sequence: sequence.to_string(),
            }
            .into()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::{assert, let_assert};
    use std::fs;

    #[test]
    fn test_parse_mfe_output() {
        assert!(parse_mfe_output("-13.4\n") == Some(-13.4));
        assert!(parse_mfe_output("GGGAGGTC\n((((...))))  (-1.20)\n") == Some(-1.2));
        assert!(parse_mfe_output("0\n") == Some(0.0));
        assert!(parse_mfe_output("no structure\n") == None);
        assert!(parse_mfe_output("") == None);
    }

    #[test]
    fn test_closure_oracle() -> anyhow::Result<()> {
        let mut calls = 0;
        let mut oracle = |sequence: &str| -> anyhow::Result<f64> {
            calls += 1;
            Ok(sequence.len() as f64)
        };
        assert!(oracle.minimum_free_energy("GATC")? == 4.0);
        assert!(calls == 1);
        Ok(())
    }

    #[test]
    fn test_mfe_table_oracle() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("mfe.tsv");
        fs::write(&path, "# sequence\tmfe\nGATC\t-5.0\nGGCC\t2.0\n\n")?;

        let mut oracle = MfeTableOracle::from_path(&path)?;
        assert!(oracle.minimum_free_energy("GATC")? == -5.0);
        assert!(oracle.minimum_free_energy("GGCC")? == 2.0);

        let_assert!(Err(err) = oracle.minimum_free_energy("AAAA"));
        assert!(err.to_string() == "no minimum free energy for sequence: AAAA");
        Ok(())
    }

    #[test]
    fn test_mfe_table_bad_line() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("mfe.tsv");
        fs::write(&path, "GATC\tlow\n")?;
        let_assert!(Err(_) = MfeTableOracle::from_path(&path));

        fs::write(&path, "GATC\n")?;
        let_assert!(Err(_) = MfeTableOracle::from_path(&path));
        Ok(())
    }

    #[test]
    fn test_missing_fold_program() {
        let mut oracle = CommandFoldingOracle::new("probefilter-no-such-fold", vec![]);
        let_assert!(Err(_) = oracle.check_installed());
        let_assert!(Err(_) = oracle.minimum_free_energy("GATC"));
        assert!(CommandFoldingOracle::seqfold(37.0).args == vec!["-t", "37"]);
    }
}
