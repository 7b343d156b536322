use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;

use anyhow::Context;
use indexmap::IndexSet;
use tracing::debug;

use crate::errors::{FormatError, MissingFileError, RecordKind};
use crate::structs::{AlignmentRecord, ProbeRecord};

pub const ALIGNMENT_EXTENSION: &str = "sam";
pub const PROBE_EXTENSION: &str = "bed";

/// Fail with a MissingFileError if the path doesn't exist.
pub fn check_exists(path: impl AsRef<Path>) -> anyhow::Result<()> {
    let path = path.as_ref();
    match path.exists() {
        true => Ok(()),
        false => Err(MissingFileError {
            path: path.to_string_lossy().to_string(),
        }
        .into()),
    }
}

/// Fail with a FormatError if the file name doesn't end with `.<extension>`.
pub fn check_extension(
    path: impl AsRef<Path>,
    extension: &str,
    kind: RecordKind,
) -> anyhow::Result<()> {
    let path = path.as_ref();
    match path.extension().and_then(|e| e.to_str()) {
        Some(e) if e == extension => Ok(()),
        _ => Err(FormatError::FileExtension {
            path: path.to_string_lossy().to_string(),
            kind,
        }
        .into()),
    }
}

/// Parse every line of a file into records, failing on the first bad line.
///
/// Nothing is returned unless the entire file is valid.
pub fn read_records<T>(path: impl AsRef<Path>) -> anyhow::Result<Vec<T>>
where
    T: FromStr<Err = FormatError>,
{
    let path = path.as_ref();
    check_exists(path)?;

    let file = File::open(path).context(format!(
        "failed to open file: {}",
        path.to_string_lossy()
    ))?;

    let mut records = vec![];
    for (line_idx, line) in BufReader::new(file).lines().enumerate() {
        let line = line.context(format!(
            "failed to read line {} of {}",
            line_idx + 1,
            path.to_string_lossy()
        ))?;

        let record = line.parse::<T>().context(format!(
            "invalid record on line {} of {}",
            line_idx + 1,
            path.to_string_lossy()
        ))?;
        records.push(record);
    }

    debug!(
        "validated {} records in {}",
        records.len(),
        path.to_string_lossy()
    );
    Ok(records)
}

pub fn read_alignment_records(path: impl AsRef<Path>) -> anyhow::Result<Vec<AlignmentRecord>> {
    read_records(path)
}

pub fn read_probe_records(path: impl AsRef<Path>) -> anyhow::Result<Vec<ProbeRecord>> {
    read_records(path)
}

/// The distinct probe sequences, in the order they first appear in the probe file.
pub fn probe_sequence_set(probes: &[ProbeRecord]) -> IndexSet<String> {
    probes.iter().map(|p| p.sequence.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structs::alignment_record::tests::alignment_line;
    use assert2::{assert, let_assert};
    use std::fs;

    #[test]
    fn test_check_exists() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("nan.sam");
        let_assert!(Err(err) = check_exists(&path));
        let_assert!(Some(missing) = err.downcast_ref::<MissingFileError>());
        assert!(missing.path == path.to_string_lossy());
        assert!(err.to_string().ends_with("nan.sam does not exist"));
        Ok(())
    }

    #[test]
    fn test_check_extension() {
        let_assert!(Ok(()) = check_extension("a/b.sam", ALIGNMENT_EXTENSION, RecordKind::Alignment));
        let_assert!(Err(err) = check_extension("blank.txt", PROBE_EXTENSION, RecordKind::Probe));
        assert!(err.to_string() == "the file blank.txt is not a BED file");
        let_assert!(Err(_) = check_extension("probes", PROBE_EXTENSION, RecordKind::Probe));
    }

    #[test]
    fn test_read_alignment_records() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("probes.sam");
        fs::write(
            &path,
            format!(
                "{}\n{}\n",
                alignment_line("GATC", "AS:i:3"),
                alignment_line("GGCC", "AS:i:4")
            ),
        )?;

        let records = read_alignment_records(&path)?;
        assert!(records.len() == 2);
        assert!(records[1].sequence == "GGCC");
        assert!(records[1].alignment_score == 4);
        Ok(())
    }

    #[test]
    fn test_one_bad_line_fails_the_file() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("probes.sam");
        fs::write(
            &path,
            format!(
                "{}\n{}\n{}\n",
                alignment_line("GATC", "AS:i:3"),
                alignment_line("GANC", "AS:i:4"),
                alignment_line("GGCC", "AS:i:5"),
            ),
        )?;

        let_assert!(Err(err) = read_alignment_records(&path));
        let_assert!(Some(FormatError::SequenceAlphabet { .. }) = err.downcast_ref::<FormatError>());
        assert!(err.to_string().starts_with("invalid record on line 2"));
        Ok(())
    }

    #[test]
    fn test_read_probe_records_and_set() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("probes.bed");
        fs::write(
            &path,
            "chr1\t1\t5\tGGCC\t1.0\nchr1\t10\t14\tGATC\t2.0\nchr2\t1\t5\tGGCC\t3.0\n",
        )?;

        let probes = read_probe_records(&path)?;
        assert!(probes.len() == 3);

        let set = probe_sequence_set(&probes);
        assert!(set.len() == 2);
        assert!(set.get_index_of("GGCC") == Some(0));
        assert!(set.get_index_of("GATC") == Some(1));
        Ok(())
    }

    #[test]
    fn test_empty_file_is_valid() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("empty.bed");
        fs::write(&path, "")?;
        assert!(read_probe_records(&path)?.is_empty());
        Ok(())
    }
}
