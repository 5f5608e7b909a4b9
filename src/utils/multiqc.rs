use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use tracing::debug;
use zip::ZipArchive;

use crate::utils::constants::{
    MULTIQC_COUNT_COLUMN, MULTIQC_GENERAL_STATS_NAME, MULTIQC_KEY_COLUMN,
};
use crate::utils::errors::CurationError;
use crate::utils::file_utils::require_input;

/// Raw read counts keyed by MultiQC sample name (e.g. `S1_R1_raw`), merged
/// from one or more MultiQC data archives. Read-only once built.
#[derive(Debug, Default)]
pub struct ReadCountTable {
    // key -> (count, archive it came from)
    counts: HashMap<String, (u64, PathBuf)>,
}

impl ReadCountTable {
    /// Loads and merges every archive in `archives`. All archives are checked
    /// for existence before any is parsed, and a key reported by more than
    /// one archive is an error.
    pub fn from_archives(archives: &[PathBuf]) -> Result<Self> {
        for a in archives {
            require_input(a)?;
        }

        let mut table = Self::default();
        for a in archives {
            for (key, count) in read_general_stats(a)? {
                table.insert(key, count, a)?;
            }
        }
        Ok(table)
    }

    fn insert(&mut self, key: String, count: u64, source: &Path) -> Result<(), CurationError> {
        if let Some((_, first)) = self.counts.get(&key) {
            if first != source {
                return Err(CurationError::DuplicateReadCountKey {
                    key,
                    first: first.clone(),
                    second: source.to_path_buf(),
                });
            }
        }
        self.counts.insert(key, (count, source.to_path_buf()));
        Ok(())
    }

    /// The count for `key`, or [`CurationError::MissingReadCount`] naming it.
    pub fn get(&self, key: &str) -> Result<u64, CurationError> {
        self.counts
            .get(key)
            .map(|(c, _)| *c)
            .ok_or_else(|| CurationError::MissingReadCount {
                key: key.to_string(),
            })
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    #[cfg(test)]
    pub(crate) fn from_pairs(pairs: &[(&str, u64)]) -> Self {
        let src = PathBuf::from("in-memory");
        Self {
            counts: pairs
                .iter()
                .map(|(k, c)| (k.to_string(), (*c, src.clone())))
                .collect(),
        }
    }
}

/// Reads the (key, count) pairs of the general-stats report inside the
/// MultiQC data archive at `archive`.
pub fn read_general_stats(archive: &Path) -> Result<Vec<(String, u64)>> {
    let file = File::open(archive)
        .with_context(|| format!("could not open the MultiQC archive {}", archive.display()))?;
    let mut zip = ZipArchive::new(BufReader::new(file))
        .with_context(|| format!("{} is not a readable zip archive", archive.display()))?;

    let entry_name = zip
        .file_names()
        .find(|n| {
            Path::new(n)
                .file_name()
                .is_some_and(|f| f == MULTIQC_GENERAL_STATS_NAME)
        })
        .map(String::from)
        .ok_or_else(|| CurationError::MissingReport {
            archive: archive.to_path_buf(),
            name: MULTIQC_GENERAL_STATS_NAME.to_string(),
        })?;
    debug!("reading {} from {}", entry_name, archive.display());

    let entry = zip
        .by_name(&entry_name)
        .with_context(|| format!("could not read {} from {}", entry_name, archive.display()))?;
    parse_general_stats(entry, archive)
}

/// Parses a MultiQC general-stats table (tab-separated, one header row),
/// taking column 0 as the key and column 5 as the read count. Rows whose
/// count cell is blank are skipped.
pub fn parse_general_stats<R: Read>(reader: R, archive: &Path) -> Result<Vec<(String, u64)>> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let mut pairs = Vec::new();
    for rec in rdr.records() {
        let rec = rec.with_context(|| format!("could not parse the report in {}", archive.display()))?;
        let line = rec.position().map(|p| p.line()).unwrap_or(0);
        let malformed = |reason: String| CurationError::MalformedReport {
            archive: archive.to_path_buf(),
            line,
            reason,
        };

        let key = rec
            .get(MULTIQC_KEY_COLUMN)
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or_else(|| malformed(String::from("the sample column is empty")))?;
        let raw_count = rec.get(MULTIQC_COUNT_COLUMN).map(str::trim).unwrap_or("");
        if raw_count.is_empty() {
            debug!("no read count for {} in {}; skipping", key, archive.display());
            continue;
        }
        let count = parse_count(raw_count)
            .ok_or_else(|| malformed(format!("{} is not a read count", raw_count)))?;
        pairs.push((key.to_string(), count));
    }
    Ok(pairs)
}

/// MultiQC writes integral totals either as integers or as floats such as
/// `1000000.0`; both are accepted as long as the value is a whole,
/// non-negative number.
pub fn parse_count(s: &str) -> Option<u64> {
    if let Ok(c) = s.parse::<u64>() {
        return Some(c);
    }
    let f = s.parse::<f64>().ok()?;
    if f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64 {
        Some(f as u64)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test_utils::{write_multiqc_zip, write_zip};

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count("1000000"), Some(1_000_000));
        assert_eq!(parse_count("850000.0"), Some(850_000));
        assert_eq!(parse_count("1.5e6"), Some(1_500_000));
        assert_eq!(parse_count("12.5"), None);
        assert_eq!(parse_count("-3"), None);
        assert_eq!(parse_count("NaN"), None);
        assert_eq!(parse_count("lots"), None);
    }

    #[test]
    fn test_single_archive() {
        let td = tempfile::tempdir().expect("tempdir");
        let p = td.path().join("raw_multiqc_GLAmpSeq_data.zip");
        write_multiqc_zip(
            &p,
            &[("S1_R1_raw", "1000000.0"), ("S1_R2_raw", "1000000.0"), ("S2_R1_raw", "850000")],
        );
        let t = ReadCountTable::from_archives(&[p]).expect("should load counts");
        assert_eq!(t.len(), 3);
        assert_eq!(t.get("S1_R2_raw").expect("present"), 1_000_000);
        assert_eq!(t.get("S2_R1_raw").expect("present"), 850_000);
        match t.get("S2_R2_raw") {
            Err(CurationError::MissingReadCount { key }) => assert_eq!(key, "S2_R2_raw"),
            other => panic!("expected a missing read count, got {:?}", other),
        }
    }

    #[test]
    fn test_blank_counts_skipped_and_bad_counts_rejected() {
        let td = tempfile::tempdir().expect("tempdir");
        let p = td.path().join("mqc.zip");
        write_multiqc_zip(&p, &[("S1_raw", ""), ("S2_raw", "10")]);
        let t = ReadCountTable::from_archives(&[p.clone()]).expect("should load counts");
        assert_eq!(t.len(), 1);

        write_multiqc_zip(&p, &[("S1_raw", "ten")]);
        let e = ReadCountTable::from_archives(&[p]).expect_err("should fail");
        assert!(matches!(
            e.downcast_ref::<CurationError>(),
            Some(CurationError::MalformedReport { line: 2, .. })
        ));
    }

    #[test]
    fn test_archives_are_validated_before_parsing() {
        let td = tempfile::tempdir().expect("tempdir");
        let good = td.path().join("16S_raw_multiqc_GLAmpSeq_data.zip");
        // a malformed but present first archive must not be parsed before
        // the missing second one is reported
        write_zip(&good, &[("nothing.txt", "x")]);
        let missing = td.path().join("ITS_raw_multiqc_GLAmpSeq_data.zip");
        let e = ReadCountTable::from_archives(&[good, missing.clone()]).expect_err("should fail");
        match e.downcast_ref::<CurationError>() {
            Some(CurationError::MissingInput { path }) => assert_eq!(path, &missing),
            other => panic!("expected a missing input, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_report_entry() {
        let td = tempfile::tempdir().expect("tempdir");
        let p = td.path().join("mqc.zip");
        write_zip(&p, &[("raw_multiqc_data/multiqc_fastqc.txt", "Sample\n")]);
        let e = ReadCountTable::from_archives(&[p]).expect_err("should fail");
        assert!(matches!(
            e.downcast_ref::<CurationError>(),
            Some(CurationError::MissingReport { .. })
        ));
    }

    #[test]
    fn test_prefix_archives_merge_and_collide() {
        let td = tempfile::tempdir().expect("tempdir");
        let a = td.path().join("16S_raw_multiqc_GLAmpSeq_data.zip");
        let b = td.path().join("ITS_raw_multiqc_GLAmpSeq_data.zip");
        write_multiqc_zip(&a, &[("S1_R1_raw", "100"), ("S1_R2_raw", "100")]);
        write_multiqc_zip(&b, &[("S2_R1_raw", "200"), ("S2_R2_raw", "200")]);
        let t = ReadCountTable::from_archives(&[a.clone(), b.clone()]).expect("should merge");
        assert_eq!(t.len(), 4);
        assert_eq!(t.get("S2_R1_raw").expect("present"), 200);

        write_multiqc_zip(&b, &[("S1_R1_raw", "100")]);
        let e = ReadCountTable::from_archives(&[a, b]).expect_err("should collide");
        match e.downcast_ref::<CurationError>() {
            Some(CurationError::DuplicateReadCountKey { key, .. }) => assert_eq!(key, "S1_R1_raw"),
            other => panic!("expected a duplicate key, got {:?}", other),
        }
    }
}
