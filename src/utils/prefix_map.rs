use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::utils::errors::CurationError;
use crate::utils::file_utils::require_input;

#[derive(Debug, Deserialize)]
struct PrefixRecord {
    sample: String,
    prefix: String,
}

/// The sample → file-prefix table used when one run's samples were processed
/// in several batches, each writing its run-level outputs under its own prefix.
#[derive(Clone, Debug)]
pub struct PrefixMap {
    path: PathBuf,
    by_sample: HashMap<String, String>,
    // unique prefixes, in the order they first appear in the file
    prefixes: Vec<String>,
}

impl PrefixMap {
    pub fn from_path(p: &Path) -> Result<Self> {
        require_input(p)?;
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .delimiter(b'\t')
            .trim(csv::Trim::All)
            .from_path(p)
            .with_context(|| format!("could not open the prefix mapping file {}", p.display()))?;

        let mut by_sample = HashMap::new();
        let mut prefixes = Vec::new();
        let mut seen = HashSet::new();
        for rec in rdr.deserialize() {
            let rec: PrefixRecord = rec.with_context(|| {
                format!(
                    "could not parse {}; expected two tab-separated columns (sample, prefix)",
                    p.display()
                )
            })?;
            if let Some(prev) = by_sample.get(&rec.sample) {
                if prev != &rec.prefix {
                    bail!(
                        "sample {} is mapped to both {} and {} in {}",
                        rec.sample,
                        prev,
                        rec.prefix,
                        p.display()
                    );
                }
                continue;
            }
            if seen.insert(rec.prefix.clone()) {
                prefixes.push(rec.prefix.clone());
            }
            by_sample.insert(rec.sample, rec.prefix);
        }

        info!(
            "read {} sample(s) under {} prefix(es) from {}",
            by_sample.len(),
            prefixes.len(),
            p.display()
        );
        Ok(Self {
            path: p.to_path_buf(),
            by_sample,
            prefixes,
        })
    }

    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }

    pub fn prefix_for(&self, sample: &str) -> Result<&str, CurationError> {
        self.by_sample
            .get(sample)
            .map(String::as_str)
            .ok_or_else(|| CurationError::UnmappedSample {
                sample: sample.to_string(),
                mapping: self.path.clone(),
            })
    }

    /// Every ISA sample must have a prefix; mapped samples missing from the
    /// ISA table only earn a warning.
    pub fn check_samples(&self, samples: &[String]) -> Result<(), CurationError> {
        for s in samples {
            self.prefix_for(s)?;
        }
        let isa: HashSet<&str> = samples.iter().map(String::as_str).collect();
        let mut extra: Vec<&str> = self
            .by_sample
            .keys()
            .map(String::as_str)
            .filter(|s| !isa.contains(s))
            .collect();
        extra.sort_unstable();
        if !extra.is_empty() {
            warn!(
                "the prefix mapping {} lists samples absent from the ISA table: {}",
                self.path.display(),
                extra.join(", ")
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_map(dir: &Path, contents: &str) -> PathBuf {
        let p = dir.join("prefixes.tsv");
        fs::write(&p, contents).expect("could not write mapping");
        p
    }

    #[test]
    fn test_prefixes_keep_first_seen_order() {
        let td = tempfile::tempdir().expect("tempdir");
        let p = write_map(td.path(), "S1\t16S_\nS2\tITS_\nS3\t16S_\n");
        let pm = PrefixMap::from_path(&p).expect("should parse mapping");
        assert_eq!(pm.prefixes(), &["16S_".to_string(), "ITS_".to_string()]);
        assert_eq!(pm.prefix_for("S2").expect("mapped"), "ITS_");
        assert_eq!(pm.prefix_for("S3").expect("mapped"), "16S_");
    }

    #[test]
    fn test_unmapped_sample_is_an_error() {
        let td = tempfile::tempdir().expect("tempdir");
        let p = write_map(td.path(), "S1\t16S_\n");
        let pm = PrefixMap::from_path(&p).expect("should parse mapping");
        let samples = vec![String::from("S1"), String::from("S2")];
        match pm.check_samples(&samples) {
            Err(CurationError::UnmappedSample { sample, .. }) => assert_eq!(sample, "S2"),
            other => panic!("expected an unmapped sample error, got {:?}", other),
        }
    }

    #[test]
    fn test_conflicting_prefixes_rejected() {
        let td = tempfile::tempdir().expect("tempdir");
        let p = write_map(td.path(), "S1\t16S_\nS1\tITS_\n");
        assert!(PrefixMap::from_path(&p).is_err());
    }

    #[test]
    fn test_missing_mapping_file() {
        let td = tempfile::tempdir().expect("tempdir");
        assert!(PrefixMap::from_path(&td.path().join("nope.tsv")).is_err());
    }
}
