use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::defaults::{DefaultParams, DefaultTermParams};
use crate::utils::artifacts::FileProbe;
use crate::utils::constants::{
    CELL_FILE_SEPARATOR, READ_COUNT_FILE_HEADER, READ_COUNT_VALUE_HEADER,
};
use crate::utils::layout::CellRule;
use crate::utils::multiqc::ReadCountTable;
use crate::utils::run_config::{AssayType, RunConfig};

/// An in-memory TSV table: a header row and rows of the same width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<S: AsRef<str>>(header: &[S]) -> Self {
        Self {
            header: header.iter().map(|h| h.as_ref().to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        debug_assert_eq!(row.len(), self.header.len());
        self.rows.push(row);
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Writes the table tab-separated, header first, one `\n`-terminated line
    /// per row. Cells are never quoted.
    pub fn write_to<W: Write>(&self, w: W) -> Result<()> {
        let mut wtr = csv::WriterBuilder::new()
            .delimiter(b'\t')
            .quote_style(csv::QuoteStyle::Never)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(w);
        wtr.write_record(&self.header)?;
        for r in &self.rows {
            wtr.write_record(r)?;
        }
        wtr.flush()?;
        Ok(())
    }

    pub fn write_tsv(&self, path: &Path) -> Result<()> {
        let f = File::create(path)
            .with_context(|| format!("could not create the output table {}", path.display()))?;
        self.write_to(BufWriter::new(f))
            .with_context(|| format!("could not write the output table {}", path.display()))
    }
}

/// One row per raw read file, in sample order (R1 before R2).
pub fn build_read_count_table(
    cfg: &RunConfig,
    samples: &[String],
    counts: &ReadCountTable,
) -> Result<Table> {
    let mut table = Table::new(&[READ_COUNT_FILE_HEADER, READ_COUNT_VALUE_HEADER]);
    for s in samples {
        let files = cfg.read_files(s, "raw");
        let keys = cfg.raw_count_keys(s);
        for (f, k) in files.into_iter().zip(keys) {
            let n = counts.get(&k)?;
            table.push_row(vec![f, n.to_string()]);
        }
    }
    Ok(table)
}

/// One row per sample laid out according to the run's [`Layout`](crate::utils::layout::Layout).
pub fn build_file_associations_table(
    cfg: &RunConfig,
    samples: &[String],
    counts: &ReadCountTable,
    probe: &dyn FileProbe,
) -> Result<Table> {
    let layout = cfg.layout();
    let columns = layout.columns();
    debug!("building the {} layout with {} columns", layout.name(), columns.len());

    let mut table = Table::new(&layout.header());
    for s in samples {
        let mut row = Vec::with_capacity(columns.len());
        for c in &columns {
            row.push(cell_for(cfg, s, c.rule, counts, probe)?);
        }
        table.push_row(row);
    }
    Ok(table)
}

/// Read files the table names that are not present (and non-empty) in their
/// stage directory. The table lists them regardless.
pub fn missing_read_files(cfg: &RunConfig, samples: &[String], probe: &dyn FileProbe) -> Vec<PathBuf> {
    let mut stages = vec![("raw", &cfg.dirs.raw)];
    if cfg.layout().columns().iter().any(|c| c.rule == CellRule::TrimmedReads) {
        stages.push(("trimmed", &cfg.dirs.trimmed));
    }
    stages.push(("filtered", &cfg.dirs.filtered));

    let mut missing = Vec::new();
    for s in samples {
        for (stage, dir) in &stages {
            for f in cfg.read_files(s, stage) {
                let p = dir.join(f);
                if !probe.is_nonempty_file(&p) {
                    missing.push(p);
                }
            }
        }
    }
    missing
}

fn cell_for(
    cfg: &RunConfig,
    sample: &str,
    rule: CellRule,
    counts: &ReadCountTable,
    probe: &dyn FileProbe,
) -> Result<String> {
    let joined = |v: Vec<String>| v.join(CELL_FILE_SEPARATOR);
    let cell = match rule {
        CellRule::SampleName => sample.to_string(),
        CellRule::Readme => joined(vec![
            cfg.suffixed("README", "txt"),
            cfg.suffixed("processing_info", "zip"),
        ]),
        CellRule::RawReads => joined(cfg.read_files(sample, "raw")),
        CellRule::ReadCount => counts.get(&cfg.sample_count_key(sample))?.to_string(),
        CellRule::Unit => <DefaultParams as DefaultTermParams>::READ_COUNT_UNIT.to_string(),
        CellRule::TermSourceRef => <DefaultParams as DefaultTermParams>::TERM_SOURCE_REF.to_string(),
        CellRule::TermAccession => {
            <DefaultParams as DefaultTermParams>::TERM_ACCESSION_NUMBER.to_string()
        }
        CellRule::TrimmedReads => {
            let p = cfg.prefix_for(sample)?;
            let mut files = cfg.read_files(sample, "trimmed");
            files.push(cfg.suffixed(&format!("{}trimmed-read-counts", p), "tsv"));
            files.push(cfg.suffixed(&format!("{}cutadapt", p), "log"));
            joined(files)
        }
        CellRule::FilteredReads => {
            let mut files = cfg.read_files(sample, "filtered");
            if cfg.assay == AssayType::Amplicon {
                let p = cfg.prefix_for(sample)?;
                files.push(cfg.suffixed(&format!("{}filtered-read-counts", p), "tsv"));
            }
            joined(files)
        }
        CellRule::Artifacts(group) => group.cell(cfg, sample, probe)?.unwrap_or_default(),
    };
    Ok(cell)
}
