use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::debug;
use zip::ZipArchive;

use crate::utils::constants::{ISA_ASSAY_TABLE_PREFIX, ISA_SAMPLE_NAME_COLUMN};
use crate::utils::errors::CurationError;
use crate::utils::file_utils::require_input;

/// Checks if a zip entry name refers to an assay table, i.e. a file (not a
/// directory) whose own name starts with `a_`.
fn is_assay_table(entry_name: &str) -> bool {
    if entry_name.ends_with('/') {
        return false;
    }
    Path::new(entry_name)
        .file_name()
        .and_then(|f| f.to_str())
        .is_some_and(|f| f.starts_with(ISA_ASSAY_TABLE_PREFIX))
}

/// Returns the `Sample Name` column of the single assay table inside the ISA
/// archive at `isa_zip`, in file order and with any duplicates kept.
pub fn read_sample_order(isa_zip: &Path) -> Result<Vec<String>> {
    require_input(isa_zip)?;
    let file = File::open(isa_zip)
        .with_context(|| format!("could not open the ISA archive {}", isa_zip.display()))?;
    let mut archive = ZipArchive::new(BufReader::new(file))
        .with_context(|| format!("{} is not a readable zip archive", isa_zip.display()))?;

    if archive.is_empty() {
        return Err(CurationError::EmptyIsaArchive {
            archive: isa_zip.to_path_buf(),
        }
        .into());
    }

    let candidates: Vec<String> = archive
        .file_names()
        .filter(|n| is_assay_table(n))
        .map(String::from)
        .collect();

    let entry_name = match candidates.as_slice() {
        [] => {
            return Err(CurationError::NoAssayTable {
                archive: isa_zip.to_path_buf(),
            }
            .into())
        }
        [only] => only.clone(),
        many => {
            return Err(CurationError::MultipleAssayTables {
                archive: isa_zip.to_path_buf(),
                count: many.len(),
            }
            .into())
        }
    };
    debug!("using assay table {} from {}", entry_name, isa_zip.display());

    let entry = archive
        .by_name(&entry_name)
        .with_context(|| format!("could not read {} from {}", entry_name, isa_zip.display()))?;
    parse_sample_names(entry, &entry_name)
}

/// Parses a tab-separated assay table and returns its `Sample Name` column.
/// Blank cells are skipped; everything else is kept in order. A name that
/// would break a row of the output tables is an error.
pub fn parse_sample_names<R: Read>(reader: R, entry_name: &str) -> Result<Vec<String>> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr
        .headers()
        .with_context(|| format!("could not read the header of {}", entry_name))?
        .clone();
    let col = headers
        .iter()
        .position(|h| h.trim() == ISA_SAMPLE_NAME_COLUMN)
        .ok_or_else(|| CurationError::MissingColumn {
            entry: entry_name.to_string(),
            column: ISA_SAMPLE_NAME_COLUMN.to_string(),
        })?;

    let mut samples = Vec::new();
    for rec in rdr.records() {
        let rec = rec.with_context(|| format!("could not parse a row of {}", entry_name))?;
        match rec.get(col).map(str::trim) {
            Some(s) if s.contains(['\t', '\n', '\r']) => {
                return Err(CurationError::InvalidSampleName {
                    entry: entry_name.to_string(),
                    sample: s.to_string(),
                }
                .into())
            }
            Some(s) if !s.is_empty() => samples.push(s.to_string()),
            _ => {}
        }
    }
    Ok(samples)
}
