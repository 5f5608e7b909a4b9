use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

use crate::utils::errors::CurationError;

/// `true` if `p` is a regular file with at least one byte in it.
pub fn is_nonempty_file<T: AsRef<Path>>(p: T) -> bool {
    std::fs::metadata(p.as_ref())
        .map(|m| m.is_file() && m.len() > 0)
        .unwrap_or(false)
}

/// Fails with [`CurationError::MissingInput`] unless `p` is a non-empty file.
pub fn require_input(p: &Path) -> Result<(), CurationError> {
    if is_nonempty_file(p) {
        Ok(())
    } else {
        Err(CurationError::MissingInput {
            path: p.to_path_buf(),
        })
    }
}

/// Check if the provided directory `odir` exists, and create it if it doesn't.
/// Returns Ok(()) on success or an `anyhow::Error` otherwise.
pub fn create_dir_if_absent<T: AsRef<Path>>(odir: T) -> Result<()> {
    let pdir = odir.as_ref();
    if !pdir.exists() {
        info!(
            "The directory {} doesn't yet exist; attempting to create it.",
            pdir.display()
        );
        std::fs::create_dir_all(pdir)
            .with_context(|| format!("Couldn't create the directory at {}", pdir.display()))?;
    }
    Ok(())
}
