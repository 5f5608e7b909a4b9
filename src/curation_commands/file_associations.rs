use anyhow::Context;
use tracing::{info, warn};

use super::{load_samples_and_counts, TableOpts};
use crate::utils::artifacts::DiskProbe;
use crate::utils::run_config::RunConfig;
use crate::utils::table::{build_file_associations_table, missing_read_files};

pub fn write_file_associations(opts: TableOpts) -> anyhow::Result<()> {
    let cfg = RunConfig::from_opts(&opts.run)?;
    let (samples, counts) = load_samples_and_counts(&cfg, &opts.run.isa_zip)?;

    let layout = cfg.layout();
    info!("using the {} layout", layout.name());
    let table = build_file_associations_table(&cfg, &samples, &counts, &DiskProbe)
        .context("could not assemble the associated-file-names table")?;

    for p in missing_read_files(&cfg, &samples, &DiskProbe) {
        warn!("{} is listed in the table but was not found", p.display());
    }

    let out = opts
        .output
        .unwrap_or_else(|| cfg.default_file_associations_output());
    table.write_tsv(&out)?;
    info!(
        "wrote {} rows of {} columns to {}",
        table.rows().len(),
        table.header().len(),
        out.display()
    );
    Ok(())
}
