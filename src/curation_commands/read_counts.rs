use anyhow::Context;
use tracing::info;

use super::{load_samples_and_counts, TableOpts};
use crate::utils::run_config::RunConfig;
use crate::utils::table::build_read_count_table;

pub fn write_read_counts(opts: TableOpts) -> anyhow::Result<()> {
    let cfg = RunConfig::from_opts(&opts.run)?;
    let (samples, counts) = load_samples_and_counts(&cfg, &opts.run.isa_zip)?;

    let table = build_read_count_table(&cfg, &samples, &counts)
        .context("could not assemble the read-count table")?;

    let out = opts
        .output
        .unwrap_or_else(|| cfg.default_read_count_output());
    table.write_tsv(&out)?;
    info!(
        "wrote {} read counts for {} samples to {}",
        table.rows().len(),
        samples.len(),
        out.display()
    );
    Ok(())
}
