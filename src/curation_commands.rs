pub mod read_counts;
pub use self::read_counts::write_read_counts;

pub mod file_associations;
pub use self::file_associations::write_file_associations;

pub mod readme;
pub use self::readme::write_readme;

pub mod describe;
pub use self::describe::describe_layouts;

pub mod references;
pub use self::references::fetch_references;

use anyhow::Context;
use clap::{Args, Subcommand};
use std::path::PathBuf;
use tracing::info;

use crate::utils::isa;
use crate::utils::multiqc::ReadCountTable;
use crate::utils::run_config::{AssayType, RunConfig};

/// Options shared by every command that reads an ISA archive and a set of
/// processed-data directories.
#[derive(Args, Clone, Debug)]
pub struct RunOpts {
    /// GeneLab run / accession identifier (e.g. GLDS-487); used to name the output table
    #[arg(short = 'g', long)]
    pub run_id: String,

    /// path to the ISA archive (zip) holding the assay table
    #[arg(short, long)]
    pub isa_zip: PathBuf,

    /// which processing workflow produced the outputs
    #[arg(short, long, value_enum, default_value_t = AssayType::Amplicon)]
    pub assay: AssayType,

    /// the raw reads are single-end (default is paired-end)
    #[arg(long)]
    pub single_ended: bool,

    /// tab-separated (no header) file mapping each sample to the file prefix
    /// its outputs were written under, for runs processed in several batches
    /// (e.g. one per primer set)
    #[arg(long)]
    pub prefix_map: Option<PathBuf>,

    /// suffix appended to processed file names [default: _GLAmpSeq or _GLmetagenomics]
    #[arg(long)]
    pub assay_suffix: Option<String>,

    /// prefix prepended to every raw read file name
    #[arg(long, default_value = "")]
    pub raw_file_prefix: String,

    /// primers were removed before the data was submitted, so no trimmed reads exist
    #[arg(long, help_heading = "Amplicon Options")]
    pub primers_already_trimmed: bool,

    /// the sequence features are OTUs rather than ASVs
    #[arg(long, help_heading = "Amplicon Options")]
    pub use_otus: bool,

    #[command(flatten)]
    pub dirs: DirOpts,
}

/// Locations of the processed-data directories. Relative paths are resolved
/// against `--processed-dir`; unset ones take the workflow's default name.
#[derive(Args, Clone, Debug)]
pub struct DirOpts {
    /// root of the processed-data tree
    #[arg(long, default_value = ".", help_heading = "Directory Options")]
    pub processed_dir: PathBuf,

    /// raw read directory
    #[arg(long, help_heading = "Directory Options")]
    pub raw_dir: Option<PathBuf>,

    /// primer-trimmed read directory (amplicon)
    #[arg(long, help_heading = "Directory Options")]
    pub trimmed_dir: Option<PathBuf>,

    /// quality-filtered read directory
    #[arg(long, help_heading = "Directory Options")]
    pub filtered_dir: Option<PathBuf>,

    /// directory holding the MultiQC archives
    #[arg(long, help_heading = "Directory Options")]
    pub multiqc_dir: Option<PathBuf>,

    /// final outputs directory (amplicon)
    #[arg(long, help_heading = "Directory Options")]
    pub final_outputs_dir: Option<PathBuf>,

    /// assembly-based processing directory (metagenomics)
    #[arg(long, help_heading = "Directory Options")]
    pub assembly_based_dir: Option<PathBuf>,

    /// read-based processing directory (metagenomics)
    #[arg(long, help_heading = "Directory Options")]
    pub read_based_dir: Option<PathBuf>,
}

#[derive(Args, Clone, Debug)]
#[command(arg_required_else_help = true)]
pub struct TableOpts {
    #[command(flatten)]
    pub run: RunOpts,

    /// path of the table to write [default: derived from the run id]
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Clone, Debug)]
#[command(arg_required_else_help = true)]
pub struct ReadmeOpts {
    /// GeneLab run / accession identifier (e.g. GLDS-487)
    #[arg(short = 'g', long)]
    pub run_id: String,

    /// which processing workflow produced the outputs
    #[arg(short, long, value_enum, default_value_t = AssayType::Amplicon)]
    pub assay: AssayType,

    /// root of the processed-data tree to summarize
    #[arg(long, default_value = ".")]
    pub processed_dir: PathBuf,

    /// suffix appended to processed file names [default: _GLAmpSeq or _GLmetagenomics]
    #[arg(long)]
    pub assay_suffix: Option<String>,

    /// name of the person who processed the data
    #[arg(short, long, help_heading = "Attribution Options")]
    pub name: Option<String>,

    /// contact email of the person who processed the data
    #[arg(short, long, help_heading = "Attribution Options")]
    pub email: Option<String>,

    /// identifier of the processing protocol document
    #[arg(long, help_heading = "Attribution Options")]
    pub protocol_id: Option<String>,

    /// path of the README to write [default: <processed-dir>/README<assay-suffix>.txt]
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Clone, Debug)]
#[command(arg_required_else_help = true)]
pub struct DescribeLayoutOpts {
    /// workflow whose layout should be shown
    #[arg(short, long, value_enum, default_value_t = AssayType::Amplicon)]
    pub assay: AssayType,

    /// show the layout used when primers were trimmed before submission
    #[arg(long)]
    pub primers_already_trimmed: bool,

    /// show every layout
    #[arg(long, conflicts_with_all = ["assay", "primers_already_trimmed"])]
    pub all: bool,
}

#[derive(Args, Clone, Debug)]
#[command(arg_required_else_help = true)]
pub struct FetchReferencesOpts {
    /// names of registered datasets, or remote urls, to download
    #[arg(value_delimiter = ',', required_unless_present = "list")]
    pub datasets: Vec<String>,

    /// directory the downloads are written to
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// list the registered datasets and exit
    #[arg(long)]
    pub list: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// write the raw read-count table for a run
    ReadCounts(TableOpts),
    /// write the associated-file-names table for a run
    FileAssociations(TableOpts),
    /// write a README describing a processed-data directory
    Readme(ReadmeOpts),
    /// print the column layout(s) of the associated-file-names table
    DescribeLayout(DescribeLayoutOpts),
    /// download the reference datasets used by the processing workflows
    FetchReferences(FetchReferencesOpts),
}

/// Reads the sample order from the ISA archive and the raw read counts from
/// the MultiQC archive(s) the configuration points at.
pub(crate) fn load_samples_and_counts(
    cfg: &RunConfig,
    isa_zip: &std::path::Path,
) -> anyhow::Result<(Vec<String>, ReadCountTable)> {
    let samples = isa::read_sample_order(isa_zip)
        .with_context(|| format!("could not read sample names from {}", isa_zip.display()))?;
    info!(
        "read {} samples from the ISA archive {}",
        samples.len(),
        isa_zip.display()
    );

    if let Some(pm) = cfg.prefix_map() {
        pm.check_samples(&samples)?;
    }

    let archives = cfg.multiqc_archives();
    let counts = ReadCountTable::from_archives(&archives)?;
    info!(
        "loaded {} read counts from {} MultiQC archive(s)",
        counts.len(),
        archives.len()
    );
    Ok((samples, counts))
}
