use anyhow::{bail, Context};
use phf::phf_map;
use std::fmt::{self, Write as _};
use std::path::Path;
use tracing::{debug, info};

use super::ReadmeOpts;
use crate::defaults::{DefaultAmpliconParams, DefaultMetagenomicsParams, DefaultParams};
use crate::utils::run_config::AssayType;

static BANNER: &str =
    "################################################################################";

/// What each known output directory holds.
static DIR_DESCRIPTIONS: phf::Map<&'static str, &'static str> = phf_map! {
    "Raw_Sequence_Data" => "initial read fastq files",
    "Trimmed_Sequence_Data" => "primer-trimmed fastq files and trimming logs",
    "Filtered_Sequence_Data" => "quality-filtered fastq files",
    "FastQC_Outputs" => "multiQC summary reports of FastQC runs",
    "Final_Outputs" => "primary output files (may or may not have additional prefixes)",
    "Assembly-based_Processing" => "results generated from assembly-based approaches",
    "Read-based_Processing" => "results generated from read-based approaches",
    "assemblies" => "per-sample assemblies and a summary table",
    "predicted-genes" => "per-sample gene predictions (amino acid, nucleotide, gff)",
    "annotations-and-taxonomy" => "per-sample gene and contig coverage, annotation and taxonomy tables",
    "read-mapping" => "per-sample read-mapping files and depth tables",
    "bins" => "recovered genome bins and their quality estimates",
    "MAGs" => "high-quality bins (metagenome-assembled genomes) and their summaries",
    "processing_info" => "processing scripts and logs",
};

/// Descriptions of run-level files, keyed by the name with the assay suffix
/// and extension removed.
static FILE_DESCRIPTIONS: phf::Map<&'static str, &'static str> = phf_map! {
    "ASVs" => "fasta file of recovered sequences",
    "OTUs" => "fasta file of recovered sequences",
    "counts" => "count table of sequences across samples",
    "taxonomy" => "assigned taxonomy of recovered sequences",
    "taxonomy-and-counts" => "combined taxonomy and count table",
    "read-count-tracking" => "read counts at each processing step",
    "trimmed-read-counts" => "per-sample read counts before and after trimming",
    "cutadapt" => "log file of adapter trimming",
    "filtered-read-counts" => "per-sample read counts before and after filtering",
    "raw_multiqc" => "multiQC summary report of raw reads",
    "raw_multiqc_report" => "multiQC html report of raw reads",
    "filtered_multiqc" => "multiQC summary report of filtered reads",
    "filtered_multiqc_report" => "multiQC html report of filtered reads",
    "assembly-summaries" => "summary statistics of each assembly",
    "bins-overview" => "summary of recovered bins",
    "bins-checkm-out" => "CheckM estimates of bin completeness and contamination",
    "MAGs-overview" => "summary of recovered MAGs",
    "MAGs-checkm-out" => "CheckM estimates of MAG completeness and contamination",
    "Gene-families" => "gene-family abundances",
    "Gene-families-grouped-by-taxa" => "gene-family abundances grouped by taxa",
    "Gene-families-cpm" => "gene-family abundances in copies per million",
    "Gene-families-KO-cpm" => "KO term abundances in copies per million",
    "Pathway-abundances" => "pathway abundances",
    "Pathway-abundances-cpm" => "pathway abundances in copies per million",
    "Pathway-coverages" => "pathway coverages",
    "Metaphlan-taxonomy" => "MetaPhlAn taxonomic profile",
};

// per-sample files, matched on the end of the name (before the assay suffix
// where there is one)
static SAMPLE_FILE_TAILS: &[(&str, &str)] = &[
    ("_raw.fastq.gz", "raw reads"),
    ("_trimmed.fastq.gz", "primer-trimmed reads"),
    ("_filtered.fastq.gz", "quality-filtered reads"),
    ("-assembly", "sample assembly"),
    ("-genes", "sample gene predictions"),
    ("-gene-coverage-annotation-and-tax", "per-gene coverage, annotation and taxonomy"),
    ("-contig-coverage-and-tax", "per-contig coverage and taxonomy"),
    ("-mapping-info", "read-mapping summary"),
    ("-metabat-assembly-depth", "contig coverage depths"),
];

fn known_dirs(assay: AssayType) -> Vec<&'static str> {
    type P = DefaultParams;
    match assay {
        AssayType::Amplicon => vec![
            <P as DefaultAmpliconParams>::RAW_DIR,
            <P as DefaultAmpliconParams>::MULTIQC_DIR,
            <P as DefaultAmpliconParams>::TRIMMED_DIR,
            <P as DefaultAmpliconParams>::FILTERED_DIR,
            <P as DefaultAmpliconParams>::FINAL_OUTPUTS_DIR,
        ],
        AssayType::Metagenomics => vec![
            <P as DefaultMetagenomicsParams>::RAW_DIR,
            <P as DefaultMetagenomicsParams>::MULTIQC_DIR,
            <P as DefaultMetagenomicsParams>::FILTERED_DIR,
            <P as DefaultMetagenomicsParams>::ASSEMBLY_BASED_DIR,
            <P as DefaultMetagenomicsParams>::READ_BASED_DIR,
        ],
    }
}

fn describe_file(name: &str, assay_suffix: &str) -> Option<&'static str> {
    // `raw_multiqc_GLAmpSeq_report.html` splits into `raw_multiqc` and `_report`
    let (stem, infix) = match name.find(assay_suffix) {
        Some(i) if !assay_suffix.is_empty() => {
            let rest = &name[i + assay_suffix.len()..];
            (&name[..i], rest.split('.').next().unwrap_or_default())
        }
        _ => (name, ""),
    };
    let with_infix = format!("{}{}", stem, infix);
    if let Some(d) = FILE_DESCRIPTIONS
        .get(with_infix.as_str())
        .or_else(|| FILE_DESCRIPTIONS.get(stem))
    {
        return Some(*d);
    }
    if name.contains("-bin.") {
        return Some("recovered genome bin");
    }
    if name.contains("-MAG-") {
        return Some("metagenome-assembled genome");
    }
    SAMPLE_FILE_TAILS
        .iter()
        .find(|(tail, _)| stem.ends_with(tail) || name.ends_with(tail))
        .map(|(_, d)| *d)
        .or_else(|| name.ends_with(".bam").then_some("sample read mapping"))
}

/// Immediate entries of `dir` as (name, is directory), sorted by name.
fn sorted_entries(dir: &Path) -> anyhow::Result<Vec<(String, bool)>> {
    let mut entries = Vec::new();
    for de in std::fs::read_dir(dir)
        .with_context(|| format!("could not list the directory {}", dir.display()))?
    {
        let de = de?;
        let is_dir = de.file_type()?.is_dir();
        entries.push((de.file_name().to_string_lossy().into_owned(), is_dir));
    }
    entries.sort();
    Ok(entries)
}

fn push_entry(out: &mut String, indent: usize, name: &str, desc: Option<&str>) -> fmt::Result {
    let pad = " ".repeat(indent);
    match desc {
        Some(d) => writeln!(out, "{}- {}: {}", pad, name, d),
        None => writeln!(out, "{}- {}", pad, name),
    }
}

/// Renders the README text for the tree under `opts.processed_dir`.
pub(crate) fn render_readme(opts: &ReadmeOpts, assay_suffix: &str) -> anyhow::Result<String> {
    let root = opts.processed_dir.as_path();
    if !root.is_dir() {
        bail!(
            "the processed-data directory {} does not exist",
            root.display()
        );
    }

    let mut out = String::new();
    writeln!(out, "{}", BANNER)?;
    writeln!(
        out,
        "GeneLab processed {} data for {}",
        opts.assay.as_str(),
        opts.run_id
    )?;
    writeln!(out, "{}\n", BANNER)?;

    match (&opts.name, &opts.email) {
        (Some(n), Some(e)) => writeln!(out, "Processed by: {} ({})", n, e)?,
        (Some(n), None) => writeln!(out, "Processed by: {}", n)?,
        (None, Some(e)) => writeln!(out, "Contact: {}", e)?,
        (None, None) => {}
    }
    if let Some(p) = &opts.protocol_id {
        writeln!(out, "Processing protocol: {}", p)?;
    }
    if opts.name.is_some() || opts.email.is_some() || opts.protocol_id.is_some() {
        out.push('\n');
    }

    writeln!(out, "Processed data output info:\n")?;
    for d in known_dirs(opts.assay) {
        let p = root.join(d);
        if !p.is_dir() {
            debug!("{} is absent; leaving it out of the README", p.display());
            continue;
        }
        push_entry(&mut out, 0, &format!("{}/", d), DIR_DESCRIPTIONS.get(d).copied())?;
        for (name, is_dir) in sorted_entries(&p)? {
            if is_dir {
                push_entry(
                    &mut out,
                    4,
                    &format!("{}/", name),
                    DIR_DESCRIPTIONS.get(name.as_str()).copied(),
                )?;
            } else {
                push_entry(&mut out, 4, &name, describe_file(&name, assay_suffix))?;
            }
        }
    }
    Ok(out)
}

pub fn write_readme(opts: ReadmeOpts) -> anyhow::Result<()> {
    let assay_suffix = opts
        .assay_suffix
        .clone()
        .unwrap_or_else(|| opts.assay.default_suffix().to_string());
    let text = render_readme(&opts, &assay_suffix)?;

    let out = opts.output.clone().unwrap_or_else(|| {
        opts.processed_dir
            .join(format!("README{}.txt", assay_suffix))
    });
    std::fs::write(&out, text)
        .with_context(|| format!("could not write the README to {}", out.display()))?;
    info!("wrote {}", out.display());
    Ok(())
}
