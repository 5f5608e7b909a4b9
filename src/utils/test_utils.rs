//! Fixture builders shared by the unit tests.

use std::fs;
use std::io::Write;
use std::path::Path;

use zip::write::SimpleFileOptions;

use crate::curation_commands::{DirOpts, RunOpts};
use crate::utils::run_config::AssayType;

/// Writes a zip archive at `path` holding `entries` as (name, contents).
pub(crate) fn write_zip(path: &Path, entries: &[(&str, &str)]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("could not create the archive directory");
    }
    let f = fs::File::create(path).expect("could not create the archive");
    let mut zw = zip::ZipWriter::new(f);
    let opts = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
    for (name, contents) in entries {
        if name.ends_with('/') {
            zw.add_directory(name.trim_end_matches('/'), opts)
                .expect("could not add directory entry");
        } else {
            zw.start_file(*name, opts).expect("could not start entry");
            zw.write_all(contents.as_bytes())
                .expect("could not write entry");
        }
    }
    zw.finish().expect("could not finish the archive");
}

/// An ISA archive with one assay table listing `samples` in order.
pub(crate) fn write_isa_zip(path: &Path, samples: &[&str]) {
    let mut table = String::from("\"Sample Name\"\t\"Protocol REF\"\t\"Parameter Value[Library Layout]\"\n");
    for s in samples {
        table.push_str(&format!("\"{}\"\t\"nucleic acid extraction\"\t\"PAIRED\"\n", s));
    }
    write_zip(
        path,
        &[
            ("i_Investigation.txt", "Investigation\n"),
            ("s_Study.txt", "Source Name\tSample Name\n"),
            ("a_amplicon_sequencing.txt", table.as_str()),
        ],
    );
}

/// A MultiQC data archive whose general-stats report gives each key its
/// count in column 5, the way FastQC totals are laid out.
pub(crate) fn write_multiqc_zip(path: &Path, counts: &[(&str, &str)]) {
    let mut report = String::from(
        "Sample\tFastQC_mqc-generalstats-fastqc-percent_duplicates\tFastQC_mqc-generalstats-fastqc-percent_gc\tFastQC_mqc-generalstats-fastqc-avg_sequence_length\tFastQC_mqc-generalstats-fastqc-percent_fails\tFastQC_mqc-generalstats-fastqc-total_sequences\n",
    );
    for (k, v) in counts {
        report.push_str(&format!("{}\t12.5\t51.0\t251.0\t9.1\t{}\n", k, v));
    }
    write_zip(
        path,
        &[
            ("raw_multiqc_data/", ""),
            ("raw_multiqc_data/multiqc_fastqc.txt", "Sample\tTotal Sequences\n"),
            ("raw_multiqc_data/multiqc_general_stats.txt", report.as_str()),
        ],
    );
}

/// Creates `dir/name` holding `contents` (an empty string makes a zero-length file).
pub(crate) fn touch(dir: &Path, name: &str, contents: &str) {
    fs::create_dir_all(dir).expect("could not create fixture directory");
    fs::write(dir.join(name), contents).expect("could not write fixture file");
}

/// Command-line options for run `GLDS-000` rooted at `root`, with the ISA
/// archive expected at `root/GLDS-000_metadata_ISA.zip`.
pub(crate) fn run_opts(root: &Path, assay: AssayType) -> RunOpts {
    RunOpts {
        run_id: String::from("GLDS-000"),
        isa_zip: root.join("GLDS-000_metadata_ISA.zip"),
        assay,
        single_ended: false,
        prefix_map: None,
        assay_suffix: None,
        raw_file_prefix: String::new(),
        primers_already_trimmed: false,
        use_otus: false,
        dirs: DirOpts {
            processed_dir: root.to_path_buf(),
            raw_dir: None,
            trimmed_dir: None,
            filtered_dir: None,
            multiqc_dir: None,
            final_outputs_dir: None,
            assembly_based_dir: None,
            read_based_dir: None,
        },
    }
}
