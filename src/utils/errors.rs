use std::path::PathBuf;

/// The fatal conditions a curation run can hit. Every one of these ends the
/// process with exit status 1; none are retried.
#[derive(thiserror::Error, Debug)]
pub enum CurationError {
    #[error("required input {} does not exist or is empty", .path.display())]
    MissingInput { path: PathBuf },

    #[error("the ISA archive {} contains no entries", .archive.display())]
    EmptyIsaArchive { archive: PathBuf },

    #[error("no assay table (an entry starting with \"a_\") was found in the ISA archive {}", .archive.display())]
    NoAssayTable { archive: PathBuf },

    #[error("found {count} assay tables (entries starting with \"a_\") in the ISA archive {}; expected exactly one", .archive.display())]
    MultipleAssayTables { archive: PathBuf, count: usize },

    #[error("the assay table {entry} has no \"{column}\" column")]
    MissingColumn { entry: String, column: String },

    #[error("the assay table {entry} has the sample name {sample:?}, which contains a tab or line break")]
    InvalidSampleName { entry: String, sample: String },

    #[error("no {name} entry was found in the MultiQC archive {}", .archive.display())]
    MissingReport { archive: PathBuf, name: String },

    #[error("could not parse line {line} of {}: {reason}", .archive.display())]
    MalformedReport {
        archive: PathBuf,
        line: u64,
        reason: String,
    },

    #[error("the read count key {key} appears in both {} and {}", .first.display(), .second.display())]
    DuplicateReadCountKey {
        key: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("no read count for {key} was found in the MultiQC data; the ISA sample table and the QC report disagree")]
    MissingReadCount { key: String },

    #[error("sample {sample} has no entry in the prefix mapping file {}", .mapping.display())]
    UnmappedSample { sample: String, mapping: PathBuf },
}
