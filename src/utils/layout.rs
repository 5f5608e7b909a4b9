use strum_macros::EnumIter;

use crate::utils::artifacts::ArtifactGroup;
use crate::utils::run_config::AssayType;

/// How the content of one column is produced for a sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellRule {
    SampleName,
    Readme,
    RawReads,
    ReadCount,
    Unit,
    TermSourceRef,
    TermAccession,
    TrimmedReads,
    FilteredReads,
    Artifacts(ArtifactGroup),
}

#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub header: &'static str,
    pub rule: CellRule,
}

const fn col(header: &'static str, rule: CellRule) -> Column {
    Column { header, rule }
}

/// The row schemas an associated-file-names table can take.
#[derive(EnumIter, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// amplicon data that went through primer trimming
    AmpliconTrimmed,
    /// amplicon data submitted with primers already removed
    AmpliconPreTrimmed,
    Metagenomics,
}

// leading columns every layout shares
const LEAD: [Column; 7] = [
    col("Sample Name", CellRule::SampleName),
    col("Parameter Value[README]", CellRule::Readme),
    col("Parameter Value[Raw Sequence Data]", CellRule::RawReads),
    col("Parameter Value[Read Count]", CellRule::ReadCount),
    col("Unit", CellRule::Unit),
    col("Term Source REF", CellRule::TermSourceRef),
    col("Term Accession Number", CellRule::TermAccession),
];

const TRIMMED: Column = col("Parameter Value[Trimmed Sequence Data]", CellRule::TrimmedReads);
const FILTERED: Column = col("Parameter Value[Filtered Sequence Data]", CellRule::FilteredReads);

const AMPLICON_TAIL: [Column; 1] = [col(
    "Parameter Value[Final Outputs]",
    CellRule::Artifacts(ArtifactGroup::AmpliconFinalOutputs),
)];

const METAGENOMICS_TAIL: [Column; 7] = [
    col(
        "Parameter Value[Assembly-based Processing: Assemblies]",
        CellRule::Artifacts(ArtifactGroup::Assemblies),
    ),
    col(
        "Parameter Value[Assembly-based Processing: Predicted Genes]",
        CellRule::Artifacts(ArtifactGroup::PredictedGenes),
    ),
    col(
        "Parameter Value[Assembly-based Processing: Annotations and Taxonomy]",
        CellRule::Artifacts(ArtifactGroup::AnnotationsAndTaxonomy),
    ),
    col(
        "Parameter Value[Assembly-based Processing: Read Mapping]",
        CellRule::Artifacts(ArtifactGroup::ReadMapping),
    ),
    col(
        "Parameter Value[Assembly-based Processing: Bins]",
        CellRule::Artifacts(ArtifactGroup::Bins),
    ),
    col(
        "Parameter Value[Assembly-based Processing: MAGs]",
        CellRule::Artifacts(ArtifactGroup::Mags),
    ),
    col(
        "Parameter Value[Read-based Processing]",
        CellRule::Artifacts(ArtifactGroup::ReadBased),
    ),
];

impl Layout {
    pub fn select(assay: AssayType, primers_trimmed: bool) -> Self {
        match (assay, primers_trimmed) {
            (AssayType::Amplicon, false) => Layout::AmpliconTrimmed,
            (AssayType::Amplicon, true) => Layout::AmpliconPreTrimmed,
            (AssayType::Metagenomics, _) => Layout::Metagenomics,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Layout::AmpliconTrimmed => "amplicon",
            Layout::AmpliconPreTrimmed => "amplicon (primers already trimmed)",
            Layout::Metagenomics => "metagenomics",
        }
    }

    /// The columns of the layout, in output order.
    pub fn columns(&self) -> Vec<Column> {
        let mut cols = LEAD.to_vec();
        match self {
            Layout::AmpliconTrimmed => {
                cols.push(TRIMMED);
                cols.push(FILTERED);
                cols.extend(AMPLICON_TAIL);
            }
            Layout::AmpliconPreTrimmed => {
                cols.push(FILTERED);
                cols.extend(AMPLICON_TAIL);
            }
            Layout::Metagenomics => {
                cols.push(FILTERED);
                cols.extend(METAGENOMICS_TAIL);
            }
        }
        cols
    }

    pub fn header(&self) -> Vec<&'static str> {
        self.columns().iter().map(|c| c.header).collect()
    }
}
