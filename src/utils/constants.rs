/// Entries of the ISA archive whose file name starts with this prefix are
/// assay tables.
pub(crate) static ISA_ASSAY_TABLE_PREFIX: &str = "a_";
pub(crate) static ISA_SAMPLE_NAME_COLUMN: &str = "Sample Name";

/// The MultiQC general-stats report inside a `*_multiqc*_data.zip` archive.
pub(crate) static MULTIQC_GENERAL_STATS_NAME: &str = "multiqc_general_stats.txt";
pub(crate) static MULTIQC_KEY_COLUMN: usize = 0;
pub(crate) static MULTIQC_COUNT_COLUMN: usize = 5;

/// Separator between file names sharing one table cell.
pub(crate) static CELL_FILE_SEPARATOR: &str = ", ";

pub(crate) static READ_COUNT_FILE_HEADER: &str = "File Name";
pub(crate) static READ_COUNT_VALUE_HEADER: &str = "Number of Reads";
