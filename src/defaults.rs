/// default directory layout and file naming for the amplicon workflow
pub trait DefaultAmpliconParams {
    const ASSAY_SUFFIX: &'static str;
    const RAW_DIR: &'static str;
    const TRIMMED_DIR: &'static str;
    const FILTERED_DIR: &'static str;
    const FINAL_OUTPUTS_DIR: &'static str;
    /// directory holding the MultiQC archives
    const MULTIQC_DIR: &'static str;
}

/// default directory layout and file naming for the metagenomics workflow
pub trait DefaultMetagenomicsParams {
    const ASSAY_SUFFIX: &'static str;
    const RAW_DIR: &'static str;
    const FILTERED_DIR: &'static str;
    const MULTIQC_DIR: &'static str;
    const ASSEMBLY_BASED_DIR: &'static str;
    const READ_BASED_DIR: &'static str;
    // the following live below ASSEMBLY_BASED_DIR
    const ASSEMBLIES_SUBDIR: &'static str;
    const GENES_SUBDIR: &'static str;
    const ANNOTATIONS_SUBDIR: &'static str;
    const MAPPING_SUBDIR: &'static str;
    const BINS_SUBDIR: &'static str;
    const MAGS_SUBDIR: &'static str;
}

/// the ISA-style unit / ontology placeholders written next to the read count
pub trait DefaultTermParams {
    const READ_COUNT_UNIT: &'static str;
    const TERM_SOURCE_REF: &'static str;
    const TERM_ACCESSION_NUMBER: &'static str;
}

pub struct DefaultParams;

impl DefaultAmpliconParams for DefaultParams {
    const ASSAY_SUFFIX: &'static str = "_GLAmpSeq";
    const RAW_DIR: &'static str = "Raw_Sequence_Data";
    const TRIMMED_DIR: &'static str = "Trimmed_Sequence_Data";
    const FILTERED_DIR: &'static str = "Filtered_Sequence_Data";
    const FINAL_OUTPUTS_DIR: &'static str = "Final_Outputs";
    const MULTIQC_DIR: &'static str = "FastQC_Outputs";
}

impl DefaultMetagenomicsParams for DefaultParams {
    const ASSAY_SUFFIX: &'static str = "_GLmetagenomics";
    const RAW_DIR: &'static str = "Raw_Sequence_Data";
    const FILTERED_DIR: &'static str = "Filtered_Sequence_Data";
    const MULTIQC_DIR: &'static str = "FastQC_Outputs";
    const ASSEMBLY_BASED_DIR: &'static str = "Assembly-based_Processing";
    const READ_BASED_DIR: &'static str = "Read-based_Processing";
    const ASSEMBLIES_SUBDIR: &'static str = "assemblies";
    const GENES_SUBDIR: &'static str = "predicted-genes";
    const ANNOTATIONS_SUBDIR: &'static str = "annotations-and-taxonomy";
    const MAPPING_SUBDIR: &'static str = "read-mapping";
    const BINS_SUBDIR: &'static str = "bins";
    const MAGS_SUBDIR: &'static str = "MAGs";
}

impl DefaultTermParams for DefaultParams {
    const READ_COUNT_UNIT: &'static str = "read";
    // left blank for curators to fill against the ontology of record
    const TERM_SOURCE_REF: &'static str = "";
    const TERM_ACCESSION_NUMBER: &'static str = "";
}
