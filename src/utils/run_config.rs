use anyhow::Result;
use clap::ValueEnum;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::curation_commands::{DirOpts, RunOpts};
use crate::defaults::{DefaultAmpliconParams, DefaultMetagenomicsParams, DefaultParams};
use crate::utils::errors::CurationError;
use crate::utils::layout::Layout;
use crate::utils::prefix_map::PrefixMap;

/// The processing workflow that produced a processed-data tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum AssayType {
    Amplicon,
    Metagenomics,
}

impl AssayType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssayType::Amplicon => "amplicon",
            AssayType::Metagenomics => "metagenomics",
        }
    }

    pub fn default_suffix(&self) -> &'static str {
        match self {
            AssayType::Amplicon => <DefaultParams as DefaultAmpliconParams>::ASSAY_SUFFIX,
            AssayType::Metagenomics => <DefaultParams as DefaultMetagenomicsParams>::ASSAY_SUFFIX,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Endedness {
    Paired,
    Single,
}

impl Endedness {
    /// The read-direction tags files of one sample carry, in output order.
    pub fn directions(&self) -> &'static [&'static str] {
        match self {
            Endedness::Paired => &["_R1", "_R2"],
            Endedness::Single => &[""],
        }
    }
}

/// How the amplicon workflow names its sequence features.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FeatureNaming {
    Asv,
    Otu,
}

impl FeatureNaming {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureNaming::Asv => "ASVs",
            FeatureNaming::Otu => "OTUs",
        }
    }
}

/// Absolute (or root-relative) locations of every directory a run reads.
#[derive(Clone, Debug)]
pub struct OutputDirs {
    pub raw: PathBuf,
    pub trimmed: PathBuf,
    pub filtered: PathBuf,
    pub multiqc: PathBuf,
    pub final_outputs: PathBuf,
    pub assemblies: PathBuf,
    pub genes: PathBuf,
    pub annotations: PathBuf,
    pub mapping: PathBuf,
    pub bins: PathBuf,
    pub mags: PathBuf,
    pub read_based: PathBuf,
}

impl OutputDirs {
    pub fn for_assay(assay: AssayType, opts: &DirOpts) -> Self {
        let root = opts.processed_dir.as_path();
        let pick = |o: &Option<PathBuf>, d: &str| root.join(o.as_deref().unwrap_or(Path::new(d)));

        type Mg = DefaultParams;
        let assembly_based = pick(
            &opts.assembly_based_dir,
            <Mg as DefaultMetagenomicsParams>::ASSEMBLY_BASED_DIR,
        );
        let (raw, filtered, multiqc) = match assay {
            AssayType::Amplicon => (
                <DefaultParams as DefaultAmpliconParams>::RAW_DIR,
                <DefaultParams as DefaultAmpliconParams>::FILTERED_DIR,
                <DefaultParams as DefaultAmpliconParams>::MULTIQC_DIR,
            ),
            AssayType::Metagenomics => (
                <Mg as DefaultMetagenomicsParams>::RAW_DIR,
                <Mg as DefaultMetagenomicsParams>::FILTERED_DIR,
                <Mg as DefaultMetagenomicsParams>::MULTIQC_DIR,
            ),
        };

        Self {
            raw: pick(&opts.raw_dir, raw),
            trimmed: pick(
                &opts.trimmed_dir,
                <DefaultParams as DefaultAmpliconParams>::TRIMMED_DIR,
            ),
            filtered: pick(&opts.filtered_dir, filtered),
            multiqc: pick(&opts.multiqc_dir, multiqc),
            final_outputs: pick(
                &opts.final_outputs_dir,
                <DefaultParams as DefaultAmpliconParams>::FINAL_OUTPUTS_DIR,
            ),
            assemblies: assembly_based.join(<Mg as DefaultMetagenomicsParams>::ASSEMBLIES_SUBDIR),
            genes: assembly_based.join(<Mg as DefaultMetagenomicsParams>::GENES_SUBDIR),
            annotations: assembly_based.join(<Mg as DefaultMetagenomicsParams>::ANNOTATIONS_SUBDIR),
            mapping: assembly_based.join(<Mg as DefaultMetagenomicsParams>::MAPPING_SUBDIR),
            bins: assembly_based.join(<Mg as DefaultMetagenomicsParams>::BINS_SUBDIR),
            mags: assembly_based.join(<Mg as DefaultMetagenomicsParams>::MAGS_SUBDIR),
            read_based: pick(
                &opts.read_based_dir,
                <Mg as DefaultMetagenomicsParams>::READ_BASED_DIR,
            ),
        }
    }
}

/// Everything a curation run needs to know about how the data was
/// processed. Resolved once from the command line and never modified.
#[derive(Clone, Debug)]
pub struct RunConfig {
    pub run_id: String,
    pub assay: AssayType,
    pub endedness: Endedness,
    pub primers_trimmed: bool,
    pub naming: FeatureNaming,
    pub assay_suffix: String,
    pub raw_file_prefix: String,
    pub dirs: OutputDirs,
    prefix_map: Option<PrefixMap>,
}

impl RunConfig {
    pub fn from_opts(opts: &RunOpts) -> Result<Self> {
        let prefix_map = match &opts.prefix_map {
            Some(p) => Some(PrefixMap::from_path(p)?),
            None => None,
        };

        if opts.assay == AssayType::Metagenomics {
            if opts.primers_already_trimmed {
                warn!("--primers-already-trimmed only applies to amplicon data; ignoring it.");
            }
            if opts.use_otus {
                warn!("--use-otus only applies to amplicon data; ignoring it.");
            }
        }

        Ok(Self {
            run_id: opts.run_id.clone(),
            assay: opts.assay,
            endedness: if opts.single_ended {
                Endedness::Single
            } else {
                Endedness::Paired
            },
            primers_trimmed: opts.assay == AssayType::Amplicon && opts.primers_already_trimmed,
            naming: if opts.use_otus {
                FeatureNaming::Otu
            } else {
                FeatureNaming::Asv
            },
            assay_suffix: opts
                .assay_suffix
                .clone()
                .unwrap_or_else(|| opts.assay.default_suffix().to_string()),
            raw_file_prefix: opts.raw_file_prefix.clone(),
            dirs: OutputDirs::for_assay(opts.assay, &opts.dirs),
            prefix_map,
        })
    }

    pub fn prefix_map(&self) -> Option<&PrefixMap> {
        self.prefix_map.as_ref()
    }

    pub fn layout(&self) -> Layout {
        Layout::select(self.assay, self.primers_trimmed)
    }

    /// The file prefix the run-level outputs of `sample` were written under;
    /// empty when no prefix mapping is in use.
    pub fn prefix_for(&self, sample: &str) -> Result<&str, CurationError> {
        match &self.prefix_map {
            Some(pm) => pm.prefix_for(sample),
            None => Ok(""),
        }
    }

    /// `<stem><assay suffix>.<ext>`
    pub fn suffixed(&self, stem: &str, ext: &str) -> String {
        format!("{}{}.{}", stem, self.assay_suffix, ext)
    }

    /// Per-sample read files of a processing stage (`raw`, `trimmed`, `filtered`).
    pub fn read_files(&self, sample: &str, stage: &str) -> Vec<String> {
        let prefix = if stage == "raw" {
            self.raw_file_prefix.as_str()
        } else {
            ""
        };
        self.endedness
            .directions()
            .iter()
            .map(|d| format!("{}{}{}_{}.fastq.gz", prefix, sample, d, stage))
            .collect()
    }

    /// The MultiQC keys for each raw read file of `sample`, aligned with
    /// [`RunConfig::read_files`] for the `raw` stage.
    pub fn raw_count_keys(&self, sample: &str) -> Vec<String> {
        self.endedness
            .directions()
            .iter()
            .map(|d| format!("{}{}_raw", sample, d))
            .collect()
    }

    /// The key whose count stands for the whole sample: read 1 when
    /// paired-end, the only file otherwise.
    pub fn sample_count_key(&self, sample: &str) -> String {
        match self.endedness {
            Endedness::Paired => format!("{}_R1_raw", sample),
            Endedness::Single => format!("{}_raw", sample),
        }
    }

    /// The raw MultiQC archives to read counts from, one per prefix.
    pub fn multiqc_archives(&self) -> Vec<PathBuf> {
        let archive_for = |prefix: &str| {
            self.dirs
                .multiqc
                .join(format!("{}raw_multiqc{}_data.zip", prefix, self.assay_suffix))
        };
        match &self.prefix_map {
            Some(pm) => pm.prefixes().iter().map(|p| archive_for(p)).collect(),
            None => vec![archive_for("")],
        }
    }

    pub fn default_read_count_output(&self) -> PathBuf {
        PathBuf::from(format!(
            "{}-read-counts{}.tsv",
            self.run_id, self.assay_suffix
        ))
    }

    pub fn default_file_associations_output(&self) -> PathBuf {
        PathBuf::from(format!(
            "{}-associated-file-names{}.tsv",
            self.run_id, self.assay_suffix
        ))
    }
}

#[cfg(test)]
pub(crate) mod test_config {
    use super::*;

    /// A configuration rooted at `root` with every directory at its default
    /// name, for tests that build a processed-data tree on disk.
    pub(crate) fn config_at(root: &Path, assay: AssayType, endedness: Endedness) -> RunConfig {
        let dir_opts = DirOpts {
            processed_dir: root.to_path_buf(),
            raw_dir: None,
            trimmed_dir: None,
            filtered_dir: None,
            multiqc_dir: None,
            final_outputs_dir: None,
            assembly_based_dir: None,
            read_based_dir: None,
        };
        RunConfig {
            run_id: String::from("GLDS-000"),
            assay,
            endedness,
            primers_trimmed: false,
            naming: FeatureNaming::Asv,
            assay_suffix: assay.default_suffix().to_string(),
            raw_file_prefix: String::new(),
            dirs: OutputDirs::for_assay(assay, &dir_opts),
            prefix_map: None,
        }
    }

    pub(crate) fn with_prefix_map(mut cfg: RunConfig, pm: PrefixMap) -> RunConfig {
        cfg.prefix_map = Some(pm);
        cfg
    }
}
