//! Existence-gated output cells.
//!
//! A downstream output group only contributes to a sample's row when at least
//! one of its files is present on disk and non-empty; otherwise the cell is
//! left blank, which curators read as "this sample produced no such output".
//! Filesystem access goes through [`FileProbe`] so the gating rules can be
//! exercised without a real directory tree.

use anyhow::Result;
use regex::Regex;
#[cfg(test)]
use std::collections::HashSet;
use std::path::Path;
#[cfg(test)]
use std::path::PathBuf;
use tracing::debug;

use crate::utils::constants::CELL_FILE_SEPARATOR;
use crate::utils::file_utils::is_nonempty_file;
use crate::utils::run_config::RunConfig;

/// Read-only view of the processed-data tree.
pub trait FileProbe {
    /// `true` if `path` is a regular file with non-zero length.
    fn is_nonempty_file(&self, path: &Path) -> bool;
    /// Names of the non-empty regular files directly inside `dir`; empty
    /// when `dir` does not exist.
    fn nonempty_files_in(&self, dir: &Path) -> Vec<String>;
}

/// Probes the real filesystem.
pub struct DiskProbe;

impl FileProbe for DiskProbe {
    fn is_nonempty_file(&self, path: &Path) -> bool {
        is_nonempty_file(path)
    }

    fn nonempty_files_in(&self, dir: &Path) -> Vec<String> {
        let Ok(rd) = std::fs::read_dir(dir) else {
            return Vec::new();
        };
        rd.filter_map(|de| de.ok())
            .filter(|de| is_nonempty_file(de.path()))
            .filter_map(|de| de.file_name().to_str().map(String::from))
            .collect()
    }
}

/// An in-memory tree: the set of paths that exist as non-empty files.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryProbe {
    files: HashSet<PathBuf>,
}

#[cfg(test)]
impl MemoryProbe {
    pub fn with_files<I, P>(files: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            files: files.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
impl FileProbe for MemoryProbe {
    fn is_nonempty_file(&self, path: &Path) -> bool {
        self.files.contains(path)
    }

    fn nonempty_files_in(&self, dir: &Path) -> Vec<String> {
        self.files
            .iter()
            .filter(|p| p.parent() == Some(dir))
            .filter_map(|p| p.file_name().and_then(|f| f.to_str()).map(String::from))
            .collect()
    }
}

/// The optional output groups a row can reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactGroup {
    /// amplicon feature table, taxonomy and tracking outputs (run level)
    AmpliconFinalOutputs,
    Assemblies,
    PredictedGenes,
    AnnotationsAndTaxonomy,
    ReadMapping,
    Bins,
    Mags,
    /// metagenomics read-based functional / taxonomic profiles (run level)
    ReadBased,
}

/// What a group looks for once names are resolved for one sample.
enum Expected {
    /// each file qualifies on its own; the cell lists those present
    Each(Vec<String>),
    /// the listed per-sample files gate the cell; `companions` are the
    /// run-level summaries appended whenever the gate opens
    Gated {
        per_sample: Vec<String>,
        companions: Vec<String>,
    },
    /// like `Gated`, but the per-sample files are every file in the
    /// directory matching `pattern`, ordered by their number
    Numbered {
        pattern: Regex,
        companions: Vec<String>,
    },
}

impl ArtifactGroup {
    /// The directory the group's files live in.
    pub fn dir<'a>(&self, cfg: &'a RunConfig) -> &'a Path {
        let d = &cfg.dirs;
        match self {
            ArtifactGroup::AmpliconFinalOutputs => &d.final_outputs,
            ArtifactGroup::Assemblies => &d.assemblies,
            ArtifactGroup::PredictedGenes => &d.genes,
            ArtifactGroup::AnnotationsAndTaxonomy => &d.annotations,
            ArtifactGroup::ReadMapping => &d.mapping,
            ArtifactGroup::Bins => &d.bins,
            ArtifactGroup::Mags => &d.mags,
            ArtifactGroup::ReadBased => &d.read_based,
        }
    }

    fn expected(&self, cfg: &RunConfig, sample: &str) -> Result<Expected> {
        let sfx = |stem: &str, ext: &str| cfg.suffixed(stem, ext);
        let per = |tail: &str, ext: &str| cfg.suffixed(&format!("{}{}", sample, tail), ext);

        let e = match self {
            ArtifactGroup::AmpliconFinalOutputs => {
                let p = cfg.prefix_for(sample)?;
                let features = format!("{}{}", p, cfg.naming.as_str());
                Expected::Each(vec![
                    sfx(&features, "fasta"),
                    sfx(&format!("{}counts", p), "tsv"),
                    sfx(&format!("{}taxonomy", p), "tsv"),
                    sfx(&format!("{}taxonomy-and-counts", p), "tsv"),
                    sfx(&format!("{}taxonomy-and-counts", p), "biom.zip"),
                    sfx(&format!("{}read-count-tracking", p), "tsv"),
                ])
            }
            ArtifactGroup::Assemblies => Expected::Gated {
                per_sample: vec![per("-assembly", "fasta")],
                companions: vec![sfx("assembly-summaries", "tsv")],
            },
            ArtifactGroup::PredictedGenes => Expected::Gated {
                per_sample: vec![
                    per("-genes", "faa"),
                    per("-genes", "fasta"),
                    per("-genes", "gff"),
                ],
                companions: vec![],
            },
            ArtifactGroup::AnnotationsAndTaxonomy => Expected::Gated {
                per_sample: vec![
                    per("-gene-coverage-annotation-and-tax", "tsv"),
                    per("-contig-coverage-and-tax", "tsv"),
                ],
                companions: vec![],
            },
            ArtifactGroup::ReadMapping => Expected::Gated {
                per_sample: vec![
                    per("", "bam"),
                    per("-mapping-info", "txt"),
                    per("-metabat-assembly-depth", "tsv"),
                ],
                companions: vec![],
            },
            ArtifactGroup::Bins => Expected::Numbered {
                pattern: numbered_pattern(sample, "-bin.", &cfg.assay_suffix, "fasta")?,
                companions: vec![
                    sfx("bins-overview", "tsv"),
                    sfx("bins-checkm-out", "tsv"),
                ],
            },
            ArtifactGroup::Mags => Expected::Numbered {
                pattern: numbered_pattern(sample, "-MAG-", &cfg.assay_suffix, "fasta")?,
                companions: vec![
                    sfx("MAGs-overview", "tsv"),
                    sfx("MAGs-checkm-out", "tsv"),
                ],
            },
            ArtifactGroup::ReadBased => Expected::Each(vec![
                sfx("Gene-families", "tsv"),
                sfx("Gene-families-grouped-by-taxa", "tsv"),
                sfx("Gene-families-cpm", "tsv"),
                sfx("Gene-families-KO-cpm", "tsv"),
                sfx("Pathway-abundances", "tsv"),
                sfx("Pathway-abundances-cpm", "tsv"),
                sfx("Pathway-coverages", "tsv"),
                sfx("Metaphlan-taxonomy", "tsv"),
            ]),
        };
        Ok(e)
    }

    /// The cell content for `sample`, or `None` if no file of the group
    /// qualifies. File names are joined with `", "`.
    pub fn cell(&self, cfg: &RunConfig, sample: &str, probe: &dyn FileProbe) -> Result<Option<String>> {
        let dir = self.dir(cfg);
        let present = |name: &String| probe.is_nonempty_file(&dir.join(name));

        let names: Vec<String> = match self.expected(cfg, sample)? {
            Expected::Each(files) => files.into_iter().filter(|f| present(f)).collect(),
            Expected::Gated {
                per_sample,
                companions,
            } => {
                let found: Vec<String> = per_sample.into_iter().filter(|f| present(f)).collect();
                gate(found, companions)
            }
            Expected::Numbered {
                pattern,
                companions,
            } => {
                let mut found: Vec<(u64, String)> = probe
                    .nonempty_files_in(dir)
                    .into_iter()
                    .filter_map(|f| {
                        let n = pattern.captures(&f)?.get(1)?.as_str().parse::<u64>().ok()?;
                        Some((n, f))
                    })
                    .collect();
                found.sort();
                gate(found.into_iter().map(|(_, f)| f).collect(), companions)
            }
        };

        if names.is_empty() {
            debug!("no {:?} output found for {} in {}", self, sample, dir.display());
            Ok(None)
        } else {
            Ok(Some(names.join(CELL_FILE_SEPARATOR)))
        }
    }
}

fn gate(mut found: Vec<String>, companions: Vec<String>) -> Vec<String> {
    if !found.is_empty() {
        found.extend(companions);
    }
    found
}

/// `^<sample><infix><n><suffix>.<ext>$` with `<n>` captured.
fn numbered_pattern(sample: &str, infix: &str, suffix: &str, ext: &str) -> Result<Regex> {
    let re = format!(
        r"^{}{}([0-9]+){}\.{}$",
        regex::escape(sample),
        regex::escape(infix),
        regex::escape(suffix),
        regex::escape(ext)
    );
    Ok(Regex::new(&re)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::run_config::test_config::config_at;
    use crate::utils::run_config::{AssayType, Endedness, FeatureNaming};

    fn mg_config() -> RunConfig {
        config_at(Path::new("/data"), AssayType::Metagenomics, Endedness::Paired)
    }

    #[test]
    fn test_assembly_gate() {
        let cfg = mg_config();
        let probe = MemoryProbe::with_files([
            "/data/Assembly-based_Processing/assemblies/S1-assembly_GLmetagenomics.fasta",
            "/data/Assembly-based_Processing/assemblies/assembly-summaries_GLmetagenomics.tsv",
        ]);
        let g = ArtifactGroup::Assemblies;
        assert_eq!(
            g.cell(&cfg, "S1", &probe).expect("cell"),
            Some(String::from(
                "S1-assembly_GLmetagenomics.fasta, assembly-summaries_GLmetagenomics.tsv"
            ))
        );
        assert_eq!(g.cell(&cfg, "S2", &probe).expect("cell"), None);
    }

    #[test]
    fn test_partial_gene_predictions_listed() {
        let cfg = mg_config();
        let probe = MemoryProbe::with_files([
            "/data/Assembly-based_Processing/predicted-genes/S1-genes_GLmetagenomics.gff",
            "/data/Assembly-based_Processing/predicted-genes/S1-genes_GLmetagenomics.faa",
        ]);
        assert_eq!(
            ArtifactGroup::PredictedGenes
                .cell(&cfg, "S1", &probe)
                .expect("cell"),
            Some(String::from(
                "S1-genes_GLmetagenomics.faa, S1-genes_GLmetagenomics.gff"
            ))
        );
    }

    #[test]
    fn test_bins_sorted_numerically_and_not_confused_across_samples() {
        let cfg = mg_config();
        let bins = "/data/Assembly-based_Processing/bins";
        let probe = MemoryProbe::with_files([
            format!("{}/S1-bin.10_GLmetagenomics.fasta", bins),
            format!("{}/S1-bin.2_GLmetagenomics.fasta", bins),
            format!("{}/S10-bin.1_GLmetagenomics.fasta", bins),
            format!("{}/S1-bin.3_GLmetagenomics.fa", bins),
        ]);
        assert_eq!(
            ArtifactGroup::Bins.cell(&cfg, "S1", &probe).expect("cell"),
            Some(String::from(
                "S1-bin.2_GLmetagenomics.fasta, S1-bin.10_GLmetagenomics.fasta, bins-overview_GLmetagenomics.tsv, bins-checkm-out_GLmetagenomics.tsv"
            ))
        );
        assert_eq!(ArtifactGroup::Mags.cell(&cfg, "S1", &probe).expect("cell"), None);
    }

    #[test]
    fn test_amplicon_final_outputs_each_gated() {
        let cfg = config_at(Path::new("/data"), AssayType::Amplicon, Endedness::Paired);
        let probe = MemoryProbe::with_files([
            "/data/Final_Outputs/ASVs_GLAmpSeq.fasta",
            "/data/Final_Outputs/taxonomy-and-counts_GLAmpSeq.biom.zip",
        ]);
        assert_eq!(
            ArtifactGroup::AmpliconFinalOutputs
                .cell(&cfg, "S1", &probe)
                .expect("cell"),
            Some(String::from(
                "ASVs_GLAmpSeq.fasta, taxonomy-and-counts_GLAmpSeq.biom.zip"
            ))
        );
        let empty = MemoryProbe::default();
        assert_eq!(
            ArtifactGroup::AmpliconFinalOutputs
                .cell(&cfg, "S1", &empty)
                .expect("cell"),
            None
        );
    }

    #[test]
    fn test_disk_probe_skips_empty_files() {
        let td = tempfile::tempdir().expect("tempdir");
        std::fs::write(td.path().join("full.tsv"), "x").expect("write");
        std::fs::write(td.path().join("empty.tsv"), "").expect("write");
        std::fs::create_dir(td.path().join("sub")).expect("mkdir");
        assert_eq!(DiskProbe.nonempty_files_in(td.path()), vec!["full.tsv"]);
        assert!(DiskProbe.nonempty_files_in(&td.path().join("absent")).is_empty());
    }

    #[test]
    fn test_otu_naming() {
        let mut cfg = config_at(Path::new("/data"), AssayType::Amplicon, Endedness::Paired);
        cfg.naming = FeatureNaming::Otu;
        let probe = MemoryProbe::with_files([
            "/data/Final_Outputs/OTUs_GLAmpSeq.fasta",
            "/data/Final_Outputs/ASVs_GLAmpSeq.fasta",
            "/data/Final_Outputs/read-count-tracking_GLAmpSeq.tsv",
        ]);
        assert_eq!(
            ArtifactGroup::AmpliconFinalOutputs
                .cell(&cfg, "S1", &probe)
                .expect("cell"),
            Some(String::from(
                "OTUs_GLAmpSeq.fasta, read-count-tracking_GLAmpSeq.tsv"
            ))
        );
    }

    #[test]
    fn test_mags_listed_with_summaries() {
        let cfg = mg_config();
        let probe = MemoryProbe::with_files([
            "/data/Assembly-based_Processing/MAGs/S1-MAG-3_GLmetagenomics.fasta",
            "/data/Assembly-based_Processing/MAGs/S1-MAG-1_GLmetagenomics.fasta",
            "/data/Assembly-based_Processing/MAGs/S2-MAG-1_GLmetagenomics.fasta",
        ]);
        assert_eq!(
            ArtifactGroup::Mags.cell(&cfg, "S1", &probe).expect("cell"),
            Some(String::from(
                "S1-MAG-1_GLmetagenomics.fasta, S1-MAG-3_GLmetagenomics.fasta, MAGs-overview_GLmetagenomics.tsv, MAGs-checkm-out_GLmetagenomics.tsv"
            ))
        );
        assert_eq!(ArtifactGroup::Bins.cell(&cfg, "S1", &probe).expect("cell"), None);
    }

    #[test]
    fn test_read_mapping_names() {
        let cfg = mg_config();
        let dir = "/data/Assembly-based_Processing/read-mapping";
        let probe = MemoryProbe::with_files([format!("{}/S1-mapping-info_GLmetagenomics.txt", dir)]);
        assert_eq!(
            ArtifactGroup::ReadMapping.cell(&cfg, "S1", &probe).expect("cell"),
            Some(String::from("S1-mapping-info_GLmetagenomics.txt"))
        );

        let probe = MemoryProbe::with_files([
            format!("{}/S1-metabat-assembly-depth_GLmetagenomics.tsv", dir),
            format!("{}/S1_GLmetagenomics.bam", dir),
            format!("{}/S1-mapping-info_GLmetagenomics.txt", dir),
        ]);
        assert_eq!(
            ArtifactGroup::ReadMapping.cell(&cfg, "S1", &probe).expect("cell"),
            Some(String::from(
                "S1_GLmetagenomics.bam, S1-mapping-info_GLmetagenomics.txt, S1-metabat-assembly-depth_GLmetagenomics.tsv"
            ))
        );
    }

    #[test]
    fn test_annotation_names() {
        let cfg = mg_config();
        let dir = "/data/Assembly-based_Processing/annotations-and-taxonomy";
        let probe = MemoryProbe::with_files([format!("{}/S1-contig-coverage-and-tax_GLmetagenomics.tsv", dir)]);
        assert_eq!(
            ArtifactGroup::AnnotationsAndTaxonomy
                .cell(&cfg, "S1", &probe)
                .expect("cell"),
            Some(String::from("S1-contig-coverage-and-tax_GLmetagenomics.tsv"))
        );

        let probe = MemoryProbe::with_files([
            format!("{}/S1-contig-coverage-and-tax_GLmetagenomics.tsv", dir),
            format!("{}/S1-gene-coverage-annotation-and-tax_GLmetagenomics.tsv", dir),
        ]);
        assert_eq!(
            ArtifactGroup::AnnotationsAndTaxonomy
                .cell(&cfg, "S1", &probe)
                .expect("cell"),
            Some(String::from(
                "S1-gene-coverage-annotation-and-tax_GLmetagenomics.tsv, S1-contig-coverage-and-tax_GLmetagenomics.tsv"
            ))
        );
        assert_eq!(
            ArtifactGroup::AnnotationsAndTaxonomy
                .cell(&cfg, "S2", &probe)
                .expect("cell"),
            None
        );
    }

    #[test]
    fn test_read_based_outputs_each_gated() {
        let cfg = mg_config();
        let dir = "/data/Read-based_Processing";
        let probe = MemoryProbe::with_files([
            format!("{}/Pathway-coverages_GLmetagenomics.tsv", dir),
            format!("{}/Metaphlan-taxonomy_GLmetagenomics.tsv", dir),
            format!("{}/Gene-families_GLmetagenomics.tsv", dir),
            format!("{}/Gene-families-KO-cpm_GLmetagenomics.tsv", dir),
        ]);
        assert_eq!(
            ArtifactGroup::ReadBased.cell(&cfg, "S1", &probe).expect("cell"),
            Some(String::from(
                "Gene-families_GLmetagenomics.tsv, Gene-families-KO-cpm_GLmetagenomics.tsv, Pathway-coverages_GLmetagenomics.tsv, Metaphlan-taxonomy_GLmetagenomics.tsv"
            ))
        );
        let probe = MemoryProbe::with_files([format!("{}/Pathway-coverages_GLmetagenomics.tsv", dir)]);
        assert_eq!(
            ArtifactGroup::ReadBased.cell(&cfg, "S1", &probe).expect("cell"),
            Some(String::from("Pathway-coverages_GLmetagenomics.tsv"))
        );
    }
}
