use anyhow::{bail, Result};
use phf::phf_map;
use std::path::PathBuf;
use strum::IntoEnumIterator;
use strum_macros::EnumIter;
use tabled::{settings::Style, Table, Tabled};
use tracing::info;

use super::FetchReferencesOpts;
use crate::utils::file_utils::create_dir_if_absent;
use crate::utils::remote::{download_to_file_compute_hash, is_remote_url, url_file_name};

/// DECIPHER taxonomy training sets used to classify amplicon sequences.
#[derive(EnumIter, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceDataset {
    SilvaSsuR138,
    Unite,
    Pr2,
}

impl ReferenceDataset {
    pub fn name(&self) -> &'static str {
        match self {
            ReferenceDataset::SilvaSsuR138 => "silva",
            ReferenceDataset::Unite => "unite",
            ReferenceDataset::Pr2 => "pr2",
        }
    }

    pub fn file_name(&self) -> &'static str {
        match self {
            ReferenceDataset::SilvaSsuR138 => "SILVA_SSU_r138_2019.RData",
            ReferenceDataset::Unite => "UNITE_v2020_February2020.RData",
            ReferenceDataset::Pr2 => "PR2_v4_13_March2021.RData",
        }
    }

    pub fn url(&self) -> &'static str {
        match self {
            ReferenceDataset::SilvaSsuR138 => {
                "https://www2.decipher.codes/data/Downloads/TrainingSets/SILVA_SSU_r138_2019.RData"
            }
            ReferenceDataset::Unite => {
                "https://www2.decipher.codes/data/Downloads/TrainingSets/UNITE_v2020_February2020.RData"
            }
            ReferenceDataset::Pr2 => {
                "https://www2.decipher.codes/data/Downloads/TrainingSets/PR2_v4_13_March2021.RData"
            }
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ReferenceDataset::SilvaSsuR138 => "SILVA SSU r138 (16S / 18S)",
            ReferenceDataset::Unite => "UNITE 2020 (ITS)",
            ReferenceDataset::Pr2 => "PR2 v4.13 (18S)",
        }
    }
}

/// Accepted dataset names, including the target-region aliases the amplicon
/// workflow uses.
static DATASET_NAMES: phf::Map<&'static str, ReferenceDataset> = phf_map! {
    "silva" => ReferenceDataset::SilvaSsuR138,
    "silva-ssu-r138" => ReferenceDataset::SilvaSsuR138,
    "16s" => ReferenceDataset::SilvaSsuR138,
    "unite" => ReferenceDataset::Unite,
    "its" => ReferenceDataset::Unite,
    "pr2" => ReferenceDataset::Pr2,
    "18s" => ReferenceDataset::Pr2,
};

#[derive(Tabled)]
struct DatasetRow {
    name: &'static str,
    description: &'static str,
    file: &'static str,
    url: &'static str,
}

/// A resolved download: where from and the file name to write.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct Download {
    pub url: String,
    pub file_name: String,
}

pub(crate) fn resolve(dataset: &str) -> Result<Download> {
    if is_remote_url(dataset) {
        let Some(file_name) = url_file_name(dataset) else {
            bail!("could not derive a file name from the url {}", dataset);
        };
        return Ok(Download {
            url: dataset.to_string(),
            file_name: file_name.to_string(),
        });
    }
    match DATASET_NAMES.get(dataset.to_ascii_lowercase().as_str()) {
        Some(d) => Ok(Download {
            url: d.url().to_string(),
            file_name: d.file_name().to_string(),
        }),
        None => {
            let known: Vec<&str> = ReferenceDataset::iter().map(|d| d.name()).collect();
            bail!(
                "unknown reference dataset {}; expected a url or one of: {}",
                dataset,
                known.join(", ")
            )
        }
    }
}

fn list_datasets() {
    let rows: Vec<DatasetRow> = ReferenceDataset::iter()
        .map(|d| DatasetRow {
            name: d.name(),
            description: d.description(),
            file: d.file_name(),
            url: d.url(),
        })
        .collect();
    println!("{}", Table::new(rows).with(Style::rounded()));
}

pub fn fetch_references(opts: FetchReferencesOpts) -> anyhow::Result<()> {
    if opts.list {
        list_datasets();
        return Ok(());
    }

    // every argument is resolved before anything is fetched
    let downloads = opts
        .datasets
        .iter()
        .map(|d| resolve(d))
        .collect::<Result<Vec<Download>>>()?;

    create_dir_if_absent(&opts.output_dir)?;
    for d in downloads {
        let dest: PathBuf = opts.output_dir.join(&d.file_name);
        info!("downloading {} to {}", d.url, dest.display());
        download_to_file_compute_hash(&d.url, &dest)?;
    }
    Ok(())
}
