use strum::IntoEnumIterator;
use tabled::{settings::Style, Table, Tabled};

use super::DescribeLayoutOpts;
use crate::utils::artifacts::ArtifactGroup;
use crate::utils::layout::{CellRule, Layout};

#[derive(Tabled)]
struct LayoutColumn {
    #[tabled(rename = "#")]
    position: usize,
    header: &'static str,
    contents: &'static str,
}

fn rule_contents(rule: CellRule) -> &'static str {
    match rule {
        CellRule::SampleName => "sample name from the ISA assay table",
        CellRule::Readme => "run README and processing info archive",
        CellRule::RawReads => "raw read files",
        CellRule::ReadCount => "raw read count (read 1 when paired-end)",
        CellRule::Unit => "always \"read\"",
        CellRule::TermSourceRef | CellRule::TermAccession => "left blank",
        CellRule::TrimmedReads => "trimmed reads, trimming counts and cutadapt log",
        CellRule::FilteredReads => "filtered reads (and filtering counts for amplicon)",
        CellRule::Artifacts(g) => match g {
            ArtifactGroup::AmpliconFinalOutputs => "final outputs present on disk",
            ArtifactGroup::Assemblies => "sample assembly and assembly summaries, if assembled",
            ArtifactGroup::PredictedGenes => "predicted gene files present for the sample",
            ArtifactGroup::AnnotationsAndTaxonomy => "coverage, annotation and taxonomy tables present for the sample",
            ArtifactGroup::ReadMapping => "read-mapping files present for the sample",
            ArtifactGroup::Bins => "sample bins and bin summaries, if any bin was recovered",
            ArtifactGroup::Mags => "sample MAGs and MAG summaries, if any MAG was recovered",
            ArtifactGroup::ReadBased => "read-based outputs present on disk",
        },
    }
}

pub(crate) fn layout_table(layout: Layout) -> Table {
    let rows: Vec<LayoutColumn> = layout
        .columns()
        .into_iter()
        .enumerate()
        .map(|(i, c)| LayoutColumn {
            position: i + 1,
            header: c.header,
            contents: rule_contents(c.rule),
        })
        .collect();
    let mut t = Table::new(rows);
    t.with(Style::rounded());
    t
}

pub fn describe_layouts(opts: DescribeLayoutOpts) -> anyhow::Result<()> {
    let layouts: Vec<Layout> = if opts.all {
        Layout::iter().collect()
    } else {
        vec![Layout::select(opts.assay, opts.primers_already_trimmed)]
    };
    for l in layouts {
        println!("{} layout:", l.name());
        println!("{}", layout_table(l));
    }
    Ok(())
}
