use clap::{error::ErrorKind, Parser};
use tracing::error;
use tracing_subscriber::{filter::LevelFilter, fmt, prelude::*, EnvFilter};

mod curation_commands;
mod defaults;
mod utils;

use curation_commands::*;

/// Curation helpers for GeneLab processed sequencing data: builds the
/// read-count and associated-file-names tables submitted alongside a run.
#[derive(Debug, Parser)]
#[command(author, version, about)]
#[command(propagate_version = true)]
#[command(arg_required_else_help = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::ReadCounts(opts) => write_read_counts(opts),
        Commands::FileAssociations(opts) => write_file_associations(opts),
        Commands::Readme(opts) => write_readme(opts),
        Commands::DescribeLayout(opts) => describe_layouts(opts),
        Commands::FetchReferences(opts) => fetch_references(opts),
    }
}

/// Usage requested or implied by an empty invocation exits cleanly; anything
/// else clap rejects is a failure.
fn exit_code(e: &clap::Error) -> i32 {
    match e.kind() {
        ErrorKind::DisplayHelp
        | ErrorKind::DisplayVersion
        | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => 0,
        _ => 1,
    }
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // printing to a closed stdout is not worth reporting
            let _ = e.print();
            std::process::exit(exit_code(&e));
        }
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .init();

    if let Err(e) = run(cli) {
        error!("{:#}", e);
        println!("{:#}", e);
        std::process::exit(1);
    }
}
