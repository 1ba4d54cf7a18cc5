//! combine-maps CLI - Main entry point

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "combine-maps")]
#[command(version)]
#[command(about = "Concatenate files and combine their source maps", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Concatenate files and append one source map covering all of them
    Bundle {
        /// Files to concatenate, in bundle order
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Write the bundle to FILE instead of stdout
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,

        /// Source root recorded in the combined map
        #[arg(long)]
        source_root: Option<String>,

        /// Write the map to FILE and reference it instead of inlining it
        #[arg(long)]
        map_file: Option<PathBuf>,

        /// Follow sourceMappingURL references to .map files next to each input
        #[arg(long)]
        resolve_map_files: bool,
    },

    /// Remove sourceMappingURL comments from files
    Strip {
        /// Files to strip
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Also remove references to external .map files
        #[arg(long)]
        map_files: bool,

        /// Rewrite each file instead of printing to stdout
        #[arg(long)]
        in_place: bool,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "combine_source_map=info,combine_maps=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Bundle {
            inputs,
            output,
            source_root,
            map_file,
            resolve_map_files,
        } => commands::bundle::execute(commands::bundle::BundleArgs {
            inputs,
            output,
            source_root,
            map_file,
            resolve_map_files,
        }),
        Commands::Strip {
            inputs,
            map_files,
            in_place,
        } => commands::strip::execute(commands::strip::StripArgs {
            inputs,
            map_files,
            in_place,
        }),
    }
}
