//! # folio CLI
//!
//! Command-line interface for the folio content pipeline.

mod commands;

use clap::{Parser, Subcommand};
use commands::Kinds;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "folio")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "folio.yml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate content and write the JSON artifacts
    Build {
        /// Content kinds to build
        #[arg(long, value_enum, default_value_t = Kinds::All)]
        kind: Kinds,
    },

    /// Validate content without writing anything
    Check {
        /// Content kinds to check
        #[arg(long, value_enum, default_value_t = Kinds::All)]
        kind: Kinds,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Query the built blog search index
    Search {
        /// Search query
        query: String,

        /// Maximum results to return (defaults to the configured limit)
        #[arg(long)]
        limit: Option<usize>,

        /// Return JSON for machine consumption
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so command output stays parseable
    let subscriber = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(if cli.verbose {
                tracing::Level::DEBUG.into()
            } else {
                tracing::Level::INFO.into()
            }),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Build { kind } => commands::build_content(&cli.config, kind),
        Commands::Check { kind, json } => commands::check_content(&cli.config, kind, json),
        Commands::Search { query, limit, json } => {
            let args = commands::SearchArgs { limit, json };
            commands::search_content(&cli.config, &query, args)
        }
    }
}
