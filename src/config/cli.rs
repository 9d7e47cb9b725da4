use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "faces-sync")]
#[command(about = "Recruitment intake sync: bulk CRM import and single-submission upsert")]
pub struct Cli {
    /// Path to a TOML config file; defaults to env-based configuration
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Clean, validate and deduplicate a spreadsheet export, then
    /// optionally upload it to the CRM in batches
    Import {
        /// Input file (.csv, or .json array of row objects)
        #[arg(long)]
        file: PathBuf,

        /// Validate and clean only; never call the CRM
        #[arg(long)]
        dry_run: bool,

        /// Actually upload the cleaned records to the CRM
        #[arg(long)]
        import: bool,
    },

    /// Submit one application JSON: store insert plus CRM upsert
    Submit {
        /// JSON file holding a single form submission
        #[arg(long)]
        file: PathBuf,
    },

    /// Idempotently create the custom CRM contact properties
    SetupProperties,
}
