//! Defines command-line interface options using `clap` for the ehctools binary.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Validation and compilation tools for E3SM/GCAM simulation output
#[derive(Parser, Debug)]
#[command(
    version,
    name = "ehctools",
    about = "Check job configurations and compile EHC scalar files"
)]
pub struct Args {
    /// Enable verbose output.
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check JSON configuration files for missing fields, length mismatches and unknown regions
    CheckConfig {
        /// Paths to JSON configuration files
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Replay the extraction set-up of JSON configuration files without reading any data
    DryRun {
        /// Paths to JSON configuration files
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Compile EHC scalar files into one table per job
    CompileScalars {
        /// Paths to JSON job files
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Number of worker threads. Defaults to min(16, cores / 2).
        #[arg(short = 't', long)]
        threads: Option<usize>,
    },
}
