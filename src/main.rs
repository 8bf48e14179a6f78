//! Entry point for the ehctools application.
//! Handles CLI parsing and dispatches to the validators or the scalar compiler.

use clap::Parser;
use ehc_tools::cli::{Args, Command};
use ehc_tools::config::load_compile_jobs;
use ehc_tools::logging;
use ehc_tools::parallel::{get_parallel_info, ParallelConfig};
use ehc_tools::scalars::compile_all;
use ehc_tools::validate::{check_configs, dry_run_all};
use std::io;
use std::process::ExitCode;
use tracing::error;

fn main() -> ExitCode {
    let args = Args::parse();
    logging::init(args.verbose);

    let success = match args.command {
        Command::CheckConfig { files } => check_configs(&files, &mut io::stdout().lock()),
        Command::DryRun { files } => dry_run_all(&files, &mut io::stdout().lock()),
        Command::CompileScalars { files, threads } => {
            if args.verbose {
                get_parallel_info().log_info();
            }
            let config = ParallelConfig::new(threads);
            match load_compile_jobs(&files).and_then(|jobs| compile_all(&jobs, &config)) {
                Ok(summaries) => {
                    for summary in &summaries {
                        println!(
                            "✅ Saved {} rows for {} scenarios to {}",
                            summary.rows,
                            summary.scenarios,
                            summary.output_file.display()
                        );
                    }
                    true
                }
                Err(e) => {
                    error!(error = %e, "compilation failed");
                    false
                }
            }
        }
    };

    if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
