/*
cargo validate_heritage

cargo validate_heritage --data-dir data
*/

use std::path::PathBuf;
use std::process;

use clap::Parser;
use log::info;

use heritage_data::config::{DATA_DIR, DEFAULT_LOG_DIR};
use heritage_data::report::run_validation_with;
use heritage_data::{logging, Layout};

/// Check heritage files for duplicate ids and schema violations.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Directory holding heritage-data.json and the ethnic/ sub-directory
    #[arg(long = "data-dir", value_name = "PATH", default_value = DATA_DIR)]
    data_dir: PathBuf,

    /// Directory for the run log
    #[arg(long = "log-dir", value_name = "PATH", default_value = DEFAULT_LOG_DIR)]
    log_dir: PathBuf,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init(&cli.log_dir, "validate_heritage") {
        eprintln!("Cannot set up log file in {}: {e}", cli.log_dir.display());
    }

    println!("🔍 Heritage Data Validation");

    let summary = run_validation_with(&Layout::new(&cli.data_dir), |stage| {
        for line in &stage.lines {
            println!("{line}");
        }
    });
    for line in summary.summary_lines() {
        println!("{line}");
    }

    info!("validation {}", if summary.passed() { "passed" } else { "failed" });
    process::exit(summary.exit_code());
}
