/*
cargo merge_heritage

cargo merge_heritage \
    --data-dir data \
    --output data/heritage-data.json
*/

use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use log::{error, info};

use heritage_data::config::{CATEGORY_PATTERN, DATA_DIR, DEFAULT_LOG_DIR};
use heritage_data::discovery::discover;
use heritage_data::merge::{file_counts, load_all, merge_loaded, summary_lines, write_unified};
use heritage_data::{logging, Layout};

/// Merge the per-ethnicity heritage files into one unified file.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Directory holding heritage-data.json and the ethnic/ sub-directory
    #[arg(long = "data-dir", value_name = "PATH", default_value = DATA_DIR)]
    data_dir: PathBuf,

    /// Unified file to create/overwrite (default: <data-dir>/heritage-data.json)
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Directory for the run log
    #[arg(long = "log-dir", value_name = "PATH", default_value = DEFAULT_LOG_DIR)]
    log_dir: PathBuf,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if let Err(e) = logging::init(&args.log_dir, "merge_heritage") {
        eprintln!("Cannot set up log file in {}: {e}", args.log_dir.display());
    }

    let layout = Layout::new(&args.data_dir);
    let output = args.output.unwrap_or_else(|| layout.unified_path());
    let category_dir = layout.category_dir();

    let paths = match discover(&category_dir, CATEGORY_PATTERN) {
        Ok(paths) => paths,
        Err(e) if e.is_discovery() => {
            error!("{e}");
            println!("❌ No ethnicity-specific files found.");
            println!(
                "   Looking for files matching: {}",
                category_dir.join(CATEGORY_PATTERN).display()
            );
            process::exit(1);
        }
        Err(e) => return Err(e).context("discovering category files"),
    };

    // Everything is built in memory before the output is touched.
    let categories = load_all(&paths).context("loading category files")?;
    let files = file_counts(&categories);
    let unified = merge_loaded(categories, Local::now().date_naive());

    write_unified(&output, &unified)
        .with_context(|| format!("writing {}", output.display()))?;

    for line in summary_lines(&files, &output, &unified) {
        println!("{line}");
    }
    info!("Finished ✅");
    Ok(())
}
