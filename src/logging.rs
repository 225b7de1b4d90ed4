use std::fs::{self, File};
use std::path::{Path, PathBuf};

use chrono::Local;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

/// Install a file logger at `<log_dir>/<name>_<timestamp>.log`.
///
/// Returns the log path. Errors are left to the caller, which reports them
/// and carries on without a log file.
pub fn init(log_dir: &Path, name: &str) -> anyhow::Result<PathBuf> {
    fs::create_dir_all(log_dir)?;
    let timestamp = Local::now().format("%Y-%m-%d_%H-%M-%S");
    let log_path = log_dir.join(format!("{name}_{timestamp}.log"));

    WriteLogger::init(
        LevelFilter::Info,
        ConfigBuilder::new().build(),
        File::create(&log_path)?,
    )?;

    log::info!("{name} started");
    Ok(log_path)
}
