//! File-based logging using simplelog
//!
//! The terminal belongs to the game, so log lines go to a timestamped file in
//! the current working directory instead.

use std::fs::File;
use std::path::PathBuf;

use anyhow::Context;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

fn log_file_path() -> PathBuf {
    let timestamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
    PathBuf::from(format!("accelesnake-{}.log", timestamp))
}

/// Level from `RUST_LOG`, `info` when unset or unrecognised.
fn level_from_env() -> LevelFilter {
    std::env::var("RUST_LOG")
        .map(|v| match v.to_lowercase().as_str() {
            "off" => LevelFilter::Off,
            "error" => LevelFilter::Error,
            "warn" => LevelFilter::Warn,
            "debug" => LevelFilter::Debug,
            "trace" => LevelFilter::Trace,
            _ => LevelFilter::Info,
        })
        .unwrap_or(LevelFilter::Info)
}

/// Initialize file-based logging, returning the log file path.
pub fn init() -> anyhow::Result<PathBuf> {
    let log_file = log_file_path();

    let config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_time_offset_to_local()
        .unwrap_or_else(|c| c) // Fallback if local time offset fails
        .build();

    let file = File::create(&log_file)
        .with_context(|| format!("Failed to create log file {}", log_file.display()))?;
    WriteLogger::init(level_from_env(), config, file).context("Failed to initialize logger")?;

    Ok(log_file)
}
