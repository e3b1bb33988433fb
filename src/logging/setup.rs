use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use super::formatter::BracketedFormatter;

/// Default filter: our crate at trace level, chatty GUI crates at warn
pub fn default_filter() -> EnvFilter {
    ["winit=warn", "log=warn", "egui=warn", "eframe=warn"]
        .iter()
        .filter_map(|directive| directive.parse().ok())
        .fold(EnvFilter::new("trace"), |filter, directive| {
            filter.add_directive(directive)
        })
}

/// Timestamped log file path inside `log_dir`
pub fn log_file_path(log_dir: &Path) -> PathBuf {
    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    log_dir.join(format!("textedit_hub_{}.log", timestamp))
}

/// Install the file + stdout subscriber. Returns the log file path.
pub fn setup_logging(log_dir: &Path) -> io::Result<PathBuf> {
    fs::create_dir_all(log_dir)?;
    let log_path = log_file_path(log_dir);

    let file = fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&log_path)?;

    let file_layer = fmt::layer()
        .event_format(BracketedFormatter::with_location())
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false);

    let stdout_layer = fmt::layer()
        .event_format(BracketedFormatter::default())
        .with_writer(io::stdout);

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter()))
        .with(file_layer)
        .with(stdout_layer)
        .init();

    info!("Starting CSV TextEdit Hub");
    info!("Log file created at: {:?}", log_path);

    Ok(log_path)
}
