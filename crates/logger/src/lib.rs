use std::env::var;
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Arc;

use tracing::{level_filters::LevelFilter, warn};
use tracing_subscriber::{Layer, filter::EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

pub fn init(log_file: Option<&Path>) {
    initialize_tracing(LevelFilter::INFO, log_file);
}

/// Initialize tracing subscriber with default configuration.
///
/// Every record goes to stdout; when a log file is given, records are
/// duplicated to it in append mode with ANSI escapes disabled. A file that
/// cannot be opened degrades to stdout-only logging with a warning.
fn initialize_tracing(level: LevelFilter, log_file: Option<&Path>) {
    let env_filter = EnvFilter::builder().with_default_directive(level.into()).from_env_lossy();

    let log_format = var("RUST_LOG_FORMAT").unwrap_or_default();

    let stdout_layer = match log_format.as_str() {
        "json" => tracing_subscriber::fmt::layer().json().boxed(),
        _ => tracing_subscriber::fmt::layer().compact().boxed(),
    };

    let mut file_error = None;
    let file_layer = log_file.and_then(|path| {
        match OpenOptions::new().append(true).create(true).open(path) {
            Ok(file) => Some(
                tracing_subscriber::fmt::layer().with_ansi(false).with_writer(Arc::new(file)),
            ),
            Err(error) => {
                file_error = Some((path.to_path_buf(), error));
                None
            }
        }
    });

    tracing_subscriber::registry().with(env_filter).with(stdout_layer).with(file_layer).init();

    if let Some((path, error)) = file_error {
        warn!("Failed to open log file {}, logging to stdout only: {error}", path.display());
    }
}
