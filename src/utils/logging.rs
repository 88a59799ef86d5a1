// utils/logging.rs

use env_logger;
use log::LevelFilter;

/// Crates whose request-level chatter is only shown at `trace`.
const NOISY_CRATES: &[&str] = &["reqwest", "hyper", "rustls"];

/// Maps a `--log-level` value to a filter, defaulting to `Info`.
pub fn parse_level(log_level: &str) -> LevelFilter {
    match log_level.to_lowercase().as_str() {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        _ => LevelFilter::Info,
    }
}

/// Sets the logger level based on the provided argument.
pub fn initialize_logger(log_level: &str) {
    let level = parse_level(log_level);
    let mut builder = env_logger::Builder::new();
    builder.filter(None, level);

    if level < LevelFilter::Trace {
        for name in NOISY_CRATES {
            builder.filter_module(name, level.min(LevelFilter::Warn));
        }
    }

    builder.format_target(false).init();
}
