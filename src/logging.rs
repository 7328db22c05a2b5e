use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use color_eyre::Result;
use color_eyre::eyre::Context;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Installs the global subscriber. `log` records are forwarded to it as well.
///
/// `tracing_level` is an `EnvFilter` directive such as `info` or
/// `riff_catalog=debug,tower_http=debug`. When `log_file` is given, output is
/// also appended there without ANSI colors.
pub fn init_tracing(tracing_level: &str, log_file: Option<&Path>) -> Result<()> {
    let filter_layer =
        EnvFilter::try_new(tracing_level).wrap_err("Failed to create tracing filter")?;
    let fmt_layer = tracing_subscriber::fmt::layer();

    let file_layer = match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .wrap_err_with(|| format!("Failed to open log file: {}", path.display()))?;
            Some(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .with(file_layer)
        .try_init()
        .wrap_err("Failed to install tracing subscriber")?;

    Ok(())
}
