use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

/// Where log lines go.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogTarget<'a> {
    Stderr,
    File(&'a Path),
    /// Full-screen hosts with no log file: drop everything.
    Off,
}

/// Installs the global `tracing` subscriber.
///
/// `level` is the default directive (e.g. `"warn"`); `RUST_LOG` overrides it.
pub fn init(level: &str, target: LogTarget<'_>) -> Result<()> {
    let filter = match target {
        LogTarget::Off => EnvFilter::new("off"),
        _ => EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(level))
            .with_context(|| format!("parse log level {:?}", level))?,
    };

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let res = match target {
        LogTarget::Stderr | LogTarget::Off => builder.with_writer(std::io::stderr).try_init(),
        LogTarget::File(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("open log file {}", path.display()))?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
    };
    res.map_err(|err| anyhow::anyhow!("install tracing subscriber: {}", err))
}
