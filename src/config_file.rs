use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

use crate::model::Settings;

pub const CONFIG_ENV: &str = "DIFFBAR_CONFIG";

/// Picks the config file: explicit path first, then `$DIFFBAR_CONFIG`.
pub fn resolve_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    explicit
        .map(Path::to_path_buf)
        .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from))
}

/// Loads settings, falling back to defaults when no config file is named.
pub fn load_settings(explicit: Option<&Path>) -> Result<Settings> {
    match resolve_config_path(explicit) {
        Some(path) => read_settings(&path),
        None => Ok(Settings::default()),
    }
}

pub fn read_settings(path: &Path) -> Result<Settings> {
    let bytes = fs::read(path).with_context(|| format!("read {}", path.display()))?;
    let settings: Settings =
        serde_json::from_slice(&bytes).with_context(|| format!("parse {}", path.display()))?;
    if settings.version != 1 {
        bail!(
            "unsupported config version {} in {}",
            settings.version,
            path.display()
        );
    }
    if settings.refresh_interval_ms == 0 {
        bail!("refresh_interval_ms must be greater than 0");
    }
    Ok(settings)
}

pub fn write_settings(path: &Path, settings: &Settings) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(settings).context("serialize settings")?;
    write_atomic(path, &bytes).with_context(|| format!("write {}", path.display()))
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).context("create parent directories")?;
    }
    let tmp = path.with_extension(format!("tmp.{}", std::process::id()));
    fs::write(&tmp, bytes).with_context(|| format!("write temp file {}", tmp.display()))?;
    fs::rename(&tmp, path)
        .with_context(|| format!("rename {} -> {}", tmp.display(), path.display()))?;
    Ok(())
}

#[cfg(test)]
#[path = "tests/config_file_tests.rs"]
mod tests;
