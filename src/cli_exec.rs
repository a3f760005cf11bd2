use std::path::Path;

use anyhow::{Context, Result};

use diffbar::config_file::{load_settings, write_settings};
use diffbar::logging::{self, LogTarget};
use diffbar::model::Settings;
use diffbar::palette::Palette;
use diffbar::render::{RenderConfig, render};
use diffbar::tui::{WatchOptions, run_watch};
use diffbar::vcs::{GitCli, fetch_raw_counts};

use crate::{Cli, Commands};

pub(crate) fn run(cli: Cli) -> Result<()> {
    let target = match (&cli.log_file, &cli.command) {
        (Some(path), _) => LogTarget::File(path),
        (None, Commands::Watch { .. }) => LogTarget::Off,
        (None, _) => LogTarget::Stderr,
    };
    logging::init(&cli.log_level, target)?;

    let settings = load_settings(cli.config.as_deref())?;

    match cli.command {
        Commands::Show {
            file,
            json,
            plain,
            tooltip,
        } => show(&file, &settings, json, plain, tooltip),
        Commands::Watch { files } => {
            let runtime = tokio::runtime::Runtime::new().context("start tokio runtime")?;
            run_watch(WatchOptions { files, settings }, runtime.handle().clone())
        }
        Commands::Config { write } => {
            match write {
                Some(path) => {
                    write_settings(&path, &settings)?;
                    println!("Wrote {}", path.display());
                }
                None => println!(
                    "{}",
                    serde_json::to_string_pretty(&settings).context("serialize settings")?
                ),
            }
            Ok(())
        }
    }
}

fn show(file: &Path, settings: &Settings, json: bool, plain: bool, tooltip: bool) -> Result<()> {
    if !file.exists() {
        anyhow::bail!("no such file: {}", file.display());
    }
    let path = std::fs::canonicalize(file).with_context(|| format!("resolve {}", file.display()))?;
    let cfg = RenderConfig::from_settings(settings)?;

    let counts = fetch_raw_counts(&GitCli::default(), &path);
    tracing::debug!(path = %path.display(), ?counts, "fetched counts");
    let segment = render(Some(&counts), &cfg).map(|s| s.with_activation(&path));

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&segment).context("serialize segment json")?
        );
        return Ok(());
    }

    let Some(segment) = segment else {
        return Ok(());
    };
    if plain {
        println!("{}", segment.plain());
    } else {
        let palette = Palette::from_config(&settings.styles)?;
        println!("{}", palette.ansi(&segment)?);
    }
    if tooltip {
        println!("{}", segment.tooltip);
    }
    Ok(())
}
