use std::path::PathBuf;

use anyhow::{Result, bail};
use serde::Serialize;

use crate::display::DisplayMethodTable;
use crate::format::{SuffixTable, format_count};
use crate::metrics::{Density, Metrics, aggregate};
use crate::model::{DensityConfig, RawCounts, RendererKind, Settings};

/// Style identifier attached to each run; hosts map these to colors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StyleTag {
    StagedRemoved,
    UnstagedRemoved,
    UnstagedAdded,
    StagedAdded,
    Removed,
    Added,
    Plain,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StyledRun {
    pub text: String,
    pub style: StyleTag,
}

impl StyledRun {
    pub fn new(text: impl Into<String>, style: StyleTag) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StyledText {
    pub runs: Vec<StyledRun>,
    pub tooltip: String,
    /// File to open a diff view for when the segment is activated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activation: Option<PathBuf>,
}

impl StyledText {
    pub fn plain(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    pub fn with_activation(mut self, path: impl Into<PathBuf>) -> Self {
        self.activation = Some(path.into());
        self
    }
}

/// Everything the render path needs, built once from [`Settings`].
#[derive(Clone, Debug)]
pub struct RenderConfig {
    pub deletion_marker: String,
    pub addition_marker: String,
    pub density: Density,
    pub display_methods: DisplayMethodTable,
    pub suffixes: SuffixTable,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            deletion_marker: "-".to_string(),
            addition_marker: "+".to_string(),
            density: Density::default(),
            display_methods: DisplayMethodTable::default(),
            suffixes: SuffixTable::default(),
        }
    }
}

impl RenderConfig {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        if settings.deletion_marker.is_empty() || settings.addition_marker.is_empty() {
            bail!("deletion_marker and addition_marker must not be empty");
        }
        if let DensityConfig::LinesPerSymbol { lines: 0 } = settings.density {
            bail!("density.lines must be at least 1");
        }
        Ok(Self {
            deletion_marker: settings.deletion_marker.clone(),
            addition_marker: settings.addition_marker.clone(),
            density: Density::from_config(&settings.density),
            display_methods: DisplayMethodTable::from_config(&settings.display_methods),
            suffixes: SuffixTable::from_config(&settings.suffixes),
        })
    }
}

/// Renders cached counts into a styled segment.
///
/// Returns `None` when nothing has been fetched yet, when the file has no
/// changes, or when no display method matches the total.
pub fn render(raw: Option<&RawCounts>, cfg: &RenderConfig) -> Option<StyledText> {
    let metrics = aggregate(raw, &cfg.density)?;
    let Some(renderer) = cfg.display_methods.select(&metrics) else {
        if metrics.total() > 0 {
            tracing::debug!(total = metrics.total(), "no display method matches total");
        }
        return None;
    };

    let runs = match renderer {
        RendererKind::Symbols => symbol_runs(&metrics, cfg),
        RendererKind::Numeric => numeric_runs(&metrics, cfg),
    };
    Some(StyledText {
        runs,
        tooltip: tooltip(&metrics.raw),
        activation: None,
    })
}

/// Deletions shrink outward and additions grow outward from the middle:
/// staged deletions, unstaged deletions, unstaged additions, staged additions.
pub fn symbol_runs(metrics: &Metrics, cfg: &RenderConfig) -> Vec<StyledRun> {
    let s = &metrics.symbols;
    let (del, add) = (&cfg.deletion_marker, &cfg.addition_marker);
    [
        (del, s.staged_removed, StyleTag::StagedRemoved),
        (del, s.unstaged_removed, StyleTag::UnstagedRemoved),
        (add, s.unstaged_added, StyleTag::UnstagedAdded),
        (add, s.staged_added, StyleTag::StagedAdded),
    ]
    .into_iter()
    .filter(|(_, n, _)| *n > 0)
    .map(|(marker, n, style)| StyledRun::new(marker.repeat(n as usize), style))
    .collect()
}

pub fn numeric_runs(metrics: &Metrics, cfg: &RenderConfig) -> Vec<StyledRun> {
    vec![
        StyledRun::new(
            format!("-{}", format_count(metrics.total_removed, &cfg.suffixes)),
            StyleTag::Removed,
        ),
        StyledRun::new(" ", StyleTag::Plain),
        StyledRun::new(
            format!("+{}", format_count(metrics.total_added, &cfg.suffixes)),
            StyleTag::Added,
        ),
    ]
}

pub fn tooltip(raw: &RawCounts) -> String {
    format!(
        "Staged: -{} +{} | Unstaged: -{} +{}",
        raw.staged_removed, raw.staged_added, raw.unstaged_removed, raw.unstaged_added
    )
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
