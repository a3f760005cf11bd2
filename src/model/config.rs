use serde::{Deserialize, Serialize};

/// User-facing settings document (`config.json`).
///
/// Every field has a default, so an empty object `{}` is a valid config.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub version: u32,

    pub deletion_marker: String,
    pub addition_marker: String,

    pub density: DensityConfig,

    /// Threshold table, checked from the highest threshold down.
    /// Keep a catch-all entry with threshold 1 or some totals render nothing.
    pub display_methods: Vec<DisplayMethodConfig>,

    /// `[power, suffix]` pairs; powers are multiples of 3.
    pub suffixes: Vec<SuffixEntry>,

    pub styles: StylePalette,

    /// Period of the background refresh timer.
    pub refresh_interval_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: 1,
            deletion_marker: "-".to_string(),
            addition_marker: "+".to_string(),
            density: DensityConfig::default(),
            display_methods: vec![
                DisplayMethodConfig {
                    threshold: 100,
                    renderer: RendererKind::Numeric,
                },
                DisplayMethodConfig {
                    threshold: 1,
                    renderer: RendererKind::Symbols,
                },
            ],
            suffixes: vec![
                SuffixEntry(12, "T".to_string()),
                SuffixEntry(9, "B".to_string()),
                SuffixEntry(6, "M".to_string()),
                SuffixEntry(3, "K".to_string()),
            ],
            styles: StylePalette::default(),
            refresh_interval_ms: 3000,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DensityConfig {
    /// `ceil(n / lines)` symbols.
    LinesPerSymbol { lines: u64 },
    /// One symbol per changed line.
    OnePerLine,
    /// `ceil(sqrt(n))` symbols.
    Sqrt,
}

impl Default for DensityConfig {
    fn default() -> Self {
        DensityConfig::LinesPerSymbol { lines: 10 }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayMethodConfig {
    pub threshold: u64,
    pub renderer: RendererKind,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RendererKind {
    Symbols,
    Numeric,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuffixEntry(pub u32, pub String);

/// Color names for each style tag, parsed by the terminal hosts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StylePalette {
    pub staged_removed: String,
    pub unstaged_removed: String,
    pub unstaged_added: String,
    pub staged_added: String,
    pub removed: String,
    pub added: String,
}

impl Default for StylePalette {
    fn default() -> Self {
        Self {
            staged_removed: "red".to_string(),
            unstaged_removed: "lightred".to_string(),
            unstaged_added: "lightgreen".to_string(),
            staged_added: "green".to_string(),
            removed: "red".to_string(),
            added: "green".to_string(),
        }
    }
}
