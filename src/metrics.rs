use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::model::{DensityConfig, RawCounts};

/// Maps a changed-line count to the number of symbols drawn for it.
#[derive(Clone)]
pub struct Density(Arc<dyn Fn(u64) -> u64 + Send + Sync>);

impl Density {
    pub fn new(f: impl Fn(u64) -> u64 + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    pub fn lines_per_symbol(lines: u64) -> Self {
        let lines = lines.max(1);
        Self::new(move |n| n.div_ceil(lines))
    }

    pub fn from_config(cfg: &DensityConfig) -> Self {
        match cfg {
            DensityConfig::LinesPerSymbol { lines } => Self::lines_per_symbol(*lines),
            DensityConfig::OnePerLine => Self::new(|n| n),
            DensityConfig::Sqrt => Self::new(ceil_sqrt),
        }
    }

    pub fn apply(&self, n: u64) -> u64 {
        (self.0)(n)
    }
}

impl Default for Density {
    fn default() -> Self {
        Self::lines_per_symbol(10)
    }
}

impl fmt::Debug for Density {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Density(..)")
    }
}

fn ceil_sqrt(n: u64) -> u64 {
    let r = n.isqrt();
    if r * r == n { r } else { r + 1 }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SymbolCounts {
    pub staged_removed: u64,
    pub unstaged_removed: u64,
    pub staged_added: u64,
    pub unstaged_added: u64,
}

impl SymbolCounts {
    pub fn removed(&self) -> u64 {
        self.staged_removed + self.unstaged_removed
    }

    pub fn added(&self) -> u64 {
        self.staged_added + self.unstaged_added
    }
}

/// Compresses raw counts through `density` and splits each category between
/// staged and unstaged by weight.
///
/// The unstaged share is the remainder after rounding the staged share, so
/// the two always sum to `density(total)`.
pub fn allocate_symbols(raw: &RawCounts, density: &Density) -> SymbolCounts {
    let (staged_removed, unstaged_removed) =
        split_symbols(raw.staged_removed, raw.total_removed(), density);
    let (staged_added, unstaged_added) =
        split_symbols(raw.staged_added, raw.total_added(), density);
    SymbolCounts {
        staged_removed,
        unstaged_removed,
        staged_added,
        unstaged_added,
    }
}

fn split_symbols(staged: u64, total: u64, density: &Density) -> (u64, u64) {
    if total == 0 {
        return (0, 0);
    }
    let symbols = density.apply(total);
    let staged_symbols = round_ratio(symbols, staged, total).min(symbols);
    (staged_symbols, symbols - staged_symbols)
}

/// `round(a * b / c)` with halves rounded up, without going through floats.
fn round_ratio(a: u64, b: u64, c: u64) -> u64 {
    let (product, c) = (a as u128 * b as u128, c as u128);
    let rounded = product / c + u128::from((product % c) * 2 >= c);
    rounded as u64
}

/// Raw counts plus the derived totals and symbol allocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Metrics {
    pub raw: RawCounts,
    pub total_removed: u64,
    pub total_added: u64,
    pub symbols: SymbolCounts,
}

impl Metrics {
    pub fn total(&self) -> u64 {
        self.total_removed.saturating_add(self.total_added)
    }
}

/// Absent counts (nothing fetched yet) stay absent.
pub fn aggregate(raw: Option<&RawCounts>, density: &Density) -> Option<Metrics> {
    let raw = raw?;
    Some(Metrics {
        raw: *raw,
        total_removed: raw.total_removed(),
        total_added: raw.total_added(),
        symbols: allocate_symbols(raw, density),
    })
}

#[cfg(test)]
#[path = "tests/metrics_tests.rs"]
mod tests;
