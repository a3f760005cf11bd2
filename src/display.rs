use crate::metrics::Metrics;
use crate::model::{DisplayMethodConfig, RendererKind};

/// Ordered `(threshold, renderer)` table, highest threshold first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisplayMethodTable {
    entries: Vec<(u64, RendererKind)>,
}

impl DisplayMethodTable {
    pub fn new(mut entries: Vec<(u64, RendererKind)>) -> Self {
        // Stable, so equal thresholds keep their configured order.
        entries.sort_by(|a, b| b.0.cmp(&a.0));
        Self { entries }
    }

    pub fn from_config(methods: &[DisplayMethodConfig]) -> Self {
        Self::new(methods.iter().map(|m| (m.threshold, m.renderer)).collect())
    }

    pub fn entries(&self) -> &[(u64, RendererKind)] {
        &self.entries
    }

    /// First renderer whose threshold is at or below `total`.
    ///
    /// A zero total never selects anything. Without a catch-all threshold of 1
    /// small totals can also come back `None`.
    pub fn select_for_total(&self, total: u64) -> Option<RendererKind> {
        if total == 0 {
            return None;
        }
        self.entries
            .iter()
            .find(|(threshold, _)| *threshold <= total)
            .map(|(_, renderer)| *renderer)
    }

    pub fn select(&self, metrics: &Metrics) -> Option<RendererKind> {
        self.select_for_total(metrics.total())
    }
}

impl Default for DisplayMethodTable {
    fn default() -> Self {
        Self::new(vec![(100, RendererKind::Numeric), (1, RendererKind::Symbols)])
    }
}

#[cfg(test)]
#[path = "tests/display_tests.rs"]
mod tests;
