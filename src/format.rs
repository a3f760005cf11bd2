use std::collections::BTreeMap;

use crate::model::SuffixEntry;

/// Power-of-ten exponent to magnitude suffix, e.g. `3 -> "K"`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SuffixTable {
    entries: BTreeMap<u32, String>,
}

impl SuffixTable {
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (u32, S)>,
        S: Into<String>,
    {
        Self {
            entries: entries.into_iter().map(|(p, s)| (p, s.into())).collect(),
        }
    }

    pub fn from_config(entries: &[SuffixEntry]) -> Self {
        Self::new(entries.iter().map(|e| (e.0, e.1.clone())))
    }

    pub fn suffix(&self, power: u32) -> Option<&str> {
        self.entries.get(&power).map(|s| s.as_str())
    }
}

impl Default for SuffixTable {
    fn default() -> Self {
        Self::new([(12, "T"), (9, "B"), (6, "M"), (3, "K")])
    }
}

/// Abbreviates `n` for a narrow status strip.
///
/// Below 1000 the plain number is returned. Above that the value is scaled to
/// the nearest lower power of 1000 and printed with one decimal (`1234` is
/// `"1.2K"`, `999999` is `"1000.0K"`). Magnitudes without a suffix fall back to
/// the first two digits plus an exponent (`10^15` is `"10E14"`), truncated
/// rather than rounded.
pub fn format_count(n: u64, suffixes: &SuffixTable) -> String {
    if n < 1000 {
        return n.to_string();
    }

    let digits = n.to_string();
    let power = ((digits.len() as u32 - 1) / 3) * 3;
    match suffixes.suffix(power) {
        Some(suffix) => {
            let scaled = n as f64 / 10f64.powi(power as i32);
            format!("{:.1}{}", scaled, suffix)
        }
        None => format!("{}E{}", &digits[..2], digits.len() - 2),
    }
}

#[cfg(test)]
#[path = "tests/format_tests.rs"]
mod tests;
