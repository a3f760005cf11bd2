use serde::{Deserialize, Serialize};

/// Line counts for one file at one point in time.
///
/// Captured as a whole and never mutated; the refresh cache swaps complete
/// values in and readers copy them out.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RawCounts {
    pub staged_removed: u64,
    pub unstaged_removed: u64,
    pub staged_added: u64,
    pub unstaged_added: u64,
}

impl RawCounts {
    pub fn new(
        staged_removed: u64,
        unstaged_removed: u64,
        staged_added: u64,
        unstaged_added: u64,
    ) -> Self {
        Self {
            staged_removed,
            unstaged_removed,
            staged_added,
            unstaged_added,
        }
    }

    /// Counts for a file git does not track: every line is an unstaged addition.
    pub fn untracked(lines: u64) -> Self {
        Self {
            unstaged_added: lines,
            ..Self::default()
        }
    }

    pub fn from_deltas(staged: LineDelta, unstaged: LineDelta) -> Self {
        Self {
            staged_removed: staged.removed,
            unstaged_removed: unstaged.removed,
            staged_added: staged.added,
            unstaged_added: unstaged.added,
        }
    }

    pub fn total_removed(&self) -> u64 {
        self.staged_removed.saturating_add(self.unstaged_removed)
    }

    pub fn total_added(&self) -> u64 {
        self.staged_added.saturating_add(self.unstaged_added)
    }

    pub fn is_empty(&self) -> bool {
        self.total_removed() == 0 && self.total_added() == 0
    }
}

/// One numstat row: lines added and removed against a single baseline.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineDelta {
    pub added: u64,
    pub removed: u64,
}

impl LineDelta {
    pub fn new(added: u64, removed: u64) -> Self {
        Self { added, removed }
    }
}

/// Which side of the index a numstat is taken against.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Against {
    /// Index versus HEAD.
    Staged,
    /// Working tree versus index.
    Unstaged,
}
