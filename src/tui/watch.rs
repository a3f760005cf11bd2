use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};

use anyhow::{Context, Result};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

use crate::model::ContextId;
use crate::refresh::RefreshTrigger;

/// One watched file and the index of the repository it lives in.
#[derive(Clone, Debug)]
pub(super) struct WatchTarget {
    pub(super) ctx: ContextId,
    pub(super) file: PathBuf,
    pub(super) index: Option<PathBuf>,
}

/// Filesystem events for watched files and their repository indexes.
///
/// Watches parent directories, not the files: editors save by rename and git
/// swaps in a new index the same way, which would orphan a per-inode watch.
pub(super) struct ChangeWatcher {
    _watcher: RecommendedWatcher,
    rx: Receiver<notify::Result<Event>>,
    targets: Vec<WatchTarget>,
}

impl ChangeWatcher {
    pub(super) fn new(targets: Vec<WatchTarget>) -> Result<Self> {
        let (tx, rx) = mpsc::channel();
        let mut watcher = notify::recommended_watcher(move |event| {
            if tx.send(event).is_err() {
                tracing::debug!("watch event dropped; receiver is gone");
            }
        })
        .context("create file watcher")?;

        for dir in watched_dirs(&targets) {
            watcher
                .watch(&dir, RecursiveMode::NonRecursive)
                .with_context(|| format!("watch {}", dir.display()))?;
            tracing::debug!(dir = %dir.display(), "watching");
        }

        Ok(Self {
            _watcher: watcher,
            rx,
            targets,
        })
    }

    /// Drains pending events into at most one trigger per context.
    pub(super) fn drain(&self) -> Vec<(ContextId, RefreshTrigger)> {
        let mut changed = Vec::new();
        while let Ok(res) = self.rx.try_recv() {
            match res {
                Ok(event) if !matches!(event.kind, EventKind::Access(_)) => {
                    changed.extend(event.paths)
                }
                Ok(_) => {}
                Err(err) => tracing::warn!("file watcher: {}", err),
            }
        }
        if changed.is_empty() {
            return Vec::new();
        }
        triggers_for(&self.targets, &changed)
    }
}

/// A write to the file itself wins over an index change for the same file.
pub(super) fn triggers_for(
    targets: &[WatchTarget],
    changed: &[PathBuf],
) -> Vec<(ContextId, RefreshTrigger)> {
    targets
        .iter()
        .filter_map(|t| {
            if changed.contains(&t.file) {
                Some((t.ctx.clone(), RefreshTrigger::Saved))
            } else if t.index.as_ref().is_some_and(|i| changed.contains(i)) {
                Some((t.ctx.clone(), RefreshTrigger::VcsStateChanged))
            } else {
                None
            }
        })
        .collect()
}

pub(super) fn watched_dirs(targets: &[WatchTarget]) -> BTreeSet<PathBuf> {
    targets
        .iter()
        .flat_map(|t| std::iter::once(t.file.as_path()).chain(t.index.as_deref()))
        .filter_map(Path::parent)
        .map(Path::to_path_buf)
        .collect()
}

#[cfg(test)]
#[path = "../tests/tui/watch_tests.rs"]
mod tests;
