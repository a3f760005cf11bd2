use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::sync::mpsc;

use crate::model::{ContextId, Settings};
use crate::palette::Palette;
use crate::refresh::{RefreshScheduler, RefreshTrigger};
use crate::render::{RenderConfig, StyledText, render};
use crate::vcs::GitCli;

use super::watch::{ChangeWatcher, WatchTarget};

pub(super) struct WatchedFile {
    pub(super) ctx: ContextId,
    pub(super) path: PathBuf,
    pub(super) display: String,
}

pub(super) struct DiffView {
    pub(super) title: String,
    pub(super) lines: Vec<String>,
    pub(super) scroll: u16,
}

pub struct App {
    pub(super) files: Vec<WatchedFile>,
    pub(super) selected: usize,
    pub(super) render_cfg: RenderConfig,
    pub(super) palette: Palette,
    pub(super) diff: Option<DiffView>,
    pub(super) note: Option<String>,
    pub(super) quit: bool,
    scheduler: RefreshScheduler,
    repaint_rx: mpsc::UnboundedReceiver<ContextId>,
    watcher: ChangeWatcher,
    git: GitCli,
    runtime: tokio::runtime::Handle,
}

impl App {
    pub fn load(
        paths: &[PathBuf],
        settings: &Settings,
        interval: Duration,
        runtime: tokio::runtime::Handle,
    ) -> Result<Self> {
        let render_cfg = RenderConfig::from_settings(settings)?;
        let palette = Palette::from_config(&settings.styles)?;
        let git = GitCli::default();
        let (scheduler, repaint_rx) = RefreshScheduler::new(Arc::new(git.clone()), interval);

        let mut files = Vec::new();
        let mut targets = Vec::new();
        for p in paths {
            let path = fs::canonicalize(p).with_context(|| format!("resolve {}", p.display()))?;
            let ctx = ContextId::for_path(&path);
            runtime.block_on(scheduler.start(ctx.clone(), path.clone()))?;

            targets.push(WatchTarget {
                ctx: ctx.clone(),
                file: path.clone(),
                index: git.index_path(&path).map(|i| canonical_index(&i)),
            });
            files.push(WatchedFile {
                ctx,
                display: p.display().to_string(),
                path,
            });
        }
        let watcher = ChangeWatcher::new(targets)?;

        Ok(Self {
            files,
            selected: 0,
            render_cfg,
            palette,
            diff: None,
            note: None,
            quit: false,
            scheduler,
            repaint_rx,
            watcher,
            git,
            runtime,
        })
    }

    /// Renders the cached counts for one file; never fetches.
    pub(super) fn segment(&self, file: &WatchedFile) -> Option<StyledText> {
        let counts = self.scheduler.snapshot(&file.ctx);
        render(counts.as_ref(), &self.render_cfg).map(|t| t.with_activation(&file.path))
    }

    pub(super) fn selected_file(&self) -> Option<&WatchedFile> {
        self.files.get(self.selected)
    }

    /// Drains pending repaint requests; true if any arrived.
    pub(super) fn take_repaints(&mut self) -> bool {
        let mut any = false;
        while self.repaint_rx.try_recv().is_ok() {
            any = true;
        }
        any
    }

    pub(super) fn trigger(&self, ctx: ContextId, trigger: RefreshTrigger) {
        let scheduler = self.scheduler.clone();
        self.runtime.spawn(async move {
            if let Err(err) = scheduler.trigger_now(&ctx, trigger).await {
                tracing::warn!(%ctx, "triggered refresh: {:#}", err);
            }
        });
    }

    /// Turns file saves and index rewrites into refresh triggers.
    pub(super) fn apply_file_events(&self) {
        for (ctx, trigger) in self.watcher.drain() {
            self.trigger(ctx, trigger);
        }
    }

    pub(super) fn reload_selected(&mut self) {
        if let Some(f) = self.selected_file() {
            let ctx = f.ctx.clone();
            self.trigger(ctx, RefreshTrigger::Reloaded);
            self.note = Some("reloaded".to_string());
        }
    }

    /// Activation hook: show the diff of the selected file.
    pub(super) fn open_diff(&mut self) {
        let Some(f) = self.selected_file() else {
            return;
        };
        let Some(target) = self.segment(f).and_then(|s| s.activation) else {
            self.note = Some(format!("no changes in {}", f.display));
            return;
        };
        let title = f.display.clone();
        match self.git.diff_text(&target) {
            Ok(text) => {
                self.diff = Some(DiffView {
                    title,
                    lines: text.lines().map(|l| l.to_string()).collect(),
                    scroll: 0,
                });
                self.note = None;
            }
            Err(err) => self.note = Some(format!("{:#}", err)),
        }
    }

    pub(super) fn move_selection(&mut self, delta: isize) {
        let n = self.files.len();
        if n == 0 {
            return;
        }
        self.selected = (self.selected as isize + delta).rem_euclid(n as isize) as usize;
    }

    pub fn shutdown(&mut self) {
        for f in &self.files {
            self.scheduler.stop(&f.ctx);
        }
    }
}

/// Event paths come back resolved, so resolve the index's directory too.
fn canonical_index(index: &Path) -> PathBuf {
    match (index.parent(), index.file_name()) {
        (Some(dir), Some(name)) => fs::canonicalize(dir)
            .map(|d| d.join(name))
            .unwrap_or_else(|_| index.to_path_buf()),
        _ => index.to_path_buf(),
    }
}
