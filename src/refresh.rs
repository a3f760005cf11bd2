use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::model::{ContextId, RawCounts};
use crate::vcs::{NumstatSource, fetch_raw_counts};

/// Why an immediate refresh was requested.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RefreshTrigger {
    Saved,
    VcsStateChanged,
    /// The file was reloaded from disk; also restarts the periodic timer.
    Reloaded,
}

#[derive(Debug)]
struct Slot {
    generation: u64,
    counts: Option<RawCounts>,
}

/// Latest raw counts per tracked context.
///
/// Writers replace a whole `RawCounts` under the lock and readers copy one
/// out, so a reader never sees a half-updated value. Each slot carries the
/// generation of the `start` that opened it; results from an older generation
/// are dropped.
#[derive(Debug, Default)]
pub struct CountsCache {
    slots: Mutex<HashMap<ContextId, Slot>>,
    next_generation: AtomicU64,
}

impl CountsCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<ContextId, Slot>> {
        self.slots.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn get(&self, ctx: &ContextId) -> Option<RawCounts> {
        self.lock().get(ctx).and_then(|s| s.counts)
    }

    pub fn contains(&self, ctx: &ContextId) -> bool {
        self.lock().contains_key(ctx)
    }

    /// Opens (or reopens) a slot and returns its new generation.
    /// Counts from a previous generation stay visible until replaced.
    pub fn open(&self, ctx: &ContextId) -> u64 {
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed) + 1;
        let mut slots = self.lock();
        let counts = slots.get(ctx).and_then(|s| s.counts);
        slots.insert(ctx.clone(), Slot { generation, counts });
        generation
    }

    /// Stores `counts` if the slot is still open at `generation`.
    pub fn publish(&self, ctx: &ContextId, generation: u64, counts: RawCounts) -> bool {
        match self.lock().get_mut(ctx) {
            Some(slot) if slot.generation == generation => {
                slot.counts = Some(counts);
                true
            }
            _ => false,
        }
    }

    pub fn generation(&self, ctx: &ContextId) -> Option<u64> {
        self.lock().get(ctx).map(|s| s.generation)
    }

    pub fn close(&self, ctx: &ContextId) {
        self.lock().remove(ctx);
    }
}

#[derive(Debug)]
struct Tracked {
    path: PathBuf,
    timer: JoinHandle<()>,
}

struct Inner {
    source: Arc<dyn NumstatSource>,
    cache: Arc<CountsCache>,
    interval: Duration,
    tracked: Mutex<HashMap<ContextId, Tracked>>,
    repaint: mpsc::UnboundedSender<ContextId>,
}

impl Inner {
    fn tracked(&self) -> MutexGuard<'_, HashMap<ContextId, Tracked>> {
        self.tracked.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        for (_, t) in self.tracked().drain() {
            t.timer.abort();
        }
    }
}

/// Keeps the [`CountsCache`] current for every started context.
///
/// Fetches run on the blocking pool; the render path only ever reads the
/// cache. Cloning shares the same scheduler.
#[derive(Clone)]
pub struct RefreshScheduler {
    inner: Arc<Inner>,
}

impl RefreshScheduler {
    /// Returns the scheduler and the receiver for repaint requests.
    pub fn new(
        source: Arc<dyn NumstatSource>,
        interval: Duration,
    ) -> (Self, mpsc::UnboundedReceiver<ContextId>) {
        let (repaint, rx) = mpsc::unbounded_channel();
        let inner = Inner {
            source,
            cache: Arc::new(CountsCache::new()),
            interval: interval.max(Duration::from_millis(1)),
            tracked: Mutex::new(HashMap::new()),
            repaint,
        };
        (
            Self {
                inner: Arc::new(inner),
            },
            rx,
        )
    }

    pub fn cache(&self) -> Arc<CountsCache> {
        self.inner.cache.clone()
    }

    pub fn snapshot(&self, ctx: &ContextId) -> Option<RawCounts> {
        self.inner.cache.get(ctx)
    }

    pub fn is_tracking(&self, ctx: &ContextId) -> bool {
        self.inner.tracked().contains_key(ctx)
    }

    pub fn tracked_count(&self) -> usize {
        self.inner.tracked().len()
    }

    /// Fetches once, publishes, and starts the periodic timer for `ctx`.
    ///
    /// Starting a context that is already tracked replaces its timer. If the
    /// first fetch fails the context ends up stopped.
    pub async fn start(&self, ctx: ContextId, path: impl Into<PathBuf>) -> Result<()> {
        let path = path.into();
        let generation = self.inner.cache.open(&ctx);
        tracing::debug!(%ctx, generation, "start refresh");

        if let Err(err) = refresh_once(&self.inner, &ctx, &path, generation).await {
            // Any old timer is bound to the previous generation and can never publish.
            self.stop(&ctx);
            return Err(err).with_context(|| format!("initial refresh of {}", path.display()));
        }

        let timer = self.spawn_timer(ctx.clone(), path.clone(), generation);
        if let Some(old) = self.inner.tracked().insert(ctx, Tracked { path, timer }) {
            old.timer.abort();
        }
        Ok(())
    }

    /// Re-fetches `ctx` right away, outside the timer schedule.
    pub async fn trigger_now(&self, ctx: &ContextId, trigger: RefreshTrigger) -> Result<()> {
        let path = self
            .inner
            .tracked()
            .get(ctx)
            .map(|t| t.path.clone())
            .ok_or_else(|| anyhow!("context {} is not being tracked", ctx))?;
        let Some(generation) = self.inner.cache.generation(ctx) else {
            return Ok(());
        };
        tracing::debug!(%ctx, ?trigger, "triggered refresh");

        if trigger == RefreshTrigger::Reloaded {
            let timer = self.spawn_timer(ctx.clone(), path.clone(), generation);
            match self.inner.tracked().get_mut(ctx) {
                Some(t) => std::mem::replace(&mut t.timer, timer).abort(),
                // Stopped while we were setting up.
                None => timer.abort(),
            }
        }

        refresh_once(&self.inner, ctx, &path, generation).await
    }

    /// Cancels the timer and discards the cached counts for `ctx`.
    pub fn stop(&self, ctx: &ContextId) {
        if let Some(t) = self.inner.tracked().remove(ctx) {
            t.timer.abort();
        }
        self.inner.cache.close(ctx);
        tracing::debug!(%ctx, "stop refresh");
    }

    fn spawn_timer(&self, ctx: ContextId, path: PathBuf, generation: u64) -> JoinHandle<()> {
        let inner = Arc::downgrade(&self.inner);
        let period = self.inner.interval;
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let Some(inner) = inner.upgrade() else {
                    return;
                };
                if let Err(err) = refresh_once(&inner, &ctx, &path, generation).await {
                    tracing::warn!(%ctx, "periodic refresh: {:#}", err);
                }
            }
        })
    }
}

async fn refresh_once(inner: &Inner, ctx: &ContextId, path: &Path, generation: u64) -> Result<()> {
    let source = inner.source.clone();
    let owned = path.to_path_buf();
    let counts = tokio::task::spawn_blocking(move || fetch_raw_counts(source.as_ref(), &owned))
        .await
        .context("join fetch task")?;

    if inner.cache.publish(ctx, generation, counts) {
        tracing::debug!(%ctx, ?counts, "published counts");
        // Receiver gone just means nobody is painting any more.
        let _ = inner.repaint.send(ctx.clone());
    } else {
        tracing::debug!(%ctx, generation, "dropping result for closed context");
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/refresh_tests.rs"]
mod tests;
