//! Polling drift watcher.
//!
//! One cooperative task ticks at the configured interval and hands each poll
//! (fingerprint walks and repair callbacks) to the blocking pool, so
//! cancellation is observed even while a poll is running. Paths are polled in
//! order. A changed fingerprint is stored before anything else happens, so a
//! failing repair yields exactly one event per change.
//!
//! A poll still running at cancellation finishes in the background; the event
//! stream closes once it does.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use time::OffsetDateTime;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use aios_domain::{Result, SyncEvent, SyncStateMachine, WorkspaceError};

use crate::config::DEFAULT_WATCH_INTERVAL;
use crate::reconcile::Reconciler;

mod fingerprint;

pub use fingerprint::fingerprint;

/// Caller-supplied repair for a drifted path.
pub type RepairFn = Arc<dyn Fn(&Path) -> anyhow::Result<()> + Send + Sync>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WatchEvent {
    pub path: PathBuf,
    pub timestamp: OffsetDateTime,
}

pub struct WatchHandle {
    events: mpsc::Receiver<WatchEvent>,
    task: JoinHandle<()>,
}

impl WatchHandle {
    /// Next drift event; `None` once the watcher has stopped.
    pub async fn recv(&mut self) -> Option<WatchEvent> {
        self.events.recv().await
    }

    /// True once the polling task has exited.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Waits for the polling task to exit after cancellation.
    pub async fn join(self) {
        drop(self.events);
        if let Err(err) = self.task.await {
            warn!(error = %err, "watch task ended abnormally");
        }
    }
}

pub trait Watcher: Send + Sync {
    /// Starts watching `paths`. Must be called from within a Tokio runtime.
    fn watch(
        &self,
        cancel: CancellationToken,
        fsm: Option<Arc<SyncStateMachine>>,
        paths: Vec<PathBuf>,
        repair: Option<RepairFn>,
    ) -> Result<WatchHandle>;
}

#[derive(Clone, Copy, Debug)]
pub struct PollingWatcher {
    interval: Duration,
}

impl PollingWatcher {
    /// A zero interval is promoted to the default.
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        let interval = if interval.is_zero() {
            DEFAULT_WATCH_INTERVAL
        } else {
            interval
        };
        Self { interval }
    }

    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl Default for PollingWatcher {
    fn default() -> Self {
        Self::new(DEFAULT_WATCH_INTERVAL)
    }
}

impl Watcher for PollingWatcher {
    fn watch(
        &self,
        cancel: CancellationToken,
        fsm: Option<Arc<SyncStateMachine>>,
        paths: Vec<PathBuf>,
        repair: Option<RepairFn>,
    ) -> Result<WatchHandle> {
        if paths.is_empty() {
            return Err(WorkspaceError::NoWatchPaths);
        }
        let mut watched = Vec::with_capacity(paths.len());
        for path in paths {
            let baseline = fingerprint(&path)?;
            watched.push(WatchedPath { path, baseline });
        }
        let (tx, events) = mpsc::channel(watched.len());
        let interval = self.interval;
        info!(
            paths = watched.len(),
            interval_ms = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX),
            "starting drift watcher"
        );
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            ticker.tick().await;
            loop {
                tokio::select! {
                    () = cancel.cancelled() => break,
                    _ = ticker.tick() => {}
                }
                let mut batch = std::mem::take(&mut watched);
                let tx = tx.clone();
                let fsm = fsm.clone();
                let repair = repair.clone();
                let poll = tokio::task::spawn_blocking(move || {
                    poll_once(&mut batch, &tx, fsm.as_deref(), repair.as_ref());
                    batch
                });
                tokio::select! {
                    () = cancel.cancelled() => break,
                    polled = poll => match polled {
                        Ok(batch) => watched = batch,
                        Err(err) => {
                            warn!(error = %err, "drift poll aborted; stopping watcher");
                            break;
                        }
                    },
                }
            }
            debug!("drift watcher stopped");
        });
        Ok(WatchHandle { events, task })
    }
}

struct WatchedPath {
    path: PathBuf,
    baseline: String,
}

fn poll_once(
    watched: &mut [WatchedPath],
    tx: &mpsc::Sender<WatchEvent>,
    fsm: Option<&SyncStateMachine>,
    repair: Option<&RepairFn>,
) {
    for entry in watched.iter_mut() {
        let current = match fingerprint(&entry.path) {
            Ok(current) => current,
            Err(err) => {
                debug!(
                    path = %entry.path.display(),
                    error = %err,
                    "fingerprint failed; retrying next tick"
                );
                continue;
            }
        };
        if current == entry.baseline {
            continue;
        }
        entry.baseline = current;
        info!(path = %entry.path.display(), "drift detected");

        let event = WatchEvent {
            path: entry.path.clone(),
            timestamp: OffsetDateTime::now_utc(),
        };
        if tx.try_send(event).is_err() {
            debug!(path = %entry.path.display(), "event stream full; dropping event");
        }

        if let Some(fsm) = fsm {
            fsm.send(SyncEvent::Drift);
            fsm.send(SyncEvent::Repair);
        }
        let Some(repair) = repair else {
            continue;
        };
        match repair(&entry.path) {
            Ok(()) => {
                if let Some(fsm) = fsm {
                    fsm.send(SyncEvent::Stable);
                }
            }
            Err(err) => {
                warn!(path = %entry.path.display(), error = %err, "repair failed");
                if let Some(fsm) = fsm {
                    fsm.send(SyncEvent::Drift);
                }
            }
        }
    }
}

/// Repair callback that re-runs link reconciliation on every drift.
///
/// Fails when any create/repair action could not be applied.
pub fn links_repair_callback(reconciler: Reconciler) -> RepairFn {
    Arc::new(move |path: &Path| -> anyhow::Result<()> {
        let result = reconciler.repair()?;
        let failed = result.failed().count();
        if failed > 0 {
            anyhow::bail!(
                "{failed} link(s) could not be repaired after drift at {}",
                path.display()
            );
        }
        Ok(())
    })
}
