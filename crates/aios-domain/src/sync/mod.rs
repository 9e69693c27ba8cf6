//! Three-state sync machine shared between the drift watcher and status readers.

use std::collections::VecDeque;
use std::fmt;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

const HISTORY_LIMIT: usize = 64;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncState {
    Clean,
    Drifted,
    Repairing,
    /// Reported by a machine that never initialized.
    Unknown,
}

impl SyncState {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SyncState::Clean => "clean",
            SyncState::Drifted => "drifted",
            SyncState::Repairing => "repairing",
            SyncState::Unknown => "unknown",
        }
    }
}

impl fmt::Display for SyncState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SyncEvent {
    Drift,
    Stable,
    Repair,
}

impl SyncEvent {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SyncEvent::Drift => "DRIFT",
            SyncEvent::Stable => "STABLE",
            SyncEvent::Repair => "REPAIR",
        }
    }
}

/// Looks up the transition table. `None` means the pair is ignored.
#[must_use]
pub fn next_state(from: SyncState, event: SyncEvent) -> Option<SyncState> {
    use SyncEvent::{Drift, Repair, Stable};
    use SyncState::{Clean, Drifted, Repairing, Unknown};
    match (from, event) {
        (Clean | Drifted | Repairing, Drift) => Some(Drifted),
        (Clean | Drifted | Repairing, Stable) => Some(Clean),
        (Drifted | Repairing, Repair) => Some(Repairing),
        (Clean, Repair) | (Unknown, _) => None,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub from: SyncState,
    pub event: SyncEvent,
    pub to: SyncState,
}

#[derive(Debug)]
struct Inner {
    state: SyncState,
    history: VecDeque<Transition>,
}

#[derive(Debug)]
pub struct SyncStateMachine {
    inner: Option<Mutex<Inner>>,
}

impl SyncStateMachine {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Some(Mutex::new(Inner {
                state: SyncState::Clean,
                history: VecDeque::new(),
            })),
        }
    }

    /// A machine that failed to initialize: reads `unknown`, ignores events.
    #[must_use]
    pub fn uninitialized() -> Self {
        Self { inner: None }
    }

    /// Applies `event`. Unlisted pairs and uninitialized machines are no-ops.
    pub fn send(&self, event: SyncEvent) {
        let Some(inner) = &self.inner else {
            return;
        };
        let Ok(mut guard) = inner.lock() else {
            return;
        };
        let from = guard.state;
        let Some(to) = next_state(from, event) else {
            return;
        };
        guard.state = to;
        if from != to {
            if guard.history.len() == HISTORY_LIMIT {
                guard.history.pop_front();
            }
            guard.history.push_back(Transition { from, event, to });
        }
    }

    #[must_use]
    pub fn state(&self) -> SyncState {
        self.inner
            .as_ref()
            .and_then(|inner| inner.lock().ok().map(|guard| guard.state))
            .unwrap_or(SyncState::Unknown)
    }

    /// Most recent state-changing transitions, oldest first.
    #[must_use]
    pub fn history(&self) -> Vec<Transition> {
        self.inner
            .as_ref()
            .and_then(|inner| {
                inner
                    .lock()
                    .ok()
                    .map(|guard| guard.history.iter().copied().collect())
            })
            .unwrap_or_default()
    }
}

impl Default for SyncStateMachine {
    fn default() -> Self {
        Self::new()
    }
}
