use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tokio_util::sync::CancellationToken;
use tracing::info;

use aios_domain::{canonicalize, SyncStateMachine};

use crate::watch::{links_repair_callback, PollingWatcher, WatchEvent, Watcher};
use crate::{CommandContext, ExecutionOutcome};

#[derive(Clone, Debug, Default)]
pub struct WatchRequest {
    pub paths: Vec<String>,
    /// Overrides the configured polling interval.
    pub interval: Option<Duration>,
    /// Re-run link reconciliation whenever drift is detected.
    pub repair_links: bool,
}

/// Watches until `cancel` fires, reporting each drift event to `on_event`.
pub async fn watch_paths<F>(
    ctx: &CommandContext<'_>,
    request: &WatchRequest,
    cancel: CancellationToken,
    mut on_event: F,
) -> ExecutionOutcome
where
    F: FnMut(&WatchEvent),
{
    let mut paths = Vec::with_capacity(request.paths.len());
    for raw in &request.paths {
        match canonicalize(raw) {
            Ok(path) => paths.push(path),
            Err(err) => return ExecutionOutcome::from_error(&err),
        }
    }
    let interval = request
        .interval
        .unwrap_or_else(|| ctx.config().watch().interval);
    let fsm = Arc::new(SyncStateMachine::new());
    let repair = request
        .repair_links
        .then(|| links_repair_callback(ctx.reconciler()));

    let watcher = PollingWatcher::new(interval);
    let mut handle = match watcher.watch(cancel, Some(Arc::clone(&fsm)), paths.clone(), repair) {
        Ok(handle) => handle,
        Err(err) => return ExecutionOutcome::from_error(&err),
    };

    let mut events = 0usize;
    while let Some(event) = handle.recv().await {
        events += 1;
        on_event(&event);
    }
    handle.join().await;

    let state = fsm.state();
    info!(events, state = state.as_str(), "watch finished");
    ExecutionOutcome::success(
        format!("stopped after {events} drift event(s); sync state {state}"),
        json!({
            "paths": paths,
            "events": events,
            "state": state,
            "history": fsm.history(),
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    use crate::config::{Config, GlobalOptions};
    use crate::CommandStatus;

    #[tokio::test]
    async fn watch_reports_drift_and_final_state() {
        let tmp = tempfile::tempdir().unwrap();
        let watched = tmp.path().join("client");
        fs::create_dir_all(&watched).unwrap();
        fs::write(watched.join("config.json"), br#"{"v":1}"#).unwrap();

        let global = GlobalOptions::default();
        let config = Config::for_root(&tmp.path().join("ws")).unwrap();
        let ctx = CommandContext::with_config(&global, config);
        let request = WatchRequest {
            paths: vec![watched.display().to_string()],
            interval: Some(Duration::from_millis(10)),
            repair_links: true,
        };

        let writer_path = watched.join("config.json");
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            fs::write(writer_path, br#"{"v":broken}"#).unwrap();
        });

        let cancel = CancellationToken::new();
        let stop = cancel.clone();
        let mut seen = Vec::new();
        let outcome = tokio::time::timeout(
            Duration::from_secs(5),
            watch_paths(&ctx, &request, cancel, |event| {
                seen.push(event.path.clone());
                stop.cancel();
            }),
        )
        .await
        .expect("watch finishes after cancel");

        assert_eq!(outcome.status, CommandStatus::Ok);
        assert_eq!(seen, vec![watched]);
        assert_eq!(outcome.details["events"], 1);
        assert_eq!(outcome.details["state"], "clean");
    }

    #[tokio::test]
    async fn empty_path_list_is_a_user_error() {
        let tmp = tempfile::tempdir().unwrap();
        let global = GlobalOptions::default();
        let ctx = CommandContext::with_config(&global, Config::for_root(tmp.path()).unwrap());
        let outcome = watch_paths(
            &ctx,
            &WatchRequest::default(),
            CancellationToken::new(),
            |_| {},
        )
        .await;
        assert_eq!(outcome.status, CommandStatus::UserError);
    }
}
