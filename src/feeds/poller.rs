use crate::dashboard::model::{Widget, WidgetKind};
use crate::feeds::diagnostics::FeedDiagnostics;
use crate::feeds::views::{build_status, WidgetStatus};
use crate::feeds::{default_refresh, endpoint_for, FeedClient};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::mpsc::{channel, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};

/// Result of one fetch, sent from a worker to the owning thread.
#[derive(Debug)]
pub struct FeedUpdate {
    pub widget_id: String,
    pub generation: u64,
    pub result: Result<Value, String>,
    pub elapsed: Duration,
}

struct Mounted {
    kind: WidgetKind,
    generation: u64,
    status: WidgetStatus,
    // Dropping the sender wakes the worker and ends its loop.
    _stop: Sender<()>,
}

/// Runs one polling worker per mounted widget and collects their results.
///
/// Lives on the thread that owns the dashboard store. Results for widgets
/// that were unmounted (or remounted) after the request went out are
/// dropped.
pub struct FeedHub {
    client: FeedClient,
    refresh: HashMap<WidgetKind, Option<Duration>>,
    tx: Sender<FeedUpdate>,
    rx: Receiver<FeedUpdate>,
    mounted: HashMap<String, Mounted>,
    next_generation: u64,
    diagnostics: FeedDiagnostics,
}

impl FeedHub {
    pub fn new(client: FeedClient) -> Self {
        let (tx, rx) = channel();
        Self {
            client,
            refresh: HashMap::new(),
            tx,
            rx,
            mounted: HashMap::new(),
            next_generation: 0,
            diagnostics: FeedDiagnostics::new(),
        }
    }

    /// Override the refresh interval of `kind` for widgets mounted from now on.
    pub fn set_refresh(&mut self, kind: WidgetKind, interval: Option<Duration>) {
        self.refresh.insert(kind, interval);
    }

    pub fn refresh_for(&self, kind: WidgetKind) -> Option<Duration> {
        self.refresh
            .get(&kind)
            .copied()
            .unwrap_or_else(|| default_refresh(kind))
    }

    pub fn is_mounted(&self, id: &str) -> bool {
        self.mounted.contains_key(id)
    }

    pub fn mounted_ids(&self) -> Vec<String> {
        let mut ids: Vec<_> = self.mounted.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn generation(&self, id: &str) -> Option<u64> {
        self.mounted.get(id).map(|m| m.generation)
    }

    pub fn status(&self, id: &str) -> Option<&WidgetStatus> {
        self.mounted.get(id).map(|m| &m.status)
    }

    pub fn diagnostics(&self) -> &FeedDiagnostics {
        &self.diagnostics
    }

    /// Start polling for `widget`, replacing any worker it already had.
    pub fn mount(&mut self, widget: &Widget) {
        self.next_generation += 1;
        let generation = self.next_generation;
        let (stop_tx, stop_rx) = channel();
        let interval = self.refresh_for(widget.kind);

        let status = match spawn_worker(
            self.client.clone(),
            widget,
            generation,
            interval,
            self.tx.clone(),
            stop_rx,
        ) {
            Ok(()) => WidgetStatus::Loading,
            Err(e) => {
                tracing::error!(widget = %widget.id, "failed to start feed worker: {e}");
                WidgetStatus::Failed(e.to_string())
            }
        };
        tracing::debug!(widget = %widget.id, kind = %widget.kind, generation, "feed mounted");
        self.mounted.insert(
            widget.id.clone(),
            Mounted {
                kind: widget.kind,
                generation,
                status,
                _stop: stop_tx,
            },
        );
    }

    /// Stop polling for `id`. A request already in flight still completes
    /// but its result is discarded.
    pub fn unmount(&mut self, id: &str) -> bool {
        self.diagnostics.forget(id);
        let removed = self.mounted.remove(id).is_some();
        if removed {
            tracing::debug!(widget = id, "feed unmounted");
        }
        removed
    }

    /// Mount widgets that are new or changed kind, unmount ones that are gone.
    pub fn sync(&mut self, widgets: &[Widget]) {
        let wanted: HashSet<&str> = widgets.iter().map(|w| w.id.as_str()).collect();
        let stale: Vec<String> = self
            .mounted
            .keys()
            .filter(|id| !wanted.contains(id.as_str()))
            .cloned()
            .collect();
        for id in stale {
            self.unmount(&id);
        }
        for widget in widgets {
            let current = self.mounted.get(&widget.id).map(|m| m.kind);
            if current != Some(widget.kind) {
                self.mount(widget);
            }
        }
    }

    /// Apply a worker result. Returns the widget's new status, or `None`
    /// when the result belongs to a widget that is no longer mounted.
    pub fn accept(&mut self, update: FeedUpdate) -> Option<(String, WidgetStatus)> {
        let Some(mounted) = self.mounted.get_mut(&update.widget_id) else {
            tracing::debug!(widget = %update.widget_id, "dropping result for unmounted widget");
            return None;
        };
        if mounted.generation != update.generation {
            tracing::debug!(
                widget = %update.widget_id,
                generation = update.generation,
                current = mounted.generation,
                "dropping stale feed result"
            );
            return None;
        }

        let status = match update.result {
            Ok(payload) => build_status(mounted.kind, payload).unwrap_or_else(|e| {
                tracing::warn!(widget = %update.widget_id, "unexpected feed payload: {e:#}");
                WidgetStatus::Failed(format!("{e:#}"))
            }),
            Err(msg) => {
                tracing::warn!(widget = %update.widget_id, "feed fetch failed: {msg}");
                WidgetStatus::Failed(msg)
            }
        };
        let ok = !matches!(status, WidgetStatus::Failed(_));
        self.diagnostics
            .record_fetch(&update.widget_id, update.elapsed, ok);

        // Market pulse keeps showing its last good levels until a new set arrives.
        let keep_last = mounted.kind == WidgetKind::MarketPulse
            && matches!(mounted.status, WidgetStatus::Ready(_))
            && !matches!(status, WidgetStatus::Ready(_));
        if keep_last {
            tracing::debug!(widget = %update.widget_id, "keeping last market pulse view");
        } else {
            mounted.status = status;
        }
        Some((update.widget_id, mounted.status.clone()))
    }

    /// Apply every result that has already arrived.
    pub fn drain(&mut self) -> Vec<(String, WidgetStatus)> {
        let mut changed = Vec::new();
        loop {
            match self.rx.try_recv() {
                Ok(update) => changed.extend(self.accept(update)),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        changed
    }

    /// Block until a result for a mounted widget arrives or `timeout` passes.
    pub fn wait(&mut self, timeout: Duration) -> Option<(String, WidgetStatus)> {
        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.checked_duration_since(Instant::now())?;
            match self.rx.recv_timeout(remaining) {
                Ok(update) => {
                    if let Some(changed) = self.accept(update) {
                        return Some(changed);
                    }
                }
                Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                    return None
                }
            }
        }
    }
}

fn spawn_worker(
    client: FeedClient,
    widget: &Widget,
    generation: u64,
    interval: Option<Duration>,
    tx: Sender<FeedUpdate>,
    stop: Receiver<()>,
) -> std::io::Result<()> {
    let widget_id = widget.id.clone();
    let endpoint = endpoint_for(widget.kind);
    thread::Builder::new()
        .name(format!("feed-{widget_id}"))
        .spawn(move || loop {
            let started = Instant::now();
            let result = client.fetch(endpoint).map_err(|e| format!("{e:#}"));
            let update = FeedUpdate {
                widget_id: widget_id.clone(),
                generation,
                result,
                elapsed: started.elapsed(),
            };
            if tx.send(update).is_err() {
                break;
            }
            let Some(interval) = interval else {
                break;
            };
            match stop.recv_timeout(interval) {
                Err(RecvTimeoutError::Timeout) => continue,
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            }
        })?;
    Ok(())
}
