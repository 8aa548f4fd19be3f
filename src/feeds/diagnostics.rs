use std::collections::HashMap;
use std::time::{Duration, Instant};

pub const SLOW_FETCH_THRESHOLD: Duration = Duration::from_secs(3);

#[derive(Clone, Debug)]
pub struct FetchSnapshot {
    pub widget_id: String,
    pub last_refresh_at: Instant,
    pub last_duration: Duration,
    pub fetches: u64,
    pub failures: u64,
}

struct FetchState {
    last_refresh_at: Instant,
    last_duration: Duration,
    fetches: u64,
    failures: u64,
}

/// Per widget fetch timing, for spotting slow or failing endpoints.
pub struct FeedDiagnostics {
    widget_states: HashMap<String, FetchState>,
    slow_threshold: Duration,
}

impl FeedDiagnostics {
    pub fn new() -> Self {
        Self::with_threshold(SLOW_FETCH_THRESHOLD)
    }

    pub fn with_threshold(slow_threshold: Duration) -> Self {
        Self {
            widget_states: HashMap::new(),
            slow_threshold,
        }
    }

    pub fn record_fetch(&mut self, widget_id: &str, duration: Duration, ok: bool) {
        if duration >= self.slow_threshold {
            tracing::warn!(
                widget = widget_id,
                elapsed_ms = duration.as_millis() as u64,
                "slow feed fetch"
            );
        }
        let state = self
            .widget_states
            .entry(widget_id.to_string())
            .or_insert(FetchState {
                last_refresh_at: Instant::now(),
                last_duration: duration,
                fetches: 0,
                failures: 0,
            });
        state.last_refresh_at = Instant::now();
        state.last_duration = duration;
        state.fetches += 1;
        if !ok {
            state.failures += 1;
        }
    }

    pub fn forget(&mut self, widget_id: &str) {
        self.widget_states.remove(widget_id);
    }

    pub fn snapshot(&self) -> Vec<FetchSnapshot> {
        let mut out: Vec<_> = self
            .widget_states
            .iter()
            .map(|(id, s)| FetchSnapshot {
                widget_id: id.clone(),
                last_refresh_at: s.last_refresh_at,
                last_duration: s.last_duration,
                fetches: s.fetches,
                failures: s.failures,
            })
            .collect();
        out.sort_by(|a, b| a.widget_id.cmp(&b.widget_id));
        out
    }
}

impl Default for FeedDiagnostics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_fetches_and_failures() {
        let mut diag = FeedDiagnostics::new();
        diag.record_fetch("sniper", Duration::from_millis(20), true);
        diag.record_fetch("sniper", Duration::from_millis(40), false);
        diag.record_fetch("performance", Duration::from_millis(5), true);

        let snap = diag.snapshot();
        assert_eq!(snap.len(), 2);
        assert_eq!(snap[0].widget_id, "performance");
        assert_eq!(snap[1].fetches, 2);
        assert_eq!(snap[1].failures, 1);
        assert_eq!(snap[1].last_duration, Duration::from_millis(40));

        diag.forget("sniper");
        assert_eq!(diag.snapshot().len(), 1);
    }
}
