use trading_dashboard::dashboard::check_layout_sync;
use trading_dashboard::dashboard::model::WidgetKind;
use trading_dashboard::feeds::{FeedClient, FeedHub};
use trading_dashboard::settings::{Settings, DEFAULT_SETTINGS_FILE};
use trading_dashboard::{logging, DashboardStore, FileStorage};

use std::time::{Duration, Instant};

fn main() -> anyhow::Result<()> {
    let settings_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_SETTINGS_FILE.to_string());
    let settings = Settings::load(&settings_path)?;
    let _log_guard = logging::init(settings.debug_logging, settings.log_path().as_deref());

    let storage_dir = settings.storage_path();
    tracing::info!(dir = %storage_dir.display(), "opening dashboard state");
    let storage = FileStorage::open(&storage_dir)?;
    let mut store = DashboardStore::load(storage);

    for warning in check_layout_sync(&store.state().widgets, &store.state().layouts) {
        tracing::warn!("{warning}");
    }
    if store.state().board.is_empty() {
        store.set_board(WidgetKind::catalog());
    }
    tracing::info!(
        widgets = store.state().widgets.len(),
        theme = store.state().theme.as_str(),
        dashboard = %store.state().active_dashboard,
        "dashboard ready"
    );

    let client = FeedClient::new(&settings.api_base_url, settings.request_timeout())?;
    let mut hub = FeedHub::new(client);
    for kind in WidgetKind::ALL {
        if let Some(interval) = settings.refresh_override(kind) {
            hub.set_refresh(kind, interval);
        }
    }
    hub.sync(&store.state().widgets);

    let deadline = settings
        .run_seconds
        .map(|secs| Instant::now() + Duration::from_secs(secs));
    loop {
        let timeout = match deadline {
            Some(deadline) => match deadline.checked_duration_since(Instant::now()) {
                Some(left) => left,
                None => break,
            },
            None => Duration::from_secs(1),
        };
        if let Some((id, status)) = hub.wait(timeout) {
            tracing::info!(widget = %id, "{}", status.summary());
        }
    }

    for snap in hub.diagnostics().snapshot() {
        tracing::info!(
            widget = %snap.widget_id,
            fetches = snap.fetches,
            failures = snap.failures,
            last_ms = snap.last_duration.as_millis() as u64,
            "feed summary"
        );
    }
    Ok(())
}
