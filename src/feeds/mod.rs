pub mod client;
pub mod diagnostics;
pub mod models;
pub mod poller;
pub mod views;

use crate::dashboard::model::WidgetKind;
use std::time::Duration;

pub use client::FeedClient;
pub use diagnostics::{FeedDiagnostics, FetchSnapshot};
pub use poller::{FeedHub, FeedUpdate};
pub use views::{build_status, WidgetStatus, WidgetView};

/// Backend endpoints the widgets read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    HourlyAnalytics,
    MorningLevels,
    History,
    Conviction,
    HistoryGrouped,
}

impl Endpoint {
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::HourlyAnalytics => "/api/analytics/hourly",
            Endpoint::MorningLevels => "/api/morning_levels",
            Endpoint::History => "/api/history",
            Endpoint::Conviction => "/api/conviction",
            Endpoint::HistoryGrouped => "/api/history_grouped",
        }
    }
}

pub fn endpoint_for(kind: WidgetKind) -> Endpoint {
    match kind {
        WidgetKind::TraderPi => Endpoint::HistoryGrouped,
        WidgetKind::MarketPulse | WidgetKind::SentimentHeatmap => Endpoint::MorningLevels,
        WidgetKind::Sniper => Endpoint::Conviction,
        WidgetKind::Performance => Endpoint::History,
        WidgetKind::HourlyAlpha => Endpoint::HourlyAnalytics,
    }
}

/// How often a widget refetches. `None` fetches once when mounted.
pub fn default_refresh(kind: WidgetKind) -> Option<Duration> {
    match kind {
        WidgetKind::TraderPi => Some(Duration::from_secs(15)),
        WidgetKind::SentimentHeatmap => Some(Duration::from_secs(60)),
        WidgetKind::MarketPulse => Some(Duration::from_secs(300)),
        WidgetKind::Sniper | WidgetKind::Performance | WidgetKind::HourlyAlpha => None,
    }
}
