use serde::{Deserialize, Serialize};

/// Number of columns on the dashboard grid.
pub const GRID_COLUMNS: i32 = 24;

/// Known widget kinds. Serialized with the component names used by saved
/// boards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WidgetKind {
    #[serde(rename = "TraderPiWidget")]
    TraderPi,
    #[serde(rename = "MarketPulseWidget")]
    MarketPulse,
    #[serde(rename = "SentimentHeatmapWidget")]
    SentimentHeatmap,
    #[serde(rename = "SniperWidget")]
    Sniper,
    #[serde(rename = "PerformanceWidget")]
    Performance,
    #[serde(rename = "HourlyAlphaWidget")]
    HourlyAlpha,
}

impl WidgetKind {
    pub const ALL: [WidgetKind; 6] = [
        WidgetKind::TraderPi,
        WidgetKind::MarketPulse,
        WidgetKind::SentimentHeatmap,
        WidgetKind::Sniper,
        WidgetKind::Performance,
        WidgetKind::HourlyAlpha,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WidgetKind::TraderPi => "TraderPiWidget",
            WidgetKind::MarketPulse => "MarketPulseWidget",
            WidgetKind::SentimentHeatmap => "SentimentHeatmapWidget",
            WidgetKind::Sniper => "SniperWidget",
            WidgetKind::Performance => "PerformanceWidget",
            WidgetKind::HourlyAlpha => "HourlyAlphaWidget",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            WidgetKind::TraderPi => "Trader Pi",
            WidgetKind::MarketPulse => "Market Pulse",
            WidgetKind::SentimentHeatmap => "Sentiment Heatmap",
            WidgetKind::Sniper => "Sniper",
            WidgetKind::Performance => "Performance",
            WidgetKind::HourlyAlpha => "Hourly Alpha",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            WidgetKind::TraderPi => "Live bot status and recent trades",
            WidgetKind::MarketPulse => "VIX structure, volatility and GEX walls",
            WidgetKind::SentimentHeatmap => "Per ticker sentiment scores",
            WidgetKind::Sniper => "Win rate per strategy conviction bucket",
            WidgetKind::Performance => "Equity curve against the SPY benchmark",
            WidgetKind::HourlyAlpha => "P&L grouped by hour of day",
        }
    }

    /// Default `(w, h)` grid span for a freshly added widget.
    pub fn default_span(&self) -> (i32, i32) {
        match self {
            WidgetKind::TraderPi => (GRID_COLUMNS, 4),
            WidgetKind::Performance | WidgetKind::HourlyAlpha => (12, 8),
            _ => (8, 8),
        }
    }

    /// Catalog entries for every known kind, suitable for seeding `board`.
    pub fn catalog() -> Vec<WidgetInfo> {
        Self::ALL.iter().map(|kind| WidgetInfo::for_kind(*kind)).collect()
    }
}

impl std::fmt::Display for WidgetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Widget {
    #[serde(rename = "i", alias = "id")]
    pub id: String,
    #[serde(rename = "type")]
    pub kind: WidgetKind,
    #[serde(default)]
    pub symbol: String,
}

impl Widget {
    pub fn new(id: &str, kind: WidgetKind, symbol: &str) -> Self {
        Self {
            id: id.to_string(),
            kind,
            symbol: symbol.to_string(),
        }
    }
}

/// Grid placement of one widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutEntry {
    #[serde(rename = "i", alias = "id")]
    pub id: String,
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
    /// Transient drag state.
    #[serde(default)]
    pub moved: bool,
    /// Locked from repositioning.
    #[serde(rename = "static", default)]
    pub is_static: bool,
}

impl LayoutEntry {
    pub fn new(id: &str, x: i32, y: i32, w: i32, h: i32) -> Self {
        Self {
            id: id.to_string(),
            x,
            y,
            w,
            h,
            moved: false,
            is_static: false,
        }
    }

    /// First grid row below this entry.
    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }
}

/// Catalog metadata describing a widget kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetInfo {
    #[serde(rename = "type")]
    pub kind: WidgetKind,
    pub title: String,
    #[serde(default)]
    pub description: String,
}

impl WidgetInfo {
    pub fn for_kind(kind: WidgetKind) -> Self {
        Self {
            kind,
            title: kind.title().to_string(),
            description: kind.description().to_string(),
        }
    }
}

/// A named, switchable collection of widgets.
///
/// Older saves identify a dashboard by `name` alone; its `id` then is the name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "StoredDashboard")]
pub struct Dashboard {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub widgets: Option<Vec<Widget>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layouts: Option<Vec<LayoutEntry>>,
}

#[derive(Deserialize)]
struct StoredDashboard {
    #[serde(default)]
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    widgets: Option<Vec<Widget>>,
    #[serde(default)]
    layouts: Option<Vec<LayoutEntry>>,
}

impl TryFrom<StoredDashboard> for Dashboard {
    type Error = anyhow::Error;

    fn try_from(raw: StoredDashboard) -> Result<Self, Self::Error> {
        let id = match (raw.id.is_empty(), raw.name.is_empty()) {
            (false, _) => raw.id,
            (true, false) => raw.name.clone(),
            (true, true) => anyhow::bail!("dashboard needs an id or a name"),
        };
        Ok(Dashboard {
            id,
            name: raw.name,
            widgets: raw.widgets,
            layouts: raw.layouts,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Dark,
    #[default]
    Light,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }
}

impl std::str::FromStr for Theme {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().trim_matches('"') {
            "dark" => Ok(Theme::Dark),
            "light" => Ok(Theme::Light),
            other => anyhow::bail!("unknown theme '{other}'"),
        }
    }
}
