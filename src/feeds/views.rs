//! Reshaping of endpoint payloads into what each widget displays.

use crate::dashboard::model::WidgetKind;
use crate::feeds::models::{
    ConvictionReport, HistoryPoint, HourlyPnl, MorningLevels, SentimentReport,
};
use anyhow::{bail, Context, Result};
use serde_json::Value;

pub const CONVICTION_STRATEGIES: [&str; 3] = ["ORB", "RSI", "CoinToss"];
pub const CONVICTION_BUCKETS: [&str; 3] = ["HIGH", "MEDIUM", "LOW"];
pub const HEATMAP_MAX_TICKERS: usize = 25;
pub const RECENT_TRADES: usize = 5;
const TRADE_PREVIEW_CHARS: usize = 60;

/// What a widget currently shows.
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetStatus {
    Loading,
    Ready(WidgetView),
    NoData,
    Failed(String),
}

impl WidgetStatus {
    pub fn summary(&self) -> String {
        match self {
            WidgetStatus::Loading => "loading".into(),
            WidgetStatus::NoData => "no data".into(),
            WidgetStatus::Failed(msg) => format!("failed: {msg}"),
            WidgetStatus::Ready(view) => view.summary(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum WidgetView {
    TraderPi(TraderPiView),
    MarketPulse(PulseView),
    Sentiment(HeatmapView),
    Conviction(ConvictionView),
    Performance(PerformanceView),
    Hourly(HourlyView),
}

impl WidgetView {
    pub fn summary(&self) -> String {
        match self {
            WidgetView::TraderPi(v) => format!("online, {} recent trades", v.recent_len()),
            WidgetView::MarketPulse(v) => format!(
                "{} vix {:?}, hv21 {:.1}% {}",
                v.regime, v.vix, v.hv_21, v.hv_label
            ),
            WidgetView::Sentiment(v) => {
                format!("aggregate {:.2} over {} tickers", v.aggregate, v.cells.len())
            }
            WidgetView::Conviction(v) => format!("{} conviction buckets", v.rows.len()),
            WidgetView::Performance(v) => match v.points.last() {
                Some(p) => format!("equity {:.2}% vs spy {:.2}%", p.equity_pct, p.spy_pct),
                None => "no history".into(),
            },
            WidgetView::Hourly(v) => format!("{} hourly buckets", v.bars.len()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Good,
    Bad,
    Neutral,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HourlyBar {
    pub label: String,
    pub pnl: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HourlyView {
    pub bars: Vec<HourlyBar>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PulseView {
    pub regime: String,
    pub vix: Option<f64>,
    pub contango: bool,
    pub hv_21: f64,
    pub hv_signal: Signal,
    pub hv_label: &'static str,
    pub put_wall: Option<f64>,
    pub call_wall: Option<f64>,
    pub net_gex_millions: Option<f64>,
    pub gex_signal: Signal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    StrongBuy,
    Buy,
    Neutral,
    Sell,
    StrongSell,
}

impl Tone {
    pub fn for_score(score: f64) -> Self {
        if score > 0.5 {
            Tone::StrongBuy
        } else if score > 0.1 {
            Tone::Buy
        } else if score < -0.5 {
            Tone::StrongSell
        } else if score < -0.1 {
            Tone::Sell
        } else {
            Tone::Neutral
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeatCell {
    pub ticker: String,
    pub score: f64,
    pub tone: Tone,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapView {
    pub aggregate: f64,
    pub model: String,
    pub cells: Vec<HeatCell>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PerformancePoint {
    pub date: String,
    pub time: String,
    pub equity: f64,
    pub equity_pct: f64,
    pub spy_pct: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceView {
    pub points: Vec<PerformancePoint>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConvictionRow {
    pub name: String,
    pub strategy: &'static str,
    pub bucket: &'static str,
    pub win_rate: f64,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConvictionView {
    pub rows: Vec<ConvictionRow>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TraderPiView {
    /// Truncated previews of the most recent entries.
    Trades { recent: Vec<String> },
    /// Payload of unknown shape, pretty printed.
    Raw(String),
}

impl TraderPiView {
    fn recent_len(&self) -> usize {
        match self {
            TraderPiView::Trades { recent } => recent.len(),
            TraderPiView::Raw(_) => 0,
        }
    }
}

/// Build what widget `kind` shows from its endpoint's JSON.
///
/// Decode failures are errors; well formed payloads with nothing to show
/// give [`WidgetStatus::NoData`].
pub fn build_status(kind: WidgetKind, payload: Value) -> Result<WidgetStatus> {
    let view = match kind {
        WidgetKind::TraderPi => trader_pi(payload).map(WidgetView::TraderPi),
        WidgetKind::MarketPulse => market_pulse(payload)?.map(WidgetView::MarketPulse),
        WidgetKind::SentimentHeatmap => Some(WidgetView::Sentiment(heatmap(payload)?)),
        WidgetKind::Sniper => Some(WidgetView::Conviction(conviction(payload)?)),
        WidgetKind::Performance => performance(payload)?.map(WidgetView::Performance),
        WidgetKind::HourlyAlpha => hourly(payload)?.map(WidgetView::Hourly),
    };
    Ok(view.map_or(WidgetStatus::NoData, WidgetStatus::Ready))
}

pub fn hourly(payload: Value) -> Result<Option<HourlyView>> {
    if !payload.is_array() {
        return Ok(None);
    }
    let rows: Vec<HourlyPnl> = serde_json::from_value(payload).context("decode hourly analytics")?;
    let bars = rows
        .into_iter()
        .map(|r| HourlyBar {
            label: r.label,
            pnl: r.pnl,
        })
        .collect();
    Ok(Some(HourlyView { bars }))
}

pub fn market_pulse(payload: Value) -> Result<Option<PulseView>> {
    let levels: MorningLevels = serde_json::from_value(payload).context("decode morning levels")?;
    if levels.error.is_some() {
        return Ok(None);
    }
    let vix = levels.vix_data.unwrap_or_default();
    let spy = levels.spy_levels.unwrap_or_default();
    let gex = levels.gex.unwrap_or_default();

    let hv_21 = spy.hv_21.unwrap_or(0.0);
    let hv_signal = if hv_21 > 20.0 {
        Signal::Bad
    } else if hv_21 < 10.0 {
        Signal::Good
    } else {
        Signal::Neutral
    };
    let gex_signal = if gex.total_gex.unwrap_or(0.0) > 0.0 {
        Signal::Good
    } else {
        Signal::Bad
    };

    Ok(Some(PulseView {
        regime: vix
            .regime
            .filter(|r| !r.is_empty())
            .map(|r| r.to_uppercase())
            .unwrap_or_else(|| "UNKNOWN".into()),
        vix: vix.vix,
        contango: vix.spread.map_or(false, |s| s > 0.0),
        hv_21,
        hv_signal,
        hv_label: if hv_21 > 15.0 { "HIGH" } else { "LOW" },
        put_wall: gex.put_wall,
        call_wall: gex.call_wall,
        net_gex_millions: gex.total_gex.map(|g| g / 1_000_000.0),
        gex_signal,
    }))
}

pub fn heatmap(payload: Value) -> Result<HeatmapView> {
    let levels: MorningLevels = serde_json::from_value(payload).context("decode morning levels")?;
    if let Some(err) = levels.error {
        bail!(err);
    }
    let Some(SentimentReport {
        sentiment,
        details,
        model,
    }) = levels.sentiment
    else {
        bail!("No sentiment data found");
    };
    // BTreeMap iteration is already alphabetical.
    let cells = details
        .into_iter()
        .take(HEATMAP_MAX_TICKERS)
        .map(|(ticker, score)| {
            let score = score.value();
            HeatCell {
                ticker,
                score,
                tone: Tone::for_score(score),
            }
        })
        .collect();
    Ok(HeatmapView {
        aggregate: sentiment,
        model,
        cells,
    })
}

fn date_label(time: &str) -> String {
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(time) {
        return dt.date_naive().to_string();
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(time, fmt) {
            return dt.date().to_string();
        }
    }
    if let Ok(d) = chrono::NaiveDate::parse_from_str(time, "%Y-%m-%d") {
        return d.to_string();
    }
    time.to_string()
}

fn pct_change(value: f64, start: f64) -> f64 {
    if start == 0.0 {
        0.0
    } else {
        (value - start) / start * 100.0
    }
}

pub fn performance(payload: Value) -> Result<Option<PerformanceView>> {
    if !payload.is_array() {
        return Ok(None);
    }
    let history: Vec<HistoryPoint> = serde_json::from_value(payload).context("decode history")?;
    let Some(first) = history.first() else {
        return Ok(None);
    };
    let (start_equity, start_spy) = (first.equity, first.spy_price);
    let points = history
        .iter()
        .map(|p| PerformancePoint {
            date: date_label(&p.time),
            time: p.time.clone(),
            equity: p.equity,
            equity_pct: pct_change(p.equity, start_equity),
            spy_pct: pct_change(p.spy_price, start_spy),
        })
        .collect();
    Ok(Some(PerformanceView { points }))
}

pub fn conviction(payload: Value) -> Result<ConvictionView> {
    let report: ConvictionReport =
        serde_json::from_value(payload).context("decode conviction report")?;
    let mut rows = Vec::new();
    for strategy in CONVICTION_STRATEGIES {
        for bucket in CONVICTION_BUCKETS {
            let Some(stats) = report.bucket(strategy, bucket) else {
                continue;
            };
            if stats.total <= 0.0 {
                continue;
            }
            rows.push(ConvictionRow {
                name: format!("{strategy} {bucket}"),
                strategy,
                bucket,
                win_rate: stats.wins / stats.total * 100.0,
                total: stats.total,
            });
        }
    }
    Ok(ConvictionView { rows })
}

pub fn trader_pi(payload: Value) -> Option<TraderPiView> {
    match payload {
        Value::Null => None,
        Value::Array(items) => Some(TraderPiView::Trades {
            recent: items
                .iter()
                .take(RECENT_TRADES)
                .map(|item| {
                    let text: String = item.to_string().chars().take(TRADE_PREVIEW_CHARS).collect();
                    format!("{text}...")
                })
                .collect(),
        }),
        other => Some(TraderPiView::Raw(
            serde_json::to_string_pretty(&other).unwrap_or_else(|_| other.to_string()),
        )),
    }
}
