//! Response schemas of the backend endpoints polled by the widgets.

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

/// Accept numbers as well as numeric strings, as the history export mixes
/// both.
fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Number {
        Float(f64),
        Text(String),
    }

    match Number::deserialize(deserializer)? {
        Number::Float(v) => Ok(v),
        Number::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("'{s}' is not a number"))),
    }
}

/// `GET /api/analytics/hourly` element.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HourlyPnl {
    pub label: String,
    #[serde(deserialize_with = "lenient_f64")]
    pub pnl: f64,
}

/// `GET /api/morning_levels`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MorningLevels {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub vix_data: Option<VixData>,
    #[serde(default)]
    pub spy_levels: Option<SpyLevels>,
    #[serde(default)]
    pub gex: Option<GexLevels>,
    #[serde(default)]
    pub sentiment: Option<SentimentReport>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct VixData {
    #[serde(default)]
    pub regime: Option<String>,
    #[serde(default)]
    pub vix: Option<f64>,
    #[serde(default)]
    pub spread: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SpyLevels {
    #[serde(default)]
    pub weighted_vol: Option<f64>,
    #[serde(default)]
    pub hv_21: Option<f64>,
    #[serde(default)]
    pub sma_20: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GexLevels {
    #[serde(default)]
    pub call_wall: Option<f64>,
    #[serde(default)]
    pub put_wall: Option<f64>,
    #[serde(default)]
    pub total_gex: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SentimentReport {
    #[serde(default)]
    pub sentiment: f64,
    #[serde(default)]
    pub details: BTreeMap<String, SentimentScore>,
    #[serde(default)]
    pub model: String,
}

/// A ticker's score is either a bare number or `{ "score": n }`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SentimentScore {
    Plain(f64),
    Scored { score: f64 },
}

impl SentimentScore {
    pub fn value(&self) -> f64 {
        match self {
            SentimentScore::Plain(v) => *v,
            SentimentScore::Scored { score } => *score,
        }
    }
}

/// `GET /api/history` element.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HistoryPoint {
    #[serde(rename = "Time")]
    pub time: String,
    #[serde(rename = "Equity", deserialize_with = "lenient_f64")]
    pub equity: f64,
    #[serde(rename = "SPY_Price", deserialize_with = "lenient_f64")]
    pub spy_price: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct BucketStats {
    #[serde(default)]
    pub wins: f64,
    #[serde(default)]
    pub total: f64,
}

/// `GET /api/conviction`: strategy name to confidence bucket to stats.
/// Keys that are not strategy objects (a `trades` list, for instance) are
/// kept but never read as buckets.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct ConvictionReport(pub HashMap<String, Value>);

impl ConvictionReport {
    pub fn bucket(&self, strategy: &str, bucket: &str) -> Option<BucketStats> {
        let stats = self.0.get(strategy)?.as_object()?.get(bucket)?;
        serde_json::from_value(stats.clone()).ok()
    }
}
