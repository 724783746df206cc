use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Consolidated sentiment record written once per run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub timestamp: DateTime<Utc>,
    pub sentiment_score: Option<u8>,
    pub sentiment_label: Option<String>,
    pub dominance: Option<f64>,          // BTC share of total market cap, 2dp
    pub altseason_index: Option<u8>,     // 0 - 100, derived
    pub altseason_method: Option<AltseasonMethod>,
    pub rate_decision: Option<RateDecision>,
    pub market_indicators: MarketIndicators,
    pub error: Option<String>,
}

impl Snapshot {
    /// Empty snapshot stamped at `timestamp`; every field starts absent
    pub fn new(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            sentiment_score: None,
            sentiment_label: None,
            dominance: None,
            altseason_index: None,
            altseason_method: None,
            rate_decision: None,
            market_indicators: MarketIndicators::default(),
            error: None,
        }
    }
}

/// Strategy that produced the altseason index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AltseasonMethod {
    OutperformanceRatio,
    AthBlend,
    DominanceProxy,
}

impl AltseasonMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            AltseasonMethod::OutperformanceRatio => "outperformance_ratio",
            AltseasonMethod::AthBlend => "ath_blend",
            AltseasonMethod::DominanceProxy => "dominance_proxy",
        }
    }
}

/// Next policy-rate decision and the illustrative outcome probabilities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateDecision {
    pub current_rate: PolicyRate,
    pub next_meeting: NextMeeting,
    pub probabilities: Probabilities,
    pub last_decision: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyRate {
    pub range: String,           // "4.25-4.50%"
    pub midpoint: f64,
    pub source: RateSource,
}

/// Where the current policy rate came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateSource {
    Series,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NextMeeting {
    pub date: NaiveDate,
    pub label: String,
    pub time: String,
    pub days_until: i64,
}

/// Cut / hold / hike probabilities in percent; always sum to 100
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Probabilities {
    pub cut: u8,
    pub hold: u8,
    pub hike: u8,
}

impl Probabilities {
    pub const fn new(cut: u8, hold: u8, hike: u8) -> Self {
        Self { cut, hold, hike }
    }

    pub fn total(&self) -> u16 {
        self.cut as u16 + self.hold as u16 + self.hike as u16
    }
}

/// One market reading with its change versus the previous reference price
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketIndicator {
    pub value: f64,
    pub percent_change: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<VolatilityRegime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatted: Option<String>,
}

impl MarketIndicator {
    pub fn new(value: f64, percent_change: Option<f64>) -> Self {
        Self {
            value,
            percent_change,
            status: None,
            formatted: None,
        }
    }
}

/// VIX regime bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VolatilityRegime {
    Normal,
    Elevated,
    High,
}

impl VolatilityRegime {
    pub fn from_level(vix: f64) -> Self {
        if vix > 25.0 {
            VolatilityRegime::High
        } else if vix > 18.0 {
            VolatilityRegime::Elevated
        } else {
            VolatilityRegime::Normal
        }
    }
}

/// Per-indicator readings; each entry is fetched independently
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketIndicators {
    pub vix: Option<MarketIndicator>,
    pub dxy: Option<MarketIndicator>,
    pub gold: Option<MarketIndicator>,
    pub sp500: Option<MarketIndicator>,
    pub treasury10y: Option<MarketIndicator>,
    pub btc_price: Option<MarketIndicator>,
    pub eth_price: Option<MarketIndicator>,
    pub total_market_cap: Option<MarketIndicator>,
}

impl MarketIndicators {
    pub fn set_quote(&mut self, kind: QuoteIndicator, reading: MarketIndicator) {
        let slot = match kind {
            QuoteIndicator::Vix => &mut self.vix,
            QuoteIndicator::Dxy => &mut self.dxy,
            QuoteIndicator::Gold => &mut self.gold,
            QuoteIndicator::Sp500 => &mut self.sp500,
            QuoteIndicator::Treasury10y => &mut self.treasury10y,
        };
        *slot = Some(reading);
    }
}

/// Indicators sourced from the Yahoo chart API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteIndicator {
    Vix,
    Dxy,
    Gold,
    Sp500,
    Treasury10y,
}

impl QuoteIndicator {
    pub const ALL: [QuoteIndicator; 5] = [
        QuoteIndicator::Vix,
        QuoteIndicator::Dxy,
        QuoteIndicator::Gold,
        QuoteIndicator::Sp500,
        QuoteIndicator::Treasury10y,
    ];

    /// Yahoo ticker symbol
    pub fn symbol(&self) -> &'static str {
        match self {
            QuoteIndicator::Vix => "^VIX",
            QuoteIndicator::Dxy => "DX-Y.NYB",
            QuoteIndicator::Gold => "GC=F",
            QuoteIndicator::Sp500 => "^GSPC",
            QuoteIndicator::Treasury10y => "^TNX",
        }
    }

    /// Decimal places kept for the published value
    pub fn value_decimals(&self) -> u32 {
        match self {
            QuoteIndicator::Treasury10y => 3,
            _ => 2,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            QuoteIndicator::Vix => "vix",
            QuoteIndicator::Dxy => "dxy",
            QuoteIndicator::Gold => "gold",
            QuoteIndicator::Sp500 => "sp500",
            QuoteIndicator::Treasury10y => "treasury10y",
        }
    }
}

/// Entry of the market-cap ranked listing, in rank order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedAsset {
    pub id: String,
    /// Percent change over the configured trailing window
    pub trailing_change: Option<f64>,
    /// Percent distance from the all-time high (0 at the high, negative below it)
    pub ath_change: Option<f64>,
}

/// Error types for feed acquisition and normalization
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("{feed} request failed: {message}")]
    Transport { feed: &'static str, message: String },

    #[error("{feed} API error ({status}): {body}")]
    Status {
        feed: &'static str,
        status: u16,
        body: String,
    },

    #[error("Rate limit exceeded for {feed}")]
    RateLimited {
        feed: &'static str,
        retry_after: Option<u64>,
    },

    #[error("{feed} returned an invalid response: {message}")]
    InvalidResponse { feed: &'static str, message: String },

    #[error("{feed} response is missing {field}")]
    MissingField {
        feed: &'static str,
        field: &'static str,
    },
}

impl FeedError {
    pub fn feed(&self) -> &'static str {
        match self {
            FeedError::Transport { feed, .. }
            | FeedError::Status { feed, .. }
            | FeedError::RateLimited { feed, .. }
            | FeedError::InvalidResponse { feed, .. }
            | FeedError::MissingField { feed, .. } => feed,
        }
    }
}

/// Result type for feed operations
pub type Result<T> = std::result::Result<T, FeedError>;
