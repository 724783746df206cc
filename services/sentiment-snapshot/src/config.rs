//! Runtime settings
//!
//! Loaded once at startup from built-in defaults, an optional TOML file,
//! `SNAPSHOT_*` environment variables and the provider credential variables.

use anyhow::Context;
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::calendar::MeetingEntry;

/// Default config file name (extension resolved by the `config` crate)
pub const DEFAULT_CONFIG_FILE: &str = "snapshot";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub cmc_base_url: String,
    pub coingecko_base_url: String,
    pub yahoo_base_url: String,
    pub binance_base_url: String,
    pub fred_base_url: String,

    /// CoinMarketCap key; requests go out unauthenticated when unset
    pub cmc_api_key: Option<String>,
    pub fred_api_key: String,

    pub output_path: PathBuf,
    pub request_timeout_secs: u64,
    /// Pause before the unauthenticated CoinGecko listing request
    pub listing_delay_ms: u64,
    /// CoinGecko trailing change window used for the outperformance ratio
    pub trailing_window: String,
    /// Upper bound of the target range used when the rate series is unavailable
    pub fallback_rate_upper: f64,
    pub last_decision_label: String,
    pub log_level: String,
    /// Replaces the built-in FOMC calendar when present
    pub meetings: Option<Vec<MeetingEntry>>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            cmc_base_url: "https://pro-api.coinmarketcap.com".to_string(),
            coingecko_base_url: "https://api.coingecko.com/api/v3".to_string(),
            yahoo_base_url: "https://query1.finance.yahoo.com/v8/finance/chart".to_string(),
            binance_base_url: "https://api.binance.com".to_string(),
            fred_base_url: "https://api.stlouisfed.org".to_string(),
            cmc_api_key: None,
            fred_api_key: "DEMO".to_string(),
            output_path: PathBuf::from("data/cmc-data.json"),
            request_timeout_secs: 30,
            listing_delay_ms: 1000,
            trailing_window: "30d".to_string(),
            fallback_rate_upper: 4.50,
            last_decision_label: "Cut 25bp".to_string(),
            log_level: "info".to_string(),
            meetings: None,
        }
    }
}

impl Settings {
    /// Load settings from `SNAPSHOT_CONFIG` (or `snapshot.toml`) and the environment
    pub fn load() -> anyhow::Result<Self> {
        let file = std::env::var("SNAPSHOT_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        Self::load_from(&file)
    }

    pub fn load_from(file: &str) -> anyhow::Result<Self> {
        let settings: Settings = Config::builder()
            .add_source(File::with_name(file).required(false))
            .add_source(Environment::with_prefix("SNAPSHOT"))
            .set_override_option("cmc_api_key", std::env::var("CMC_API_KEY").ok())?
            .set_override_option("fred_api_key", std::env::var("FRED_API_KEY").ok())?
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("Invalid configuration")?;

        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> anyhow::Result<()> {
        for (name, base) in [
            ("cmc_base_url", &self.cmc_base_url),
            ("coingecko_base_url", &self.coingecko_base_url),
            ("yahoo_base_url", &self.yahoo_base_url),
            ("binance_base_url", &self.binance_base_url),
            ("fred_base_url", &self.fred_base_url),
        ] {
            url::Url::parse(base).with_context(|| format!("Invalid {}: {}", name, base))?;
        }

        if self.trailing_window.trim().is_empty() {
            anyhow::bail!("trailing_window must not be empty");
        }

        self.log_level
            .parse::<tracing::Level>()
            .map_err(|_| anyhow::anyhow!("Invalid log_level: {}", self.log_level))?;

        if let Some(meetings) = &self.meetings {
            if meetings.windows(2).any(|w| w[0].date >= w[1].date) {
                anyhow::bail!("meetings must be in strictly chronological order");
            }
        }

        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn listing_delay(&self) -> Duration {
        Duration::from_millis(self.listing_delay_ms)
    }

    /// Level for the fmt subscriber; `log_level` is checked on load
    pub fn max_log_level(&self) -> tracing::Level {
        self.log_level.parse().unwrap_or(tracing::Level::INFO)
    }

    /// Point every feed at one base URL (used against local mock servers)
    pub fn with_base_url(mut self, base: &str) -> Self {
        let base = base.trim_end_matches('/');
        self.cmc_base_url = base.to_string();
        self.coingecko_base_url = base.to_string();
        self.yahoo_base_url = base.to_string();
        self.binance_base_url = base.to_string();
        self.fred_base_url = base.to_string();
        self
    }
}
