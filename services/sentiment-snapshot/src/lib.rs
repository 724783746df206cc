//! Sentiment Snapshot
//!
//! Samples several independent market feeds, derives the altseason index and
//! the rate-decision heuristic, and assembles one `Snapshot` per run. A failing
//! feed only blanks its own fields.

pub mod types;
pub mod config;
pub mod calendar;
pub mod sources {
    pub mod http;
    pub mod coinmarketcap;
    pub mod coingecko;
    pub mod yahoo;
    pub mod binance;
    pub mod fred;
}
pub mod normalizers;
pub mod aggregators;
pub mod persistence;

pub use types::*;
pub use crate::config::Settings;
pub use sources::binance::BinanceClient;
pub use sources::coingecko::CoinGeckoClient;
pub use sources::coinmarketcap::CoinMarketCapClient;
pub use sources::fred::FredClient;
pub use sources::yahoo::YahooChartClient;

use aggregators::{AltseasonChain, AltseasonInputs, RateInputs};
use calendar::MeetingEntry;
use chrono::{DateTime, Utc};
use tracing::{info, warn};

/// Map a field-local failure to absence, logging why
fn absent_on_error<T>(what: &str, result: Result<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("⚠ {} unavailable: {}", what, e);
            None
        }
    }
}

/// Builds one snapshot from every configured feed
pub struct SnapshotAssembler {
    coinmarketcap: CoinMarketCapClient,
    coingecko: CoinGeckoClient,
    yahoo: YahooChartClient,
    binance: BinanceClient,
    fred: FredClient,
    altseason: AltseasonChain,
    meetings: Vec<MeetingEntry>,
    trailing_window: String,
    fallback_rate_upper: f64,
    last_decision: String,
}

impl SnapshotAssembler {
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let client = sources::http::build_client(settings.request_timeout())?;

        if settings.cmc_api_key.is_none() {
            warn!("CMC_API_KEY not set, CoinMarketCap requests will be unauthenticated");
        }

        Ok(Self {
            coinmarketcap: CoinMarketCapClient::new(
                client.clone(),
                &settings.cmc_base_url,
                settings.cmc_api_key.clone(),
            ),
            coingecko: CoinGeckoClient::new(
                client.clone(),
                &settings.coingecko_base_url,
                settings.listing_delay(),
            ),
            yahoo: YahooChartClient::new(client.clone(), &settings.yahoo_base_url),
            binance: BinanceClient::new(client.clone(), &settings.binance_base_url),
            fred: FredClient::new(client, &settings.fred_base_url, settings.fred_api_key.clone()),
            altseason: AltseasonChain::default(),
            meetings: settings
                .meetings
                .clone()
                .unwrap_or_else(calendar::default_meetings),
            trailing_window: settings.trailing_window.clone(),
            fallback_rate_upper: settings.fallback_rate_upper,
            last_decision: settings.last_decision_label.clone(),
        })
    }

    /// Assemble a snapshot stamped with the current time
    pub async fn assemble(&self) -> Snapshot {
        self.assemble_at(Utc::now()).await
    }

    /// Assemble a snapshot as of `now`
    ///
    /// Never fails: every acquisition error leaves its own fields absent.
    pub async fn assemble_at(&self, now: DateTime<Utc>) -> Snapshot {
        let mut snapshot = Snapshot::new(now);

        // 1. BTC dominance
        snapshot.dominance = absent_on_error("BTC dominance", self.fetch_dominance().await);
        if let Some(d) = snapshot.dominance {
            info!("✓ BTC dominance: {}%", d);
        }

        // 2. Fear & greed
        if let Some((score, label)) = absent_on_error("Fear & greed", self.fetch_sentiment().await) {
            info!("✓ Fear & greed: {} ({})", score, label.as_deref().unwrap_or("unclassified"));
            snapshot.sentiment_score = Some(score);
            snapshot.sentiment_label = label;
        }

        // 3. Altseason index
        info!("Calculating altseason index...");
        let assets = absent_on_error("Market listing", self.fetch_ranked_assets().await);
        let inputs = AltseasonInputs {
            assets: assets.as_deref(),
            dominance: snapshot.dominance,
        };
        match self.altseason.evaluate(&inputs) {
            Some(reading) => {
                info!("✓ Altseason index: {} via {}", reading.index, reading.method.as_str());
                snapshot.altseason_index = Some(reading.index);
                snapshot.altseason_method = Some(reading.method);
            }
            None => warn!("⚠ Altseason index unavailable: no strategy had its inputs"),
        }

        // 4. Rate decision
        info!("Fetching policy rate...");
        let series_upper = absent_on_error("Policy rate series", self.fetch_policy_rate_upper().await);
        let rate_inputs = RateInputs {
            sentiment: snapshot.sentiment_score,
            series_upper,
            fallback_upper: self.fallback_rate_upper,
            meetings: &self.meetings,
            last_decision: &self.last_decision,
        };
        snapshot.rate_decision = aggregators::rate_decision(&rate_inputs, now);
        match &snapshot.rate_decision {
            Some(decision) => info!(
                "✓ Rate decision: {}, next {} ({} days)",
                decision.current_rate.range, decision.next_meeting.label, decision.next_meeting.days_until
            ),
            None => warn!("⚠ Rate decision unavailable: meeting calendar is empty"),
        }

        // 5. Market indicators
        info!("Fetching market indicators...");
        self.collect_market_indicators(&mut snapshot.market_indicators).await;

        snapshot
    }

    async fn fetch_dominance(&self) -> Result<f64> {
        let payload = self.coinmarketcap.global_metrics().await?;
        normalizers::dominance(&payload)
    }

    async fn fetch_sentiment(&self) -> Result<(u8, Option<String>)> {
        let payload = self.coinmarketcap.fear_and_greed().await?;
        normalizers::sentiment(&payload)
    }

    async fn fetch_ranked_assets(&self) -> Result<Vec<RankedAsset>> {
        let payload = self.coingecko.markets(&self.trailing_window).await?;
        normalizers::ranked_assets(&payload, &self.trailing_window)
    }

    async fn fetch_policy_rate_upper(&self) -> Result<f64> {
        let payload = self
            .fred
            .latest_observation(sources::fred::TARGET_UPPER_SERIES)
            .await?;
        normalizers::policy_rate_upper(&payload)
    }

    async fn fetch_quote(&self, kind: QuoteIndicator) -> Result<MarketIndicator> {
        let payload = self.yahoo.chart(kind.symbol()).await?;
        normalizers::chart_quote(&payload, kind)
    }

    async fn fetch_spot(&self, symbol: &str) -> Result<MarketIndicator> {
        let payload = self.binance.ticker_24h(symbol).await?;
        normalizers::spot_ticker(&payload)
    }

    async fn fetch_total_market_cap(&self) -> Result<MarketIndicator> {
        let payload = self.coingecko.global().await?;
        normalizers::total_market_cap(&payload)
    }

    async fn collect_market_indicators(&self, indicators: &mut MarketIndicators) {
        // Quotes are independent, fetch them concurrently
        let quotes = futures::future::join_all(
            QuoteIndicator::ALL
                .iter()
                .map(|&kind| async move { (kind, self.fetch_quote(kind).await) }),
        )
        .await;

        for (kind, result) in quotes {
            match absent_on_error(kind.name(), result) {
                Some(reading) => {
                    info!("  {}: {}", kind.name(), reading.value);
                    indicators.set_quote(kind, reading);
                }
                None => info!("  {}: N/A", kind.name()),
            }
        }

        let (btc, eth) = tokio::join!(self.fetch_spot("BTCUSDT"), self.fetch_spot("ETHUSDT"));
        indicators.btc_price = absent_on_error("BTC spot", btc);
        indicators.eth_price = absent_on_error("ETH spot", eth);
        if let Some(btc) = &indicators.btc_price {
            info!("  BTC: {}", btc.value);
        }

        indicators.total_market_cap =
            absent_on_error("Total market cap", self.fetch_total_market_cap().await);
        if let Some(mcap) = &indicators.total_market_cap {
            info!("  Total market cap: {}", mcap.formatted.as_deref().unwrap_or_default());
        }

        info!("✓ Market indicators loaded");
    }
}
