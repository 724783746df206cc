use crate::normalizers::COINGECKO;
use crate::sources::http::get_json;
use crate::types::*;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Size of the ranked listing requested from `coins/markets`
pub const LISTING_SIZE: u32 = 100;

/// CoinGecko public API client
///
/// Free tier: ~10-30 calls/minute without a key, so the listing request is
/// preceded by a fixed pause.
pub struct CoinGeckoClient {
    client: Client,
    base_url: String,
    listing_delay: Duration,
}

impl CoinGeckoClient {
    pub fn new(client: Client, base_url: &str, listing_delay: Duration) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            listing_delay,
        }
    }

    /// Top coins by market cap with ATH distance and the trailing-window change
    pub async fn markets(&self, trailing_window: &str) -> Result<Value> {
        if !self.listing_delay.is_zero() {
            tokio::time::sleep(self.listing_delay).await;
        }

        let url = format!("{}/coins/markets", self.base_url);
        debug!("GET {} (window {})", url, trailing_window);

        let per_page = LISTING_SIZE.to_string();
        let request = self.client.get(&url).query(&[
            ("vs_currency", "usd"),
            ("order", "market_cap_desc"),
            ("per_page", per_page.as_str()),
            ("page", "1"),
            ("sparkline", "false"),
            ("price_change_percentage", trailing_window),
        ]);

        get_json(COINGECKO, request).await
    }

    /// `/global` (total market cap and its 24h change)
    pub async fn global(&self) -> Result<Value> {
        let url = format!("{}/global", self.base_url);
        debug!("GET {}", url);
        get_json(COINGECKO, self.client.get(&url)).await
    }
}
