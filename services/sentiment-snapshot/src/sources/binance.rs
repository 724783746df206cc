use crate::normalizers::BINANCE;
use crate::sources::http::get_json;
use crate::types::*;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

/// Binance spot REST client (public endpoints only)
pub struct BinanceClient {
    client: Client,
    base_url: String,
}

impl BinanceClient {
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// `/api/v3/ticker/24hr` for one symbol (e.g. `BTCUSDT`)
    pub async fn ticker_24h(&self, symbol: &str) -> Result<Value> {
        let url = format!("{}/api/v3/ticker/24hr", self.base_url);
        debug!("GET {} ({})", url, symbol);

        let request = self
            .client
            .get(&url)
            .query(&[("symbol", symbol.to_uppercase())]);

        get_json(BINANCE, request).await
    }
}
