use crate::normalizers::COINMARKETCAP;
use crate::sources::http::get_json;
use crate::types::*;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

/// CoinMarketCap Pro API client (global metrics and fear & greed)
pub struct CoinMarketCapClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl CoinMarketCapClient {
    pub fn new(client: Client, base_url: &str, api_key: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    /// Build request with optional API key
    fn build_request(&self, endpoint: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!("GET {}", url);

        let mut req = self.client.get(&url).header("Accept", "application/json");
        if let Some(key) = &self.api_key {
            req = req.header("X-CMC_PRO_API_KEY", key);
        }
        req
    }

    /// `/v1/global-metrics/quotes/latest` (carries `btc_dominance`)
    pub async fn global_metrics(&self) -> Result<Value> {
        get_json(COINMARKETCAP, self.build_request("/v1/global-metrics/quotes/latest")).await
    }

    /// `/v3/fear-and-greed/latest`
    pub async fn fear_and_greed(&self) -> Result<Value> {
        get_json(COINMARKETCAP, self.build_request("/v3/fear-and-greed/latest")).await
    }
}
