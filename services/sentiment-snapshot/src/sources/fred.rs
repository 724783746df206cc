use crate::normalizers::FRED;
use crate::sources::http::get_json;
use crate::types::*;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

/// Federal funds target range, upper limit
pub const TARGET_UPPER_SERIES: &str = "DFEDTARU";

/// St. Louis Fed (FRED) series client
pub struct FredClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl FredClient {
    pub fn new(client: Client, base_url: &str, api_key: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    /// Most recent observation of `series_id`
    pub async fn latest_observation(&self, series_id: &str) -> Result<Value> {
        let url = format!("{}/fred/series/observations", self.base_url);
        debug!("GET {} ({})", url, series_id);

        let request = self.client.get(&url).query(&[
            ("series_id", series_id),
            ("api_key", self.api_key.as_str()),
            ("file_type", "json"),
            ("limit", "1"),
            ("sort_order", "desc"),
        ]);

        get_json(FRED, request).await
    }
}
