use crate::normalizers::YAHOO;
use crate::sources::http::get_json;
use crate::types::*;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

/// Yahoo Finance v8 chart API (indices, futures, treasury yields)
///
/// No official API; only `chart.result[0].meta` is read.
pub struct YahooChartClient {
    client: Client,
    base_url: String,
}

impl YahooChartClient {
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Chart URL for a ticker; `^VIX` and `GC=F` need percent-encoding
    pub fn chart_url(&self, symbol: &str) -> String {
        let encoded: String = url::form_urlencoded::byte_serialize(symbol.as_bytes()).collect();
        format!("{}/{}", self.base_url, encoded)
    }

    /// Two daily bars are enough for `regularMarketPrice` and `previousClose`
    pub async fn chart(&self, symbol: &str) -> Result<Value> {
        let url = self.chart_url(symbol);
        debug!("GET {}", url);

        let request = self
            .client
            .get(&url)
            .query(&[("interval", "1d"), ("range", "2d")]);

        get_json(YAHOO, request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chart_url_encoding() {
        let client = YahooChartClient::new(Client::new(), "https://query1.finance.yahoo.com/v8/finance/chart/");
        assert_eq!(
            client.chart_url("^VIX"),
            "https://query1.finance.yahoo.com/v8/finance/chart/%5EVIX"
        );
        assert_eq!(
            client.chart_url("GC=F"),
            "https://query1.finance.yahoo.com/v8/finance/chart/GC%3DF"
        );
        assert_eq!(
            client.chart_url("DX-Y.NYB"),
            "https://query1.finance.yahoo.com/v8/finance/chart/DX-Y.NYB"
        );
    }
}
