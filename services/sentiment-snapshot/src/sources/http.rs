use crate::types::*;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::debug;

/// Browser-like agent; the Yahoo chart API rejects blank agents
const USER_AGENT: &str = "Mozilla/5.0 (compatible; sentiment-snapshot/0.1)";

/// Shared HTTP client for every feed
///
/// The request timeout is the only bound on an acquisition; there is no retry.
pub fn build_client(timeout: Duration) -> reqwest::Result<Client> {
    Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
}

/// Send `request` and decode the body as JSON
///
/// Transport errors, non-success statuses and undecodable bodies become `FeedError`s
/// tagged with `feed`.
pub async fn get_json(feed: &'static str, request: RequestBuilder) -> Result<Value> {
    let started = Instant::now();

    let response = request.send().await.map_err(|e| FeedError::Transport {
        feed,
        message: e.to_string(),
    })?;

    let status = response.status();
    debug!("{} responded {} in {}ms", feed, status, started.elapsed().as_millis());

    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());
        return Err(FeedError::RateLimited { feed, retry_after });
    }

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(FeedError::Status {
            feed,
            status: status.as_u16(),
            body: truncate(&body, 200),
        });
    }

    response
        .json::<Value>()
        .await
        .map_err(|e| FeedError::InvalidResponse {
            feed,
            message: e.to_string(),
        })
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdef", 3), "abc...");
        assert_eq!(truncate("ééééé", 2), "éé...");
    }
}
