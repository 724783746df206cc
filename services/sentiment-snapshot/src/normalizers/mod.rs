// Normalization logic: pull one typed value out of each feed payload
use crate::types::*;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::Value;

pub const COINMARKETCAP: &str = "coinmarketcap";
pub const COINGECKO: &str = "coingecko";
pub const YAHOO: &str = "yahoo";
pub const BINANCE: &str = "binance";
pub const FRED: &str = "fred";

/// Round half away from zero to `dp` decimals; `None` for NaN / infinite input
pub fn round_to(value: f64, dp: u32) -> Option<f64> {
    Decimal::from_f64(value)?
        .round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
}

/// Percent change from `previous` to `current`, 2dp; absent without a usable reference
pub fn percent_change(current: f64, previous: Option<f64>) -> Option<f64> {
    let previous = previous.filter(|p| *p != 0.0)?;
    round_to((current - previous) / previous * 100.0, 2)
}

/// Numbers arrive either as JSON numbers or as decimal strings depending on the feed
fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    }
}

fn number_at(payload: &Value, pointer: &str) -> Option<f64> {
    payload.pointer(pointer).and_then(as_number)
}

fn rounded(feed: &'static str, value: f64, dp: u32) -> Result<f64> {
    round_to(value, dp).ok_or_else(|| FeedError::InvalidResponse {
        feed,
        message: format!("value {} is not representable", value),
    })
}

/// BTC dominance percentage from CoinMarketCap global metrics
pub fn dominance(payload: &Value) -> Result<f64> {
    let raw = number_at(payload, "/data/btc_dominance").ok_or(FeedError::MissingField {
        feed: COINMARKETCAP,
        field: "data.btc_dominance",
    })?;
    rounded(COINMARKETCAP, raw, 2)
}

/// Fear & greed score and its classification
pub fn sentiment(payload: &Value) -> Result<(u8, Option<String>)> {
    let raw = number_at(payload, "/data/value").ok_or(FeedError::MissingField {
        feed: COINMARKETCAP,
        field: "data.value",
    })?;

    if !(0.0..=100.0).contains(&raw) {
        return Err(FeedError::InvalidResponse {
            feed: COINMARKETCAP,
            message: format!("sentiment score {} outside 0-100", raw),
        });
    }

    let label = payload
        .pointer("/data/value_classification")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    Ok((raw.trunc() as u8, label))
}

/// CoinGecko `coins/markets` listing, rank order preserved
///
/// Entries without an `id` are skipped; missing change figures stay `None`.
pub fn ranked_assets(payload: &Value, trailing_window: &str) -> Result<Vec<RankedAsset>> {
    let coins = payload.as_array().ok_or_else(|| FeedError::InvalidResponse {
        feed: COINGECKO,
        message: "expected an array of coins".to_string(),
    })?;

    let trailing_key = format!("price_change_percentage_{}_in_currency", trailing_window);

    Ok(coins
        .iter()
        .filter_map(|coin| {
            let id = coin.get("id")?.as_str()?;
            Some(RankedAsset {
                id: id.to_string(),
                trailing_change: coin.get(&trailing_key).and_then(as_number),
                ath_change: coin.get("ath_change_percentage").and_then(as_number),
            })
        })
        .collect())
}

/// Latest price and change from a Yahoo chart response
pub fn chart_quote(payload: &Value, kind: QuoteIndicator) -> Result<MarketIndicator> {
    let meta = payload
        .pointer("/chart/result/0/meta")
        .ok_or(FeedError::MissingField {
            feed: YAHOO,
            field: "chart.result[0].meta",
        })?;

    let price = meta
        .get("regularMarketPrice")
        .and_then(as_number)
        .ok_or(FeedError::MissingField {
            feed: YAHOO,
            field: "regularMarketPrice",
        })?;

    let previous = meta
        .get("previousClose")
        .and_then(as_number)
        .or_else(|| meta.get("chartPreviousClose").and_then(as_number));

    let mut reading = MarketIndicator::new(
        rounded(YAHOO, price, kind.value_decimals())?,
        percent_change(price, previous),
    );
    if kind == QuoteIndicator::Vix {
        reading.status = Some(VolatilityRegime::from_level(price));
    }
    Ok(reading)
}

/// Binance 24h ticker (`lastPrice`, `priceChangePercent` are decimal strings)
pub fn spot_ticker(payload: &Value) -> Result<MarketIndicator> {
    let price = number_at(payload, "/lastPrice").ok_or(FeedError::MissingField {
        feed: BINANCE,
        field: "lastPrice",
    })?;

    let change = number_at(payload, "/priceChangePercent").and_then(|c| round_to(c, 2));

    Ok(MarketIndicator::new(rounded(BINANCE, price, 2)?, change))
}

/// Total crypto market cap in USD from CoinGecko `/global`
pub fn total_market_cap(payload: &Value) -> Result<MarketIndicator> {
    let total = number_at(payload, "/data/total_market_cap/usd").ok_or(FeedError::MissingField {
        feed: COINGECKO,
        field: "data.total_market_cap.usd",
    })?;

    let change = number_at(payload, "/data/market_cap_change_percentage_24h_usd")
        .and_then(|c| round_to(c, 2));

    let mut reading = MarketIndicator::new(rounded(COINGECKO, total, 2)?, change);
    reading.formatted = Some(format_usd_compact(total));
    Ok(reading)
}

/// `$2.45T` / `$812.30B`
pub fn format_usd_compact(value: f64) -> String {
    if value >= 1e12 {
        format!("${:.2}T", value / 1e12)
    } else {
        format!("${:.2}B", value / 1e9)
    }
}

/// Upper bound of the fed funds target range from the latest FRED observation
///
/// FRED reports missing observations as `"."`, which is treated as absent.
pub fn policy_rate_upper(payload: &Value) -> Result<f64> {
    number_at(payload, "/observations/0/value").ok_or(FeedError::MissingField {
        feed: FRED,
        field: "observations[0].value",
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(57.4567, 2), Some(57.46));
        assert_eq!(round_to(4.2345, 3), Some(4.235));
        assert_eq!(round_to(2.5, 0), Some(3.0));
        assert_eq!(round_to(f64::NAN, 2), None);
    }

    #[test]
    fn test_percent_change() {
        assert_eq!(percent_change(110.0, Some(100.0)), Some(10.0));
        assert_eq!(percent_change(99.0, Some(100.0)), Some(-1.0));
        assert_eq!(percent_change(99.0, None), None);
        assert_eq!(percent_change(99.0, Some(0.0)), None);
    }

    #[test]
    fn test_dominance() {
        let payload = json!({ "data": { "btc_dominance": 57.123456 } });
        assert_eq!(dominance(&payload).unwrap(), 57.12);

        let missing = json!({ "data": {} });
        assert!(matches!(
            dominance(&missing),
            Err(FeedError::MissingField { field: "data.btc_dominance", .. })
        ));
    }

    #[test]
    fn test_sentiment() {
        let payload = json!({ "data": { "value": 38, "value_classification": "Fear" } });
        assert_eq!(sentiment(&payload).unwrap(), (38, Some("Fear".to_string())));

        // zero is a real reading, not a missing one
        let zero = json!({ "data": { "value": 0 } });
        assert_eq!(sentiment(&zero).unwrap(), (0, None));

        let out_of_range = json!({ "data": { "value": 140 } });
        assert!(sentiment(&out_of_range).is_err());
    }

    #[test]
    fn test_ranked_assets() {
        let payload = json!([
            { "id": "bitcoin", "price_change_percentage_30d_in_currency": 4.2, "ath_change_percentage": -12.0 },
            { "id": "ethereum", "price_change_percentage_30d_in_currency": null, "ath_change_percentage": -40.5 },
            { "symbol": "no-id" },
        ]);

        let assets = ranked_assets(&payload, "30d").unwrap();
        assert_eq!(assets.len(), 2);
        assert_eq!(assets[0].id, "bitcoin");
        assert_eq!(assets[0].trailing_change, Some(4.2));
        assert_eq!(assets[1].trailing_change, None);
        assert_eq!(assets[1].ath_change, Some(-40.5));

        assert!(ranked_assets(&json!({ "status": "error" }), "30d").is_err());
    }

    #[test]
    fn test_chart_quote_vix() {
        let payload = json!({
            "chart": { "result": [ { "meta": { "regularMarketPrice": 19.876, "previousClose": 18.0 } } ] }
        });
        let vix = chart_quote(&payload, QuoteIndicator::Vix).unwrap();
        assert_eq!(vix.value, 19.88);
        assert_eq!(vix.percent_change, Some(10.42));
        assert_eq!(vix.status, Some(VolatilityRegime::Elevated));
    }

    #[test]
    fn test_chart_quote_treasury_precision_and_fallback_close() {
        let payload = json!({
            "chart": { "result": [ { "meta": { "regularMarketPrice": 4.2346, "chartPreviousClose": 4.1 } } ] }
        });
        let tnx = chart_quote(&payload, QuoteIndicator::Treasury10y).unwrap();
        assert_eq!(tnx.value, 4.235);
        // 0.1346 / 4.1 from chartPreviousClose
        assert_eq!(tnx.percent_change, Some(3.28));
        assert_eq!(tnx.status, None);
    }

    #[test]
    fn test_chart_quote_without_reference_has_no_change() {
        let payload = json!({ "chart": { "result": [ { "meta": { "regularMarketPrice": 2650.5 } } ] } });
        let gold = chart_quote(&payload, QuoteIndicator::Gold).unwrap();
        assert_eq!(gold.value, 2650.5);
        assert_eq!(gold.percent_change, None);
    }

    #[test]
    fn test_chart_quote_error_payload() {
        let payload = json!({ "chart": { "result": null, "error": { "code": "Not Found" } } });
        assert!(chart_quote(&payload, QuoteIndicator::Dxy).is_err());
    }

    #[test]
    fn test_spot_ticker() {
        let payload = json!({ "symbol": "BTCUSDT", "lastPrice": "64123.45678", "priceChangePercent": "-1.234" });
        let btc = spot_ticker(&payload).unwrap();
        assert_eq!(btc.value, 64123.46);
        assert_eq!(btc.percent_change, Some(-1.23));
    }

    #[test]
    fn test_total_market_cap() {
        let payload = json!({
            "data": {
                "total_market_cap": { "usd": 2_450_000_000_000.0_f64 },
                "market_cap_change_percentage_24h_usd": 1.456
            }
        });
        let mcap = total_market_cap(&payload).unwrap();
        assert_eq!(mcap.formatted.as_deref(), Some("$2.45T"));
        assert_eq!(mcap.percent_change, Some(1.46));

        assert_eq!(format_usd_compact(812_300_000_000.0), "$812.30B");
    }

    #[test]
    fn test_policy_rate_upper() {
        let payload = json!({ "observations": [ { "date": "2026-10-16", "value": "4.00" } ] });
        assert_eq!(policy_rate_upper(&payload).unwrap(), 4.0);

        let missing = json!({ "observations": [ { "date": "2026-10-16", "value": "." } ] });
        assert!(policy_rate_upper(&missing).is_err());
    }
}
