use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::TARGET_WEB_REQUEST;

/// The index board shown on the markets panel.
pub const INDICES: [(&str, &str); 8] = [
    ("S&P 500", "^GSPC"),
    ("Dow Jones", "^DJI"),
    ("Nasdaq", "^IXIC"),
    ("Nikkei 225", "^N225"),
    ("FTSE 100", "^FTSE"),
    ("DAX", "^GDAXI"),
    ("CAC 40", "^FCHI"),
    ("IBEX 35", "^IBEX"),
];

const CHART_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";

/// Last close for one index, or the "Error" sentinel when that symbol's
/// lookup failed. A failed symbol never aborts the rest of the batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum QuotePrice {
    Close(f64),
    Unavailable(&'static str),
}

impl QuotePrice {
    pub const ERROR: QuotePrice = QuotePrice::Unavailable("Error");
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketQuote {
    pub index: String,
    pub price: QuotePrice,
}

/// Extracts the last non-null close from a Yahoo chart response, rounded to
/// two decimals.
pub fn parse_last_close(body: &Value) -> Option<f64> {
    let closes = body["chart"]["result"][0]["indicators"]["quote"][0]["close"].as_array()?;
    let last = closes.iter().rev().find_map(Value::as_f64)?;
    Some((last * 100.0).round() / 100.0)
}

async fn fetch_close(http: &Client, symbol: &str) -> Option<f64> {
    let url = format!("{}/{}", CHART_URL, symbol);
    let result = http
        .get(&url)
        .query(&[("range", "1d"), ("interval", "1d")])
        .send()
        .await;

    match result {
        Ok(response) if response.status().is_success() => match response.json::<Value>().await {
            Ok(body) => parse_last_close(&body),
            Err(e) => {
                warn!(target: TARGET_WEB_REQUEST, "Failed to decode chart response for {}: {}", symbol, e);
                None
            }
        },
        Ok(response) => {
            warn!(target: TARGET_WEB_REQUEST, "Chart request for {} returned status {}", symbol, response.status());
            None
        }
        Err(e) => {
            warn!(target: TARGET_WEB_REQUEST, "Chart request for {} failed: {}", symbol, e);
            None
        }
    }
}

/// Maps per-index lookup outcomes onto quotes: a missing close becomes the
/// sentinel for that index alone, it never drops or taints the others.
pub fn collect_quotes(closes: Vec<(&str, Option<f64>)>) -> Vec<MarketQuote> {
    closes
        .into_iter()
        .map(|(name, close)| MarketQuote {
            index: name.to_string(),
            price: match close {
                Some(close) => QuotePrice::Close(close),
                None => QuotePrice::ERROR,
            },
        })
        .collect()
}

/// One chart query per index; the batch always completes, with failed
/// symbols reporting the sentinel.
pub async fn fetch_market_indices(http: &Client) -> Vec<MarketQuote> {
    let mut closes = Vec::with_capacity(INDICES.len());
    for (name, symbol) in INDICES {
        closes.push((name, fetch_close(http, symbol).await));
    }
    collect_quotes(closes)
}
