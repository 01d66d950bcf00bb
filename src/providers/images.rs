use reqwest::Client;
use serde_json::Value;
use tracing::warn;

use crate::TARGET_WEB_REQUEST;

const PIXABAY_URL: &str = "https://pixabay.com/api/";
const RESULT_LIMIT: usize = 3;

/// Top-3 `webformatURL`s from a Pixabay hit list.
pub fn parse_image_urls(body: &Value) -> Vec<String> {
    body["hits"]
        .as_array()
        .map(|hits| {
            hits.iter()
                .filter_map(|hit| hit["webformatURL"].as_str())
                .take(RESULT_LIMIT)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Photo search against Pixabay. Empty list on any failure.
pub async fn fetch_images(http: &Client, api_key: &str, query: &str) -> Vec<String> {
    let result = http
        .get(PIXABAY_URL)
        .query(&[
            ("key", api_key),
            ("q", query),
            ("image_type", "photo"),
            ("per_page", "3"),
        ])
        .send()
        .await;

    match result {
        Ok(response) if response.status().is_success() => match response.json::<Value>().await {
            Ok(body) => {
                let urls = parse_image_urls(&body);
                if urls.is_empty() {
                    warn!(target: TARGET_WEB_REQUEST, "Pixabay returned no hits for {:?}", query);
                }
                urls
            }
            Err(e) => {
                warn!(target: TARGET_WEB_REQUEST, "Failed to decode Pixabay response: {}", e);
                Vec::new()
            }
        },
        Ok(response) => {
            warn!(target: TARGET_WEB_REQUEST, "Pixabay returned status {}", response.status());
            Vec::new()
        }
        Err(e) => {
            warn!(target: TARGET_WEB_REQUEST, "Request to Pixabay failed: {}", e);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_image_urls_takes_top_three() {
        let body = json!({
            "hits": [
                { "webformatURL": "https://img/1.jpg" },
                { "webformatURL": "https://img/2.jpg" },
                { "id": 3 },
                { "webformatURL": "https://img/4.jpg" },
                { "webformatURL": "https://img/5.jpg" }
            ]
        });
        assert_eq!(
            parse_image_urls(&body),
            vec!["https://img/1.jpg", "https://img/2.jpg", "https://img/4.jpg"]
        );
    }

    #[test]
    fn test_parse_image_urls_empty_or_malformed() {
        assert!(parse_image_urls(&json!({ "hits": [] })).is_empty());
        assert!(parse_image_urls(&json!({ "totalHits": 0 })).is_empty());
    }
}
