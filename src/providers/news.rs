use async_trait::async_trait;
use chrono::Local;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::environment::{Config, NewsProviderKind};
use crate::TARGET_WEB_REQUEST;

const FALLBACK_TITLE: &str = "No Title";
const FALLBACK_DESCRIPTION: &str = "No description available";
const FALLBACK_DATE: &str = "No date available";
const FALLBACK_IMAGE: &str = "https://via.placeholder.com/150";

/// Topic used when the caller supplies no query of their own.
const DEFAULT_QUERY: &str = "finance";

/// One news article, normalized across providers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewsItem {
    pub title: String,
    pub description: String,
    pub url: String,
    pub image_url: String,
    pub date: String,
}

/// A third-party news API. Each implementation hard-codes its provider's
/// response shape; the active one is chosen by configuration at startup.
#[async_trait]
pub trait NewsProvider: Send + Sync {
    fn name(&self) -> &'static str;

    /// Fetches articles for `query` (empty means the default finance topic).
    /// Never fails: any remote problem is logged and yields an empty list.
    async fn fetch(&self, query: &str) -> Vec<NewsItem>;
}

/// Builds the configured provider, or `None` when its API key is missing.
pub fn provider_from_config(config: &Config, http: Client) -> Option<Box<dyn NewsProvider>> {
    let api_key = config.news_api_key.clone()?;
    Some(match config.news_provider {
        NewsProviderKind::NewsApi => Box::new(NewsApi { http, api_key }),
        NewsProviderKind::Guardian => Box::new(Guardian { http, api_key }),
        NewsProviderKind::NyTimes => Box::new(NyTimes { http, api_key }),
    })
}

fn effective_query(query: &str) -> &str {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        DEFAULT_QUERY
    } else {
        trimmed
    }
}

/// Runs one GET and hands the JSON body to the provider's parser, mapping
/// every failure mode to an empty list.
async fn fetch_json(
    request: reqwest::RequestBuilder,
    provider: &'static str,
    parse: fn(&Value) -> Vec<NewsItem>,
) -> Vec<NewsItem> {
    match request.send().await {
        Ok(response) if response.status().is_success() => match response.json::<Value>().await {
            Ok(body) => parse(&body),
            Err(e) => {
                warn!(target: TARGET_WEB_REQUEST, "Failed to decode {} response: {}", provider, e);
                Vec::new()
            }
        },
        Ok(response) => {
            warn!(target: TARGET_WEB_REQUEST, "{} returned status {}", provider, response.status());
            Vec::new()
        }
        Err(e) => {
            warn!(target: TARGET_WEB_REQUEST, "Request to {} failed: {}", provider, e);
            Vec::new()
        }
    }
}

fn str_or<'a>(value: &'a Value, fallback: &'a str) -> &'a str {
    value.as_str().filter(|s| !s.is_empty()).unwrap_or(fallback)
}

/// NewsAPI: flat `articles` array.
pub struct NewsApi {
    http: Client,
    api_key: String,
}

pub fn parse_newsapi(body: &Value) -> Vec<NewsItem> {
    body["articles"]
        .as_array()
        .map(|articles| {
            articles
                .iter()
                .map(|article| NewsItem {
                    title: str_or(&article["title"], FALLBACK_TITLE).to_string(),
                    description: str_or(&article["description"], FALLBACK_DESCRIPTION).to_string(),
                    url: str_or(&article["url"], "#").to_string(),
                    image_url: str_or(&article["urlToImage"], FALLBACK_IMAGE).to_string(),
                    date: str_or(&article["publishedAt"], FALLBACK_DATE).to_string(),
                })
                .collect()
        })
        .unwrap_or_default()
}

#[async_trait]
impl NewsProvider for NewsApi {
    fn name(&self) -> &'static str {
        "NewsAPI"
    }

    async fn fetch(&self, query: &str) -> Vec<NewsItem> {
        let request = self
            .http
            .get("https://newsapi.org/v2/everything")
            .query(&[
                ("q", effective_query(query)),
                ("apiKey", self.api_key.as_str()),
            ]);
        fetch_json(request, "NewsAPI", parse_newsapi).await
    }
}

/// The Guardian: articles nested under `response.results`, requested fields
/// under each result's `fields`.
pub struct Guardian {
    http: Client,
    api_key: String,
}

pub fn parse_guardian(body: &Value) -> Vec<NewsItem> {
    body["response"]["results"]
        .as_array()
        .map(|results| {
            results
                .iter()
                .map(|article| NewsItem {
                    title: str_or(&article["fields"]["headline"], FALLBACK_TITLE).to_string(),
                    description: str_or(&article["fields"]["trailText"], FALLBACK_DESCRIPTION)
                        .to_string(),
                    url: str_or(&article["webUrl"], "#").to_string(),
                    image_url: str_or(&article["fields"]["thumbnail"], FALLBACK_IMAGE).to_string(),
                    date: str_or(&article["webPublicationDate"], FALLBACK_DATE).to_string(),
                })
                .collect()
        })
        .unwrap_or_default()
}

#[async_trait]
impl NewsProvider for Guardian {
    fn name(&self) -> &'static str {
        "The Guardian"
    }

    async fn fetch(&self, query: &str) -> Vec<NewsItem> {
        let request = self.http.get("https://content.guardianapis.com/search").query(&[
            ("q", effective_query(query)),
            ("api-key", self.api_key.as_str()),
            ("page-size", "10"),
            ("format", "json"),
            ("show-fields", "headline,trailText,thumbnail"),
        ]);
        fetch_json(request, "The Guardian", parse_guardian).await
    }
}

/// New York Times article search: articles under `response.docs`, image paths
/// relative to the NYT static host.
pub struct NyTimes {
    http: Client,
    api_key: String,
}

pub fn parse_nyt(body: &Value) -> Vec<NewsItem> {
    body["response"]["docs"]
        .as_array()
        .map(|docs| {
            docs.iter()
                .map(|article| {
                    let image_url = article["multimedia"][0]["url"]
                        .as_str()
                        .filter(|path| !path.is_empty())
                        .map(|path| format!("https://static01.nyt.com/{}", path))
                        .unwrap_or_else(|| FALLBACK_IMAGE.to_string());
                    NewsItem {
                        title: str_or(&article["headline"]["main"], FALLBACK_TITLE).to_string(),
                        description: str_or(&article["snippet"], FALLBACK_DESCRIPTION).to_string(),
                        url: str_or(&article["web_url"], "#").to_string(),
                        image_url,
                        date: str_or(&article["pub_date"], FALLBACK_DATE).to_string(),
                    }
                })
                .collect()
        })
        .unwrap_or_default()
}

#[async_trait]
impl NewsProvider for NyTimes {
    fn name(&self) -> &'static str {
        "The New York Times"
    }

    async fn fetch(&self, query: &str) -> Vec<NewsItem> {
        let query = if query.trim().is_empty() {
            "finance OR economy OR business"
        } else {
            query.trim()
        };
        let begin_date = Local::now().format("%Y%m%d").to_string();
        let request = self
            .http
            .get("https://api.nytimes.com/svc/search/v2/articlesearch.json")
            .query(&[
                ("q", query),
                ("begin_date", begin_date.as_str()),
                ("api-key", self.api_key.as_str()),
            ]);
        fetch_json(request, "The New York Times", parse_nyt).await
    }
}
