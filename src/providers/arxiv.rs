use reqwest::Client;
use serde::Serialize;
use tracing::warn;

use crate::TARGET_WEB_REQUEST;

const EXPORT_URL: &str = "http://export.arxiv.org/api/query";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArxivArticle {
    pub title: String,
    pub summary: String,
    pub link: String,
}

fn between<'a>(text: &'a str, open: &str, close: &str) -> Option<&'a str> {
    let (_, rest) = text.split_once(open)?;
    let (inner, _) = rest.split_once(close)?;
    Some(inner)
}

/// Extracts articles from the Atom feed by delimiter splitting, the same
/// shallow extraction the service has always done. Entries missing any of
/// the three delimited fields are skipped.
pub fn parse_entries(body: &str, max_results: usize) -> Vec<ArxivArticle> {
    body.split("<entry>")
        .skip(1)
        .filter_map(|entry| {
            Some(ArxivArticle {
                title: between(entry, "<title>", "</title>")?.trim().to_string(),
                summary: between(entry, "<summary>", "</summary>")?.trim().to_string(),
                link: between(entry, "<id>", "</id>")?.trim().to_string(),
            })
        })
        .take(max_results)
        .collect()
}

/// Most recent submissions matching a free-text query. Empty list on any
/// failure.
pub async fn fetch_articles(http: &Client, query: &str, max_results: usize) -> Vec<ArxivArticle> {
    let search_query = format!("all:{}", query);
    let max = max_results.to_string();
    let result = http
        .get(EXPORT_URL)
        .query(&[
            ("search_query", search_query.as_str()),
            ("start", "0"),
            ("max_results", max.as_str()),
            ("sortBy", "submittedDate"),
            ("sortOrder", "descending"),
        ])
        .send()
        .await;

    match result {
        Ok(response) if response.status().is_success() => match response.text().await {
            Ok(body) => parse_entries(&body, max_results),
            Err(e) => {
                warn!(target: TARGET_WEB_REQUEST, "Failed to read arXiv response: {}", e);
                Vec::new()
            }
        },
        Ok(response) => {
            warn!(target: TARGET_WEB_REQUEST, "arXiv returned status {}", response.status());
            Vec::new()
        }
        Err(e) => {
            warn!(target: TARGET_WEB_REQUEST, "Request to arXiv failed: {}", e);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>ArXiv Query Results</title>
  <entry>
    <id>http://arxiv.org/abs/2501.00001v1</id>
    <title>Sparse attention revisited</title>
    <summary>
      We revisit sparse attention.
    </summary>
  </entry>
  <entry>
    <id>http://arxiv.org/abs/2501.00002v1</id>
    <title>Graph pruning at scale</title>
    <summary>Pruning graphs, at scale.</summary>
  </entry>
</feed>"#;

    #[test]
    fn test_parse_entries_extracts_fields() {
        let articles = parse_entries(FEED, 3);
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].title, "Sparse attention revisited");
        assert_eq!(articles[0].summary, "We revisit sparse attention.");
        assert_eq!(articles[0].link, "http://arxiv.org/abs/2501.00001v1");
        assert_eq!(articles[1].title, "Graph pruning at scale");
    }

    #[test]
    fn test_parse_entries_respects_limit() {
        assert_eq!(parse_entries(FEED, 1).len(), 1);
    }

    #[test]
    fn test_parse_entries_skips_malformed() {
        let feed = "<feed><entry><title>Only a title</title></entry>\
                    <entry><id>x</id><title>T</title><summary>S</summary></entry></feed>";
        let articles = parse_entries(feed, 5);
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].title, "T");
    }

    #[test]
    fn test_parse_entries_no_entries() {
        assert!(parse_entries("<feed><title>empty</title></feed>", 3).is_empty());
    }
}
