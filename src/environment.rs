use anyhow::{Context, Result};
use std::env;
use tracing::warn;

const DEFAULT_MAX_NEW_TOKENS: u32 = 2000;

/// Which news provider backs the news panel. Each one hard-codes its own
/// response shape, so the choice is made once at startup rather than per call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NewsProviderKind {
    NewsApi,
    Guardian,
    NyTimes,
}

impl NewsProviderKind {
    fn from_env_value(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "newsapi" => Some(NewsProviderKind::NewsApi),
            "guardian" => Some(NewsProviderKind::Guardian),
            "nyt" | "nytimes" => Some(NewsProviderKind::NyTimes),
            _ => None,
        }
    }
}

/// Runtime configuration, read once from the environment at startup. API keys
/// are opaque secrets; a missing optional key disables that fetcher.
#[derive(Debug, Clone)]
pub struct Config {
    pub hf_token: String,
    pub generation_endpoint: String,
    pub default_model: String,
    pub max_new_tokens: u32,
    pub pixabay_api_key: Option<String>,
    pub news_provider: NewsProviderKind,
    pub news_api_key: Option<String>,
    pub fmp_api_key: Option<String>,
    pub port: u16,
}

/// A misconfigured token budget is loud, not silent: the fallback is logged
/// so a broken deployment doesn't just quietly run with defaults.
fn parse_max_new_tokens(raw: Option<String>) -> u32 {
    match raw {
        None => DEFAULT_MAX_NEW_TOKENS,
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            warn!(
                "MAX_NEW_TOKENS value {:?} is not a number, using {}",
                raw, DEFAULT_MAX_NEW_TOKENS
            );
            DEFAULT_MAX_NEW_TOKENS
        }),
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let hf_token =
            env::var("HF_TOKEN").context("HF_TOKEN environment variable is required")?;

        let generation_endpoint = env::var("GENERATION_ENDPOINT")
            .unwrap_or_else(|_| "https://api-inference.huggingface.co/models".to_string());

        let default_model = env::var("DEFAULT_MODEL")
            .unwrap_or_else(|_| "mistralai/Mistral-7B-Instruct-v0.3".to_string());

        let max_new_tokens = parse_max_new_tokens(env::var("MAX_NEW_TOKENS").ok());

        let news_provider = env::var("NEWS_PROVIDER")
            .ok()
            .as_deref()
            .and_then(NewsProviderKind::from_env_value)
            .unwrap_or(NewsProviderKind::NewsApi);

        // The key for whichever provider is active.
        let news_api_key = match news_provider {
            NewsProviderKind::NewsApi => env::var("NEWSAPI_KEY").ok(),
            NewsProviderKind::Guardian => env::var("GUARDIAN_API_KEY").ok(),
            NewsProviderKind::NyTimes => env::var("NYT_API_KEY").ok(),
        };

        let port: u16 = env::var("PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(8080);

        Ok(Config {
            hf_token,
            generation_endpoint,
            default_model,
            max_new_tokens,
            pixabay_api_key: env::var("PIXABAY_API_KEY").ok(),
            news_provider,
            news_api_key,
            fmp_api_key: env::var("FMP_API_KEY").ok(),
            port,
        })
    }
}
