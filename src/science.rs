use reqwest::Client;
use serde::Serialize;
use tracing::info;

use crate::llm::{self, GenerationClient, GenerationError};
use crate::prompt;
use crate::providers::arxiv::{self, ArxivArticle};
use crate::TARGET_LLM_REQUEST;

/// The divulgation flow always runs on this model, regardless of what the
/// content form selects.
pub const SCIENCE_MODEL: &str = "mistralai/Mistral-7B-Instruct-v0.3";
pub const SCIENCE_MAX_NEW_TOKENS: u32 = 2500;
const ARTICLE_LIMIT: usize = 3;

#[derive(Debug, Clone, Serialize)]
pub struct ScienceContent {
    pub text: String,
    pub short: bool,
    pub articles: Vec<ArxivArticle>,
}

/// Popular-science article grounded in recent research: fetch the latest
/// arXiv submissions for the area, feed their abstracts to the model as
/// context, and return the generated text alongside the consulted articles.
/// `Ok(None)` means no relevant articles were found and nothing was
/// generated.
pub async fn generate_science_content(
    llm_client: &GenerationClient,
    http: &Client,
    area: &str,
    personalization_info: &str,
) -> Result<Option<ScienceContent>, GenerationError> {
    let articles = arxiv::fetch_articles(http, area, ARTICLE_LIMIT).await;
    if articles.is_empty() {
        return Ok(None);
    }

    info!(target: TARGET_LLM_REQUEST, "Generating science content for {:?} from {} articles", area, articles.len());

    let context = prompt::article_context(&articles);
    let science_prompt = prompt::science_prompt(area, &context, personalization_info);
    let text = llm_client
        .generate(SCIENCE_MODEL, &science_prompt, SCIENCE_MAX_NEW_TOKENS)
        .await?;

    let short = llm::is_suspiciously_short(&text);
    Ok(Some(ScienceContent {
        text,
        short,
        articles,
    }))
}
