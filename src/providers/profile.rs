use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::TARGET_WEB_REQUEST;

const PROFILE_URL: &str = "https://financialmodelingprep.com/api/v3/profile";

fn not_available() -> String {
    "not available".to_string()
}

/// Company profile as returned by Financial Modeling Prep. Missing string
/// fields fall back to "not available" rather than failing the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyProfile {
    #[serde(rename = "companyName", default = "not_available")]
    pub company_name: String,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(rename = "mktCap", default)]
    pub market_cap: Option<f64>,
    #[serde(default)]
    pub beta: Option<f64>,
    #[serde(default = "not_available")]
    pub description: String,
    #[serde(default = "not_available")]
    pub sector: String,
    #[serde(default = "not_available")]
    pub industry: String,
    #[serde(default = "not_available")]
    pub city: String,
    #[serde(default = "not_available")]
    pub country: String,
    #[serde(default = "not_available")]
    pub website: String,
    #[serde(default)]
    pub image: String,
}

/// Looks up one ticker. `None` on non-2xx, transport failure, or an empty
/// result array; never a partial object.
pub async fn fetch_company_profile(
    http: &Client,
    api_key: &str,
    symbol: &str,
) -> Option<CompanyProfile> {
    let url = format!("{}/{}", PROFILE_URL, symbol);
    let result = http.get(&url).query(&[("apikey", api_key)]).send().await;

    match result {
        Ok(response) if response.status().is_success() => {
            match response.json::<Vec<CompanyProfile>>().await {
                Ok(profiles) => {
                    if profiles.is_empty() {
                        warn!(target: TARGET_WEB_REQUEST, "No profile found for symbol {}", symbol);
                    }
                    profiles.into_iter().next()
                }
                Err(e) => {
                    warn!(target: TARGET_WEB_REQUEST, "Failed to decode profile response for {}: {}", symbol, e);
                    None
                }
            }
        }
        Ok(response) => {
            warn!(target: TARGET_WEB_REQUEST, "Profile request for {} returned status {}", symbol, response.status());
            None
        }
        Err(e) => {
            warn!(target: TARGET_WEB_REQUEST, "Profile request for {} failed: {}", symbol, e);
            None
        }
    }
}
