pub mod app;
pub mod content;
pub mod environment;
pub mod llm;
pub mod logging;
pub mod prompt;
pub mod providers;
pub mod science;

pub const TARGET_WEB_REQUEST: &str = "web_request";
pub const TARGET_LLM_REQUEST: &str = "llm_request";
