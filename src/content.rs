use serde::{Deserialize, Serialize};
use std::fmt;

/// Target platform for a piece of generated content. Anything outside the
/// four known platforms is carried through verbatim and rendered with the
/// generic prompt template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Platform {
    LinkedIn,
    Twitter,
    Blog,
    Instagram,
    Other(String),
}

impl From<String> for Platform {
    fn from(value: String) -> Self {
        match value.as_str() {
            "LinkedIn" => Platform::LinkedIn,
            "Twitter" => Platform::Twitter,
            "Blog" => Platform::Blog,
            "Instagram" => Platform::Instagram,
            _ => Platform::Other(value),
        }
    }
}

impl From<Platform> for String {
    fn from(platform: Platform) -> Self {
        platform.to_string()
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::LinkedIn => write!(f, "LinkedIn"),
            Platform::Twitter => write!(f, "Twitter"),
            Platform::Blog => write!(f, "Blog"),
            Platform::Instagram => write!(f, "Instagram"),
            Platform::Other(name) => write!(f, "{}", name),
        }
    }
}

/// Register of the generated text. Wire values match the form options the
/// service has always exposed, which are Spanish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tone {
    Formal,
    Informal,
    #[serde(rename = "Técnico")]
    Technical,
    #[serde(rename = "Inspirador")]
    Inspirational,
}

impl Tone {
    /// Lowercase spelling used inside prompts ("Escribe un {tone} post ...").
    pub fn prompt_word(&self) -> &'static str {
        match self {
            Tone::Formal => "formal",
            Tone::Informal => "informal",
            Tone::Technical => "técnico",
            Tone::Inspirational => "inspirador",
        }
    }
}

/// Output language, spelled the way the prompt expects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "Español")]
    Spanish,
    #[serde(rename = "Inglés")]
    English,
    #[serde(rename = "Francés")]
    French,
    #[serde(rename = "Alemán")]
    German,
    #[serde(rename = "Italiano")]
    Italian,
}

impl Language {
    pub fn prompt_name(&self) -> &'static str {
        match self {
            Language::Spanish => "Español",
            Language::English => "Inglés",
            Language::French => "Francés",
            Language::German => "Alemán",
            Language::Italian => "Italiano",
        }
    }
}

/// One content submission. Built fresh per request, never mutated, discarded
/// after a single generation call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentRequest {
    pub topic: String,
    pub audience: String,
    pub platform: Platform,
    pub tone: Tone,
    pub language: Language,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub personalization_info: Option<String>,
}

/// The generation result. `text` is exactly what the remote model returned;
/// `short` flags suspiciously small output without altering it. The request
/// that produced the text rides along so the rendered payload is
/// self-describing.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedContent {
    pub text: String,
    pub model: String,
    pub short: bool,
    pub source_request: ContentRequest,
}
