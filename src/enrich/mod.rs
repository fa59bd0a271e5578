// * Enrichment Client
// * Sends page text plus a style-specific prompt to the selected provider
// * and parses description + tags out of the free-form reply. Best-effort
// * by contract: a failed call or unusable reply degrades to a locally
// * synthesized result, never an error.

pub mod gemini;
pub mod openai;
pub mod parser;
pub mod prompt;

use crate::capture::PageRecord;
use crate::catalog::{ModelCatalog, GEMINI_API_BASE, OPENAI_API_BASE};
use crate::config::{ModelProvider, Settings, DEFAULT_GEMINI_MODEL, DEFAULT_OPENAI_MODEL};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use url::Url;

const ENRICH_TIMEOUT_SECS: u64 = 60;

/// Named preset controlling prompt verbosity and tag count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum EnhanceStyle {
    #[default]
    Standard,
    Detailed,
    KeyPoints,
    Technical,
}

impl fmt::Display for EnhanceStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EnhanceStyle::Standard => "standard",
            EnhanceStyle::Detailed => "detailed",
            EnhanceStyle::KeyPoints => "key-points",
            EnhanceStyle::Technical => "technical",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for EnhanceStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(EnhanceStyle::Standard),
            "detailed" => Ok(EnhanceStyle::Detailed),
            "key-points" | "keypoints" => Ok(EnhanceStyle::KeyPoints),
            "technical" => Ok(EnhanceStyle::Technical),
            other => Err(format!("unknown enhancement style: {other}")),
        }
    }
}

/// Outcome of the enrichment pipeline.
///
/// The fallback flags mark reduced confidence, not failure: `fallback_parsed`
/// means the reply didn't match the expected labeled format; and
/// `fallback_generated` means the result was synthesized locally without any
/// usable model output.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EnhancementResult {
    pub description: String,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default)]
    pub fallback_parsed: bool,
    #[serde(default)]
    pub fallback_generated: bool,
}

/// Internal enrichment failure. Always converted to fallback generation
/// before leaving this module.
#[derive(Error, Debug)]
pub enum EnrichError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("provider returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("response carried no generated text")]
    EmptyResponse,
}

/// Drives one enrichment call against the selected provider.
pub struct Enricher {
    client: Client,
    catalog: ModelCatalog,
    gemini_base: String,
    openai_base: String,
}

impl Default for Enricher {
    fn default() -> Self {
        Self::new()
    }
}

impl Enricher {
    pub fn new() -> Self {
        Self::with_bases(GEMINI_API_BASE, OPENAI_API_BASE)
    }

    /// Overrides the provider endpoints (tests point these at a local mock).
    pub fn with_bases(gemini_base: impl Into<String>, openai_base: impl Into<String>) -> Self {
        let gemini_base = gemini_base.into();
        let openai_base = openai_base.into();
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(ENRICH_TIMEOUT_SECS))
                .build()
                .unwrap_or_default(),
            catalog: ModelCatalog::with_bases(gemini_base.clone(), openai_base.clone()),
            gemini_base,
            openai_base,
        }
    }

    /// Enhances a page record. Never fails: transport errors and unusable
    /// replies both degrade to a synthesized local result.
    pub async fn enhance(
        &self,
        record: &PageRecord,
        settings: &Settings,
        style: EnhanceStyle,
    ) -> EnhancementResult {
        let provider = settings.model_provider;
        let api_key = settings.api_key_for(provider);

        if api_key.trim().is_empty() {
            tracing::warn!(%provider, "no API key configured, generating fallback enhancement");
            return generate_fallback(record);
        }

        let model = self.resolve_model(settings, provider, api_key).await;

        let raw = match provider {
            ModelProvider::Gemini => {
                let prompt = prompt::single_prompt(record, style);
                gemini::generate(&self.client, &self.gemini_base, api_key, &model, prompt).await
            }
            ModelProvider::OpenAi => {
                openai::chat_completion(
                    &self.client,
                    &self.openai_base,
                    api_key,
                    &model,
                    prompt::system_prompt(style),
                    prompt::user_prompt(record),
                )
                .await
            }
        };

        match raw {
            Ok(text) => {
                let mut result = parser::parse_response(&text).unwrap_or_else(|| {
                    // * Reply arrived but carried nothing extractable
                    tracing::warn!(%provider, %model, "unparseable enrichment reply");
                    let mut synthesized = generate_fallback(record);
                    synthesized.fallback_parsed = true;
                    synthesized
                });
                result.model = Some(model);
                result
            }
            Err(e) => {
                tracing::warn!(%provider, %model, error = %e, "enrichment call failed");
                generate_fallback(record)
            }
        }
    }

    /// Substitutes a default model when the selected one is absent from the
    /// catalog. Prefers the cached list, fetching only when the cache is
    /// empty.
    async fn resolve_model(
        &self,
        settings: &Settings,
        provider: ModelProvider,
        api_key: &str,
    ) -> String {
        let selected = settings.model_for(provider);

        let cached = settings.cached_models(provider);
        let available: Vec<String> = if cached.is_empty() {
            self.catalog
                .list_models(provider, api_key)
                .await
                .into_iter()
                .map(|m| m.id)
                .collect()
        } else {
            cached.to_vec()
        };

        if available.iter().any(|id| id == selected) {
            return selected.to_string();
        }

        let default = match provider {
            ModelProvider::Gemini => DEFAULT_GEMINI_MODEL,
            ModelProvider::OpenAi => DEFAULT_OPENAI_MODEL,
        };
        let substitute = if available.iter().any(|id| id == default) {
            default.to_string()
        } else {
            available
                .first()
                .cloned()
                .unwrap_or_else(|| default.to_string())
        };

        tracing::warn!(
            %provider,
            selected,
            %substitute,
            "selected model not in catalog, substituting"
        );
        substitute
    }
}

// * Common words excluded from fallback tag derivation
const STOPWORDS: &[&str] = &[
    "the", "and", "a", "an", "in", "on", "at", "to", "for", "with", "by", "of", "is", "are",
    "this", "that", "from", "have", "what", "which", "their", "about", "would", "these", "there",
];

const MAX_FALLBACK_TAGS: usize = 5;

/// Locally computed substitute used when the remote call fails entirely.
/// Pure, infallible: description from existing metadata, tags from
/// frequency-filtered title words plus the page domain.
pub fn generate_fallback(record: &PageRecord) -> EnhancementResult {
    let domain = Url::parse(&record.url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.trim_start_matches("www.").to_string()))
        .unwrap_or_default();

    let description = if record.description.len() > 10 {
        record.description.clone()
    } else if domain.is_empty() {
        format!("{} - A saved resource.", record.title)
    } else {
        format!("{} - A resource found at {domain}.", record.title)
    };

    let mut tags: Vec<String> = Vec::new();
    if let Some(label) = domain.split('.').next().filter(|l| !l.is_empty()) {
        tags.push(label.to_string());
    }

    let title_tags = record
        .title
        .split_whitespace()
        .map(|w| {
            w.chars()
                .filter(|c| c.is_alphanumeric())
                .collect::<String>()
                .to_lowercase()
        })
        .filter(|w| w.len() > 3 && !STOPWORDS.contains(&w.as_str()))
        .take(MAX_FALLBACK_TAGS);

    for tag in title_tags {
        if !tags.contains(&tag) {
            tags.push(tag);
        }
    }

    EnhancementResult {
        description,
        tags,
        model: None,
        fallback_parsed: false,
        fallback_generated: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> PageRecord {
        PageRecord {
            title: "Understanding Async Rust Programming".to_string(),
            url: "https://www.example.com/posts/async".to_string(),
            description: String::new(),
            ..PageRecord::default()
        }
    }

    #[test]
    fn test_style_parsing() {
        assert_eq!("standard".parse::<EnhanceStyle>().unwrap(), EnhanceStyle::Standard);
        assert_eq!("key-points".parse::<EnhanceStyle>().unwrap(), EnhanceStyle::KeyPoints);
        assert_eq!("Technical".parse::<EnhanceStyle>().unwrap(), EnhanceStyle::Technical);
        assert!("fancy".parse::<EnhanceStyle>().is_err());
    }

    #[test]
    fn test_fallback_synthesizes_description_from_title_and_domain() {
        let result = generate_fallback(&record());

        assert!(result.fallback_generated);
        assert_eq!(
            result.description,
            "Understanding Async Rust Programming - A resource found at example.com."
        );
    }

    #[test]
    fn test_fallback_keeps_existing_description() {
        let mut r = record();
        r.description = "An existing meta description.".to_string();
        let result = generate_fallback(&r);
        assert_eq!(result.description, "An existing meta description.");
    }

    #[test]
    fn test_fallback_tags_from_domain_and_title_words() {
        let result = generate_fallback(&record());

        assert_eq!(result.tags[0], "example");
        assert!(result.tags.contains(&"understanding".to_string()));
        assert!(result.tags.contains(&"async".to_string()));
        assert!(result.tags.contains(&"rust".to_string()));
        // * Short/common words excluded
        assert!(!result.tags.iter().any(|t| t == "the" || t.len() <= 3));
    }

    #[test]
    fn test_fallback_never_empty_handles_bad_url() {
        let r = PageRecord {
            title: "T".to_string(),
            url: "not a url".to_string(),
            ..PageRecord::default()
        };
        let result = generate_fallback(&r);
        assert!(result.fallback_generated);
        assert!(!result.description.is_empty());
    }

    #[tokio::test]
    async fn test_enhance_without_key_generates_fallback_offline() {
        // * Unroutable bases: any network attempt would error out, not
        // * produce the synthesized result
        let enricher = Enricher::with_bases("http://127.0.0.1:9", "http://127.0.0.1:9");
        let settings = Settings::default();

        let result = enricher
            .enhance(&record(), &settings, EnhanceStyle::Standard)
            .await;

        assert!(result.fallback_generated);
        assert!(!result.description.is_empty());
    }
}
