// * Model Catalog Client
// * Queries each provider's list-models endpoint and normalizes entries into
// * {id, name} pairs. Infallible by contract: any failure (missing key,
// * transport error, non-2xx, unparseable body, empty filtered list) yields
// * the built-in default list for the provider.

use crate::config::constants::MODEL_LIST_PAGE_SIZE;
use crate::config::ModelProvider;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const OPENAI_API_BASE: &str = "https://api.openai.com/v1";

const LIST_TIMEOUT_SECS: u64 = 15;

/// Normalized provider model entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    pub id: String,
    /// Human-readable label (id plus a capability annotation where known).
    pub name: String,
}

impl ModelDescriptor {
    fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Client for the providers' list-models endpoints.
pub struct ModelCatalog {
    client: Client,
    gemini_base: String,
    openai_base: String,
}

impl Default for ModelCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelCatalog {
    pub fn new() -> Self {
        Self::with_bases(GEMINI_API_BASE, OPENAI_API_BASE)
    }

    /// Overrides the provider endpoints (tests point these at a local mock).
    pub fn with_bases(gemini_base: impl Into<String>, openai_base: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(LIST_TIMEOUT_SECS))
                .build()
                .unwrap_or_default(),
            gemini_base: gemini_base.into(),
            openai_base: openai_base.into(),
        }
    }

    /// Lists chat-capable models for a provider. Never fails.
    pub async fn list_models(&self, provider: ModelProvider, api_key: &str) -> Vec<ModelDescriptor> {
        if api_key.trim().is_empty() {
            return default_models(provider);
        }

        let fetched = match provider {
            ModelProvider::Gemini => self.fetch_gemini(api_key).await,
            ModelProvider::OpenAi => self.fetch_openai(api_key).await,
        };

        match fetched {
            Ok(models) if !models.is_empty() => models,
            Ok(_) => {
                tracing::debug!(%provider, "model list empty after filtering, using defaults");
                default_models(provider)
            }
            Err(e) => {
                tracing::warn!(%provider, error = %e, "model list fetch failed, using defaults");
                default_models(provider)
            }
        }
    }

    async fn fetch_gemini(&self, api_key: &str) -> Result<Vec<ModelDescriptor>, reqwest::Error> {
        let url = format!(
            "{}/models?key={}&pageSize={}",
            self.gemini_base, api_key, MODEL_LIST_PAGE_SIZE
        );
        let list: GeminiModelList = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let mut models: Vec<ModelDescriptor> = list
            .models
            .into_iter()
            .filter(|m| m.name.contains("gemini"))
            .map(|m| {
                // * "models/gemini-1.5-pro" -> "gemini-1.5-pro"
                let id = m.name.rsplit('/').next().unwrap_or(&m.name).to_string();
                let name = gemini_display_name(&id);
                ModelDescriptor { id, name }
            })
            .collect();

        // * Newer 1.5 generation first, then lexicographic by id
        models.sort_by(|a, b| {
            let a_new = a.id.contains("1.5");
            let b_new = b.id.contains("1.5");
            b_new.cmp(&a_new).then_with(|| a.id.cmp(&b.id))
        });

        Ok(models)
    }

    async fn fetch_openai(&self, api_key: &str) -> Result<Vec<ModelDescriptor>, reqwest::Error> {
        let url = format!("{}/models", self.openai_base);
        let list: OpenAiModelList = self
            .client
            .get(&url)
            .bearer_auth(api_key)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let mut models: Vec<ModelDescriptor> = list
            .data
            .into_iter()
            .filter(|m| {
                m.id.contains("gpt")
                    && !m.id.contains("instruct")
                    && (m.id.contains("3.5") || m.id.contains('4'))
            })
            .map(|m| {
                let name = openai_display_name(&m.id);
                ModelDescriptor { id: m.id, name }
            })
            .collect();

        models.sort_by(|a, b| a.id.cmp(&b.id));

        Ok(models)
    }
}

/// Annotates well-known Gemini variants with a capability label.
fn gemini_display_name(id: &str) -> String {
    if id.contains("1.5-flash") {
        format!("{id} - Fastest multimodal model")
    } else if id.contains("1.5-pro") {
        format!("{id} - Best performing model with 2M token context")
    } else if id.contains("pro-vision") {
        format!("{id} - Model with vision capabilities")
    } else if id.contains("pro") {
        format!("{id} - Standard model for text generation")
    } else {
        id.to_string()
    }
}

/// Friendly labels for a few well-known OpenAI models.
fn openai_display_name(id: &str) -> String {
    match id {
        "gpt-4-1106-preview" => format!("{id} (4.1nano)"),
        "gpt-3.5-turbo" => format!("{id} (3.5)"),
        _ => id.to_string(),
    }
}

/// Built-in default list used whenever the live catalog is unavailable.
pub fn default_models(provider: ModelProvider) -> Vec<ModelDescriptor> {
    match provider {
        ModelProvider::Gemini => vec![
            ModelDescriptor::new(
                "gemini-1.5-flash",
                "gemini-1.5-flash - Fastest multimodal model",
            ),
            ModelDescriptor::new(
                "gemini-1.5-pro",
                "gemini-1.5-pro - Best performing model with 2M token context",
            ),
            ModelDescriptor::new("gemini-pro", "gemini-pro - Standard model for text generation"),
            ModelDescriptor::new(
                "gemini-pro-vision",
                "gemini-pro-vision - Model with vision capabilities",
            ),
        ],
        ModelProvider::OpenAi => vec![
            ModelDescriptor::new("gpt-4-1106-preview", "gpt-4-1106-preview (4.1nano)"),
            ModelDescriptor::new("gpt-4-vision-preview", "gpt-4-vision-preview"),
            ModelDescriptor::new("gpt-4", "gpt-4"),
            ModelDescriptor::new("gpt-3.5-turbo", "gpt-3.5-turbo (3.5)"),
        ],
    }
}

#[derive(Debug, Deserialize)]
struct GeminiModelList {
    #[serde(default)]
    models: Vec<GeminiModelEntry>,
}

#[derive(Debug, Deserialize)]
struct GeminiModelEntry {
    name: String,
}

#[derive(Debug, Deserialize)]
struct OpenAiModelList {
    #[serde(default)]
    data: Vec<OpenAiModelEntry>,
}

#[derive(Debug, Deserialize)]
struct OpenAiModelEntry {
    id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_non_empty() {
        assert!(!default_models(ModelProvider::Gemini).is_empty());
        assert!(!default_models(ModelProvider::OpenAi).is_empty());
    }

    #[test]
    fn test_gemini_display_names() {
        assert!(gemini_display_name("gemini-1.5-flash").contains("Fastest"));
        assert!(gemini_display_name("gemini-1.5-pro").contains("2M token context"));
        assert!(gemini_display_name("gemini-pro-vision").contains("vision"));
        assert!(gemini_display_name("gemini-pro").contains("Standard"));
        assert_eq!(gemini_display_name("gemini-exp"), "gemini-exp");
    }

    #[test]
    fn test_openai_display_names() {
        assert_eq!(
            openai_display_name("gpt-4-1106-preview"),
            "gpt-4-1106-preview (4.1nano)"
        );
        assert_eq!(openai_display_name("gpt-3.5-turbo"), "gpt-3.5-turbo (3.5)");
        assert_eq!(openai_display_name("gpt-4"), "gpt-4");
    }

    #[tokio::test]
    async fn test_empty_key_returns_defaults_without_network() {
        // * Bases point at an unroutable address; an attempted request
        // * would fail, not fall through to defaults via the empty-key path
        let catalog = ModelCatalog::with_bases("http://127.0.0.1:9", "http://127.0.0.1:9");
        let models = catalog.list_models(ModelProvider::Gemini, "").await;
        assert_eq!(models, default_models(ModelProvider::Gemini));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_returns_defaults() {
        let catalog = ModelCatalog::with_bases("http://127.0.0.1:9", "http://127.0.0.1:9");
        let models = catalog.list_models(ModelProvider::OpenAi, "sk-test").await;
        assert_eq!(models, default_models(ModelProvider::OpenAi));
    }
}
