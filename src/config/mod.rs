// * Settings Store
// * One persisted configuration blob, loaded on startup and overwritten
// * wholesale on save (last-writer-wins). Components receive an explicit
// * &Settings; there is no ambient global.

pub mod constants;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_NOTION_API_URL: &str = "https://api.notion.com/v1";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4-1106-preview";

/// The LLM provider used for enrichment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ModelProvider {
    #[default]
    Gemini,
    OpenAi,
}

impl fmt::Display for ModelProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelProvider::Gemini => write!(f, "gemini"),
            ModelProvider::OpenAi => write!(f, "openai"),
        }
    }
}

impl std::str::FromStr for ModelProvider {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" => Ok(ModelProvider::Gemini),
            "openai" => Ok(ModelProvider::OpenAi),
            other => Err(SettingsError::UnknownProvider(other.to_string())),
        }
    }
}

/// Persisted user configuration.
///
/// Unknown fields in the file are dropped on the next save; missing fields
/// take their defaults, so older settings files keep loading.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub notion_api_url: String,
    pub notion_database_id: String,
    pub notion_api_key: String,
    pub gemini_api_key: String,
    pub openai_api_key: String,
    pub model_provider: ModelProvider,
    pub gemini_model: String,
    pub openai_model: String,
    /// Cached model ids, refreshed whenever a catalog fetch succeeds.
    pub gemini_models: Vec<String>,
    pub openai_models: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            notion_api_url: DEFAULT_NOTION_API_URL.to_string(),
            notion_database_id: String::new(),
            notion_api_key: String::new(),
            gemini_api_key: String::new(),
            openai_api_key: String::new(),
            model_provider: ModelProvider::Gemini,
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            openai_model: DEFAULT_OPENAI_MODEL.to_string(),
            gemini_models: Vec::new(),
            openai_models: Vec::new(),
        }
    }
}

impl Settings {
    /// Default on-disk location: `<config_dir>/tabflow/settings.json`.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("tabflow")
            .join("settings.json")
    }

    /// Loads settings from the default path, falling back to defaults when
    /// the file does not exist yet.
    pub fn load() -> Result<Self, SettingsError> {
        Self::load_from(&Self::default_path())
    }

    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Persists the full settings object to the default path.
    pub fn save(&self) -> Result<(), SettingsError> {
        self.save_to(&Self::default_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string_pretty(self)?;
        std::fs::write(path, raw)?;
        Ok(())
    }

    /// True when a Notion write may be attempted.
    pub fn has_notion_config(&self) -> bool {
        !self.notion_api_key.trim().is_empty() && !self.notion_database_id.trim().is_empty()
    }

    /// API key for the given provider (may be empty).
    pub fn api_key_for(&self, provider: ModelProvider) -> &str {
        match provider {
            ModelProvider::Gemini => &self.gemini_api_key,
            ModelProvider::OpenAi => &self.openai_api_key,
        }
    }

    /// Selected model id for the given provider.
    pub fn model_for(&self, provider: ModelProvider) -> &str {
        match provider {
            ModelProvider::Gemini => &self.gemini_model,
            ModelProvider::OpenAi => &self.openai_model,
        }
    }

    /// Cached model id list for the given provider.
    pub fn cached_models(&self, provider: ModelProvider) -> &[String] {
        match provider {
            ModelProvider::Gemini => &self.gemini_models,
            ModelProvider::OpenAi => &self.openai_models,
        }
    }

    /// Replaces the cached model id list for the given provider.
    pub fn cache_models(&mut self, provider: ModelProvider, ids: Vec<String>) {
        match provider {
            ModelProvider::Gemini => self.gemini_models = ids,
            ModelProvider::OpenAi => self.openai_models = ids,
        }
    }

    /// Assigns a settings field by name. Used by the CLI `config set` path.
    pub fn set_field(&mut self, field: &str, value: &str) -> Result<(), SettingsError> {
        match field {
            "notion_api_url" => self.notion_api_url = value.to_string(),
            "notion_database_id" => self.notion_database_id = value.to_string(),
            "notion_api_key" => self.notion_api_key = value.to_string(),
            "gemini_api_key" => self.gemini_api_key = value.to_string(),
            "openai_api_key" => self.openai_api_key = value.to_string(),
            "model_provider" => self.model_provider = value.parse()?,
            "gemini_model" => self.gemini_model = value.to_string(),
            "openai_model" => self.openai_model = value.to_string(),
            other => return Err(SettingsError::UnknownField(other.to_string())),
        }
        Ok(())
    }
}

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("settings I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("settings file is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("unknown model provider: {0}")]
    UnknownProvider(String),

    #[error("unknown settings field: {0}")]
    UnknownField(String),
}
