// * Notion Writer
// * Persists a finished page record as a new page in the configured Notion
// * database. Property mapping, tag caps, and the description placeholder
// * live here so callers only hand over a record and settings.

use crate::capture::PageRecord;
use crate::config::constants::{
    DESCRIPTION_PLACEHOLDER, MAX_TAGS_PER_WRITE, MAX_TAG_LENGTH, NOTION_VERSION,
};
use crate::config::Settings;
use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;

const WRITE_TIMEOUT_SECS: u64 = 30;

#[derive(Error, Debug)]
pub enum WriteError {
    #[error("missing configuration: {0}")]
    Configuration(String),

    #[error("record not writable: {0}")]
    InvalidRecord(&'static str),

    #[error("notion returned {status}: {message}")]
    Remote { status: u16, message: String },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Identifier of the created Notion page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteId(pub String);

#[derive(Debug, Deserialize)]
struct CreatePageResponse {
    id: String,
}

#[derive(Debug, Deserialize)]
struct NotionErrorBody {
    #[serde(default)]
    message: String,
}

/// Writes page records to a Notion database.
pub struct RecordWriter {
    client: Client,
}

impl Default for RecordWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordWriter {
    pub fn new() -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(WRITE_TIMEOUT_SECS))
                .build()
                .unwrap_or_default(),
        }
    }

    /// Creates one database page for the record. Validates settings and the
    /// record before touching the network.
    pub async fn write(
        &self,
        record: &PageRecord,
        settings: &Settings,
    ) -> Result<RemoteId, WriteError> {
        if settings.notion_api_key.trim().is_empty() {
            return Err(WriteError::Configuration("notion_api_key".to_string()));
        }
        if settings.notion_database_id.trim().is_empty() {
            return Err(WriteError::Configuration("notion_database_id".to_string()));
        }
        if record.title.trim().is_empty() {
            return Err(WriteError::InvalidRecord("title is empty"));
        }
        if record.url.trim().is_empty() {
            return Err(WriteError::InvalidRecord("url is empty"));
        }

        let url = format!("{}/pages", settings.notion_api_url.trim_end_matches('/'));
        let body = json!({
            "parent": { "database_id": settings.notion_database_id },
            "properties": build_properties(record),
        });

        tracing::info!(url = %record.url, "writing record to notion");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&settings.notion_api_key)
            .header("Notion-Version", NOTION_VERSION)
            .json(&body)
            .send()
            .await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<NotionErrorBody>(&text)
                .map(|e| e.message)
                .ok()
                .filter(|m| !m.is_empty())
                .unwrap_or(text);
            return Err(WriteError::Remote {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: CreatePageResponse = serde_json::from_str(&text).map_err(|_| {
            WriteError::Remote {
                status: status.as_u16(),
                message: "response carried no page id".to_string(),
            }
        })?;

        tracing::info!(page_id = %parsed.id, "record written");
        Ok(RemoteId(parsed.id))
    }
}

/// Maps a record onto the database property schema. Empty descriptions get a
/// placeholder; tags are capped in count and length; the Tags property is
/// omitted entirely when there are none.
fn build_properties(record: &PageRecord) -> Value {
    let description = if record.description.trim().is_empty() {
        DESCRIPTION_PLACEHOLDER
    } else {
        record.description.as_str()
    };

    let mut properties = json!({
        "Name": {
            "title": [{ "text": { "content": record.title } }]
        },
        "URL": { "url": record.url },
        "Description": {
            "rich_text": [{ "text": { "content": description } }]
        },
        "Saved at": {
            "date": { "start": Utc::now().to_rfc3339() }
        },
    });

    if !record.tags.is_empty() {
        let options: Vec<Value> = record
            .tags
            .iter()
            .take(MAX_TAGS_PER_WRITE)
            .map(|tag| {
                let capped: String = tag.chars().take(MAX_TAG_LENGTH).collect();
                json!({ "name": capped })
            })
            .collect();
        properties["Tags"] = json!({ "multi_select": options });
    }

    properties
}
