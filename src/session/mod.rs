// * Clip Session
// * One capture-edit-save pass over a single page, modeled as an explicit
// * state machine. Edits and enhancement are only legal in Ready; a failed
// * save drops back to Ready with the error retained so the caller can retry.

pub mod recovery;

use crate::capture::{PageRecord, TagList, UrlParts};
use crate::config::Settings;
use crate::enrich::{EnhanceStyle, EnhancementResult, Enricher};
use crate::network::PageFetcher;
use crate::notion::{RecordWriter, RemoteId, WriteError};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Loading,
    Ready,
    Enhancing,
    Saving,
    Success,
}

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("missing configuration: {0}")]
    Configuration(String),

    #[error("operation not valid in current state: {0}")]
    InvalidState(&'static str),

    #[error(transparent)]
    Write(#[from] WriteError),
}

/// A single clipping workflow from page load to persisted record.
pub struct ClipSession {
    state: SessionState,
    record: PageRecord,
    tags: TagList,
    url_parts: Option<UrlParts>,
    settings: Settings,
    last_error: Option<String>,
    enhancement: Option<EnhancementResult>,
}

impl ClipSession {
    pub fn new(settings: Settings) -> Self {
        Self {
            state: SessionState::Loading,
            record: PageRecord::default(),
            tags: TagList::new(),
            url_parts: None,
            settings,
            last_error: None,
            enhancement: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn enhancement(&self) -> Option<&EnhancementResult> {
        self.enhancement.as_ref()
    }

    /// Current record with the working tag list applied.
    pub fn record(&self) -> PageRecord {
        let mut record = self.record.clone();
        record.tags = self.tags.to_vec();
        record
    }

    /// Captures the page and moves the session to Ready. Capture is
    /// best-effort, so this always succeeds once the session is in Loading.
    pub async fn load(&mut self, fetcher: &PageFetcher, url: &str) -> Result<(), SessionError> {
        if self.state != SessionState::Loading {
            return Err(SessionError::InvalidState("load requires Loading"));
        }

        self.record = fetcher.capture(url).await;
        self.tags = TagList::from_tags(&self.record.tags);
        self.url_parts = Some(UrlParts::parse(&self.record.url));
        self.state = SessionState::Ready;
        tracing::debug!(url, title = %self.record.title, "session ready");
        Ok(())
    }

    pub fn set_title(&mut self, title: impl Into<String>) -> Result<(), SessionError> {
        self.require_ready("set_title")?;
        self.record.title = title.into();
        Ok(())
    }

    pub fn set_description(&mut self, description: impl Into<String>) -> Result<(), SessionError> {
        self.require_ready("set_description")?;
        self.record.description = description.into();
        Ok(())
    }

    /// Trims the record URL to the first `depth` path segments, so a deep
    /// article link can be saved as its section or site root instead.
    pub fn set_url_depth(&mut self, depth: usize) -> Result<(), SessionError> {
        self.require_ready("set_url_depth")?;
        if let Some(parts) = &self.url_parts {
            self.record.url = parts.url_at_depth(depth);
        }
        Ok(())
    }

    pub fn url_depth_options(&self) -> usize {
        self.url_parts.as_ref().map(UrlParts::max_depth).unwrap_or(0)
    }

    pub fn add_tag(&mut self, tag: &str) -> Result<bool, SessionError> {
        self.require_ready("add_tag")?;
        Ok(self.tags.add(tag))
    }

    /// Adds every tag in a comma-separated string (the CLI's `--tag` input).
    pub fn add_tags(&mut self, text: &str) -> Result<(), SessionError> {
        self.require_ready("add_tags")?;
        self.tags.add_many(text);
        Ok(())
    }

    pub fn remove_tag(&mut self, index: usize) -> Result<Option<String>, SessionError> {
        self.require_ready("remove_tag")?;
        Ok(self.tags.remove(index))
    }

    pub fn tags(&self) -> &[String] {
        self.tags.as_slice()
    }

    /// Runs enrichment and folds the result into the working record. Rejected
    /// up front when the selected provider has no key, without any network
    /// traffic, leaving the session in Ready.
    pub async fn enhance(
        &mut self,
        enricher: &Enricher,
        style: EnhanceStyle,
    ) -> Result<(), SessionError> {
        self.require_ready("enhance")?;

        let provider = self.settings.model_provider;
        if self.settings.api_key_for(provider).trim().is_empty() {
            return Err(SessionError::Configuration(format!(
                "no API key for provider {provider}"
            )));
        }

        self.state = SessionState::Enhancing;
        let result = enricher.enhance(&self.record(), &self.settings, style).await;

        if !result.description.is_empty() {
            self.record.description = result.description.clone();
        }
        if !result.tags.is_empty() {
            self.tags.replace_all(&result.tags);
        }
        self.enhancement = Some(result);
        self.state = SessionState::Ready;
        Ok(())
    }

    /// Persists the record. On success the session terminates in Success; on
    /// failure it returns to Ready with the error retained.
    pub async fn save(&mut self, writer: &RecordWriter) -> Result<RemoteId, SessionError> {
        self.require_ready("save")?;

        if !self.settings.has_notion_config() {
            return Err(SessionError::Configuration(
                "notion API key and database id are required".to_string(),
            ));
        }

        self.state = SessionState::Saving;
        let record = self.record();

        match writer.write(&record, &self.settings).await {
            Ok(id) => {
                self.state = SessionState::Success;
                self.last_error = None;
                Ok(id)
            }
            Err(e) => {
                self.state = SessionState::Ready;
                self.last_error = Some(e.to_string());
                Err(SessionError::Write(e))
            }
        }
    }

    fn require_ready(&self, op: &'static str) -> Result<(), SessionError> {
        if self.state != SessionState::Ready {
            return Err(SessionError::InvalidState(op));
        }
        Ok(())
    }
}
