// * Page Capture
// * Turns fetched HTML into a flat, reviewable record: title, URL,
// * description, favicon, and a bounded slice of body text for enrichment.

pub mod extractor;
pub mod tags;
pub mod url_parts;

pub use extractor::PageExtractor;
pub use tags::TagList;
pub use url_parts::UrlParts;

use serde::{Deserialize, Serialize};

/// Captured (and user-edited) metadata for one page.
///
/// `content` exists only to feed enrichment; it is never persisted verbatim.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PageRecord {
    pub title: String,
    pub url: String,
    pub description: String,
    pub favicon: String,
    pub content: String,
    pub tags: Vec<String>,
}

impl PageRecord {
    /// Minimal record built when the page itself could not be fetched.
    /// Carries only URL-level metadata: title from the host, no description.
    pub fn minimal(url: &str) -> Self {
        let title = url::Url::parse(url)
            .ok()
            .and_then(|u| u.host_str().map(|h| h.to_string()))
            .unwrap_or_else(|| url.to_string());

        Self {
            title,
            url: url.to_string(),
            ..Self::default()
        }
    }

    /// True when the record satisfies the writer's invariant.
    pub fn has_required_fields(&self) -> bool {
        !self.title.trim().is_empty() && !self.url.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_record_uses_host_as_title() {
        let record = PageRecord::minimal("https://example.com/some/path");
        assert_eq!(record.title, "example.com");
        assert_eq!(record.url, "https://example.com/some/path");
        assert!(record.description.is_empty());
        assert!(record.has_required_fields());
    }

    #[test]
    fn test_minimal_record_unparseable_url_falls_back_to_raw() {
        let record = PageRecord::minimal("not a url");
        assert_eq!(record.title, "not a url");
        assert!(record.has_required_fields());
    }

    #[test]
    fn test_required_fields() {
        let mut record = PageRecord::default();
        assert!(!record.has_required_fields());
        record.title = "T".to_string();
        record.url = "https://example.com".to_string();
        assert!(record.has_required_fields());
    }
}
