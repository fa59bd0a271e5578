// * URL path-depth parsing
// * Splits a URL into its domain plus ordered trailing segments (path
// * components, then query, then fragment) so the user can trim a clip
// * down to any prefix of the original URL.

use regex::Regex;
use std::sync::LazyLock;
use url::Url;

static SCHEME_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^https?://").unwrap());

/// A URL decomposed for depth-based truncation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlParts {
    /// Scheme + host (+ port), e.g. `https://example.com`
    pub domain: String,
    /// Trailing segments in order: `/a`, `/b`, then `?x=1`, then `#frag`
    pub segments: Vec<String>,
    /// The original input, untouched
    pub full: String,
}

impl UrlParts {
    /// Parses a URL, tolerating a missing scheme and malformed input.
    /// Never fails; malformed URLs fall back to manual splitting.
    pub fn parse(url: &str) -> Self {
        let fixed = if SCHEME_RE.is_match(url) {
            url.to_string()
        } else {
            format!("https://{url}")
        };

        match Url::parse(&fixed) {
            Ok(parsed) if parsed.host_str().is_some() => Self::from_parsed(&parsed, url),
            _ => Self::manual_split(url),
        }
    }

    fn from_parsed(parsed: &Url, original: &str) -> Self {
        let domain = parsed.origin().ascii_serialization();

        let mut segments: Vec<String> = parsed
            .path()
            .trim_matches('/')
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| format!("/{s}"))
            .collect();

        if let Some(query) = parsed.query() {
            segments.push(format!("?{query}"));
        }
        if let Some(fragment) = parsed.fragment() {
            segments.push(format!("#{fragment}"));
        }

        Self {
            domain,
            segments,
            full: original.to_string(),
        }
    }

    // * Last-resort splitting for input `Url::parse` rejects
    fn manual_split(url: &str) -> Self {
        let after_scheme = url.find("://").map(|i| i + 3).unwrap_or(0);
        match url[after_scheme..].find('/') {
            Some(rel) => {
                let path_start = after_scheme + rel;
                let domain = url[..path_start].to_string();
                let segments = url[path_start..]
                    .split('/')
                    .filter(|s| !s.is_empty())
                    .map(|s| format!("/{s}"))
                    .collect();
                Self {
                    domain,
                    segments,
                    full: url.to_string(),
                }
            }
            None => Self {
                domain: url.to_string(),
                segments: Vec::new(),
                full: url.to_string(),
            },
        }
    }

    /// Rebuilds the URL keeping only the first `depth` segments.
    /// `depth = 0` yields the bare domain; `depth >= len` yields everything.
    pub fn url_at_depth(&self, depth: usize) -> String {
        let mut out = self.domain.clone();
        for segment in self.segments.iter().take(depth) {
            out.push_str(segment);
        }
        out
    }

    /// Maximum meaningful depth.
    pub fn max_depth(&self) -> usize {
        self.segments.len()
    }
}
