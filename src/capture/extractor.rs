// * Page Extractor
// * Reads title, meta description, favicon, and a best-effort slice of main
// * content text out of fetched HTML. Never fails: every field degrades to
// * an empty string. Search result pages get synthesized metadata from the
// * query parameter instead of DOM metadata.

use crate::capture::PageRecord;
use crate::config::constants::{CONTENT_CHAR_BUDGET, CONTENT_ELLIPSIS};
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;
use url::Url;

// * Precompiled selectors
static SELECTOR_TITLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("title").unwrap());
static SELECTOR_META_DESCRIPTION: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"meta[name="description"]"#).unwrap());
static SELECTOR_FAVICON: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"link[rel="icon"], link[rel="shortcut icon"]"#).unwrap());
static SELECTOR_BODY: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("body").unwrap());

// * Main content areas, in priority order
static SELECTOR_ARTICLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("article").unwrap());
static SELECTOR_MAIN: LazyLock<Selector> = LazyLock::new(|| Selector::parse("main").unwrap());
static SELECTOR_CONTENT: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".content, #content").unwrap());

/// Extracts a [`PageRecord`] from raw HTML. Pure and infallible.
pub struct PageExtractor;

impl PageExtractor {
    /// Extraction chain:
    /// 1. Title from `<title>`
    /// 2. Description from `meta[name=description]` (or synthesized for
    ///    search result pages)
    /// 3. Favicon from `link[rel=icon]`, resolved against the page URL
    /// 4. Content from `article` -> `main` -> `.content`/`#content` -> body,
    ///    truncated to the character budget
    pub fn extract(url: &str, html: &str) -> PageRecord {
        let document = Html::parse_document(html);
        let parsed_url = Url::parse(url).ok();

        let mut record = PageRecord {
            url: url.to_string(),
            ..PageRecord::default()
        };

        record.title = document
            .select(&SELECTOR_TITLE)
            .next()
            .map(|t| collapse_whitespace(&t.text().collect::<String>()))
            .unwrap_or_default();

        // * Search result pages carry no useful DOM metadata; synthesize
        // * title/description from the query instead.
        if let Some(query) = parsed_url.as_ref().and_then(search_query) {
            record.title = format!("Google Search: {query}");
            record.description = format!("Search results for: {query}");
        } else {
            record.description = document
                .select(&SELECTOR_META_DESCRIPTION)
                .next()
                .and_then(|m| m.value().attr("content"))
                .map(|c| c.trim().to_string())
                .unwrap_or_default();
        }

        record.favicon = document
            .select(&SELECTOR_FAVICON)
            .next()
            .and_then(|l| l.value().attr("href"))
            .map(|href| resolve_href(parsed_url.as_ref(), href))
            .unwrap_or_default();

        record.content = Self::extract_content(&document);

        record
    }

    /// Picks the content source by priority and enforces the char budget.
    fn extract_content(document: &Html) -> String {
        let main_area = document
            .select(&SELECTOR_ARTICLE)
            .next()
            .or_else(|| document.select(&SELECTOR_MAIN).next())
            .or_else(|| document.select(&SELECTOR_CONTENT).next());

        let text = match main_area {
            Some(area) => element_text(area),
            None => document
                .select(&SELECTOR_BODY)
                .next()
                .map(element_text)
                .unwrap_or_default(),
        };

        truncate_chars(&text, CONTENT_CHAR_BUDGET)
    }
}

/// Returns the `q` parameter when the URL is a Google search results page.
fn search_query(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    if !host.contains("google") || !url.path().contains("/search") {
        return None;
    }
    url.query_pairs()
        .find(|(k, _)| k == "q")
        .map(|(_, v)| v.into_owned())
        .filter(|q| !q.is_empty())
}

/// Resolves a possibly-relative favicon href against the page URL.
fn resolve_href(base: Option<&Url>, href: &str) -> String {
    match base {
        Some(base) => base
            .join(href)
            .map(|u| u.to_string())
            .unwrap_or_else(|_| href.to_string()),
        None => href.to_string(),
    }
}

/// Collects visible text under an element, whitespace-collapsed.
fn element_text(element: ElementRef<'_>) -> String {
    let joined = element.text().collect::<Vec<_>>().join(" ");
    collapse_whitespace(&joined)
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Truncates at a char boundary and appends the ellipsis marker when cut.
fn truncate_chars(text: &str, budget: usize) -> String {
    if text.chars().count() <= budget {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(budget).collect();
    cut.push_str(CONTENT_ELLIPSIS);
    cut
}
