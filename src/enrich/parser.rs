// * Response parsing
// * Ordered chain of parser strategies over the raw model output. Each
// * strategy returns Option; the first success wins. The looser second
// * stage marks its result as degraded via `fallback_parsed`.

use crate::enrich::EnhancementResult;
use regex::Regex;
use std::sync::LazyLock;

// * Primary labeled-block patterns
static DESCRIPTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)Description:(.*?)(?:Tags:|$)").unwrap());
static TAGS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)Tags:(.*)$").unwrap());

// * Looser fallback patterns for JSON-ish or mislabeled output
static TAGS_BRACKET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)tags["']?\s*:?\s*\[([^\]]+)\]"#).unwrap());
static TAGS_QUOTED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)tags["']?\s*:?\s*["']([^"']+)["']"#).unwrap());
static SHORT_DESC_QUOTED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)short_description["']?\s*:?\s*["']([^"']+)["']"#).unwrap());
static SHORT_DESC_BARE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)short_description["']?\s*:?\s*([^,\n\r]+)"#).unwrap());

/// Runs the parser chain over raw model output.
pub fn parse_response(raw: &str) -> Option<EnhancementResult> {
    parse_labeled(raw).or_else(|| parse_loose(raw))
}

/// Primary parse: a `Description:` / `Tags:` labeled block.
pub fn parse_labeled(raw: &str) -> Option<EnhancementResult> {
    let description = DESCRIPTION_RE
        .captures(raw)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default();

    let tags = TAGS_RE
        .captures(raw)
        .and_then(|c| c.get(1))
        .map(|m| split_tags(m.as_str()))
        .unwrap_or_default();

    if description.is_empty() && tags.is_empty() {
        return None;
    }

    Some(EnhancementResult {
        description,
        tags,
        ..EnhancementResult::default()
    })
}

/// Fallback parse: loose `tags:` / `short_description:` tokens, or the first
/// sufficiently long paragraph as description.
pub fn parse_loose(raw: &str) -> Option<EnhancementResult> {
    let tags = TAGS_BRACKET_RE
        .captures(raw)
        .or_else(|| TAGS_QUOTED_RE.captures(raw))
        .and_then(|c| c.get(1))
        .map(|m| split_tags(m.as_str()))
        .unwrap_or_default();

    let description = SHORT_DESC_QUOTED_RE
        .captures(raw)
        .or_else(|| SHORT_DESC_BARE_RE.captures(raw))
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().trim_matches(['"', '\'']).to_string())
        .unwrap_or_else(|| first_long_paragraph(raw).unwrap_or_default());

    if description.is_empty() && tags.is_empty() {
        return None;
    }

    Some(EnhancementResult {
        description,
        tags,
        fallback_parsed: true,
        ..EnhancementResult::default()
    })
}

/// First paragraph over 20 chars that doesn't look like tag/JSON noise.
fn first_long_paragraph(raw: &str) -> Option<String> {
    raw.split("\n\n")
        .map(str::trim)
        .find(|p| p.len() > 20 && !p.contains("tags") && !p.contains('{') && !p.contains('}'))
        .map(str::to_string)
}

/// Splits comma-separated tag text, stripping stray quotes and empties.
fn split_tags(text: &str) -> Vec<String> {
    text.split(',')
        .map(|t| t.trim().trim_matches(['"', '\'', '[', ']']).trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}
