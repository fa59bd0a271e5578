use tabflow::capture::PageExtractor;
use tabflow::config::constants::{CONTENT_CHAR_BUDGET, CONTENT_ELLIPSIS};

const PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
    <title>Rust Patterns</title>
    <meta name="description" content="A catalog of Rust design patterns.">
    <link rel="icon" href="/static/favicon.ico">
</head>
<body>
    <nav>Home | About</nav>
    <article>
        <h1>Rust Patterns</h1>
        <p>The builder pattern separates construction from representation.</p>
    </article>
</body>
</html>"#;

#[test]
fn test_full_page_extraction() {
    let record = PageExtractor::extract("https://patterns.example.com/catalog", PAGE);

    assert_eq!(record.title, "Rust Patterns");
    assert_eq!(record.url, "https://patterns.example.com/catalog");
    assert_eq!(record.description, "A catalog of Rust design patterns.");
    assert_eq!(
        record.favicon,
        "https://patterns.example.com/static/favicon.ico"
    );
    assert!(record.content.contains("builder pattern"));
    // * Article content wins over nav chrome
    assert!(!record.content.contains("Home | About"));
}

#[test]
fn test_oversized_body_is_truncated() {
    let body = "word ".repeat(3000);
    let html = format!("<html><head><title>Big</title></head><body><p>{body}</p></body></html>");

    let record = PageExtractor::extract("https://example.com", &html);

    assert!(record.content.ends_with(CONTENT_ELLIPSIS));
    assert_eq!(
        record.content.chars().count(),
        CONTENT_CHAR_BUDGET + CONTENT_ELLIPSIS.len()
    );
}

#[test]
fn test_search_results_page_gets_synthesized_metadata() {
    let html = "<html><head><title>irrelevant</title></head><body></body></html>";
    let record = PageExtractor::extract("https://www.google.com/search?q=rust+async", html);

    assert_eq!(record.title, "Google Search: rust async");
    assert_eq!(record.description, "Search results for: rust async");
}

#[test]
fn test_bare_page_still_yields_a_record() {
    let record = PageExtractor::extract("https://example.com", "<html></html>");

    assert_eq!(record.url, "https://example.com");
    assert!(record.description.is_empty());
    assert!(record.content.is_empty());
}
