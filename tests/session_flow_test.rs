use tabflow::config::Settings;
use tabflow::enrich::{EnhanceStyle, Enricher};
use tabflow::network::PageFetcher;
use tabflow::notion::RecordWriter;
use tabflow::session::{ClipSession, SessionError, SessionState};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PAGE: &str = r#"<html>
<head><title>Borrow Checker Guide</title>
<meta name="description" content="Ownership explained."></head>
<body><article>Lifetimes and borrows.</article></body>
</html>"#;

async fn page_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/guide"))
        .respond_with(ResponseTemplate::new(200).set_body_string(PAGE))
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn test_load_captures_page_and_reaches_ready() {
    let server = page_server().await;
    let mut session = ClipSession::new(Settings::default());
    let fetcher = PageFetcher::new().unwrap();

    session
        .load(&fetcher, &format!("{}/guide", server.uri()))
        .await
        .unwrap();

    assert_eq!(session.state(), SessionState::Ready);
    let record = session.record();
    assert_eq!(record.title, "Borrow Checker Guide");
    assert_eq!(record.description, "Ownership explained.");
}

#[tokio::test]
async fn test_edits_and_tags_flow_into_saved_record() {
    let page = page_server().await;
    let notion = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/pages"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": "page-1"})),
        )
        .expect(1)
        .mount(&notion)
        .await;

    let mut settings = Settings::default();
    settings.notion_api_url = notion.uri();
    settings.notion_api_key = "secret".to_string();
    settings.notion_database_id = "db-1".to_string();

    let mut session = ClipSession::new(settings);
    session
        .load(&PageFetcher::new().unwrap(), &format!("{}/guide", page.uri()))
        .await
        .unwrap();

    session.set_title("Borrowing, Annotated").unwrap();
    session.add_tag("rust").unwrap();
    session.add_tag("ownership").unwrap();
    session.remove_tag(1).unwrap();

    let id = session.save(&RecordWriter::new()).await.unwrap();
    assert_eq!(id.0, "page-1");
    assert_eq!(session.state(), SessionState::Success);

    let requests = notion.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(
        body["properties"]["Name"]["title"][0]["text"]["content"],
        "Borrowing, Annotated"
    );
    assert_eq!(body["properties"]["Tags"]["multi_select"][0]["name"], "rust");
    assert!(body["properties"]["Tags"]["multi_select"].as_array().unwrap().len() == 1);
}

#[tokio::test]
async fn test_failed_save_returns_to_ready_with_error() {
    let page = page_server().await;
    let notion = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/pages"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "message": "API token is invalid."
        })))
        .mount(&notion)
        .await;

    let mut settings = Settings::default();
    settings.notion_api_url = notion.uri();
    settings.notion_api_key = "bad".to_string();
    settings.notion_database_id = "db-1".to_string();

    let mut session = ClipSession::new(settings);
    session
        .load(&PageFetcher::new().unwrap(), &format!("{}/guide", page.uri()))
        .await
        .unwrap();

    let err = session.save(&RecordWriter::new()).await.unwrap_err();
    assert!(matches!(err, SessionError::Write(_)));
    assert_eq!(session.state(), SessionState::Ready);
    assert!(session.last_error().unwrap().contains("API token is invalid."));

    // * Still editable after the failure
    session.set_description("retry later").unwrap();
}

#[tokio::test]
async fn test_enhance_updates_description_and_tags() {
    let page = page_server().await;
    let llm = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-1.5-flash:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "candidates": [{"content": {"parts": [{
                "text": "Description: A guide to ownership and borrowing.\nTags: rust, ownership, borrowing"
            }]}}]
        })))
        .expect(1)
        .mount(&llm)
        .await;

    let mut settings = Settings::default();
    settings.gemini_api_key = "gem-key".to_string();
    settings.gemini_models = vec!["gemini-1.5-flash".to_string()];

    let mut session = ClipSession::new(settings);
    session
        .load(&PageFetcher::new().unwrap(), &format!("{}/guide", page.uri()))
        .await
        .unwrap();
    session.add_tag("manual-tag").unwrap();

    let enricher = Enricher::with_bases(llm.uri(), "http://127.0.0.1:9");
    session
        .enhance(&enricher, EnhanceStyle::Standard)
        .await
        .unwrap();

    assert_eq!(session.state(), SessionState::Ready);
    let record = session.record();
    assert_eq!(record.description, "A guide to ownership and borrowing.");
    // * Model tags replace the manual list
    assert_eq!(record.tags, vec!["rust", "ownership", "borrowing"]);
    assert!(!session.enhancement().unwrap().fallback_generated);
}

#[tokio::test]
async fn test_enhance_without_key_is_rejected_without_network() {
    let page = page_server().await;
    let llm = MockServer::start().await;

    let mut session = ClipSession::new(Settings::default());
    session
        .load(&PageFetcher::new().unwrap(), &format!("{}/guide", page.uri()))
        .await
        .unwrap();

    let enricher = Enricher::with_bases(llm.uri(), llm.uri());
    let err = session
        .enhance(&enricher, EnhanceStyle::Standard)
        .await
        .unwrap_err();

    assert!(matches!(err, SessionError::Configuration(_)));
    assert_eq!(session.state(), SessionState::Ready);
    assert!(llm.received_requests().await.unwrap().is_empty());
}
