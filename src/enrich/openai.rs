// * OpenAI chat completions wire types and call

use crate::config::constants::{ENRICH_MAX_TOKENS, ENRICH_TEMPERATURE};
use crate::enrich::EnrichError;
use reqwest::Client;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Debug, Serialize)]
pub struct ChatMessage {
    pub role: &'static str,
    pub content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ResponseMessage>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: String,
}

#[derive(Debug, Deserialize)]
struct OpenAiError {
    error: OpenAiErrorBody,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorBody {
    message: String,
}

/// One chat completion call with a system + user message pair.
pub async fn chat_completion(
    client: &Client,
    base: &str,
    api_key: &str,
    model: &str,
    system: String,
    user: String,
) -> Result<String, EnrichError> {
    let url = format!("{base}/chat/completions");
    let request = ChatCompletionRequest {
        model: model.to_string(),
        messages: vec![
            ChatMessage {
                role: "system",
                content: system,
            },
            ChatMessage {
                role: "user",
                content: user,
            },
        ],
        temperature: ENRICH_TEMPERATURE,
        max_tokens: ENRICH_MAX_TOKENS,
    };

    tracing::debug!(model, "openai chat completion");

    let response = client
        .post(&url)
        .bearer_auth(api_key)
        .json(&request)
        .send()
        .await?;
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        let message = serde_json::from_str::<OpenAiError>(&body)
            .map(|e| e.error.message)
            .unwrap_or(body);
        return Err(EnrichError::Api {
            status: status.as_u16(),
            message,
        });
    }

    let parsed: ChatCompletionResponse =
        serde_json::from_str(&body).map_err(|_| EnrichError::EmptyResponse)?;

    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message)
        .map(|m| m.content)
        .filter(|c| !c.is_empty())
        .ok_or(EnrichError::EmptyResponse)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_shape() {
        let request = ChatCompletionRequest {
            model: "gpt-4".to_string(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: "sys".to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: "usr".to_string(),
                },
            ],
            temperature: 0.7,
            max_tokens: 1000,
        };
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["model"], "gpt-4");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["role"], "user");
        assert_eq!(json["max_tokens"], 1000);
    }

    #[test]
    fn test_error_body_parsing() {
        let body = r#"{"error":{"message":"invalid api key","type":"auth"}}"#;
        let parsed: OpenAiError = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.error.message, "invalid api key");
    }
}
