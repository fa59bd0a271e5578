// * Gemini generateContent wire types and call

use crate::config::constants::{ENRICH_MAX_TOKENS, ENRICH_TEMPERATURE};
use crate::enrich::EnrichError;
use reqwest::Client;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
pub struct Content {
    pub parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
pub struct Part {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct GenerationConfig {
    pub temperature: f32,
    #[serde(rename = "maxOutputTokens")]
    pub max_output_tokens: u32,
    #[serde(rename = "topP")]
    pub top_p: f32,
    #[serde(rename = "topK")]
    pub top_k: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}

impl GenerateContentRequest {
    pub fn single_prompt(prompt: String) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: ENRICH_TEMPERATURE,
                max_output_tokens: ENRICH_MAX_TOKENS,
                top_p: 0.8,
                top_k: 40,
            },
        }
    }
}

/// One generateContent call, returning the raw generated text.
pub async fn generate(
    client: &Client,
    base: &str,
    api_key: &str,
    model: &str,
    prompt: String,
) -> Result<String, EnrichError> {
    let url = format!("{base}/models/{model}:generateContent?key={api_key}");
    let request = GenerateContentRequest::single_prompt(prompt);

    tracing::debug!(model, "gemini generateContent");

    let response = client.post(&url).json(&request).send().await?;
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        let message = serde_json::from_str::<GeminiError>(&body)
            .map(|e| e.error.message)
            .unwrap_or(body);
        return Err(EnrichError::Api {
            status: status.as_u16(),
            message,
        });
    }

    let parsed: GenerateContentResponse =
        serde_json::from_str(&body).map_err(|_| EnrichError::EmptyResponse)?;

    parsed
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .and_then(|c| c.parts.into_iter().next())
        .map(|p| p.text)
        .filter(|t| !t.is_empty())
        .ok_or(EnrichError::EmptyResponse)
}
