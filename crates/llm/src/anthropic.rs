//! Anthropic messages provider.

use crate::http::HttpClient;
use crate::prompt::{user_prompt, SYSTEM_PROMPT};
use crate::TEMPERATURE;
use serde::{Deserialize, Serialize};
use slidegen_core::{ContentProvider, Error, PlanRequest, Result};

pub const DEFAULT_MODEL: &str = "claude-3-haiku-20240307";

const ENDPOINT: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 2000;

#[derive(Debug, Serialize)]
pub struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f64,
    system: &'static str,
    messages: [Message<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

/// Build the request body for a user prompt.
pub fn request_body<'a>(model: &'a str, prompt: &'a str) -> MessagesRequest<'a> {
    MessagesRequest {
        model,
        max_tokens: MAX_TOKENS,
        temperature: TEMPERATURE,
        system: SYSTEM_PROMPT,
        messages: [Message {
            role: "user",
            content: prompt,
        }],
    }
}

/// Concatenated text of all text blocks.
pub fn extract_text(response: MessagesResponse) -> Result<String> {
    let texts: Vec<String> = response
        .content
        .into_iter()
        .filter(|b| b.kind == "text")
        .filter_map(|b| b.text)
        .collect();

    if texts.is_empty() {
        return Err(Error::ProviderError(
            "Anthropic response contained no text".to_string(),
        ));
    }
    Ok(texts.concat())
}

pub struct AnthropicProvider {
    http: HttpClient,
    api_key: String,
    model: String,
}

impl AnthropicProvider {
    pub(crate) fn new(http: HttpClient, api_key: String, model: String) -> Self {
        Self {
            http,
            api_key,
            model,
        }
    }
}

impl ContentProvider for AnthropicProvider {
    fn name(&self) -> &str {
        "anthropic"
    }

    fn generate(&self, request: &PlanRequest) -> Result<Option<String>> {
        let prompt = user_prompt(request);
        log::debug!("Requesting plan from Anthropic model {}", self.model);

        let response: MessagesResponse = self.http.post_json(
            ENDPOINT,
            &[
                ("x-api-key", self.api_key.as_str()),
                ("anthropic-version", API_VERSION),
            ],
            &request_body(&self.model, &prompt),
        )?;
        extract_text(response).map(Some)
    }
}
