//! OpenAI chat completions provider.

use crate::http::HttpClient;
use crate::prompt::{user_prompt, SYSTEM_PROMPT};
use crate::TEMPERATURE;
use serde::{Deserialize, Serialize};
use slidegen_core::{ContentProvider, Error, PlanRequest, Result};

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

const ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";

#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f64,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// Build the request body for a user prompt.
pub fn request_body<'a>(model: &'a str, prompt: &'a str) -> ChatRequest<'a> {
    ChatRequest {
        model,
        messages: [
            ChatMessage {
                role: "system",
                content: SYSTEM_PROMPT,
            },
            ChatMessage {
                role: "user",
                content: prompt,
            },
        ],
        temperature: TEMPERATURE,
    }
}

/// Text of the first choice.
pub fn extract_text(response: ChatResponse) -> Result<String> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or_else(|| Error::ProviderError("OpenAI response contained no message".to_string()))
}

pub struct OpenAiProvider {
    http: HttpClient,
    api_key: String,
    model: String,
}

impl OpenAiProvider {
    pub(crate) fn new(http: HttpClient, api_key: String, model: String) -> Self {
        Self {
            http,
            api_key,
            model,
        }
    }
}

impl ContentProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    fn generate(&self, request: &PlanRequest) -> Result<Option<String>> {
        let prompt = user_prompt(request);
        let authorization = format!("Bearer {}", self.api_key);
        log::debug!("Requesting plan from OpenAI model {}", self.model);

        let response: ChatResponse = self.http.post_json(
            ENDPOINT,
            &[("Authorization", authorization.as_str())],
            &request_body(&self.model, &prompt),
        )?;
        extract_text(response).map(Some)
    }
}
