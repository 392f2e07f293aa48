//! Google Gemini `generateContent` provider.

use crate::http::HttpClient;
use crate::prompt::{user_prompt, SYSTEM_PROMPT};
use crate::TEMPERATURE;
use serde::{Deserialize, Serialize};
use slidegen_core::{ContentProvider, Error, PlanRequest, Result};

pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

const ENDPOINT_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: [Part<'a>; 2],
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f64,
}

#[derive(Debug, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

/// Endpoint for a model.
pub fn endpoint(model: &str) -> String {
    format!("{}/{}:generateContent", ENDPOINT_BASE, model)
}

/// Build the request body: schema instructions and prompt as two parts.
pub fn request_body(prompt: &str) -> GenerateRequest<'_> {
    GenerateRequest {
        contents: [Content {
            role: "user",
            parts: [Part { text: SYSTEM_PROMPT }, Part { text: prompt }],
        }],
        generation_config: GenerationConfig {
            temperature: TEMPERATURE,
        },
    }
}

/// Concatenated text parts of the first candidate.
pub fn extract_text(response: GenerateResponse) -> Result<String> {
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.is_empty() {
        return Err(Error::ProviderError(
            "Gemini response contained no text".to_string(),
        ));
    }
    Ok(text)
}

pub struct GeminiProvider {
    http: HttpClient,
    api_key: String,
    model: String,
}

impl GeminiProvider {
    pub(crate) fn new(http: HttpClient, api_key: String, model: String) -> Self {
        Self {
            http,
            api_key,
            model,
        }
    }
}

impl ContentProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    fn generate(&self, request: &PlanRequest) -> Result<Option<String>> {
        let prompt = user_prompt(request);
        log::debug!("Requesting plan from Gemini model {}", self.model);

        // Key goes in a header so it never appears in a URL
        let response: GenerateResponse = self.http.post_json(
            &endpoint(&self.model),
            &[("x-goog-api-key", self.api_key.as_str())],
            &request_body(&prompt),
        )?;
        extract_text(response).map(Some)
    }
}
