//! Content-generation providers for slide planning.
//!
//! Each provider sends the plan request to a hosted model and returns the raw
//! reply text, which the core crate coerces into a slide plan.

pub mod anthropic;
pub mod gemini;
mod http;
pub mod openai;
pub mod prompt;

use http::HttpClient;
use slidegen_core::{ContentProvider, NoProvider, Result};
use std::fmt;
use std::time::Duration;

pub use anthropic::AnthropicProvider;
pub use gemini::GeminiProvider;
pub use openai::OpenAiProvider;

/// Sampling temperature used for every provider.
pub const TEMPERATURE: f64 = 0.2;

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Supported content-generation providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProviderKind {
    /// No provider; plans come from the deterministic planner.
    #[default]
    None,
    OpenAi,
    Anthropic,
    Gemini,
}

impl ProviderKind {
    /// Parse a provider name, case-insensitively.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "none" | "" => Some(Self::None),
            "openai" => Some(Self::OpenAi),
            "anthropic" => Some(Self::Anthropic),
            "gemini" => Some(Self::Gemini),
            _ => Option::None,
        }
    }

    /// Parse a provider name, treating unknown names as no provider.
    pub fn from_name_or_none(name: &str) -> Self {
        Self::from_name(name).unwrap_or_else(|| {
            log::warn!("Unknown provider '{}'; using the deterministic planner", name);
            Self::None
        })
    }

    /// Lowercase provider name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::OpenAi => "openai",
            Self::Anthropic => "anthropic",
            Self::Gemini => "gemini",
        }
    }

    /// Model used when none is configured.
    pub fn default_model(self) -> Option<&'static str> {
        match self {
            Self::None => Option::None,
            Self::OpenAi => Some(openai::DEFAULT_MODEL),
            Self::Anthropic => Some(anthropic::DEFAULT_MODEL),
            Self::Gemini => Some(gemini::DEFAULT_MODEL),
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Provider selection and credentials.
#[derive(Clone, Default)]
pub struct ProviderConfig {
    pub kind: ProviderKind,
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub timeout: Option<Duration>,
}

impl ProviderConfig {
    pub fn new(kind: ProviderKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    pub fn with_api_key(mut self, api_key: Option<impl Into<String>>) -> Self {
        self.api_key = api_key.map(Into::into);
        self
    }

    pub fn with_model(mut self, model: Option<impl Into<String>>) -> Self {
        self.model = model.map(Into::into);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// The configured key, if it is not blank.
    fn usable_api_key(&self) -> Option<&str> {
        self.api_key.as_deref().map(str::trim).filter(|k| !k.is_empty())
    }

    /// Whether this configuration would call a hosted provider.
    pub fn is_enabled(&self) -> bool {
        self.kind != ProviderKind::None && self.usable_api_key().is_some()
    }
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("kind", &self.kind)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Build the provider described by `config`.
///
/// Falls back to [`NoProvider`] when no provider is selected or the key is
/// missing.
pub fn build_provider(config: &ProviderConfig) -> Result<Box<dyn ContentProvider>> {
    if !config.is_enabled() {
        if config.kind != ProviderKind::None {
            log::warn!(
                "No API key for provider {}; using the deterministic planner",
                config.kind
            );
        }
        return Ok(Box::new(NoProvider));
    }
    let kind = config.kind;
    let api_key = config.usable_api_key().unwrap_or_default().to_string();

    let model = config
        .model
        .clone()
        .filter(|m| !m.trim().is_empty())
        .or_else(|| kind.default_model().map(str::to_string))
        .unwrap_or_default();
    let http = HttpClient::new(config.timeout.unwrap_or(DEFAULT_TIMEOUT))?;
    log::debug!("Using provider {} with model {}", kind, model);

    Ok(match kind {
        ProviderKind::OpenAi => Box::new(OpenAiProvider::new(http, api_key, model)),
        ProviderKind::Anthropic => Box::new(AnthropicProvider::new(http, api_key, model)),
        ProviderKind::Gemini => Box::new(GeminiProvider::new(http, api_key, model)),
        ProviderKind::None => Box::new(NoProvider),
    })
}
