//! Error types for slide planning and rendering.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while planning or rendering a slide deck.
///
/// Messages never carry user text or provider output; they describe
/// structure only, so they are safe to log and to show to callers.
#[derive(Error, Debug)]
pub enum Error {
    /// The input text produced no content blocks.
    #[error("Input text produced no slide content")]
    EmptyInput,

    /// Provider output could not be turned into a slide plan.
    #[error("Malformed provider output: {0}")]
    MalformedProviderOutput(String),

    /// The content-generation provider could not be reached or refused the request.
    #[error("Provider error: {0}")]
    ProviderError(String),

    /// The presentation template is unusable.
    #[error("Invalid template: {0}")]
    TemplateError(String),

    /// Failed to read or write a file.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// ZIP archive error (for PPTX packages).
    #[error("ZIP error: {0}")]
    ZipError(String),

    /// XML parsing or writing error (for PPTX parts).
    #[error("XML error: {0}")]
    XmlError(String),
}

impl Error {
    /// Whether the content provider failed, either unreachable or with
    /// output that holds no plan.
    pub fn is_provider_failure(&self) -> bool {
        matches!(self, Error::ProviderError(_) | Error::MalformedProviderOutput(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_failures() {
        assert!(Error::ProviderError("HTTP 500".into()).is_provider_failure());
        assert!(Error::MalformedProviderOutput("no slides".into()).is_provider_failure());
        assert!(!Error::EmptyInput.is_provider_failure());
        assert!(!Error::ZipError("bad".into()).is_provider_failure());
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            Error::EmptyInput.to_string(),
            "Input text produced no slide content"
        );
        assert_eq!(
            Error::MalformedProviderOutput("missing `slides` array".into()).to_string(),
            "Malformed provider output: missing `slides` array"
        );
    }
}
