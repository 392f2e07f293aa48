//! Content-generation provider seam and the planning entry point.

use crate::assemble::assemble;
use crate::coerce::coerce;
use crate::error::Result;
use crate::types::SlidePlan;

/// A request to plan slides from text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlanRequest {
    /// Raw text or Markdown to convert.
    pub text: String,

    /// Optional one-line guidance for the provider.
    pub guidance: Option<String>,

    /// Whether speaker notes should be generated.
    pub want_notes: bool,
}

impl PlanRequest {
    /// Create a request for the given text with no guidance and no notes.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Set the guidance line; blank guidance counts as none.
    pub fn with_guidance(mut self, guidance: Option<impl Into<String>>) -> Self {
        self.guidance = guidance
            .map(Into::into)
            .filter(|g: &String| !g.trim().is_empty());
        self
    }

    /// Set whether speaker notes should be generated.
    pub fn with_notes(mut self, want_notes: bool) -> Self {
        self.want_notes = want_notes;
        self
    }
}

/// Something that can generate raw slide-plan text for a request.
///
/// Returning `Ok(None)` means no external generation took place and the
/// deterministic planner should be used instead.
pub trait ContentProvider {
    /// Short provider name for logs.
    fn name(&self) -> &str;

    /// Produce raw provider output for the request.
    fn generate(&self, request: &PlanRequest) -> Result<Option<String>>;
}

/// The null provider: never generates, always defers to the deterministic planner.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProvider;

impl ContentProvider for NoProvider {
    fn name(&self) -> &str {
        "none"
    }

    fn generate(&self, _request: &PlanRequest) -> Result<Option<String>> {
        Ok(None)
    }
}

/// Plan slides for a request, routing through the provider when it answers.
pub fn plan_slides(request: &PlanRequest, provider: &dyn ContentProvider) -> Result<SlidePlan> {
    match provider.generate(request)? {
        Some(raw) => {
            log::debug!(
                "Coercing {} bytes of output from provider {}",
                raw.len(),
                provider.name()
            );
            coerce(&raw)
        }
        None => {
            log::debug!("Using deterministic planner");
            assemble(
                &request.text,
                request.guidance.as_deref(),
                request.want_notes,
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    struct CannedProvider(&'static str);

    impl ContentProvider for CannedProvider {
        fn name(&self) -> &str {
            "canned"
        }

        fn generate(&self, _request: &PlanRequest) -> Result<Option<String>> {
            Ok(Some(self.0.to_string()))
        }
    }

    struct FailingProvider;

    impl ContentProvider for FailingProvider {
        fn name(&self) -> &str {
            "failing"
        }

        fn generate(&self, _request: &PlanRequest) -> Result<Option<String>> {
            Err(Error::ProviderError("HTTP 503".to_string()))
        }
    }

    #[test]
    fn test_request_builder() {
        let request = PlanRequest::new("text")
            .with_guidance(Some("  "))
            .with_notes(true);
        assert_eq!(request.guidance, None);
        assert!(request.want_notes);

        let request = PlanRequest::new("text").with_guidance(Some("for executives"));
        assert_eq!(request.guidance.as_deref(), Some("for executives"));
    }

    #[test]
    fn test_no_provider_uses_assembler() {
        let request = PlanRequest::new("# A\nline1\n\n# B\nline2");
        let plan = plan_slides(&request, &NoProvider).unwrap();
        assert_eq!(plan.len(), 2);
    }

    #[test]
    fn test_provider_output_is_coerced() {
        let provider = CannedProvider(r#"```json
{"slides": [{"title": "From provider", "bullets": ["x"]}]}
```"#);
        let plan = plan_slides(&PlanRequest::new("ignored"), &provider).unwrap();

        assert_eq!(plan.len(), 1);
        assert_eq!(plan.slides()[0].title(), "From provider");
    }

    #[test]
    fn test_malformed_provider_output_is_terminal() {
        let provider = CannedProvider("not json at all");
        let result = plan_slides(&PlanRequest::new("# Valid\ntext"), &provider);
        assert!(matches!(result, Err(Error::MalformedProviderOutput(_))));
    }

    #[test]
    fn test_provider_error_propagates() {
        let result = plan_slides(&PlanRequest::new("text"), &FailingProvider);
        assert!(matches!(result, Err(Error::ProviderError(_))));
    }

    #[test]
    fn test_empty_text_without_provider() {
        let result = plan_slides(&PlanRequest::new("   "), &NoProvider);
        assert!(matches!(result, Err(Error::EmptyInput)));
    }
}
