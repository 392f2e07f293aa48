//! Prompt text sent to every provider.

use slidegen_core::PlanRequest;

/// Instructions describing the plan schema the provider must return.
pub const SYSTEM_PROMPT: &str = r#"You are a slide architect. Convert the given text into a JSON plan for slides.
Return ONLY valid JSON with this schema:
{
  "slides": [
    {"title": "string", "bullets": ["string", ...], "notes": "string (optional)"}
  ]
}
Bullets should be short, 3-6 per slide. At most 20 slides. Do not include code fences.
"#;

/// Build the user message for a request.
pub fn user_prompt(request: &PlanRequest) -> String {
    let guidance = request
        .guidance
        .as_deref()
        .map(str::trim)
        .filter(|g| !g.is_empty())
        .unwrap_or("(none)");
    let notes = if request.want_notes { "yes" } else { "no" };

    [
        format!("GUIDANCE: {}", guidance),
        format!("NOTES: {}", notes),
        "TEXT:".to_string(),
        request.text.trim().to_string(),
    ]
    .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_prompt_without_guidance() {
        let request = PlanRequest::new("  Some text\n");

        assert_eq!(
            user_prompt(&request),
            "GUIDANCE: (none)\n\nNOTES: no\n\nTEXT:\n\nSome text"
        );
    }

    #[test]
    fn test_user_prompt_with_guidance_and_notes() {
        let request = PlanRequest::new("Body")
            .with_guidance(Some(" Keep it short "))
            .with_notes(true);

        assert_eq!(
            user_prompt(&request),
            "GUIDANCE: Keep it short\n\nNOTES: yes\n\nTEXT:\n\nBody"
        );
    }

    #[test]
    fn test_system_prompt_describes_schema() {
        assert!(SYSTEM_PROMPT.contains(r#""slides""#));
        assert!(SYSTEM_PROMPT.contains("At most 20 slides"));
        assert!(SYSTEM_PROMPT.contains("Do not include code fences"));
    }
}
