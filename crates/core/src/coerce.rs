//! Recovering a slide plan from provider output.
//!
//! Providers are asked for bare JSON but often wrap it in code fences or
//! surround it with prose. Each stage below either cleans the text or passes
//! it through untouched; only parsing and shape validation can fail.
//!
//! Errors describe what was wrong structurally and never quote the provider
//! text, which may echo user content.

use crate::error::{Error, Result};
use crate::types::{Slide, SlidePlan};
use serde_json::{Map, Value};

/// Code fence delimiter.
const FENCE: &str = "```";

/// Coerce raw provider text into a validated slide plan.
pub fn coerce(raw: &str) -> Result<SlidePlan> {
    let unfenced = strip_code_fences(raw);
    let candidate = extract_object(unfenced);
    let payload = parse_payload(candidate)?;
    let entries = slides_array(&payload)?;

    let slides: Vec<Slide> = entries
        .iter()
        .enumerate()
        .filter_map(|(idx, entry)| match entry.as_object() {
            Some(obj) => Some(slide_from_object(obj)),
            None => {
                log::debug!("Skipping slide entry {}: not an object", idx);
                None
            }
        })
        .collect();

    log::debug!("Coerced {} of {} slide entries", slides.len(), entries.len());

    SlidePlan::from_slides(slides).ok_or_else(|| {
        Error::MalformedProviderOutput("`slides` contains no slide objects".to_string())
    })
}

/// Remove a leading fence (with optional language tag) and a trailing fence.
pub fn strip_code_fences(raw: &str) -> &str {
    let mut text = raw.trim();

    if let Some(rest) = text.strip_prefix(FENCE) {
        text = rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    }
    if let Some(rest) = text.strip_suffix(FENCE) {
        text = rest;
    }

    text.trim()
}

/// Narrow text to the span from the first `{` to the last `}`, if any.
pub fn extract_object(text: &str) -> &str {
    match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if start < end => &text[start..=end],
        _ => text,
    }
}

/// Parse the candidate payload as JSON.
fn parse_payload(candidate: &str) -> Result<Value> {
    serde_json::from_str(candidate).map_err(|e| {
        Error::MalformedProviderOutput(format!(
            "not valid JSON (line {}, column {})",
            e.line(),
            e.column()
        ))
    })
}

/// Require an object with a `slides` array.
fn slides_array(payload: &Value) -> Result<&Vec<Value>> {
    let obj = payload
        .as_object()
        .ok_or_else(|| Error::MalformedProviderOutput("expected a JSON object".to_string()))?;

    match obj.get("slides") {
        Some(Value::Array(entries)) => Ok(entries),
        Some(_) => Err(Error::MalformedProviderOutput(
            "`slides` is not an array".to_string(),
        )),
        None => Err(Error::MalformedProviderOutput(
            "missing `slides` field".to_string(),
        )),
    }
}

/// Normalize one slide object; missing fields take their empty defaults.
fn slide_from_object(obj: &Map<String, Value>) -> Slide {
    let title = obj.get("title").and_then(scalar_text).unwrap_or_default();

    let bullets: Vec<String> = match obj.get("bullets") {
        Some(Value::Array(items)) => items.iter().filter_map(scalar_text).collect(),
        _ => Vec::new(),
    };

    let notes = obj.get("notes").and_then(scalar_text);

    Slide::new(title, bullets, notes)
}

/// Text of a scalar JSON value; `null` and containers have none.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{MAX_BULLETS, MAX_SLIDES};
    use proptest::prelude::*;

    const PAYLOAD: &str = r#"{"slides": [
        {"title": "Intro", "bullets": ["one", "two", "three"]},
        {"title": "Details", "bullets": ["four"], "notes": "Say hello"}
    ]}"#;

    fn malformed(result: Result<SlidePlan>) -> String {
        match result {
            Err(Error::MalformedProviderOutput(reason)) => reason,
            other => panic!("expected malformed output, got {:?}", other),
        }
    }

    #[test]
    fn test_clean_payload() {
        let plan = coerce(PAYLOAD).unwrap();

        assert_eq!(plan.len(), 2);
        assert_eq!(plan.slides()[0].title(), "Intro");
        assert_eq!(plan.slides()[0].bullets(), ["one", "two", "three"]);
        assert_eq!(plan.slides()[0].notes(), None);
        assert_eq!(plan.slides()[1].notes(), Some("Say hello"));
    }

    #[test]
    fn test_fenced_payload_matches_unfenced() {
        let expected = coerce(PAYLOAD).unwrap();

        for fenced in [
            format!("```json\n{}\n```", PAYLOAD),
            format!("```\n{}\n```", PAYLOAD),
            format!("```JSON{}```", PAYLOAD),
            format!("  ```json\n{}\n```  \n", PAYLOAD),
        ] {
            assert_eq!(coerce(&fenced).unwrap(), expected);
        }
    }

    #[test]
    fn test_payload_inside_prose() {
        let noisy = format!("Sure! Here is your plan:\n{}\nLet me know if you need more.", PAYLOAD);
        assert_eq!(coerce(&noisy).unwrap(), coerce(PAYLOAD).unwrap());
    }

    #[test]
    fn test_idempotent_on_serialized_plan() {
        let plan = coerce(PAYLOAD).unwrap();
        let json = serde_json::to_string(&plan).unwrap();
        assert_eq!(coerce(&json).unwrap(), plan);
    }

    #[test]
    fn test_garbage_is_malformed() {
        let reason = malformed(coerce("I'm sorry, I can't help with that."));
        assert!(reason.starts_with("not valid JSON"));
    }

    #[test]
    fn test_missing_slides_field() {
        assert_eq!(malformed(coerce(r#"{"pages": []}"#)), "missing `slides` field");
    }

    #[test]
    fn test_slides_wrong_shape() {
        assert_eq!(
            malformed(coerce(r#"{"slides": {"title": "x"}}"#)),
            "`slides` is not an array"
        );
    }

    #[test]
    fn test_top_level_array_rejected() {
        let reason = malformed(coerce(r#"[{"slides": []}]"#));
        // Brace extraction narrows to the inner object, whose slides are empty
        assert_eq!(reason, "`slides` contains no slide objects");

        assert_eq!(malformed(coerce("[1, 2]")), "expected a JSON object");
    }

    #[test]
    fn test_empty_slides_rejected() {
        malformed(coerce(r#"{"slides": []}"#));
        malformed(coerce(r#"{"slides": [1, "two", null]}"#));
    }

    #[test]
    fn test_error_does_not_leak_content() {
        let secret = "sk-live-very-secret-user-text";
        for raw in [
            format!("{{\"slides\": \"{}\"", secret),
            format!("{{\"notes\": \"{}\"}}", secret),
            secret.to_string(),
        ] {
            let err = coerce(&raw).unwrap_err();
            assert!(!err.to_string().contains(secret));
        }
    }

    #[test]
    fn test_missing_fields_default() {
        let plan = coerce(r#"{"slides": [{"title": "Bare"}, {}]}"#).unwrap();

        assert_eq!(plan.slides()[0].bullets().len(), 0);
        assert_eq!(plan.slides()[0].notes(), None);
        assert_eq!(plan.slides()[1].title(), " ");
    }

    #[test]
    fn test_scalar_values_stringified() {
        let plan = coerce(
            r#"{"slides": [{"title": 2024, "bullets": ["a", 3, true, null, ["x"]], "notes": null}]}"#,
        )
        .unwrap();
        let slide = &plan.slides()[0];

        assert_eq!(slide.title(), "2024");
        assert_eq!(slide.bullets(), ["a", "3", "true"]);
        assert_eq!(slide.notes(), None);
    }

    #[test]
    fn test_caps_applied() {
        let bullets: Vec<String> = (0..10).map(|i| format!("\" b{} \"", i)).collect();
        let slides: Vec<String> = (0..30)
            .map(|i| format!(r#"{{"title": "S{}", "bullets": [{}]}}"#, i, bullets.join(",")))
            .collect();
        let raw = format!(r#"{{"slides": [{}]}}"#, slides.join(","));

        let plan = coerce(&raw).unwrap();
        assert_eq!(plan.len(), MAX_SLIDES);
        assert_eq!(plan.slides()[19].title(), "S19");
        assert!(plan.iter().all(|s| s.bullets().len() == MAX_BULLETS));
        assert_eq!(plan.slides()[0].bullets()[0], "b0");
    }

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(strip_code_fences("```json\n{}\n```"), "{}");
        assert_eq!(strip_code_fences("{}"), "{}");
        assert_eq!(strip_code_fences("```{}"), "{}");
    }

    #[test]
    fn test_extract_object() {
        assert_eq!(extract_object("xx {\"a\": {\"b\": 1}} yy"), "{\"a\": {\"b\": 1}}");
        assert_eq!(extract_object("no braces"), "no braces");
        assert_eq!(extract_object("} backwards {"), "} backwards {");
    }

    proptest! {
        #[test]
        fn prop_never_partial(raw in ".{0,400}") {
            match coerce(&raw) {
                Ok(plan) => {
                    prop_assert!(!plan.is_empty());
                    prop_assert!(plan.len() <= MAX_SLIDES);
                }
                Err(e) => prop_assert!(matches!(e, Error::MalformedProviderOutput(_))),
            }
        }
    }
}
