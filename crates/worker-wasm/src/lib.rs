//! WASM-compatible wrapper for slide planning.
//!
//! This crate exposes deterministic planning, provider output coercion and
//! outline formatting to JavaScript for use in Cloudflare Workers. The worker
//! calls the content provider itself and hands the raw reply to
//! [`coerce_plan`].

use serde::Serialize;
use slidegen_core::{assemble, coerce, OutlineFormatter, SlidePlan};
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn init() {
    // Set up better panic messages in the console
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Result of planning slides.
#[derive(Debug, Serialize)]
pub struct PlanResult {
    /// Number of slides in the plan.
    pub slide_count: usize,
    /// The plan itself, shaped as `{"slides": [...]}`.
    pub plan: SlidePlan,
}

/// Result of formatting a plan as an outline.
#[derive(Debug, Serialize)]
pub struct OutlineResult {
    /// The Markdown outline.
    pub text: String,
    /// Number of slides in the outline.
    pub slide_count: usize,
}

/// Plan slides from text with the built-in planner.
///
/// # Arguments
/// * `text` - Raw text or Markdown
/// * `guidance` - Optional one-line guidance (not used by the built-in planner)
/// * `want_notes` - Whether to generate speaker notes
///
/// # Returns
/// A JavaScript object with the plan, or throws on error.
#[wasm_bindgen]
pub fn plan_text(text: &str, guidance: Option<String>, want_notes: bool) -> Result<JsValue, JsValue> {
    let result = plan_text_impl(text, guidance.as_deref(), want_notes).map_err(js_error)?;
    to_js(&result)
}

fn plan_text_impl(text: &str, guidance: Option<&str>, want_notes: bool) -> Result<PlanResult, String> {
    let plan = assemble(text, guidance, want_notes).map_err(|e| e.to_string())?;
    Ok(PlanResult {
        slide_count: plan.len(),
        plan,
    })
}

/// Turn raw content-provider output into a slide plan.
///
/// # Arguments
/// * `raw` - The provider's reply text, possibly wrapped in code fences
///
/// # Returns
/// A JavaScript object with the plan, or throws if the reply holds no plan.
#[wasm_bindgen]
pub fn coerce_plan(raw: &str) -> Result<JsValue, JsValue> {
    let result = coerce_plan_impl(raw).map_err(js_error)?;
    to_js(&result)
}

fn coerce_plan_impl(raw: &str) -> Result<PlanResult, String> {
    let plan = coerce(raw).map_err(|e| e.to_string())?;
    Ok(PlanResult {
        slide_count: plan.len(),
        plan,
    })
}

/// Format a plan as a Markdown outline.
///
/// # Arguments
/// * `raw_plan_json` - A plan as JSON, `{"slides": [...]}`
/// * `include_notes` - Whether speaker notes are included as block quotes
///
/// # Returns
/// A JavaScript object with the outline text.
#[wasm_bindgen]
pub fn format_outline(raw_plan_json: &str, include_notes: bool) -> Result<JsValue, JsValue> {
    let result = format_outline_impl(raw_plan_json, include_notes).map_err(js_error)?;
    to_js(&result)
}

fn format_outline_impl(raw_plan_json: &str, include_notes: bool) -> Result<OutlineResult, String> {
    let plan = coerce(raw_plan_json).map_err(|e| e.to_string())?;
    let formatter = OutlineFormatter::new().with_notes(include_notes);

    Ok(OutlineResult {
        text: formatter.format_with_newline(&plan),
        slide_count: plan.len(),
    })
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value)
        .map_err(|e| js_error(format!("Serialization error: {}", e)))
}

fn js_error(message: String) -> JsValue {
    js_sys::Error::new(&message).into()
}
