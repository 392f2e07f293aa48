//! Deterministic, provider-free planning.

use crate::error::{Error, Result};
use crate::normalize::TextNormalizer;
use crate::segment::segment;
use crate::synthesize::synthesize;
use crate::types::SlidePlan;

/// Build a slide plan from raw text without any external provider.
///
/// `guidance` is accepted so both planning paths share one signature, but
/// it does not influence segmentation or synthesis yet.
pub fn assemble(text: &str, guidance: Option<&str>, want_notes: bool) -> Result<SlidePlan> {
    if guidance.is_some_and(|g| !g.trim().is_empty()) {
        log::debug!("Guidance is not used by the deterministic planner");
    }

    let normalized = TextNormalizer::new().normalize(text);
    let blocks = segment(&normalized);
    log::debug!("Assembling {} slides", blocks.len());

    let slides = blocks
        .iter()
        .map(|block| synthesize(block, want_notes))
        .collect();

    SlidePlan::from_slides(slides).ok_or(Error::EmptyInput)
}
