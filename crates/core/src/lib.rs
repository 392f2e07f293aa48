//! Core slide planning: turning text into a bounded slide plan, either
//! deterministically or by coercing content-generation provider output.

pub mod assemble;
pub mod coerce;
pub mod error;
pub mod normalize;
pub mod outline;
pub mod provider;
pub mod segment;
pub mod synthesize;
pub mod types;

pub use assemble::assemble;
pub use coerce::coerce;
pub use error::{Error, Result};
pub use normalize::TextNormalizer;
pub use outline::OutlineFormatter;
pub use provider::{plan_slides, ContentProvider, NoProvider, PlanRequest};
pub use segment::segment;
pub use synthesize::synthesize;
pub use types::{Slide, SlidePlan, MAX_BULLETS, MAX_NOTES_CHARS, MAX_SLIDES, MAX_TITLE_CHARS};
