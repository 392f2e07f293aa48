//! Domain types for representing a planned slide deck.

use crate::normalize::{truncate_chars, TextNormalizer};
use serde::Serialize;

/// Maximum number of slides in a plan.
pub const MAX_SLIDES: usize = 20;

/// Maximum number of bullets on a slide.
pub const MAX_BULLETS: usize = 6;

/// Maximum title length, in characters.
pub const MAX_TITLE_CHARS: usize = 200;

/// Maximum notes length, in characters.
pub const MAX_NOTES_CHARS: usize = 2000;

/// Placeholder title used when a title is empty after trimming.
const EMPTY_TITLE: &str = " ";

/// An ordered, non-empty sequence of at most [`MAX_SLIDES`] slides.
///
/// Serializes as `{"slides": [...]}`, the same shape providers are asked
/// to return.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlidePlan {
    slides: Vec<Slide>,
}

impl SlidePlan {
    /// Build a plan from slides, keeping the first [`MAX_SLIDES`].
    ///
    /// Returns `None` when there are no slides; callers decide which
    /// error that is.
    pub fn from_slides(mut slides: Vec<Slide>) -> Option<Self> {
        if slides.is_empty() {
            return None;
        }
        if slides.len() > MAX_SLIDES {
            log::debug!(
                "Truncating plan from {} to {} slides",
                slides.len(),
                MAX_SLIDES
            );
            slides.truncate(MAX_SLIDES);
        }
        Some(Self { slides })
    }

    /// Slides in presentation order.
    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    /// Number of slides (always between 1 and [`MAX_SLIDES`]).
    pub fn len(&self) -> usize {
        self.slides.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    /// Iterate over slides in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Slide> {
        self.slides.iter()
    }

    /// Consume the plan, returning its slides.
    pub fn into_slides(self) -> Vec<Slide> {
        self.slides
    }
}

impl<'a> IntoIterator for &'a SlidePlan {
    type Item = &'a Slide;
    type IntoIter = std::slice::Iter<'a, Slide>;

    fn into_iter(self) -> Self::IntoIter {
        self.slides.iter()
    }
}

/// A single planned slide.
///
/// Fields are only reachable through [`Slide::new`], which applies every
/// trim and cap, so a `Slide` always satisfies the size bounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Slide {
    /// Slide title, 1 to [`MAX_TITLE_CHARS`] characters.
    title: String,

    /// Up to [`MAX_BULLETS`] trimmed bullet lines.
    bullets: Vec<String>,

    /// Optional speaker notes, at most [`MAX_NOTES_CHARS`] characters.
    #[serde(skip_serializing_if = "Option::is_none")]
    notes: Option<String>,
}

impl Slide {
    /// Create a slide, normalizing every field.
    ///
    /// - Title is trimmed, capped, and replaced with a single space if empty
    /// - Bullets are trimmed and capped in count
    /// - Notes are trimmed and capped; empty notes become `None`
    pub fn new(
        title: impl AsRef<str>,
        bullets: impl IntoIterator<Item = impl AsRef<str>>,
        notes: Option<impl AsRef<str>>,
    ) -> Self {
        let normalizer = TextNormalizer::new();

        let title = normalizer.normalize(title.as_ref());
        let title = truncate_chars(title.trim(), MAX_TITLE_CHARS).to_string();
        let title = if title.is_empty() {
            EMPTY_TITLE.to_string()
        } else {
            title
        };

        let bullets = bullets
            .into_iter()
            .take(MAX_BULLETS)
            .map(|b| normalizer.normalize(b.as_ref()).trim().to_string())
            .collect();

        let notes = notes.and_then(|n| {
            let n = normalizer.normalize(n.as_ref());
            let n = truncate_chars(n.trim(), MAX_NOTES_CHARS);
            (!n.is_empty()).then(|| n.to_string())
        });

        Self {
            title,
            bullets,
            notes,
        }
    }

    /// The slide title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Bullet lines in order.
    pub fn bullets(&self) -> &[String] {
        &self.bullets
    }

    /// Speaker notes, if any.
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }
}
