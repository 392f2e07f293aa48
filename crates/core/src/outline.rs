//! Markdown outline output for previewing a plan.
//!
//! Each slide becomes a level-one heading followed by its bullets, with
//! slides separated by a blank line.

use crate::types::{Slide, SlidePlan};

/// Formatter for Markdown outline previews.
#[derive(Debug, Clone)]
pub struct OutlineFormatter {
    /// Whether speaker notes are included as block quotes.
    include_notes: bool,
}

impl Default for OutlineFormatter {
    fn default() -> Self {
        Self {
            include_notes: true,
        }
    }
}

impl OutlineFormatter {
    /// Create a new formatter that includes notes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether speaker notes are included.
    pub fn with_notes(mut self, include: bool) -> Self {
        self.include_notes = include;
        self
    }

    /// Format a plan as a Markdown outline.
    ///
    /// # Example output
    /// ```text
    /// # Quarterly results
    ///
    /// - Revenue grew.
    /// - Costs fell.
    ///
    /// > Key talking points for: Quarterly results
    /// ```
    pub fn format(&self, plan: &SlidePlan) -> String {
        plan.iter()
            .map(|slide| self.format_slide(slide))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Format and add a trailing newline.
    pub fn format_with_newline(&self, plan: &SlidePlan) -> String {
        format!("{}\n", self.format(plan))
    }

    fn format_slide(&self, slide: &Slide) -> String {
        let mut sections = vec![format!("# {}", single_line(slide.title()))];

        if !slide.bullets().is_empty() {
            let bullets = slide
                .bullets()
                .iter()
                .map(|b| format!("- {}", single_line(b)))
                .collect::<Vec<_>>()
                .join("\n");
            sections.push(bullets);
        }

        if self.include_notes {
            if let Some(notes) = slide.notes() {
                let quoted = notes
                    .lines()
                    .map(|l| format!("> {}", l).trim_end().to_string())
                    .collect::<Vec<_>>()
                    .join("\n");
                sections.push(quoted);
            }
        }

        sections.join("\n\n")
    }
}

/// Collapse embedded line breaks so a field stays on one outline line.
fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
