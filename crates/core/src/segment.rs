//! Splitting raw text into content blocks, one block per slide.
//!
//! Strategies are tried in order and the first one that yields any blocks
//! wins. Short results are then padded with paragraphs so a document with a
//! couple of long sections still turns into a handful of slides.

use crate::types::MAX_SLIDES;
use regex::Regex;
use std::sync::LazyLock;

/// Regex matching a Markdown ATX heading marker at the start of a line.
static HEADING_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^#{1,6}\s+").unwrap());

/// Regex matching one or more blank lines between paragraphs.
static PARAGRAPH_BREAK_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\s*\n").unwrap());

/// Block count the padding step tries to reach.
pub const MIN_BLOCKS: usize = 6;

/// A segmentation strategy: pure function from text to trimmed, non-empty blocks.
type Strategy = fn(&str) -> Vec<String>;

/// Strategies in the order they are tried.
const STRATEGIES: &[(&str, Strategy)] = &[
    ("headings", split_by_headings),
    ("paragraphs", split_by_paragraphs),
];

/// Split text into at most [`MAX_SLIDES`] content blocks.
///
/// Returns an empty vector for empty or whitespace-only text.
pub fn segment(text: &str) -> Vec<String> {
    let text = text.trim();
    if text.is_empty() {
        return Vec::new();
    }

    let mut blocks = STRATEGIES
        .iter()
        .find_map(|(name, strategy)| {
            let blocks = strategy(text);
            if blocks.is_empty() {
                None
            } else {
                log::debug!("Segmented by {} into {} blocks", name, blocks.len());
                Some(blocks)
            }
        })
        .unwrap_or_default();

    pad_with_paragraphs(&mut blocks, text);

    if blocks.len() > MAX_SLIDES {
        log::debug!("Dropping {} blocks past the cap", blocks.len() - MAX_SLIDES);
        blocks.truncate(MAX_SLIDES);
    }

    blocks
}

/// Split on heading lines; the text under each heading becomes a block.
///
/// Text before the first heading is kept as its own block unless it is
/// empty, so text with no heading at all comes back as a single block.
pub fn split_by_headings(text: &str) -> Vec<String> {
    HEADING_REGEX
        .split(text.trim())
        .map(str::trim)
        .filter(|chunk| !chunk.is_empty())
        .map(str::to_string)
        .collect()
}

/// Split on blank lines.
pub fn split_by_paragraphs(text: &str) -> Vec<String> {
    PARAGRAPH_BREAK_REGEX
        .split(text.trim())
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

/// Append paragraphs not yet covered by the existing blocks until there are
/// [`MIN_BLOCKS`] blocks or the paragraphs run out.
///
/// Paragraph `i` counts as used when there are already more than `i` blocks.
fn pad_with_paragraphs(blocks: &mut Vec<String>, text: &str) {
    if blocks.len() >= MIN_BLOCKS {
        return;
    }

    let paragraphs = split_by_paragraphs(text);
    let target = MIN_BLOCKS.min(paragraphs.len());
    if blocks.len() >= target {
        return;
    }

    let start = blocks.len();
    let padding: Vec<String> = paragraphs[start..target]
        .iter()
        .map(|p| HEADING_REGEX.replace_all(p, "").trim().to_string())
        .filter(|p| !p.is_empty())
        .collect();

    log::debug!("Padding {} blocks with {} paragraphs", start, padding.len());
    blocks.extend(padding);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        assert!(segment("").is_empty());
        assert!(segment("   \n\n\t  ").is_empty());
    }

    #[test]
    fn test_heading_blocks() {
        let blocks = segment("# A\nline1\n\n# B\nline2");
        assert_eq!(blocks, vec!["A\nline1", "B\nline2"]);
    }

    #[test]
    fn test_heading_levels() {
        let blocks = split_by_headings("## One\nx\n###### Six\ny");
        assert_eq!(blocks, vec!["One\nx", "Six\ny"]);
    }

    #[test]
    fn test_heading_needs_whitespace() {
        // "#tag" is not a heading and seven markers are too many
        assert_eq!(
            split_by_headings("#tag line\n####### deep"),
            vec!["#tag line\n####### deep"]
        );
    }

    #[test]
    fn test_preamble_kept_when_present() {
        let blocks = split_by_headings("Preamble text\n# First\nbody");
        assert_eq!(blocks, vec!["Preamble text", "First\nbody"]);
    }

    #[test]
    fn test_no_headings_whole_text_then_padding() {
        let text = "Cats sleep a lot.\n\nDogs bark. Dogs fetch.\n\nBirds sing.";
        let blocks = segment(text);
        assert_eq!(blocks, vec![text, "Dogs bark. Dogs fetch.", "Birds sing."]);
    }

    #[test]
    fn test_paragraph_strategy_when_headings_yield_nothing() {
        assert!(split_by_headings("   ").is_empty());
        assert_eq!(
            split_by_paragraphs("First para.\n\nSecond para.\n\n\n\nThird para."),
            vec!["First para.", "Second para.", "Third para."]
        );
    }

    #[test]
    fn test_paragraph_break_with_whitespace_lines() {
        let blocks = split_by_paragraphs("one\n   \ntwo\r\n\r\nthree");
        assert_eq!(blocks, vec!["one", "two", "three"]);
    }

    #[test]
    fn test_many_paragraphs_without_headings_capped_by_padding() {
        let text = (1..=8)
            .map(|i| format!("Paragraph {}.", i))
            .collect::<Vec<_>>()
            .join("\n\n");
        let blocks = segment(&text);

        // Whole text first, then paragraphs 2 to 6
        assert_eq!(blocks.len(), MIN_BLOCKS);
        assert_eq!(blocks[0], text);
        assert_eq!(blocks[1], "Paragraph 2.");
        assert_eq!(blocks[5], "Paragraph 6.");
    }

    #[test]
    fn test_padding_from_paragraphs_under_heading() {
        let text = "# Intro\nA\n\nB\n\nC";
        let blocks = segment(text);
        assert_eq!(blocks, vec!["Intro\nA\n\nB\n\nC", "B", "C"]);
    }

    #[test]
    fn test_padding_stops_at_min_blocks() {
        let body = (1..=10)
            .map(|i| format!("p{}", i))
            .collect::<Vec<_>>()
            .join("\n\n");
        let text = format!("# Only heading\n{}", body);
        let blocks = segment(&text);

        // Paragraph 0 is "# Only heading\np1", already covered by block 0
        assert_eq!(blocks.len(), MIN_BLOCKS);
        assert_eq!(blocks[1], "p2");
        assert_eq!(blocks[5], "p6");
    }

    #[test]
    fn test_padding_strips_heading_markers() {
        let text = "# One\nalpha\n\nbeta\n\n# Two\ngamma";
        let blocks = segment(text);
        assert_eq!(blocks, vec!["One\nalpha\n\nbeta", "Two\ngamma", "Two\ngamma"]);
        assert!(blocks.iter().all(|b| !b.starts_with('#')));
    }

    #[test]
    fn test_block_cap() {
        let text = (1..=25)
            .map(|i| format!("# Section {}\ncontent {}", i, i))
            .collect::<Vec<_>>()
            .join("\n");
        let blocks = segment(&text);

        assert_eq!(blocks.len(), MAX_SLIDES);
        assert_eq!(blocks[0], "Section 1\ncontent 1");
        assert_eq!(blocks[19], "Section 20\ncontent 20");
    }
}
