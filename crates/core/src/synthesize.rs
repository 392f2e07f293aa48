//! Turning one content block into a slide.

use crate::normalize::truncate_with_marker;
use crate::types::{Slide, MAX_BULLETS};
use regex::Regex;
use std::sync::LazyLock;

/// Regex matching a Markdown bullet marker at the start of a line.
static BULLET_MARKER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*[-*+]\s+").unwrap());

/// Maximum synthesized title length, in characters.
pub const MAX_SYNTHESIZED_TITLE_CHARS: usize = 80;

/// Title used when a block has no extractable sentence.
const FALLBACK_TITLE: &str = "Slide";

/// Build a slide from a content block.
pub fn synthesize(block: &str, want_notes: bool) -> Slide {
    let title = make_title(block);
    let bullets = make_bullets(block);
    let notes = want_notes.then(|| format!("Key talking points for: {}", title));

    Slide::new(title, bullets, notes)
}

/// First sentence of the block, shortened to a title.
pub fn make_title(block: &str) -> String {
    match split_sentences(block).first() {
        Some(first) => truncate_with_marker(first, MAX_SYNTHESIZED_TITLE_CHARS),
        None => FALLBACK_TITLE.to_string(),
    }
}

/// Bullet lines for a block.
///
/// Explicit Markdown bullets win; otherwise the block is split into
/// sentences, and a single-sentence block becomes one bullet.
pub fn make_bullets(block: &str) -> Vec<String> {
    let explicit: Vec<String> = block
        .lines()
        .filter(|line| BULLET_MARKER_REGEX.is_match(line))
        .map(|line| BULLET_MARKER_REGEX.replace(line, "").trim().to_string())
        .take(MAX_BULLETS)
        .collect();

    if !explicit.is_empty() {
        return explicit;
    }

    let sentences = split_sentences(block);
    if sentences.len() <= 1 {
        return vec![block.trim().to_string()];
    }

    sentences
        .into_iter()
        .take(MAX_BULLETS)
        .map(str::to_string)
        .collect()
}

/// Split text after `.`, `!` or `?` when followed by whitespace.
///
/// Text with no terminator comes back as a single sentence; empty text
/// yields no sentences.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let text = text.trim();
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut prev: Option<char> = None;
    let mut chars = text.char_indices().peekable();

    while let Some((idx, c)) = chars.next() {
        if c.is_whitespace() && matches!(prev, Some('.' | '!' | '?')) {
            let sentence = text[start..idx].trim();
            if !sentence.is_empty() {
                sentences.push(sentence);
            }

            // Swallow the rest of the whitespace run
            let mut end = idx + c.len_utf8();
            while let Some(&(next_idx, next)) = chars.peek() {
                if !next.is_whitespace() {
                    break;
                }
                end = next_idx + next.len_utf8();
                chars.next();
            }
            start = end;
            prev = None;
            continue;
        }
        prev = Some(c);
    }

    let rest = text[start..].trim();
    if !rest.is_empty() {
        sentences.push(rest);
    }

    sentences
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::TRUNCATION_MARKER;

    #[test]
    fn test_split_sentences() {
        assert_eq!(
            split_sentences("One. Two! Three? Four"),
            vec!["One.", "Two!", "Three?", "Four"]
        );
        assert_eq!(split_sentences("No terminator here"), vec!["No terminator here"]);
        assert_eq!(split_sentences("Trailing dot."), vec!["Trailing dot."]);
        assert!(split_sentences("   ").is_empty());
    }

    #[test]
    fn test_split_sentences_needs_whitespace() {
        // Decimal points and abbreviations without a following space stay put
        assert_eq!(split_sentences("Pi is 3.14 roughly."), vec!["Pi is 3.14 roughly."]);
        assert_eq!(split_sentences("a.b.c"), vec!["a.b.c"]);
    }

    #[test]
    fn test_split_sentences_across_lines() {
        assert_eq!(
            split_sentences("First line.\n\n  Second line."),
            vec!["First line.", "Second line."]
        );
    }

    #[test]
    fn test_single_sentence_block() {
        let slide = synthesize("Only one sentence here.", false);

        assert_eq!(slide.title(), "Only one sentence here.");
        assert_eq!(slide.bullets(), ["Only one sentence here."]);
        assert_eq!(slide.notes(), None);
    }

    #[test]
    fn test_markdown_bullets_preferred() {
        let slide = synthesize("- a\n- b\n- c", false);
        assert_eq!(slide.bullets(), ["a", "b", "c"]);
    }

    #[test]
    fn test_mixed_bullet_markers() {
        let bullets = make_bullets("Intro. More intro.\n* one\n  + two\n- three");
        assert_eq!(bullets, vec!["one", "two", "three"]);
    }

    #[test]
    fn test_bullets_capped() {
        let block = (1..=9)
            .map(|i| format!("- item {}", i))
            .collect::<Vec<_>>()
            .join("\n");
        let bullets = make_bullets(&block);

        assert_eq!(bullets.len(), MAX_BULLETS);
        assert_eq!(bullets[5], "item 6");
    }

    #[test]
    fn test_sentence_bullets() {
        let bullets = make_bullets("Alpha. Beta. Gamma.");
        assert_eq!(bullets, vec!["Alpha.", "Beta.", "Gamma."]);

        let many = (1..=8).map(|i| format!("S{}.", i)).collect::<Vec<_>>().join(" ");
        let bullets = make_bullets(&many);
        assert_eq!(bullets.len(), MAX_BULLETS);
        assert_eq!(bullets[0], "S1.");
    }

    #[test]
    fn test_hyphenated_word_is_not_bullet() {
        let bullets = make_bullets("-not a bullet. Still not.");
        assert_eq!(bullets, vec!["-not a bullet.", "Still not."]);
    }

    #[test]
    fn test_title_truncated() {
        let block = format!("{} end.", "word ".repeat(40));
        let title = make_title(&block);

        assert_eq!(title.chars().count(), MAX_SYNTHESIZED_TITLE_CHARS);
        assert!(title.ends_with(TRUNCATION_MARKER));
    }

    #[test]
    fn test_fallback_title() {
        assert_eq!(make_title("   "), "Slide");
    }

    #[test]
    fn test_title_is_first_sentence() {
        assert_eq!(make_title("Big news! Details follow."), "Big news!");
    }

    #[test]
    fn test_notes_reference_title() {
        let slide = synthesize("Quarterly results. Revenue grew.", true);
        assert_eq!(slide.notes(), Some("Key talking points for: Quarterly results."));
    }
}
