//! Extractive summaries of article bodies.
//!
//! The summary of an article is simply its lead: the first
//! [`SUMMARY_SENTENCES`] sentences. Texts that are shorter than that are
//! returned untouched, which also makes [`summarize`] idempotent on short
//! input.
//!
//! Sentence boundaries follow Unicode UAX #29 (so decimals like `3.5` and
//! initialisms like `U.S. officials` stay intact), with one correction: a
//! boundary right after a courtesy or professional title such as `Mr.` or
//! `Dott.` is removed, since such a title always introduces a name.

use itertools::Itertools;
use unicode_segmentation::UnicodeSegmentation;

/// Number of sentences kept in a summary.
pub const SUMMARY_SENTENCES: usize = 5;

/// Titles (lowercase, without the trailing dot) that never end a sentence.
const TITLE_ABBREVIATIONS: &[&str] = &[
    "mr", "mrs", "ms", "dr", "prof", "sr", "jr", "st", "gen", "col", "lt", "sen", "rep", "gov",
    "sig", "sigg", "sig.ra", "dott", "dott.ssa", "avv", "ing", "geom", "mons",
];

fn ends_with_title(sentence: &str) -> bool {
    let Some(stripped) = sentence.strip_suffix('.') else {
        return false;
    };
    let last_word = stripped
        .rsplit(char::is_whitespace)
        .next()
        .unwrap_or(stripped)
        .trim_start_matches(|c: char| !c.is_alphanumeric())
        .to_lowercase();
    TITLE_ABBREVIATIONS.contains(&last_word.as_str())
}

/// Split text into trimmed sentences.
///
/// Whitespace runs are collapsed first: UAX #29 always breaks after a line
/// feed, and a line wrap inside a paragraph does not end a sentence.
pub fn split_sentences(text: &str) -> Vec<String> {
    let text = text.split_whitespace().join(" ");
    let mut sentences: Vec<String> = Vec::new();
    let mut glue_next = false;

    for raw in text.unicode_sentences() {
        let sentence = raw.trim();
        if sentence.is_empty() {
            continue;
        }
        match sentences.last_mut() {
            Some(previous) if glue_next => {
                previous.push(' ');
                previous.push_str(sentence);
            }
            _ => sentences.push(sentence.to_string()),
        }
        glue_next = sentences.last().is_some_and(|s| ends_with_title(s));
    }
    sentences
}

/// Reduce `text` to its first [`SUMMARY_SENTENCES`] sentences.
///
/// When `text` holds fewer sentences it is returned unchanged.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(summarize("Only one sentence."), "Only one sentence.");
/// ```
pub fn summarize(text: &str) -> String {
    let sentences = split_sentences(text);
    if sentences.len() >= SUMMARY_SENTENCES {
        sentences.iter().take(SUMMARY_SENTENCES).join(" ")
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LONG: &str = "The Commission adopted a new package today. It covers energy and transport. \
        Member states have six months to respond. The vote passed with 3.5 percent abstaining. \
        Reactions were mixed. Critics called it too slow. Supporters disagreed.";

    #[test]
    fn test_split_sentences_basic() {
        let sentences = split_sentences("First one. Second one! Third one?");
        assert_eq!(sentences, vec!["First one.", "Second one!", "Third one?"]);
    }

    #[test]
    fn test_split_keeps_decimals_together() {
        let sentences = split_sentences("Growth was 2.5 percent. Inflation fell.");
        assert_eq!(sentences, vec!["Growth was 2.5 percent.", "Inflation fell."]);
    }

    #[test]
    fn test_split_keeps_titles_with_names() {
        let sentences = split_sentences("Mr. Smith arrived. Il Dott. Rossi ha parlato. Fine.");
        assert_eq!(
            sentences,
            vec!["Mr. Smith arrived.", "Il Dott. Rossi ha parlato.", "Fine."]
        );
    }

    #[test]
    fn test_split_ignores_line_wraps() {
        let sentences = split_sentences("The Commission\n presented its plan today. It has three\n parts.");
        assert_eq!(
            sentences,
            vec!["The Commission presented its plan today.", "It has three parts."]
        );
    }

    #[test]
    fn test_summarize_wrapped_paragraphs() {
        let html = "<p>The Commission\n presented its plan today. It has three\n parts. Funding rises.</p>\
            <p>Talks start next week. Parliament must agree. A vote follows.</p>";
        let summary = summarize(&crate::scrapers::fetch::paragraph_text(html));
        assert_eq!(
            summary,
            "The Commission presented its plan today. It has three parts. Funding rises. \
             Talks start next week. Parliament must agree."
        );

        let raw = "The Commission\n presented its plan today. It has three\n parts. Funding rises.\n\
             Talks start next week.\nParliament must agree. A vote follows.";
        assert_eq!(split_sentences(&summarize(raw)).len(), SUMMARY_SENTENCES);
        assert!(summarize(raw).ends_with("Parliament must agree."));
    }

    #[test]
    fn test_summarize_keeps_five_sentences() {
        let summary = summarize(LONG);
        assert_eq!(split_sentences(&summary).len(), SUMMARY_SENTENCES);
        assert!(summary.starts_with("The Commission adopted"));
        assert!(summary.ends_with("Reactions were mixed."));
        assert!(!summary.contains("Critics"));
    }

    #[test]
    fn test_summarize_exactly_five() {
        let text = "One. Two. Three. Four. Five.";
        assert_eq!(summarize(text), "One. Two. Three. Four. Five.");
    }

    #[test]
    fn test_summarize_short_text_unchanged() {
        let text = "  Just two sentences.\n\nNothing more.  ";
        assert_eq!(summarize(text), text);
        assert_eq!(summarize(""), "");
    }

    #[test]
    fn test_summarize_is_idempotent() {
        let once = summarize(LONG);
        assert_eq!(summarize(&once), once);
        let short = "Short text.";
        assert_eq!(summarize(&summarize(short)), short);
    }
}
