//! Local humanization engine: deterministic rewrite rules per tone and degree.
//!
//! Stands in for a real model. Same input, same output, no I/O. Callers cap
//! input size before getting here; the engine itself accepts any length.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::job::{Degree, Tone};

const CASUAL_TAG: &str = " You know what I mean?";

static WORD_GET: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bget\b").unwrap());
static WORD_SHOW: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bshow\b").unwrap());

/// Rewrites `text` for the given tone and degree.
pub fn transform(text: &str, tone: Tone, degree: Degree) -> String {
    if text.is_empty() {
        return String::new();
    }

    match (tone, degree) {
        (Tone::Casual, Degree::Low) => text
            .replace(". ", ". Also, ")
            .replace("However,", "But"),
        (Tone::Casual, Degree::Medium) => text
            .replace("utilize", "use")
            .replace("facilitate", "help")
            .replace("Additionally,", "Plus,"),
        (Tone::Casual, Degree::High) => tag_sentences(text),
        (Tone::Formal, Degree::Low) => text
            .replace("can't", "cannot")
            .replace("won't", "will not"),
        (Tone::Formal, Degree::Medium) => {
            let text = WORD_GET.replace_all(text, "obtain");
            WORD_SHOW.replace_all(&text, "demonstrate").into_owned()
        }
        (Tone::Formal, Degree::High) => {
            format!("In conclusion, {}", text.replace(". ", ". Furthermore, "))
        }
    }
}

/// Tags every non-blank sentence with the casual tag. Blank pieces (after a
/// trailing period, or between consecutive periods) pass through untouched,
/// so the join leaves their separating spaces in place.
fn tag_sentences(text: &str) -> String {
    text.split('.')
        .map(|piece| match piece.trim() {
            "" => piece.to_string(),
            sentence => format!("{sentence}.{CASUAL_TAG}"),
        })
        .collect::<Vec<_>>()
        .join(" ")
}
