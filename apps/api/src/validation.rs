//! Input validation and text metrics shared by the editor, auth and dashboard.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

const MIN_PASSWORD_LENGTH: usize = 8;
const SPECIAL_CHARS: &[char] = &['!', '@', '#', '$', '%', '^', '&', '*'];

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\S+@\S+\.\S+").unwrap());

/// Per-rule outcome of a password check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordValidation {
    pub min_length: bool,
    pub has_uppercase: bool,
    pub has_lowercase: bool,
    pub has_number: bool,
    pub has_special_char: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StrengthLabel {
    Weak,
    Medium,
    Strong,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PasswordStrength {
    /// Share of satisfied rules, 0 – 100.
    pub percent: u8,
    pub label: StrengthLabel,
}

impl PasswordValidation {
    fn rules(&self) -> [bool; 5] {
        [
            self.min_length,
            self.has_uppercase,
            self.has_lowercase,
            self.has_number,
            self.has_special_char,
        ]
    }

    pub fn is_valid(&self) -> bool {
        self.rules().iter().all(|&r| r)
    }

    pub fn strength(&self) -> PasswordStrength {
        let passed = self.rules().iter().filter(|&&r| r).count();
        let percent = (passed * 100 / 5) as u8;
        let label = if percent < 40 {
            StrengthLabel::Weak
        } else if percent < 80 {
            StrengthLabel::Medium
        } else {
            StrengthLabel::Strong
        };
        PasswordStrength { percent, label }
    }
}

pub fn validate_password(password: &str) -> PasswordValidation {
    PasswordValidation {
        min_length: password.chars().count() >= MIN_PASSWORD_LENGTH,
        has_uppercase: password.chars().any(|c| c.is_uppercase()),
        has_lowercase: password.chars().any(|c| c.is_lowercase()),
        has_number: password.chars().any(|c| c.is_ascii_digit()),
        has_special_char: password.chars().any(|c| SPECIAL_CHARS.contains(&c)),
    }
}

/// Loose shape check: something@something.something
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Flesch reading ease, rounded and clamped to 0 – 100. Higher is easier.
/// Returns 0 when the text has no words.
pub fn readability_score(text: &str) -> u8 {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() {
        return 0;
    }

    let sentences = text
        .split(['.', '!', '?'])
        .filter(|s| !s.trim().is_empty())
        .count()
        .max(1);
    let syllables: usize = words.iter().map(|w| count_syllables(w)).sum();

    let words_per_sentence = words.len() as f64 / sentences as f64;
    let syllables_per_word = syllables as f64 / words.len() as f64;
    let score = 206.835 - 1.015 * words_per_sentence - 84.6 * syllables_per_word;

    score.round().clamp(0.0, 100.0) as u8
}

pub fn readability_label(score: u8) -> &'static str {
    match score {
        90.. => "Very Easy",
        80..=89 => "Easy",
        70..=79 => "Fairly Easy",
        60..=69 => "Standard",
        50..=59 => "Fairly Difficult",
        30..=49 => "Difficult",
        _ => "Very Difficult",
    }
}

/// Vowel-group heuristic with a silent trailing 'e'. Never returns less than 1.
fn count_syllables(word: &str) -> usize {
    let letters: Vec<char> = word
        .chars()
        .filter(|c| c.is_alphabetic())
        .flat_map(char::to_lowercase)
        .collect();
    if letters.is_empty() {
        return 1;
    }

    let is_vowel = |c: char| matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'y');
    let mut count = 0;
    let mut prev_vowel = false;
    for &c in &letters {
        let vowel = is_vowel(c);
        if vowel && !prev_vowel {
            count += 1;
        }
        prev_vowel = vowel;
    }

    let n = letters.len();
    let silent_e = n > 2 && letters[n - 1] == 'e' && letters[n - 2] != 'l';
    if silent_e && count > 1 {
        count -= 1;
    }
    count.max(1)
}

/// Cuts `text` to at most `max_chars` characters, marking the cut with `...`.
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        None => text.to_string(),
        Some((cut, _)) => format!("{}...", &text[..cut]),
    }
}

/// Live metrics shown under the editor.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextAnalysis {
    pub word_count: usize,
    pub readability_score: u8,
    pub readability_label: &'static str,
}

pub fn analyze(text: &str) -> TextAnalysis {
    let score = readability_score(text);
    TextAnalysis {
        word_count: count_words(text),
        readability_score: score,
        readability_label: readability_label(score),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strong_password_passes_all_rules() {
        let v = validate_password("Sup3r$ecret");
        assert!(v.is_valid());
        assert_eq!(v.strength().percent, 100);
        assert_eq!(v.strength().label, StrengthLabel::Strong);
    }

    #[test]
    fn test_weak_password_reports_each_missing_rule() {
        let v = validate_password("abc");
        assert!(!v.min_length);
        assert!(!v.has_uppercase);
        assert!(v.has_lowercase);
        assert!(!v.has_number);
        assert!(!v.has_special_char);
        assert!(!v.is_valid());
        assert_eq!(v.strength().label, StrengthLabel::Weak);
    }

    #[test]
    fn test_medium_strength_band() {
        // length + lowercase + number = 3/5 = 60%
        let v = validate_password("abcdefg1");
        assert_eq!(v.strength().percent, 60);
        assert_eq!(v.strength().label, StrengthLabel::Medium);
    }

    #[test]
    fn test_special_char_set_is_limited() {
        assert!(!validate_password("Abcdefg1?").has_special_char);
        assert!(validate_password("Abcdefg1&").has_special_char);
    }

    #[test]
    fn test_email_shape() {
        assert!(is_valid_email("ada@example.com"));
        assert!(!is_valid_email("ada@example"));
        assert!(!is_valid_email("not an email"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn test_count_words_ignores_extra_whitespace() {
        assert_eq!(count_words(""), 0);
        assert_eq!(count_words("   \n\t "), 0);
        assert_eq!(count_words(" one  two\nthree\tfour "), 4);
    }

    #[test]
    fn test_readability_empty_text_is_zero() {
        assert_eq!(readability_score(""), 0);
        assert_eq!(readability_score("   "), 0);
    }

    #[test]
    fn test_readability_simple_text_scores_high() {
        assert_eq!(readability_score("The cat sat on the mat."), 100);
    }

    #[test]
    fn test_readability_dense_text_scores_low() {
        let score = readability_score(
            "Organizational responsibilities necessitate comprehensive institutional documentation.",
        );
        assert!(score < 30, "dense text scored {score}");
        assert_eq!(readability_label(score), "Very Difficult");
    }

    #[test]
    fn test_syllable_heuristic() {
        assert_eq!(count_syllables("cat"), 1);
        assert_eq!(count_syllables("table"), 2);
        assert_eq!(count_syllables("make"), 1);
        assert_eq!(count_syllables("water"), 2);
        assert_eq!(count_syllables("42"), 1);
    }

    #[test]
    fn test_truncate_short_text_unchanged() {
        assert_eq!(truncate_text("short", 100), "short");
        assert_eq!(truncate_text("exact", 5), "exact");
    }

    #[test]
    fn test_truncate_long_text_appends_ellipsis() {
        assert_eq!(truncate_text("abcdefghij", 4), "abcd...");
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate_text("héllo wörld", 7), "héllo w...");
    }

    #[test]
    fn test_analyze_combines_metrics() {
        let a = analyze("The cat sat on the mat.");
        assert_eq!(a.word_count, 6);
        assert_eq!(a.readability_label, "Very Easy");
    }
}
