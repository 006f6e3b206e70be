//! Free-text canonicalization.
//!
//! Inventory labels and lead descriptions are hand-typed: mixed case,
//! stray punctuation, Latin diacritics, loose spacing. Matching compares
//! canonical forms only; the raw text is kept for display.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Canonical comparison form: lowercase, diacritics stripped, every
/// character that is not an ASCII letter or digit removed.
///
/// Pure and idempotent. May return an empty string for purely
/// punctuational input; callers handle that case.
pub fn normalize(text: &str) -> String {
    text.nfd()
        .filter(|&c| !is_combining_mark(c))
        .flat_map(|c| c.to_lowercase())
        .filter(|c| c.is_ascii_alphanumeric())
        .collect()
}

/// The distinct maximal runs of ASCII digits in `text`, ordered by first
/// occurrence: `"D-Max 2024 4x4"` yields `["2024", "4"]`.
///
/// Matching compares token values as sets, so a repeated run carries no
/// extra signal and is collected once.
pub fn extract_numeric_tokens(text: &str) -> Vec<String> {
    let mut tokens: Vec<String> = Vec::new();
    let mut current = String::new();
    for c in text.chars() {
        if c.is_ascii_digit() {
            current.push(c);
        } else if !current.is_empty() {
            let run = std::mem::take(&mut current);
            if !tokens.contains(&run) {
                tokens.push(run);
            }
        }
    }
    if !current.is_empty() && !tokens.contains(&current) {
        tokens.push(current);
    }
    tokens
}
