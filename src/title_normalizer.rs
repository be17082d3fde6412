//! Clean-up of raw video titles before they are stored as song titles.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// `[...]` or `(...)`, shortest match, no nesting.
    static ref BRACKETED: Regex = Regex::new(r"\[[^\]]*\]|\([^)]*\)").unwrap();
    static ref MARKETING_TOKENS: Regex =
        Regex::new(r"(?i)\b(official|video|audio|lyrics|hd|4k)\b").unwrap();
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

/// Strips bracketed annotations and marketing words from a title, then
/// collapses whitespace.
///
/// ```
/// use moodtunes_server::title_normalizer::normalize;
/// assert_eq!(normalize("Song Title [Official Video] (HD)"), "Song Title");
/// ```
pub fn normalize(raw: &str) -> String {
    let without_brackets = BRACKETED.replace_all(raw, " ");
    let without_tokens = MARKETING_TOKENS.replace_all(&without_brackets, " ");
    WHITESPACE
        .replace_all(&without_tokens, " ")
        .trim()
        .to_string()
}
