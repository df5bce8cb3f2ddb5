//! Term normalization shared by index build and query parsing
//!
//! The searcher tokenizes queries with this exact function; any divergence
//! between the two sides breaks retrieval.

/// Tokenizes text into normalized terms
///
/// Lowercases, replaces every non-alphanumeric, non-underscore character
/// with whitespace, splits on whitespace, and drops tokens of length <= 2.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '_' { c } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .filter(|token| token.chars().count() > 2)
        .map(str::to_string)
        .collect()
}
