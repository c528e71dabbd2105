//! Keyword phrase normalization into single-word terms.

use std::collections::HashSet;

/// Terms shorter than this carry little topical signal.
const MIN_TERM_CHARS: usize = 3;

/// Splits keyword phrases into lowercase terms, keeping first-seen order.
///
/// Normalization steps:
/// 1. Split on anything that is not alphanumeric or a hyphen
/// 2. Lowercase and trim stray hyphens
/// 3. Drop short and purely numeric tokens
/// 4. Remove duplicates, keeping the earliest (best ranked) occurrence
#[must_use]
pub fn normalize_terms<I>(phrases: I) -> Vec<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut terms = Vec::new();

    for phrase in phrases {
        for token in phrase
            .as_ref()
            .split(|c: char| !(c.is_alphanumeric() || c == '-'))
        {
            let term = token.trim_matches('-').to_lowercase();
            if term.chars().count() < MIN_TERM_CHARS || !term.chars().any(char::is_alphabetic) {
                continue;
            }
            if seen.insert(term.clone()) {
                terms.push(term);
            }
        }
    }

    terms
}

/// Builds an engine-style label: `<id>_<term>_<term>...`.
#[must_use]
pub fn topic_label(id: i32, terms: &[String], max_terms: usize) -> String {
    let mut label = id.to_string();
    for term in terms.iter().take(max_terms) {
        label.push('_');
        label.push_str(term);
    }
    label
}
