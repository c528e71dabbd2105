//! Keyword extraction using RAKE (Rapid Automatic Keyword Extraction) algorithm.

use rake::{Rake, StopWords};
use stop_words::{LANGUAGE, get};
use tracing::instrument;

use super::normalizer::normalize_terms;

/// RAKE keyword extractor with English stop words.
pub struct KeywordExtractor {
    /// Cached RAKE instance with pre-built stop words.
    rake: Rake,
}

impl std::fmt::Debug for KeywordExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeywordExtractor").finish()
    }
}

impl Default for KeywordExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl KeywordExtractor {
    #[must_use]
    pub fn new() -> Self {
        let mut sw = StopWords::new();
        for word in get(LANGUAGE::English) {
            sw.insert(word);
        }
        Self {
            rake: Rake::new(sw),
        }
    }

    /// Extracts keyword phrases, best first.
    ///
    /// RAKE reports ties in hash order, so ties are broken alphabetically to
    /// keep the output reproducible.
    #[must_use]
    #[instrument(skip(self, text), fields(text_len = text.len()))]
    pub fn phrases(&self, text: &str) -> Vec<String> {
        if text.trim().is_empty() {
            return Vec::new();
        }
        let mut scored: Vec<(String, f64)> = self
            .rake
            .run(text)
            .into_iter()
            .map(|keyword_score| (keyword_score.keyword, keyword_score.score))
            .collect();
        scored.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        scored.into_iter().map(|(keyword, _)| keyword).collect()
    }

    /// Single-word terms from the best phrases, at most `limit` of them.
    #[must_use]
    pub fn terms(&self, text: &str, limit: usize) -> Vec<String> {
        let mut terms = normalize_terms(self.phrases(text));
        terms.truncate(limit);
        terms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phrases_from_academic_title() {
        let extractor = KeywordExtractor::new();
        let phrases = extractor.phrases("Machine Learning Approaches to Climate Change Prediction");
        assert!(!phrases.is_empty(), "Should extract keywords from title");
    }

    #[test]
    fn test_phrases_empty_input_returns_empty() {
        let extractor = KeywordExtractor::new();
        assert!(extractor.phrases("").is_empty());
        assert!(extractor.phrases("   ").is_empty());
    }

    #[test]
    fn test_terms_respects_limit() {
        let extractor = KeywordExtractor::new();
        let text = "climate change global warming temperature increase carbon dioxide emissions greenhouse gases renewable energy solar power wind energy fossil fuels";
        assert!(extractor.terms(text, 3).len() <= 3);
    }

    #[test]
    fn test_terms_are_reproducible() {
        let extractor = KeywordExtractor::new();
        let text = "Neural networks for protein folding. Protein structure prediction with deep networks.";
        let first = extractor.terms(text, 20);
        for _ in 0..5 {
            assert_eq!(extractor.terms(text, 20), first);
        }
    }
}
