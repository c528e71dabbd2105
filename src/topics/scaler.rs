//! Corpus-size dependent topic model hyperparameters.

use serde::{Deserialize, Serialize};

/// Corpus size the slopes below are expressed against.
pub const REFERENCE_CORPUS_SIZE: usize = 2000;
/// Minimum topic size gained per reference-size block of documents.
pub const MIN_TOPIC_SIZE_SLOPE: usize = 10;
/// Neighborhood size gained per reference-size block of documents.
pub const NEIGHBORHOOD_SLOPE: usize = 15;

/// Values used when the caller fixes the topic count instead of scaling.
pub const FIXED_COUNT_MIN_TOPIC_SIZE: usize = 10;
pub const FIXED_COUNT_NEIGHBORHOOD_SIZE: usize = 15;

/// Hyperparameters handed to a topic engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicHyperparameters {
    /// Smallest number of documents that may form a topic.
    pub min_topic_size: usize,
    /// Local neighborhood size for the engine's manifold or keyword window.
    pub neighborhood_size: usize,
}

impl Default for TopicHyperparameters {
    fn default() -> Self {
        Self {
            min_topic_size: FIXED_COUNT_MIN_TOPIC_SIZE,
            neighborhood_size: FIXED_COUNT_NEIGHBORHOOD_SIZE,
        }
    }
}

/// Scales hyperparameters linearly with corpus size.
///
/// `floor(n / 2000 * slope) + 1`, so both values are at least 1 and never
/// decrease as the corpus grows.
#[must_use]
pub fn scale(corpus_size: usize) -> TopicHyperparameters {
    let grow = |slope: usize| corpus_size.saturating_mul(slope) / REFERENCE_CORPUS_SIZE + 1;
    TopicHyperparameters {
        min_topic_size: grow(MIN_TOPIC_SIZE_SLOPE),
        neighborhood_size: grow(NEIGHBORHOOD_SLOPE),
    }
}
