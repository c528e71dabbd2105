//! Multi-criteria scoring.
//!
//! A [`WeightSpecification`] sets how much citation impact, recency and
//! topic relevance count. [`score`] normalizes each criterion over the batch,
//! weights it, and ranks records by the sum.

mod error;
mod normalize;
mod ranker;
mod weights;

pub use error::ScoreError;
pub use normalize::min_max;
pub use ranker::{RankedRecord, Ranking, ScoringOptions, WEIGHTED_SUFFIX, score};
pub use weights::{
    CITES_KEY, DEFAULT_TOPIC_WEIGHT, DEFAULT_TOPICS_WEIGHT, RECENCY_KEY, ReservedWeights,
    TOPICS_KEY, WeightSpecification,
};
