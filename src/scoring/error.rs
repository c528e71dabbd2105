//! Scoring and weight errors.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while building weights or scoring a corpus.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoreError {
    /// One of `cites`, `recency` or `topics` is absent.
    #[error(
        "weight '{key}' is missing\n  Suggestion: weight files must set 'cites', 'recency' and 'topics'"
    )]
    MissingReservedWeight { key: &'static str },

    /// A weight is NaN or infinite.
    #[error("weight '{key}' must be a finite number, got {value}")]
    NonFiniteWeight { key: String, value: f64 },

    /// A topic weight names a label the current fit does not have.
    #[error("{}", unknown_topic_message(.label, .suggestion))]
    UnknownTopicWeight {
        label: String,
        suggestion: Option<String>,
    },

    /// There is nothing to normalize.
    #[error("cannot score an empty corpus")]
    EmptyCorpus,

    /// A weight file could not be read or parsed.
    #[error("invalid weight file '{}': {reason}", .path.display())]
    WeightFile { path: PathBuf, reason: String },
}

#[allow(clippy::ref_option)]
fn unknown_topic_message(label: &str, suggestion: &Option<String>) -> String {
    match suggestion {
        Some(closest) => {
            format!("no topic labelled '{label}' in this fit\n  Suggestion: did you mean '{closest}'?")
        }
        None => format!(
            "no topic labelled '{label}' in this fit\n  Suggestion: run `litrank topics` to list the current labels"
        ),
    }
}
