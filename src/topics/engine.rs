//! Topic-inference engine contract.
//!
//! The engine itself (embedding, clustering, labelling) is an external
//! capability. This module fixes what the ranking pipeline sends to it and
//! what it expects back, and wraps a run in a cancellable unit of work.

use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, instrument, warn};

use super::scaler::{TopicHyperparameters, scale};
use crate::corpus::{CorpusTable, RowId};

/// Topic identifier as reported by the engine. `-1` is the outlier topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TopicId(pub i32);

/// Reserved topic for documents the engine could not assign.
pub const OUTLIER_TOPIC: TopicId = TopicId(-1);
/// Label the built-in engines give the outlier topic.
pub const OUTLIER_LABEL: &str = "-1_outlier";

impl TopicId {
    #[must_use]
    pub fn is_outlier(self) -> bool {
        self == OUTLIER_TOPIC
    }
}

impl fmt::Display for TopicId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A document submitted to an engine, tagged with the corpus row it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub row: RowId,
    pub text: String,
}

/// Builds the engine input from the abstract-bearing rows, in corpus order.
#[must_use]
pub fn documents_from(corpus: &CorpusTable) -> Vec<Document> {
    corpus
        .abstract_subset()
        .map(|(row, text)| Document {
            row,
            text: text.to_string(),
        })
        .collect()
}

/// Requested number of topics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TopicCount {
    /// Let the engine decide, guided by corpus-scaled hyperparameters.
    #[default]
    Auto,
    Fixed(usize),
}

impl fmt::Display for TopicCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => f.write_str("auto"),
            Self::Fixed(n) => write!(f, "{n}"),
        }
    }
}

impl FromStr for TopicCount {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("auto") {
            return Ok(Self::Auto);
        }
        match trimmed.parse::<usize>() {
            Ok(0) => Err("topic count must be at least 1".to_string()),
            Ok(n) => Ok(Self::Fixed(n)),
            Err(_) => Err(format!("expected 'auto' or a positive integer, got '{trimmed}'")),
        }
    }
}

/// Parameters for one engine fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopicRequest {
    pub count: TopicCount,
    /// Fixed seed for reproducible fits. Without one, callers must not
    /// assume two runs agree.
    pub seed: Option<u64>,
    pub hyperparameters: TopicHyperparameters,
}

impl TopicRequest {
    /// Builds a request for `document_count` documents.
    ///
    /// With [`TopicCount::Auto`] the hyperparameters are scaled to the corpus;
    /// with a fixed count the engine defaults are used.
    #[must_use]
    pub fn for_documents(document_count: usize, count: TopicCount, seed: Option<u64>) -> Self {
        let hyperparameters = match count {
            TopicCount::Auto => scale(document_count),
            TopicCount::Fixed(_) => TopicHyperparameters::default(),
        };
        Self {
            count,
            seed,
            hyperparameters,
        }
    }
}

/// Mapping from topic id to human-readable label, including the outlier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopicLabels(BTreeMap<TopicId, String>);

impl TopicLabels {
    #[must_use]
    pub fn new(labels: BTreeMap<TopicId, String>) -> Self {
        Self(labels)
    }

    #[must_use]
    pub fn get(&self, id: TopicId) -> Option<&str> {
        self.0.get(&id).map(String::as_str)
    }

    /// Non-outlier topic ids in ascending order: the distribution column order.
    #[must_use]
    pub fn topic_ids(&self) -> Vec<TopicId> {
        self.0.keys().copied().filter(|id| !id.is_outlier()).collect()
    }

    /// Non-outlier labels in distribution column order.
    #[must_use]
    pub fn scoring_labels(&self) -> Vec<String> {
        self.0
            .iter()
            .filter(|(id, _)| !id.is_outlier())
            .map(|(_, label)| label.clone())
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TopicId, &str)> {
        self.0.iter().map(|(id, label)| (*id, label.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Topic assigned to one document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TopicAssignment {
    pub row: RowId,
    pub topic: TopicId,
    /// Probability-like confidence in `[0, 1]`.
    pub confidence: f64,
}

/// Result of fitting an engine to a document set.
#[derive(Debug, Clone, PartialEq)]
pub struct TopicFit {
    /// One assignment per input document, in input order.
    pub assignments: Vec<TopicAssignment>,
    pub labels: TopicLabels,
    /// Descriptive keywords per topic, most representative first.
    pub keywords: BTreeMap<TopicId, Vec<String>>,
    /// A few documents that typify each topic.
    pub representative_docs: BTreeMap<TopicId, Vec<String>>,
    pub hyperparameters: TopicHyperparameters,
    pub seed: Option<u64>,
}

impl TopicFit {
    /// Number of documents assigned to `topic`.
    #[must_use]
    pub fn topic_size(&self, topic: TopicId) -> usize {
        self.assignments
            .iter()
            .filter(|assignment| assignment.topic == topic)
            .count()
    }
}

/// One row of a document-by-topic distribution matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionRow {
    /// Corpus row the values describe.
    pub row: RowId,
    /// One value per non-outlier topic, in [`TopicLabels::topic_ids`] order.
    pub values: Vec<f64>,
}

/// Dense per-document, per-topic distribution aligned to the submitted order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TopicMatrix {
    pub rows: Vec<DistributionRow>,
}

impl TopicMatrix {
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Errors raised by topic engines or their run wrapper.
#[derive(Debug, Error)]
pub enum TopicEngineError {
    /// The run was interrupted (Ctrl-C).
    #[error("topic inference was cancelled")]
    Cancelled,

    /// The run exceeded its time budget.
    #[error("topic inference timed out after {secs}s")]
    TimedOut { secs: u64 },

    /// The engine has nothing to fit.
    #[error("no documents with abstracts to model\n  Suggestion: check that the export includes abstracts")]
    NoDocuments,

    /// The engine cannot perform the requested operation.
    #[error("{engine} engine does not support {operation}")]
    Unsupported {
        engine: &'static str,
        operation: &'static str,
    },

    /// A submitted document is unknown to the engine.
    #[error("{engine} engine has no result for {row}")]
    MissingDocument { engine: &'static str, row: RowId },

    /// The engine's stored output is not usable.
    #[error("invalid {engine} topic data: {reason}")]
    InvalidData {
        engine: &'static str,
        reason: String,
    },

    /// The engine's worker failed.
    #[error("{engine} engine failed: {reason}")]
    Engine {
        engine: &'static str,
        reason: String,
    },
}

/// External topic-inference capability.
///
/// Implementations must keep document order: the i-th assignment and the
/// i-th distribution row describe the i-th submitted document and carry its
/// [`RowId`].
#[async_trait]
pub trait TopicEngine: Send + Sync {
    /// Short engine name for logs and errors.
    fn name(&self) -> &'static str;

    /// Fits topics to `documents`.
    async fn fit(
        &self,
        documents: &[Document],
        request: &TopicRequest,
    ) -> Result<TopicFit, TopicEngineError>;

    /// Re-clusters an existing fit to fewer topics, keeping document order.
    async fn reduce(
        &self,
        documents: &[Document],
        fit: &TopicFit,
        target: TopicCount,
    ) -> Result<TopicFit, TopicEngineError>;

    /// Per-document, per-topic distribution for `documents` under `fit`.
    async fn approximate_distribution(
        &self,
        documents: &[Document],
        fit: &TopicFit,
    ) -> Result<TopicMatrix, TopicEngineError>;
}

/// Runs one engine operation as a single cancellable unit.
///
/// Ctrl-C or an elapsed `timeout` abandons the operation. Nothing is written
/// to the corpus by an engine call, so an abandoned run leaves it untouched.
///
/// # Errors
/// Returns [`TopicEngineError::Cancelled`] or [`TopicEngineError::TimedOut`],
/// or whatever the wrapped operation returns.
#[instrument(skip(work))]
pub async fn run_cancellable<T, F>(
    work: F,
    timeout: Option<Duration>,
) -> Result<T, TopicEngineError>
where
    F: Future<Output = Result<T, TopicEngineError>>,
{
    let bounded = async {
        match timeout {
            Some(limit) => match tokio::time::timeout(limit, work).await {
                Ok(result) => result,
                Err(_) => Err(TopicEngineError::TimedOut {
                    secs: limit.as_secs(),
                }),
            },
            None => work.await,
        }
    };

    tokio::select! {
        result = bounded => {
            if let Err(error) = &result {
                warn!(error = %error, "Topic engine run did not complete");
            } else {
                info!("Topic engine run complete");
            }
            result
        }
        _ = tokio::signal::ctrl_c() => {
            warn!("Topic engine run interrupted");
            Err(TopicEngineError::Cancelled)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::corpus::test_support::record;

    #[test]
    fn test_topic_count_from_str() {
        assert_eq!("auto".parse::<TopicCount>(), Ok(TopicCount::Auto));
        assert_eq!("AUTO".parse::<TopicCount>(), Ok(TopicCount::Auto));
        assert_eq!("7".parse::<TopicCount>(), Ok(TopicCount::Fixed(7)));
        assert!("0".parse::<TopicCount>().is_err());
        assert!("many".parse::<TopicCount>().is_err());
    }

    #[test]
    fn test_request_auto_scales_with_documents() {
        let request = TopicRequest::for_documents(4000, TopicCount::Auto, Some(123));
        assert_eq!(request.hyperparameters.min_topic_size, 21);
        assert_eq!(request.hyperparameters.neighborhood_size, 31);
        assert_eq!(request.seed, Some(123));
    }

    #[test]
    fn test_request_fixed_uses_defaults() {
        let request = TopicRequest::for_documents(4000, TopicCount::Fixed(5), None);
        assert_eq!(request.hyperparameters, TopicHyperparameters::default());
    }

    #[test]
    fn test_labels_exclude_outlier_from_columns() {
        let labels = TopicLabels::new(BTreeMap::from([
            (TopicId(1), "1_b".to_string()),
            (OUTLIER_TOPIC, OUTLIER_LABEL.to_string()),
            (TopicId(0), "0_a".to_string()),
        ]));
        assert_eq!(labels.topic_ids(), vec![TopicId(0), TopicId(1)]);
        assert_eq!(labels.scoring_labels(), vec!["0_a", "1_b"]);
        assert_eq!(labels.len(), 3);
    }

    #[test]
    fn test_documents_from_keeps_row_ids() {
        let corpus = CorpusTable::new(vec![
            record("a", 1, 2020, None),
            record("b", 1, 2020, Some("abstract b")),
        ]);
        let docs = documents_from(&corpus);
        assert_eq!(
            docs,
            vec![Document {
                row: RowId(1),
                text: "abstract b".to_string()
            }]
        );
    }

    #[tokio::test]
    async fn test_run_cancellable_passes_result_through() {
        let result = run_cancellable(async { Ok::<_, TopicEngineError>(42) }, None).await;
        assert_eq!(result.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_run_cancellable_times_out() {
        let slow = async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok::<_, TopicEngineError>(())
        };
        let result = run_cancellable(slow, Some(Duration::from_millis(20))).await;
        assert!(matches!(result, Err(TopicEngineError::TimedOut { .. })));
    }
}
