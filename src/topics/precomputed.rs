//! Adapter for topic output produced by an external engine run.
//!
//! The external run writes one JSON document:
//!
//! ```json
//! {
//!   "labels": { "-1": "-1_outlier", "0": "0_graph_neural" },
//!   "keywords": { "0": ["graph", "neural"] },
//!   "representative_docs": { "0": ["..."] },
//!   "documents": [
//!     { "row": 0, "topic": 0, "probability": 0.91, "distribution": [0.88] }
//!   ]
//! }
//! ```
//!
//! `row` is the corpus row the abstract came from; `distribution` has one
//! value per non-outlier label in ascending topic-id order.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{info, instrument};

use super::engine::{
    DistributionRow, Document, TopicAssignment, TopicCount, TopicEngine, TopicEngineError,
    TopicFit, TopicId, TopicLabels, TopicMatrix, TopicRequest,
};
use crate::corpus::RowId;

const ENGINE_NAME: &str = "precomputed";

#[derive(Debug, Clone, Deserialize)]
struct PrecomputedFile {
    labels: BTreeMap<String, String>,
    #[serde(default)]
    keywords: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    representative_docs: BTreeMap<String, Vec<String>>,
    documents: Vec<PrecomputedDocument>,
}

#[derive(Debug, Clone, Deserialize)]
struct PrecomputedDocument {
    row: RowId,
    topic: i32,
    #[serde(default)]
    probability: f64,
    distribution: Vec<f64>,
}

/// Serves a stored engine result as if the engine had just run.
#[derive(Debug, Clone)]
pub struct PrecomputedTopics {
    labels: TopicLabels,
    keywords: BTreeMap<TopicId, Vec<String>>,
    representative_docs: BTreeMap<TopicId, Vec<String>>,
    documents: HashMap<RowId, PrecomputedDocument>,
}

impl PrecomputedTopics {
    /// Loads and validates a stored result.
    ///
    /// # Errors
    /// Returns [`TopicEngineError::InvalidData`] if the file cannot be read,
    /// is not valid JSON, or is internally inconsistent.
    #[instrument]
    pub fn load(path: &Path) -> Result<Self, TopicEngineError> {
        let raw = std::fs::read_to_string(path).map_err(|error| invalid(format!(
            "cannot read '{}': {error}",
            path.display()
        )))?;
        Self::from_json(&raw)
    }

    /// Parses and validates a stored result from JSON text.
    ///
    /// # Errors
    /// Returns [`TopicEngineError::InvalidData`] on malformed or inconsistent data.
    pub fn from_json(raw: &str) -> Result<Self, TopicEngineError> {
        let file: PrecomputedFile =
            serde_json::from_str(raw).map_err(|error| invalid(error.to_string()))?;

        let labels = TopicLabels::new(parse_topic_keys(file.labels)?);
        let columns = labels.topic_ids().len();

        let mut documents = HashMap::with_capacity(file.documents.len());
        for document in file.documents {
            if labels.get(TopicId(document.topic)).is_none() {
                return Err(invalid(format!(
                    "{} is assigned to unknown topic {}",
                    document.row, document.topic
                )));
            }
            if document.distribution.len() != columns {
                return Err(invalid(format!(
                    "{} has {} distribution values, expected {columns}",
                    document.row,
                    document.distribution.len()
                )));
            }
            let row = document.row;
            if documents.insert(row, document).is_some() {
                return Err(invalid(format!("{row} appears more than once")));
            }
        }

        info!(
            topics = columns,
            documents = documents.len(),
            "Precomputed topics loaded"
        );
        Ok(Self {
            labels,
            keywords: parse_topic_keys(file.keywords)?,
            representative_docs: parse_topic_keys(file.representative_docs)?,
            documents,
        })
    }

    fn lookup(&self, row: RowId) -> Result<&PrecomputedDocument, TopicEngineError> {
        self.documents
            .get(&row)
            .ok_or(TopicEngineError::MissingDocument {
                engine: ENGINE_NAME,
                row,
            })
    }
}

#[async_trait]
impl TopicEngine for PrecomputedTopics {
    fn name(&self) -> &'static str {
        ENGINE_NAME
    }

    async fn fit(
        &self,
        documents: &[Document],
        request: &TopicRequest,
    ) -> Result<TopicFit, TopicEngineError> {
        if documents.is_empty() {
            return Err(TopicEngineError::NoDocuments);
        }
        let assignments = documents
            .iter()
            .map(|document| {
                self.lookup(document.row).map(|stored| TopicAssignment {
                    row: document.row,
                    topic: TopicId(stored.topic),
                    confidence: stored.probability,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(TopicFit {
            assignments,
            labels: self.labels.clone(),
            keywords: self.keywords.clone(),
            representative_docs: self.representative_docs.clone(),
            hyperparameters: request.hyperparameters,
            seed: request.seed,
        })
    }

    async fn reduce(
        &self,
        _documents: &[Document],
        _fit: &TopicFit,
        _target: TopicCount,
    ) -> Result<TopicFit, TopicEngineError> {
        Err(TopicEngineError::Unsupported {
            engine: ENGINE_NAME,
            operation: "topic reduction",
        })
    }

    async fn approximate_distribution(
        &self,
        documents: &[Document],
        _fit: &TopicFit,
    ) -> Result<TopicMatrix, TopicEngineError> {
        let rows = documents
            .iter()
            .map(|document| {
                self.lookup(document.row).map(|stored| DistributionRow {
                    row: document.row,
                    values: stored.distribution.clone(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(TopicMatrix { rows })
    }
}

fn parse_topic_keys<V>(map: BTreeMap<String, V>) -> Result<BTreeMap<TopicId, V>, TopicEngineError> {
    map.into_iter()
        .map(|(key, value)| {
            key.trim()
                .parse::<i32>()
                .map(|id| (TopicId(id), value))
                .map_err(|_| invalid(format!("topic key '{key}' is not an integer")))
        })
        .collect()
}

fn invalid(reason: String) -> TopicEngineError {
    TopicEngineError::InvalidData {
        engine: ENGINE_NAME,
        reason,
    }
}
