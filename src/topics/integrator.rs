//! Joins an engine's distribution matrix onto the canonical corpus.

use thiserror::Error;
use tracing::{debug, instrument};

use super::engine::{TopicLabels, TopicMatrix};
use crate::corpus::{BibliographicRecord, CorpusTable, RowId};

/// Errors raised while attaching topic columns to a corpus.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IntegrationError {
    /// The matrix and the abstract-bearing subset differ in length.
    #[error(
        "distribution matrix has {actual} rows but the corpus has {expected} abstract-bearing rows\n  Suggestion: re-run the topic engine on the current corpus"
    )]
    AlignmentMismatch { expected: usize, actual: usize },

    /// A matrix row describes a different document than its position implies.
    #[error("distribution row {position} describes {actual}, expected {expected}")]
    MisalignedRow {
        position: usize,
        expected: RowId,
        actual: RowId,
    },

    /// A matrix row has the wrong number of topic values.
    #[error("{row} has {actual} topic values, expected {expected}")]
    ColumnMismatch {
        row: RowId,
        expected: usize,
        actual: usize,
    },

    /// A topic value is NaN or infinite.
    #[error("{row} has a non-finite value for topic '{label}'")]
    NonFiniteValue { row: RowId, label: String },
}

/// A corpus with one numeric column per non-outlier topic.
///
/// Rows without an abstract have no distribution; their topic values read
/// as zero.
#[derive(Debug, Clone, PartialEq)]
pub struct IntegratedCorpus {
    table: CorpusTable,
    topic_labels: Vec<String>,
    distributions: Vec<Option<Vec<f64>>>,
}

impl IntegratedCorpus {
    /// Wraps a corpus that has no topic columns, for citation and recency
    /// ranking alone.
    #[must_use]
    pub fn without_topics(table: CorpusTable) -> Self {
        let rows = table.len();
        Self {
            table,
            topic_labels: Vec::new(),
            distributions: vec![None; rows],
        }
    }

    /// Topic column names, in column order.
    #[must_use]
    pub fn topic_labels(&self) -> &[String] {
        &self.topic_labels
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Raw distribution for `row`, if the row went through the engine.
    #[must_use]
    pub fn distribution(&self, row: RowId) -> Option<&[f64]> {
        self.distributions.get(row.0)?.as_deref()
    }

    /// Value of topic column `column` for `row`; zero when absent.
    #[must_use]
    pub fn topic_value(&self, row: RowId, column: usize) -> f64 {
        self.distribution(row)
            .and_then(|values| values.get(column).copied())
            .unwrap_or(0.0)
    }

    /// Index of the column named `label`.
    #[must_use]
    pub fn column_of(&self, label: &str) -> Option<usize> {
        self.topic_labels.iter().position(|known| known == label)
    }

    /// Iterates `(row, record, distribution)` in table order.
    pub fn rows(&self) -> impl Iterator<Item = (RowId, &BibliographicRecord, Option<&[f64]>)> {
        self.table
            .rows()
            .map(|(row, record)| (row, record, self.distribution(row)))
    }
}

/// Attaches the distribution matrix to `corpus`.
///
/// Matrix rows are matched to the abstract-bearing subset by position, and
/// each row's identifier must agree with the position.
///
/// # Errors
/// Returns an [`IntegrationError`] on any length, identifier or column
/// disagreement, or a non-finite value. The corpus is dropped unchanged.
#[instrument(skip_all, fields(rows = corpus.len(), matrix_rows = matrix.len()))]
pub fn integrate(
    corpus: CorpusTable,
    matrix: &TopicMatrix,
    labels: &TopicLabels,
) -> Result<IntegratedCorpus, IntegrationError> {
    let expected_rows: Vec<RowId> = corpus.abstract_subset().map(|(row, _)| row).collect();
    if expected_rows.len() != matrix.len() {
        return Err(IntegrationError::AlignmentMismatch {
            expected: expected_rows.len(),
            actual: matrix.len(),
        });
    }

    let topic_labels = labels.scoring_labels();
    let mut distributions = vec![None; corpus.len()];

    for (position, (expected, matrix_row)) in expected_rows.iter().zip(&matrix.rows).enumerate() {
        if matrix_row.row != *expected {
            return Err(IntegrationError::MisalignedRow {
                position,
                expected: *expected,
                actual: matrix_row.row,
            });
        }
        if matrix_row.values.len() != topic_labels.len() {
            return Err(IntegrationError::ColumnMismatch {
                row: *expected,
                expected: topic_labels.len(),
                actual: matrix_row.values.len(),
            });
        }
        if let Some(column) = matrix_row.values.iter().position(|value| !value.is_finite()) {
            return Err(IntegrationError::NonFiniteValue {
                row: *expected,
                label: topic_labels[column].clone(),
            });
        }
        distributions[expected.0] = Some(matrix_row.values.clone());
    }

    debug!(columns = topic_labels.len(), "Topic columns attached");
    Ok(IntegratedCorpus {
        table: corpus,
        topic_labels,
        distributions,
    })
}
