//! Ingestion errors and warnings.

use thiserror::Error;

use super::schema::SourceSchema;

/// Errors that reject a whole export batch.
///
/// Every variant carries the row index, field and assumed schema so the
/// caller can locate the problem in the source export.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IngestError {
    /// The schema's citation marker or delimiter is absent.
    #[error(
        "row {row}: malformed citation field for {schema} export: {reason}\n  Suggestion: check that the export includes citation counts and that --source matches the database"
    )]
    MalformedCitationField {
        row: usize,
        schema: SourceSchema,
        reason: String,
    },

    /// A numeric field could not be coerced.
    #[error("row {row}: field '{field}' is not numeric ('{value}') in {schema} export")]
    NonNumericField {
        row: usize,
        field: &'static str,
        value: String,
        schema: SourceSchema,
    },

    /// A required field has no value.
    #[error("row {row}: required field '{field}' is missing in {schema} export")]
    MissingField {
        row: usize,
        field: &'static str,
        schema: SourceSchema,
    },
}

impl IngestError {
    /// Row the error refers to.
    #[must_use]
    pub fn row(&self) -> usize {
        match self {
            Self::MalformedCitationField { row, .. }
            | Self::NonNumericField { row, .. }
            | Self::MissingField { row, .. } => *row,
        }
    }
}

/// A row dropped under [`super::IngestPolicy::SkipInvalid`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestWarning {
    /// Index of the raw entry that was skipped.
    pub row: usize,
    /// The error that would have rejected the batch in strict mode.
    pub error: IngestError,
}
