//! Export errors and warnings.

use std::path::PathBuf;

use thiserror::Error;

use crate::corpus::RowId;

#[derive(Debug, Error)]
pub enum ExportError {
    /// An output file or directory could not be written.
    #[error("cannot write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A JSON artifact could not be serialized.
    #[error("cannot serialize {what}: {source}")]
    Json {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// A ranked record with no raw entry under the same title and source.
///
/// The export still contains the record, with `none` in its raw fields.
#[derive(Debug, Clone, PartialEq)]
pub struct UnmatchedRoundTrip {
    pub row: RowId,
    pub title: String,
    pub source: String,
    /// Most similar raw title, when one is reasonably close.
    pub closest: Option<String>,
}

impl std::fmt::Display for UnmatchedRoundTrip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: no raw entry for '{}' in '{}'",
            self.row, self.title, self.source
        )?;
        if let Some(closest) = &self.closest {
            write!(f, " (closest raw title: '{closest}')")?;
        }
        Ok(())
    }
}
