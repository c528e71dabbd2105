//! Canonical bibliographic records and the RIS normalizer.
//!
//! [`normalize`] turns raw RIS entries from a Scopus or Web of Science export
//! into a [`CorpusTable`]: nine canonical fields per record, citation counts
//! extracted with the schema's own rule, and row order preserved.

mod error;
mod normalizer;
mod record;
mod schema;

pub use error::{IngestError, IngestWarning};
pub use normalizer::{IngestPolicy, NormalizeOutcome, normalize};
pub use record::{BibliographicRecord, CorpusTable, RowId};
pub use schema::SourceSchema;

#[cfg(test)]
pub(crate) use record::test_support;
