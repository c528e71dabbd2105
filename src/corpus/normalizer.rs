//! Raw RIS entries to canonical records.

use tracing::{debug, info, instrument, warn};

use super::error::{IngestError, IngestWarning};
use super::record::{BibliographicRecord, CorpusTable};
use super::schema::{CitationLookup, SourceSchema};
use crate::ris::{RisEntry, tags};

/// How rows that fail coercion are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IngestPolicy {
    /// Reject the whole batch on the first bad row.
    #[default]
    Strict,
    /// Drop bad rows and report each one as an [`IngestWarning`].
    SkipInvalid,
}

/// Result of a successful normalization.
#[derive(Debug, Clone, Default)]
pub struct NormalizeOutcome {
    pub table: CorpusTable,
    /// Rows dropped under [`IngestPolicy::SkipInvalid`]; always empty in strict mode.
    pub warnings: Vec<IngestWarning>,
}

/// Normalizes raw RIS entries into a [`CorpusTable`], preserving input order.
///
/// Only the canonical fields are kept. The citation count is extracted with
/// the rule for `schema`; year and citations are coerced to integers.
///
/// # Errors
/// In [`IngestPolicy::Strict`] mode, returns the first [`IngestError`]
/// encountered. In [`IngestPolicy::SkipInvalid`] mode this never fails.
#[instrument(skip(entries), fields(entries = entries.len(), %schema, ?policy))]
pub fn normalize(
    entries: &[RisEntry],
    schema: SourceSchema,
    policy: IngestPolicy,
) -> Result<NormalizeOutcome, IngestError> {
    let mut records = Vec::with_capacity(entries.len());
    let mut warnings = Vec::new();

    for (row, entry) in entries.iter().enumerate() {
        match normalize_entry(row, entry, schema) {
            Ok(record) => records.push(record),
            Err(error) => match policy {
                IngestPolicy::Strict => return Err(error),
                IngestPolicy::SkipInvalid => {
                    warn!(row, error = %error, "Skipping invalid record");
                    warnings.push(IngestWarning { row, error });
                }
            },
        }
    }

    info!(
        records = records.len(),
        skipped = warnings.len(),
        "Corpus normalized"
    );

    Ok(NormalizeOutcome {
        table: CorpusTable::new(records),
        warnings,
    })
}

fn normalize_entry(
    row: usize,
    entry: &RisEntry,
    schema: SourceSchema,
) -> Result<BibliographicRecord, IngestError> {
    let title = non_empty(entry.first_of(&tags::TITLE_TAGS)).ok_or(
        IngestError::MissingField {
            row,
            field: "title",
            schema,
        },
    )?;

    let year = parse_year(row, entry, schema)?;
    let citations = parse_citations(row, entry, schema)?;

    let mut authors: Vec<String> = entry.all(tags::AUTHOR).map(String::from).collect();
    if authors.is_empty() {
        authors = entry.all(tags::PRIMARY_AUTHOR).map(String::from).collect();
    }

    let record = BibliographicRecord {
        identifier: non_empty(entry.first(tags::DOI)),
        title,
        authors,
        year,
        source: entry
            .first_of(&tags::SOURCE_TAGS)
            .unwrap_or_default()
            .to_string(),
        volume: non_empty(entry.first(tags::VOLUME)),
        start_page: non_empty(entry.first(tags::START_PAGE)),
        end_page: non_empty(entry.first(tags::END_PAGE)),
        abstract_text: non_empty(entry.first_of(&[tags::ABSTRACT, tags::NOTES_ABSTRACT])),
        citations,
        reference_type: entry.reference_type.clone(),
        raw_index: Some(row),
    };
    debug!(row, title = %record.title, citations, year, "Record normalized");
    Ok(record)
}

fn parse_year(row: usize, entry: &RisEntry, schema: SourceSchema) -> Result<i32, IngestError> {
    let raw = entry
        .first_of(&[tags::YEAR, tags::PRIMARY_DATE])
        .unwrap_or_default();
    // RIS dates may be `YYYY/MM/DD/other`; only the year part is numeric.
    let token = raw.split('/').next().unwrap_or_default().trim();
    token
        .parse::<i32>()
        .map_err(|_| IngestError::NonNumericField {
            row,
            field: "year",
            value: raw.to_string(),
            schema,
        })
}

fn parse_citations(row: usize, entry: &RisEntry, schema: SourceSchema) -> Result<u64, IngestError> {
    match schema.locate_citations(entry.all(tags::NOTES)) {
        CitationLookup::Found(token) => {
            token
                .parse::<u64>()
                .map_err(|_| IngestError::NonNumericField {
                    row,
                    field: "citations",
                    value: token,
                    schema,
                })
        }
        CitationLookup::Missing(reason) => Err(IngestError::MalformedCitationField {
            row,
            schema,
            reason,
        }),
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}
