//! Canonical record and table types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Position of a record in its [`CorpusTable`].
///
/// Row identifiers travel with every document sent to a topic engine so the
/// returned distribution rows can be checked against the corpus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowId(pub usize);

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "row {}", self.0)
    }
}

/// One publication in canonical form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BibliographicRecord {
    /// External identifier (DOI) when the export carries one.
    pub identifier: Option<String>,
    pub title: String,
    pub authors: Vec<String>,
    pub year: i32,
    /// Journal or conference name.
    pub source: String,
    pub volume: Option<String>,
    pub start_page: Option<String>,
    pub end_page: Option<String>,
    /// Required for topic inference; records without one are still ranked.
    #[serde(rename = "abstract")]
    pub abstract_text: Option<String>,
    pub citations: u64,
    pub reference_type: String,
    /// Index of the raw entry this record was normalized from. Round-trip
    /// export joins on it before falling back to (title, source).
    #[serde(skip)]
    pub raw_index: Option<usize>,
}

impl BibliographicRecord {
    /// Returns the abstract if it has non-whitespace content.
    #[must_use]
    pub fn usable_abstract(&self) -> Option<&str> {
        self.abstract_text
            .as_deref()
            .filter(|text| !text.trim().is_empty())
    }
}

/// Ordered sequence of canonical records sharing one schema.
///
/// Row order is significant: topic distributions are aligned against the
/// abstract-bearing subset in this order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CorpusTable {
    records: Vec<BibliographicRecord>,
}

impl CorpusTable {
    #[must_use]
    pub fn new(records: Vec<BibliographicRecord>) -> Self {
        Self { records }
    }

    #[must_use]
    pub fn records(&self) -> &[BibliographicRecord] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterates `(row, record)` pairs in table order.
    pub fn rows(&self) -> impl Iterator<Item = (RowId, &BibliographicRecord)> {
        self.records
            .iter()
            .enumerate()
            .map(|(index, record)| (RowId(index), record))
    }

    /// Abstract-bearing rows in table order: the documents a topic engine sees.
    pub fn abstract_subset(&self) -> impl Iterator<Item = (RowId, &str)> {
        self.rows()
            .filter_map(|(row, record)| record.usable_abstract().map(|text| (row, text)))
    }

    /// Number of rows that carry a usable abstract.
    #[must_use]
    pub fn abstract_count(&self) -> usize {
        self.abstract_subset().count()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Minimal record for tests across the crate.
    pub fn record(
        title: &str,
        citations: u64,
        year: i32,
        abstract_text: Option<&str>,
    ) -> BibliographicRecord {
        BibliographicRecord {
            identifier: None,
            title: title.to_string(),
            authors: vec!["Author, A.".to_string()],
            year,
            source: "Journal".to_string(),
            volume: None,
            start_page: None,
            end_page: None,
            abstract_text: abstract_text.map(String::from),
            citations,
            reference_type: "JOUR".to_string(),
            raw_index: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::record;
    use super::*;

    #[test]
    fn test_abstract_subset_skips_missing_and_blank() {
        let table = CorpusTable::new(vec![
            record("a", 1, 2020, Some("text a")),
            record("b", 1, 2020, None),
            record("c", 1, 2020, Some("   ")),
            record("d", 1, 2020, Some("text d")),
        ]);
        let subset: Vec<_> = table.abstract_subset().collect();
        assert_eq!(subset, vec![(RowId(0), "text a"), (RowId(3), "text d")]);
        assert_eq!(table.abstract_count(), 2);
    }

    #[test]
    fn test_row_id_display() {
        assert_eq!(RowId(4).to_string(), "row 4");
    }
}
