//! Shortlist export.
//!
//! [`export`] cuts a [`Ranking`] to a [`Shortlist`], renders `ranked.csv`,
//! and, when the raw export entries are supplied, joins the scores back onto
//! them for a round-trip RIS file.

mod csv;
mod error;
mod output_dir;
mod roundtrip;
mod shortlist;

pub use csv::{CsvTable, format_number};
pub use error::{ExportError, UnmatchedRoundTrip};
pub use output_dir::unique_output_dir;
pub use roundtrip::{RoundTrip, SENTINEL, natural_key, round_trip};
pub use shortlist::{CANONICAL_COLUMNS, SCORE_COLUMNS, Shortlist, ranked_table, topics_table};

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{info, instrument};

use crate::ris::{RisEntry, write_ris};
use crate::scoring::{Ranking, WeightSpecification};

pub const RANKED_FILE: &str = "ranked.csv";
pub const ROUND_TRIP_FILE: &str = "export.ris";
pub const WEIGHTS_FILE: &str = "weights.json";

/// Tabular shortlist plus the optional round-trip entries.
#[derive(Debug, Clone, PartialEq)]
pub struct ShortlistExport {
    pub table: CsvTable,
    pub round_trip: Option<RoundTrip>,
}

impl ShortlistExport {
    /// Round-trip warnings, empty when no round trip was requested.
    #[must_use]
    pub fn warnings(&self) -> &[UnmatchedRoundTrip] {
        self.round_trip
            .as_ref()
            .map(|round_trip| round_trip.warnings.as_slice())
            .unwrap_or_default()
    }

    /// Writes `ranked.csv` and, if present, `export.ris` into `dir`.
    ///
    /// # Errors
    /// Returns [`ExportError::Io`] if a file cannot be written.
    #[instrument(skip(self))]
    pub fn write_to(&self, dir: &Path) -> Result<Vec<PathBuf>, ExportError> {
        let mut written = Vec::new();
        let ranked = dir.join(RANKED_FILE);
        self.table.write_to(&ranked)?;
        written.push(ranked);

        if let Some(round_trip) = &self.round_trip {
            let path = dir.join(ROUND_TRIP_FILE);
            std::fs::write(&path, write_ris(&round_trip.entries)).map_err(|source| {
                ExportError::Io {
                    path: path.clone(),
                    source,
                }
            })?;
            written.push(path);
        }
        info!(files = written.len(), "Shortlist written");
        Ok(written)
    }
}

/// Selects the shortlist and builds its exports.
#[must_use]
#[instrument(skip(ranking, raw_entries), fields(ranked = ranking.len(), %shortlist))]
pub fn export(
    ranking: &Ranking,
    shortlist: Shortlist,
    raw_entries: Option<&[RisEntry]>,
) -> ShortlistExport {
    let selected = shortlist.select(ranking);
    ShortlistExport {
        table: ranked_table(ranking, selected),
        round_trip: raw_entries.map(|raw| round_trip(selected, raw)),
    }
}

/// Writes `value` to `path` as pretty-printed JSON.
///
/// # Errors
/// Returns [`ExportError`] if serialization or the write fails.
pub fn write_json<T: Serialize>(
    path: &Path,
    what: &'static str,
    value: &T,
) -> Result<(), ExportError> {
    let json =
        serde_json::to_string_pretty(value).map_err(|source| ExportError::Json { what, source })?;
    std::fs::write(path, json).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes the flat weight mapping to `dir/weights.json`.
///
/// # Errors
/// Returns [`ExportError`] if the write fails.
pub fn write_weights(dir: &Path, weights: &WeightSpecification) -> Result<PathBuf, ExportError> {
    let path = dir.join(WEIGHTS_FILE);
    write_json(&path, "weights", &weights.to_map())?;
    Ok(path)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::corpus::CorpusTable;
    use crate::corpus::test_support::record;
    use crate::ris::{parse_ris, tags};
    use crate::scoring::{ScoringOptions, score};
    use crate::topics::IntegratedCorpus;

    fn ranking() -> Ranking {
        let corpus = IntegratedCorpus::without_topics(CorpusTable::new(vec![
            record("Low", 1, 2020, None),
            record("High", 9, 2021, None),
            record("Mid", 5, 2019, None),
        ]));
        let weights = WeightSpecification::from_map([
            ("cites".to_string(), 1.0),
            ("recency".to_string(), 0.0),
            ("topics".to_string(), 0.0),
        ])
        .unwrap();
        score(&corpus, &weights, ScoringOptions::default()).unwrap()
    }

    fn raw(title: &str) -> RisEntry {
        RisEntry::new("JOUR")
            .with(tags::TITLE, title)
            .with(tags::SECONDARY_TITLE, "Journal")
    }

    #[test]
    fn test_export_top_n_with_round_trip() {
        let raws = vec![raw("Low"), raw("High"), raw("Mid")];
        let result = export(&ranking(), Shortlist::Top(2), Some(raws.as_slice()));
        assert_eq!(result.table.rows.len(), 2);
        let round_trip = result.round_trip.as_ref().unwrap();
        let titles: Vec<_> = round_trip
            .entries
            .iter()
            .map(|e| e.first(tags::TITLE).unwrap())
            .collect();
        assert_eq!(titles, vec!["High", "Mid"]);
        assert!(result.warnings().is_empty());
    }

    #[test]
    fn test_write_to_round_trips_through_ris() {
        let raws = vec![raw("Low"), raw("High"), raw("Mid")];
        let result = export(&ranking(), Shortlist::All, Some(raws.as_slice()));
        let dir = tempfile::tempdir().unwrap();
        let written = result.write_to(dir.path()).unwrap();
        assert_eq!(written.len(), 2);

        let text = std::fs::read_to_string(dir.path().join(ROUND_TRIP_FILE)).unwrap();
        let parsed = parse_ris(&text).unwrap();
        assert_eq!(parsed.len(), 3);
        assert_eq!(parsed[0].first(tags::TITLE), Some("High"));
        assert_eq!(parsed[0].first(tags::SECONDARY_TITLE), Some("Journal"));
        assert_eq!(parsed[0].first("C1"), Some("1"));
        assert_eq!(parsed[2].first("C2"), Some("0"));
    }

    #[test]
    fn test_export_without_round_trip_writes_csv_only() {
        let result = export(&ranking(), Shortlist::All, None);
        assert!(result.round_trip.is_none());
        let dir = tempfile::tempdir().unwrap();
        let written = result.write_to(dir.path()).unwrap();
        assert_eq!(written, vec![dir.path().join(RANKED_FILE)]);
    }

    #[test]
    fn test_write_weights() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_weights(dir.path(), &WeightSpecification::default()).unwrap();
        let raw = std::fs::read_to_string(path).unwrap();
        assert!(raw.contains("\"topics\": 1.0"));
    }
}
