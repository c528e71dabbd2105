//! Shortlist selection and the tabular exports.

use std::fmt;
use std::str::FromStr;

use super::csv::{CsvTable, format_number};
use crate::corpus::BibliographicRecord;
use crate::scoring::{RankedRecord, Ranking, WEIGHTED_SUFFIX};
use crate::topics::IntegratedCorpus;

/// Canonical columns shared by `ranked.csv` and `topics_df.csv`.
pub const CANONICAL_COLUMNS: [&str; 10] = [
    "Title",
    "Authors",
    "Year",
    "Source",
    "Citations",
    "Volume",
    "Start",
    "End",
    "Type",
    "DOI",
];

/// Score columns closing every `ranked.csv` row.
pub const SCORE_COLUMNS: [&str; 4] = ["cite_score", "recency_score", "topic_score", "score"];

/// How many ranked records to keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Shortlist {
    #[default]
    All,
    Top(usize),
}

impl Shortlist {
    /// The leading records of `ranking` this shortlist keeps.
    #[must_use]
    pub fn select<'a>(&self, ranking: &'a Ranking) -> &'a [RankedRecord] {
        let records = ranking.records();
        match self {
            Self::All => records,
            Self::Top(n) => &records[..(*n).min(records.len())],
        }
    }
}

impl fmt::Display for Shortlist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Top(n) => write!(f, "{n}"),
        }
    }
}

impl FromStr for Shortlist {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        trimmed
            .parse::<usize>()
            .map(Self::Top)
            .map_err(|_| format!("expected 'all' or a number of papers, got '{trimmed}'"))
    }
}

/// Builds `ranked.csv` for the shortlisted records.
#[must_use]
pub fn ranked_table(ranking: &Ranking, records: &[RankedRecord]) -> CsvTable {
    let weighted_columns: Vec<String> = if ranking.include_component_scores() {
        ranking
            .weighted_labels()
            .iter()
            .map(|label| format!("{label}{WEIGHTED_SUFFIX}"))
            .collect()
    } else {
        Vec::new()
    };

    let mut table = CsvTable::new(
        CANONICAL_COLUMNS
            .iter()
            .map(ToString::to_string)
            .chain(ranking.topic_labels().iter().cloned())
            .chain(weighted_columns)
            .chain(SCORE_COLUMNS.iter().map(ToString::to_string)),
    );

    for ranked in records {
        let mut row = canonical_cells(&ranked.record);
        row.extend(ranked.topics.iter().copied().map(format_number));
        if let Some(weighted) = &ranked.weighted_topics {
            row.extend(weighted.iter().copied().map(format_number));
        }
        row.extend(
            [
                ranked.cite_score,
                ranked.recency_score,
                ranked.topic_score,
                ranked.score,
            ]
            .map(format_number),
        );
        table.push(row);
    }
    table
}

/// Builds `topics_df.csv`: every record with its raw topic values, in
/// table order.
#[must_use]
pub fn topics_table(corpus: &IntegratedCorpus) -> CsvTable {
    let mut table = CsvTable::new(
        CANONICAL_COLUMNS
            .iter()
            .map(ToString::to_string)
            .chain(corpus.topic_labels().iter().cloned()),
    );
    let columns = corpus.topic_labels().len();
    for (row, record, _) in corpus.rows() {
        let mut cells = canonical_cells(record);
        cells.extend((0..columns).map(|column| format_number(corpus.topic_value(row, column))));
        table.push(cells);
    }
    table
}

fn canonical_cells(record: &BibliographicRecord) -> Vec<String> {
    vec![
        record.title.clone(),
        record.authors.join("; "),
        record.year.to_string(),
        record.source.clone(),
        record.citations.to_string(),
        record.volume.clone().unwrap_or_default(),
        record.start_page.clone().unwrap_or_default(),
        record.end_page.clone().unwrap_or_default(),
        record.reference_type.clone(),
        record.identifier.clone().unwrap_or_default(),
    ]
}
