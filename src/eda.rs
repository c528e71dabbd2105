//! Descriptive tables for a corpus: output by year, top papers, and citation
//! totals and h-indices per author and per source.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::{info, instrument};

use crate::corpus::{BibliographicRecord, CorpusTable};
use crate::export::{CsvTable, ExportError, format_number};

/// Rows kept in each ranked table.
pub const TOP_ROWS: usize = 100;

/// One named summary table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryTable {
    /// File stem, e.g. `pubs_by_year`.
    pub name: &'static str,
    pub table: CsvTable,
}

/// Largest `h` such that `h` of the counts are at least `h`.
#[must_use]
pub fn h_index<I>(citations: I) -> usize
where
    I: IntoIterator<Item = u64>,
{
    let mut counts: Vec<u64> = citations.into_iter().collect();
    counts.sort_unstable_by(|a, b| b.cmp(a));
    counts
        .iter()
        .enumerate()
        .take_while(|(i, count)| usize::try_from(**count).unwrap_or(usize::MAX) > *i)
        .count()
}

/// Publications per year, oldest first.
#[must_use]
pub fn publications_per_year(corpus: &CorpusTable) -> CsvTable {
    let mut counts: BTreeMap<i32, usize> = BTreeMap::new();
    for record in corpus.records() {
        *counts.entry(record.year).or_default() += 1;
    }
    let mut table = CsvTable::new(["Year", "Publications"]);
    for (year, count) in counts {
        table.push(vec![year.to_string(), count.to_string()]);
    }
    table
}

/// Mean citations per year, oldest first.
#[must_use]
pub fn citations_per_year(corpus: &CorpusTable) -> CsvTable {
    let mut totals: BTreeMap<i32, (u64, u64)> = BTreeMap::new();
    for record in corpus.records() {
        let (sum, n) = totals.entry(record.year).or_default();
        *sum += record.citations;
        *n += 1;
    }
    let mut table = CsvTable::new(["Year", "Citations"]);
    for (year, (sum, n)) in totals {
        #[allow(clippy::cast_precision_loss)]
        let mean = sum as f64 / n as f64;
        table.push(vec![year.to_string(), format_number(mean)]);
    }
    table
}

/// Most cited papers, table order on ties.
#[must_use]
pub fn top_papers(corpus: &CorpusTable) -> CsvTable {
    let mut records: Vec<&BibliographicRecord> = corpus.records().iter().collect();
    records.sort_by(|a, b| b.citations.cmp(&a.citations));
    let mut table = CsvTable::new(["Title", "Authors", "Year", "Source", "Citations"]);
    for record in records.into_iter().take(TOP_ROWS) {
        table.push(vec![
            record.title.clone(),
            record.authors.join("; "),
            record.year.to_string(),
            record.source.clone(),
            record.citations.to_string(),
        ]);
    }
    table
}

/// Total citations per author, highest first.
#[must_use]
pub fn citations_per_author(corpus: &CorpusTable) -> CsvTable {
    citation_totals("Authors", &group_by(corpus, |r| r.authors.clone()))
}

/// Total citations per source, highest first.
#[must_use]
pub fn citations_per_source(corpus: &CorpusTable) -> CsvTable {
    citation_totals("Source", &group_by(corpus, |r| vec![r.source.clone()]))
}

/// h-index per author, highest first.
#[must_use]
pub fn h_index_per_author(corpus: &CorpusTable) -> CsvTable {
    h_index_table("Authors", &group_by(corpus, |r| r.authors.clone()))
}

/// h-index per source, highest first.
#[must_use]
pub fn h_index_per_source(corpus: &CorpusTable) -> CsvTable {
    h_index_table("Source", &group_by(corpus, |r| vec![r.source.clone()]))
}

/// Every summary table, in a fixed order.
#[must_use]
pub fn summarize(corpus: &CorpusTable) -> Vec<SummaryTable> {
    vec![
        SummaryTable {
            name: "pubs_by_year",
            table: publications_per_year(corpus),
        },
        SummaryTable {
            name: "cites_by_year",
            table: citations_per_year(corpus),
        },
        SummaryTable {
            name: "top_paper_cites",
            table: top_papers(corpus),
        },
        SummaryTable {
            name: "top_author_cites",
            table: citations_per_author(corpus),
        },
        SummaryTable {
            name: "top_author_hindex",
            table: h_index_per_author(corpus),
        },
        SummaryTable {
            name: "top_source_cites",
            table: citations_per_source(corpus),
        },
        SummaryTable {
            name: "top_source_hindex",
            table: h_index_per_source(corpus),
        },
    ]
}

/// Writes every summary table as `<name>.csv` into `dir`.
///
/// # Errors
/// Returns [`ExportError::Io`] if a file cannot be written.
#[instrument(skip(corpus), fields(rows = corpus.len()))]
pub fn write_summaries(dir: &Path, corpus: &CorpusTable) -> Result<Vec<PathBuf>, ExportError> {
    let mut written = Vec::new();
    for summary in summarize(corpus) {
        let path = dir.join(format!("{}.csv", summary.name));
        summary.table.write_to(&path)?;
        written.push(path);
    }
    info!(tables = written.len(), "Corpus summaries written");
    Ok(written)
}

fn group_by<F>(corpus: &CorpusTable, keys: F) -> BTreeMap<String, Vec<u64>>
where
    F: Fn(&BibliographicRecord) -> Vec<String>,
{
    let mut groups: BTreeMap<String, Vec<u64>> = BTreeMap::new();
    for record in corpus.records() {
        for key in keys(record) {
            let key = key.trim();
            if !key.is_empty() {
                groups.entry(key.to_string()).or_default().push(record.citations);
            }
        }
    }
    groups
}

fn citation_totals(label: &str, groups: &BTreeMap<String, Vec<u64>>) -> CsvTable {
    let mut totals: Vec<(&String, u64)> = groups
        .iter()
        .map(|(name, citations)| (name, citations.iter().sum()))
        .collect();
    totals.sort_by(|a, b| b.1.cmp(&a.1));
    let mut table = CsvTable::new([label, "Citations"]);
    for (name, total) in totals.into_iter().take(TOP_ROWS) {
        table.push(vec![name.clone(), total.to_string()]);
    }
    table
}

fn h_index_table(label: &str, groups: &BTreeMap<String, Vec<u64>>) -> CsvTable {
    let mut rows: Vec<(&String, usize, u64)> = groups
        .iter()
        .map(|(name, citations)| {
            (name, h_index(citations.iter().copied()), citations.iter().sum())
        })
        .collect();
    rows.sort_by(|a, b| b.1.cmp(&a.1).then(b.2.cmp(&a.2)));
    let mut table = CsvTable::new([label, "h-index", "Citations"]);
    for (name, h, total) in rows.into_iter().take(TOP_ROWS) {
        table.push(vec![name.clone(), h.to_string(), total.to_string()]);
    }
    table
}
