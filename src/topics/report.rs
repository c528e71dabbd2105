//! Per-topic summary of a fitted corpus.
//!
//! The report is data only: JSON for downstream rendering, plus a plain-text
//! prompt asking a language model to name each topic.

use std::collections::HashMap;
use std::fmt::Write as _;

use serde::Serialize;
use tracing::instrument;

use super::engine::TopicFit;
use super::integrator::IntegratedCorpus;

/// How many sources and papers each topic lists.
pub const TOP_ENTRIES: usize = 5;
/// Representative documents are cut to this many characters.
pub const REPRESENTATIVE_DOC_CHARS: usize = 800;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceWeight {
    pub source: String,
    /// Sum of the topic's distribution value over the source's papers.
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaperWeight {
    pub title: String,
    pub year: i32,
    pub citations: u64,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopicSection {
    pub topic: i32,
    pub label: String,
    /// Documents assigned to the topic by the fit.
    pub size: usize,
    pub keywords: Vec<String>,
    pub top_sources: Vec<SourceWeight>,
    pub top_papers: Vec<PaperWeight>,
    pub representative_docs: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopicReport {
    pub documents: usize,
    pub outliers: usize,
    pub topics: Vec<TopicSection>,
}

impl TopicReport {
    /// Builds one section per non-outlier topic, in column order.
    #[must_use]
    #[instrument(skip_all, fields(topics = corpus.topic_labels().len()))]
    pub fn build(corpus: &IntegratedCorpus, fit: &TopicFit) -> Self {
        let topics = fit
            .labels
            .topic_ids()
            .into_iter()
            .zip(corpus.topic_labels())
            .enumerate()
            .map(|(column, (id, label))| TopicSection {
                topic: id.0,
                label: label.clone(),
                size: fit.topic_size(id),
                keywords: fit.keywords.get(&id).cloned().unwrap_or_default(),
                top_sources: top_sources(corpus, column),
                top_papers: top_papers(corpus, column),
                representative_docs: fit
                    .representative_docs
                    .get(&id)
                    .map(|docs| docs.iter().map(|doc| truncate_doc(doc)).collect())
                    .unwrap_or_default(),
            })
            .collect();

        Self {
            documents: fit.assignments.len(),
            outliers: fit
                .assignments
                .iter()
                .filter(|assignment| assignment.topic.is_outlier())
                .count(),
            topics,
        }
    }

    /// Serializes the report as pretty-printed JSON.
    ///
    /// # Errors
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Renders a prompt asking a language model for a short label per topic.
#[must_use]
pub fn label_prompt(section: &TopicSection) -> String {
    let mut prompt = String::from("I have a topic that contains the following documents:\n");
    for doc in &section.representative_docs {
        let _ = writeln!(prompt, "- {doc}");
    }
    let _ = write!(
        prompt,
        "The topic is described by the following keywords: {}\n\
         Based on the above, can you give a short label of the topic?",
        section.keywords.join(", ")
    );
    prompt
}

fn truncate_doc(doc: &str) -> String {
    match doc.char_indices().nth(REPRESENTATIVE_DOC_CHARS) {
        Some((cut, _)) => format!("{}...", &doc[..cut]),
        None => doc.to_string(),
    }
}

fn top_sources(corpus: &IntegratedCorpus, column: usize) -> Vec<SourceWeight> {
    let mut order: Vec<&str> = Vec::new();
    let mut sums: HashMap<&str, f64> = HashMap::new();
    for (row, record, _) in corpus.rows() {
        let entry = sums.entry(record.source.as_str()).or_insert_with(|| {
            order.push(record.source.as_str());
            0.0
        });
        *entry += corpus.topic_value(row, column);
    }

    let mut sources: Vec<SourceWeight> = order
        .into_iter()
        .map(|source| SourceWeight {
            source: source.to_string(),
            weight: sums.get(source).copied().unwrap_or(0.0),
        })
        .collect();
    sources.sort_by(|a, b| b.weight.total_cmp(&a.weight));
    sources.truncate(TOP_ENTRIES);
    sources
}

fn top_papers(corpus: &IntegratedCorpus, column: usize) -> Vec<PaperWeight> {
    let mut papers: Vec<PaperWeight> = corpus
        .rows()
        .map(|(row, record, _)| PaperWeight {
            title: record.title.clone(),
            year: record.year,
            citations: record.citations,
            weight: corpus.topic_value(row, column),
        })
        .collect();
    papers.sort_by(|a, b| b.weight.total_cmp(&a.weight));
    papers.truncate(TOP_ENTRIES);
    papers
}
