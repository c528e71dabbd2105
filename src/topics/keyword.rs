//! Deterministic keyword-clustering topic engine.
//!
//! Each document is reduced to its top RAKE terms (the neighborhood size
//! widens how many are kept). Terms shared by at least `min_topic_size` documents seed
//! topics; a topic is described by its seed plus the terms that most often
//! co-occur with it. A document's weight for a topic is the share of the
//! topic's terms found among the document's terms.

use std::collections::{BTreeMap, HashMap, HashSet};

use async_trait::async_trait;
use tracing::{debug, info, instrument};

use super::engine::{
    DistributionRow, Document, OUTLIER_LABEL, OUTLIER_TOPIC, TopicAssignment, TopicCount,
    TopicEngine, TopicEngineError, TopicFit, TopicId, TopicLabels, TopicMatrix, TopicRequest,
};
use super::extractor::KeywordExtractor;
use super::normalizer::topic_label;
use super::scaler::TopicHyperparameters;

const ENGINE_NAME: &str = "keyword";
/// Terms describing one topic, seed included.
const TERMS_PER_TOPIC: usize = 5;
/// Terms shown in a topic label.
const LABEL_TERMS: usize = 4;
const REPRESENTATIVE_DOCS: usize = 3;
/// Terms kept per document before the neighborhood size is added.
const BASE_TERMS_PER_DOC: usize = 10;
/// A topic must be shared; single-document terms never seed one.
const MIN_SEED_DOCUMENTS: usize = 2;
/// A candidate seed is skipped when this share of its documents already
/// belongs to a chosen seed.
const MAX_SEED_OVERLAP: f64 = 0.5;

/// Built-in engine; needs no model files and gives identical output for
/// identical input, with or without a seed.
#[derive(Debug, Default, Clone, Copy)]
pub struct KeywordTopicEngine;

impl KeywordTopicEngine {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TopicEngine for KeywordTopicEngine {
    fn name(&self) -> &'static str {
        ENGINE_NAME
    }

    #[instrument(
        skip(self, documents),
        fields(documents = documents.len(), count = %request.count)
    )]
    async fn fit(
        &self,
        documents: &[Document],
        request: &TopicRequest,
    ) -> Result<TopicFit, TopicEngineError> {
        if documents.is_empty() {
            return Err(TopicEngineError::NoDocuments);
        }
        let documents = documents.to_vec();
        let request = *request;
        blocking(move || {
            let doc_terms = extract_all(&documents, request.hyperparameters.neighborhood_size);
            let cap = match request.count {
                TopicCount::Auto => usize::MAX,
                TopicCount::Fixed(n) => n,
            };
            let topics = select_topics(&doc_terms, request.hyperparameters.min_topic_size, cap);
            Ok(build_fit(
                &documents,
                &doc_terms,
                topics,
                request.hyperparameters,
                request.seed,
            ))
        })
        .await
    }

    #[instrument(skip(self, documents, fit), fields(documents = documents.len(), %target))]
    async fn reduce(
        &self,
        documents: &[Document],
        fit: &TopicFit,
        target: TopicCount,
    ) -> Result<TopicFit, TopicEngineError> {
        let documents = documents.to_vec();
        let fit = fit.clone();
        blocking(move || {
            let mut ranked: Vec<(TopicId, usize)> = fit
                .labels
                .topic_ids()
                .into_iter()
                .map(|id| (id, fit.topic_size(id)))
                .collect();
            ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

            let mut keep: Vec<TopicId> = match target {
                TopicCount::Fixed(n) => ranked.iter().take(n).map(|(id, _)| *id).collect(),
                TopicCount::Auto => {
                    let min_size = fit.hyperparameters.min_topic_size;
                    let mut kept: Vec<TopicId> = ranked
                        .iter()
                        .filter(|(_, size)| *size >= min_size)
                        .map(|(id, _)| *id)
                        .collect();
                    if kept.is_empty() {
                        kept.extend(ranked.first().map(|(id, _)| *id));
                    }
                    kept
                }
            };
            keep.sort();

            let topics: Vec<Vec<String>> = keep
                .iter()
                .filter_map(|id| fit.keywords.get(id).cloned())
                .collect();
            debug!(before = ranked.len(), after = topics.len(), "Topics reduced");

            let doc_terms = extract_all(&documents, fit.hyperparameters.neighborhood_size);
            Ok(build_fit(
                &documents,
                &doc_terms,
                topics,
                fit.hyperparameters,
                fit.seed,
            ))
        })
        .await
    }

    #[instrument(skip(self, documents, fit), fields(documents = documents.len()))]
    async fn approximate_distribution(
        &self,
        documents: &[Document],
        fit: &TopicFit,
    ) -> Result<TopicMatrix, TopicEngineError> {
        let documents = documents.to_vec();
        let topics: Vec<Vec<String>> = fit
            .labels
            .topic_ids()
            .iter()
            .map(|id| fit.keywords.get(id).cloned().unwrap_or_default())
            .collect();
        let neighborhood = fit.hyperparameters.neighborhood_size;
        blocking(move || {
            let doc_terms = extract_all(&documents, neighborhood);
            let rows = documents
                .iter()
                .zip(&doc_terms)
                .map(|(document, terms)| DistributionRow {
                    row: document.row,
                    values: topics.iter().map(|topic| topic_weight(terms, topic)).collect(),
                })
                .collect();
            Ok(TopicMatrix { rows })
        })
        .await
    }
}

/// Runs CPU-bound work off the async executor.
async fn blocking<T, F>(work: F) -> Result<T, TopicEngineError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, TopicEngineError> + Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|error| TopicEngineError::Engine {
            engine: ENGINE_NAME,
            reason: error.to_string(),
        })?
}

fn extract_all(documents: &[Document], neighborhood: usize) -> Vec<HashSet<String>> {
    let extractor = KeywordExtractor::new();
    documents
        .iter()
        .map(|document| {
            extractor
                .terms(&document.text, BASE_TERMS_PER_DOC + neighborhood)
                .into_iter()
                .collect()
        })
        .collect()
}

/// Chooses topic term lists, most widespread seed first.
#[allow(clippy::cast_precision_loss)]
fn select_topics(
    doc_terms: &[HashSet<String>],
    min_topic_size: usize,
    cap: usize,
) -> Vec<Vec<String>> {
    let mut postings: HashMap<&str, Vec<usize>> = HashMap::new();
    for (index, terms) in doc_terms.iter().enumerate() {
        for term in terms {
            postings.entry(term.as_str()).or_default().push(index);
        }
    }

    let mut candidates: Vec<(&str, &Vec<usize>)> = postings
        .iter()
        .filter(|(_, docs)| docs.len() >= min_topic_size.max(MIN_SEED_DOCUMENTS))
        .map(|(term, docs)| (*term, docs))
        .collect();
    candidates.sort_by(|a, b| b.1.len().cmp(&a.1.len()).then(a.0.cmp(b.0)));

    let mut covered: HashSet<usize> = HashSet::new();
    let mut seeds: Vec<(&str, &Vec<usize>)> = Vec::new();
    for (term, docs) in candidates {
        if seeds.len() >= cap {
            break;
        }
        let overlap = docs.iter().filter(|doc| covered.contains(doc)).count();
        if (overlap as f64) / (docs.len() as f64) > MAX_SEED_OVERLAP {
            continue;
        }
        covered.extend(docs.iter().copied());
        seeds.push((term, docs));
    }

    let seed_terms: HashSet<&str> = seeds.iter().map(|(term, _)| *term).collect();
    let topics: Vec<Vec<String>> = seeds
        .iter()
        .map(|(seed, docs)| describe_topic(seed, docs, doc_terms, &seed_terms))
        .collect();
    info!(topics = topics.len(), "Keyword topics selected");
    topics
}

fn describe_topic(
    seed: &str,
    docs: &[usize],
    doc_terms: &[HashSet<String>],
    seed_terms: &HashSet<&str>,
) -> Vec<String> {
    let mut co_counts: BTreeMap<&str, usize> = BTreeMap::new();
    for &doc in docs {
        for term in &doc_terms[doc] {
            if !seed_terms.contains(term.as_str()) {
                *co_counts.entry(term.as_str()).or_default() += 1;
            }
        }
    }
    let mut co_terms: Vec<(&str, usize)> = co_counts.into_iter().collect();
    co_terms.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));

    std::iter::once(seed.to_string())
        .chain(
            co_terms
                .into_iter()
                .take(TERMS_PER_TOPIC - 1)
                .map(|(term, _)| term.to_string()),
        )
        .collect()
}

#[allow(clippy::cast_precision_loss)]
fn topic_weight(doc_terms: &HashSet<String>, topic_terms: &[String]) -> f64 {
    if topic_terms.is_empty() {
        return 0.0;
    }
    let hits = topic_terms
        .iter()
        .filter(|term| doc_terms.contains(*term))
        .count();
    hits as f64 / topic_terms.len() as f64
}

fn build_fit(
    documents: &[Document],
    doc_terms: &[HashSet<String>],
    topics: Vec<Vec<String>>,
    hyperparameters: TopicHyperparameters,
    seed: Option<u64>,
) -> TopicFit {
    let mut labels = BTreeMap::from([(OUTLIER_TOPIC, OUTLIER_LABEL.to_string())]);
    let mut keywords = BTreeMap::new();
    for (index, terms) in topics.into_iter().enumerate() {
        let id = TopicId(i32::try_from(index).unwrap_or(i32::MAX));
        labels.insert(id, topic_label(id.0, &terms, LABEL_TERMS));
        keywords.insert(id, terms);
    }

    let mut assignments = Vec::with_capacity(documents.len());
    let mut members: BTreeMap<TopicId, Vec<(f64, usize)>> = BTreeMap::new();
    for (index, (document, terms)) in documents.iter().zip(doc_terms).enumerate() {
        let mut best = (OUTLIER_TOPIC, 0.0_f64);
        for (id, topic_terms) in &keywords {
            let weight = topic_weight(terms, topic_terms);
            if weight > best.1 {
                best = (*id, weight);
            }
        }
        if !best.0.is_outlier() {
            members.entry(best.0).or_default().push((best.1, index));
        }
        assignments.push(TopicAssignment {
            row: document.row,
            topic: best.0,
            confidence: best.1,
        });
    }

    let representative_docs = members
        .into_iter()
        .map(|(id, mut docs)| {
            docs.sort_by(|a, b| b.0.total_cmp(&a.0).then(a.1.cmp(&b.1)));
            let texts = docs
                .into_iter()
                .take(REPRESENTATIVE_DOCS)
                .map(|(_, index)| documents[index].text.clone())
                .collect();
            (id, texts)
        })
        .collect();

    TopicFit {
        assignments,
        labels: TopicLabels::new(labels),
        keywords,
        representative_docs,
        hyperparameters,
        seed,
    }
}
