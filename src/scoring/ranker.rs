//! Composite scoring and ranking.

use tracing::{info, instrument};

use super::error::ScoreError;
use super::normalize::min_max;
use super::weights::WeightSpecification;
use crate::corpus::{BibliographicRecord, RowId};
use crate::topics::IntegratedCorpus;

/// Suffix for per-topic weighted columns.
pub const WEIGHTED_SUFFIX: &str = "W";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoringOptions {
    /// Keep the per-topic weighted values on each ranked record.
    pub include_component_scores: bool,
}

/// A record with its score components.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedRecord {
    pub row: RowId,
    pub record: BibliographicRecord,
    /// Raw topic values, one per topic column; zero for rows without an abstract.
    pub topics: Vec<f64>,
    /// Topic value times topic weight, one per weighted topic.
    /// Present only when component scores were requested.
    pub weighted_topics: Option<Vec<f64>>,
    pub cite_score: f64,
    pub recency_score: f64,
    pub topic_score: f64,
    pub score: f64,
}

/// Records ordered by composite score, highest first.
#[derive(Debug, Clone, PartialEq)]
pub struct Ranking {
    topic_labels: Vec<String>,
    weighted_labels: Vec<String>,
    records: Vec<RankedRecord>,
}

impl Ranking {
    #[must_use]
    pub fn records(&self) -> &[RankedRecord] {
        &self.records
    }

    /// Raw topic column names.
    #[must_use]
    pub fn topic_labels(&self) -> &[String] {
        &self.topic_labels
    }

    /// Topics that carried a weight, in column order. The weighted column
    /// for each is named `<label>W`.
    #[must_use]
    pub fn weighted_labels(&self) -> &[String] {
        &self.weighted_labels
    }

    #[must_use]
    pub fn include_component_scores(&self) -> bool {
        self.records
            .first()
            .is_some_and(|ranked| ranked.weighted_topics.is_some())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Scores every record and sorts by composite score, descending.
///
/// Citation count, year and the weighted topic total are each min-max
/// normalized over the batch and multiplied by their reserved weight; the
/// composite is their sum. A criterion whose values are all equal
/// contributes zero. Ties keep table order.
///
/// # Errors
/// Returns [`ScoreError::EmptyCorpus`] for an empty corpus, or a weight
/// error from [`WeightSpecification::validate_against`].
#[instrument(skip_all, fields(rows = corpus.len(), topics = corpus.topic_labels().len()))]
pub fn score(
    corpus: &IntegratedCorpus,
    weights: &WeightSpecification,
    options: ScoringOptions,
) -> Result<Ranking, ScoreError> {
    if corpus.is_empty() {
        return Err(ScoreError::EmptyCorpus);
    }
    weights.validate_against(corpus.topic_labels())?;

    let weighted: Vec<(usize, f64)> = corpus
        .topic_labels()
        .iter()
        .enumerate()
        .filter_map(|(column, label)| weights.topics.get(label).map(|w| (column, *w)))
        .collect();

    #[allow(clippy::cast_precision_loss)]
    let citations: Vec<f64> = corpus.rows().map(|(_, r, _)| r.citations as f64).collect();
    let years: Vec<f64> = corpus.rows().map(|(_, r, _)| f64::from(r.year)).collect();
    let weighted_values: Vec<Vec<f64>> = corpus
        .rows()
        .map(|(row, _, _)| {
            weighted
                .iter()
                .map(|(column, w)| corpus.topic_value(row, *column) * w)
                .collect()
        })
        .collect();
    let topic_totals: Vec<f64> = weighted_values.iter().map(|v| v.iter().sum()).collect();

    let cite_norm = min_max(&citations);
    let recency_norm = min_max(&years);
    let topic_norm = min_max(&topic_totals);

    let columns = corpus.topic_labels().len();
    let mut records: Vec<RankedRecord> = corpus
        .rows()
        .zip(weighted_values)
        .enumerate()
        .map(|(i, ((row, record, _), weighted_topics))| {
            let cite_score = cite_norm[i] * weights.reserved.cites;
            let recency_score = recency_norm[i] * weights.reserved.recency;
            let topic_score = topic_norm[i] * weights.reserved.topics;
            RankedRecord {
                row,
                record: record.clone(),
                topics: (0..columns).map(|c| corpus.topic_value(row, c)).collect(),
                weighted_topics: options.include_component_scores.then_some(weighted_topics),
                cite_score,
                recency_score,
                topic_score,
                score: cite_score + recency_score + topic_score,
            }
        })
        .collect();

    records.sort_by(|a, b| b.score.total_cmp(&a.score));

    info!(
        ranked = records.len(),
        weighted_topics = weighted.len(),
        "Corpus scored"
    );
    Ok(Ranking {
        topic_labels: corpus.topic_labels().to_vec(),
        weighted_labels: weighted
            .iter()
            .map(|(column, _)| corpus.topic_labels()[*column].clone())
            .collect(),
        records,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::corpus::CorpusTable;
    use crate::corpus::test_support::record;
    use crate::topics::{
        DistributionRow, OUTLIER_LABEL, OUTLIER_TOPIC, TopicId, TopicLabels, TopicMatrix, integrate,
    };

    fn weights(cites: f64, recency: f64, topics: f64) -> WeightSpecification {
        WeightSpecification::from_map([
            ("cites".to_string(), cites),
            ("recency".to_string(), recency),
            ("topics".to_string(), topics),
        ])
        .unwrap()
    }

    fn plain(citations: &[u64], years: &[i32]) -> IntegratedCorpus {
        let records = citations
            .iter()
            .zip(years)
            .enumerate()
            .map(|(i, (c, y))| record(&format!("paper {i}"), *c, *y, None))
            .collect();
        IntegratedCorpus::without_topics(CorpusTable::new(records))
    }

    fn titles(ranking: &Ranking) -> Vec<&str> {
        ranking
            .records()
            .iter()
            .map(|r| r.record.title.as_str())
            .collect()
    }

    fn with_topics() -> IntegratedCorpus {
        let records = vec![
            record("graphs", 1, 2020, Some("a")),
            record("screening", 1, 2020, Some("b")),
            record("no abstract", 1, 2020, None),
        ];
        let labels = TopicLabels::new(BTreeMap::from([
            (OUTLIER_TOPIC, OUTLIER_LABEL.to_string()),
            (TopicId(0), "0_graphs".to_string()),
            (TopicId(1), "1_screening".to_string()),
        ]));
        let matrix = TopicMatrix {
            rows: vec![
                DistributionRow {
                    row: RowId(0),
                    values: vec![0.9, 0.1],
                },
                DistributionRow {
                    row: RowId(1),
                    values: vec![0.2, 0.8],
                },
            ],
        };
        integrate(CorpusTable::new(records), &matrix, &labels).unwrap()
    }

    #[test]
    fn test_citation_only_weights_sort_by_citations_stably() {
        let corpus = plain(&[10, 0, 5, 5], &[2020, 2019, 2021, 2021]);
        let ranking = score(&corpus, &weights(1.0, 0.0, 0.0), ScoringOptions::default()).unwrap();
        assert_eq!(titles(&ranking), vec!["paper 0", "paper 2", "paper 3", "paper 1"]);
        let rows: Vec<_> = ranking.records().iter().map(|r| r.row).collect();
        assert_eq!(rows, vec![RowId(0), RowId(2), RowId(3), RowId(1)]);
    }

    #[test]
    fn test_citation_ranking_matches_raw_sort() {
        let citations = [3, 41, 7, 0, 19, 2];
        let corpus = plain(&citations, &[2020; 6]);
        let ranking = score(&corpus, &weights(1.0, 0.0, 0.0), ScoringOptions::default()).unwrap();
        let ranked: Vec<u64> = ranking.records().iter().map(|r| r.record.citations).collect();
        let mut expected = citations.to_vec();
        expected.sort_unstable_by(|a, b| b.cmp(a));
        assert_eq!(ranked, expected);
    }

    #[test]
    fn test_normalized_components_span_unit_interval() {
        let corpus = plain(&[10, 0, 5], &[2018, 2022, 2020]);
        let ranking = score(&corpus, &weights(1.0, 1.0, 0.0), ScoringOptions::default()).unwrap();
        let by_title = |t: &str| {
            ranking
                .records()
                .iter()
                .find(|r| r.record.title == t)
                .unwrap()
                .clone()
        };
        assert!((by_title("paper 0").cite_score - 1.0).abs() < 1e-12);
        assert!(by_title("paper 1").cite_score.abs() < 1e-12);
        assert!((by_title("paper 1").recency_score - 1.0).abs() < 1e-12);
        assert!(by_title("paper 0").recency_score.abs() < 1e-12);
        assert!((by_title("paper 2").recency_score - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_equal_citations_give_zero_component() {
        let corpus = plain(&[4, 4, 4], &[2019, 2020, 2021]);
        let ranking = score(&corpus, &weights(1.0, 0.0, 0.0), ScoringOptions::default()).unwrap();
        assert!(ranking.records().iter().all(|r| r.cite_score == 0.0));
        assert_eq!(titles(&ranking), vec!["paper 0", "paper 1", "paper 2"]);
    }

    #[test]
    fn test_reserved_weights_scale_components() {
        let corpus = plain(&[0, 10], &[2020, 2020]);
        let ranking = score(&corpus, &weights(0.4, 1.0, 1.0), ScoringOptions::default()).unwrap();
        assert!((ranking.records()[0].cite_score - 0.4).abs() < 1e-12);
        assert!((ranking.records()[0].score - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_topic_component_uses_topic_weights() {
        let corpus = with_topics();
        let mut spec = weights(0.0, 0.0, 1.0);
        spec.set("1_screening", 1.0).unwrap();
        let ranking = score(&corpus, &spec, ScoringOptions::default()).unwrap();
        assert_eq!(titles(&ranking), vec!["screening", "graphs", "no abstract"]);
        assert!((ranking.records()[0].topic_score - 1.0).abs() < 1e-12);
        assert!(ranking.records()[2].topic_score.abs() < 1e-12);
        assert_eq!(ranking.weighted_labels(), ["1_screening"]);
        assert!(ranking.records()[0].weighted_topics.is_none());
        assert!(!ranking.include_component_scores());
    }

    #[test]
    fn test_component_scores_are_kept_on_request() {
        let corpus = with_topics();
        let mut spec = weights(0.0, 0.0, 1.0);
        spec.set("0_graphs", 0.5).unwrap();
        spec.set("1_screening", 0.5).unwrap();
        let options = ScoringOptions {
            include_component_scores: true,
        };
        let ranking = score(&corpus, &spec, options).unwrap();
        let graphs = ranking
            .records()
            .iter()
            .find(|r| r.record.title == "graphs")
            .unwrap();
        let weighted = graphs.weighted_topics.as_ref().unwrap();
        assert!((weighted[0] - 0.45).abs() < 1e-12);
        assert!((weighted[1] - 0.05).abs() < 1e-12);
        assert_eq!(graphs.topics, vec![0.9, 0.1]);
        assert!(ranking.include_component_scores());
    }

    #[test]
    fn test_no_topic_weights_gives_zero_topic_score() {
        let corpus = with_topics();
        let ranking = score(&corpus, &weights(0.0, 0.0, 1.0), ScoringOptions::default()).unwrap();
        assert!(ranking.records().iter().all(|r| r.topic_score == 0.0));
    }

    #[test]
    fn test_empty_corpus_is_rejected() {
        let corpus = IntegratedCorpus::without_topics(CorpusTable::default());
        let result = score(&corpus, &weights(1.0, 0.0, 0.0), ScoringOptions::default());
        assert_eq!(result, Err(ScoreError::EmptyCorpus));
    }

    #[test]
    fn test_unknown_topic_weight_is_rejected() {
        let corpus = with_topics();
        let mut spec = weights(0.0, 0.0, 1.0);
        spec.set("2_soil", 1.0).unwrap();
        let result = score(&corpus, &spec, ScoringOptions::default());
        assert!(matches!(result, Err(ScoreError::UnknownTopicWeight { .. })));
    }
}
