//! Topic modelling for ranked literature review.
//!
//! The pipeline submits the abstract-bearing rows of a corpus to a
//! [`TopicEngine`], attaches the returned distribution matrix to the corpus
//! with [`integrate`], and summarizes each topic with [`TopicReport`].
//!
//! Two engines ship with the crate: [`PrecomputedTopics`] replays the JSON
//! output of an external embedding and clustering run, and
//! [`KeywordTopicEngine`] clusters abstracts on RAKE keywords.

mod engine;
mod extractor;
mod integrator;
mod keyword;
mod normalizer;
mod precomputed;
mod report;
mod scaler;

pub use engine::{
    DistributionRow, Document, OUTLIER_LABEL, OUTLIER_TOPIC, TopicAssignment, TopicCount,
    TopicEngine, TopicEngineError, TopicFit, TopicId, TopicLabels, TopicMatrix, TopicRequest,
    documents_from, run_cancellable,
};
pub use extractor::KeywordExtractor;
pub use integrator::{IntegratedCorpus, IntegrationError, integrate};
pub use keyword::KeywordTopicEngine;
pub use normalizer::{normalize_terms, topic_label};
pub use precomputed::PrecomputedTopics;
pub use report::{
    PaperWeight, REPRESENTATIVE_DOC_CHARS, SourceWeight, TOP_ENTRIES, TopicReport, TopicSection,
    label_prompt,
};
pub use scaler::{
    FIXED_COUNT_MIN_TOPIC_SIZE, FIXED_COUNT_NEIGHBORHOOD_SIZE, REFERENCE_CORPUS_SIZE,
    TopicHyperparameters, scale,
};

use std::time::Duration;

use tracing::{info, instrument};

use crate::corpus::CorpusTable;

/// Everything one engine run produces for a corpus.
#[derive(Debug, Clone, PartialEq)]
pub struct TopicRun {
    pub documents: Vec<Document>,
    pub fit: TopicFit,
    pub matrix: TopicMatrix,
}

/// Fits `engine` to the abstracts of `corpus` and computes their distribution.
///
/// With a fixed topic count, a fit that produced more topics is reduced to
/// the target. The whole sequence is one cancellable unit bounded by
/// `timeout`; the corpus is only read.
///
/// # Errors
/// Returns [`TopicEngineError::NoDocuments`] if no row has an abstract,
/// [`TopicEngineError::Cancelled`]/[`TopicEngineError::TimedOut`] when the
/// run is abandoned, or any error the engine reports.
#[instrument(skip(engine, corpus), fields(engine = engine.name(), rows = corpus.len()))]
pub async fn run_topic_fit(
    engine: &dyn TopicEngine,
    corpus: &CorpusTable,
    count: TopicCount,
    seed: Option<u64>,
    timeout: Option<Duration>,
) -> Result<TopicRun, TopicEngineError> {
    let documents = documents_from(corpus);
    if documents.is_empty() {
        return Err(TopicEngineError::NoDocuments);
    }
    let request = TopicRequest::for_documents(documents.len(), count, seed);
    info!(
        documents = documents.len(),
        count = %count,
        min_topic_size = request.hyperparameters.min_topic_size,
        neighborhood_size = request.hyperparameters.neighborhood_size,
        "Fitting topics"
    );

    let work = async {
        let mut fit = engine.fit(&documents, &request).await?;
        if let TopicCount::Fixed(target) = count
            && fit.labels.topic_ids().len() > target
        {
            fit = engine.reduce(&documents, &fit, count).await?;
        }
        let matrix = engine.approximate_distribution(&documents, &fit).await?;
        Ok::<_, TopicEngineError>((fit, matrix))
    };
    let (fit, matrix) = run_cancellable(work, timeout).await?;

    info!(topics = fit.labels.topic_ids().len(), "Topics fitted");
    Ok(TopicRun {
        documents,
        fit,
        matrix,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::corpus::RowId;
    use crate::corpus::test_support::record;

    #[tokio::test]
    async fn test_run_topic_fit_requires_abstracts() {
        let corpus = CorpusTable::new(vec![record("a", 1, 2020, None)]);
        let result =
            run_topic_fit(&KeywordTopicEngine::new(), &corpus, TopicCount::Auto, None, None).await;
        assert!(matches!(result, Err(TopicEngineError::NoDocuments)));
    }

    #[tokio::test]
    async fn test_run_topic_fit_with_precomputed_engine_integrates() {
        let engine = PrecomputedTopics::from_json(
            r#"{"labels": {"-1": "-1_outlier", "0": "0_a"},
                "documents": [{"row": 1, "topic": 0, "probability": 0.8, "distribution": [0.8]}]}"#,
        )
        .unwrap();
        let corpus = CorpusTable::new(vec![
            record("no abstract", 1, 2020, None),
            record("with abstract", 2, 2021, Some("text")),
        ]);
        let run = run_topic_fit(&engine, &corpus, TopicCount::Auto, Some(123), None)
            .await
            .unwrap();
        assert_eq!(run.documents[0].row, RowId(1));
        assert_eq!(run.fit.seed, Some(123));

        let integrated = integrate(corpus, &run.matrix, &run.fit.labels).unwrap();
        assert!((integrated.topic_value(RowId(1), 0) - 0.8).abs() < f64::EPSILON);
    }
}
