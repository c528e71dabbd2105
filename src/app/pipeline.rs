//! Stages shared by the subcommands: load and normalize an export, model its
//! topics, and prepare a run directory.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use anyhow::{Context, Result, bail};
use litrank_core::corpus::{CorpusTable, IngestPolicy, IngestWarning, SourceSchema, normalize};
use litrank_core::export::unique_output_dir;
use litrank_core::ris::{RisEntry, load_ris_file};
use litrank_core::topics::{
    IntegratedCorpus, KeywordTopicEngine, PrecomputedTopics, TopicEngine, TopicFit, integrate,
    run_topic_fit,
};
use tracing::{info, warn};

use crate::app::config_runtime::Settings;
use crate::app::progress::EngineSpinner;
use crate::cli::{EngineKind, TopicArgs};

/// A normalized export with the raw entries kept for the round trip.
pub(crate) struct LoadedCorpus {
    pub(crate) raw: Vec<RisEntry>,
    pub(crate) table: CorpusTable,
    pub(crate) skipped: Vec<IngestWarning>,
}

pub(crate) fn load_corpus(
    input: &Path,
    source: SourceSchema,
    skip_invalid: bool,
) -> Result<LoadedCorpus> {
    let raw = load_ris_file(input)
        .with_context(|| format!("Failed to read RIS export '{}'", input.display()))?;
    let policy = if skip_invalid {
        IngestPolicy::SkipInvalid
    } else {
        IngestPolicy::Strict
    };
    let outcome = normalize(&raw, source, policy).with_context(|| {
        format!(
            "Failed to normalize '{}' as a {source} export\n  Suggestion: check --source, or pass --skip-invalid to drop bad records",
            input.display()
        )
    })?;
    for skipped in &outcome.warnings {
        warn!(row = skipped.row, error = %skipped.error, "Record skipped");
    }
    Ok(LoadedCorpus {
        raw,
        table: outcome.table,
        skipped: outcome.warnings,
    })
}

/// Builds the configured engine, or `None` when topic modelling is off.
pub(crate) fn build_engine(
    kind: EngineKind,
    topics_file: Option<&Path>,
) -> Result<Option<Box<dyn TopicEngine>>> {
    if kind != EngineKind::Precomputed && topics_file.is_some() {
        warn!(engine = kind.as_str(), "--topics-file is only read by the precomputed engine");
    }
    match kind {
        EngineKind::Off => Ok(None),
        EngineKind::Keyword => Ok(Some(Box::new(KeywordTopicEngine::new()))),
        EngineKind::Precomputed => {
            let Some(path) = topics_file else {
                bail!(
                    "The precomputed engine needs --topics-file\n  Suggestion: pass the JSON written by the external topic model run"
                );
            };
            let engine = PrecomputedTopics::load(path)
                .with_context(|| format!("Failed to load topics from '{}'", path.display()))?;
            Ok(Some(Box::new(engine)))
        }
    }
}

/// A corpus with topic columns attached, and the fit that produced them.
pub(crate) struct Modelled {
    pub(crate) corpus: IntegratedCorpus,
    pub(crate) fit: Option<TopicFit>,
}

impl Modelled {
    fn without_topics(table: CorpusTable) -> Self {
        Self {
            corpus: IntegratedCorpus::without_topics(table),
            fit: None,
        }
    }
}

/// Runs the engine over the abstracts of `table` and integrates the result.
pub(crate) async fn model_topics(
    table: CorpusTable,
    topics: &TopicArgs,
    settings: &Settings,
    use_spinner: bool,
) -> Result<Modelled> {
    let Some(engine) = build_engine(settings.engine, topics.topics_file.as_deref())? else {
        info!("Topic modelling disabled");
        return Ok(Modelled::without_topics(table));
    };
    if table.abstract_count() == 0 {
        warn!("No record has an abstract; continuing without topics");
        return Ok(Modelled::without_topics(table));
    }

    let spinner = EngineSpinner::start(
        use_spinner,
        format!(
            "Fitting topics on {} abstracts ({} engine)",
            table.abstract_count(),
            engine.name()
        ),
    );
    let run = run_topic_fit(
        engine.as_ref(),
        &table,
        topics.n_topics,
        Some(settings.seed),
        settings.timeout(),
    )
    .await;
    spinner.finish();
    let run = run.context("Topic modelling did not complete")?;

    let corpus = integrate(table, &run.matrix, &run.fit.labels)
        .context("Topic distribution does not line up with the corpus")?;
    Ok(Modelled {
        corpus,
        fit: Some(run.fit),
    })
}

/// Creates a fresh `base/name` directory, timestamped if `name` is taken.
pub(crate) fn create_run_dir(base: &Path, name: &str) -> Result<PathBuf> {
    let dir = unique_output_dir(base, name, SystemTime::now(), Path::exists);
    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create output directory '{}'", dir.display()))?;
    info!(dir = %dir.display(), "Created output directory");
    Ok(dir)
}
