//! `litrank rank`: score every paper and write the shortlist.

use anyhow::{Context, Result};
use litrank_core::export::{export, write_weights};
use litrank_core::scoring::{
    CITES_KEY, RECENCY_KEY, ScoringOptions, TOPICS_KEY, WeightSpecification, score,
};
use tracing::{info, warn};

use crate::ProcessExit;
use crate::app::config_runtime::CliOverrides;
use crate::app::exit_handler::determine_exit_outcome;
use crate::app::pipeline::{self, LoadedCorpus};
use crate::app::runtime::RunContext;
use crate::cli::RankArgs;

const RUN_DIR: &str = "sources";

pub(crate) async fn run_rank_command(ctx: &RunContext, args: &RankArgs) -> Result<ProcessExit> {
    let settings = ctx.settings(
        &CliOverrides::from_input(&args.input)
            .with_topics(&args.topics)
            .with_shortlist(args.top, args.include_scores),
    );
    let LoadedCorpus {
        raw,
        table,
        skipped,
    } = pipeline::load_corpus(&args.input.input, settings.source, args.input.skip_invalid)?;

    let modelled = pipeline::model_topics(table, &args.topics, &settings, ctx.use_spinner()).await?;
    let weights = resolve_weights(args, modelled.corpus.topic_labels())?;
    let ranking = score(
        &modelled.corpus,
        &weights,
        ScoringOptions {
            include_component_scores: settings.include_scores,
        },
    )
    .context("Failed to score the corpus")?;

    let shortlist = export(
        &ranking,
        settings.shortlist,
        args.roundtrip.then_some(raw.as_slice()),
    );
    for unmatched in shortlist.warnings() {
        warn!(%unmatched, "Round-trip entry filled with placeholders");
    }

    let dir = pipeline::create_run_dir(&settings.output_dir, RUN_DIR)?;
    let mut written = shortlist
        .write_to(&dir)
        .context("Failed to write the shortlist")?;
    written.push(write_weights(&dir, &weights).context("Failed to write weights")?);

    let shortlisted = shortlist.table.rows.len();
    info!(
        ranked = ranking.len(),
        shortlisted,
        skipped = skipped.len(),
        unmatched = shortlist.warnings().len(),
        "Ranking complete"
    );

    if !ctx.quiet() {
        println!(
            "Ranked {} papers, shortlisted {} into {}",
            ranking.len(),
            shortlisted,
            dir.display()
        );
        for path in &written {
            println!("  {}", path.display());
        }
        if !shortlist.warnings().is_empty() {
            println!(
                "{} shortlisted papers had no matching raw entry and were exported with '{}' placeholders",
                shortlist.warnings().len(),
                litrank_core::export::SENTINEL
            );
        }
    }

    Ok(determine_exit_outcome(
        shortlisted,
        skipped.len() + shortlist.warnings().len(),
    ))
}

/// Weight file or defaults, then individual CLI weights on top.
fn resolve_weights(args: &RankArgs, labels: &[String]) -> Result<WeightSpecification> {
    let mut weights = match &args.weights {
        Some(path) => WeightSpecification::load(path)?,
        None => WeightSpecification::defaults_for(labels),
    };
    let reserved = [
        (CITES_KEY, args.cites),
        (RECENCY_KEY, args.recency),
        (TOPICS_KEY, args.topics_weight),
    ];
    for (key, value) in reserved {
        if let Some(value) = value {
            weights.set(key, value)?;
        }
    }
    for (label, value) in &args.topic_weights {
        weights.set(label, *value)?;
    }
    weights
        .validate_against(labels)
        .context("Weights do not match the fitted topics")?;
    Ok(weights)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clap::Parser;

    use crate::cli::{Cli, Command};

    fn rank_args(extra: &[&str]) -> RankArgs {
        let mut argv = vec!["litrank", "rank", "export.ris"];
        argv.extend_from_slice(extra);
        match Cli::try_parse_from(argv).unwrap().command {
            Command::Rank(args) => args,
            _ => unreachable!(),
        }
    }

    fn labels() -> Vec<String> {
        vec!["0_graphs".to_string(), "1_screening".to_string()]
    }

    #[test]
    fn test_resolve_weights_defaults_per_label() {
        let weights = resolve_weights(&rank_args(&[]), &labels()).unwrap();
        assert_eq!(weights.topics.len(), 2);
        assert!((weights.reserved.topics - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_resolve_weights_cli_overrides() {
        let args = rank_args(&["--cites", "0.7", "--topic-weight", "1_screening=0.9"]);
        let weights = resolve_weights(&args, &labels()).unwrap();
        assert!((weights.reserved.cites - 0.7).abs() < f64::EPSILON);
        assert!((weights.topics["1_screening"] - 0.9).abs() < f64::EPSILON);
        assert!((weights.topics["0_graphs"] - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_resolve_weights_rejects_unknown_label() {
        let args = rank_args(&["--topic-weight", "1_screenin=0.9"]);
        let err = resolve_weights(&args, &labels()).unwrap_err();
        assert!(format!("{err:#}").contains("1_screening"));
    }
}
