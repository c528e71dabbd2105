//! `litrank topics`: fit topics and write the per-topic artifacts.

use std::fs;

use anyhow::{Context, Result, bail};
use litrank_core::export::{topics_table, write_json, write_weights};
use litrank_core::scoring::WeightSpecification;
use litrank_core::topics::{TopicReport, label_prompt};
use tracing::info;

use crate::ProcessExit;
use crate::app::config_runtime::CliOverrides;
use crate::app::exit_handler::determine_exit_outcome;
use crate::app::pipeline;
use crate::app::runtime::RunContext;
use crate::cli::{EngineKind, TopicsArgs};

const RUN_DIR: &str = "topics";
const TOPICS_TABLE_FILE: &str = "topics_df.csv";
const REPORT_FILE: &str = "topic_report.json";
const PROMPTS_FILE: &str = "label_prompts.txt";

pub(crate) async fn run_topics_command(ctx: &RunContext, args: &TopicsArgs) -> Result<ProcessExit> {
    let settings =
        ctx.settings(&CliOverrides::from_input(&args.input).with_topics(&args.topics));
    if settings.engine == EngineKind::Off {
        bail!("Topic modelling is disabled\n  Suggestion: pass --engine keyword or --engine precomputed");
    }
    let loaded =
        pipeline::load_corpus(&args.input.input, settings.source, args.input.skip_invalid)?;
    let skipped = loaded.skipped.len();

    let modelled =
        pipeline::model_topics(loaded.table, &args.topics, &settings, ctx.use_spinner()).await?;
    let Some(fit) = modelled.fit else {
        bail!("No record has an abstract to model\n  Suggestion: export the records with abstracts included");
    };
    let corpus = modelled.corpus;

    let dir = pipeline::create_run_dir(&settings.output_dir, RUN_DIR)?;

    let table_path = dir.join(TOPICS_TABLE_FILE);
    topics_table(&corpus)
        .write_to(&table_path)
        .context("Failed to write the topic table")?;

    let report = TopicReport::build(&corpus, &fit);
    let report_path = dir.join(REPORT_FILE);
    write_json(&report_path, "topic report", &report)?;

    let prompts_path = dir.join(PROMPTS_FILE);
    let prompts: Vec<String> = report.topics.iter().map(label_prompt).collect();
    fs::write(&prompts_path, prompts.join("\n\n"))
        .with_context(|| format!("Failed to write '{}'", prompts_path.display()))?;

    let weights = WeightSpecification::defaults_for(corpus.topic_labels());
    let weights_path = write_weights(&dir, &weights)?;

    info!(
        topics = report.topics.len(),
        outliers = report.outliers,
        documents = report.documents,
        "Topic artifacts written"
    );

    if !ctx.quiet() {
        println!(
            "Found {} topics in {} abstracts ({} outliers)",
            report.topics.len(),
            report.documents,
            report.outliers
        );
        for section in &report.topics {
            println!("  {:>5}  {}", section.size, section.label);
        }
        println!("Wrote {}", dir.display());
        for path in [&table_path, &report_path, &prompts_path, &weights_path] {
            println!("  {}", path.display());
        }
    }

    Ok(determine_exit_outcome(corpus.len(), skipped))
}
