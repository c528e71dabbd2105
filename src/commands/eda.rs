//! `litrank eda`: descriptive tables for an export.

use anyhow::{Context, Result};
use litrank_core::eda::write_summaries;
use tracing::info;

use crate::ProcessExit;
use crate::app::config_runtime::CliOverrides;
use crate::app::exit_handler::determine_exit_outcome;
use crate::app::pipeline;
use crate::app::runtime::RunContext;
use crate::cli::InputArgs;

const RUN_DIR: &str = "eda";

pub(crate) fn run_eda_command(ctx: &RunContext, args: &InputArgs) -> Result<ProcessExit> {
    let settings = ctx.settings(&CliOverrides::from_input(args));
    let loaded = pipeline::load_corpus(&args.input, settings.source, args.skip_invalid)?;

    let dir = pipeline::create_run_dir(&settings.output_dir, RUN_DIR)?;
    let written = write_summaries(&dir, &loaded.table).context("Failed to write corpus summaries")?;
    info!(records = loaded.table.len(), tables = written.len(), "Summaries complete");

    if !ctx.quiet() {
        println!(
            "Summarized {} records into {}",
            loaded.table.len(),
            dir.display()
        );
        for path in &written {
            println!("  {}", path.display());
        }
    }

    Ok(determine_exit_outcome(
        loaded.table.len(),
        loaded.skipped.len(),
    ))
}
