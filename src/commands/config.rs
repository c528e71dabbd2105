//! Config command handlers: show effective configuration.

use crate::ProcessExit;
use crate::app::config_runtime::{CliOverrides, verbosity_label};
use crate::app::runtime::RunContext;

pub(crate) fn run_config_show_command(ctx: &RunContext) -> ProcessExit {
    let effective = ctx.settings(&CliOverrides::default());

    let resolved_path = ctx.loaded.path.as_ref().map_or_else(
        || "<unresolved>".to_string(),
        |path| path.display().to_string(),
    );
    println!("config_path = {resolved_path}");
    println!(
        "config_file = {}",
        if ctx.loaded.loaded_from_file() {
            "loaded"
        } else {
            "not found (using defaults)"
        }
    );
    println!("output_dir = {}", effective.output_dir.display());
    println!("source = {}", effective.source);
    println!("engine = {}", effective.engine.as_str());
    println!("shortlist = {}", effective.shortlist);
    println!("seed = {}", effective.seed);
    println!(
        "timeout_secs = {}",
        effective
            .timeout_secs
            .map_or_else(|| "none".to_string(), |secs| secs.to_string())
    );
    println!("include_scores = {}", effective.include_scores);
    println!("verbosity = {}", verbosity_label(ctx.verbosity));

    ProcessExit::Success
}
