use anyhow::Result;
use clap::Parser;
use tracing::debug;

use crate::app::config_runtime::{self, CliOverrides, CliValueSources, Settings, Verbosity};
use crate::app::terminal::{self, TerminalCaps};
use crate::app_config::{self, LoadedConfig};
use crate::cli::{Cli, Command, ConfigCommand};
use crate::{ProcessExit, commands};

/// What every subcommand needs besides its own arguments.
pub(crate) struct RunContext {
    pub(crate) loaded: LoadedConfig,
    pub(crate) verbosity: Verbosity,
    pub(crate) terminal: TerminalCaps,
}

impl RunContext {
    /// Resolves the effective settings for one subcommand.
    pub(crate) fn settings(&self, overrides: &CliOverrides) -> Settings {
        config_runtime::resolve_settings(overrides, self.loaded.config.as_ref())
    }

    pub(crate) fn use_spinner(&self) -> bool {
        self.terminal.spinner(self.verbosity.quiet)
    }

    pub(crate) fn quiet(&self) -> bool {
        self.verbosity.quiet
    }
}

pub(crate) async fn run() -> Result<ProcessExit> {
    let cli = Cli::parse();
    let cli_sources = CliValueSources::from_global(&cli.global);

    let loaded = app_config::load_default_file_config()?;
    let verbosity =
        config_runtime::resolve_verbosity(&cli.global, &cli_sources, loaded.config.as_ref());

    let caps = TerminalCaps::detect();
    terminal::init_tracing(
        config_runtime::resolve_default_log_level(verbosity),
        config_runtime::should_force_cli_log_level(&cli_sources),
        caps.color(cli.global.no_color),
    );

    debug!(?cli, config_loaded = loaded.loaded_from_file(), "CLI arguments parsed");

    let ctx = RunContext {
        loaded,
        verbosity,
        terminal: caps,
    };
    match &cli.command {
        Command::Rank(args) => commands::run_rank_command(&ctx, args).await,
        Command::Topics(args) => commands::run_topics_command(&ctx, args).await,
        Command::Eda(args) => commands::run_eda_command(&ctx, args),
        Command::Scale(args) => Ok(commands::run_scale_command(args)),
        Command::Config {
            command: ConfigCommand::Show,
        } => Ok(commands::run_config_show_command(&ctx)),
    }
}
