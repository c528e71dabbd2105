use std::path::PathBuf;
use std::time::Duration;

use litrank_core::corpus::SourceSchema;
use litrank_core::export::Shortlist;

use crate::app_config::{FileConfig, VerbositySetting};
use crate::cli::{EngineKind, GlobalArgs, InputArgs, TopicArgs};

/// Seed used when neither the CLI nor the config file sets one.
pub(crate) const DEFAULT_SEED: u64 = 123;
pub(crate) const DEFAULT_ENGINE: EngineKind = EngineKind::Keyword;

/// Which verbosity flags were given on the command line.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct CliValueSources {
    pub(crate) verbose: bool,
    pub(crate) quiet: bool,
}

impl CliValueSources {
    pub(crate) fn from_global(global: &GlobalArgs) -> Self {
        Self {
            verbose: global.verbose > 0,
            quiet: global.quiet,
        }
    }
}

/// Effective verbosity after merging CLI flags with the config file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Verbosity {
    pub(crate) verbose: u8,
    pub(crate) quiet: bool,
}

/// Values a subcommand received on the command line; `None` defers to the
/// config file and then the built-in default.
#[derive(Debug, Clone, Default)]
pub(crate) struct CliOverrides {
    pub(crate) output_dir: Option<PathBuf>,
    pub(crate) source: Option<SourceSchema>,
    pub(crate) engine: Option<EngineKind>,
    pub(crate) shortlist: Option<Shortlist>,
    pub(crate) seed: Option<u64>,
    pub(crate) timeout_secs: Option<u64>,
    pub(crate) include_scores: bool,
}

impl CliOverrides {
    pub(crate) fn from_input(input: &InputArgs) -> Self {
        Self {
            output_dir: input.output_dir.clone(),
            source: input.source,
            ..Self::default()
        }
    }

    #[must_use]
    pub(crate) fn with_topics(mut self, topics: &TopicArgs) -> Self {
        self.engine = topics.engine;
        self.seed = topics.seed;
        self.timeout_secs = topics.timeout_secs;
        self
    }

    #[must_use]
    pub(crate) fn with_shortlist(
        mut self,
        shortlist: Option<Shortlist>,
        include_scores: bool,
    ) -> Self {
        self.shortlist = shortlist;
        self.include_scores = include_scores;
        self
    }
}

/// Fully resolved run settings.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Settings {
    pub(crate) output_dir: PathBuf,
    pub(crate) source: SourceSchema,
    pub(crate) engine: EngineKind,
    pub(crate) shortlist: Shortlist,
    pub(crate) seed: u64,
    pub(crate) timeout_secs: Option<u64>,
    pub(crate) include_scores: bool,
}

impl Settings {
    pub(crate) fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// Merges CLI values over file values over defaults.
pub(crate) fn resolve_settings(
    overrides: &CliOverrides,
    file_config: Option<&FileConfig>,
) -> Settings {
    let file = file_config.cloned().unwrap_or_default();
    Settings {
        output_dir: overrides
            .output_dir
            .clone()
            .or(file.output_dir)
            .unwrap_or_else(|| PathBuf::from(".")),
        source: overrides.source.or(file.source).unwrap_or_default(),
        engine: overrides.engine.or(file.engine).unwrap_or(DEFAULT_ENGINE),
        shortlist: overrides.shortlist.or(file.shortlist).unwrap_or_default(),
        seed: overrides.seed.or(file.seed).unwrap_or(DEFAULT_SEED),
        timeout_secs: overrides.timeout_secs.or(file.timeout_secs),
        include_scores: overrides.include_scores || file.include_scores.unwrap_or(false),
    }
}

pub(crate) fn resolve_verbosity(
    global: &GlobalArgs,
    cli_sources: &CliValueSources,
    file_config: Option<&FileConfig>,
) -> Verbosity {
    let mut verbosity = Verbosity {
        verbose: global.verbose,
        quiet: global.quiet,
    };
    if !cli_sources.verbose
        && !cli_sources.quiet
        && let Some(setting) = file_config.and_then(|config| config.verbosity)
    {
        verbosity = match setting {
            VerbositySetting::Default => Verbosity::default(),
            VerbositySetting::Verbose => Verbosity {
                verbose: 1,
                quiet: false,
            },
            VerbositySetting::Quiet => Verbosity {
                verbose: 0,
                quiet: true,
            },
            VerbositySetting::Debug => Verbosity {
                verbose: 2,
                quiet: false,
            },
        };
    }
    verbosity
}

pub(crate) fn resolve_default_log_level(verbosity: Verbosity) -> &'static str {
    if verbosity.quiet {
        "error"
    } else {
        match verbosity.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}

pub(crate) fn should_force_cli_log_level(cli_sources: &CliValueSources) -> bool {
    cli_sources.verbose || cli_sources.quiet
}

pub(crate) fn verbosity_label(verbosity: Verbosity) -> &'static str {
    if verbosity.quiet {
        VerbositySetting::Quiet.as_str()
    } else if verbosity.verbose == 0 {
        VerbositySetting::Default.as_str()
    } else if verbosity.verbose == 1 {
        VerbositySetting::Verbose.as_str()
    } else {
        VerbositySetting::Debug.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file_config() -> FileConfig {
        FileConfig {
            output_dir: Some(PathBuf::from("/reviews")),
            source: Some(SourceSchema::Wos),
            engine: Some(EngineKind::Precomputed),
            shortlist: Some(Shortlist::Top(40)),
            seed: Some(9),
            timeout_secs: Some(60),
            include_scores: Some(true),
            verbosity: Some(VerbositySetting::Verbose),
        }
    }

    #[test]
    fn test_defaults_without_config() {
        let settings = resolve_settings(&CliOverrides::default(), None);
        assert_eq!(settings.output_dir, PathBuf::from("."));
        assert_eq!(settings.source, SourceSchema::Scopus);
        assert_eq!(settings.engine, EngineKind::Keyword);
        assert_eq!(settings.shortlist, Shortlist::All);
        assert_eq!(settings.seed, DEFAULT_SEED);
        assert_eq!(settings.timeout(), None);
        assert!(!settings.include_scores);
    }

    #[test]
    fn test_config_fills_unset_cli_values() {
        let settings = resolve_settings(&CliOverrides::default(), Some(&file_config()));
        assert_eq!(settings.output_dir, PathBuf::from("/reviews"));
        assert_eq!(settings.source, SourceSchema::Wos);
        assert_eq!(settings.shortlist, Shortlist::Top(40));
        assert_eq!(settings.timeout(), Some(Duration::from_secs(60)));
        assert!(settings.include_scores);
    }

    #[test]
    fn test_cli_values_win_over_config() {
        let overrides = CliOverrides {
            source: Some(SourceSchema::Scopus),
            engine: Some(EngineKind::Off),
            seed: Some(1),
            ..CliOverrides::default()
        };
        let settings = resolve_settings(&overrides, Some(&file_config()));
        assert_eq!(settings.source, SourceSchema::Scopus);
        assert_eq!(settings.engine, EngineKind::Off);
        assert_eq!(settings.seed, 1);
    }

    #[test]
    fn test_config_verbosity_applies_without_cli_flags() {
        let global = GlobalArgs::default();
        let sources = CliValueSources::from_global(&global);
        let verbosity = resolve_verbosity(&global, &sources, Some(&file_config()));
        assert_eq!(resolve_default_log_level(verbosity), "debug");
        assert!(!should_force_cli_log_level(&sources));
    }

    #[test]
    fn test_cli_quiet_beats_config_verbosity() {
        let global = GlobalArgs {
            quiet: true,
            ..GlobalArgs::default()
        };
        let sources = CliValueSources::from_global(&global);
        let verbosity = resolve_verbosity(&global, &sources, Some(&file_config()));
        assert_eq!(resolve_default_log_level(verbosity), "error");
        assert_eq!(verbosity_label(verbosity), "quiet");
        assert!(should_force_cli_log_level(&sources));
    }

    #[test]
    fn test_verbosity_labels() {
        assert_eq!(verbosity_label(Verbosity::default()), "default");
        assert_eq!(
            verbosity_label(Verbosity {
                verbose: 3,
                quiet: false
            }),
            "debug"
        );
    }
}
