//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use litrank_core::corpus::SourceSchema;
use litrank_core::export::Shortlist;
use litrank_core::topics::TopicCount;

/// Rank a bibliographic export by citations, recency and topic relevance.
///
/// Litrank reads a Scopus or Web of Science RIS export, models the topics of
/// its abstracts, scores every paper, and writes a shortlist that can be
/// imported back into a reference manager.
#[derive(Parser, Debug)]
#[command(name = "litrank")]
#[command(author, version, about)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Flags accepted by every subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored log output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Score every paper and write the shortlist
    Rank(RankArgs),
    /// Fit topics and write the topic table, report and default weights
    Topics(TopicsArgs),
    /// Write descriptive tables for the corpus
    Eda(InputArgs),
    /// Show the topic hyperparameters used for a corpus size
    Scale(ScaleArgs),
    /// Inspect configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug, Clone, Copy)]
pub enum ConfigCommand {
    /// Print the effective configuration
    Show,
}

/// Where the corpus comes from and where results go.
#[derive(Args, Debug, Clone, Default)]
pub struct InputArgs {
    /// RIS export to read
    pub input: PathBuf,

    /// Database the export came from: scopus or wos
    #[arg(short, long)]
    pub source: Option<SourceSchema>,

    /// Drop records that fail to parse instead of aborting
    #[arg(long)]
    pub skip_invalid: bool,

    /// Directory the run folder is created in
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,
}

/// Topic engine selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EngineKind {
    /// Built-in RAKE keyword clustering
    Keyword,
    /// Replay an external engine run from --topics-file
    Precomputed,
    /// Skip topic modelling
    #[value(name = "none")]
    Off,
}

impl EngineKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Keyword => "keyword",
            Self::Precomputed => "precomputed",
            Self::Off => "none",
        }
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct TopicArgs {
    /// Topic engine to run
    #[arg(short, long, value_enum)]
    pub engine: Option<EngineKind>,

    /// JSON output of an external topic engine run (for --engine precomputed)
    #[arg(long)]
    pub topics_file: Option<PathBuf>,

    /// Number of topics, or "auto"
    #[arg(short = 'n', long, default_value = "auto")]
    pub n_topics: TopicCount,

    /// Seed for reproducible topic fits
    #[arg(long)]
    pub seed: Option<u64>,

    /// Abandon topic modelling after this many seconds
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_secs: Option<u64>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct TopicsArgs {
    #[command(flatten)]
    pub input: InputArgs,

    #[command(flatten)]
    pub topics: TopicArgs,
}

#[derive(Args, Debug, Clone, Default)]
pub struct RankArgs {
    #[command(flatten)]
    pub input: InputArgs,

    #[command(flatten)]
    pub topics: TopicArgs,

    /// JSON weight file ({"cites": .., "recency": .., "topics": .., "<label>": ..})
    #[arg(short, long)]
    pub weights: Option<PathBuf>,

    /// Weight of citation impact
    #[arg(long)]
    pub cites: Option<f64>,

    /// Weight of publication recency
    #[arg(long)]
    pub recency: Option<f64>,

    /// Overall weight of topic relevance
    #[arg(long)]
    pub topics_weight: Option<f64>,

    /// Weight of one topic, as LABEL=WEIGHT (repeatable)
    #[arg(long = "topic-weight", value_parser = parse_topic_weight)]
    pub topic_weights: Vec<(String, f64)>,

    /// Number of papers to shortlist, or "all"
    #[arg(short, long)]
    pub top: Option<Shortlist>,

    /// Also write the shortlist as RIS with scores in C1..C4
    #[arg(long)]
    pub roundtrip: bool,

    /// Keep per-topic weighted columns in ranked.csv
    #[arg(long)]
    pub include_scores: bool,
}

#[derive(Args, Debug, Clone, Copy)]
pub struct ScaleArgs {
    /// Number of documents with abstracts
    pub corpus_size: usize,
}

fn parse_topic_weight(raw: &str) -> Result<(String, f64), String> {
    let (label, weight) = raw
        .rsplit_once('=')
        .ok_or_else(|| format!("expected LABEL=WEIGHT, got '{raw}'"))?;
    let label = label.trim();
    if label.is_empty() {
        return Err("topic label must not be empty".to_string());
    }
    let weight = weight
        .trim()
        .parse::<f64>()
        .map_err(|_| format!("weight for '{label}' is not a number"))?;
    Ok((label.to_string(), weight))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn rank(args: &[&str]) -> RankArgs {
        let mut argv = vec!["litrank", "rank"];
        argv.extend_from_slice(args);
        match Cli::try_parse_from(argv).unwrap().command {
            Command::Rank(rank) => rank,
            other => panic!("expected rank, got {other:?}"),
        }
    }

    #[test]
    fn test_cli_rank_minimal() {
        let args = rank(&["export.ris"]);
        assert_eq!(args.input.input, PathBuf::from("export.ris"));
        assert_eq!(args.input.source, None);
        assert_eq!(args.topics.n_topics, TopicCount::Auto);
        assert_eq!(args.top, None);
        assert!(!args.roundtrip);
    }

    #[test]
    fn test_cli_rank_all_flags() {
        let args = rank(&[
            "export.ris",
            "--source",
            "wos",
            "--engine",
            "precomputed",
            "--topics-file",
            "topics.json",
            "-n",
            "8",
            "--seed",
            "7",
            "--cites",
            "0.5",
            "--topic-weight",
            "0_graphs_neural=0.9",
            "--topic-weight",
            "1_llm=0.1",
            "--top",
            "25",
            "--roundtrip",
            "--include-scores",
        ]);
        assert_eq!(args.input.source, Some(SourceSchema::Wos));
        assert_eq!(args.topics.engine, Some(EngineKind::Precomputed));
        assert_eq!(args.topics.n_topics, TopicCount::Fixed(8));
        assert_eq!(args.topics.seed, Some(7));
        assert_eq!(args.cites, Some(0.5));
        assert_eq!(
            args.topic_weights,
            vec![("0_graphs_neural".to_string(), 0.9), ("1_llm".to_string(), 0.1)]
        );
        assert_eq!(args.top, Some(Shortlist::Top(25)));
        assert!(args.roundtrip);
        assert!(args.include_scores);
    }

    #[test]
    fn test_cli_verbose_flag_is_global() {
        let cli = Cli::try_parse_from(["litrank", "eda", "x.ris", "-vv"]).unwrap();
        assert_eq!(cli.global.verbose, 2);
        let cli = Cli::try_parse_from(["litrank", "-q", "scale", "100"]).unwrap();
        assert!(cli.global.quiet);
    }

    #[test]
    fn test_cli_rejects_unknown_source() {
        let result = Cli::try_parse_from(["litrank", "rank", "x.ris", "--source", "pubmed"]);
        assert_eq!(result.unwrap_err().kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn test_cli_rejects_zero_topics() {
        let result = Cli::try_parse_from(["litrank", "topics", "x.ris", "-n", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_rejects_bad_topic_weight() {
        let result = Cli::try_parse_from(["litrank", "rank", "x.ris", "--topic-weight", "oops"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_requires_subcommand() {
        let result = Cli::try_parse_from(["litrank"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_help_flag_shows_usage() {
        let err = Cli::try_parse_from(["litrank", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_cli_config_show() {
        let cli = Cli::try_parse_from(["litrank", "config", "show"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Config {
                command: ConfigCommand::Show
            }
        ));
    }

    #[test]
    fn test_parse_topic_weight_splits_on_last_equals() {
        assert_eq!(
            parse_topic_weight("a=b=0.3").unwrap(),
            ("a=b".to_string(), 0.3)
        );
        assert!(parse_topic_weight("=0.3").is_err());
        assert!(parse_topic_weight("label=high").is_err());
    }
}
