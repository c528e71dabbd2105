//! Application configuration loading for CLI defaults.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

use litrank_core::corpus::SourceSchema;
use litrank_core::export::Shortlist;

use crate::cli::EngineKind;

/// Longest topic engine timeout a config file may set.
const MAX_TIMEOUT_SECS: u64 = 86_400;

/// File configuration for litrank defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileConfig {
    /// Directory run folders are created in.
    pub output_dir: Option<PathBuf>,
    /// Default export schema.
    pub source: Option<SourceSchema>,
    /// Default topic engine.
    pub engine: Option<EngineKind>,
    /// Default shortlist size.
    pub shortlist: Option<Shortlist>,
    /// Seed passed to topic engines.
    pub seed: Option<u64>,
    /// Topic engine time budget in seconds.
    pub timeout_secs: Option<u64>,
    /// Keep per-topic weighted columns in ranked.csv.
    pub include_scores: Option<bool>,
    /// Default verbosity mode.
    pub verbosity: Option<VerbositySetting>,
}

impl FileConfig {
    /// Validates config values against CLI constraints.
    pub fn validate(&self) -> Result<()> {
        if let Some(timeout) = self.timeout_secs
            && !(1..=MAX_TIMEOUT_SECS).contains(&timeout)
        {
            bail!(
                "Invalid config value for `timeout_secs`: {timeout}. Expected range: 1..={MAX_TIMEOUT_SECS}"
            );
        }
        Ok(())
    }
}

/// Supported config verbosity labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerbositySetting {
    Default,
    Verbose,
    Quiet,
    Debug,
}

impl VerbositySetting {
    /// Returns the stable string label for display output.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Verbose => "verbose",
            Self::Quiet => "quiet",
            Self::Debug => "debug",
        }
    }
}

/// Loaded config metadata.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// Resolved config path if a base directory is known.
    pub path: Option<PathBuf>,
    /// Parsed file config when a config file exists and was valid.
    pub config: Option<FileConfig>,
}

impl LoadedConfig {
    #[must_use]
    pub fn loaded_from_file(&self) -> bool {
        self.config.is_some()
    }
}

/// Resolves default config path.
///
/// Priority:
/// 1. `$XDG_CONFIG_HOME/litrank/config.toml`
/// 2. `$HOME/.config/litrank/config.toml`
#[must_use]
pub fn resolve_default_config_path() -> Option<PathBuf> {
    if let Some(xdg_config_home) = env_var_non_empty_os("XDG_CONFIG_HOME") {
        return Some(PathBuf::from(xdg_config_home).join("litrank").join("config.toml"));
    }

    let home = env_var_non_empty_os("HOME")?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join("litrank")
            .join("config.toml"),
    )
}

fn env_var_non_empty_os(name: &str) -> Option<std::ffi::OsString> {
    let value = env::var_os(name)?;
    if value.is_empty() { None } else { Some(value) }
}

/// Loads config from default path if present.
pub fn load_default_file_config() -> Result<LoadedConfig> {
    let path = resolve_default_config_path();
    let config = match path.as_deref() {
        Some(path_ref) if path_ref.exists() => Some(load_file_config(path_ref)?),
        _ => None,
    };
    Ok(LoadedConfig { path, config })
}

fn load_file_config(path: &Path) -> Result<FileConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
    parse_config_str(&raw)
        .with_context(|| format!("Failed to parse config file '{}'", path.display()))
}

fn parse_config_str(raw: &str) -> Result<FileConfig> {
    let mut cfg = FileConfig::default();
    for (line_index, raw_line) in raw.lines().enumerate() {
        let line = strip_comment(raw_line).trim();
        if line.is_empty() {
            continue;
        }
        let line_no = line_index + 1;

        let Some((raw_key, raw_value)) = line.split_once('=') else {
            bail!("Invalid config syntax on line {line_no}: expected key = value");
        };

        let key = raw_key.trim();
        let value = raw_value.trim();
        let context = || format!("Invalid `{key}` value on line {line_no}");

        match key {
            "output_dir" => {
                cfg.output_dir = Some(PathBuf::from(
                    unquote(value).with_context(context)?,
                ));
            }
            "source" => {
                let parsed = unquote(value).with_context(context)?;
                cfg.source = Some(
                    parsed
                        .parse::<SourceSchema>()
                        .map_err(anyhow::Error::msg)
                        .with_context(context)?,
                );
            }
            "engine" => {
                let parsed = unquote(value).with_context(context)?;
                cfg.engine = Some(parse_engine(&parsed).with_context(context)?);
            }
            "shortlist" => {
                let parsed = parse_shortlist(value).with_context(context)?;
                cfg.shortlist = Some(parsed);
            }
            "seed" => {
                cfg.seed = Some(parse_u64(value).with_context(context)?);
            }
            "timeout_secs" => {
                cfg.timeout_secs = Some(parse_u64(value).with_context(context)?);
            }
            "include_scores" => {
                cfg.include_scores = Some(parse_boolean(value).with_context(context)?);
            }
            "verbosity" => {
                let parsed = unquote(value).with_context(context)?;
                cfg.verbosity = Some(parse_verbosity(&parsed).with_context(|| {
                    format!("Invalid `verbosity` value '{parsed}' on line {line_no}")
                })?);
            }
            unknown => {
                bail!("Unknown configuration key: '{unknown}' on line {line_no}");
            }
        }
    }
    cfg.validate()?;
    Ok(cfg)
}

/// Drops a `#` comment that is not inside a quoted string.
fn strip_comment(line: &str) -> &str {
    let mut quote: Option<char> = None;
    for (index, ch) in line.char_indices() {
        match (ch, quote) {
            ('"' | '\'', None) => quote = Some(ch),
            (c, Some(open)) if c == open => quote = None,
            ('#', None) => return &line[..index],
            _ => {}
        }
    }
    line
}

/// Accepts `"basic"` and `'literal'` strings; escapes are not interpreted.
fn unquote(raw_value: &str) -> Result<String> {
    let mut chars = raw_value.chars();
    match (chars.next(), chars.next_back()) {
        (Some(open @ ('"' | '\'')), Some(close)) if open == close => {
            Ok(chars.as_str().to_string())
        }
        _ => bail!("Expected a quoted string"),
    }
}

fn parse_u64(raw_value: &str) -> Result<u64> {
    if raw_value.starts_with('-') {
        bail!("Expected non-negative integer");
    }
    raw_value
        .parse::<u64>()
        .with_context(|| format!("Expected integer, got '{raw_value}'"))
}

/// Accepts `shortlist = 50` or `shortlist = "all"`.
fn parse_shortlist(raw_value: &str) -> Result<Shortlist> {
    let token = if raw_value.starts_with(['"', '\'']) {
        unquote(raw_value)?
    } else {
        raw_value.to_string()
    };
    token.parse::<Shortlist>().map_err(anyhow::Error::msg)
}

fn parse_engine(value: &str) -> Result<EngineKind> {
    match value {
        "keyword" => Ok(EngineKind::Keyword),
        "precomputed" => Ok(EngineKind::Precomputed),
        "none" => Ok(EngineKind::Off),
        _ => bail!("Expected one of: keyword, precomputed, none"),
    }
}

fn parse_verbosity(value: &str) -> Result<VerbositySetting> {
    match value {
        "default" => Ok(VerbositySetting::Default),
        "verbose" => Ok(VerbositySetting::Verbose),
        "quiet" => Ok(VerbositySetting::Quiet),
        "debug" => Ok(VerbositySetting::Debug),
        _ => bail!("Expected one of: default, verbose, quiet, debug"),
    }
}

fn parse_boolean(raw_value: &str) -> Result<bool> {
    match raw_value.trim() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => bail!("Expected 'true' or 'false'"),
    }
}
