//! Terminal capabilities and tracing setup.

use std::io::{self, IsTerminal};

use tracing_subscriber::EnvFilter;

/// What the attached terminal supports, read once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct TerminalCaps {
    pub(crate) stderr_is_terminal: bool,
    /// `NO_COLOR` is set to a non-empty value.
    pub(crate) no_color_env: bool,
    /// `TERM=dumb`.
    pub(crate) dumb: bool,
}

impl TerminalCaps {
    pub(crate) fn detect() -> Self {
        Self {
            stderr_is_terminal: io::stderr().is_terminal(),
            no_color_env: std::env::var_os("NO_COLOR").is_some_and(|value| !value.is_empty()),
            dumb: std::env::var("TERM").is_ok_and(|value| value.eq_ignore_ascii_case("dumb")),
        }
    }

    /// ANSI colors unless `--no-color`, `NO_COLOR` or a dumb terminal say otherwise.
    pub(crate) fn color(self, no_color_flag: bool) -> bool {
        !(no_color_flag || self.no_color_env || self.dumb)
    }

    /// The engine spinner only draws on an interactive, non-quiet stderr.
    pub(crate) fn spinner(self, quiet: bool) -> bool {
        self.stderr_is_terminal && !quiet && !self.dumb
    }
}

/// Installs the stderr subscriber. `RUST_LOG` wins unless a CLI verbosity
/// flag forced `default_level`.
pub(crate) fn init_tracing(default_level: &str, force_cli_level: bool, ansi: bool) {
    let filter = if force_cli_level {
        EnvFilter::new(default_level)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
    };
    let _ = tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_target(false)
        .with_ansi(ansi)
        .with_env_filter(filter)
        .try_init();
}
