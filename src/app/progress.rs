//! Spinner shown while a topic engine runs.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// A spinner that may be disabled; finishing a disabled one is a no-op.
pub(crate) struct EngineSpinner {
    bar: Option<ProgressBar>,
}

impl EngineSpinner {
    /// Starts ticking `message` when `enabled`.
    pub(crate) fn start(enabled: bool, message: String) -> Self {
        if !enabled {
            return Self { bar: None };
        }
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner} {msg} [{elapsed}]")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.set_message(message);
        spinner.enable_steady_tick(Duration::from_millis(100));
        Self { bar: Some(spinner) }
    }

    /// Clears the spinner line.
    pub(crate) fn finish(self) {
        if let Some(bar) = self.bar {
            bar.finish_and_clear();
        }
    }
}
