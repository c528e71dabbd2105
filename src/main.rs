//! CLI entry point for litrank.

use std::process::ExitCode;

mod app;
mod app_config;
mod cli;
mod commands;

/// How the process reports its outcome to the shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ProcessExit {
    /// Everything requested was produced.
    Success,
    /// Output was written but some rows were skipped or left unmatched.
    Partial,
    /// Nothing usable was produced.
    Failure,
}

impl ProcessExit {
    fn code(self) -> u8 {
        match self {
            Self::Success => 0,
            Self::Failure => 1,
            Self::Partial => 2,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    match app::runtime::run().await {
        Ok(exit) => ExitCode::from(exit.code()),
        Err(error) => {
            eprintln!("Error: {error:#}");
            ExitCode::from(ProcessExit::Failure.code())
        }
    }
}
