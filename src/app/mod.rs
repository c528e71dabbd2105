//! Runtime plumbing shared by the subcommands.

pub(crate) mod config_runtime;
pub(crate) mod exit_handler;
pub(crate) mod pipeline;
pub(crate) mod progress;
pub(crate) mod runtime;
pub(crate) mod terminal;
