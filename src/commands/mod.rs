//! One handler per subcommand.

mod config;
mod eda;
mod rank;
mod scale;
mod topics;

pub(crate) use config::run_config_show_command;
pub(crate) use eda::run_eda_command;
pub(crate) use rank::run_rank_command;
pub(crate) use scale::run_scale_command;
pub(crate) use topics::run_topics_command;
