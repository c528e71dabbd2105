use litrank_core::topics::scale;

use crate::ProcessExit;
use crate::cli::ScaleArgs;

pub(crate) fn run_scale_command(args: &ScaleArgs) -> ProcessExit {
    let hyperparameters = scale(args.corpus_size);
    println!("corpus_size = {}", args.corpus_size);
    println!("min_topic_size = {}", hyperparameters.min_topic_size);
    println!("neighborhood_size = {}", hyperparameters.neighborhood_size);
    ProcessExit::Success
}
