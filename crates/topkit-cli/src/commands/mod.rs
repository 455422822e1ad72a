pub mod emit;
pub mod inspect;

use crate::cli::LoadArgs;
use crate::config;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use topkit::core::models::topology::Topology;
use topkit::parser::ProgressReporter;
use topkit::workflows;
use tracing::{info, warn};

/// Builds the load configuration for `args` and runs the load workflow.
fn load_topology(args: &LoadArgs, show_progress: bool) -> Result<Topology> {
    let config = config::build_config(args)?;
    info!("Loading topology from {:?}", &config.root);

    let progress_handler = if show_progress {
        CliProgressHandler::new()
    } else {
        CliProgressHandler::hidden()
    };
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    let topology = workflows::load::run(&config, &reporter)?;

    if topology.open_conditionals() > 0 {
        warn!(
            "{} conditional block(s) were still open at end of input.",
            topology.open_conditionals()
        );
    }
    Ok(topology)
}
