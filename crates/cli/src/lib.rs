// crates/cli/src/lib.rs
pub mod args;
pub mod config;
pub mod logging;
pub mod presentation;

use crate::args::Args;
use anyhow::Result;
use verstamp_engine::outcome::RunResult;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Resolve the config from `args` and stamp the tree, printing a status
/// line per processed file.
///
/// # Errors
///
/// Fails when the root cannot be resolved, the root is invalid, or, with
/// `--strict`, on the first file error.
pub fn execute(args: &Args) -> Result<RunResult> {
    let config = config::config_from_args(args)?;
    log::info!(
        "stamping {} with version {}",
        config.root.display(),
        config.target_version
    );
    let result = verstamp_engine::run(&config, presentation::print_status)?;
    Ok(result)
}
