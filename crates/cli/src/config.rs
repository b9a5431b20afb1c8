// crates/cli/src/config.rs
use crate::args::Args;
use anyhow::{Context, Result, anyhow};
use std::path::{Path, PathBuf};
pub use verstamp_engine::config::{Config, ConfigBuilder, WritePolicy};

/// Version written into every header. Change it here and rebuild.
pub const TARGET_VERSION: &str = "1.11.0";

/// Directory containing the running executable.
///
/// # Errors
///
/// Fails if the executable path cannot be determined.
pub fn default_root() -> Result<PathBuf> {
    let exe = std::env::current_exe().context("cannot locate the running executable")?;
    exe.parent()
        .map(Path::to_path_buf)
        .ok_or_else(|| anyhow!("executable path {} has no parent", exe.display()))
}

/// Build the engine config from parsed arguments.
///
/// # Errors
///
/// Fails if no root was given and the default root cannot be resolved.
pub fn config_from_args(args: &Args) -> Result<Config> {
    let root = match &args.root {
        Some(root) => root.clone(),
        None => default_root()?,
    };

    let write_policy = if args.only_changed {
        WritePolicy::OnChange
    } else {
        WritePolicy::Always
    };

    let config = ConfigBuilder::default()
        .root(root)
        .target_version(TARGET_VERSION)
        .strict(args.strict)
        .write_policy(write_policy)
        .build()?;
    Ok(config)
}
