use crate::error::{EngineError, Result};
use derive_builder::Builder;
use std::path::PathBuf;

/// Extensions stamped by default: C++ sources, C/C++ headers, Arduino sketches.
pub const RECOGNIZED_EXTENSIONS: [&str; 3] = ["cpp", "h", "ino"];

/// Whether a file with no version change is still written back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WritePolicy {
    /// Rewrite every filtered file, changed or not.
    #[default]
    Always,
    /// Skip the write when the content did not change.
    OnChange,
}

#[derive(Debug, Clone, Builder)]
#[builder(setter(into))]
pub struct Config {
    pub root: PathBuf,
    pub target_version: String,
    #[builder(default = "default_extensions()")]
    pub extensions: Vec<String>,
    /// Abort on the first file or walk error instead of collecting it.
    #[builder(default)]
    pub strict: bool,
    #[builder(default)]
    pub write_policy: WritePolicy,
}

fn default_extensions() -> Vec<String> {
    RECOGNIZED_EXTENSIONS.iter().map(|e| (*e).to_string()).collect()
}

impl Config {
    /// Config for `root` with the default extensions, collect-and-continue
    /// error handling and unconditional rewrites.
    pub fn new(root: impl Into<PathBuf>, target_version: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            target_version: target_version.into(),
            extensions: default_extensions(),
            strict: false,
            write_policy: WritePolicy::Always,
        }
    }

    /// Check the values a run depends on before anything is touched.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Config` for an empty or multi-line target
    /// version, or an empty extension set.
    pub fn validate(&self) -> Result<()> {
        if self.target_version.is_empty() {
            return Err(EngineError::Config("target version is empty".into()));
        }
        if self.target_version.contains(['\n', '\r']) {
            return Err(EngineError::Config(format!(
                "target version {:?} spans more than one line",
                self.target_version
            )));
        }
        if self.extensions.is_empty() {
            return Err(EngineError::Config("no file extensions to match".into()));
        }
        Ok(())
    }
}
