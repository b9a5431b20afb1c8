use crate::error::EngineError;
use std::path::PathBuf;

/// What happened to one filtered file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOutcome {
    pub path: PathBuf,
    /// 1-based line of the stamped header, if any.
    pub line: Option<usize>,
    /// Version text that was on that line before stamping.
    pub previous: Option<String>,
    pub changed: bool,
    pub written: bool,
}

impl FileOutcome {
    #[must_use]
    pub const fn has_header(&self) -> bool {
        self.line.is_some()
    }
}

/// Files that were stamped plus the errors collected along the way.
#[derive(Debug, Default)]
pub struct RunResult {
    pub outcomes: Vec<FileOutcome>,
    pub errors: Vec<(PathBuf, EngineError)>,
}

impl RunResult {
    #[must_use]
    pub fn changed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.changed).count()
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}
