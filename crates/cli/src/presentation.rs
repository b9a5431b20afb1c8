// crates/cli/src/presentation.rs
use std::path::PathBuf;
use verstamp_engine::error::EngineError;
use verstamp_engine::outcome::FileOutcome;

#[must_use]
pub fn status_line(outcome: &FileOutcome) -> String {
    format!("Updated: {}", outcome.path.display())
}

pub fn print_status(outcome: &FileOutcome) {
    println!("{}", status_line(outcome));
}

pub fn print_errors(errors: &[(PathBuf, EngineError)]) {
    for (path, err) in errors {
        eprintln!("Error processing {}: {err}", path.display());
    }
}
