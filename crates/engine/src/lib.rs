// crates/engine/src/lib.rs
use log::{info, trace, warn};
use std::path::{Path, PathBuf};

pub mod config;
pub mod error;
pub mod filesystem;
pub mod filter;
pub mod outcome;
pub mod rewriter;

use crate::config::Config;
use crate::error::Result;
use crate::filter::ExtensionFilter;
use crate::outcome::{FileOutcome, RunResult};
use crate::rewriter::VersionPattern;

/// Stamp every recognized file under `config.root`.
///
/// Files are handled one at a time: read, stamp, write, then `on_file` is
/// called with the outcome before the next file is touched.
///
/// # Errors
///
/// Configuration and root errors always abort before any file is opened.
/// In strict mode the first file or walk error aborts the run; otherwise
/// such errors are collected in `RunResult::errors`.
pub fn run<F>(config: &Config, mut on_file: F) -> Result<RunResult>
where
    F: FnMut(&FileOutcome),
{
    config.validate()?;
    let pattern = VersionPattern::new()?;
    let filter = ExtensionFilter::new(&config.extensions);

    let mut result = RunResult::default();

    for item in filesystem::walk_files(&config.root)? {
        let processed = item.and_then(|path| {
            if !filter.matches(&path) {
                trace!("skip {}", path.display());
                return Ok(None);
            }
            rewriter::stamp_file(
                &path,
                &pattern,
                &config.target_version,
                config.write_policy,
            )
            .map(Some)
        });

        match processed {
            Ok(Some(outcome)) => {
                on_file(&outcome);
                result.outcomes.push(outcome);
            }
            Ok(None) => {}
            Err(e) if config.strict => return Err(e),
            Err(e) => {
                let path = e
                    .path()
                    .map_or_else(|| PathBuf::from("<walk>"), Path::to_path_buf);
                warn!("{e}");
                result.errors.push((path, e));
            }
        }
    }

    info!(
        "{} file(s) processed, {} changed, {} error(s)",
        result.outcomes.len(),
        result.changed_count(),
        result.errors.len()
    );

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WritePolicy;
    use crate::error::EngineError;
    use std::fs;
    use tempfile::tempdir;

    const TARGET: &str = "1.11.0";

    #[test]
    fn stamps_recognized_files_and_reports_each() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("lib")).unwrap();
        fs::write(dir.path().join("CM.h"), "/**\n * Version:  1.9.2\n */\n").unwrap();
        fs::write(dir.path().join("lib/CM.cpp"), "// Version: 1.9\n").unwrap();
        fs::write(dir.path().join("sketch.ino"), "void loop() {}\n").unwrap();
        fs::write(dir.path().join("notes.txt"), "Version: 1.0.0\n").unwrap();

        let mut reported = Vec::new();
        let result = run(&Config::new(dir.path(), TARGET), |o| {
            reported.push(o.path.clone());
        })
        .unwrap();

        assert!(result.is_success());
        assert_eq!(result.outcomes.len(), 3);
        assert_eq!(result.changed_count(), 2);
        assert_eq!(reported.len(), 3);
        assert!(!reported.iter().any(|p| p.ends_with("notes.txt")));

        assert_eq!(
            fs::read_to_string(dir.path().join("CM.h")).unwrap(),
            "/**\n * Version:  1.11.0\n */\n"
        );
        assert_eq!(
            fs::read_to_string(dir.path().join("lib/CM.cpp")).unwrap(),
            "// Version: 1.11.0\n"
        );
        assert_eq!(
            fs::read_to_string(dir.path().join("notes.txt")).unwrap(),
            "Version: 1.0.0\n"
        );
    }

    #[test]
    fn sketch_without_header_is_still_reported() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("sketch.ino"), "void setup() {}\n").unwrap();

        let result = run(&Config::new(dir.path(), TARGET), |_| {}).unwrap();
        let outcome = &result.outcomes[0];

        assert!(!outcome.has_header());
        assert!(outcome.written);
        assert!(!outcome.changed);
    }

    #[test]
    fn second_run_changes_nothing() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.h"), "// Version: 0.1\r\n// Version: 0.2\r\n").unwrap();
        let config = Config::new(dir.path(), TARGET);

        run(&config, |_| {}).unwrap();
        let once = fs::read(dir.path().join("a.h")).unwrap();
        let second = run(&config, |_| {}).unwrap();
        let twice = fs::read(dir.path().join("a.h")).unwrap();

        assert_eq!(once, twice);
        assert_eq!(second.changed_count(), 0);
        assert_eq!(once, b"// Version: 1.11.0\r\n// Version: 0.2\r\n");
    }

    #[test]
    fn non_strict_collects_encoding_errors() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("bad.h"), b"\xff\xfe// Version: 1.0\n").unwrap();
        fs::write(dir.path().join("good.cpp"), "// Version: 1.0\n").unwrap();

        let result = run(&Config::new(dir.path(), TARGET), |_| {}).unwrap();

        assert_eq!(result.outcomes.len(), 1);
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].0.ends_with("bad.h"));
        assert!(matches!(result.errors[0].1, EngineError::Encoding { .. }));
        assert_eq!(
            fs::read_to_string(dir.path().join("good.cpp")).unwrap(),
            "// Version: 1.11.0\n"
        );
    }

    #[test]
    fn strict_aborts_on_first_error() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("bad.h"), b"\xff").unwrap();

        let mut config = Config::new(dir.path(), TARGET);
        config.strict = true;

        let err = run(&config, |_| {}).unwrap_err();
        assert!(matches!(err, EngineError::Encoding { .. }));
    }

    #[cfg(unix)]
    fn lock_dir(root: &std::path::Path) -> Option<std::path::PathBuf> {
        use std::os::unix::fs::PermissionsExt;

        let locked = root.join("locked");
        fs::create_dir_all(&locked).unwrap();
        fs::write(locked.join("hidden.h"), "// Version: 0.1\n").unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // privileged users read through the mode bits
        if fs::read_dir(&locked).is_ok() {
            unlock_dir(&locked);
            return None;
        }
        Some(locked)
    }

    #[cfg(unix)]
    fn unlock_dir(locked: &std::path::Path) {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(locked, fs::Permissions::from_mode(0o755)).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_subdir_is_recorded_and_siblings_are_stamped() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("open")).unwrap();
        fs::write(dir.path().join("open/CM.h"), "// Version: 0.1\n").unwrap();
        let Some(locked) = lock_dir(dir.path()) else {
            return;
        };

        let result = run(&Config::new(dir.path(), TARGET), |_| {});
        unlock_dir(&locked);
        let result = result.unwrap();

        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].0.ends_with("locked"));
        assert!(matches!(result.errors[0].1, EngineError::Walk(_)));
        assert_eq!(result.outcomes.len(), 1);
        assert_eq!(
            fs::read_to_string(dir.path().join("open/CM.h")).unwrap(),
            "// Version: 1.11.0\n"
        );
        assert_eq!(
            fs::read_to_string(locked.join("hidden.h")).unwrap(),
            "// Version: 0.1\n"
        );
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_subdir_aborts_strict_run() {
        let dir = tempdir().unwrap();
        let Some(locked) = lock_dir(dir.path()) else {
            return;
        };

        let mut config = Config::new(dir.path(), TARGET);
        config.strict = true;
        let result = run(&config, |_| {});
        unlock_dir(&locked);

        let err = result.unwrap_err();
        assert!(matches!(err, EngineError::Walk(_)));
        assert!(err.path().is_some_and(|p| p.ends_with("locked")));
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_header_is_stamped_through_the_link() {
        let dir = tempdir().unwrap();
        let outside = tempdir().unwrap();
        let real = outside.path().join("shared.txt");
        fs::write(&real, "// Version: 1.2\n").unwrap();
        std::os::unix::fs::symlink(&real, dir.path().join("shared.h")).unwrap();

        let result = run(&Config::new(dir.path(), TARGET), |_| {}).unwrap();

        assert_eq!(result.outcomes.len(), 1);
        assert!(result.outcomes[0].path.ends_with("shared.h"));
        assert_eq!(fs::read_to_string(&real).unwrap(), "// Version: 1.11.0\n");
    }

    #[test]
    fn missing_root_aborts() {
        let dir = tempdir().unwrap();
        let config = Config::new(dir.path().join("missing"), TARGET);
        assert!(matches!(
            run(&config, |_| {}),
            Err(EngineError::InvalidPath { .. })
        ));
    }

    #[test]
    fn invalid_config_aborts_before_walk() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.h"), "// Version: 1.0\n").unwrap();

        let config = Config::new(dir.path(), "");
        assert!(matches!(run(&config, |_| {}), Err(EngineError::Config(_))));
        assert_eq!(
            fs::read_to_string(dir.path().join("a.h")).unwrap(),
            "// Version: 1.0\n"
        );
    }

    #[test]
    fn on_change_policy_leaves_unchanged_files_alone() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("plain.h"), "#pragma once\n").unwrap();

        let mut config = Config::new(dir.path(), TARGET);
        config.write_policy = WritePolicy::OnChange;

        let result = run(&config, |_| {}).unwrap();
        assert_eq!(result.outcomes.len(), 1);
        assert!(!result.outcomes[0].written);
    }
}
