use crate::config::WritePolicy;
use crate::error::{EngineError, Result};
use crate::outcome::FileOutcome;
use log::debug;
use regex::{Captures, Regex};
use std::borrow::Cow;
use std::fs;
use std::path::Path;

/// `Version:` label, optional whitespace, then `major.minor[.patch]`.
pub const VERSION_PATTERN: &str = r"(Version:\s*)\d+\.\d+(\.\d+)?";

/// Compiled header version matcher.
#[derive(Debug, Clone)]
pub struct VersionPattern {
    regex: Regex,
}

/// The first version header found while stamping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hit {
    /// 1-based line number.
    pub line: usize,
    /// Numeric text that was replaced (first match on the line).
    pub previous: String,
}

/// Result of stamping a buffer.
#[derive(Debug, Clone)]
pub struct Stamped<'a> {
    pub content: Cow<'a, str>,
    pub hit: Option<Hit>,
    pub changed: bool,
}

impl VersionPattern {
    /// # Errors
    ///
    /// Returns `EngineError::Regex` if the pattern fails to compile.
    pub fn new() -> Result<Self> {
        Ok(Self {
            regex: Regex::new(VERSION_PATTERN)?,
        })
    }

    /// True when `line` carries a version header.
    #[must_use]
    pub fn is_match(&self, line: &str) -> bool {
        self.regex.is_match(line)
    }

    /// Replace the version number on the first header line of `content`.
    ///
    /// Lines end at `\n`, `\r\n` or a lone `\r` and keep their terminators
    /// byte for byte. Only the first matching line is rewritten; within it
    /// every match gets the target. Content without a header line is
    /// returned borrowed and untouched.
    #[must_use]
    pub fn stamp<'a>(&self, content: &'a str, target: &str) -> Stamped<'a> {
        let mut offset = 0;
        for (idx, line) in split_lines(content).enumerate() {
            if let Some(caps) = self.regex.captures(line) {
                let label_len = caps.get(1).map_or(0, |m| m.len());
                let previous = caps[0][label_len..].to_owned();

                let replaced = self
                    .regex
                    .replace_all(line, |c: &Captures<'_>| format!("{}{target}", &c[1]));
                let changed = replaced != line;

                let mut out = String::with_capacity(content.len() + target.len());
                out.push_str(&content[..offset]);
                out.push_str(&replaced);
                out.push_str(&content[offset + line.len()..]);

                return Stamped {
                    content: Cow::Owned(out),
                    hit: Some(Hit {
                        line: idx + 1,
                        previous,
                    }),
                    changed,
                };
            }
            offset += line.len();
        }

        Stamped {
            content: Cow::Borrowed(content),
            hit: None,
            changed: false,
        }
    }
}

/// Split `content` after every `\n`, `\r\n` or lone `\r`, keeping each
/// terminator on its line. A final line without terminator is yielded as is.
pub fn split_lines(content: &str) -> impl Iterator<Item = &str> {
    let bytes = content.as_bytes();
    let mut start = 0;
    std::iter::from_fn(move || {
        if start >= bytes.len() {
            return None;
        }
        let end = match memchr::memchr2(b'\r', b'\n', &bytes[start..]) {
            Some(pos) => {
                let at = start + pos;
                if bytes[at] == b'\r' && bytes.get(at + 1) == Some(&b'\n') {
                    at + 2
                } else {
                    at + 1
                }
            }
            None => bytes.len(),
        };
        // terminators are ASCII, so `end` is always a char boundary
        let line = &content[start..end];
        start = end;
        Some(line)
    })
}

/// Read, stamp and write back a single file.
///
/// # Errors
///
/// `FileRead` / `FileWrite` for I/O failures, `Encoding` when the file is
/// not UTF-8.
pub fn stamp_file(
    path: &Path,
    pattern: &VersionPattern,
    target: &str,
    policy: WritePolicy,
) -> Result<FileOutcome> {
    let bytes = fs::read(path).map_err(|source| EngineError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let text = String::from_utf8(bytes).map_err(|source| EngineError::Encoding {
        path: path.to_path_buf(),
        source,
    })?;

    let stamped = pattern.stamp(&text, target);
    let written = stamped.changed || policy == WritePolicy::Always;

    if written {
        fs::write(path, stamped.content.as_bytes()).map_err(|source| EngineError::FileWrite {
            path: path.to_path_buf(),
            source,
        })?;
    }

    match &stamped.hit {
        Some(hit) => debug!(
            "{}:{} {} -> {target}",
            path.display(),
            hit.line,
            hit.previous
        ),
        None => debug!("{}: no version header", path.display()),
    }

    Ok(FileOutcome {
        path: path.to_path_buf(),
        line: stamped.hit.as_ref().map(|h| h.line),
        previous: stamped.hit.map(|h| h.previous),
        changed: stamped.changed,
        written,
    })
}
