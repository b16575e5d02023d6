//! Which files in the template tree are real templates

use once_cell::sync::Lazy;
use regex::Regex;
use std::ffi::OsStr;

/// Hidden files, `.cache` files and `~` backups are never templates
const DEFAULT_IGNORE_PATTERN: &str = r"^\.|\.cache$|~$";

static DEFAULT_IGNORE: Lazy<Regex> = Lazy::new(|| Regex::new(DEFAULT_IGNORE_PATTERN).unwrap());

/// Predicate over a file's base name deciding whether it is noise.
///
/// Only applies to files; directories are always descended into whatever
/// their name.
#[derive(Debug, Clone)]
pub struct IgnoreRule {
    pattern: Regex,
}

impl IgnoreRule {
    pub fn new() -> Self {
        Self {
            pattern: Regex::clone(&DEFAULT_IGNORE),
        }
    }

    /// True when `file_name` is not a template and must be skipped
    pub fn is_ignored(&self, file_name: &OsStr) -> bool {
        self.pattern.is_match(&file_name.to_string_lossy())
    }
}

impl Default for IgnoreRule {
    fn default() -> Self {
        Self::new()
    }
}
