//! Exclude pattern matching

use regex::Regex;

use crate::error::{Error, Result};

/// Whether `filename` matches the configured exclude pattern.
///
/// An empty pattern never excludes. The pattern is compiled on every call so
/// that an invalid one is reported when it is used, not when settings load.
pub fn is_excluded(filename: &str, exclude_regex: &str) -> Result<bool> {
    if exclude_regex.is_empty() {
        return Ok(false);
    }
    let re = Regex::new(exclude_regex).map_err(|e| {
        Error::config(format!("Invalid exclude_regex {exclude_regex:?}: {e}"))
    })?;
    Ok(re.is_match(filename))
}

/// Whether `path` names a SCSS or Sass source file (case-insensitive).
pub fn is_style_source(path: &str) -> bool {
    let lower = path.to_ascii_lowercase();
    lower.ends_with(".scss") || lower.ends_with(".sass")
}
