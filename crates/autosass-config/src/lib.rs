//! Configuration types for autosass.
//!
//! This crate contains the configuration structs that are parsed from
//! `.config/autosass.yaml`. Nothing here is validated: format names and
//! extensions are checked when a file is compiled, and the exclude pattern is
//! compiled when a file name is filtered.

use serde::{Deserialize, Serialize};

/// Autosass configuration from `.config/autosass.yaml`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", default)]
pub struct AutosassConfig {
    /// Output formats, compiled in order. Duplicates are compiled twice.
    pub formats: Vec<FormatSpec>,

    /// Output directory. Empty means "next to the source file", a relative
    /// path is joined onto the project root.
    pub target_dir: String,

    /// Files whose name matches this regular expression are not compiled on
    /// save. Empty disables exclusion.
    pub exclude_regex: String,

    /// Compile every saved stylesheet, ignoring `exclude_regex`.
    pub compile_after_save: bool,

    /// Upper bound on compiler invocations running at the same time.
    /// Defaults to the available parallelism of the machine.
    pub max_concurrent_compiles: Option<usize>,
}

impl Default for AutosassConfig {
    fn default() -> Self {
        Self {
            formats: vec![FormatSpec::new("expanded", "css")],
            target_dir: String::new(),
            exclude_regex: String::new(),
            compile_after_save: false,
            max_concurrent_compiles: None,
        }
    }
}

/// One configured (output style, output extension) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatSpec {
    /// One of `nested`, `compact`, `expanded`, `compressed`
    #[serde(default)]
    pub format: String,

    /// Extension of the generated file, e.g. `css` or `min.css`
    #[serde(default)]
    pub extension: String,
}

impl FormatSpec {
    pub fn new(format: impl Into<String>, extension: impl Into<String>) -> Self {
        Self {
            format: format.into(),
            extension: extension.into(),
        }
    }
}
