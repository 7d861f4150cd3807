//! SASS/SCSS compilation
//!
//! [`StyleCompiler`] is the seam to the stylesheet compiler. The production
//! implementation is [`GrassCompiler`], backed by grass.

use std::fmt;

use camino::Utf8Path;

use crate::error::{Error, Result};

/// Output style requested from the compiler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputStyle {
    Nested,
    Compact,
    Expanded,
    Compressed,
}

impl OutputStyle {
    /// Map a configured format name to a style.
    ///
    /// `index` is the position in the `formats` list, used in the error.
    pub fn from_format_name(name: &str, index: usize) -> Result<Self> {
        match name {
            "nested" => Ok(Self::Nested),
            "compact" => Ok(Self::Compact),
            "expanded" => Ok(Self::Expanded),
            "compressed" => Ok(Self::Compressed),
            other => Err(Error::config(format!(
                "Invalid format {other:?} specified for formats[{index}]. \
                 Available formats: nested, compact, expanded, compressed"
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Nested => "nested",
            Self::Compact => "compact",
            Self::Expanded => "expanded",
            Self::Compressed => "compressed",
        }
    }
}

impl fmt::Display for OutputStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of compiling one source file in one style
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompilationResult {
    /// Successfully compiled stylesheet
    Success { css: String },
    /// The compiler rejected the source
    Failure(CompilerDiagnostic),
}

/// What the compiler said about a failure. Either field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompilerDiagnostic {
    /// Multi-line message with source excerpt
    pub formatted: Option<String>,
    /// One-line summary
    pub message: Option<String>,
}

impl fmt::Display for CompilerDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.formatted, &self.message) {
            (Some(formatted), _) => f.write_str(formatted),
            (None, Some(message)) => f.write_str(message),
            (None, None) => f.write_str("unknown compiler error"),
        }
    }
}

/// A stylesheet compiler.
///
/// Called from the blocking thread pool, one call per (file, format) pair.
pub trait StyleCompiler: Send + Sync {
    fn compile(&self, source: &Utf8Path, style: OutputStyle) -> CompilationResult;
}

/// Compiler backed by grass, reading sources and imports from disk.
///
/// grass renders only `expanded` and `compressed`: `nested` is rendered as
/// `expanded` and `compact` as `compressed`.
#[derive(Debug, Default, Clone, Copy)]
pub struct GrassCompiler;

impl GrassCompiler {
    fn grass_style(style: OutputStyle) -> grass::OutputStyle {
        match style {
            OutputStyle::Nested | OutputStyle::Expanded => grass::OutputStyle::Expanded,
            OutputStyle::Compact | OutputStyle::Compressed => grass::OutputStyle::Compressed,
        }
    }
}

impl StyleCompiler for GrassCompiler {
    fn compile(&self, source: &Utf8Path, style: OutputStyle) -> CompilationResult {
        let options = grass::Options::default().style(Self::grass_style(style));

        match grass::from_path(source, &options) {
            Ok(css) => CompilationResult::Success { css },
            Err(e) => {
                let formatted = e.to_string();
                let message = formatted.lines().next().map(str::to_owned);
                CompilationResult::Failure(CompilerDiagnostic {
                    formatted: Some(formatted),
                    message,
                })
            }
        }
    }
}
