//! Error types for compile operations.

use camino::Utf8PathBuf;

/// Errors that can occur while compiling stylesheets.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Settings are missing, malformed, or unusable for this operation.
    #[error("{0}")]
    Configuration(String),

    /// A `main:` directive did not name a path.
    #[error("malformed main directive in {path}: {line:?}")]
    DirectiveParse { path: Utf8PathBuf, line: String },

    /// Generated output could not be persisted.
    #[error("failed to write {path}: {source}")]
    Write {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A source file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file-system watcher could not be set up.
    #[error("file watcher error: {0}")]
    Watch(#[from] notify::Error),
}

impl Error {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }
}

/// Result type for compile operations.
pub type Result<T> = std::result::Result<T, Error>;
