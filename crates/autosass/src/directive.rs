//! In-file directives
//!
//! Only the leading block of `//` comment lines is read. Two directives are
//! recognized there:
//!
//! ```scss
//! // compile
//! // main: ../base
//! ```
//!
//! `compile` forces the file to be compiled on save even when it matches the
//! exclude pattern. `main:` names another stylesheet (relative to this one)
//! that gets compiled instead, which is how partials trigger a rebuild of the
//! file that imports them.

use std::io::{BufRead, BufReader};
use std::sync::LazyLock;

use camino::{Utf8Path, Utf8PathBuf};
use regex::Regex;

use crate::error::{Error, Result};

static MAIN_DIRECTIVE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"//\s*main:\s*([./\w]+)").expect("valid regex"));

/// Extensions probed, in order, when a `main:` path has none
const MAIN_EXTENSIONS: [&str; 2] = ["scss", "sass"];

/// What the leading comment block of a source file asked for
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectiveState {
    /// A `compile` marker was present
    pub compile_after_save: bool,
    /// Stylesheet to compile instead of the scanned one
    pub main_file: Option<Utf8PathBuf>,
}

/// Scan the leading comment block of the file at `path`.
#[tracing::instrument(level = "debug")]
pub fn scan_file(path: &Utf8Path) -> Result<DirectiveState> {
    let io_err = |source| Error::Io {
        path: path.to_owned(),
        source,
    };
    let file = fs_err::File::open(path.as_std_path()).map_err(io_err)?;
    let dir = path.parent().unwrap_or(Utf8Path::new(""));
    scan_lines(BufReader::new(file), path, dir)
}

/// Scan lines from `reader`, stopping at the first line that is not a `//`
/// comment. `path` is only used in error messages; `main:` paths resolve
/// against `dir`.
pub fn scan_lines(
    reader: impl BufRead,
    path: &Utf8Path,
    dir: &Utf8Path,
) -> Result<DirectiveState> {
    let mut state = DirectiveState::default();

    for line in reader.lines() {
        let line = line.map_err(|source| Error::Io {
            path: path.to_owned(),
            source,
        })?;
        if !line.starts_with("//") {
            break;
        }

        if line.contains("compile") {
            state.compile_after_save = true;
        } else if line.contains("main") {
            let token = MAIN_DIRECTIVE
                .captures(&line)
                .and_then(|caps| caps.get(1))
                .ok_or_else(|| Error::DirectiveParse {
                    path: path.to_owned(),
                    line: line.clone(),
                })?
                .as_str();

            if let Some(main_file) = probe_main_file(&dir.join(token)) {
                tracing::debug!(%main_file, "found main file redirect");
                state.main_file = Some(main_file);
            }
        }
    }

    Ok(state)
}

/// Only a path written without its extension redirects: an exact match is
/// left alone, otherwise the first existing `.scss`/`.sass` sibling wins.
fn probe_main_file(candidate: &Utf8Path) -> Option<Utf8PathBuf> {
    if candidate.is_file() {
        return None;
    }
    MAIN_EXTENSIONS
        .iter()
        .map(|ext| Utf8PathBuf::from(format!("{candidate}.{ext}")))
        .find(|path| path.is_file())
}
