//! Output location for generated stylesheets
//!
//! `target_dir` handling:
//! - empty: next to the source file
//! - absolute: used as is
//! - relative: joined onto the project root
//!
//! Example: `/proj/src/a.scss` with `target_dir: build` → `/proj/build/a.css`

use camino::{Utf8Path, Utf8PathBuf};

use crate::error::{Error, Result};

/// Where the outputs of one source file go
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    /// Directory receiving every output of the source file
    pub target_dir: Utf8PathBuf,
    /// Base name of the source file, extension included
    pub filename: String,
}

impl ResolvedTarget {
    /// Output path for one format: `filename` with its extension replaced.
    ///
    /// A leading dot is tolerated, so `css` and `.css` are the same.
    pub fn output_path(&self, extension: &str) -> Utf8PathBuf {
        let extension = extension.strip_prefix('.').unwrap_or(extension);
        self.target_dir
            .join(Utf8Path::new(&self.filename).with_extension(extension))
    }
}

/// Compute the target directory and file name for `source`.
pub fn resolve_target(
    source: &Utf8Path,
    target_dir: &str,
    project_root: Option<&Utf8Path>,
) -> Result<ResolvedTarget> {
    let filename = source
        .file_name()
        .ok_or_else(|| Error::config(format!("{source} has no file name")))?
        .to_owned();

    let target_dir = if target_dir.is_empty() {
        source
            .parent()
            .map(Utf8Path::to_owned)
            .unwrap_or_default()
    } else if Utf8Path::new(target_dir).is_absolute() {
        Utf8PathBuf::from(target_dir)
    } else {
        let root = project_root.ok_or_else(|| {
            Error::config(
                "Path specified in target_dir is relative, but there is no project root to resolve it against",
            )
        })?;
        root.join(target_dir)
    };

    Ok(ResolvedTarget {
        target_dir,
        filename,
    })
}
