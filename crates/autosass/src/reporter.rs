//! Compilation outcomes: write the css or explain why there is none.

use std::sync::Arc;

use camino::Utf8Path;

use crate::compiler::{CompilationResult, CompilerDiagnostic};
use crate::error::Error;
use crate::output::OutputChannel;

/// `DD/MM HH:MM:SS`, local time
pub fn timestamp() -> String {
    chrono::Local::now().format("%d/%m %H:%M:%S").to_string()
}

/// Routes each compilation result to disk or to the log.
#[derive(Clone)]
pub struct Reporter {
    output: Arc<dyn OutputChannel>,
}

impl Reporter {
    pub fn new(output: Arc<dyn OutputChannel>) -> Self {
        Self { output }
    }

    pub fn output(&self) -> &Arc<dyn OutputChannel> {
        &self.output
    }

    /// Handle the result of compiling one format to `output_path`.
    ///
    /// Never fails: problems end up in the log and as a notification.
    pub async fn handle_result(&self, output_path: &Utf8Path, result: CompilationResult) {
        match result {
            CompilationResult::Success { css } => match write_output(output_path, &css).await {
                Ok(()) => {
                    tracing::debug!(%output_path, bytes = css.len(), "wrote css");
                    self.output.append_line(&format!(
                        "{}: Successfully generated CSS: {output_path}",
                        timestamp()
                    ));
                }
                Err(e) => {
                    tracing::warn!(%output_path, error = %e, "failed to write css");
                    self.output
                        .append_line(&format!("{}: Failed to generate CSS: {e}", timestamp()));
                    self.notify_failure();
                }
            },
            CompilationResult::Failure(diag) => {
                tracing::debug!(%output_path, error = %diag, "compilation failed");
                self.output.append_line(&diagnostic_line(&diag));
                self.notify_failure();
            }
        }
    }

    fn notify_failure(&self) {
        self.output.show_error_message(&format!(
            "{}: autosass: could not generate CSS file. See output for details.",
            timestamp()
        ));
        self.output.show();
    }
}

/// Most specific text available for a compiler failure, never empty.
fn diagnostic_line(diag: &CompilerDiagnostic) -> String {
    let non_empty = |s: &Option<String>| s.as_deref().filter(|s| !s.is_empty()).map(str::to_owned);
    non_empty(&diag.formatted)
        .or_else(|| non_empty(&diag.message))
        .unwrap_or_else(|| {
            format!(
                "{}: Failed to generate CSS from SASS, but the error is unknown.",
                timestamp()
            )
        })
}

async fn write_output(path: &Utf8Path, css: &str) -> Result<(), Error> {
    let write_err = |source| Error::Write {
        path: path.to_owned(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_str().is_empty()) {
        fs_err::tokio::create_dir_all(parent.as_std_path())
            .await
            .map_err(write_err)?;
    }
    fs_err::tokio::write(path.as_std_path(), css).await.map_err(write_err)
}
