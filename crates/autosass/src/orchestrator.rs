//! Per-file compilation
//!
//! [`Orchestrator::compile_file`] validates the configured formats one by one
//! and dispatches a compiler invocation for each as soon as it validates. It
//! never waits for a dispatched compilation: outcomes go to the [`Reporter`].
//! A format that fails validation aborts the remaining formats, but those
//! already dispatched still run to completion.

use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard};

use camino::{Utf8Path, Utf8PathBuf};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::compiler::{CompilationResult, CompilerDiagnostic, OutputStyle, StyleCompiler};
use crate::config::ResolvedConfig;
use crate::error::{Error, Result};
use crate::reporter::Reporter;
use crate::target::resolve_target;

/// Dispatches compiler invocations and tracks the ones still running.
pub struct Orchestrator {
    compiler: Arc<dyn StyleCompiler>,
    reporter: Reporter,
    permits: Arc<Semaphore>,
    in_flight: Mutex<JoinSet<()>>,
}

impl Orchestrator {
    /// `max_concurrent` bounds compiler invocations running at once;
    /// `None` uses the available parallelism.
    pub fn new(
        compiler: Arc<dyn StyleCompiler>,
        reporter: Reporter,
        max_concurrent: Option<usize>,
    ) -> Self {
        let permits = max_concurrent
            .filter(|n| *n > 0)
            .unwrap_or_else(|| {
                std::thread::available_parallelism()
                    .map(NonZeroUsize::get)
                    .unwrap_or(4)
            });
        tracing::debug!(permits, "compiler concurrency limit");

        Self {
            compiler,
            reporter,
            permits: Arc::new(Semaphore::new(permits)),
            in_flight: Mutex::new(JoinSet::new()),
        }
    }

    /// Compile `source` to every configured format.
    ///
    /// Must be called from within a tokio runtime. Returns once every format
    /// is dispatched; errors are configuration problems found before or
    /// during dispatch.
    #[tracing::instrument(level = "debug", skip(self, settings))]
    pub fn compile_file(&self, source: &Utf8Path, settings: &ResolvedConfig) -> Result<()> {
        self.reporter.output().clear();

        let config = &settings.config;
        let target = resolve_target(source, &config.target_dir, settings.project_root.as_deref())?;

        if config.formats.is_empty() {
            return Err(Error::config(
                "No formats are specified. Define the formats setting (or remove it to use the defaults)",
            ));
        }

        for (index, format) in config.formats.iter().enumerate() {
            let style = OutputStyle::from_format_name(&format.format, index)?;
            if format.extension.is_empty() {
                return Err(Error::config(format!(
                    "No extension specified for formats[{index}]."
                )));
            }

            let output_path = target.output_path(&format.extension);
            tracing::debug!(%source, %output_path, %style, "dispatching compilation");
            self.dispatch(source, style, output_path);
        }

        Ok(())
    }

    fn dispatch(&self, source: &Utf8Path, style: OutputStyle, output_path: Utf8PathBuf) {
        let compiler = Arc::clone(&self.compiler);
        let permits = Arc::clone(&self.permits);
        let reporter = self.reporter.clone();
        let source = source.to_owned();

        let mut in_flight = self.in_flight();
        reap_finished(&mut in_flight);
        in_flight.spawn(async move {
            // The semaphore is never closed
            let Ok(_permit) = permits.acquire_owned().await else {
                return;
            };

            let result = match tokio::task::spawn_blocking(move || compiler.compile(&source, style)).await
            {
                Ok(result) => result,
                Err(e) => CompilationResult::Failure(CompilerDiagnostic {
                    formatted: None,
                    message: Some(format!("compiler task failed: {e}")),
                }),
            };

            reporter.handle_result(&output_path, result).await;
        });
    }

    /// Wait until every dispatched compilation has been reported.
    pub async fn wait_idle(&self) {
        loop {
            let mut tasks = std::mem::take(&mut *self.in_flight());
            if tasks.is_empty() {
                return;
            }
            while let Some(res) = tasks.join_next().await {
                log_abnormal_exit(res);
            }
        }
    }

    fn in_flight(&self) -> MutexGuard<'_, JoinSet<()>> {
        self.in_flight.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Join tasks that already finished so a long watch session does not
/// accumulate them.
fn reap_finished(tasks: &mut JoinSet<()>) {
    while let Some(res) = tasks.try_join_next() {
        log_abnormal_exit(res);
    }
}

fn log_abnormal_exit(res: std::result::Result<(), tokio::task::JoinError>) {
    if let Err(e) = res {
        tracing::warn!(error = %e, "compilation task ended abnormally");
    }
}
