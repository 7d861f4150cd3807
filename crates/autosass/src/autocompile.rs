//! Save handling, "compile all", and the watch loop.

use std::future::Future;
use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};

use crate::compiler::StyleCompiler;
use crate::config::{ResolvedConfig, SettingsStore};
use crate::directive;
use crate::error::{Error, Result};
use crate::exclude::{is_excluded, is_style_source};
use crate::orchestrator::Orchestrator;
use crate::output::OutputChannel;
use crate::reporter::{Reporter, timestamp};
use crate::watcher::SaveWatcher;

/// What a save event led to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Not a `.scss`/`.sass` file
    Ignored,
    /// Matched the exclude pattern, nothing compiled
    Excluded,
    /// A `main:` directive redirected compilation to this file
    Delegated(Utf8PathBuf),
    /// The saved file itself was compiled
    Compiled,
    /// A configuration or directive problem stopped the save; already reported
    Failed,
}

/// Counts for one "compile all" run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompileAllSummary {
    pub compiled: usize,
    pub excluded: usize,
    pub failed: usize,
}

/// Everything needed to react to saves and compile requests.
pub struct Autocompiler {
    settings: SettingsStore,
    orchestrator: Orchestrator,
    output: Arc<dyn OutputChannel>,
}

impl Autocompiler {
    /// The concurrency limit is read from the settings once, here.
    pub fn new(
        settings: SettingsStore,
        compiler: Arc<dyn StyleCompiler>,
        output: Arc<dyn OutputChannel>,
    ) -> Result<Self> {
        let max_concurrent = settings.load()?.config.max_concurrent_compiles;
        let orchestrator =
            Orchestrator::new(compiler, Reporter::new(Arc::clone(&output)), max_concurrent);
        Ok(Self {
            settings,
            orchestrator,
            output,
        })
    }

    /// React to `path` having been saved.
    ///
    /// Compilations are dispatched, not awaited; see [`Self::wait_idle`].
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn on_save(&self, path: &Utf8Path) -> SaveOutcome {
        if !is_style_source(path.as_str()) {
            return SaveOutcome::Ignored;
        }
        match self.handle_save(path) {
            Ok(outcome) => outcome,
            Err(e) => {
                self.report_error(&e);
                SaveOutcome::Failed
            }
        }
    }

    fn handle_save(&self, path: &Utf8Path) -> Result<SaveOutcome> {
        let settings = self.settings.load()?;
        let directives = directive::scan_file(path)?;

        if let Some(main_file) = directives.main_file {
            tracing::debug!(%path, %main_file, "compiling main file instead");
            self.orchestrator.compile_file(&main_file, &settings)?;
            return Ok(SaveOutcome::Delegated(main_file));
        }

        let forced = settings.config.compile_after_save || directives.compile_after_save;
        let filename = path.file_name().unwrap_or(path.as_str());
        if forced || !is_excluded(filename, &settings.config.exclude_regex)? {
            self.orchestrator.compile_file(path, &settings)?;
            Ok(SaveOutcome::Compiled)
        } else {
            self.log_excluded(path);
            Ok(SaveOutcome::Excluded)
        }
    }

    /// Compile one file directly: no directives, no exclusion.
    pub fn compile_one(&self, path: &Utf8Path) -> Result<()> {
        let settings = self.settings.load()?;
        self.orchestrator.compile_file(path, &settings)
    }

    /// Compile every stylesheet under the project root that is not excluded.
    ///
    /// A problem with one file is reported and the run moves on to the next.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn compile_all(&self) -> Result<CompileAllSummary> {
        let settings = self.settings.load()?;
        let root = project_root(&settings)?;

        let mut summary = CompileAllSummary::default();
        for file in discover_sources(root) {
            let filename = file.file_name().unwrap_or(file.as_str());
            let result = is_excluded(filename, &settings.config.exclude_regex).and_then(|excluded| {
                if excluded {
                    self.log_excluded(&file);
                    Ok(false)
                } else {
                    self.orchestrator.compile_file(&file, &settings).map(|()| true)
                }
            });
            match result {
                Ok(true) => summary.compiled += 1,
                Ok(false) => summary.excluded += 1,
                Err(e) => {
                    self.report_error(&e);
                    summary.failed += 1;
                }
            }
        }

        tracing::info!(
            compiled = summary.compiled,
            excluded = summary.excluded,
            failed = summary.failed,
            "compile all finished dispatching"
        );
        Ok(summary)
    }

    /// Watch the project root and handle saves until `shutdown` resolves.
    pub async fn watch(&self, shutdown: impl Future<Output = ()>) -> Result<()> {
        let settings = self.settings.load()?;
        let root = project_root(&settings)?;
        let mut watcher = SaveWatcher::new(root)?;
        tracing::info!(%root, "watching for stylesheet changes");

        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                batch = watcher.next_batch() => {
                    let Some(batch) = batch else { break };
                    for path in batch {
                        if !path.is_file() {
                            tracing::debug!(%path, "saved file is gone, skipping");
                            continue;
                        }
                        let outcome = self.on_save(&path);
                        tracing::debug!(%path, ?outcome, "handled save");
                    }
                }
            }
        }

        tracing::info!("waiting for running compilations");
        self.wait_idle().await;
        Ok(())
    }

    /// Wait until every dispatched compilation has been reported.
    pub async fn wait_idle(&self) {
        self.orchestrator.wait_idle().await;
    }

    fn log_excluded(&self, path: &Utf8Path) {
        self.output.append_line(&format!(
            "{}: File {path} is excluded from building to CSS. Check the exclude_regex setting.",
            timestamp()
        ));
    }

    fn report_error(&self, error: &Error) {
        tracing::warn!(%error, "could not generate CSS file");
        self.output
            .append_line(&format!("{}: Failed to generate CSS: {error}", timestamp()));
        self.output
            .show_error_message(&format!("autosass: could not generate CSS file: {error}"));
        self.output.show();
    }
}

fn project_root(settings: &ResolvedConfig) -> Result<&Utf8Path> {
    settings
        .project_root
        .as_deref()
        .ok_or_else(|| Error::config("No project root to search for stylesheets"))
}

/// Every `.scss`/`.sass` file under `root`, honoring ignore files.
pub fn discover_sources(root: &Utf8Path) -> Vec<Utf8PathBuf> {
    ignore::WalkBuilder::new(root)
        .sort_by_file_name(|a, b| a.cmp(b))
        .build()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!(error = %e, "skipping unreadable entry");
                None
            }
        })
        .filter(|entry| entry.file_type().is_some_and(|ft| ft.is_file()))
        .filter_map(|entry| Utf8PathBuf::from_path_buf(entry.into_path()).ok())
        .filter(|path| is_style_source(path.as_str()))
        .collect()
}
