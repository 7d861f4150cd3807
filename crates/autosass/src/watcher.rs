//! Save events from the file system
//!
//! Editors save in different ways (write in place, write-and-rename), so
//! every create or modify event for a stylesheet counts as a save. Events are
//! debounced: the first event opens a short window, and every stylesheet
//! touched inside it is reported once, in first-seen order.

use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use indexmap::IndexSet;
use notify::{RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::error::Result;
use crate::exclude::is_style_source;

/// Debounce window for save events
pub const DEBOUNCE: Duration = Duration::from_millis(100);

/// Whether a notify event kind can mean "the file was saved".
fn is_save_event(kind: &notify::EventKind) -> bool {
    matches!(
        kind,
        notify::EventKind::Create(_) | notify::EventKind::Modify(_)
    )
}

/// Recursive watcher producing debounced batches of saved stylesheets
pub struct SaveWatcher {
    // Dropping the watcher stops the events
    _watcher: notify::RecommendedWatcher,
    rx: mpsc::UnboundedReceiver<Utf8PathBuf>,
    debounce: Duration,
}

impl SaveWatcher {
    /// Start watching `root` recursively.
    pub fn new(root: &Utf8Path) -> Result<Self> {
        Self::with_debounce(root, DEBOUNCE)
    }

    pub fn with_debounce(root: &Utf8Path, debounce: Duration) -> Result<Self> {
        let (tx, rx) = mpsc::unbounded_channel();

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
            let event = match res {
                Ok(event) => event,
                Err(e) => {
                    tracing::warn!(error = %e, "file watcher error");
                    return;
                }
            };
            if !is_save_event(&event.kind) {
                return;
            }
            for path in event.paths {
                let Ok(path) = Utf8PathBuf::from_path_buf(path) else {
                    continue;
                };
                if is_style_source(path.as_str()) {
                    // The receiver is gone once the watcher is shutting down
                    let _ = tx.send(path);
                }
            }
        })?;
        watcher.watch(root.as_std_path(), RecursiveMode::Recursive)?;

        Ok(Self {
            _watcher: watcher,
            rx,
            debounce,
        })
    }

    /// Wait for the next batch of saved stylesheets.
    ///
    /// Returns `None` if the watcher stopped producing events.
    pub async fn next_batch(&mut self) -> Option<Vec<Utf8PathBuf>> {
        let first = self.rx.recv().await?;
        let mut batch = IndexSet::new();
        batch.insert(first);

        tokio::time::sleep(self.debounce).await;
        while let Ok(path) = self.rx.try_recv() {
            batch.insert(path);
        }

        Some(batch.into_iter().collect())
    }
}
