//! Log channel and error notifications
//!
//! One [`OutputChannel`] is built at startup and shared by reference with
//! everything that reports.

use std::sync::Mutex;

/// Append-only log channel plus a transient error notification surface.
pub trait OutputChannel: Send + Sync {
    /// Drop everything logged so far.
    fn clear(&self);

    /// Append one line to the log.
    fn append_line(&self, line: &str);

    /// Bring the log to the user's attention.
    fn show(&self);

    /// Show a short-lived error notification.
    fn show_error_message(&self, message: &str);
}

/// Forwards everything to tracing. Used by the CLI.
#[derive(Debug, Default)]
pub struct ConsoleChannel;

impl OutputChannel for ConsoleChannel {
    fn clear(&self) {
        tracing::trace!("output cleared");
    }

    fn append_line(&self, line: &str) {
        tracing::info!("{line}");
    }

    fn show(&self) {}

    fn show_error_message(&self, message: &str) {
        tracing::error!("{message}");
    }
}

/// Keeps lines and notifications in memory.
#[derive(Debug, Default)]
pub struct MemoryChannel {
    state: Mutex<MemoryState>,
}

#[derive(Debug, Default)]
struct MemoryState {
    lines: Vec<String>,
    notifications: Vec<String>,
    shown: usize,
}

impl MemoryChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines appended since the last clear
    pub fn lines(&self) -> Vec<String> {
        self.lock().lines.clone()
    }

    /// Every error notification ever shown
    pub fn notifications(&self) -> Vec<String> {
        self.lock().notifications.clone()
    }

    /// How many times the log was revealed
    pub fn times_shown(&self) -> usize {
        self.lock().shown
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryState> {
        // A poisoned log is still a readable log
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl OutputChannel for MemoryChannel {
    fn clear(&self) {
        self.lock().lines.clear();
    }

    fn append_line(&self, line: &str) {
        self.lock().lines.push(line.to_owned());
    }

    fn show(&self) {
        self.lock().shown += 1;
    }

    fn show_error_message(&self, message: &str) {
        self.lock().notifications.push(message.to_owned());
    }
}
