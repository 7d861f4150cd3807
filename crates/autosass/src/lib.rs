//! autosass - compile SCSS/Sass stylesheets on save
//!
//! A save of a `.scss`/`.sass` file goes through [`Autocompiler::on_save`]:
//! the leading comment block is scanned for directives, the exclude pattern
//! is consulted, and the file (or the main file it points to) is compiled to
//! every configured format.

pub mod autocompile;
pub mod compiler;
pub mod config;
pub mod directive;
pub mod error;
pub mod exclude;
pub mod orchestrator;
pub mod output;
pub mod reporter;
pub mod target;
pub mod watcher;

pub use autocompile::{Autocompiler, CompileAllSummary, SaveOutcome};
pub use compiler::{CompilationResult, CompilerDiagnostic, GrassCompiler, OutputStyle, StyleCompiler};
pub use config::{AutosassConfig, FormatSpec, ResolvedConfig, SettingsStore};
pub use error::{Error, Result};
pub use output::{ConsoleChannel, MemoryChannel, OutputChannel};
