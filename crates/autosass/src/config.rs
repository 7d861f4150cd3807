//! Configuration file discovery and parsing
//!
//! Searches for `.config/autosass.yaml` walking up from the starting
//! directory. The project root is the parent of `.config/`. Without a config
//! file the defaults apply and the starting directory is the project root.

use camino::{Utf8Path, Utf8PathBuf};

pub use autosass_config::{AutosassConfig, FormatSpec};

use crate::error::{Error, Result};

const CONFIG_DIR: &str = ".config";
const CONFIG_FILE: &str = "autosass.yaml";

/// Settings in effect for one operation
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Root that relative `target_dir` values are joined onto
    pub project_root: Option<Utf8PathBuf>,
    pub config: AutosassConfig,
}

/// Where settings come from.
///
/// File-backed stores re-read the file on every [`SettingsStore::load`], so
/// edits apply to the next save without a restart.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    project_root: Option<Utf8PathBuf>,
    source: SettingsSource,
}

#[derive(Debug, Clone)]
enum SettingsSource {
    File(Utf8PathBuf),
    Fixed(AutosassConfig),
}

impl SettingsStore {
    /// Discover `.config/autosass.yaml` from `start` upwards.
    pub fn discover_from(start: &Utf8Path) -> Self {
        match find_config_file(start) {
            Some(path) => {
                // Project root is the parent of .config/
                let root = path.parent().and_then(Utf8Path::parent).map(Utf8Path::to_owned);
                tracing::debug!(config = %path, "using config file");
                Self {
                    project_root: root,
                    source: SettingsSource::File(path),
                }
            }
            None => {
                tracing::debug!(%start, "no config file found, using defaults");
                Self {
                    project_root: Some(start.to_owned()),
                    source: SettingsSource::Fixed(AutosassConfig::default()),
                }
            }
        }
    }

    /// Settings that never change, e.g. for embedding or tests.
    pub fn fixed(project_root: Option<Utf8PathBuf>, config: AutosassConfig) -> Self {
        Self {
            project_root,
            source: SettingsSource::Fixed(config),
        }
    }

    pub fn project_root(&self) -> Option<&Utf8Path> {
        self.project_root.as_deref()
    }

    /// Path of the backing config file, if any
    pub fn config_file(&self) -> Option<&Utf8Path> {
        match &self.source {
            SettingsSource::File(path) => Some(path),
            SettingsSource::Fixed(_) => None,
        }
    }

    /// Current settings.
    pub fn load(&self) -> Result<ResolvedConfig> {
        let config = match &self.source {
            SettingsSource::File(path) => load_config(path)?,
            SettingsSource::Fixed(config) => config.clone(),
        };
        Ok(ResolvedConfig {
            project_root: self.project_root.clone(),
            config,
        })
    }
}

fn find_config_file(start: &Utf8Path) -> Option<Utf8PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
        .find(|path| path.is_file())
}

fn load_config(path: &Utf8Path) -> Result<AutosassConfig> {
    let content = fs_err::read_to_string(path.as_std_path())
        .map_err(|e| Error::config(format!("Failed to read {path}: {e}")))?;
    if content.trim().is_empty() {
        return Ok(AutosassConfig::default());
    }
    serde_yaml::from_str(&content).map_err(|e| Error::config(format!("Failed to parse {path}: {e}")))
}
