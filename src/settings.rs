//! Settings persistence - load and save settings to disk.
//!
//! Settings live in `settings.toml` inside the platform-specific config
//! folder unless a path is given on the command line:
//! - macOS: ~/Library/Application Support/com.data-mirinda.Data-Mirinda/
//! - Windows: %APPDATA%/data-mirinda/Data Mirinda/config/
//! - Linux: ~/.config/datamirinda/

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::columns::ColumnHints;

const APP_QUALIFIER: &str = "com";
const APP_ORG: &str = "data-mirinda";
const APP_NAME: &str = "Data Mirinda";
const CONFIG_FILENAME: &str = "settings.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Initial state of the "only valid phones" toggle.
    pub only_valid_phones: bool,
    /// Folder scanned at startup when no files are given.
    pub data_dir: Option<PathBuf>,
    /// Candidate phrases used to find the name and phone columns.
    pub columns: ColumnHints,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            only_valid_phones: true,
            data_dir: None,
            columns: ColumnHints::default(),
        }
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("could not determine the settings directory")]
    NoConfigDir,
    #[error("settings file not found: {0}")]
    MissingFile(PathBuf),
    #[error("failed to read settings file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse settings file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("failed to write settings file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, SettingsError>;

/// Get the path to the default settings file.
pub fn settings_path() -> Option<PathBuf> {
    ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_NAME)
        .map(|dirs| dirs.config_dir().join(CONFIG_FILENAME))
}

/// Load settings.
///
/// An explicit `path` must exist. Without one, the default location is tried
/// and a missing file (or undeterminable directory) yields defaults.
pub fn load(path: Option<&Path>) -> Result<Settings> {
    let (path, required) = match path {
        Some(p) => (p.to_path_buf(), true),
        None => match settings_path() {
            Some(p) => (p, false),
            None => {
                log::warn!("Could not determine settings path, using defaults");
                return Ok(Settings::default());
            }
        },
    };

    match load_at_path(&path)? {
        Some(settings) => {
            log::info!("Loaded settings from {}", path.display());
            Ok(settings)
        }
        None if required => Err(SettingsError::MissingFile(path)),
        None => {
            log::info!("No settings file at {}, using defaults", path.display());
            Ok(Settings::default())
        }
    }
}

fn load_at_path(path: &Path) -> Result<Option<Settings>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(SettingsError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    toml::from_str(&content)
        .map(Some)
        .map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
}

/// Save settings to `path`, or to the default location.
///
/// Creates the parent directory if it doesn't exist.
pub fn save(settings: &Settings, path: Option<&Path>) -> Result<PathBuf> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => settings_path().ok_or(SettingsError::NoConfigDir)?,
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| SettingsError::Write {
            path: path.clone(),
            source,
        })?;
    }

    let content = toml::to_string_pretty(settings)?;
    fs::write(&path, content).map_err(|source| SettingsError::Write {
        path: path.clone(),
        source,
    })?;

    log::info!("Saved settings to {}", path.display());
    Ok(path)
}
