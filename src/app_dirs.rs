//! Data directory helpers anchored to a single `.metad2a` folder.
//!
//! Datasets and log files live under the OS config directory by default. A
//! `METAD2A_DATA_HOME` override relocates everything for tests or shared
//! cluster storage.

use std::{
    path::PathBuf,
    sync::{LazyLock, Mutex},
};

use directories::BaseDirs;
use thiserror::Error;

/// Name of the data directory that lives under the OS config root.
pub const APP_DIR_NAME: &str = ".metad2a";
/// Environment variable that replaces the OS config root.
pub const DATA_HOME_ENV: &str = "METAD2A_DATA_HOME";

static DATA_BASE_OVERRIDE: LazyLock<Mutex<Option<PathBuf>>> = LazyLock::new(|| Mutex::new(None));

/// Errors that can occur while resolving or preparing data directories.
#[derive(Debug, Error)]
pub enum AppDirError {
    /// No suitable base config directory could be resolved.
    #[error("No suitable base directory available for dataset files")]
    NoBaseDir,
    /// Failed to create the directory.
    #[error("Failed to create data directory at {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Return the root `.metad2a` directory, creating it if needed.
pub fn app_root_dir() -> Result<PathBuf, AppDirError> {
    let base = data_base_dir().ok_or(AppDirError::NoBaseDir)?;
    let path = base.join(APP_DIR_NAME);
    create_dir(path)
}

/// Return the default dataset root inside `.metad2a`, creating it if needed.
pub fn datasets_dir() -> Result<PathBuf, AppDirError> {
    create_dir(app_root_dir()?.join("datasets"))
}

/// Return the logs directory inside `.metad2a`, creating it if needed.
pub fn logs_dir() -> Result<PathBuf, AppDirError> {
    create_dir(app_root_dir()?.join("logs"))
}

fn create_dir(path: PathBuf) -> Result<PathBuf, AppDirError> {
    std::fs::create_dir_all(&path).map_err(|source| AppDirError::CreateDir {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

fn data_base_dir() -> Option<PathBuf> {
    if let Some(path) = DATA_BASE_OVERRIDE
        .lock()
        .ok()
        .and_then(|guard| guard.clone())
    {
        return Some(path);
    }
    if let Ok(path) = std::env::var(DATA_HOME_ENV) {
        return Some(PathBuf::from(path));
    }
    BaseDirs::new().map(|dirs| dirs.config_dir().to_path_buf())
}

#[cfg(test)]
fn set_data_base_override(path: PathBuf) {
    let mut guard = DATA_BASE_OVERRIDE
        .lock()
        .expect("data base override mutex poisoned");
    *guard = Some(path);
}

#[cfg(test)]
fn clear_data_base_override() {
    let mut guard = DATA_BASE_OVERRIDE
        .lock()
        .expect("data base override mutex poisoned");
    *guard = None;
}
