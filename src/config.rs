//! Optional TOML settings for dataset construction.
//!
//! Config keys (TOML): `root`, `class_type`, `split`, `download`,
//! `archive_url`, `archive_sha256`. Every key may also sit under a
//! `[dataset]` table.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::dataset::{ClassType, Split};
use crate::download::{ArchiveSource, DEFAULT_ARCHIVE_URL};

/// Errors that can occur while loading settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config file {path}: {source}")]
    ParseToml {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Dataset settings as stored on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetSettings {
    /// Directory holding `fgvc-aircraft-2013b`; defaults to `.metad2a/datasets`.
    #[serde(default)]
    pub root: Option<PathBuf>,
    #[serde(default)]
    pub class_type: ClassType,
    #[serde(default)]
    pub split: Split,
    #[serde(default)]
    pub download: bool,
    #[serde(default = "default_archive_url")]
    pub archive_url: String,
    #[serde(default)]
    pub archive_sha256: Option<String>,
}

impl Default for DatasetSettings {
    fn default() -> Self {
        Self {
            root: None,
            class_type: ClassType::default(),
            split: Split::default(),
            download: false,
            archive_url: default_archive_url(),
            archive_sha256: None,
        }
    }
}

impl DatasetSettings {
    pub fn archive_source(&self) -> ArchiveSource {
        ArchiveSource {
            url: self.archive_url.clone(),
            sha256: self.archive_sha256.clone(),
        }
    }
}

fn default_archive_url() -> String {
    DEFAULT_ARCHIVE_URL.to_string()
}

/// Load settings from `path`, returning defaults if the file is missing.
pub fn load_settings_from(path: &Path) -> Result<DatasetSettings, ConfigError> {
    if !path.exists() {
        return Ok(DatasetSettings::default());
    }
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_settings(&text).map_err(|source| ConfigError::ParseToml {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_settings(text: &str) -> Result<DatasetSettings, toml::de::Error> {
    let mut value: toml::Value = toml::from_str(text)?;
    if let Some(root) = value.as_table_mut() {
        if let Some(dataset) = root
            .get("dataset")
            .and_then(|dataset| dataset.as_table())
            .cloned()
        {
            for (key, value) in dataset {
                root.entry(key).or_insert(value);
            }
            root.remove("dataset");
        }
    }
    value.try_into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let settings = load_settings_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(settings, DatasetSettings::default());
        assert_eq!(settings.archive_source().url, DEFAULT_ARCHIVE_URL);
    }

    #[test]
    fn parses_flat_and_nested_keys() {
        let flat = parse_settings(
            "root = \"/data\"\nclass_type = \"family\"\nsplit = \"trainval\"\ndownload = true\n",
        )
        .unwrap();
        assert_eq!(flat.root.as_deref(), Some(Path::new("/data")));
        assert_eq!(flat.class_type, ClassType::Family);
        assert_eq!(flat.split, Split::TrainVal);
        assert!(flat.download);

        let nested = parse_settings(
            "[dataset]\nsplit = \"test\"\narchive_url = \"https://mirror.example/a.tgz\"\n",
        )
        .unwrap();
        assert_eq!(nested.split, Split::Test);
        assert_eq!(nested.class_type, ClassType::Variant);
        assert_eq!(nested.archive_url, "https://mirror.example/a.tgz");
    }

    #[test]
    fn invalid_split_reports_valid_values() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dataset.toml");
        std::fs::write(&path, "split = \"holdout\"\n").unwrap();
        let err = load_settings_from(&path).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("holdout"));
        assert!(message.contains("train, val, trainval, test"));
    }

    #[test]
    fn settings_round_trip_through_toml() {
        let settings = DatasetSettings {
            root: Some(PathBuf::from("/scratch/fgvc")),
            class_type: ClassType::Manufacturer,
            split: Split::Val,
            download: true,
            archive_url: default_archive_url(),
            archive_sha256: Some("ab".repeat(32)),
        };
        let text = toml::to_string(&settings).unwrap();
        assert_eq!(parse_settings(&text).unwrap(), settings);
    }
}
