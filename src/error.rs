//! Error types shared by the dataset and download modules.

use std::path::PathBuf;

use thiserror::Error;

/// Failures raised while constructing or indexing a dataset.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Split \"{value}\" not found. Valid splits are: {valid}")]
    InvalidSplit { value: String, valid: String },
    #[error("Class type \"{value}\" not found. Valid class types are: {valid}")]
    InvalidClassType { value: String, valid: String },
    #[error("Failed to read index file {path}: {source}")]
    ReadIndex {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Malformed index file {path} at line {line}: {reason}")]
    MalformedIndex {
        path: PathBuf,
        line: usize,
        reason: String,
    },
    #[error("Got {image_ids} image ids but {targets} targets")]
    LengthMismatch { image_ids: usize, targets: usize },
    #[error("Index {index} out of range for dataset of length {len}")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("Failed to load sample {path}: {reason}")]
    Load { path: PathBuf, reason: String },
    #[error(transparent)]
    Download(#[from] DownloadError),
}

/// Failures raised while fetching and unpacking the dataset archive.
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("Invalid archive URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("HTTP error fetching {url}: {reason}")]
    Http { url: String, reason: String },
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to extract {archive}: {reason}")]
    Extract { archive: PathBuf, reason: String },
    #[error("Extracted data folder {0} does not exist")]
    MissingExtracted(PathBuf),
    #[error("Invalid SHA-256 value; expected 64 hex characters, got '{0}'")]
    InvalidChecksum(String),
    #[error("Checksum mismatch for {path}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },
}

impl DownloadError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| Self::Io { path, source }
    }
}
