//! FGVC-Aircraft loading for the MetaD2A NAS pipeline.
/// Data and log directory resolution.
pub mod app_dirs;
/// TOML dataset settings.
pub mod config;
/// Indexable datasets, loaders and transforms.
pub mod dataset;
/// Archive download and extraction.
pub mod download;
/// Error types.
pub mod error;
mod http_client;
/// Tracing subscriber setup.
pub mod logging;
/// Model-training entry point.
pub mod training;

pub use dataset::{ClassType, Dataset, FgvcAircraft, Split};
pub use error::{DatasetError, DownloadError};
pub use training::train_single_model;
