//! Error types for feed, download and archive operations.

use std::io;
use thiserror::Error;

/// Errors that can abort a pipeline run.
///
/// Per-item download failures never surface here; they are reported as
/// [`DownloadOutcome`](crate::types::DownloadOutcome) values instead.
#[derive(Error, Debug)]
pub enum RiddleError {
    /// I/O error during file operations.
    #[error(transparent)]
    IoError(#[from] io::Error),

    /// HTTP request error.
    #[error(transparent)]
    ReqwestError(#[from] reqwest::Error),

    /// JSON deserialization error from the feed API.
    #[error(transparent)]
    SerdeJsonError(#[from] serde_json::Error),

    /// YAML parse error in the configuration file.
    #[error("Invalid configuration file: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// Zip archive could not be read or written.
    #[error(transparent)]
    ZipError(#[from] zip::result::ZipError),

    /// Missing or inconsistent configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Feed enumeration failure.
    #[error("Feed listing failed: {0}")]
    Feed(String),
}
