// SPDX-License-Identifier: Apache-2.0
// Copyright © 2026 Crowdcount Developers. All Rights Reserved.

/// Error type for ground truth loading, conversion and path resolution.
///
/// A dataset whose annotation file is missing is not an error: the store logs
/// a warning and carries on without that dataset's entries.
#[derive(Debug)]
pub enum Error {
    /// An I/O error occurred while reading or writing a file.
    IoError(std::io::Error),
    /// Configuration parsing or loading error.
    ConfigError(config::ConfigError),
    /// JSON serialization or deserialization error.
    JsonError(serde_json::Error),
    /// CSV reading error, including rows lacking a required column.
    CsvError(csv::Error),
    /// The requested image path has no ground truth in the table.
    KeyNotFound(String),
    /// A crowdsourced annotation payload could not be decoded.
    MalformedAnnotation(String),
    /// The dataset name is not one of the known datasets.
    UnknownDataset(String),
    /// No image files were found where some were required.
    MissingImages(String),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::IoError(err)
    }
}

impl From<config::ConfigError> for Error {
    fn from(err: config::ConfigError) -> Self {
        Error::ConfigError(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::JsonError(err)
    }
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error::CsvError(err)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::IoError(e) => write!(f, "I/O error: {}", e),
            Error::ConfigError(e) => write!(f, "Configuration error: {}", e),
            Error::JsonError(e) => write!(f, "JSON error: {}", e),
            Error::CsvError(e) => write!(f, "CSV error: {}", e),
            Error::KeyNotFound(s) => write!(f, "No annotations for: {}", s),
            Error::MalformedAnnotation(s) => write!(f, "Malformed annotation: {}", s),
            Error::UnknownDataset(s) => write!(f, "Unknown dataset: {}", s),
            Error::MissingImages(s) => write!(f, "Missing images: {}", s),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::IoError(e) => Some(e),
            Error::ConfigError(e) => Some(e),
            Error::JsonError(e) => Some(e),
            Error::CsvError(e) => Some(e),
            _ => None,
        }
    }
}
