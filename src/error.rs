use std::path::PathBuf;

use thiserror::Error;

/// Failures talking to the record service.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StoreError {
    #[error("Record not found: {0}")]
    NotFound(String),
    #[error("{message}")]
    Api { status: u16, message: String },
    #[error("Network error: {0}")]
    Network(String),
    #[error("Invalid response: {0}")]
    Decode(String),
    #[error("Request aborted")]
    Aborted,
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl StoreError {
    /// Message suitable for the status panel, never empty.
    pub fn describe(&self) -> String {
        let message = self.to_string();
        if message.trim().is_empty() {
            "Unknown error".to_string()
        } else {
            message
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum DashboardError {
    #[error("Failed to load products: {0}")]
    Load(String),
    #[error("Load aborted")]
    Aborted,
    #[error("Failed to add product: {0}")]
    Add(String),
    #[error("Failed to update product: {0}")]
    Update(String),
    #[error("Failed to delete product: {0}")]
    Delete(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

/// Rejected form input. Field names match the form labels.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValidationError {
    #[error("{0} is required")]
    Required(&'static str),
    #[error("Invalid {field}: {value:?}")]
    InvalidNumber { field: &'static str, value: String },
    #[error("{0} must not be negative")]
    Negative(&'static str),
    #[error("Nothing to update")]
    EmptyPatch,
    #[error("Unknown field: {0}")]
    UnknownField(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("Invalid base URL {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("Unsupported URL scheme {0:?}, expected http or https")]
    UnsupportedScheme(String),
    #[error("Invalid value for {key}: {reason}")]
    InvalidValue { key: &'static str, reason: String },
}
