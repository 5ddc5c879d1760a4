//! Error types for the scanconf-reconcile crate.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReconcileError {
    #[error(transparent)]
    Core(#[from] scanconf_core::CoreError),

    #[error("API error: {0}")]
    Api(#[from] scanconf_api::ApiError),

    #[error("Failed to open change list {path}: {source}")]
    OpenChangeList {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read change list {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Invalid row in {path} at line {line}: {source}")]
    InvalidRow {
        path: PathBuf,
        line: u64,
        #[source]
        source: scanconf_core::CoreError,
    },

    #[error("Malformed row in {path} at line {line}: {reason}")]
    MalformedRow {
        path: PathBuf,
        line: u64,
        reason: String,
    },

    #[error("Update failed for appliance {appliance} (ID: {appliance_id}): {source}")]
    UpdateFailed {
        appliance: String,
        appliance_id: String,
        #[source]
        source: scanconf_api::ApiError,
    },

    #[error("{} of {attempted} appliance updates failed: {}", failed.len(), failed.join(", "))]
    UpdatesFailed {
        attempted: usize,
        failed: Vec<String>,
    },

    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, ReconcileError>;
