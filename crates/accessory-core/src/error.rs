use std::path::PathBuf;

use thiserror::Error;

use crate::FieldId;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SyncError {
    #[error("no source field with id {0}")]
    UnknownField(FieldId),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config JSON")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}
