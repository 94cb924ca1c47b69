use std::path::PathBuf;

use thiserror::Error;

pub type DashboardResult<T> = Result<T, DashboardError>;

#[derive(Error, Debug)]
pub enum DashboardError {
    /// The source table could not be read or does not follow the column contract.
    #[error("failed to load dataset from {source_name}: {message}")]
    SourceLoad {
        source_name: String,
        message: String,
    },

    #[error("invalid filter selection: {0}")]
    InvalidSelection(String),

    #[error("failed to export {path}: {message}")]
    Export { path: PathBuf, message: String },
}

impl DashboardError {
    /// Wrap a loader error, keeping the whole `anyhow` context chain in the message.
    pub fn source_load(source_name: impl Into<String>, err: &anyhow::Error) -> Self {
        DashboardError::SourceLoad {
            source_name: source_name.into(),
            message: format!("{err:#}"),
        }
    }
}
