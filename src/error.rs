//! # Error Types
//!
//! A single error enum covers every fallible operation in the crate: reading the
//! line table and project catalog, generating the table from git, exporting
//! charts and persisting preferences.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to read line table: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("git error: {0}")]
    Git(#[from] git2::Error),

    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("plotting error: {0}")]
    Plot(String),

    #[error("preference store at {}: {}", .path.display(), .reason)]
    Preference { path: PathBuf, reason: String },
}

pub type Result<T> = std::result::Result<T, Error>;
