use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("No parquet files found in {folder} for pattern '{pattern}'")]
    NoFilesFound { folder: PathBuf, pattern: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parquet error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid close_time {millis} in {file}")]
    InvalidTimestamp { file: String, millis: i64 },

    #[error(transparent)]
    Core(#[from] core_types::CoreError),
}
