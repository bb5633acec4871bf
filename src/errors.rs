use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read fuel report settings from {path}: {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Fuel report settings in {path} are not valid JSON: {source}")]
    JsonParseError {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("No fuel report settings file at {path}")]
    NotFound { path: PathBuf },
    #[error("Setting '{field}' rejected: {message}")]
    Invalid { field: String, message: String },
}

#[derive(Error, Debug)]
pub enum FuelError {
    #[error("Input file not found: {path}")]
    MissingInputFile { path: PathBuf },
    #[error("The {dataset} dataset contains no data rows")]
    EmptyDataset { dataset: String },
    #[error("No date column found in the {dataset} dataset")]
    MissingDateColumn { dataset: String },
    #[error("Required column '{field}' could not be resolved in the {dataset} dataset")]
    UnresolvedColumn { dataset: String, field: String },
    #[error("CSV error in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, FuelError>;
