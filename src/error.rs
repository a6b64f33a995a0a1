use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Unsupported input (expected a .zip export or an export folder): {0:?}")]
    UnsupportedInput(PathBuf),
}

pub type Result<T> = std::result::Result<T, ConvertError>;
