use std::path::PathBuf;

use thiserror::Error;

/// Errors from the fallible outer operations. Parsing itself never fails.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read config file at {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file at {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("typst compilation failed: {0}")]
    Typst(String),

    #[error("pdf generation failed: {0}")]
    Pdf(String),
}

pub type Result<T> = std::result::Result<T, Error>;
