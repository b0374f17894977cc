//! Errors raised while building a query engine
//!
//! Query evaluation itself never fails: evaluation problems come back as
//! error results. Only setup (configuration, cache sizing, config files)
//! can return these.

use quickeval_diagnostics::{ErrorCode, QE0400, QE0401, QE0402};
use quickeval_types::ConfigError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for engine setup
pub type Result<T> = std::result::Result<T, QueryError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CacheError {
    #[error("Cache capacity must be greater than 0 (got {0})")]
    InvalidCapacity(usize),
}

#[derive(Debug, Error)]
pub enum QueryError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error("Cannot read configuration file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl QueryError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Config(_) => QE0400,
            Self::Io { .. } => QE0401,
            Self::Cache(_) => QE0402,
        }
    }
}
