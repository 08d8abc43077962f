use thiserror::Error;

use crate::errors::domain::DomainError;

/// Top-level application error.
///
/// Engine errors stay as [`DomainError`] inside the match layers; this type
/// covers everything that can fail while bootstrapping and running the
/// process (config parsing, catalog loading, serialization).
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {detail}")]
    Config { detail: String },
    #[error("Catalog error: {detail}")]
    Catalog { detail: String },
    #[error("Internal error: {detail}")]
    Internal { detail: String },
    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl AppError {
    pub fn config(detail: impl Into<String>) -> Self {
        Self::Config {
            detail: detail.into(),
        }
    }

    pub fn catalog(detail: impl Into<String>) -> Self {
        Self::Catalog {
            detail: detail.into(),
        }
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self::Internal {
            detail: detail.into(),
        }
    }
}
