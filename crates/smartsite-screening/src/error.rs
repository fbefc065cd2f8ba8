//! Screening error types.

use std::path::PathBuf;

use thiserror::Error;

/// Failure talking to the text completion backend
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("completion request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("completion backend returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("completion backend returned no choices")]
    EmptyResponse,
}

/// Why a request could not be classified by the backend
#[derive(Debug, Error)]
pub enum ClassificationError {
    /// No backend was configured, so only keyword matching is available
    #[error("no completion backend configured")]
    NotConfigured,

    #[error("completion backend unavailable: {0}")]
    Unavailable(#[from] CompletionError),
}

#[derive(Debug, Error)]
pub enum WishlistError {
    #[error("wishlist request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("wishlist endpoint returned {0}")]
    Status(u16),
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("cannot read module registry {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid module registry: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Failure building the outbound HTTP clients
#[derive(Debug, Error)]
pub enum ScreenerBuildError {
    #[error(transparent)]
    Completion(#[from] CompletionError),

    #[error(transparent)]
    Wishlist(#[from] WishlistError),
}
