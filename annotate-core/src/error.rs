//! Error types for annotate-core.

use thiserror::Error;

/// Result type for annotate operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for annotate operations.
///
/// Equivalence predicates and the span partitioner never produce errors;
/// these variants cover ingestion, insertion, configuration, and navigation.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Invalid input provided.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// An equivalent record already exists in the target list.
    #[error("Duplicate: {0}")]
    Duplicate(String),

    /// A relation endpoint does not resolve to a current NER annotation.
    #[error("Unresolved relation endpoint: {0}")]
    UnresolvedEndpoint(String),

    /// A navigation result arrived after a newer navigation started.
    #[error("Stale navigation: {0}")]
    StaleNavigation(String),

    /// A navigation step was attempted out of order.
    #[error("Out of order: {0}")]
    OutOfOrder(String),

    /// Project configuration error.
    #[error("Config error: {0}")]
    Config(String),
}

impl Error {
    /// Create an invalid input error.
    #[must_use]
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a duplicate error.
    #[must_use]
    pub fn duplicate(msg: impl Into<String>) -> Self {
        Self::Duplicate(msg.into())
    }

    /// Create an unresolved endpoint error.
    #[must_use]
    pub fn unresolved_endpoint(msg: impl Into<String>) -> Self {
        Self::UnresolvedEndpoint(msg.into())
    }

    /// Create a stale navigation error.
    #[must_use]
    pub fn stale_navigation(msg: impl Into<String>) -> Self {
        Self::StaleNavigation(msg.into())
    }

    /// Create an out-of-order error.
    #[must_use]
    pub fn out_of_order(msg: impl Into<String>) -> Self {
        Self::OutOfOrder(msg.into())
    }

    /// Create a config error.
    #[must_use]
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
