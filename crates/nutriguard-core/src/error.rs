//! Error types for NutriGuard

/// Result type alias using NutriGuard's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for NutriGuard operations
///
/// The classifiers themselves never produce errors. These variants belong
/// to the collaborators around them: the product source, the preference
/// store and configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// Product source errors (HTTP transport, unexpected responses)
    #[error("product source error: {0}")]
    Source(String),

    /// Preference store errors
    #[error("preference store error: {0}")]
    Store(String),

    /// Network/IO errors
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new product source error
    pub fn source(msg: impl Into<String>) -> Self {
        Self::Source(msg.into())
    }

    /// Create a new preference store error
    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }
}
