//! Error types for the catalog client and validation runner.

/// Catalog-level errors.
///
/// Only `Config` and `Auth` abort a whole run; everything else is caught at
/// the per-file task boundary and recorded in that file's report.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Configuration is incomplete (missing credentials etc.).
    #[error("configuration error: {message}")]
    Config { message: String },

    /// Token refresh failed or the credential was rejected.
    #[error("authentication failed: {message}")]
    Auth { message: String },

    /// Network-level failure (connect, timeout, unexpected status).
    #[error("network error: {message}")]
    Network { message: String },

    /// The catalog returned a body we could not interpret.
    #[error("invalid response: {message}")]
    InvalidResponse { message: String },

    /// Local I/O failure during file discovery.
    #[error("i/o error: {message}")]
    Io { message: String },
}

/// Result alias for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

impl From<reqwest::Error> for CatalogError {
    fn from(e: reqwest::Error) -> Self {
        CatalogError::Network {
            message: e.to_string(),
        }
    }
}

impl From<std::io::Error> for CatalogError {
    fn from(e: std::io::Error) -> Self {
        CatalogError::Io {
            message: e.to_string(),
        }
    }
}
