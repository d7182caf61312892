//! Common error types used throughout shoptrack.
//!
//! Covers the failure classes of the tracker: missing records, rejected
//! input, storage and quota failures, malformed documents, and image
//! processing errors.

/// Common error type for shoptrack.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The requested record was not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid input was provided.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The underlying key-value store failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// A write would push the store past its byte quota.
    #[error("Storage quota exceeded: {needed} bytes needed, limit is {limit} bytes")]
    QuotaExceeded {
        /// Total bytes the store would hold after the write.
        needed: u64,
        /// Configured quota in bytes.
        limit: u64,
    },

    /// A JSON document could not be parsed into the expected shape.
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// An image could not be validated, decoded, or encoded.
    #[error("Image error: {0}")]
    Image(String),

    /// An I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a new NotFound error.
    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a new InvalidInput error.
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a new Storage error.
    pub fn storage<S: Into<String>>(msg: S) -> Self {
        Self::Storage(msg.into())
    }

    /// Create a new Image error.
    pub fn image<S: Into<String>>(msg: S) -> Self {
        Self::Image(msg.into())
    }

    /// Whether this error is the store rejecting a write for lack of space.
    pub fn is_quota_exceeded(&self) -> bool {
        matches!(self, Self::QuotaExceeded { .. })
    }
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
