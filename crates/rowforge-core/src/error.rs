use thiserror::Error;

/// Core error type shared across Rowforge crates.
#[derive(Debug, Error)]
pub enum Error {
    /// The schema artifact violates internal invariants.
    #[error("invalid schema: {0}")]
    InvalidSchema(String),
    /// A requested feature is not yet supported.
    #[error("unsupported: {0}")]
    Unsupported(String),
    /// Catch-all error for unexpected failures.
    #[error("other error: {0}")]
    Other(String),
}

/// Convenience alias for results returned by Rowforge crates.
pub type Result<T> = std::result::Result<T, Error>;
