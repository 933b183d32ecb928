use thiserror::Error;

use rowforge_sql::ExtractError;

/// Errors emitted by the insertion engine.
///
/// Only structural failures surface here; unparsable values, missing FK
/// metadata, and cycles degrade locally and are recorded as report warnings.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// The query could not be analyzed for target tables.
    #[error("extraction failed: {0}")]
    Extraction(#[from] ExtractError),
    /// The schema graph violates an invariant the engine cannot work around.
    #[error("invalid schema: {0}")]
    InvalidSchema(String),
    /// A requested feature is not supported.
    #[error("unsupported feature: {0}")]
    Unsupported(String),
}
