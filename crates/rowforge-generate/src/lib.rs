//! Insertion orchestration for Rowforge.
//!
//! The engine takes a query and a schema graph, resolves the FK closure and
//! a parents-first order, acquires values per column (from an external
//! [`ValueGenerator`] when present, locally otherwise), and renders one
//! INSERT statement per synthesized record through the target dialect.

pub mod context;
pub mod engine;
pub mod errors;
pub mod generator;
pub mod model;

pub use context::{GenerationContext, RelationshipHint};
pub use engine::{CancellationToken, InsertionEngine};
pub use errors::GenerationError;
pub use generator::ValueGenerator;
pub use model::{
    GenerateOptions, GenerationIssue, GenerationReport, GenerationResult, InsertStatement,
    TableReport,
};
