//! Core contracts and helpers for Rowforge.
//!
//! This crate defines the canonical schema types, the type classifier, the
//! value parser, constraint extraction, and FK dependency resolution shared
//! across the SQL, dialect, and generation crates.

pub mod constraints;
pub mod error;
pub mod graph;
pub mod schema;
pub mod types;
pub mod validation;
pub mod value;

pub use constraints::{ColumnConstraint, extract_constraints};
pub use error::{Error, Result};
pub use graph::{DependencyClosure, insertion_order, resolve, resolve_closure};
pub use schema::{ColumnSchema, ForeignKey, SchemaArtifact, SchemaGraph, TableSchema};
pub use types::{Category, is_large_text, looks_boolean, looks_date, looks_json};
pub use validation::{SchemaWarning, validate_graph};
pub use value::{
    ScalarValue, generate_from_hash, is_valid_calendar_date, parse_best_effort,
    try_parse_boolean, try_parse_datetime, try_parse_decimal, try_parse_integer,
};

/// Current schema contract version for schema artifacts.
pub const SCHEMA_VERSION: &str = "0.1";
