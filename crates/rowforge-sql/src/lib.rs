//! Best-effort lexical SQL scanning for Rowforge.
//!
//! This is not a SQL parser. Table references are recovered with a regex
//! scan over FROM/JOIN/INTO/UPDATE clauses, and WHERE predicates with a
//! similar scan over the text after the first WHERE keyword. Nested
//! subqueries, CTEs, and dialect extensions are not guaranteed to be
//! recognized. Callers get an explicit error when no tables are found so
//! they can fail fast instead of proceeding with an empty table set.

pub mod extract;
pub mod predicates;

pub use extract::{ExtractError, extract_alias_map, extract_tables, resolve_alias};
pub use predicates::{ColumnPredicate, extract_predicates};
