//! Dialect-specific type equivalence, literal formatting, and identifier
//! quoting for Rowforge.
//!
//! Each supported engine implements [`DialectHandler`]; callers resolve a
//! handler through [`Dialect::handler`]. Adding a dialect means adding one
//! implementation plus one registry entry, calling code never changes.

pub mod dialects;
pub mod handler;

pub use dialects::{MySqlDialect, OracleDialect, PostgresDialect, SqlServerDialect, SqliteDialect};
pub use handler::{Dialect, DialectHandler};
