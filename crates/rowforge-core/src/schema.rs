use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Top-level schema snapshot consumed by the generation pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SchemaArtifact {
    /// Contract version for this schema format.
    pub schema_version: String,
    /// Database engine identifier (e.g. `postgres`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engine: Option<String>,
    /// Database name when available.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
    /// Tables captured from the database.
    pub tables: Vec<TableSchema>,
}

/// A table with its columns, primary key, and foreign keys.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TableSchema {
    pub name: String,
    pub columns: Vec<ColumnSchema>,
    /// Primary key column names preserving declaration order.
    #[serde(default)]
    pub primary_key: Vec<String>,
    #[serde(default)]
    pub foreign_keys: Vec<ForeignKey>,
}

impl TableSchema {
    /// Case-insensitive column lookup.
    pub fn column(&self, name: &str) -> Option<&ColumnSchema> {
        self.columns
            .iter()
            .find(|column| column.name.eq_ignore_ascii_case(name))
    }

    pub fn has_foreign_keys(&self) -> bool {
        !self.foreign_keys.is_empty()
    }

    /// Foreign key owning `column`, if any.
    pub fn foreign_key_for(&self, column: &str) -> Option<&ForeignKey> {
        self.foreign_keys
            .iter()
            .find(|fk| fk.column.eq_ignore_ascii_case(column))
    }
}

/// Column metadata for a table.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ColumnSchema {
    pub name: String,
    /// Raw type name as reported by the source engine (e.g. `varchar(255)`).
    pub data_type: String,
    pub is_nullable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub numeric_precision: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub numeric_scale: Option<u32>,
    #[serde(default)]
    pub is_primary_key: bool,
    /// Identity columns are skipped unless the dialect requires explicit values.
    #[serde(default)]
    pub is_identity: bool,
    /// Generated columns never receive explicit values.
    #[serde(default)]
    pub is_generated: bool,
    /// Closed value domain for enum-typed columns, in declaration order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

/// Single-column foreign key reference.
///
/// A referenced table absent from the graph leaves the owning column
/// unconstrained; it is never a hard failure.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ForeignKey {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub column: String,
    pub referenced_table: String,
    pub referenced_column: String,
}

/// Case-insensitive table catalog, built once per generation run and
/// read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct SchemaGraph {
    tables: BTreeMap<String, TableSchema>,
}

impl SchemaGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_tables(tables: impl IntoIterator<Item = TableSchema>) -> Self {
        let mut graph = Self::new();
        for table in tables {
            graph.insert_table(table);
        }
        graph
    }

    pub fn from_artifact(artifact: SchemaArtifact) -> Self {
        Self::from_tables(artifact.tables)
    }

    /// Insert a table, replacing any table with the same case-insensitive name.
    pub fn insert_table(&mut self, table: TableSchema) {
        self.tables.insert(table.name.to_lowercase(), table);
    }

    /// Case-insensitive table lookup.
    pub fn table(&self, name: &str) -> Option<&TableSchema> {
        self.tables.get(&name.trim().to_lowercase())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tables.contains_key(&name.trim().to_lowercase())
    }

    /// Table names in deterministic order.
    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.values().map(|table| table.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
