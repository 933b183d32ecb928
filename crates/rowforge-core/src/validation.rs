use std::collections::BTreeSet;

use serde::Serialize;

use crate::schema::SchemaGraph;

/// Advisory finding from a schema consistency scan.
///
/// Findings never block a run: resolution treats a dangling foreign key as
/// an unconstrained column.
#[derive(Debug, Clone, Serialize)]
pub struct SchemaWarning {
    pub code: String,
    pub message: String,
}

impl SchemaWarning {
    fn new(code: &str, message: String) -> Self {
        Self {
            code: code.to_string(),
            message,
        }
    }
}

/// Scan a schema graph for referential inconsistencies.
///
/// Checks duplicate column names, primary-key columns that do not exist,
/// foreign-key columns missing from their own table, and dangling
/// foreign-key targets.
pub fn validate_graph(graph: &SchemaGraph) -> Vec<SchemaWarning> {
    let mut warnings = Vec::new();

    for name in graph.table_names().collect::<Vec<_>>() {
        let Some(table) = graph.table(name) else {
            continue;
        };

        let mut seen = BTreeSet::new();
        for column in &table.columns {
            if !seen.insert(column.name.to_lowercase()) {
                warnings.push(SchemaWarning::new(
                    "duplicate_column",
                    format!("duplicate column name: {}.{}", table.name, column.name),
                ));
            }
        }

        for pk_column in &table.primary_key {
            if table.column(pk_column).is_none() {
                warnings.push(SchemaWarning::new(
                    "missing_pk_column",
                    format!(
                        "primary key column not found: {}.{}",
                        table.name, pk_column
                    ),
                ));
            }
        }

        for fk in &table.foreign_keys {
            if table.column(&fk.column).is_none() {
                warnings.push(SchemaWarning::new(
                    "missing_fk_column",
                    format!("foreign key column not found: {}.{}", table.name, fk.column),
                ));
            }
            match graph.table(&fk.referenced_table) {
                None => {
                    warnings.push(SchemaWarning::new(
                        "missing_fk_target",
                        format!(
                            "referenced table not found: {} -> {}",
                            table.name, fk.referenced_table
                        ),
                    ));
                }
                Some(referenced) => {
                    if referenced.column(&fk.referenced_column).is_none() {
                        warnings.push(SchemaWarning::new(
                            "missing_fk_target_column",
                            format!(
                                "referenced column not found: {}.{}",
                                fk.referenced_table, fk.referenced_column
                            ),
                        ));
                    }
                }
            }
        }
    }

    warnings
}
