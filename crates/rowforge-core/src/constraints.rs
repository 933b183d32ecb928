use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::schema::TableSchema;

/// Declarative per-column constraint handed to value generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColumnConstraint {
    /// Maximum character length.
    Length { max: u32 },
    /// The column rejects NULL.
    NotNull,
    /// Closed value domain, in declaration order.
    Enum { values: Vec<String> },
}

/// Extract declarative constraints for every column of `table`.
///
/// Generated columns are included; excluding them from INSERTs is the
/// orchestrator's job, the constraints themselves are informational.
pub fn extract_constraints(table: &TableSchema) -> BTreeMap<String, Vec<ColumnConstraint>> {
    let mut constraints = BTreeMap::new();

    for column in &table.columns {
        let mut list = Vec::new();
        if let Some(max) = column.max_length {
            list.push(ColumnConstraint::Length { max });
        }
        if !column.is_nullable {
            list.push(ColumnConstraint::NotNull);
        }
        if !column.enum_values.is_empty() {
            list.push(ColumnConstraint::Enum {
                values: column.enum_values.clone(),
            });
        }
        constraints.insert(column.name.to_lowercase(), list);
    }

    constraints
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ColumnSchema;

    fn column(name: &str, data_type: &str, is_nullable: bool) -> ColumnSchema {
        ColumnSchema {
            name: name.to_string(),
            data_type: data_type.to_string(),
            is_nullable,
            max_length: None,
            numeric_precision: None,
            numeric_scale: None,
            is_primary_key: false,
            is_identity: false,
            is_generated: false,
            enum_values: Vec::new(),
            default: None,
        }
    }

    #[test]
    fn emits_length_not_null_and_enum() {
        let mut email = column("email", "varchar", false);
        email.max_length = Some(120);
        let mut status = column("status", "enum('open','closed')", true);
        status.enum_values = vec!["open".to_string(), "closed".to_string()];
        let note = column("note", "text", true);

        let table = TableSchema {
            name: "tickets".to_string(),
            columns: vec![email, status, note],
            primary_key: Vec::new(),
            foreign_keys: Vec::new(),
        };

        let constraints = extract_constraints(&table);
        assert_eq!(
            constraints["email"],
            vec![
                ColumnConstraint::Length { max: 120 },
                ColumnConstraint::NotNull
            ]
        );
        assert_eq!(
            constraints["status"],
            vec![ColumnConstraint::Enum {
                values: vec!["open".to_string(), "closed".to_string()]
            }]
        );
        assert!(constraints["note"].is_empty());
    }

    #[test]
    fn generated_columns_still_carry_constraints() {
        let mut total = column("total", "numeric", false);
        total.is_generated = true;

        let table = TableSchema {
            name: "orders".to_string(),
            columns: vec![total],
            primary_key: Vec::new(),
            foreign_keys: Vec::new(),
        };

        let constraints = extract_constraints(&table);
        assert_eq!(constraints["total"], vec![ColumnConstraint::NotNull]);
    }
}
