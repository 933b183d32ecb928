use rowforge_core::{
    Category, ColumnConstraint, ColumnSchema, SchemaGraph, looks_boolean, looks_date, looks_json,
};
use rowforge_sql::ColumnPredicate;

/// Hint that a column references another table, either through a declared
/// foreign key or by naming convention.
#[derive(Debug, Clone)]
pub struct RelationshipHint {
    pub table: String,
    pub column: String,
    /// True when backed by an actual foreign key, false for a name-pattern
    /// guess.
    pub declared: bool,
}

/// Per-(table, column) bundle handed to value generation.
///
/// Created on demand per column per table visit; not persisted.
#[derive(Debug, Clone)]
pub struct GenerationContext {
    pub table: String,
    pub column: ColumnSchema,
    pub category: Category,
    pub constraints: Vec<ColumnConstraint>,
    /// WHERE-derived predicates touching this column; all collected, never
    /// merged.
    pub predicates: Vec<ColumnPredicate>,
    pub relationship: Option<RelationshipHint>,
    pub boolean_hint: bool,
    pub json_hint: bool,
    pub date_hint: bool,
}

impl GenerationContext {
    pub fn new(
        table: &str,
        column: &ColumnSchema,
        constraints: Vec<ColumnConstraint>,
        predicates: Vec<ColumnPredicate>,
        graph: &SchemaGraph,
    ) -> Self {
        let relationship = declared_relationship(table, column, graph)
            .or_else(|| inferred_relationship(column, graph));

        Self {
            table: table.to_string(),
            column: column.clone(),
            category: Category::classify(&column.data_type),
            constraints,
            predicates,
            relationship,
            boolean_hint: looks_boolean(column),
            json_hint: looks_json(&column.name),
            date_hint: looks_date(&column.name),
        }
    }

    /// First equality predicate for this column, if any.
    pub fn equality_predicate(&self) -> Option<&ColumnPredicate> {
        self.predicates.iter().find(|p| p.operator == "=")
    }
}

fn declared_relationship(
    table: &str,
    column: &ColumnSchema,
    graph: &SchemaGraph,
) -> Option<RelationshipHint> {
    let schema = graph.table(table)?;
    let fk = schema.foreign_key_for(&column.name)?;
    Some(RelationshipHint {
        table: fk.referenced_table.clone(),
        column: fk.referenced_column.clone(),
        declared: true,
    })
}

/// Name-convention guess: `customer_id` references `customers` (or
/// `customer`) when such a table exists in the graph.
fn inferred_relationship(column: &ColumnSchema, graph: &SchemaGraph) -> Option<RelationshipHint> {
    let name = column.name.to_lowercase();
    let stem = name.strip_suffix("_id")?;
    if stem.is_empty() {
        return None;
    }

    for candidate in [format!("{stem}s"), stem.to_string(), format!("{stem}es")] {
        if let Some(referenced) = graph.table(&candidate) {
            return Some(RelationshipHint {
                table: referenced.name.clone(),
                column: "id".to_string(),
                declared: false,
            });
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use rowforge_core::{ForeignKey, TableSchema};

    fn column(name: &str, data_type: &str) -> ColumnSchema {
        ColumnSchema {
            name: name.to_string(),
            data_type: data_type.to_string(),
            is_nullable: true,
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

    fn graph_with_customers() -> SchemaGraph {
        SchemaGraph::from_tables(vec![
            TableSchema {
                name: "customers".to_string(),
                columns: vec![column("id", "integer")],
                primary_key: vec!["id".to_string()],
                foreign_keys: Vec::new(),
            },
            TableSchema {
                name: "orders".to_string(),
                columns: vec![column("id", "integer"), column("customer_id", "integer")],
                primary_key: vec!["id".to_string()],
                foreign_keys: vec![ForeignKey {
                    name: None,
                    column: "customer_id".to_string(),
                    referenced_table: "customers".to_string(),
                    referenced_column: "id".to_string(),
                }],
            },
        ])
    }

    #[test]
    fn declared_foreign_key_wins_over_name_pattern() {
        let graph = graph_with_customers();
        let col = column("customer_id", "integer");
        let ctx = GenerationContext::new("orders", &col, Vec::new(), Vec::new(), &graph);
        let hint = ctx.relationship.expect("relationship hint");
        assert!(hint.declared);
        assert_eq!(hint.table, "customers");
        assert_eq!(hint.column, "id");
    }

    #[test]
    fn fk_suffix_infers_relationship_without_declared_key() {
        let graph = graph_with_customers();
        let col = column("customer_id", "integer");
        // Column on a table with no declared FK for it.
        let ctx = GenerationContext::new("invoices", &col, Vec::new(), Vec::new(), &graph);
        let hint = ctx.relationship.expect("relationship hint");
        assert!(!hint.declared);
        assert_eq!(hint.table, "customers");
    }

    #[test]
    fn no_matching_table_means_no_hint() {
        let graph = graph_with_customers();
        let col = column("warehouse_id", "integer");
        let ctx = GenerationContext::new("orders", &col, Vec::new(), Vec::new(), &graph);
        assert!(ctx.relationship.is_none());
    }
}
