use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{info, warn};
use uuid::Uuid;

use rowforge_core::{ColumnSchema, SchemaGraph, TableSchema, extract_constraints, resolve};
use rowforge_dialect::DialectHandler;
use rowforge_sql::{
    ColumnPredicate, extract_alias_map, extract_predicates, extract_tables, resolve_alias,
};

use crate::context::GenerationContext;
use crate::errors::GenerationError;
use crate::generator::{CoercedValue, ValueGenerator, coerce_generated, local_value};
use crate::model::{
    GenerateOptions, GenerationIssue, GenerationReport, GenerationResult, InsertStatement,
    TableReport,
};

/// Cooperative cancellation flag, checked between table iterations and
/// between per-record value acquisitions. A cancelled record never yields a
/// partial statement.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Drives the end-to-end flow: extract tables, resolve the FK closure,
/// order it, then per table acquire values and render INSERT statements.
///
/// Tables are processed parents-first so that by the time a child table is
/// generated, the parent rows it references already exist among previously
/// emitted statements. The engine never executes SQL; the order is a
/// contract for a downstream executor.
pub struct InsertionEngine {
    options: GenerateOptions,
    generator: Option<Box<dyn ValueGenerator>>,
    cancel: CancellationToken,
}

impl InsertionEngine {
    pub fn new(options: GenerateOptions) -> Self {
        Self {
            options,
            generator: None,
            cancel: CancellationToken::new(),
        }
    }

    /// Attach an external value-generation collaborator.
    pub fn with_generator(mut self, generator: Box<dyn ValueGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    /// Token callers can use to cancel the run cooperatively.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn run(
        &self,
        query: &str,
        graph: &SchemaGraph,
    ) -> Result<GenerationResult, GenerationError> {
        let run_id = Uuid::new_v4().to_string();
        let handler = self.options.dialect.handler();
        let mut report = GenerationReport::new(run_id.clone(), self.options.dialect.name());

        // The only fatal stage: a query with no recognizable tables.
        let seed_tables = extract_tables(query)?;
        let aliases = extract_alias_map(query);
        let predicates = extract_predicates(query);

        let closure = resolve(&seed_tables, graph);
        if !closure.cycle_members.is_empty() {
            record_warning(
                &mut report,
                issue(
                    "fk_cycle",
                    format!(
                        "cyclic foreign keys; back edges ignored for: {}",
                        closure.cycle_members.join(", ")
                    ),
                    None,
                    None,
                ),
            );
        }

        info!(
            run_id = %run_id,
            dialect = self.options.dialect.name(),
            seed_tables = seed_tables.len(),
            closure = closure.insertion_order.len(),
            "generation started"
        );

        let rows = self.options.rows_per_table;
        let mut statements: Vec<InsertStatement> = Vec::new();
        let mut emitted: HashMap<String, Vec<BTreeMap<String, String>>> = HashMap::new();
        let mut cancelled = false;

        for table_name in &closure.insertion_order {
            if self.cancel.is_cancelled() {
                cancelled = true;
                break;
            }

            let Some(table) = graph.table(table_name) else {
                record_warning(
                    &mut report,
                    issue(
                        "unknown_table",
                        format!("table '{table_name}' not found in schema"),
                        Some(table_name.clone()),
                        None,
                    ),
                );
                continue;
            };

            let constraints = extract_constraints(table);
            let table_predicates =
                predicates_for_table(table, &predicates, &aliases, &seed_tables);

            let insert_columns: Vec<&ColumnSchema> = table
                .columns
                .iter()
                .filter(|column| !column.is_generated)
                .filter(|column| {
                    !column.is_identity || handler.requires_explicit_identity_values()
                })
                .collect();

            if insert_columns.is_empty() {
                record_warning(
                    &mut report,
                    issue(
                        "no_insertable_columns",
                        format!("table '{}' has no insertable columns", table.name),
                        Some(table.name.clone()),
                        None,
                    ),
                );
                continue;
            }

            let contexts: Vec<GenerationContext> = insert_columns
                .iter()
                .map(|column| {
                    GenerationContext::new(
                        &table.name,
                        column,
                        constraints
                            .get(&column.name.to_lowercase())
                            .cloned()
                            .unwrap_or_default(),
                        column_predicates(&table_predicates, &column.name),
                        graph,
                    )
                })
                .collect();

            let priority = if table.has_foreign_keys() { 1 } else { 0 };
            let mut table_rows: Vec<BTreeMap<String, String>> = Vec::new();

            for record_index in 0..rows {
                if self.cancel.is_cancelled() {
                    cancelled = true;
                    break;
                }

                let mut raw_row: BTreeMap<String, String> = BTreeMap::new();
                for ctx in &contexts {
                    let value = self.acquire_value(table, ctx, record_index, &emitted, &mut report);
                    raw_row.insert(ctx.column.name.to_lowercase(), value);
                }

                // Identity columns are skipped in the INSERT but children
                // still need their values for FK linkage; the database is
                // assumed to assign them sequentially from 1.
                for column in &table.columns {
                    if column.is_identity && !handler.requires_explicit_identity_values() {
                        raw_row.insert(column.name.to_lowercase(), (record_index + 1).to_string());
                    }
                }

                let sql = render_insert(handler, table, &contexts, &raw_row);
                statements.push(InsertStatement {
                    table: table.name.clone(),
                    sql,
                    priority,
                });
                table_rows.push(raw_row);
            }

            report.tables.push(TableReport {
                table: table.name.clone(),
                rows_requested: rows,
                rows_generated: table_rows.len() as u64,
            });
            info!(table = %table.name, rows = table_rows.len(), "table generated");
            emitted.insert(table_name.clone(), table_rows);

            if cancelled {
                break;
            }
        }

        if cancelled {
            record_warning(
                &mut report,
                issue(
                    "cancelled",
                    "run cancelled; statements for completed records retained".to_string(),
                    None,
                    None,
                ),
            );
        }

        report.statements_total = statements.len() as u64;
        info!(
            run_id = %run_id,
            statements = report.statements_total,
            fallbacks = report.fallback_count,
            "generation completed"
        );

        Ok(GenerationResult { statements, report })
    }

    fn acquire_value(
        &self,
        table: &TableSchema,
        ctx: &GenerationContext,
        record_index: u64,
        emitted: &HashMap<String, Vec<BTreeMap<String, String>>>,
        report: &mut GenerationReport,
    ) -> String {
        // Declared FK columns sample from parent rows emitted earlier in the
        // run; a dangling target leaves the column unconstrained.
        if let Some(hint) = &ctx.relationship {
            if hint.declared {
                if let Some(parent_rows) = emitted.get(&hint.table.to_lowercase()) {
                    if !parent_rows.is_empty() {
                        let row = &parent_rows[(record_index as usize) % parent_rows.len()];
                        if let Some(value) = row.get(&hint.column.to_lowercase()) {
                            return value.clone();
                        }
                    }
                }
            }
        }

        if let Some(generator) = &self.generator {
            if let Some(value) = generator.generate(ctx, record_index) {
                return match coerce_generated(&value, ctx.category) {
                    CoercedValue::Parsed(value) => value,
                    CoercedValue::HashFallback(fallback) => {
                        report.record_fallback();
                        record_warning(
                            report,
                            issue(
                                "unusable_generated_value",
                                format!(
                                    "generated value for '{}.{}' did not parse; hash fallback used",
                                    table.name, ctx.column.name
                                ),
                                Some(table.name.clone()),
                                Some(ctx.column.name.clone()),
                            ),
                        );
                        fallback
                    }
                };
            }
            report.record_fallback();
        }

        local_value(ctx, record_index, self.options.seed)
    }
}

fn render_insert(
    handler: &dyn DialectHandler,
    table: &TableSchema,
    contexts: &[GenerationContext],
    raw_row: &BTreeMap<String, String>,
) -> String {
    let mut columns = Vec::with_capacity(contexts.len());
    let mut values = Vec::with_capacity(contexts.len());
    for ctx in contexts {
        let raw = raw_row
            .get(&ctx.column.name.to_lowercase())
            .cloned()
            .unwrap_or_default();
        columns.push(handler.quote_identifier(&ctx.column.name));
        values.push(handler.format_literal(&raw, &ctx.column.data_type));
    }

    format!(
        "INSERT INTO {} ({}) VALUES ({}){}",
        handler.quote_identifier(&table.name),
        columns.join(", "),
        values.join(", "),
        handler.statement_terminator()
    )
}

fn predicates_for_table(
    table: &TableSchema,
    predicates: &[ColumnPredicate],
    aliases: &BTreeMap<String, String>,
    seed_tables: &[String],
) -> Vec<ColumnPredicate> {
    predicates
        .iter()
        .filter(|predicate| match &predicate.qualifier {
            Some(qualifier) => {
                let resolved = aliases
                    .get(qualifier)
                    .cloned()
                    .or_else(|| {
                        aliases
                            .iter()
                            .find(|(alias, _)| alias.eq_ignore_ascii_case(qualifier))
                            .map(|(_, bound)| bound.clone())
                    })
                    .or_else(|| resolve_alias(qualifier, seed_tables));
                resolved
                    .map(|name| name.eq_ignore_ascii_case(&table.name))
                    .unwrap_or(false)
            }
            None => table.column(&predicate.column).is_some(),
        })
        .cloned()
        .collect()
}

fn column_predicates(table_predicates: &[ColumnPredicate], column: &str) -> Vec<ColumnPredicate> {
    table_predicates
        .iter()
        .filter(|predicate| predicate.column.eq_ignore_ascii_case(column))
        .cloned()
        .collect()
}

fn issue(
    code: &str,
    message: String,
    table: Option<String>,
    column: Option<String>,
) -> GenerationIssue {
    GenerationIssue {
        level: "warning".to_string(),
        code: code.to_string(),
        message,
        table,
        column,
    }
}

fn record_warning(report: &mut GenerationReport, issue: GenerationIssue) {
    warn!(
        code = %issue.code,
        table = issue.table.as_deref().unwrap_or(""),
        column = issue.column.as_deref().unwrap_or(""),
        message = %issue.message
    );
    report.record_warning(issue);
}
