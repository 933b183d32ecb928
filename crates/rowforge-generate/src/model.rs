use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use rowforge_dialect::Dialect;

/// Options for an insertion run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateOptions {
    /// Target dialect for rendered statements.
    pub dialect: Dialect,
    /// Rows to synthesize per table in the closure.
    pub rows_per_table: u64,
    /// Seed for deterministic local value synthesis.
    pub seed: u64,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            dialect: Dialect::Postgres,
            rows_per_table: 1,
            seed: 0,
        }
    }
}

/// Rendered INSERT for one synthesized record. Terminal pipeline artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsertStatement {
    pub table: String,
    pub sql: String,
    /// Execution-order hint: 0 = no FK dependencies, 1 = has FK dependencies.
    pub priority: u8,
}

/// Summary of one generated table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableReport {
    pub table: String,
    pub rows_requested: u64,
    pub rows_generated: u64,
}

/// Structured issue recorded during a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationIssue {
    pub level: String,
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
}

/// Report for an insertion run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationReport {
    pub run_id: String,
    pub dialect: String,
    pub tables: Vec<TableReport>,
    pub statements_total: u64,
    pub fallback_count: u64,
    pub warnings_by_code: BTreeMap<String, u64>,
    pub warnings: Vec<GenerationIssue>,
}

impl GenerationReport {
    pub fn new(run_id: String, dialect: &str) -> Self {
        Self {
            run_id,
            dialect: dialect.to_string(),
            tables: Vec::new(),
            statements_total: 0,
            fallback_count: 0,
            warnings_by_code: BTreeMap::new(),
            warnings: Vec::new(),
        }
    }

    pub fn record_fallback(&mut self) {
        self.fallback_count += 1;
    }

    pub fn record_warning(&mut self, issue: GenerationIssue) {
        *self.warnings_by_code.entry(issue.code.clone()).or_insert(0) += 1;
        self.warnings.push(issue);
    }
}

/// Statements plus the run report.
#[derive(Debug, Clone)]
pub struct GenerationResult {
    pub statements: Vec<InsertStatement>,
    pub report: GenerationReport,
}
