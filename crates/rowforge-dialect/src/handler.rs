use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use rowforge_core::{
    Category, try_parse_boolean, try_parse_datetime, try_parse_decimal, try_parse_integer,
};

use crate::dialects::{
    MySqlDialect, OracleDialect, PostgresDialect, SqlServerDialect, SqliteDialect,
};

/// Supported target engines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dialect {
    Postgres,
    MySql,
    SqlServer,
    Oracle,
    Sqlite,
}

static POSTGRES: PostgresDialect = PostgresDialect;
static MYSQL: MySqlDialect = MySqlDialect;
static SQLSERVER: SqlServerDialect = SqlServerDialect;
static ORACLE: OracleDialect = OracleDialect;
static SQLITE: SqliteDialect = SqliteDialect;

impl Dialect {
    /// Resolve the handler for this dialect.
    pub fn handler(self) -> &'static dyn DialectHandler {
        match self {
            Dialect::Postgres => &POSTGRES,
            Dialect::MySql => &MYSQL,
            Dialect::SqlServer => &SQLSERVER,
            Dialect::Oracle => &ORACLE,
            Dialect::Sqlite => &SQLITE,
        }
    }

    pub fn from_name(name: &str) -> Option<Dialect> {
        match name.trim().to_lowercase().as_str() {
            "postgres" | "postgresql" | "pg" => Some(Dialect::Postgres),
            "mysql" | "mariadb" => Some(Dialect::MySql),
            "sqlserver" | "mssql" => Some(Dialect::SqlServer),
            "oracle" => Some(Dialect::Oracle),
            "sqlite" | "sqlite3" => Some(Dialect::Sqlite),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Dialect::Postgres => "postgres",
            Dialect::MySql => "mysql",
            Dialect::SqlServer => "sqlserver",
            Dialect::Oracle => "oracle",
            Dialect::Sqlite => "sqlite",
        }
    }
}

/// Per-engine behavior: declared-type equivalence, literal rendering,
/// identifier quoting, and the syntax idioms downstream consumers need.
///
/// No method errors or panics; unrecognized input degrades to the generic
/// text-equivalent type or the NULL literal.
pub trait DialectHandler: Send + Sync {
    fn dialect(&self) -> Dialect;

    /// Equivalent declared type for a semantic category.
    ///
    /// `raw` is the source type name, consulted for width hints (bigint vs
    /// int, bounded varchar vs CLOB/TEXT).
    fn equivalent_type(&self, category: Category, raw: &str) -> String;

    fn boolean_literal(&self, value: bool) -> &'static str;

    fn null_literal(&self) -> &'static str {
        "NULL"
    }

    /// Render a parsed timestamp with this dialect's literal wrapper.
    fn datetime_literal(&self, value: NaiveDateTime, date_only: bool) -> String;

    /// Reserved words that force identifier quoting.
    fn reserved_words(&self) -> &'static [&'static str];

    /// Opening and closing identifier quote characters.
    fn identifier_quotes(&self) -> (char, char);

    /// Engines that fold unquoted identifiers require quoting to preserve
    /// mixed case.
    fn folds_unquoted_identifiers(&self) -> bool {
        false
    }

    fn statement_terminator(&self) -> &'static str {
        ";"
    }

    /// Pagination clause for downstream consumers.
    fn pagination(&self, limit: u64, offset: u64) -> String;

    /// Auto-increment / identity idiom for downstream consumers.
    fn auto_increment_idiom(&self) -> &'static str;

    /// Whether identity columns must receive explicit values in INSERTs.
    fn requires_explicit_identity_values(&self) -> bool {
        false
    }

    /// Wrap an identifier in the dialect's quoting character when required.
    ///
    /// Quoting is forced by the reserved-word set, by structural checks
    /// (non-word characters, leading digit), and for folding dialects by
    /// mixed case. Everything else passes through unchanged.
    fn quote_identifier(&self, ident: &str) -> String {
        let trimmed = ident.trim();
        if trimmed.is_empty() {
            return ident.to_string();
        }

        let reserved = self
            .reserved_words()
            .contains(&trimmed.to_lowercase().as_str());
        let leading_digit = trimmed
            .chars()
            .next()
            .map(|c| c.is_ascii_digit())
            .unwrap_or(false);
        let structural = !trimmed
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_');
        let mixed_case = self.folds_unquoted_identifiers()
            && trimmed.chars().any(|c| c.is_ascii_uppercase())
            && trimmed.chars().any(|c| c.is_ascii_lowercase());

        if !(reserved || leading_digit || structural || mixed_case) {
            return trimmed.to_string();
        }

        let (open, close) = self.identifier_quotes();
        let escaped: String = trimmed
            .chars()
            .flat_map(|c| {
                if c == close {
                    vec![close, close]
                } else {
                    vec![c]
                }
            })
            .collect();
        format!("{open}{escaped}{close}")
    }

    /// Render a raw value as a SQL literal for `declared_type`.
    ///
    /// Empty or NULL-sentinel input always yields the NULL literal. Numeric
    /// and temporal input that fails to parse also yields the NULL literal:
    /// an invalid literal is never emitted. Ambiguous boolean input renders
    /// as the dialect's false representation.
    fn format_literal(&self, value: &str, declared_type: &str) -> String {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("null") {
            return self.null_literal().to_string();
        }

        match Category::classify(declared_type) {
            Category::Integer => try_parse_integer(trimmed)
                .map(|v| v.to_string())
                .or_else(|| try_parse_decimal(trimmed).map(|v| (v.round() as i64).to_string()))
                .unwrap_or_else(|| self.null_literal().to_string()),
            Category::Decimal => try_parse_decimal(trimmed)
                .map(|v| v.to_string())
                .unwrap_or_else(|| self.null_literal().to_string()),
            Category::Boolean => {
                let flag = try_parse_boolean(trimmed).unwrap_or(false);
                self.boolean_literal(flag).to_string()
            }
            Category::DateTime => {
                let date_only = is_date_only(declared_type);
                try_parse_datetime(strip_outer_quotes(trimmed))
                    .map(|dt| self.datetime_literal(dt, date_only))
                    .unwrap_or_else(|| self.null_literal().to_string())
            }
            _ => quote_string(strip_outer_quotes(trimmed)),
        }
    }
}

fn is_date_only(declared_type: &str) -> bool {
    let normalized = declared_type.trim().to_lowercase();
    normalized.split('(').next().unwrap_or(&normalized).trim() == "date"
}

/// Single-quote a string value, doubling embedded quotes.
pub(crate) fn quote_string(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

fn strip_outer_quotes(value: &str) -> &str {
    let stripped = value
        .strip_prefix('\'')
        .and_then(|rest| rest.strip_suffix('\''));
    stripped.unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_resolves_every_dialect() {
        for dialect in [
            Dialect::Postgres,
            Dialect::MySql,
            Dialect::SqlServer,
            Dialect::Oracle,
            Dialect::Sqlite,
        ] {
            assert_eq!(dialect.handler().dialect(), dialect);
        }
    }

    #[test]
    fn dialect_names_round_trip() {
        assert_eq!(Dialect::from_name("Postgres"), Some(Dialect::Postgres));
        assert_eq!(Dialect::from_name("mssql"), Some(Dialect::SqlServer));
        assert_eq!(Dialect::from_name("mariadb"), Some(Dialect::MySql));
        assert_eq!(Dialect::from_name("db2"), None);
    }

    #[test]
    fn empty_and_null_input_always_render_null() {
        let handler = Dialect::Postgres.handler();
        assert_eq!(handler.format_literal("", "integer"), "NULL");
        assert_eq!(handler.format_literal("  ", "varchar"), "NULL");
        assert_eq!(handler.format_literal("null", "date"), "NULL");
        assert_eq!(handler.format_literal("NULL", "boolean"), "NULL");
    }

    #[test]
    fn invalid_numerics_never_leak_into_literals() {
        let handler = Dialect::MySql.handler();
        assert_eq!(handler.format_literal("not-a-number", "integer"), "NULL");
        assert_eq!(handler.format_literal("12abc", "decimal"), "NULL");
        assert_eq!(handler.format_literal("1,234", "integer"), "1234");
        assert_eq!(handler.format_literal("19.99", "decimal"), "19.99");
    }

    #[test]
    fn string_literals_escape_embedded_quotes() {
        let handler = Dialect::Postgres.handler();
        let literal = handler.format_literal("O'Brien", "varchar");
        assert_eq!(literal, "'O''Brien'");

        // Round-trip: the dialect's own unescape recovers the original.
        let inner = literal.trim_matches('\'').replace("''", "'");
        assert_eq!(inner, "O'Brien");
    }

    #[test]
    fn pre_quoted_values_are_not_double_quoted() {
        let handler = Dialect::Sqlite.handler();
        assert_eq!(handler.format_literal("'open'", "text"), "'open'");
    }
}
