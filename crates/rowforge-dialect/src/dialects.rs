use chrono::NaiveDateTime;

use rowforge_core::{Category, is_large_text};

use crate::handler::{Dialect, DialectHandler};

/// Reserved words shared by every supported engine.
const COMMON_RESERVED: &[&str] = &[
    "select", "insert", "update", "delete", "from", "where", "join", "inner", "left", "right",
    "full", "outer", "cross", "on", "and", "or", "not", "in", "is", "null", "group", "order",
    "by", "having", "union", "all", "distinct", "as", "case", "when", "then", "else", "end",
    "between", "like", "exists", "table", "index", "view", "into", "values", "set", "create",
    "drop", "alter", "primary", "foreign", "key", "references", "constraint", "default",
    "unique", "check", "user", "grant",
];

fn raw_is(raw: &str, fragment: &str) -> bool {
    raw.trim().to_lowercase().contains(fragment)
}

fn quoted_iso(value: NaiveDateTime, date_only: bool) -> String {
    if date_only {
        format!("'{}'", value.format("%Y-%m-%d"))
    } else {
        format!("'{}'", value.format("%Y-%m-%d %H:%M:%S"))
    }
}

/// PostgreSQL.
pub struct PostgresDialect;

impl DialectHandler for PostgresDialect {
    fn dialect(&self) -> Dialect {
        Dialect::Postgres
    }

    fn equivalent_type(&self, category: Category, raw: &str) -> String {
        match category {
            Category::Integer if raw_is(raw, "big") => "BIGINT".to_string(),
            Category::Integer if raw_is(raw, "small") || raw_is(raw, "tiny") => {
                "SMALLINT".to_string()
            }
            Category::Integer => "INTEGER".to_string(),
            Category::Decimal => "NUMERIC".to_string(),
            Category::Text if is_large_text(raw) => "TEXT".to_string(),
            Category::Text => "VARCHAR(255)".to_string(),
            Category::DateTime if date_like(raw) => "DATE".to_string(),
            Category::DateTime if time_like(raw) => "TIME".to_string(),
            Category::DateTime => "TIMESTAMP".to_string(),
            Category::Boolean => "BOOLEAN".to_string(),
            Category::Json => "JSONB".to_string(),
            Category::Binary => "BYTEA".to_string(),
            Category::Enum | Category::Unknown => "TEXT".to_string(),
        }
    }

    fn boolean_literal(&self, value: bool) -> &'static str {
        if value { "TRUE" } else { "FALSE" }
    }

    fn datetime_literal(&self, value: NaiveDateTime, date_only: bool) -> String {
        quoted_iso(value, date_only)
    }

    fn reserved_words(&self) -> &'static [&'static str] {
        COMMON_RESERVED
    }

    fn identifier_quotes(&self) -> (char, char) {
        ('"', '"')
    }

    fn folds_unquoted_identifiers(&self) -> bool {
        true
    }

    fn pagination(&self, limit: u64, offset: u64) -> String {
        format!("LIMIT {limit} OFFSET {offset}")
    }

    fn auto_increment_idiom(&self) -> &'static str {
        "GENERATED BY DEFAULT AS IDENTITY"
    }
}

/// MySQL / MariaDB.
pub struct MySqlDialect;

impl DialectHandler for MySqlDialect {
    fn dialect(&self) -> Dialect {
        Dialect::MySql
    }

    fn equivalent_type(&self, category: Category, raw: &str) -> String {
        match category {
            Category::Integer if raw_is(raw, "big") => "BIGINT".to_string(),
            Category::Integer if raw_is(raw, "small") => "SMALLINT".to_string(),
            Category::Integer if raw_is(raw, "tiny") => "TINYINT".to_string(),
            Category::Integer => "INT".to_string(),
            Category::Decimal => "DECIMAL(18,4)".to_string(),
            Category::Text if is_large_text(raw) => "LONGTEXT".to_string(),
            Category::Text => "VARCHAR(255)".to_string(),
            Category::DateTime if date_like(raw) => "DATE".to_string(),
            Category::DateTime if time_like(raw) => "TIME".to_string(),
            Category::DateTime => "DATETIME".to_string(),
            Category::Boolean => "TINYINT(1)".to_string(),
            Category::Json => "JSON".to_string(),
            Category::Binary => "BLOB".to_string(),
            Category::Enum => "VARCHAR(255)".to_string(),
            Category::Unknown => "TEXT".to_string(),
        }
    }

    fn boolean_literal(&self, value: bool) -> &'static str {
        if value { "1" } else { "0" }
    }

    fn datetime_literal(&self, value: NaiveDateTime, date_only: bool) -> String {
        quoted_iso(value, date_only)
    }

    fn reserved_words(&self) -> &'static [&'static str] {
        MYSQL_RESERVED
    }

    fn identifier_quotes(&self) -> (char, char) {
        ('`', '`')
    }

    fn pagination(&self, limit: u64, offset: u64) -> String {
        format!("LIMIT {limit} OFFSET {offset}")
    }

    fn auto_increment_idiom(&self) -> &'static str {
        "AUTO_INCREMENT"
    }
}

const MYSQL_RESERVED: &[&str] = &[
    "select", "insert", "update", "delete", "from", "where", "join", "inner", "left", "right",
    "full", "outer", "cross", "on", "and", "or", "not", "in", "is", "null", "group", "order",
    "by", "having", "union", "all", "distinct", "as", "case", "when", "then", "else", "end",
    "between", "like", "exists", "table", "index", "view", "into", "values", "set", "create",
    "drop", "alter", "primary", "foreign", "key", "references", "constraint", "default",
    "unique", "check", "user", "grant", "limit", "offset", "interval", "rank", "groups",
];

/// Microsoft SQL Server.
pub struct SqlServerDialect;

impl DialectHandler for SqlServerDialect {
    fn dialect(&self) -> Dialect {
        Dialect::SqlServer
    }

    fn equivalent_type(&self, category: Category, raw: &str) -> String {
        match category {
            Category::Integer if raw_is(raw, "big") => "BIGINT".to_string(),
            Category::Integer if raw_is(raw, "small") || raw_is(raw, "tiny") => {
                "SMALLINT".to_string()
            }
            Category::Integer => "INT".to_string(),
            Category::Decimal => "DECIMAL(18,4)".to_string(),
            Category::Text if is_large_text(raw) => "NVARCHAR(MAX)".to_string(),
            Category::Text => "NVARCHAR(255)".to_string(),
            Category::DateTime if date_like(raw) => "DATE".to_string(),
            Category::DateTime if time_like(raw) => "TIME".to_string(),
            Category::DateTime => "DATETIME2".to_string(),
            Category::Boolean => "BIT".to_string(),
            Category::Json => "NVARCHAR(MAX)".to_string(),
            Category::Binary => "VARBINARY(MAX)".to_string(),
            Category::Enum | Category::Unknown => "NVARCHAR(255)".to_string(),
        }
    }

    fn boolean_literal(&self, value: bool) -> &'static str {
        if value { "1" } else { "0" }
    }

    fn datetime_literal(&self, value: NaiveDateTime, date_only: bool) -> String {
        quoted_iso(value, date_only)
    }

    fn reserved_words(&self) -> &'static [&'static str] {
        SQLSERVER_RESERVED
    }

    fn identifier_quotes(&self) -> (char, char) {
        ('[', ']')
    }

    fn pagination(&self, limit: u64, offset: u64) -> String {
        format!("OFFSET {offset} ROWS FETCH NEXT {limit} ROWS ONLY")
    }

    fn auto_increment_idiom(&self) -> &'static str {
        "IDENTITY(1,1)"
    }
}

const SQLSERVER_RESERVED: &[&str] = &[
    "select", "insert", "update", "delete", "from", "where", "join", "inner", "left", "right",
    "full", "outer", "cross", "on", "and", "or", "not", "in", "is", "null", "group", "order",
    "by", "having", "union", "all", "distinct", "as", "case", "when", "then", "else", "end",
    "between", "like", "exists", "table", "index", "view", "into", "values", "set", "create",
    "drop", "alter", "primary", "foreign", "key", "references", "constraint", "default",
    "unique", "check", "user", "grant", "top", "identity", "merge", "percent", "pivot",
];

/// Oracle Database.
pub struct OracleDialect;

impl DialectHandler for OracleDialect {
    fn dialect(&self) -> Dialect {
        Dialect::Oracle
    }

    fn equivalent_type(&self, category: Category, raw: &str) -> String {
        match category {
            Category::Integer if raw_is(raw, "big") => "NUMBER(19)".to_string(),
            Category::Integer if raw_is(raw, "small") || raw_is(raw, "tiny") => {
                "NUMBER(5)".to_string()
            }
            Category::Integer => "NUMBER(10)".to_string(),
            Category::Decimal => "NUMBER".to_string(),
            Category::Text if is_large_text(raw) => "CLOB".to_string(),
            Category::Text => "VARCHAR2(255)".to_string(),
            Category::DateTime if date_like(raw) => "DATE".to_string(),
            Category::DateTime => "TIMESTAMP".to_string(),
            Category::Boolean => "NUMBER(1)".to_string(),
            Category::Json => "CLOB".to_string(),
            Category::Binary => "BLOB".to_string(),
            Category::Enum | Category::Unknown => "VARCHAR2(255)".to_string(),
        }
    }

    fn boolean_literal(&self, value: bool) -> &'static str {
        if value { "1" } else { "0" }
    }

    fn datetime_literal(&self, value: NaiveDateTime, date_only: bool) -> String {
        if date_only {
            format!("TO_DATE('{}', 'YYYY-MM-DD')", value.format("%Y-%m-%d"))
        } else {
            format!(
                "TO_TIMESTAMP('{}', 'YYYY-MM-DD HH24:MI:SS')",
                value.format("%Y-%m-%d %H:%M:%S")
            )
        }
    }

    fn reserved_words(&self) -> &'static [&'static str] {
        ORACLE_RESERVED
    }

    fn identifier_quotes(&self) -> (char, char) {
        ('"', '"')
    }

    fn folds_unquoted_identifiers(&self) -> bool {
        true
    }

    fn pagination(&self, limit: u64, offset: u64) -> String {
        if offset == 0 {
            format!("ROWNUM <= {limit}")
        } else {
            format!("OFFSET {offset} ROWS FETCH NEXT {limit} ROWS ONLY")
        }
    }

    fn auto_increment_idiom(&self) -> &'static str {
        "GENERATED BY DEFAULT AS IDENTITY"
    }
}

const ORACLE_RESERVED: &[&str] = &[
    "select", "insert", "update", "delete", "from", "where", "join", "inner", "left", "right",
    "full", "outer", "cross", "on", "and", "or", "not", "in", "is", "null", "group", "order",
    "by", "having", "union", "all", "distinct", "as", "case", "when", "then", "else", "end",
    "between", "like", "exists", "table", "index", "view", "into", "values", "set", "create",
    "drop", "alter", "primary", "foreign", "key", "references", "constraint", "default",
    "unique", "check", "user", "grant", "level", "rownum", "sysdate", "number", "varchar2",
];

/// SQLite.
pub struct SqliteDialect;

impl DialectHandler for SqliteDialect {
    fn dialect(&self) -> Dialect {
        Dialect::Sqlite
    }

    fn equivalent_type(&self, category: Category, _raw: &str) -> String {
        match category {
            Category::Integer | Category::Boolean => "INTEGER".to_string(),
            Category::Decimal => "REAL".to_string(),
            Category::Binary => "BLOB".to_string(),
            _ => "TEXT".to_string(),
        }
    }

    fn boolean_literal(&self, value: bool) -> &'static str {
        if value { "1" } else { "0" }
    }

    fn datetime_literal(&self, value: NaiveDateTime, date_only: bool) -> String {
        quoted_iso(value, date_only)
    }

    fn reserved_words(&self) -> &'static [&'static str] {
        COMMON_RESERVED
    }

    fn identifier_quotes(&self) -> (char, char) {
        ('"', '"')
    }

    fn pagination(&self, limit: u64, offset: u64) -> String {
        format!("LIMIT {limit} OFFSET {offset}")
    }

    fn auto_increment_idiom(&self) -> &'static str {
        "AUTOINCREMENT"
    }
}

fn date_like(raw: &str) -> bool {
    let normalized = raw.trim().to_lowercase();
    let base = normalized.split('(').next().unwrap_or(&normalized).trim();
    base == "date"
}

fn time_like(raw: &str) -> bool {
    let normalized = raw.trim().to_lowercase();
    let base = normalized.split('(').next().unwrap_or(&normalized).trim();
    matches!(
        base,
        "time" | "timetz" | "time with time zone" | "time without time zone"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boolean_type_equivalents_differ_per_dialect() {
        assert_eq!(
            Dialect::Postgres
                .handler()
                .equivalent_type(Category::Boolean, "boolean"),
            "BOOLEAN"
        );
        assert_eq!(
            Dialect::MySql
                .handler()
                .equivalent_type(Category::Boolean, "boolean"),
            "TINYINT(1)"
        );
        assert_eq!(
            Dialect::SqlServer
                .handler()
                .equivalent_type(Category::Boolean, "boolean"),
            "BIT"
        );
        assert_eq!(
            Dialect::Oracle
                .handler()
                .equivalent_type(Category::Boolean, "boolean"),
            "NUMBER(1)"
        );
    }

    #[test]
    fn large_text_maps_to_clob_equivalents() {
        assert_eq!(
            Dialect::Oracle
                .handler()
                .equivalent_type(Category::Text, "longtext"),
            "CLOB"
        );
        assert_eq!(
            Dialect::SqlServer
                .handler()
                .equivalent_type(Category::Text, "clob"),
            "NVARCHAR(MAX)"
        );
        assert_eq!(
            Dialect::MySql
                .handler()
                .equivalent_type(Category::Text, "varchar(80)"),
            "VARCHAR(255)"
        );
    }

    #[test]
    fn unknown_category_degrades_to_generic_text() {
        for dialect in [
            Dialect::Postgres,
            Dialect::MySql,
            Dialect::SqlServer,
            Dialect::Oracle,
            Dialect::Sqlite,
        ] {
            let equivalent = dialect
                .handler()
                .equivalent_type(Category::Unknown, "geography");
            assert!(!equivalent.is_empty());
        }
    }

    #[test]
    fn boolean_literals_follow_dialect_encoding() {
        assert_eq!(
            Dialect::Postgres.handler().format_literal("yes", "boolean"),
            "TRUE"
        );
        assert_eq!(
            Dialect::MySql.handler().format_literal("yes", "tinyint(1)"),
            "1"
        );
        // Ambiguous input renders as false, never errors.
        assert_eq!(
            Dialect::Postgres
                .handler()
                .format_literal("maybe", "boolean"),
            "FALSE"
        );
        assert_eq!(
            Dialect::SqlServer.handler().format_literal("maybe", "bit"),
            "0"
        );
    }

    #[test]
    fn oracle_dates_use_explicit_format_masks() {
        let handler = Dialect::Oracle.handler();
        assert_eq!(
            handler.format_literal("2024-03-01", "date"),
            "TO_DATE('2024-03-01', 'YYYY-MM-DD')"
        );
        assert_eq!(
            handler.format_literal("2024-03-01 10:30:00", "timestamp"),
            "TO_TIMESTAMP('2024-03-01 10:30:00', 'YYYY-MM-DD HH24:MI:SS')"
        );
        assert_eq!(handler.format_literal("not a date", "date"), "NULL");
    }

    #[test]
    fn quoted_iso_dates_elsewhere() {
        assert_eq!(
            Dialect::Postgres.handler().format_literal("2024-03-01", "date"),
            "'2024-03-01'"
        );
        assert_eq!(
            Dialect::MySql
                .handler()
                .format_literal("2024-03-01 10:30:00", "datetime"),
            "'2024-03-01 10:30:00'"
        );
    }

    #[test]
    fn identifier_quoting_rules() {
        let pg = Dialect::Postgres.handler();
        assert_eq!(pg.quote_identifier("users"), "users");
        assert_eq!(pg.quote_identifier("select"), "\"select\"");
        assert_eq!(pg.quote_identifier("2nd_col"), "\"2nd_col\"");
        assert_eq!(pg.quote_identifier("odd name"), "\"odd name\"");
        // Folding dialect: mixed case forces quoting.
        assert_eq!(pg.quote_identifier("OrderId"), "\"OrderId\"");

        let my = Dialect::MySql.handler();
        assert_eq!(my.quote_identifier("OrderId"), "OrderId");
        assert_eq!(my.quote_identifier("order"), "`order`");

        let ms = Dialect::SqlServer.handler();
        assert_eq!(ms.quote_identifier("select"), "[select]");
        assert_eq!(ms.quote_identifier("plain"), "plain");
    }

    #[test]
    fn pagination_idioms() {
        assert_eq!(Dialect::Postgres.handler().pagination(10, 0), "LIMIT 10 OFFSET 0");
        assert_eq!(
            Dialect::SqlServer.handler().pagination(10, 20),
            "OFFSET 20 ROWS FETCH NEXT 10 ROWS ONLY"
        );
        assert_eq!(Dialect::Oracle.handler().pagination(10, 0), "ROWNUM <= 10");
    }
}
