use serde::{Deserialize, Serialize};

use crate::schema::ColumnSchema;

/// Semantic category for a raw column type name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Integer,
    Decimal,
    Text,
    DateTime,
    Boolean,
    Json,
    Binary,
    Enum,
    Unknown,
}

const INTEGER_TYPES: &[&str] = &[
    "int",
    "integer",
    "bigint",
    "smallint",
    "tinyint",
    "mediumint",
    "int2",
    "int4",
    "int8",
    "number",
    "serial",
    "smallserial",
    "bigserial",
];

const DECIMAL_TYPES: &[&str] = &[
    "decimal",
    "numeric",
    "float",
    "float4",
    "float8",
    "double",
    "double precision",
    "real",
    "money",
    "smallmoney",
];

const TEXT_TYPES: &[&str] = &[
    "varchar",
    "nvarchar",
    "varchar2",
    "nvarchar2",
    "character varying",
    "char",
    "nchar",
    "character",
    "bpchar",
    "text",
    "ntext",
    "tinytext",
    "mediumtext",
    "longtext",
    "clob",
    "nclob",
    "string",
    "uuid",
];

/// Raw types that map to a dialect's unbounded CLOB/TEXT equivalent rather
/// than a bounded varchar.
const LARGE_TEXT_TYPES: &[&str] = &[
    "text",
    "ntext",
    "tinytext",
    "mediumtext",
    "longtext",
    "clob",
    "nclob",
];

const DATETIME_TYPES: &[&str] = &[
    "date",
    "datetime",
    "datetime2",
    "smalldatetime",
    "timestamp",
    "timestamptz",
    "timestamp with time zone",
    "timestamp without time zone",
    "time",
    "timetz",
    "time with time zone",
    "time without time zone",
];

const BOOLEAN_TYPES: &[&str] = &["bool", "boolean", "bit"];

const JSON_TYPES: &[&str] = &["json", "jsonb"];

const BINARY_TYPES: &[&str] = &[
    "binary",
    "varbinary",
    "blob",
    "tinyblob",
    "mediumblob",
    "longblob",
    "bytea",
    "image",
    "raw",
    "long raw",
];

const JSON_NAME_HINTS: &[&str] = &["metadata", "config", "settings", "payload", "attributes"];

const DATE_NAME_HINTS: &[&str] = &["date", "created", "updated", "expire"];

impl Category {
    /// Classify a raw type name. Total: unrecognized input maps to `Unknown`.
    pub fn classify(raw: &str) -> Category {
        let normalized = raw.trim().to_lowercase();
        if normalized.is_empty() {
            return Category::Unknown;
        }
        if normalized == "enum"
            || normalized.starts_with("enum(")
            || normalized.starts_with("set(")
        {
            return Category::Enum;
        }

        let base = normalized.split('(').next().unwrap_or(&normalized).trim();
        if INTEGER_TYPES.contains(&base) {
            return Category::Integer;
        }
        if DECIMAL_TYPES.contains(&base) {
            return Category::Decimal;
        }
        if TEXT_TYPES.contains(&base) {
            return Category::Text;
        }
        if DATETIME_TYPES.contains(&base) {
            return Category::DateTime;
        }
        if BOOLEAN_TYPES.contains(&base) {
            return Category::Boolean;
        }
        if JSON_TYPES.contains(&base) {
            return Category::Json;
        }
        if BINARY_TYPES.contains(&base) {
            return Category::Binary;
        }
        Category::Unknown
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, Category::Integer | Category::Decimal)
    }

    pub fn is_temporal(self) -> bool {
        matches!(self, Category::DateTime)
    }

    pub fn is_textual(self) -> bool {
        matches!(self, Category::Text | Category::Enum | Category::Json)
    }
}

/// Whether a raw type should map to the dialect's CLOB/TEXT equivalent
/// instead of a bounded varchar.
pub fn is_large_text(raw: &str) -> bool {
    let normalized = raw.trim().to_lowercase();
    let base = normalized.split('(').next().unwrap_or(&normalized).trim();
    LARGE_TEXT_TYPES.contains(&base)
}

/// Flag a column as boolean-like.
///
/// Advisory: enriches generation hints, never overrides the declared type.
pub fn looks_boolean(column: &ColumnSchema) -> bool {
    let category = Category::classify(&column.data_type);
    match category {
        Category::Boolean => true,
        Category::Integer | Category::Decimal => {
            if column.max_length == Some(1) {
                return true;
            }
            if column.numeric_precision == Some(1) && column.numeric_scale.unwrap_or(0) == 0 {
                return true;
            }
            let name = column.name.to_lowercase();
            name.starts_with("is_") || name.starts_with("has_")
        }
        _ => false,
    }
}

/// Flag a column name as a JSON candidate by keyword.
pub fn looks_json(column_name: &str) -> bool {
    let name = column_name.to_lowercase();
    JSON_NAME_HINTS.iter().any(|hint| name.contains(hint))
}

/// Flag a column name as a date candidate by keyword.
pub fn looks_date(column_name: &str) -> bool {
    let name = column_name.to_lowercase();
    DATE_NAME_HINTS.iter().any(|hint| name.contains(hint)) || name.ends_with("_at")
}

#[cfg(test)]
mod tests {
    use super::*;

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

    #[test]
    fn classify_covers_common_aliases() {
        assert_eq!(Category::classify("BIGINT"), Category::Integer);
        assert_eq!(Category::classify("number"), Category::Integer);
        assert_eq!(Category::classify(" nvarchar(255) "), Category::Text);
        assert_eq!(Category::classify("timestamp with time zone"), Category::DateTime);
        assert_eq!(Category::classify("bit"), Category::Boolean);
        assert_eq!(Category::classify("jsonb"), Category::Json);
        assert_eq!(Category::classify("varbinary(max)"), Category::Binary);
        assert_eq!(Category::classify("money"), Category::Decimal);
    }

    #[test]
    fn classify_is_total() {
        assert_eq!(Category::classify(""), Category::Unknown);
        assert_eq!(Category::classify("   "), Category::Unknown);
        assert_eq!(Category::classify("geography"), Category::Unknown);
    }

    #[test]
    fn classify_detects_enum_prefix() {
        assert_eq!(Category::classify("enum('a','b')"), Category::Enum);
        assert_eq!(Category::classify("ENUM('x')"), Category::Enum);
        assert_eq!(Category::classify("set('a','b')"), Category::Enum);
    }

    #[test]
    fn tinyint_with_length_one_looks_boolean() {
        let mut col = column("is_active", "tinyint");
        col.max_length = Some(1);
        assert!(looks_boolean(&col));
        assert_eq!(Category::classify(&col.data_type), Category::Integer);
    }

    #[test]
    fn number_with_precision_one_looks_boolean() {
        let mut col = column("enabled", "number");
        col.numeric_precision = Some(1);
        col.numeric_scale = Some(0);
        assert!(looks_boolean(&col));
    }

    #[test]
    fn plain_integer_does_not_look_boolean() {
        let col = column("quantity", "integer");
        assert!(!looks_boolean(&col));
    }

    #[test]
    fn name_hints_flag_json_and_date_candidates() {
        assert!(looks_json("user_metadata"));
        assert!(looks_json("app_config"));
        assert!(!looks_json("email"));
        assert!(looks_date("created_at"));
        assert!(looks_date("expire_on"));
        assert!(!looks_date("username"));
    }
}
