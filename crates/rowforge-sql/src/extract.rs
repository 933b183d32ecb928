use std::collections::BTreeMap;

use regex::Regex;
use thiserror::Error;

/// Errors from lexical table extraction.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractError {
    /// The query yielded no table references; the run cannot be analyzed.
    #[error("no tables found in query")]
    NoTablesFound,
}

/// Keywords that must never be taken for a trailing alias.
const RESERVED: &[&str] = &[
    "select", "from", "where", "join", "inner", "left", "right", "full", "outer", "cross", "on",
    "as", "and", "or", "not", "in", "is", "null", "group", "order", "by", "having", "union",
    "all", "distinct", "limit", "offset", "fetch", "set", "values", "into", "update", "insert",
    "delete", "when", "then", "else", "end", "case", "exists", "between", "like", "returning",
];

// Table reference: FROM/JOIN/INTO/UPDATE keyword, then an optionally
// schema-qualified identifier (bare, [bracketed], or `backticked`). The
// trailing alias is matched separately so a following keyword is never
// consumed out of the scan.
const TABLE_PATTERN: &str = r"(?i)\b(?:from|(?:(?:inner|left|right|full|cross)\s+(?:outer\s+)?)?join|insert\s+into|into|update)\s+(?:\[([^\]]+)\]|`([^`]+)`|([A-Za-z_][A-Za-z0-9_]*))(?:\s*\.\s*(?:\[([^\]]+)\]|`([^`]+)`|([A-Za-z_][A-Za-z0-9_]*)))?";

const ALIAS_PATTERN: &str = r"(?i)^\s+(?:as\s+)?([A-Za-z_][A-Za-z0-9_]*)";

// Last-resort pattern when the primary scan matches nothing.
const FALLBACK_PATTERN: &str = r"(?i)\b(?:from|join|into|update)\s+([A-Za-z_][A-Za-z0-9_]*)";

/// Ordered set of table names referenced by `sql`.
///
/// Finding zero tables is the single fatal condition of a generation run.
pub fn extract_tables(sql: &str) -> Result<Vec<String>, ExtractError> {
    let tables: Vec<String> = scan_references(sql)
        .into_iter()
        .map(|reference| reference.table)
        .collect();

    let mut seen = BTreeMap::new();
    let mut ordered = Vec::new();
    for table in tables {
        if seen.insert(table.to_lowercase(), ()).is_none() {
            ordered.push(table);
        }
    }

    if !ordered.is_empty() {
        return Ok(ordered);
    }

    let fallback = scan_fallback(sql);
    if fallback.is_empty() {
        Err(ExtractError::NoTablesFound)
    } else {
        Ok(fallback)
    }
}

/// Alias bindings recovered from FROM/JOIN clauses (alias -> table).
pub fn extract_alias_map(sql: &str) -> BTreeMap<String, String> {
    let mut aliases = BTreeMap::new();
    for reference in scan_references(sql) {
        if let Some(alias) = reference.alias {
            aliases.entry(alias).or_insert(reference.table);
        }
    }
    aliases
}

/// Resolve an unbound alias against known table names.
///
/// Priority order: exact match, short prefix (alias length <= 3), acronym
/// over underscore/hyphen segments, substring containment. First match
/// wins; no match leaves the alias unresolved. The pattern tiers are
/// heuristics and can mismatch between similarly named tables.
pub fn resolve_alias(alias: &str, tables: &[String]) -> Option<String> {
    let needle = alias.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }

    for table in tables {
        if table.eq_ignore_ascii_case(alias) {
            return Some(table.clone());
        }
    }

    if needle.len() <= 3 {
        for table in tables {
            if table.to_lowercase().starts_with(&needle) {
                return Some(table.clone());
            }
        }
    }

    for table in tables {
        if acronym(table) == needle {
            return Some(table.clone());
        }
    }

    for table in tables {
        if table.to_lowercase().contains(&needle) {
            return Some(table.clone());
        }
    }

    None
}

fn acronym(table: &str) -> String {
    table
        .to_lowercase()
        .split(['_', '-'])
        .filter_map(|segment| segment.chars().next())
        .collect()
}

struct TableReference {
    table: String,
    alias: Option<String>,
}

fn scan_references(sql: &str) -> Vec<TableReference> {
    let text = strip_comments(sql);
    let (Ok(pattern), Ok(alias_pattern)) = (Regex::new(TABLE_PATTERN), Regex::new(ALIAS_PATTERN))
    else {
        return Vec::new();
    };

    let mut references = Vec::new();
    for caps in pattern.captures_iter(&text) {
        let first = capture_any(&caps, &[1, 2, 3]);
        let second = capture_any(&caps, &[4, 5, 6]);
        // With a schema qualifier the second token is the table.
        let Some(table) = second.or(first) else {
            continue;
        };

        let tail = caps
            .get(0)
            .map(|m| &text[m.end()..])
            .unwrap_or("");
        let alias = alias_pattern
            .captures(tail)
            .and_then(|alias_caps| alias_caps.get(1))
            .map(|m| m.as_str().to_string())
            .filter(|candidate| !RESERVED.contains(&candidate.to_lowercase().as_str()));

        references.push(TableReference { table, alias });
    }
    references
}

fn scan_fallback(sql: &str) -> Vec<String> {
    let text = strip_comments(sql);
    let Ok(pattern) = Regex::new(FALLBACK_PATTERN) else {
        return Vec::new();
    };

    let mut seen = BTreeMap::new();
    let mut tables = Vec::new();
    for caps in pattern.captures_iter(&text) {
        if let Some(name) = caps.get(1) {
            let name = name.as_str().to_string();
            if seen.insert(name.to_lowercase(), ()).is_none() {
                tables.push(name);
            }
        }
    }
    tables
}

fn capture_any(caps: &regex::Captures<'_>, groups: &[usize]) -> Option<String> {
    groups
        .iter()
        .find_map(|index| caps.get(*index).map(|m| m.as_str().to_string()))
}

/// Remove `--` line comments and `/* */` block comments before scanning.
pub(crate) fn strip_comments(sql: &str) -> String {
    let without_line = match Regex::new(r"--[^\n]*") {
        Ok(re) => re.replace_all(sql, " ").into_owned(),
        Err(_) => sql.to_string(),
    };
    match Regex::new(r"(?s)/\*.*?\*/") {
        Ok(re) => re.replace_all(&without_line, " ").into_owned(),
        Err(_) => without_line,
    }
}
