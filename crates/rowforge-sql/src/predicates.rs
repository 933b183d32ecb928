use regex::Regex;
use serde::Serialize;

use crate::extract::strip_comments;

/// A literal predicate recovered from a WHERE clause.
///
/// Only literal right-hand sides are collected; column-to-column
/// comparisons (join conditions) are skipped.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnPredicate {
    /// Alias or table qualifier as written, when present.
    pub qualifier: Option<String>,
    pub column: String,
    /// Normalized operator: `=`, `!=`, `<>`, `<`, `>`, `<=`, `>=`, `LIKE`,
    /// `NOT LIKE`, or `IN`.
    pub operator: String,
    /// Raw literal text with quotes preserved; for `IN`, the list body.
    pub value: String,
}

const COMPARISON_PATTERN: &str =
    r"(?i)\b(?:([A-Za-z_][A-Za-z0-9_]*)\.)?([A-Za-z_][A-Za-z0-9_]*)\s*(>=|<=|<>|!=|=|>|<)\s*('(?:[^']|'')*'|-?\d+(?:\.\d+)?)";

const LIKE_PATTERN: &str =
    r"(?i)\b(?:([A-Za-z_][A-Za-z0-9_]*)\.)?([A-Za-z_][A-Za-z0-9_]*)\s+(not\s+like|like)\s+('(?:[^']|'')*')";

const IN_PATTERN: &str =
    r"(?i)\b(?:([A-Za-z_][A-Za-z0-9_]*)\.)?([A-Za-z_][A-Za-z0-9_]*)\s+in\s*\(([^)]*)\)";

/// Best-effort scan of the text after the first WHERE keyword.
///
/// Multiple predicates for the same column are all collected, never merged.
pub fn extract_predicates(sql: &str) -> Vec<ColumnPredicate> {
    let text = strip_comments(sql);
    let Some(clause) = where_clause(&text) else {
        return Vec::new();
    };

    let mut predicates = Vec::new();

    if let Ok(pattern) = Regex::new(COMPARISON_PATTERN) {
        for caps in pattern.captures_iter(clause) {
            predicates.push(ColumnPredicate {
                qualifier: caps.get(1).map(|m| m.as_str().to_string()),
                column: caps[2].to_string(),
                operator: caps[3].to_string(),
                value: caps[4].to_string(),
            });
        }
    }

    if let Ok(pattern) = Regex::new(LIKE_PATTERN) {
        for caps in pattern.captures_iter(clause) {
            let operator = if caps[3].to_lowercase().starts_with("not") {
                "NOT LIKE"
            } else {
                "LIKE"
            };
            predicates.push(ColumnPredicate {
                qualifier: caps.get(1).map(|m| m.as_str().to_string()),
                column: caps[2].to_string(),
                operator: operator.to_string(),
                value: caps[4].to_string(),
            });
        }
    }

    if let Ok(pattern) = Regex::new(IN_PATTERN) {
        for caps in pattern.captures_iter(clause) {
            predicates.push(ColumnPredicate {
                qualifier: caps.get(1).map(|m| m.as_str().to_string()),
                column: caps[2].to_string(),
                operator: "IN".to_string(),
                value: caps[3].trim().to_string(),
            });
        }
    }

    predicates
}

fn where_clause(text: &str) -> Option<&str> {
    let pattern = Regex::new(r"(?i)\bwhere\b").ok()?;
    let found = pattern.find(text)?;
    Some(&text[found.end()..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_comparison_like_and_in() {
        let sql = "SELECT * FROM orders o WHERE o.status = 'open' AND o.total > 100 \
                   AND o.note LIKE '%rush%' AND o.region IN ('na', 'eu')";
        let predicates = extract_predicates(sql);

        assert!(predicates.contains(&ColumnPredicate {
            qualifier: Some("o".to_string()),
            column: "status".to_string(),
            operator: "=".to_string(),
            value: "'open'".to_string(),
        }));
        assert!(predicates.contains(&ColumnPredicate {
            qualifier: Some("o".to_string()),
            column: "total".to_string(),
            operator: ">".to_string(),
            value: "100".to_string(),
        }));
        assert!(predicates.contains(&ColumnPredicate {
            qualifier: Some("o".to_string()),
            column: "note".to_string(),
            operator: "LIKE".to_string(),
            value: "'%rush%'".to_string(),
        }));
        assert!(predicates.contains(&ColumnPredicate {
            qualifier: Some("o".to_string()),
            column: "region".to_string(),
            operator: "IN".to_string(),
            value: "'na', 'eu'".to_string(),
        }));
    }

    #[test]
    fn join_conditions_are_not_predicates() {
        let sql = "SELECT * FROM a JOIN b ON a.bid = b.id WHERE a.kind = 'x'";
        let predicates = extract_predicates(sql);
        assert_eq!(predicates.len(), 1);
        assert_eq!(predicates[0].column, "kind");
    }

    #[test]
    fn no_where_clause_yields_nothing() {
        assert!(extract_predicates("SELECT * FROM a JOIN b ON a.bid = b.id").is_empty());
    }

    #[test]
    fn multiple_predicates_per_column_are_all_kept() {
        let sql = "SELECT * FROM t WHERE amount >= 10 AND amount <= 20";
        let predicates = extract_predicates(sql);
        let amounts: Vec<&ColumnPredicate> = predicates
            .iter()
            .filter(|p| p.column == "amount")
            .collect();
        assert_eq!(amounts.len(), 2);
    }

    #[test]
    fn escaped_quotes_stay_inside_the_literal() {
        let sql = "SELECT * FROM t WHERE name = 'O''Brien'";
        let predicates = extract_predicates(sql);
        assert_eq!(predicates[0].value, "'O''Brien'");
    }
}
