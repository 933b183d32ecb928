use rowforge_core::Category;
use rowforge_dialect::Dialect;

const ALL_DIALECTS: [Dialect; 5] = [
    Dialect::Postgres,
    Dialect::MySql,
    Dialect::SqlServer,
    Dialect::Oracle,
    Dialect::Sqlite,
];

const ALL_CATEGORIES: [Category; 9] = [
    Category::Integer,
    Category::Decimal,
    Category::Text,
    Category::DateTime,
    Category::Boolean,
    Category::Json,
    Category::Binary,
    Category::Enum,
    Category::Unknown,
];

#[test]
fn equivalent_type_is_total_over_categories() {
    for dialect in ALL_DIALECTS {
        let handler = dialect.handler();
        for category in ALL_CATEGORIES {
            let equivalent = handler.equivalent_type(category, "whatever");
            assert!(
                !equivalent.is_empty(),
                "{} yielded empty type for {:?}",
                dialect.name(),
                category
            );
        }
    }
}

#[test]
fn string_literals_never_contain_unescaped_quotes() {
    let inputs = ["plain", "O'Brien", "a''b", "'", "it's 'quoted'"];

    for dialect in ALL_DIALECTS {
        let handler = dialect.handler();
        for input in inputs {
            let literal = handler.format_literal(input, "varchar");
            assert!(literal.starts_with('\'') && literal.ends_with('\''));

            // Every quote inside the wrapper must be doubled.
            let inner = &literal[1..literal.len() - 1];
            let mut chars = inner.chars().peekable();
            while let Some(c) = chars.next() {
                if c == '\'' {
                    assert_eq!(
                        chars.next(),
                        Some('\''),
                        "unescaped quote in {literal} for {}",
                        dialect.name()
                    );
                }
            }
        }
    }
}

#[test]
fn string_round_trip_recovers_the_original() {
    for dialect in ALL_DIALECTS {
        let handler = dialect.handler();
        let original = "O'Brien & Sons";
        let literal = handler.format_literal(original, "text");
        let inner = &literal[1..literal.len() - 1];
        assert_eq!(inner.replace("''", "'"), original);
    }
}

#[test]
fn temporal_and_numeric_failures_degrade_to_null() {
    for dialect in ALL_DIALECTS {
        let handler = dialect.handler();
        assert_eq!(handler.format_literal("2023-02-30", "date"), "NULL");
        assert_eq!(handler.format_literal("soon", "timestamp"), "NULL");
        assert_eq!(handler.format_literal("many", "integer"), "NULL");
    }
}

#[test]
fn statement_terminator_and_idioms_are_exposed() {
    for dialect in ALL_DIALECTS {
        let handler = dialect.handler();
        assert_eq!(handler.statement_terminator(), ";");
        assert!(!handler.auto_increment_idiom().is_empty());
        assert!(!handler.pagination(10, 5).is_empty());
    }
}
