use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use rowforge_core::{Category, generate_from_hash, try_parse_boolean, try_parse_datetime,
    try_parse_decimal, try_parse_integer};

use crate::context::GenerationContext;

/// External value-generation collaborator.
///
/// Implementations return raw values as text; the engine parses and formats
/// them into dialect literals. Returning `None` hands the column to local
/// synthesis. An engine may run without any generator at all.
pub trait ValueGenerator: Send + Sync {
    fn generate(&self, ctx: &GenerationContext, record_index: u64) -> Option<String>;

    /// Batched variant; the default delegates to `generate` per record.
    fn generate_batch(&self, ctx: &GenerationContext, records: u64) -> Vec<Option<String>> {
        (0..records)
            .map(|index| self.generate(ctx, index))
            .collect()
    }
}

/// Validate a generator-returned value against the target category.
///
/// A value that fails to parse is replaced by a hash-derived deterministic
/// value for the same input, never propagated as an error.
pub(crate) fn coerce_generated(value: &str, category: Category) -> CoercedValue {
    let usable = match category {
        Category::Integer => {
            try_parse_integer(value).is_some() || try_parse_decimal(value).is_some()
        }
        Category::Decimal => try_parse_decimal(value).is_some(),
        Category::Boolean => try_parse_boolean(value).is_some(),
        Category::DateTime => try_parse_datetime(value.trim_matches('\'')).is_some(),
        _ => true,
    };

    if usable {
        CoercedValue::Parsed(value.to_string())
    } else {
        CoercedValue::HashFallback(generate_from_hash(value, category).to_text())
    }
}

pub(crate) enum CoercedValue {
    Parsed(String),
    HashFallback(String),
}

/// Local value synthesis when no external generator produced a value.
///
/// Preference order: literal from a WHERE predicate, enum-domain sampling,
/// sequential values for primary keys, then seeded category defaults.
pub(crate) fn local_value(ctx: &GenerationContext, record_index: u64, seed: u64) -> String {
    if let Some(value) = predicate_value(ctx) {
        return value;
    }

    if !ctx.column.enum_values.is_empty() {
        let index = (record_index as usize) % ctx.column.enum_values.len();
        return ctx.column.enum_values[index].clone();
    }

    if ctx.column.is_primary_key {
        return sequential_value(ctx, record_index);
    }

    category_default(ctx, record_index, seed)
}

fn predicate_value(ctx: &GenerationContext) -> Option<String> {
    if let Some(predicate) = ctx.equality_predicate() {
        return Some(unquote(&predicate.value));
    }

    for predicate in &ctx.predicates {
        match predicate.operator.as_str() {
            // First element of the IN list satisfies the query.
            "IN" => {
                let first = predicate.value.split(',').next()?.trim();
                if !first.is_empty() {
                    return Some(unquote(first));
                }
            }
            // A LIKE pattern with wildcards removed matches itself.
            "LIKE" => {
                let pattern = unquote(&predicate.value);
                let stripped: String = pattern
                    .chars()
                    .filter(|c| *c != '%' && *c != '_')
                    .collect();
                if !stripped.is_empty() {
                    return Some(stripped);
                }
            }
            _ => {}
        }
    }

    None
}

/// Sequential, collision-free values for key columns.
fn sequential_value(ctx: &GenerationContext, record_index: u64) -> String {
    match ctx.category {
        Category::Integer | Category::Decimal => (record_index + 1).to_string(),
        Category::DateTime => {
            let date = base_date() + chrono::Duration::days(record_index as i64);
            NaiveDateTime::new(date, noon())
                .format("%Y-%m-%d %H:%M:%S")
                .to_string()
        }
        _ => {
            let mut value = format!("{}_{:05}", ctx.column.name, record_index + 1);
            truncate_to_max(&mut value, ctx);
            value
        }
    }
}

fn category_default(ctx: &GenerationContext, record_index: u64, seed: u64) -> String {
    let key = format!("{}.{}", ctx.table, ctx.column.name);
    let mut rng = ChaCha8Rng::seed_from_u64(hash_row_seed(hash_seed(seed, &key), record_index));

    if ctx.boolean_hint || ctx.category == Category::Boolean {
        return rng.random_bool(0.5).to_string();
    }

    match ctx.category {
        Category::Integer => rng.random_range(1..=100_000).to_string(),
        Category::Decimal => {
            let scale = ctx.column.numeric_scale.unwrap_or(2).min(8) as usize;
            format!("{:.scale$}", rng.random_range(0.0..=100_000.0))
        }
        Category::DateTime => {
            let offset = rng.random_range(0..=365_i64);
            let date = base_date() + chrono::Duration::days(offset);
            NaiveDateTime::new(date, noon())
                .format("%Y-%m-%d %H:%M:%S")
                .to_string()
        }
        Category::Json => "{}".to_string(),
        Category::Binary => format!("{:08x}", rng.random::<u32>()),
        Category::Enum | Category::Text => {
            if ctx.json_hint {
                return "{}".to_string();
            }
            if ctx.date_hint {
                let offset = rng.random_range(0..=365_i64);
                let date = base_date() + chrono::Duration::days(offset);
                return date.format("%Y-%m-%d").to_string();
            }
            let mut value = format!("{}_{}", ctx.column.name, rng.random::<u32>());
            truncate_to_max(&mut value, ctx);
            value
        }
        // Unknown types get a stable hash-derived token.
        _ => generate_from_hash(&format!("{key}.{record_index}"), ctx.category).to_text(),
    }
}

fn truncate_to_max(value: &mut String, ctx: &GenerationContext) {
    if let Some(max) = ctx.column.max_length {
        value.truncate(max as usize);
    }
}

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default()
}

fn noon() -> NaiveTime {
    NaiveTime::from_hms_opt(12, 0, 0).unwrap_or_default()
}

fn unquote(raw: &str) -> String {
    let trimmed = raw.trim();
    trimmed
        .strip_prefix('\'')
        .and_then(|rest| rest.strip_suffix('\''))
        .map(|inner| inner.replace("''", "'"))
        .unwrap_or_else(|| trimmed.to_string())
}

pub(crate) fn hash_seed(seed: u64, key: &str) -> u64 {
    let mut hash = seed ^ 0xcbf29ce484222325;
    for byte in key.as_bytes() {
        hash ^= *byte as u64;
        hash = hash.wrapping_mul(0x100000001b3);
    }
    hash
}

fn hash_row_seed(column_seed: u64, record_index: u64) -> u64 {
    let mut hash = column_seed ^ record_index.wrapping_mul(0x9e3779b97f4a7c15);
    hash = hash.wrapping_mul(0x100000001b3);
    hash
}
