//! Result Matching


use crate::types::{Expected, TestCase, TestCaseResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Server-assigned fields that never appear in authored expectations.
pub const VOLATILE_KEYS: [&str; 3] = ["key", "version", "accessDate"];

/// How sanitized server output is compared with expected items.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchMode {
    /// Serialized JSON must be byte-identical, so object key order matters.
    #[default]
    Strict,
    /// Deep equality where object key order is ignored. Array order still matters.
    IgnoreKeyOrder,
}

/// Copy server items with top-level volatile keys removed.
///
/// Nested objects are left alone, as are entries that are not objects.
pub fn sanitize_items(raw: &[Value]) -> Vec<Value> {
    raw.iter()
        .map(|item| match item {
            Value::Object(map) => Value::Object(
                map.iter()
                    .filter(|(k, _)| !VOLATILE_KEYS.contains(&k.as_str()))
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect(),
            ),
            other => other.clone(),
        })
        .collect()
}

/// Strict comparison of expected items against raw server output.
pub fn matches(expected: &[Value], raw: &[Value]) -> bool {
    matches_with(expected, raw, MatchMode::Strict)
}

pub fn matches_with(expected: &[Value], raw: &[Value], mode: MatchMode) -> bool {
    let expected = normalize_numbers(&Value::Array(expected.to_vec()));
    let actual = normalize_numbers(&Value::Array(sanitize_items(raw)));
    match mode {
        MatchMode::Strict => expected.to_string() == actual.to_string(),
        // Object equality in serde_json ignores insertion order.
        MatchMode::IgnoreKeyOrder => expected == actual,
    }
}

/// Largest integer an f64 holds exactly (2^53).
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Rewrite whole-valued floats as integers, so `1.0` and `1` serialize alike
/// the way JavaScript prints them.
fn normalize_numbers(value: &Value) -> Value {
    match value {
        Value::Number(n) if n.is_f64() => match n.as_f64() {
            Some(f) if f.fract() == 0.0 && f.abs() <= MAX_SAFE_INTEGER => {
                Value::from(f as i64)
            }
            _ => value.clone(),
        },
        Value::Array(items) => Value::Array(items.iter().map(normalize_numbers).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), normalize_numbers(v)))
                .collect(),
        ),
        other => other.clone(),
    }
}

/// Judge one test case against what the server returned for its URL.
pub fn evaluate(case: &TestCase, raw: &[Value], mode: MatchMode) -> TestCaseResult {
    let matched = match &case.items {
        Expected::Items(items) => matches_with(items, raw, mode),
        // A non-array expectation can never equal the server's item array.
        Expected::Other(_) => false,
    };

    if matched {
        TestCaseResult::success(&case.url)
    } else {
        TestCaseResult::not_matched(&case.url)
    }
}
