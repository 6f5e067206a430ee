//! Test-Case Extraction


use crate::error::{Result, ScaffoldError};
use crate::types::TestCase;
use serde_json::Value;

pub const BEGIN_MARKER: &str = "/** BEGIN TEST CASES **/";
pub const END_MARKER: &str = "/** END TEST CASES **/";

/// Locate the text of the embedded test-case array.
///
/// The array runs from the first `[` after [`BEGIN_MARKER`] to the last `]`
/// anywhere in the script. Nothing is expected after the test-case block, so
/// the closing bracket is not matched against the opening one. Existing
/// translators rely on exactly this boundary.
pub fn locate_test_cases(script: &str) -> Result<&str> {
    let marker = script.find(BEGIN_MARKER).ok_or_else(|| {
        ScaffoldError::parse_error(format!("marker not found: cannot find \"{BEGIN_MARKER}\""))
    })?;

    // -1 / 0 stand in for "not found" so the bounds below behave like indexOf.
    let start = script[marker..]
        .find('[')
        .map(|i| (marker + i) as isize)
        .unwrap_or(-1);
    let end = script.rfind(']').map(|i| (i + 1) as isize).unwrap_or(0);

    let marker = marker as isize;
    let from = start.max(marker) as usize;
    let to = end.max(start).max(marker) as usize;

    Ok(&script[from..to])
}

/// Extract the test cases embedded in a translator script.
///
/// Fails when the begin marker is missing or the block is not valid JSON
/// (trailing commas and JS comments are rejected with the parser's message).
/// Individual entries are not validated; see [`TestCase::from_value`].
pub fn extract_test_cases(script: &str) -> Result<Vec<TestCase>> {
    let block = locate_test_cases(script)?;
    let parsed: Value =
        serde_json::from_str(block).map_err(|e| ScaffoldError::parse_error(e.to_string()))?;

    match parsed {
        Value::Array(entries) => Ok(entries.iter().map(TestCase::from_value).collect()),
        other => Err(ScaffoldError::parse_error(format!(
            "test cases must be a JSON array, found {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
