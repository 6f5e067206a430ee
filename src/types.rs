use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One extracted bibliographic record. Key order is preserved.
pub type Item = Map<String, Value>;

/// What a test case expects the translator to produce.
#[derive(Debug, Clone, PartialEq)]
pub enum Expected {
    /// The usual case: an array of items.
    Items(Vec<Value>),
    /// Anything else found under `items` (e.g. `"multiple"`, or `null` when absent).
    Other(Value),
}

impl Expected {
    pub fn as_value(&self) -> Value {
        match self {
            Expected::Items(items) => Value::Array(items.clone()),
            Expected::Other(v) => v.clone(),
        }
    }
}

/// A fixture: the URL to translate and what a correct translator yields for it.
#[derive(Debug, Clone, PartialEq)]
pub struct TestCase {
    /// The `"type"` field, usually `"web"`.
    pub kind: Option<String>,
    pub url: String,
    pub items: Expected,
}

impl TestCase {
    pub fn new(url: impl Into<String>, items: Vec<Value>) -> Self {
        Self {
            kind: Some("web".to_string()),
            url: url.into(),
            items: Expected::Items(items),
        }
    }

    /// Lenient conversion from one entry of the embedded test-case array.
    ///
    /// Shape problems are kept rather than rejected so they show up as a
    /// failed case later instead of aborting the whole run.
    pub fn from_value(value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            return Self {
                kind: None,
                url: String::new(),
                items: Expected::Other(Value::Null),
            };
        };

        let items = match obj.get("items") {
            Some(Value::Array(items)) => Expected::Items(items.clone()),
            Some(other) => Expected::Other(other.clone()),
            None => Expected::Other(Value::Null),
        };

        Self {
            kind: obj.get("type").and_then(Value::as_str).map(str::to_string),
            url: obj
                .get("url")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            items,
        }
    }

    pub fn to_value(&self) -> Value {
        let mut obj = Map::new();
        if let Some(kind) = &self.kind {
            obj.insert("type".into(), Value::String(kind.clone()));
        }
        obj.insert("url".into(), Value::String(self.url.clone()));
        obj.insert("items".into(), self.items.as_value());
        Value::Object(obj)
    }
}

impl Serialize for TestCase {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for TestCase {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(TestCase::from_value(&value))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    Success,
    Error,
}

pub const NOT_MATCHED: &str = "Not matched";
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// Outcome of a single test case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCaseResult {
    pub url: String,
    pub status: TestStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TestCaseResult {
    pub fn success(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            status: TestStatus::Success,
            error: None,
        }
    }

    /// The translator ran but produced different items.
    pub fn not_matched(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            status: TestStatus::Error,
            error: Some(NOT_MATCHED.to_string()),
        }
    }

    /// The translator could not be run for this URL.
    pub fn unknown_error(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            status: TestStatus::Error,
            error: Some(UNKNOWN_ERROR.to_string()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == TestStatus::Success
    }
}

/// All test case outcomes, in the order the cases were declared.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestReport {
    pub cases: Vec<TestCaseResult>,
}

impl TestReport {
    pub fn passed(&self) -> usize {
        self.cases.iter().filter(|c| c.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.cases.len() - self.passed()
    }

    pub fn all_passed(&self) -> bool {
        self.failed() == 0
    }
}

/// Raw translation server output for an ad hoc URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    pub result: Value,
}

impl RunResult {
    /// Presentation helper: a single-item array is shown as the item itself.
    pub fn display_value(&self) -> &Value {
        match &self.result {
            Value::Array(items) if items.len() == 1 => &items[0],
            other => other,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}
impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            ok: true,
            data: Some(data),
            error: None,
        }
    }
    pub fn err(msg: impl Into<String>) -> Self {
        Self {
            ok: false,
            data: None,
            error: Some(msg.into()),
        }
    }
}
