use std::collections::BTreeMap;

use chrono::NaiveDateTime;

/// A JSON-like value used throughout the polyquery filter language.
///
/// This type represents all valid JSON types with a distinction between
/// integers and floats, plus a datetime scalar that plain JSON lacks but
/// time-series and relational filters compare against constantly.
///
/// Objects are backed by [`BTreeMap`], so iterating a filter always visits
/// keys in sorted order. Normalization leans on this: the canonical tree it
/// produces depends only on the filter's content, never on the order the
/// caller inserted keys.
///
/// # Examples
///
/// ```
/// use polyquery::Value;
///
/// let null = Value::Null;
/// let boolean = Value::Boolean(true);
/// let integer = Value::from(42);
/// let float = Value::from(3.14);
/// let string = Value::from("hello");
/// let list = Value::Array(vec![Value::from(1), Value::from(2)]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// JSON null
    Null,

    /// JSON boolean (true/false)
    Boolean(bool),

    /// Floating-point number
    Float(f64),

    /// Integer number (preserved separately from floats)
    Integer(i64),

    /// UTF-8 string
    String(String),

    /// Naive timestamp (no timezone; formatted per dialect at render time)
    DateTime(NaiveDateTime),

    /// Array of values
    Array(Vec<Value>),

    /// Object with string keys, iterated in sorted key order
    Object(BTreeMap<String, Value>),
}

/// Sorted-key object type used for filters and canonical forms.
pub type Map = BTreeMap<String, Value>;

impl Value {
    /// True for the scalar kinds a comparison operand may hold
    /// (string, integer, float, datetime, boolean).
    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            Value::String(_)
                | Value::Integer(_)
                | Value::Float(_)
                | Value::DateTime(_)
                | Value::Boolean(_)
        )
    }

    /// Get as object map
    pub fn as_object(&self) -> Option<&Map> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Get as array slice
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Get as string slice
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

/// Returns a human-readable type name for a Value
pub(crate) fn type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Boolean(_) => "boolean",
        Value::Integer(_) => "integer",
        Value::Float(_) => "float",
        Value::String(_) => "string",
        Value::DateTime(_) => "datetime",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Integer(n as i64)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(ts: NaiveDateTime) -> Self {
        Value::DateTime(ts)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Array(items.into_iter().map(Into::into).collect())
    }
}

/// Convert serde_json::Value to a polyquery Value.
///
/// JSON has no datetime syntax, so timestamps never arrive this way; build
/// them with `Value::from(NaiveDateTime)` instead.
impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Boolean(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Integer(i)
                } else {
                    Value::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(arr) => {
                Value::Array(arr.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(obj) => {
                Value::Object(obj.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}
