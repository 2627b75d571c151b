use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Values that can be stored in a database row or used as bind values.
///
/// Bind values are substituted positionally, in the order the `?`
/// placeholders appear in the query text:
/// ```rust
/// use sybase_middleware::prelude::*;
///
/// let bindings = vec![
///     RowValues::Int(1),
///     RowValues::Text("alice".into()),
///     RowValues::Bool(true),
/// ];
/// # let _ = bindings;
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum RowValues {
    /// Integer value (64-bit)
    Int(i64),
    /// Floating point value (64-bit)
    Float(f64),
    /// Text/string value
    Text(String),
    /// Boolean value
    Bool(bool),
    /// Timestamp value
    Timestamp(NaiveDateTime),
    /// NULL value
    Null,
    /// JSON value
    JSON(JsonValue),
    /// Binary data
    Blob(Vec<u8>),
}

impl RowValues {
    /// Check if this value is NULL
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn as_int(&self) -> Option<&i64> {
        if let RowValues::Int(value) = self {
            Some(value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        if let RowValues::Text(value) = self {
            Some(value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<&bool> {
        if let RowValues::Bool(value) = self {
            return Some(value);
        } else if let Some(i) = self.as_int() {
            if *i == 1 {
                return Some(&true);
            } else if *i == 0 {
                return Some(&false);
            }
        }
        None
    }

    #[must_use]
    pub fn as_timestamp(&self) -> Option<NaiveDateTime> {
        if let RowValues::Timestamp(value) = self {
            return Some(*value);
        } else if let Some(s) = self.as_text() {
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
                return Some(dt);
            }
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f") {
                return Some(dt);
            }
        }
        None
    }

    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        if let RowValues::Float(value) = self {
            Some(*value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_blob(&self) -> Option<&[u8]> {
        if let RowValues::Blob(bytes) = self {
            Some(bytes)
        } else {
            None
        }
    }

    /// Render the value as JSON for associative-record fetches.
    ///
    /// Timestamps become `YYYY-MM-DD HH:MM:SS[.f]` strings and blobs become
    /// arrays of bytes.
    #[must_use]
    pub fn to_json(&self) -> JsonValue {
        match self {
            RowValues::Int(i) => JsonValue::from(*i),
            RowValues::Float(f) => JsonValue::from(*f),
            RowValues::Text(s) => JsonValue::String(s.clone()),
            RowValues::Bool(b) => JsonValue::Bool(*b),
            RowValues::Timestamp(dt) => JsonValue::String(dt.format("%F %T%.f").to_string()),
            RowValues::Null => JsonValue::Null,
            RowValues::JSON(v) => v.clone(),
            RowValues::Blob(bytes) => JsonValue::from(bytes.clone()),
        }
    }
}

/// Row shape produced by a row-returning statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchMode {
    /// Rows keep their column list and typed values (`ResultSet`).
    #[default]
    #[serde(alias = "obj", alias = "object")]
    Structured,
    /// Rows become plain column-name keyed JSON maps.
    #[serde(alias = "array")]
    Assoc,
}

/// Whether a pipeline call reaches the physical handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionMode {
    /// Prepare, bind and execute against the handle.
    #[default]
    Execute,
    /// Record the statement and return an empty result without touching the
    /// handle.
    Pretend,
}

impl ExecutionMode {
    #[must_use]
    pub fn is_pretend(self) -> bool {
        matches!(self, ExecutionMode::Pretend)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bool_accessor_reads_integer_flags() {
        assert_eq!(RowValues::Int(1).as_bool(), Some(&true));
        assert_eq!(RowValues::Int(0).as_bool(), Some(&false));
        assert_eq!(RowValues::Int(7).as_bool(), None);
    }

    #[test]
    fn timestamps_parse_from_text() {
        let v = RowValues::Text("2024-03-01 10:20:30.125".into());
        let dt = v.as_timestamp().expect("timestamp");
        assert_eq!(dt.format("%F %T%.3f").to_string(), "2024-03-01 10:20:30.125");
    }

    #[test]
    fn fetch_mode_accepts_legacy_names() {
        let mode: FetchMode = serde_json::from_str("\"obj\"").unwrap();
        assert_eq!(mode, FetchMode::Structured);
        let mode: FetchMode = serde_json::from_str("\"assoc\"").unwrap();
        assert_eq!(mode, FetchMode::Assoc);
    }

    #[test]
    fn json_rendering() {
        assert_eq!(RowValues::Null.to_json(), JsonValue::Null);
        assert_eq!(RowValues::Int(4).to_json(), serde_json::json!(4));
        assert_eq!(
            RowValues::Blob(vec![1, 2]).to_json(),
            serde_json::json!([1, 2])
        );
    }
}
