//! Field access on wire objects.

use serde_json::{Map, Value};

use super::error::WireError;
use super::token::json_type_name;

/// Require a JSON object.
pub fn expect_object<'a>(raw: &'a Value, field: &str) -> Result<&'a Map<String, Value>, WireError> {
    match raw {
        Value::Object(map) => Ok(map),
        other => Err(WireError::TypeMismatch {
            field: field.to_string(),
            expected: "object",
            actual: json_type_name(other),
        }),
    }
}

/// Require a JSON array.
pub fn expect_array<'a>(raw: &'a Value, field: &str) -> Result<&'a [Value], WireError> {
    match raw {
        Value::Array(items) => Ok(items),
        other => Err(WireError::TypeMismatch {
            field: field.to_string(),
            expected: "array",
            actual: json_type_name(other),
        }),
    }
}

/// Parse every element of an array, stopping at the first failure.
///
/// Element paths are indexed: `claims[0].evidence_ids[2]`.
pub fn parse_array<T>(
    raw: &Value,
    field: &str,
    mut parse: impl FnMut(&Value, &str) -> Result<T, WireError>,
) -> Result<Vec<T>, WireError> {
    expect_array(raw, field)?
        .iter()
        .enumerate()
        .map(|(index, item)| parse(item, &format!("{field}[{index}]")))
        .collect()
}

/// A wire object whose key set has been checked against a record layout.
pub struct Fields<'a> {
    path: String,
    map: &'a Map<String, Value>,
}

impl<'a> Fields<'a> {
    /// Open a record object.
    ///
    /// Order: object type, then missing required keys (declared order), then
    /// keys outside `required` + `optional` (sorted order).
    pub fn open(
        raw: &'a Value,
        path: impl Into<String>,
        required: &[&str],
        optional: &[&str],
    ) -> Result<Self, WireError> {
        let path = path.into();
        let map = expect_object(raw, &path)?;
        let fields = Self { path, map };

        if let Some(missing) = required.iter().find(|key| !map.contains_key(**key)) {
            return Err(WireError::MissingField {
                field: fields.path(missing),
            });
        }

        if let Some(unexpected) = map
            .keys()
            .find(|key| !required.contains(&key.as_str()) && !optional.contains(&key.as_str()))
        {
            return Err(WireError::UnexpectedField {
                field: fields.path.clone(),
                key: unexpected.clone(),
            });
        }

        Ok(fields)
    }

    /// Full path of a key inside this object.
    pub fn path(&self, key: &str) -> String {
        if self.path.is_empty() {
            key.to_string()
        } else {
            format!("{}.{}", self.path, key)
        }
    }

    /// A required key (presence was checked by [`Fields::open`]).
    pub fn required(&self, key: &str) -> Result<&'a Value, WireError> {
        self.map.get(key).ok_or_else(|| WireError::MissingField {
            field: self.path(key),
        })
    }

    /// An optional key; `null` counts as absent.
    pub fn optional(&self, key: &str) -> Option<&'a Value> {
        self.map.get(key).filter(|v| !v.is_null())
    }
}
