//! Shallow structural validation of parsed objects.
//!
//! A [`Schema`] lists top-level member names with the kind each must have.
//! Nested values are not inspected.

use crate::error::{JsonError, Result};
use crate::parser::deserialize;
use crate::value::{Kind, Value};

/// Ordered field-name → expected-kind pairs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    fields: Vec<(String, Kind)>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `name` to be present with kind `kind`.
    pub fn field(mut self, name: impl Into<String>, kind: Kind) -> Self {
        self.fields.push((name.into(), kind));
        self
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, Kind)> {
        self.fields.iter().map(|(name, kind)| (name.as_str(), *kind))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Check `value` against every field, in order, stopping at the first
    /// failure. A `null` member satisfies any kind.
    pub fn validate(&self, value: &Value) -> Result<bool> {
        let Value::Object(members) = value else {
            return Err(JsonError::SchemaMismatch {
                expected: Kind::Object,
                found: value.kind(),
            });
        };

        for (name, expected) in self.fields() {
            let Some(member) = members.get(name) else {
                tracing::debug!(key = name, "schema check failed: missing key");
                return Err(JsonError::MissingKey(name.to_string()));
            };
            let actual = member.kind();
            if actual != Kind::Null && actual != expected {
                tracing::debug!(key = name, %expected, %actual, "schema check failed: kind mismatch");
                return Err(JsonError::KindMismatch {
                    key: name.to_string(),
                    expected,
                    actual,
                });
            }
        }
        Ok(true)
    }
}

impl<K: Into<String>> FromIterator<(K, Kind)> for Schema {
    fn from_iter<I: IntoIterator<Item = (K, Kind)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, kind)| (k.into(), kind)).collect(),
        }
    }
}

/// Parse `text` and check its root object against `schema`.
///
/// # Example
/// ```
/// use jsonkit_core::{validate_schema, Kind, Schema};
///
/// let schema = Schema::new()
///     .field("Name", Kind::String)
///     .field("Age", Kind::Integer);
/// assert!(validate_schema(r#"{"Name":"John","Age":30}"#, &schema).unwrap());
/// ```
pub fn validate_schema(text: &str, schema: &Schema) -> Result<bool> {
    let value = deserialize(text)?;
    schema.validate(&value)
}
