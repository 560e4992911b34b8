//! Binding parsed objects to typed records.
//!
//! Mapping is shallow: each writable property whose name appears in the
//! object is coerced with [`FromJson`](crate::FromJson) and assigned. Missing
//! members, and `null` members for fields that cannot hold null, leave the
//! field at its `Default` value. Read-only properties are skipped.

use crate::cache::PropertyCache;
use crate::error::{JsonError, Result};
use crate::parser::deserialize;
use crate::property::Record;
use crate::value::{Kind, Value};

/// Parse `text` and bind its root object to a new `T`.
///
/// # Example
/// ```
/// use jsonkit_core::{deserialize_typed, json_record};
///
/// #[derive(Default)]
/// struct Person {
///     name: String,
///     age: u8,
/// }
///
/// json_record!(Person { "Name" => name, "Age" => age });
///
/// let person: Person = deserialize_typed(r#"{"Name":"John","Age":30,"IsStudent":false}"#).unwrap();
/// assert_eq!(person.name, "John");
/// assert_eq!(person.age, 30);
/// ```
pub fn deserialize_typed<T: Record>(text: &str) -> Result<T> {
    let value = deserialize(text)?;
    from_value(&value)
}

/// Bind an already-parsed object to a new `T`.
pub fn from_value<T: Record>(value: &Value) -> Result<T> {
    from_value_with(value, PropertyCache::global())
}

/// Like [`from_value`], reading property lists from `cache`.
pub fn from_value_with<T: Record>(value: &Value, cache: &PropertyCache) -> Result<T> {
    let Value::Object(members) = value else {
        return Err(JsonError::SchemaMismatch {
            expected: Kind::Object,
            found: value.kind(),
        });
    };

    let entry = cache.entry::<T>();
    let mut record = T::default();
    for property in entry.properties() {
        if !property.is_writable() {
            continue;
        }
        let Some(member) = members.get(property.name()) else {
            continue;
        };
        if member.is_null() && !property.is_nullable() {
            continue;
        }
        property.set(&mut record, member)?;
    }
    Ok(record)
}
