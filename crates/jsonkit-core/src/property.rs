//! Typed records: explicit per-type property registration.
//!
//! A record lists its bindable fields once, in order, through
//! [`Record::properties`]. Each [`Property`] pairs a JSON member name with
//! accessor functions; the serializer reads through the getter and the object
//! mapper writes through the setter after coercing the parsed value.
//!
//! The [`json_record!`](crate::json_record) macro writes both the `Record`
//! and the `ToJson` impls:
//!
//! ```
//! use jsonkit_core::{deserialize_typed, json_record, serialize};
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct Person {
//!     name: String,
//!     age: i32,
//!     is_student: bool,
//! }
//!
//! json_record!(Person {
//!     "Name" => name,
//!     "Age" => age,
//!     "IsStudent" => is_student,
//! });
//!
//! let person: Person = deserialize_typed(r#"{"Name":"John","Age":30,"IsStudent":false}"#).unwrap();
//! assert_eq!(person.name, "John");
//! assert_eq!(serialize(&person).unwrap(), r#"{"Name":"John","Age":30,"IsStudent":false}"#);
//! ```

use crate::convert::FromJson;
use crate::error::{JsonError, Result};
use crate::serializer::ToJson;
use crate::value::{Kind, Value};

/// A type whose fields can be bound to and from JSON objects.
pub trait Record: Default + 'static {
    /// The record's properties, in serialization order.
    ///
    /// Called once per property cache; the result is memoized.
    fn properties() -> Vec<Property<Self>>;
}

/// Metadata and accessors for one bindable field of `T`.
pub struct Property<T> {
    name: &'static str,
    kind: Option<Kind>,
    nullable: bool,
    accessor: Box<dyn Accessor<T>>,
}

impl<T: 'static> Property<T> {
    /// A field that is both serialized and mapped from JSON.
    pub fn field<F>(name: &'static str, get: fn(&T) -> &F, get_mut: fn(&mut T) -> &mut F) -> Self
    where
        F: ToJson + FromJson + 'static,
    {
        Self {
            name,
            kind: F::declared_kind(),
            nullable: F::accepts_null(),
            accessor: Box::new(Field { get, get_mut }),
        }
    }

    /// A field that is serialized but never assigned by the mapper, e.g. a
    /// nested record or a shared reference.
    pub fn read_only<F>(name: &'static str, get: fn(&T) -> &F) -> Self
    where
        F: ToJson + 'static,
    {
        Self {
            name,
            kind: F::declared_kind(),
            nullable: true,
            accessor: Box::new(ReadOnly { get }),
        }
    }

    pub fn get<'a>(&self, record: &'a T) -> &'a dyn ToJson {
        self.accessor.get(record)
    }

    /// Coerce `value` to the field's type and store it in `record`.
    pub fn set(&self, record: &mut T, value: &Value) -> Result<()> {
        self.accessor
            .set(record, value)
            .map_err(|message| JsonError::conversion(self.name, message))
    }
}

impl<T> Property<T> {
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The kind the field serializes to, when it is fixed by its type.
    pub fn kind(&self) -> Option<Kind> {
        self.kind
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    pub fn is_writable(&self) -> bool {
        self.accessor.is_writable()
    }
}

impl<T> std::fmt::Debug for Property<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Property")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("nullable", &self.nullable)
            .field("writable", &self.accessor.is_writable())
            .finish()
    }
}

trait Accessor<T>: Send + Sync {
    fn get<'a>(&self, record: &'a T) -> &'a dyn ToJson;
    fn set(&self, record: &mut T, value: &Value) -> std::result::Result<(), String>;
    fn is_writable(&self) -> bool;
}

struct Field<T, F> {
    get: fn(&T) -> &F,
    get_mut: fn(&mut T) -> &mut F,
}

impl<T, F> Accessor<T> for Field<T, F>
where
    T: 'static,
    F: ToJson + FromJson + 'static,
{
    fn get<'a>(&self, record: &'a T) -> &'a dyn ToJson {
        (self.get)(record)
    }

    fn set(&self, record: &mut T, value: &Value) -> std::result::Result<(), String> {
        *(self.get_mut)(record) = F::from_json(value)?;
        Ok(())
    }

    fn is_writable(&self) -> bool {
        true
    }
}

struct ReadOnly<T, F> {
    get: fn(&T) -> &F,
}

impl<T, F> Accessor<T> for ReadOnly<T, F>
where
    T: 'static,
    F: ToJson + 'static,
{
    fn get<'a>(&self, record: &'a T) -> &'a dyn ToJson {
        (self.get)(record)
    }

    fn set(&self, _record: &mut T, _value: &Value) -> std::result::Result<(), String> {
        Err("property is read-only".to_string())
    }

    fn is_writable(&self) -> bool {
        false
    }
}

/// Implement [`Record`] and [`ToJson`] for a struct.
///
/// Each entry is `"JsonName" => field` for a mapped field, or
/// `"JsonName" => readonly field` for a field that is only serialized.
/// Mapped fields must implement both `ToJson` and `FromJson`.
#[macro_export]
macro_rules! json_record {
    ($ty:ty { $($body:tt)* }) => {
        impl $crate::Record for $ty {
            fn properties() -> ::std::vec::Vec<$crate::Property<Self>> {
                let mut properties = ::std::vec::Vec::new();
                $crate::json_record!(@props properties, $ty, $($body)*);
                properties
            }
        }

        impl $crate::ToJson for $ty {
            fn write_json(&self, ser: &mut $crate::Serializer<'_>) -> $crate::Result<()> {
                ser.write_record(self)
            }

            fn declared_kind() -> ::std::option::Option<$crate::Kind> {
                ::std::option::Option::Some($crate::Kind::Object)
            }
        }
    };

    (@props $props:ident, $ty:ty $(,)?) => {};

    (@props $props:ident, $ty:ty, $name:literal => readonly $field:ident $(, $($rest:tt)*)?) => {
        $props.push($crate::Property::<$ty>::read_only($name, |r: &$ty| &r.$field));
        $crate::json_record!(@props $props, $ty, $($($rest)*)?);
    };

    (@props $props:ident, $ty:ty, $name:literal => $field:ident $(, $($rest:tt)*)?) => {
        $props.push($crate::Property::<$ty>::field(
            $name,
            |r: &$ty| &r.$field,
            |r: &mut $ty| &mut r.$field,
        ));
        $crate::json_record!(@props $props, $ty, $($($rest)*)?);
    };
}
