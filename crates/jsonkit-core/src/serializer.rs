//! `Value` and typed data → compact JSON text.
//!
//! Output has no insignificant whitespace. Strings escape exactly `"`, `\`,
//! backspace, form feed, `\n`, `\r` and `\t`; every other character,
//! including non-ASCII and other control characters, is written verbatim.
//! Floats always carry a `.` so they read back as floats.
//!
//! Anything implementing [`ToJson`] can be serialized. Registered records
//! (see [`Record`](crate::Record)) are written through the property cache and
//! checked for reference cycles.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::cache::PropertyCache;
use crate::error::{JsonError, Result};
use crate::guard::CycleGuard;
use crate::property::Record;
use crate::value::{Kind, Value};

/// Serialize a value to JSON text using the process-wide property cache.
///
/// A top-level `None` is rejected with [`JsonError::NullInput`]; nested
/// `None`s are written as `null`.
///
/// # Example
/// ```
/// use jsonkit_core::{serialize, Value};
///
/// let person: Value = [
///     ("Name", Value::from("John")),
///     ("Age", Value::from(30)),
///     ("IsStudent", Value::from(false)),
/// ]
/// .into_iter()
/// .collect();
/// assert_eq!(
///     serialize(&person).unwrap(),
///     r#"{"Name":"John","Age":30,"IsStudent":false}"#
/// );
/// ```
pub fn serialize<T: ToJson + ?Sized>(value: &T) -> Result<String> {
    Serializer::new().serialize(value)
}

/// A type that can write itself as JSON.
pub trait ToJson {
    fn write_json(&self, ser: &mut Serializer<'_>) -> Result<()>;

    /// Whether this value counts as absent at the top level.
    fn is_absent(&self) -> bool {
        false
    }

    /// The kind this type always serializes to, if fixed.
    fn declared_kind() -> Option<Kind>
    where
        Self: Sized,
    {
        None
    }
}

/// Output buffer plus the per-call cycle guard.
///
/// A serializer is consumed by [`Serializer::serialize`], so every call
/// starts with an empty guard.
pub struct Serializer<'c> {
    out: String,
    guard: CycleGuard,
    cache: &'c PropertyCache,
}

impl Serializer<'static> {
    pub fn new() -> Self {
        Self::with_cache(PropertyCache::global())
    }
}

impl Default for Serializer<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'c> Serializer<'c> {
    /// Use `cache` instead of the process-wide property cache.
    pub fn with_cache(cache: &'c PropertyCache) -> Self {
        Self {
            out: String::new(),
            guard: CycleGuard::new(),
            cache,
        }
    }

    pub fn serialize<T: ToJson + ?Sized>(mut self, value: &T) -> Result<String> {
        if value.is_absent() {
            return Err(JsonError::NullInput);
        }
        value.write_json(&mut self)?;
        tracing::trace!(bytes = self.out.len(), "serialized JSON document");
        Ok(self.out)
    }

    pub fn write_null(&mut self) {
        self.out.push_str("null");
    }

    pub fn write_bool(&mut self, b: bool) {
        self.out.push_str(if b { "true" } else { "false" });
    }

    pub fn write_i64(&mut self, n: i64) {
        self.out.push_str(&n.to_string());
    }

    /// Integers are read back as `i64`, so larger values are refused.
    pub fn write_u64(&mut self, n: u64) -> Result<()> {
        let n = i64::try_from(n).map_err(|_| {
            JsonError::UnsupportedType(format!("integer {n} exceeds the i64 range"))
        })?;
        self.write_i64(n);
        Ok(())
    }

    pub fn write_f64(&mut self, f: f64) -> Result<()> {
        if !f.is_finite() {
            return Err(JsonError::UnsupportedType(format!("non-finite float {f}")));
        }
        self.out.push_str(&float_text(f.to_string()));
        Ok(())
    }

    pub fn write_f32(&mut self, f: f32) -> Result<()> {
        if !f.is_finite() {
            return Err(JsonError::UnsupportedType(format!("non-finite float {f}")));
        }
        self.out.push_str(&float_text(f.to_string()));
        Ok(())
    }

    pub fn write_str(&mut self, s: &str) {
        write_escaped(&mut self.out, s);
    }

    pub fn write_value(&mut self, value: &Value) -> Result<()> {
        match value {
            Value::Null => self.write_null(),
            Value::Bool(b) => self.write_bool(*b),
            Value::Integer(n) => self.write_i64(*n),
            Value::Float(f) => self.write_f64(*f)?,
            Value::String(s) => self.write_str(s),
            Value::Object(map) => self.write_object(map)?,
            Value::Array(items) => self.write_array(items)?,
        }
        Ok(())
    }

    /// Write `[a,b,...]`.
    pub fn write_array<'v, T, I>(&mut self, items: I) -> Result<()>
    where
        T: ToJson + ?Sized + 'v,
        I: IntoIterator<Item = &'v T>,
    {
        self.out.push('[');
        for (i, item) in items.into_iter().enumerate() {
            if i > 0 {
                self.out.push(',');
            }
            item.write_json(self)?;
        }
        self.out.push(']');
        Ok(())
    }

    /// Write `{"k":v,...}` in iteration order.
    pub fn write_object<'v, K, T, I>(&mut self, members: I) -> Result<()>
    where
        K: AsRef<str> + 'v,
        T: ToJson + ?Sized + 'v,
        I: IntoIterator<Item = (&'v K, &'v T)>,
    {
        self.out.push('{');
        for (i, (key, value)) in members.into_iter().enumerate() {
            if i > 0 {
                self.out.push(',');
            }
            self.write_key(key.as_ref());
            value.write_json(self)?;
        }
        self.out.push('}');
        Ok(())
    }

    /// Write a registered record as an object, properties in cache order.
    pub fn write_record<T: Record>(&mut self, record: &T) -> Result<()> {
        self.guard.enter(record)?;
        let entry = self.cache.entry::<T>();
        self.out.push('{');
        for (i, property) in entry.properties().iter().enumerate() {
            if i > 0 {
                self.out.push(',');
            }
            self.write_key(property.name());
            property.get(record).write_json(self)?;
        }
        self.out.push('}');
        self.guard.exit(record);
        Ok(())
    }

    fn write_key(&mut self, key: &str) {
        write_escaped(&mut self.out, key);
        self.out.push(':');
    }
}

/// Append `s` as a quoted JSON string.
pub fn write_escaped(out: &mut String, s: &str) {
    out.reserve(s.len() + 2);
    out.push('"');
    for ch in s.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(ch),
        }
    }
    out.push('"');
}

/// `Display` output for floats never uses an exponent; a whole number like
/// `30` gets a `.0` so it is not read back as an integer.
pub(crate) fn float_text(mut text: String) -> String {
    if !text.contains('.') {
        text.push_str(".0");
    }
    text
}

impl ToJson for Value {
    fn write_json(&self, ser: &mut Serializer<'_>) -> Result<()> {
        ser.write_value(self)
    }
}

impl ToJson for bool {
    fn write_json(&self, ser: &mut Serializer<'_>) -> Result<()> {
        ser.write_bool(*self);
        Ok(())
    }

    fn declared_kind() -> Option<Kind> {
        Some(Kind::Bool)
    }
}

macro_rules! to_json_signed {
    ($($ty:ty),*) => {
        $(
            impl ToJson for $ty {
                fn write_json(&self, ser: &mut Serializer<'_>) -> Result<()> {
                    ser.write_i64(*self as i64);
                    Ok(())
                }

                fn declared_kind() -> Option<Kind> {
                    Some(Kind::Integer)
                }
            }
        )*
    };
}

macro_rules! to_json_unsigned {
    ($($ty:ty),*) => {
        $(
            impl ToJson for $ty {
                fn write_json(&self, ser: &mut Serializer<'_>) -> Result<()> {
                    ser.write_u64(*self as u64)
                }

                fn declared_kind() -> Option<Kind> {
                    Some(Kind::Integer)
                }
            }
        )*
    };
}

to_json_signed!(i8, i16, i32, i64, isize);
to_json_unsigned!(u8, u16, u32, u64, usize);

impl ToJson for f32 {
    fn write_json(&self, ser: &mut Serializer<'_>) -> Result<()> {
        ser.write_f32(*self)
    }

    fn declared_kind() -> Option<Kind> {
        Some(Kind::Float)
    }
}

impl ToJson for f64 {
    fn write_json(&self, ser: &mut Serializer<'_>) -> Result<()> {
        ser.write_f64(*self)
    }

    fn declared_kind() -> Option<Kind> {
        Some(Kind::Float)
    }
}

impl ToJson for str {
    fn write_json(&self, ser: &mut Serializer<'_>) -> Result<()> {
        ser.write_str(self);
        Ok(())
    }
}

impl ToJson for String {
    fn write_json(&self, ser: &mut Serializer<'_>) -> Result<()> {
        ser.write_str(self);
        Ok(())
    }

    fn declared_kind() -> Option<Kind> {
        Some(Kind::String)
    }
}

impl ToJson for char {
    fn write_json(&self, ser: &mut Serializer<'_>) -> Result<()> {
        ser.write_str(self.encode_utf8(&mut [0; 4]));
        Ok(())
    }

    fn declared_kind() -> Option<Kind> {
        Some(Kind::String)
    }
}

impl<T: ToJson> ToJson for Option<T> {
    fn write_json(&self, ser: &mut Serializer<'_>) -> Result<()> {
        match self {
            Some(value) => value.write_json(ser),
            None => {
                ser.write_null();
                Ok(())
            }
        }
    }

    fn is_absent(&self) -> bool {
        self.is_none()
    }

    fn declared_kind() -> Option<Kind> {
        T::declared_kind()
    }
}

impl<T: ToJson> ToJson for [T] {
    fn write_json(&self, ser: &mut Serializer<'_>) -> Result<()> {
        ser.write_array(self)
    }
}

impl<T: ToJson> ToJson for Vec<T> {
    fn write_json(&self, ser: &mut Serializer<'_>) -> Result<()> {
        ser.write_array(self)
    }

    fn declared_kind() -> Option<Kind> {
        Some(Kind::Array)
    }
}

impl<T: ToJson, S> ToJson for IndexMap<String, T, S> {
    fn write_json(&self, ser: &mut Serializer<'_>) -> Result<()> {
        ser.write_object(self)
    }

    fn declared_kind() -> Option<Kind> {
        Some(Kind::Object)
    }
}

impl<T: ToJson> ToJson for BTreeMap<String, T> {
    fn write_json(&self, ser: &mut Serializer<'_>) -> Result<()> {
        ser.write_object(self)
    }

    fn declared_kind() -> Option<Kind> {
        Some(Kind::Object)
    }
}

impl<T: ToJson + ?Sized> ToJson for &T {
    fn write_json(&self, ser: &mut Serializer<'_>) -> Result<()> {
        (**self).write_json(ser)
    }

    fn is_absent(&self) -> bool {
        (**self).is_absent()
    }
}

impl<T: ToJson + ?Sized> ToJson for Box<T> {
    fn write_json(&self, ser: &mut Serializer<'_>) -> Result<()> {
        (**self).write_json(ser)
    }

    fn is_absent(&self) -> bool {
        (**self).is_absent()
    }
}

impl<T: ToJson + ?Sized> ToJson for Rc<T> {
    fn write_json(&self, ser: &mut Serializer<'_>) -> Result<()> {
        (**self).write_json(ser)
    }

    fn is_absent(&self) -> bool {
        (**self).is_absent()
    }
}

impl<T: ToJson + ?Sized> ToJson for Arc<T> {
    fn write_json(&self, ser: &mut Serializer<'_>) -> Result<()> {
        (**self).write_json(ser)
    }

    fn is_absent(&self) -> bool {
        (**self).is_absent()
    }
}

impl<T: ToJson + ?Sized> ToJson for RefCell<T> {
    fn write_json(&self, ser: &mut Serializer<'_>) -> Result<()> {
        let inner = self.try_borrow().map_err(|_| {
            JsonError::UnsupportedType(format!(
                "RefCell<{}> is mutably borrowed",
                std::any::type_name::<T>()
            ))
        })?;
        inner.write_json(ser)
    }
}
