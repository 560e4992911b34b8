//! Coercion of parsed values into Rust field types.
//!
//! The object mapper assigns JSON members to record fields through
//! [`FromJson`]. Conversions between primitive kinds widen or narrow:
//!
//! | from \ to | integer | float | bool | string |
//! |---|---|---|---|---|
//! | Integer | range-checked | exact/rounded | `!= 0` | decimal |
//! | Float | round half to even, range-checked | as is | `!= 0.0` | decimal |
//! | Bool | `1` / `0` | `1.0` / `0.0` | as is | `true` / `false` |
//! | String | parsed | parsed | `true`/`false`, any case | as is |
//!
//! Objects only convert to [`Value`]; arrays convert to `Vec<T>` element-wise.

use crate::serializer::float_text;
use crate::value::{Kind, Value};

/// A type that can be built from a parsed `Value`.
pub trait FromJson: Sized {
    /// Convert `value`, describing the problem on failure.
    fn from_json(value: &Value) -> Result<Self, String>;

    /// Whether `null` is a meaningful value for this type. When it is not,
    /// the mapper treats a `null` member like a missing one.
    fn accepts_null() -> bool {
        false
    }
}

fn cannot_convert(value: &Value, target: &str) -> String {
    format!("cannot convert {} to {target}", value.kind())
}

/// Widen any numeric-like value to `i128` before the range check.
fn wide_integer(value: &Value, target: &str) -> Result<i128, String> {
    match value {
        Value::Integer(n) => Ok(i128::from(*n)),
        Value::Float(f) => {
            let rounded = f.round_ties_even();
            if !rounded.is_finite() || rounded < i128::MIN as f64 || rounded > i128::MAX as f64 {
                return Err(format!("{f} is out of range for {target}"));
            }
            Ok(rounded as i128)
        }
        Value::Bool(b) => Ok(i128::from(*b)),
        Value::String(s) => s
            .trim()
            .parse::<i128>()
            .map_err(|_| format!("'{s}' is not a valid {target}")),
        _ => Err(cannot_convert(value, target)),
    }
}

macro_rules! from_json_integer {
    ($($ty:ty),*) => {
        $(
            impl FromJson for $ty {
                fn from_json(value: &Value) -> Result<Self, String> {
                    let target = stringify!($ty);
                    let wide = wide_integer(value, target)?;
                    <$ty>::try_from(wide).map_err(|_| format!("{wide} is out of range for {target}"))
                }
            }
        )*
    };
}

from_json_integer!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl FromJson for f64 {
    fn from_json(value: &Value) -> Result<Self, String> {
        match value {
            Value::Integer(n) => Ok(*n as f64),
            Value::Float(f) => Ok(*f),
            Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
            Value::String(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| format!("'{s}' is not a valid f64")),
            _ => Err(cannot_convert(value, "f64")),
        }
    }
}

impl FromJson for f32 {
    fn from_json(value: &Value) -> Result<Self, String> {
        f64::from_json(value).map(|f| f as f32)
    }
}

impl FromJson for bool {
    fn from_json(value: &Value) -> Result<Self, String> {
        match value {
            Value::Bool(b) => Ok(*b),
            Value::Integer(n) => Ok(*n != 0),
            Value::Float(f) => Ok(*f != 0.0),
            Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" => Ok(true),
                "false" => Ok(false),
                _ => Err(format!("'{s}' is not a valid bool")),
            },
            _ => Err(cannot_convert(value, "bool")),
        }
    }
}

impl FromJson for String {
    fn from_json(value: &Value) -> Result<Self, String> {
        match value {
            Value::String(s) => Ok(s.clone()),
            Value::Integer(n) => Ok(n.to_string()),
            Value::Float(f) => Ok(float_text(f.to_string())),
            Value::Bool(b) => Ok(b.to_string()),
            _ => Err(cannot_convert(value, "string")),
        }
    }
}

impl FromJson for char {
    fn from_json(value: &Value) -> Result<Self, String> {
        let s = String::from_json(value)?;
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(format!("'{s}' is not a single character")),
        }
    }
}

impl<T: FromJson> FromJson for Option<T> {
    fn from_json(value: &Value) -> Result<Self, String> {
        match value {
            Value::Null => Ok(None),
            other => T::from_json(other).map(Some),
        }
    }

    fn accepts_null() -> bool {
        true
    }
}

impl<T: FromJson> FromJson for Vec<T> {
    fn from_json(value: &Value) -> Result<Self, String> {
        let Value::Array(items) = value else {
            return Err(cannot_convert(value, Kind::Array.as_str()));
        };
        items
            .iter()
            .enumerate()
            .map(|(i, item)| T::from_json(item).map_err(|e| format!("element {i}: {e}")))
            .collect()
    }
}

impl FromJson for Value {
    fn from_json(value: &Value) -> Result<Self, String> {
        Ok(value.clone())
    }

    fn accepts_null() -> bool {
        true
    }
}
