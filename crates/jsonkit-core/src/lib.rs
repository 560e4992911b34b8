//! # jsonkit-core
//!
//! A small JSON codec: a closed [`Value`] model, a strict recursive-descent
//! parser, a compact serializer, typed record binding through explicit
//! property registration, shallow schema checks and `Read`/`Write` adapters.
//!
//! ## Quick start
//!
//! ```rust
//! use jsonkit_core::{deserialize, serialize, validate_schema, Kind, Schema, Value};
//!
//! let json = r#"{"Name":"John","Age":30,"IsStudent":false}"#;
//! let value = deserialize(json).unwrap();
//! assert_eq!(value.get("Name").and_then(Value::as_str), Some("John"));
//!
//! // Value → JSON (roundtrip)
//! assert_eq!(serialize(&value).unwrap(), json);
//!
//! let schema = Schema::new()
//!     .field("Name", Kind::String)
//!     .field("Age", Kind::Integer)
//!     .field("IsStudent", Kind::Bool);
//! assert!(validate_schema(json, &schema).unwrap());
//! ```
//!
//! ## Modules
//!
//! - [`value`]: `Value`, `Kind` and the ordered `Map`
//! - [`parser`]: JSON text → `Value`
//! - [`serializer`]: `Value` or any [`ToJson`] type → JSON text
//! - [`property`]: [`Record`] registration and the [`json_record!`] macro
//! - [`cache`]: per-type memoized property lists
//! - [`guard`]: reference-cycle detection during serialization
//! - [`convert`]: coercion of parsed values into field types
//! - [`mapper`]: `Value` → typed record
//! - [`schema`]: shallow field/kind validation
//! - [`stream`]: byte-stream adapters
//! - [`config`]: parser options
//! - [`interop`]: serde and `serde_json::Value` conversions
//! - [`error`]: error types

pub mod cache;
pub mod config;
pub mod convert;
pub mod error;
pub mod guard;
pub mod interop;
pub mod mapper;
pub mod parser;
pub mod property;
pub mod schema;
pub mod serializer;
pub mod stream;
pub mod value;

pub use cache::{PropertyCache, TypeEntry};
pub use config::ParserConfig;
pub use convert::FromJson;
pub use error::{JsonError, ParseError, ParseErrorKind, Result};
pub use guard::CycleGuard;
pub use mapper::{deserialize_typed, from_value, from_value_with};
pub use parser::{deserialize, deserialize_with, Parser};
pub use property::{Property, Record};
pub use schema::{validate_schema, Schema};
pub use serializer::{serialize, Serializer, ToJson};
pub use stream::{deserialize_from_reader, deserialize_typed_from_reader, serialize_to_writer};
pub use value::{Kind, Map, Value};
