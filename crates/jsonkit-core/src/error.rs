//! Error types for parsing, serialization, typed mapping and schema checks.

use thiserror::Error;

use crate::value::Kind;

/// Errors that can occur in any jsonkit operation.
#[derive(Error, Debug)]
pub enum JsonError {
    /// The input text was empty or contained only whitespace.
    #[error("Input error: {0}")]
    Input(String),

    /// A top-level value passed to the serializer was absent (`None`).
    #[error("Cannot serialize an absent value")]
    NullInput,

    /// The input text was not valid JSON. Carries the byte offset.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The value has no JSON representation.
    #[error("Unsupported type: {0}")]
    UnsupportedType(String),

    /// A record was reached again while it was still being serialized.
    #[error("Circular reference detected while serializing `{type_name}`")]
    CircularReference { type_name: &'static str },

    /// The parsed root was not the shape the operation needs.
    #[error("Schema mismatch: expected {expected} at the root, found {found}")]
    SchemaMismatch { expected: Kind, found: Kind },

    /// A field required by a schema was not present.
    #[error("Missing key: {0}")]
    MissingKey(String),

    /// A field was present but held the wrong kind of value.
    #[error("Kind mismatch for `{key}`: expected {expected}, found {actual}")]
    KindMismatch {
        key: String,
        expected: Kind,
        actual: Kind,
    },

    /// A value could not be coerced into a record property's type.
    #[error("Cannot convert property `{property}`: {message}")]
    Conversion { property: String, message: String },

    /// Reading from or writing to a byte sink failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Bytes read from a sink were not valid UTF-8.
    #[error("Invalid UTF-8 input: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

impl JsonError {
    /// Returns the parse error details if this is a syntax failure.
    pub fn as_parse(&self) -> Option<&ParseError> {
        match self {
            JsonError::Parse(err) => Some(err),
            _ => None,
        }
    }

    pub(crate) fn conversion(property: &str, message: impl Into<String>) -> Self {
        JsonError::Conversion {
            property: property.to_string(),
            message: message.into(),
        }
    }
}

/// A syntax error, located by byte offset into the source text.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{kind} at offset {offset}")]
pub struct ParseError {
    pub offset: usize,
    pub kind: ParseErrorKind,
}

impl ParseError {
    pub fn new(offset: usize, kind: ParseErrorKind) -> Self {
        Self { offset, kind }
    }
}

/// What the parser expected and did not get.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseErrorKind {
    #[error("expected '{{' or '[' at the root, found '{0}'")]
    UnexpectedRoot(char),

    #[error("expected ':' after object key")]
    ExpectedColon,

    #[error("invalid escape sequence '\\{0}'")]
    InvalidEscape(String),

    #[error("unexpected end of input")]
    UnexpectedEndOfInput,

    #[error("expected {expected}, found '{found}'")]
    UnexpectedCharacter { expected: &'static str, found: char },

    #[error("invalid number '{0}'")]
    InvalidNumber(String),

    #[error("trailing comma before closing '{0}'")]
    TrailingComma(char),

    #[error("unexpected trailing characters after the root value")]
    TrailingCharacters,

    #[error("nesting deeper than {0} levels")]
    DepthLimitExceeded(usize),
}

/// Convenience alias used throughout jsonkit-core.
pub type Result<T> = std::result::Result<T, JsonError>;
