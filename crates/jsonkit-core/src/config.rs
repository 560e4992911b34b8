//! Parser configuration.
//!
//! The defaults give strict, lossless parsing. `ParserConfig` is serde
//! (de)serializable so it can be loaded from a JSON settings file; missing
//! fields fall back to their defaults.
//!
//! ```
//! use jsonkit_core::ParserConfig;
//!
//! let config: ParserConfig = serde_json::from_str(r#"{"allow_trailing_commas":true}"#).unwrap();
//! assert!(config.allow_trailing_commas);
//! assert_eq!(config.max_depth, 128);
//! ```

use serde::{Deserialize, Serialize};

/// Default nesting limit for objects and arrays.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Options that change how text is turned into a `Value`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Accept `,` directly before a closing `}` or `]`.
    pub allow_trailing_commas: bool,
    /// Omit object members whose value is `null` instead of keeping them.
    /// Array elements are never dropped.
    pub drop_null_members: bool,
    /// Maximum nesting of objects and arrays, root included.
    pub max_depth: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            allow_trailing_commas: false,
            drop_null_members: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ParserConfig {
    /// Configuration that mirrors the legacy reader: trailing commas are
    /// tolerated and null-valued object members are dropped.
    pub fn lenient() -> Self {
        Self {
            allow_trailing_commas: true,
            drop_null_members: true,
            ..Self::default()
        }
    }

    pub fn with_trailing_commas(mut self, allow: bool) -> Self {
        self.allow_trailing_commas = allow;
        self
    }

    pub fn with_drop_null_members(mut self, drop: bool) -> Self {
        self.drop_null_members = drop;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}
