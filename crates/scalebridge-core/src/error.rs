//! Error types for the transcoder
//!
//! This module defines all error types used throughout the crate.

use std::fmt::Display;
use thiserror::Error;

/// Result type alias for transcoder operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the transcoder
///
/// Conversion errors are all-or-nothing: a failing nested field aborts the
/// whole call. Each level of nesting wraps the failure in [`Error::InField`]
/// so the caller can see which struct type and binding key failed.
#[derive(Error, Debug)]
pub enum Error {
    /// Encode/decode invoked on a root that is not a struct/object
    #[error("not a struct: expected an object for {target}, found {found}")]
    NotAStruct {
        /// Type the caller asked for
        target: String,
        /// What was found instead
        found: String,
    },

    /// Numeric value does not fit the target width
    #[error("value {value} does not fit in {target}")]
    RangeOverflow {
        /// Offending value, rendered
        value: String,
        /// Target numeric type
        target: String,
    },

    /// A kind has no counterpart on the other side of the conversion
    #[error("unsupported kind: {kind} has no counterpart in {target}")]
    UnsupportedKind {
        /// Source kind
        kind: String,
        /// Target kind or attribute type
        target: String,
    },

    /// No field carries the binding key (used internally to skip a field)
    #[error("no field bound to key '{key}' on {type_name}")]
    FieldNotFound {
        /// Struct type that was searched
        type_name: String,
        /// Binding key
        key: String,
    },

    /// The same binding key is declared on two fields of one struct type
    #[error("binding key '{key}' declared more than once on {type_name}")]
    DuplicateBinding {
        /// Struct type being registered
        type_name: String,
        /// Repeated binding key
        key: String,
    },

    /// Failure inside a nested field or sequence element
    #[error("{location}: {source}")]
    InField {
        /// `Type.key` or `[index]`
        location: String,
        /// Underlying failure
        source: Box<Error>,
    },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// State store-related errors
    #[error("State store error: {0}")]
    StateStore(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a range overflow error
    pub fn range_overflow(value: impl Display, target: impl Display) -> Self {
        Self::RangeOverflow {
            value: value.to_string(),
            target: target.to_string(),
        }
    }

    /// Create an unsupported kind error
    pub fn unsupported_kind(kind: impl Display, target: impl Display) -> Self {
        Self::UnsupportedKind {
            kind: kind.to_string(),
            target: target.to_string(),
        }
    }

    /// Create a "not a struct" error
    pub fn not_a_struct(target: impl Display, found: impl Display) -> Self {
        Self::NotAStruct {
            target: target.to_string(),
            found: found.to_string(),
        }
    }

    /// Create a field-not-found error
    pub fn field_not_found(type_name: impl Display, key: impl Display) -> Self {
        Self::FieldNotFound {
            type_name: type_name.to_string(),
            key: key.to_string(),
        }
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a state store error
    pub fn state_store(msg: impl Into<String>) -> Self {
        Self::StateStore(msg.into())
    }

    /// Create a generic error
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// Wrap this error with the struct type and binding key it occurred in
    pub fn in_field(self, type_name: &str, key: &str) -> Self {
        Self::InField {
            location: format!("{type_name}.{key}"),
            source: Box::new(self),
        }
    }

    /// Wrap this error with the sequence index it occurred at
    pub fn at_index(self, index: usize) -> Self {
        Self::InField {
            location: format!("[{index}]"),
            source: Box::new(self),
        }
    }

    /// The innermost error, with all field/index context stripped
    pub fn root_cause(&self) -> &Error {
        let mut current = self;
        while let Error::InField { source, .. } = current {
            current = source.as_ref();
        }
        current
    }

    /// The chain of locations leading to the root cause, outermost first
    pub fn locations(&self) -> Vec<&str> {
        let mut locations = Vec::new();
        let mut current = self;
        while let Error::InField { location, source } = current {
            locations.push(location.as_str());
            current = source.as_ref();
        }
        locations
    }
}

/// Helper for converting anyhow::Error to our Error type
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}
