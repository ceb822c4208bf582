//! Codec error types.
//!
//! Three failure kinds, all fatal for the call that produced them:
//!
//! - `UnsupportedType`: the declared type has no stored representation
//! - `Parse`: a stored string does not match the expected scalar format
//! - `Decode`: a structured payload is malformed or has the wrong shape
//!
//! Every message names the failing field and its declared type.

use thiserror::Error;

/// Result type for codec operations.
pub type HashResult<T> = Result<T, HashError>;

/// Error converting a record to or from stored fields.
#[derive(Debug, Error)]
pub enum HashError {
    /// The field's declared type cannot be represented as a stored scalar.
    #[error("unsupported type name={field} type={type_name}")]
    UnsupportedType {
        field: &'static str,
        type_name: &'static str,
    },

    /// The stored string does not conform to the expected scalar format.
    #[error("field {field} ({type_name}): expected {expected}, got {raw:?}")]
    Parse {
        field: &'static str,
        type_name: &'static str,
        expected: &'static str,
        raw: String,
    },

    /// A structured payload is malformed or does not match the declared shape.
    #[error("field {field} ({type_name}): {source}")]
    Decode {
        field: &'static str,
        type_name: &'static str,
        source: serde_json::Error,
    },
}

impl HashError {
    /// The declared identifier of the failing field.
    pub fn field(&self) -> &'static str {
        match self {
            HashError::UnsupportedType { field, .. }
            | HashError::Parse { field, .. }
            | HashError::Decode { field, .. } => field,
        }
    }

    /// The declared type of the failing field.
    pub fn type_name(&self) -> &'static str {
        match self {
            HashError::UnsupportedType { type_name, .. }
            | HashError::Parse { type_name, .. }
            | HashError::Decode { type_name, .. } => type_name,
        }
    }
}

/// Conversion failure before field context is known.
///
/// Produced by [`FieldCodec`](super::FieldCodec) implementations, which see a
/// single value; the record-level caller attaches the field name and declared
/// type via [`ValueError::for_field`].
#[derive(Debug, Error)]
pub enum ValueError {
    #[error("unsupported type")]
    Unsupported,

    #[error("expected {expected}, got {raw:?}")]
    Parse { expected: &'static str, raw: String },

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl ValueError {
    /// Parse failure for a value that should have matched `expected`.
    pub fn parse(expected: &'static str, raw: &str) -> Self {
        ValueError::Parse {
            expected,
            raw: raw.to_owned(),
        }
    }

    /// Attaches field context, producing the caller-facing error.
    pub fn for_field(self, field: &'static str, type_name: &'static str) -> HashError {
        match self {
            ValueError::Unsupported => HashError::UnsupportedType { field, type_name },
            ValueError::Parse { expected, raw } => HashError::Parse {
                field,
                type_name,
                expected,
                raw,
            },
            ValueError::Json(source) => HashError::Decode {
                field,
                type_name,
                source,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_message_names_field_and_type() {
        let err = ValueError::Unsupported.for_field("checksum", "i128");
        let msg = err.to_string();
        assert!(msg.contains("checksum"));
        assert!(msg.contains("i128"));
    }

    #[test]
    fn test_parse_message_includes_raw_value() {
        let err = ValueError::parse("integer", "abc").for_field("age", "i64");
        let msg = err.to_string();
        assert!(msg.contains("age"));
        assert!(msg.contains("i64"));
        assert!(msg.contains("abc"));
    }

    #[test]
    fn test_decode_wraps_json_error() {
        let json_err = serde_json::from_str::<i64>("{").unwrap_err();
        let err = ValueError::Json(json_err).for_field("info", "UserInfo");
        assert_eq!(err.field(), "info");
        assert_eq!(err.type_name(), "UserInfo");
        assert!(matches!(err, HashError::Decode { .. }));
    }
}
