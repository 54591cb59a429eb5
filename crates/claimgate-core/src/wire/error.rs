//! Field-level errors raised at the wire boundary.

use thiserror::Error;

use crate::error::ErrorClass;

/// A type or value error on a single wire field.
///
/// `field` is the full path of the offending value (e.g.
/// `claims[1].evidence_ids[0]`), so the same error can be reported without
/// further context.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WireError {
    #[error("invalid {field}: expected {expected}, got {actual}")]
    TypeMismatch {
        field: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("invalid {field}: missing required field")]
    MissingField { field: String },

    #[error("invalid {field}: unexpected field {key:?}")]
    UnexpectedField { field: String, key: String },

    #[error("invalid {field}: empty string")]
    Empty { field: String },

    #[error("invalid {field}: {value:?} contains invisible unicode character U+{codepoint:04X}")]
    Invisible {
        field: String,
        value: String,
        codepoint: u32,
    },

    #[error("invalid {field}: {value:?} is whitespace-only")]
    WhitespaceOnly { field: String, value: String },

    #[error("invalid {field}: {value:?} has leading/trailing whitespace")]
    EdgeWhitespace { field: String, value: String },

    #[error("invalid {field}: {value:?} contains non-ASCII characters")]
    NonAscii { field: String, value: String },

    #[error("invalid {field}: {value:?} contains internal whitespace")]
    InternalWhitespace { field: String, value: String },

    #[error("invalid {field}: {value:?} has invalid whitespace (expected {expected})")]
    InvalidWhitespace {
        field: String,
        value: String,
        expected: &'static str,
    },

    #[error("invalid {field}: {value:?} must be {case} (expected {expected})")]
    WrongCase {
        field: String,
        value: String,
        expected: &'static str,
        case: &'static str,
    },

    #[error("invalid {field}: {value:?} (must be one of: {allowed}, case-sensitive)")]
    InvalidValue {
        field: String,
        value: String,
        allowed: String,
    },
}

impl WireError {
    /// Stable machine-readable category token.
    pub fn category(&self) -> &'static str {
        match self {
            Self::TypeMismatch { .. } => "TYPE_MISMATCH",
            Self::MissingField { .. } => "MISSING_FIELD",
            Self::UnexpectedField { .. } => "UNEXPECTED_FIELD",
            Self::Empty { .. } => "EMPTY_VALUE",
            Self::Invisible { .. } => "INVISIBLE_CHARACTER",
            Self::WhitespaceOnly { .. } => "WHITESPACE_ONLY",
            Self::EdgeWhitespace { .. } => "EDGE_WHITESPACE",
            Self::NonAscii { .. } => "NON_ASCII",
            Self::InternalWhitespace { .. } => "INTERNAL_WHITESPACE",
            Self::InvalidWhitespace { .. } => "INVALID_WHITESPACE",
            Self::WrongCase { .. } => "WRONG_CASE",
            Self::InvalidValue { .. } => "INVALID_VALUE",
        }
    }

    /// Wrong JSON type is a type error; everything else is a value error.
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::TypeMismatch { .. } => ErrorClass::Type,
            _ => ErrorClass::Value,
        }
    }

    /// Path of the offending field.
    pub fn field(&self) -> &str {
        match self {
            Self::TypeMismatch { field, .. }
            | Self::MissingField { field }
            | Self::UnexpectedField { field, .. }
            | Self::Empty { field }
            | Self::Invisible { field, .. }
            | Self::WhitespaceOnly { field, .. }
            | Self::EdgeWhitespace { field, .. }
            | Self::NonAscii { field, .. }
            | Self::InternalWhitespace { field, .. }
            | Self::InvalidWhitespace { field, .. }
            | Self::WrongCase { field, .. }
            | Self::InvalidValue { field, .. } => field,
        }
    }
}
