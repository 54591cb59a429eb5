//! Closed vocabularies and tagged unions.
//!
//! Matching is exact and case-sensitive. When a value misses only because of
//! surrounding whitespace or letter case, the rejection says so instead of
//! falling through to the generic "not one of" error.

use serde_json::Value;

use super::error::WireError;
use super::fields::expect_object;
use super::token::{check_ascii, check_invisible, expect_str, Token};

/// Letter case used by every literal of a vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LetterCase {
    Upper,
    Lower,
}

impl LetterCase {
    fn name(self) -> &'static str {
        match self {
            Self::Upper => "uppercase",
            Self::Lower => "lowercase",
        }
    }

    fn fold(self, value: &str) -> String {
        match self {
            Self::Upper => value.to_ascii_uppercase(),
            Self::Lower => value.to_ascii_lowercase(),
        }
    }
}

/// A closed set of wire literals.
pub trait WireEnum: Sized + Copy + 'static {
    /// Every variant, in declaration order.
    const VARIANTS: &'static [Self];

    /// Letter case of the literals.
    const CASE: LetterCase;

    /// The exact wire literal of this variant.
    fn literal(self) -> &'static str;

    /// Exact lookup; no folding of any kind.
    fn from_literal(value: &str) -> Option<Self> {
        Self::VARIANTS.iter().copied().find(|v| v.literal() == value)
    }

    /// Human-readable list of the allowed literals.
    fn allowed() -> String {
        Self::VARIANTS
            .iter()
            .map(|v| v.literal())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Parse a raw wire value into a variant of `E`.
pub fn parse_enum<E: WireEnum>(raw: &Value, field: &str) -> Result<E, WireError> {
    let value = expect_str(raw, field)?;
    parse_literal(value, field)
}

/// Parse an already-typed string into a variant of `E`.
pub fn parse_literal<E: WireEnum>(value: &str, field: &str) -> Result<E, WireError> {
    if value.is_empty() {
        return Err(WireError::Empty {
            field: field.to_string(),
        });
    }

    if let Some(variant) = E::from_literal(value) {
        return Ok(variant);
    }

    check_invisible(value, field)?;

    if let Some(variant) = E::from_literal(value.trim()) {
        return Err(WireError::InvalidWhitespace {
            field: field.to_string(),
            value: value.to_string(),
            expected: variant.literal(),
        });
    }

    if let Some(variant) = E::from_literal(&E::CASE.fold(value)) {
        return Err(WireError::WrongCase {
            field: field.to_string(),
            value: value.to_string(),
            expected: variant.literal(),
            case: E::CASE.name(),
        });
    }

    check_ascii(value, field)?;

    Err(WireError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        allowed: E::allowed(),
    })
}

/// Parse a `{kind, value}` object.
///
/// The object must carry exactly the two keys. `kind` goes through
/// [`parse_enum`], `value` through the identifier token parser.
pub fn parse_tagged<K: WireEnum>(raw: &Value, field: &str) -> Result<(K, Token), WireError> {
    let object = expect_object(raw, field)?;

    for key in ["kind", "value"] {
        if !object.contains_key(key) {
            return Err(WireError::MissingField {
                field: format!("{field}.{key}"),
            });
        }
    }

    if let Some(key) = object.keys().find(|k| *k != "kind" && *k != "value") {
        return Err(WireError::UnexpectedField {
            field: field.to_string(),
            key: key.clone(),
        });
    }

    let kind = parse_enum::<K>(&object["kind"], &format!("{field}.kind"))?;
    let value = Token::parse(&object["value"], &format!("{field}.value"))?;
    Ok((kind, value))
}
