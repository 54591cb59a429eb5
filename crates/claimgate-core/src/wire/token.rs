//! Strict string tokens.
//!
//! Every string that crosses the wire boundary passes through here. Nothing is
//! ever trimmed or normalized: the exact input is preserved or rejected.
//!
//! Checks run in a fixed order and the first failure wins:
//!
//! 1. JSON type must be string
//! 2. non-empty
//! 3. no invisible code points (before whitespace, since NBSP is both)
//! 4. not whitespace-only
//! 5. no leading/trailing whitespace
//! 6. ASCII only
//! 7. identifiers only: no internal whitespace

use std::borrow::Borrow;
use std::fmt;

use serde::Serialize;
use serde_json::Value;

use super::error::WireError;

/// Code points that render as nothing (or as a plain space) and are used to
/// smuggle near-duplicates of valid tokens.
pub const INVISIBLE_CHARS: [char; 6] = [
    '\u{200B}', // zero-width space
    '\u{00A0}', // no-break space
    '\u{FEFF}', // byte order mark
    '\u{2060}', // word joiner
    '\u{200C}', // zero-width non-joiner
    '\u{200D}', // zero-width joiner
];

/// Which rule set a token is held to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenProfile {
    /// Ids and references: no whitespace anywhere.
    Identifier,
    /// Statements, notes, reasons: internal whitespace allowed.
    FreeText,
}

/// A string that passed the token parser.
///
/// The field is private; a `Token` can only be obtained through
/// [`Token::parse`], [`Token::identifier`] or the free-text variants.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Token(String);

impl Token {
    /// Parse an identifier token from a raw wire value.
    pub fn parse(raw: &Value, field: &str) -> Result<Self, WireError> {
        parse_token(raw, field, TokenProfile::Identifier)
    }

    /// Parse a free-text token from a raw wire value.
    pub fn parse_free_text(raw: &Value, field: &str) -> Result<Self, WireError> {
        parse_token(raw, field, TokenProfile::FreeText)
    }

    /// Validate an already-typed string as an identifier.
    pub fn identifier(value: impl Into<String>, field: &str) -> Result<Self, WireError> {
        let value = value.into();
        check_token(&value, field, TokenProfile::Identifier)?;
        Ok(Self(value))
    }

    /// Validate an already-typed string as free text.
    pub fn free_text(value: impl Into<String>, field: &str) -> Result<Self, WireError> {
        let value = value.into();
        check_token(&value, field, TokenProfile::FreeText)?;
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Token {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<str> for Token {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Token {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Parse a raw wire value into a [`Token`] under the given profile.
pub fn parse_token(raw: &Value, field: &str, profile: TokenProfile) -> Result<Token, WireError> {
    let value = expect_str(raw, field)?;
    check_token(value, field, profile)?;
    Ok(Token(value.to_string()))
}

/// Run the token rules over an already-typed string.
pub fn check_token(value: &str, field: &str, profile: TokenProfile) -> Result<(), WireError> {
    if value.is_empty() {
        return Err(WireError::Empty {
            field: field.to_string(),
        });
    }

    check_invisible(value, field)?;

    if value.chars().all(char::is_whitespace) {
        return Err(WireError::WhitespaceOnly {
            field: field.to_string(),
            value: value.to_string(),
        });
    }

    if value.trim() != value {
        return Err(WireError::EdgeWhitespace {
            field: field.to_string(),
            value: value.to_string(),
        });
    }

    check_ascii(value, field)?;

    if profile == TokenProfile::Identifier && value.chars().any(char::is_whitespace) {
        return Err(WireError::InternalWhitespace {
            field: field.to_string(),
            value: value.to_string(),
        });
    }

    Ok(())
}

/// Free-text rules for fields whose blankness is judged later.
///
/// Empty and whitespace-only values pass; invisible, padded or non-ASCII
/// text does not.
pub fn check_blankable_text(value: &str, field: &str) -> Result<(), WireError> {
    match check_token(value, field, TokenProfile::FreeText) {
        Err(WireError::Empty { .. } | WireError::WhitespaceOnly { .. }) => Ok(()),
        result => result,
    }
}

/// Require a JSON string, reporting the actual JSON type otherwise.
pub fn expect_str<'a>(raw: &'a Value, field: &str) -> Result<&'a str, WireError> {
    match raw {
        Value::String(s) => Ok(s),
        other => Err(WireError::TypeMismatch {
            field: field.to_string(),
            expected: "string",
            actual: json_type_name(other),
        }),
    }
}

/// JSON type name used in type-mismatch messages.
pub fn json_type_name(raw: &Value) -> &'static str {
    match raw {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// First invisible code point in `value`, if any.
pub fn find_invisible(value: &str) -> Option<char> {
    value.chars().find(|c| INVISIBLE_CHARS.contains(c))
}

pub(crate) fn check_invisible(value: &str, field: &str) -> Result<(), WireError> {
    match find_invisible(value) {
        Some(c) => Err(WireError::Invisible {
            field: field.to_string(),
            value: value.to_string(),
            codepoint: c as u32,
        }),
        None => Ok(()),
    }
}

pub(crate) fn check_ascii(value: &str, field: &str) -> Result<(), WireError> {
    if value.is_ascii() {
        Ok(())
    } else {
        Err(WireError::NonAscii {
            field: field.to_string(),
            value: value.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn category(raw: Value, profile: TokenProfile) -> &'static str {
        parse_token(&raw, "id", profile).unwrap_err().category()
    }

    #[test]
    fn test_accepts_exact_ascii_token() {
        let token = Token::parse(&json!("evidence-001"), "id").unwrap();
        assert_eq!(token.as_str(), "evidence-001");
        assert_eq!(token, "evidence-001");
    }

    #[test]
    fn test_rejects_non_string_types() {
        for (raw, actual) in [
            (json!(null), "null"),
            (json!(true), "boolean"),
            (json!(42), "number"),
            (json!(1.5), "number"),
            (json!(["a"]), "array"),
            (json!({"a": "b"}), "object"),
        ] {
            let err = Token::parse(&raw, "id").unwrap_err();
            assert_eq!(
                err,
                WireError::TypeMismatch {
                    field: "id".to_string(),
                    expected: "string",
                    actual,
                }
            );
        }
    }

    #[test]
    fn test_rejects_empty() {
        assert_eq!(category(json!(""), TokenProfile::Identifier), "EMPTY_VALUE");
        assert_eq!(category(json!(""), TokenProfile::FreeText), "EMPTY_VALUE");
    }

    #[test]
    fn test_rejects_whitespace_only() {
        for raw in ["   ", "\t", "\n", " \r\n "] {
            assert_eq!(
                category(json!(raw), TokenProfile::Identifier),
                "WHITESPACE_ONLY"
            );
        }
    }

    #[test]
    fn test_rejects_edge_whitespace_without_trimming() {
        for raw in [" ev-1", "ev-1 ", "\tev-1", "ev-1\t", "ev-1\n", "\rev-1"] {
            assert_eq!(
                category(json!(raw), TokenProfile::Identifier),
                "EDGE_WHITESPACE"
            );
            assert_eq!(
                category(json!(raw), TokenProfile::FreeText),
                "EDGE_WHITESPACE"
            );
        }
    }

    #[test]
    fn test_rejects_each_invisible_code_point() {
        for c in INVISIBLE_CHARS {
            let raw = format!("ev{c}1");
            let err = Token::parse(&json!(raw), "id").unwrap_err();
            assert_eq!(
                err,
                WireError::Invisible {
                    field: "id".to_string(),
                    value: raw.clone(),
                    codepoint: c as u32,
                }
            );
        }
    }

    #[test]
    fn test_invisible_checked_before_whitespace() {
        // NBSP alone is whitespace-only by Unicode rules, but it is reported
        // as invisible.
        assert_eq!(
            category(json!("\u{00A0}"), TokenProfile::Identifier),
            "INVISIBLE_CHARACTER"
        );
        assert_eq!(
            category(json!(" ev-1\u{200B}"), TokenProfile::Identifier),
            "INVISIBLE_CHARACTER"
        );
    }

    #[test]
    fn test_rejects_non_ascii_confusables() {
        // Greek capital epsilon in place of E
        assert_eq!(
            category(json!("DΕRIVED"), TokenProfile::Identifier),
            "NON_ASCII"
        );
        // Cyrillic a
        assert_eq!(
            category(json!("clаim-1"), TokenProfile::FreeText),
            "NON_ASCII"
        );
    }

    #[test]
    fn test_edge_whitespace_reported_before_non_ascii() {
        assert_eq!(
            category(json!("é "), TokenProfile::Identifier),
            "EDGE_WHITESPACE"
        );
    }

    #[test]
    fn test_internal_whitespace_depends_on_profile() {
        for raw in ["ev 1", "ev\t1", "ev\n1", "ev\r1"] {
            assert_eq!(
                category(json!(raw), TokenProfile::Identifier),
                "INTERNAL_WHITESPACE"
            );
            let token = parse_token(&json!(raw), "statement", TokenProfile::FreeText).unwrap();
            assert_eq!(token.as_str(), raw);
        }
    }

    #[test]
    fn test_identifier_from_typed_string() {
        assert!(Token::identifier("step-001", "step.id").is_ok());
        let err = Token::identifier(" step-001", "step.id").unwrap_err();
        assert_eq!(err.field(), "step.id");
    }

    proptest! {
        #[test]
        fn prop_accepted_tokens_are_preserved_exactly(raw in "[A-Za-z0-9_.:-]{1,32}") {
            let token = Token::parse(&json!(raw.clone()), "id").unwrap();
            prop_assert_eq!(token.into_inner(), raw);
        }

        #[test]
        fn prop_padding_is_never_trimmed(core in "[a-z0-9-]{1,16}", pad in "[ \t\r\n]{1,3}") {
            let leading = format!("{pad}{core}");
            let trailing = format!("{core}{pad}");
            prop_assert!(Token::parse(&json!(leading), "id").is_err());
            prop_assert!(Token::parse(&json!(trailing), "id").is_err());
        }
    }
}
