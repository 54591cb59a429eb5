//! The wire boundary.
//!
//! Untyped input (`serde_json::Value`, or YAML read into the same model)
//! becomes typed records here and nowhere else. Every parser is fail-closed:
//! input that is not exactly right is rejected, never repaired.

mod document;
mod enums;
mod error;
mod fields;
mod schema;
pub(crate) mod token;

pub use document::{parse_claim, parse_evidence, parse_report, parse_step};
pub use enums::{parse_enum, parse_literal, parse_tagged, LetterCase, WireEnum};
pub use error::WireError;
pub use fields::{expect_array, expect_object, parse_array, Fields};
pub use schema::{is_valid_envelope, validate_envelope, EnvelopeError};
pub use token::{
    check_blankable_text, check_token, expect_str, find_invisible, json_type_name, parse_token, Token, TokenProfile,
    INVISIBLE_CHARS,
};
