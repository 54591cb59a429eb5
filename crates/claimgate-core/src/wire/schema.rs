//! JSON Schema pre-check for report envelopes.
//!
//! Documents are checked against spec/report.schema.json before any record is
//! parsed. The schema only covers the envelope; record fields are left to the
//! wire parsers, which report precise categories.

use std::sync::LazyLock;

use jsonschema::Validator;
use serde_json::Value;
use thiserror::Error;

const REPORT_SCHEMA_JSON: &str = include_str!("../../../../spec/report.schema.json");

/// Compiled on first use. A schema that fails to load refuses every document.
static ENVELOPE: LazyLock<Result<Validator, EnvelopeError>> = LazyLock::new(compile);

/// Why a document envelope was refused.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EnvelopeError {
    #[error("envelope schema unavailable: {0}")]
    Unavailable(String),

    /// `path` is the JSON pointer of the offending value (empty for the root).
    #[error("{message} at {path}")]
    Mismatch { path: String, message: String },
}

fn compile() -> Result<Validator, EnvelopeError> {
    let schema: Value = serde_json::from_str(REPORT_SCHEMA_JSON)
        .map_err(|e| EnvelopeError::Unavailable(format!("schema is not JSON: {e}")))?;
    jsonschema::options()
        .build(&schema)
        .map_err(|e| EnvelopeError::Unavailable(format!("schema does not compile: {e}")))
}

/// Validate a document against the envelope schema, collecting every mismatch.
pub fn validate_envelope(document: &Value) -> Result<(), Vec<EnvelopeError>> {
    let validator = ENVELOPE.as_ref().map_err(|e| vec![e.clone()])?;

    let mismatches: Vec<EnvelopeError> = validator
        .iter_errors(document)
        .map(|e| EnvelopeError::Mismatch {
            path: e.instance_path.to_string(),
            message: e.to_string(),
        })
        .collect();

    if mismatches.is_empty() {
        Ok(())
    } else {
        Err(mismatches)
    }
}

pub fn is_valid_envelope(document: &Value) -> bool {
    ENVELOPE
        .as_ref()
        .is_ok_and(|validator| validator.is_valid(document))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn mismatch_paths(document: &Value) -> Vec<String> {
        validate_envelope(document)
            .unwrap_err()
            .into_iter()
            .map(|err| match err {
                EnvelopeError::Mismatch { path, .. } => path,
                other => panic!("unexpected error: {other:?}"),
            })
            .collect()
    }

    #[test]
    fn test_embedded_schema_compiles() {
        assert!(ENVELOPE.is_ok());
    }

    #[test]
    fn test_minimal_envelope_passes() {
        let value = json!({"claims": [], "steps": [], "evidence": []});
        assert!(validate_envelope(&value).is_ok());
        assert!(is_valid_envelope(&value));
    }

    #[test]
    fn test_report_id_type_only() {
        // Content rules for report_id belong to the token parser.
        for report_id in [json!("run-1"), json!("")] {
            let value = json!({"report_id": report_id, "claims": [], "steps": [], "evidence": []});
            assert!(validate_envelope(&value).is_ok());
        }

        let value = json!({"report_id": 7, "claims": [], "steps": [], "evidence": []});
        assert_eq!(mismatch_paths(&value), vec!["/report_id".to_string()]);
    }

    #[test]
    fn test_missing_collection_fails_at_root() {
        let value = json!({"claims": [], "steps": []});
        assert_eq!(mismatch_paths(&value), vec![String::new()]);
    }

    #[test]
    fn test_non_object_document_fails() {
        for value in [json!(null), json!([]), json!("report")] {
            assert!(!is_valid_envelope(&value));
        }
    }

    #[test]
    fn test_additional_properties_fail() {
        let value = json!({
            "claims": [],
            "steps": [],
            "evidence": [],
            "extracted_by": "agent-7"
        });
        assert!(validate_envelope(&value).is_err());
    }

    #[test]
    fn test_records_must_be_objects() {
        let value = json!({"claims": ["c1"], "steps": [], "evidence": []});
        assert_eq!(mismatch_paths(&value), vec!["/claims/0".to_string()]);

        let err = &validate_envelope(&value).unwrap_err()[0];
        assert!(err.to_string().ends_with("at /claims/0"), "{err}");
    }
}
