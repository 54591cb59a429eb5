//! Evidence records backing claims.
//!
//! An evidence record says what kind of support it is, where it came from,
//! what the check concluded and where the raw artifact lives. The kind of
//! support and the kind of source must agree:
//!
//! | type          | source kind   |
//! |---------------|---------------|
//! | `derivation`  | `step_id`     |
//! | `computation` | `tool_run_id` |
//! | `citation`    | `citation_id` |

use serde::Serialize;

use crate::error::RecordError;
use crate::types::{EvidenceSource, EvidenceStatus, EvidenceType, IndeterminateReason, PayloadRef};
use crate::wire::{check_blankable_text, Token};

/// A validated evidence record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EvidenceObject {
    id: Token,
    #[serde(rename = "type")]
    evidence_type: EvidenceType,
    source: EvidenceSource,
    status: EvidenceStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    status_reason: Option<IndeterminateReason>,
    payload_ref: PayloadRef,
    #[serde(skip_serializing_if = "Option::is_none")]
    notes: Option<String>,
}

impl EvidenceObject {
    pub fn builder(
        id: impl Into<String>,
        evidence_type: EvidenceType,
        source: EvidenceSource,
        status: EvidenceStatus,
        payload_ref: PayloadRef,
    ) -> EvidenceBuilder {
        EvidenceBuilder::new(id, evidence_type, source, status, payload_ref)
    }

    pub fn id(&self) -> &str {
        self.id.as_str()
    }

    pub fn evidence_type(&self) -> EvidenceType {
        self.evidence_type
    }

    pub fn source(&self) -> &EvidenceSource {
        &self.source
    }

    pub fn status(&self) -> EvidenceStatus {
        self.status
    }

    pub fn status_reason(&self) -> Option<IndeterminateReason> {
        self.status_reason
    }

    pub fn payload_ref(&self) -> &PayloadRef {
        &self.payload_ref
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }
}

/// Builder for evidence records with a fluent API.
#[derive(Debug, Clone)]
pub struct EvidenceBuilder {
    id: String,
    evidence_type: EvidenceType,
    source: EvidenceSource,
    status: EvidenceStatus,
    status_reason: Option<IndeterminateReason>,
    payload_ref: PayloadRef,
    notes: Option<String>,
}

impl EvidenceBuilder {
    /// Start building evidence with every required field.
    pub fn new(
        id: impl Into<String>,
        evidence_type: EvidenceType,
        source: EvidenceSource,
        status: EvidenceStatus,
        payload_ref: PayloadRef,
    ) -> Self {
        Self {
            id: id.into(),
            evidence_type,
            source,
            status,
            status_reason: None,
            payload_ref,
            notes: None,
        }
    }

    /// Record why the check was inconclusive.
    pub fn status_reason(mut self, reason: IndeterminateReason) -> Self {
        self.status_reason = Some(reason);
        self
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Build the evidence.
    ///
    /// Checked in order: id, type/source alignment, status/reason pairing,
    /// notes.
    pub fn build(self) -> Result<EvidenceObject, RecordError> {
        let id = Token::identifier(self.id, "evidence.id")?;

        let expected = self.evidence_type.expected_source_kind();
        let actual = self.source.kind();
        if expected != actual {
            return Err(RecordError::SourceKindMismatch {
                evidence_id: id.into_inner(),
                evidence_type: self.evidence_type,
                expected,
                actual,
            });
        }

        match (self.status, self.status_reason) {
            (EvidenceStatus::Indeterminate, None) => {
                return Err(RecordError::IndeterminateMissingReason {
                    evidence_id: id.into_inner(),
                });
            }
            (status @ (EvidenceStatus::Pass | EvidenceStatus::Fail), Some(reason)) => {
                return Err(RecordError::ReasonWithoutIndeterminate {
                    evidence_id: id.into_inner(),
                    status,
                    reason,
                });
            }
            (EvidenceStatus::Indeterminate, Some(_))
            | (EvidenceStatus::Pass | EvidenceStatus::Fail, None) => {}
        }

        if let Some(notes) = &self.notes {
            check_blankable_text(notes, "evidence.notes")?;
        }
        if self
            .notes
            .as_deref()
            .is_some_and(|notes| notes.trim().is_empty())
        {
            return Err(RecordError::EmptyNotes {
                evidence_id: id.into_inner(),
            });
        }

        Ok(EvidenceObject {
            id,
            evidence_type: self.evidence_type,
            source: self.source,
            status: self.status,
            status_reason: self.status_reason,
            payload_ref: self.payload_ref,
            notes: self.notes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PayloadKind, SourceKind};
    use serde_json::json;

    fn source(kind: SourceKind) -> EvidenceSource {
        EvidenceSource::new(kind, "src-001").unwrap()
    }

    fn payload() -> PayloadRef {
        PayloadRef::new(PayloadKind::LogId, "log-001").unwrap()
    }

    fn builder(evidence_type: EvidenceType, kind: SourceKind) -> EvidenceBuilder {
        EvidenceObject::builder(
            "ev-1",
            evidence_type,
            source(kind),
            EvidenceStatus::Pass,
            payload(),
        )
    }

    #[test]
    fn test_aligned_pairs_build() {
        for evidence_type in [
            EvidenceType::Derivation,
            EvidenceType::Computation,
            EvidenceType::Citation,
        ] {
            let evidence = builder(evidence_type, evidence_type.expected_source_kind())
                .build()
                .unwrap();
            assert_eq!(evidence.evidence_type(), evidence_type);
        }
    }

    #[test]
    fn test_derivation_from_tool_run_is_mismatch() {
        let err = builder(EvidenceType::Derivation, SourceKind::ToolRunId)
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            RecordError::SourceKindMismatch {
                evidence_id: "ev-1".to_string(),
                evidence_type: EvidenceType::Derivation,
                expected: SourceKind::StepId,
                actual: SourceKind::ToolRunId,
            }
        );
    }

    #[test]
    fn test_every_misaligned_pair_is_rejected() {
        for evidence_type in [
            EvidenceType::Derivation,
            EvidenceType::Computation,
            EvidenceType::Citation,
        ] {
            for kind in [SourceKind::StepId, SourceKind::ToolRunId, SourceKind::CitationId] {
                let result = builder(evidence_type, kind).build();
                assert_eq!(
                    result.is_ok(),
                    kind == evidence_type.expected_source_kind(),
                    "{evidence_type} / {kind}"
                );
            }
        }
    }

    #[test]
    fn test_indeterminate_requires_reason() {
        let err = EvidenceObject::builder(
            "ev-1",
            EvidenceType::Computation,
            source(SourceKind::ToolRunId),
            EvidenceStatus::Indeterminate,
            payload(),
        )
        .build()
        .unwrap_err();
        assert_eq!(err.category(), "INDETERMINATE_MISSING_REASON");

        let evidence = EvidenceObject::builder(
            "ev-1",
            EvidenceType::Computation,
            source(SourceKind::ToolRunId),
            EvidenceStatus::Indeterminate,
            payload(),
        )
        .status_reason(IndeterminateReason::Timeout)
        .build()
        .unwrap();
        assert_eq!(evidence.status_reason(), Some(IndeterminateReason::Timeout));
    }

    #[test]
    fn test_reason_without_indeterminate_rejected() {
        for status in [EvidenceStatus::Pass, EvidenceStatus::Fail] {
            let err = EvidenceObject::builder(
                "ev-1",
                EvidenceType::Citation,
                source(SourceKind::CitationId),
                status,
                payload(),
            )
            .status_reason(IndeterminateReason::Domain)
            .build()
            .unwrap_err();
            assert_eq!(err.category(), "STATUS_REASON_WITHOUT_INDETERMINATE");
        }
    }

    #[test]
    fn test_alignment_checked_before_status() {
        let err = EvidenceObject::builder(
            "ev-1",
            EvidenceType::Citation,
            source(SourceKind::StepId),
            EvidenceStatus::Indeterminate,
            payload(),
        )
        .build()
        .unwrap_err();
        assert_eq!(err.category(), "EVIDENCE_SOURCE_KIND_MISMATCH");
    }

    #[test]
    fn test_blank_notes_rejected() {
        let err = builder(EvidenceType::Citation, SourceKind::CitationId)
            .notes(" \t ")
            .build()
            .unwrap_err();
        assert_eq!(err.category(), "EVIDENCE_NOTES_EMPTY");

        let err = builder(EvidenceType::Citation, SourceKind::CitationId)
            .notes("\u{FEFF}")
            .build()
            .unwrap_err();
        assert_eq!(err.category(), "INVISIBLE_CHARACTER");
    }

    #[test]
    fn test_serializes_wire_shape() {
        let evidence = builder(EvidenceType::Citation, SourceKind::CitationId)
            .notes("Table 2")
            .build()
            .unwrap();
        assert_eq!(
            serde_json::to_value(&evidence).unwrap(),
            json!({
                "id": "ev-1",
                "type": "citation",
                "source": {"kind": "citation_id", "value": "src-001"},
                "status": "pass",
                "payload_ref": {"kind": "log_id", "value": "log-001"},
                "notes": "Table 2",
            })
        );
    }
}
