//! Derivation steps: the units that own claims.

use serde::Serialize;
use uuid::Uuid;

use crate::error::RecordError;
use crate::types::StepStatus;
use std::collections::HashSet;

use crate::wire::{check_blankable_text, Token};

/// A logical unit of a derivation.
///
/// Every step lists at least one claim and never the same claim twice.
/// Whether those claims exist, and whether any other step lists them too, is
/// a document-level question answered by the structure check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DerivationStep {
    id: Token,
    claim_ids: Vec<String>,
    depends_on: Vec<String>,
    status: StepStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    status_reason: Option<String>,
}

impl DerivationStep {
    /// Construct an `UNCHECKED` step with no dependencies.
    pub fn new<I, S>(id: impl Into<String>, claim_ids: I) -> Result<Self, RecordError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        StepBuilder::new(id, claim_ids).build()
    }

    /// Construct a step with a generated id.
    pub fn create<I, S>(claim_ids: I) -> Result<Self, RecordError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Uuid::new_v4().to_string(), claim_ids)
    }

    pub fn builder<I, S>(id: impl Into<String>, claim_ids: I) -> StepBuilder
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        StepBuilder::new(id, claim_ids)
    }

    pub fn id(&self) -> &str {
        self.id.as_str()
    }

    pub fn claim_ids(&self) -> &[String] {
        &self.claim_ids
    }

    pub fn depends_on(&self) -> &[String] {
        &self.depends_on
    }

    pub fn status(&self) -> StepStatus {
        self.status
    }

    pub fn status_reason(&self) -> Option<&str> {
        self.status_reason.as_deref()
    }
}

#[derive(Debug, Clone)]
pub struct StepBuilder {
    id: String,
    claim_ids: Vec<String>,
    depends_on: Vec<String>,
    status: StepStatus,
    status_reason: Option<String>,
}

impl StepBuilder {
    pub fn new<I, S>(id: impl Into<String>, claim_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            claim_ids: claim_ids.into_iter().map(Into::into).collect(),
            depends_on: Vec::new(),
            status: StepStatus::default(),
            status_reason: None,
        }
    }

    pub fn depends_on<I, S>(mut self, step_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.depends_on = step_ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn status(mut self, status: StepStatus) -> Self {
        self.status = status;
        self
    }

    pub fn status_reason(mut self, reason: impl Into<String>) -> Self {
        self.status_reason = Some(reason.into());
        self
    }

    pub fn build(self) -> Result<DerivationStep, RecordError> {
        let id = Token::identifier(self.id, "step.id")?;

        if self.claim_ids.is_empty() {
            return Err(RecordError::EmptyClaimIds {
                step_id: id.into_inner(),
            });
        }

        for (index, claim_id) in self.claim_ids.iter().enumerate() {
            Token::identifier(claim_id.as_str(), &format!("step.claim_ids[{index}]"))?;
        }

        let duplicates = duplicated(&self.claim_ids);
        if !duplicates.is_empty() {
            return Err(RecordError::DuplicateClaimInStep {
                step_id: id.into_inner(),
                duplicates,
            });
        }

        for (index, step_id) in self.depends_on.iter().enumerate() {
            Token::identifier(step_id.as_str(), &format!("step.depends_on[{index}]"))?;
        }
        if let Some(reason) = &self.status_reason {
            check_blankable_text(reason, "step.status_reason")?;
        }

        let has_reason = self
            .status_reason
            .as_deref()
            .is_some_and(|reason| !reason.trim().is_empty());
        if self.status == StepStatus::Indeterminate && !has_reason {
            return Err(RecordError::StepMissingReason {
                step_id: id.into_inner(),
            });
        }

        Ok(DerivationStep {
            id,
            claim_ids: self.claim_ids,
            depends_on: self.depends_on,
            status: self.status,
            status_reason: self.status_reason,
        })
    }
}

/// Values that occur more than once, each listed once in first-repeat order.
fn duplicated(values: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    values
        .iter()
        .filter(|value| !seen.insert(value.as_str()) && reported.insert(value.as_str()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let step = DerivationStep::new("step-001", ["c1", "c2"]).unwrap();
        assert_eq!(step.status(), StepStatus::Unchecked);
        assert!(step.depends_on().is_empty());
        assert_eq!(step.status_reason(), None);
    }

    #[test]
    fn test_empty_claim_ids_rejected() {
        let err = DerivationStep::new("s1", Vec::<String>::new()).unwrap_err();
        assert_eq!(
            err,
            RecordError::EmptyClaimIds {
                step_id: "s1".to_string()
            }
        );
    }

    #[test]
    fn test_duplicate_claim_in_step_lists_duplicates() {
        let err = DerivationStep::new("s1", ["c1", "c2", "c1", "c2", "c1"]).unwrap_err();
        assert_eq!(
            err,
            RecordError::DuplicateClaimInStep {
                step_id: "s1".to_string(),
                duplicates: vec!["c1".to_string(), "c2".to_string()],
            }
        );
    }

    #[test]
    fn test_indeterminate_requires_reason() {
        for reason in [None, Some(""), Some("   ")] {
            let mut builder =
                DerivationStep::builder("s1", ["c1"]).status(StepStatus::Indeterminate);
            if let Some(reason) = reason {
                builder = builder.status_reason(reason);
            }
            assert_eq!(
                builder.build().unwrap_err().category(),
                "STEP_INDETERMINATE_MISSING_REASON"
            );
        }

        let step = DerivationStep::builder("s1", ["c1"])
            .status(StepStatus::Indeterminate)
            .status_reason("solver timed out")
            .build()
            .unwrap();
        assert_eq!(step.status_reason(), Some("solver timed out"));
    }

    #[test]
    fn test_reason_allowed_on_other_statuses() {
        let step = DerivationStep::builder("s1", ["c1"])
            .status(StepStatus::Checked)
            .status_reason("checked by hand")
            .build()
            .unwrap();
        assert_eq!(step.status(), StepStatus::Checked);
    }

    #[test]
    fn test_invalid_id_reported_first() {
        let err = DerivationStep::new("step 1", Vec::<String>::new()).unwrap_err();
        assert_eq!(err.category(), "INTERNAL_WHITESPACE");
    }

    #[test]
    fn test_referenced_ids_must_be_identifiers() {
        let err = DerivationStep::new("s1", ["c1", "c 2"]).unwrap_err();
        assert_eq!(err.category(), "INTERNAL_WHITESPACE");
        assert_eq!(
            err,
            RecordError::Field(crate::wire::WireError::InternalWhitespace {
                field: "step.claim_ids[1]".to_string(),
                value: "c 2".to_string(),
            })
        );

        let err = DerivationStep::builder("s2", ["c3"])
            .depends_on(["s1", ""])
            .build()
            .unwrap_err();
        assert_eq!(err.category(), "EMPTY_VALUE");
    }

    #[test]
    fn test_status_reason_rejects_invisible_text() {
        let err = DerivationStep::builder("s1", ["c1"])
            .status(StepStatus::Indeterminate)
            .status_reason("\u{200B}")
            .build()
            .unwrap_err();
        assert_eq!(err.category(), "INVISIBLE_CHARACTER");
    }

    #[test]
    fn test_duplicates_found_in_long_lists() {
        let mut claim_ids: Vec<String> = (0..5000).map(|i| format!("c{i}")).collect();
        claim_ids.push("c4999".to_string());
        claim_ids.push("c0".to_string());
        let err = DerivationStep::new("s1", claim_ids).unwrap_err();
        assert_eq!(
            err,
            RecordError::DuplicateClaimInStep {
                step_id: "s1".to_string(),
                duplicates: vec!["c4999".to_string(), "c0".to_string()],
            }
        );
    }

    #[test]
    fn test_create_generates_id() {
        let step = DerivationStep::create(["c1"]).unwrap();
        assert!(Uuid::parse_str(step.id()).is_ok());
    }

    #[test]
    fn test_serializes_wire_shape() {
        let step = DerivationStep::builder("s2", ["c3"])
            .depends_on(["s1"])
            .build()
            .unwrap();
        assert_eq!(
            serde_json::to_value(&step).unwrap(),
            serde_json::json!({
                "id": "s2",
                "claim_ids": ["c3"],
                "depends_on": ["s1"],
                "status": "UNCHECKED",
            })
        );
    }
}
