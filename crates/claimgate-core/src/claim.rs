//! Claims: labelled assertions made by a report.

use serde::Serialize;
use uuid::Uuid;

use crate::error::RecordError;
use crate::types::ClaimLabel;
use crate::wire::{check_blankable_text, Token};

/// A labelled assertion.
///
/// Fields are private; a `Claim` only exists if every construction rule
/// held. The one mutation allowed afterwards is [`Claim::attach_evidence`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Claim {
    id: Token,
    statement: String,
    label: ClaimLabel,
    #[serde(skip_serializing_if = "Option::is_none")]
    owning_step_id: Option<String>,
    evidence_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    span: Option<(usize, usize)>,
    #[serde(skip_serializing_if = "Option::is_none")]
    verify_falsify: Option<String>,
}

impl Claim {
    /// Construct a claim with no optional fields.
    pub fn new(
        id: impl Into<String>,
        statement: impl Into<String>,
        label: ClaimLabel,
    ) -> Result<Self, RecordError> {
        ClaimBuilder::new(id, statement, label).build()
    }

    /// Construct a claim with a generated id.
    pub fn create(statement: impl Into<String>, label: ClaimLabel) -> Result<Self, RecordError> {
        Self::new(Uuid::new_v4().to_string(), statement, label)
    }

    pub fn builder(
        id: impl Into<String>,
        statement: impl Into<String>,
        label: ClaimLabel,
    ) -> ClaimBuilder {
        ClaimBuilder::new(id, statement, label)
    }

    pub fn id(&self) -> &str {
        self.id.as_str()
    }

    /// The statement exactly as supplied (never trimmed).
    pub fn statement(&self) -> &str {
        &self.statement
    }

    pub fn label(&self) -> ClaimLabel {
        self.label
    }

    pub fn owning_step_id(&self) -> Option<&str> {
        self.owning_step_id.as_deref()
    }

    pub fn evidence_ids(&self) -> &[String] {
        &self.evidence_ids
    }

    pub fn span(&self) -> Option<(usize, usize)> {
        self.span
    }

    pub fn verify_falsify(&self) -> Option<&str> {
        self.verify_falsify.as_deref()
    }

    /// Speculative claims need no evidence; every other label needs at least one reference.
    pub fn is_supported(&self) -> bool {
        match self.label {
            ClaimLabel::Speculative => true,
            ClaimLabel::Derived | ClaimLabel::Computed | ClaimLabel::Cited => {
                !self.evidence_ids.is_empty()
            }
        }
    }

    /// Attach an evidence reference before the report is assembled.
    ///
    /// References are resolved by the evidence policy check, not here.
    pub fn attach_evidence(&mut self, evidence_id: impl Into<String>) {
        self.evidence_ids.push(evidence_id.into());
    }
}

/// Builder for [`Claim`]; all rules are enforced in [`ClaimBuilder::build`].
///
/// Evidence ids are stored as given. Empty, repeated or unresolved ids are
/// evidence policy findings, reported per document.
#[derive(Debug, Clone)]
pub struct ClaimBuilder {
    id: String,
    statement: String,
    label: ClaimLabel,
    owning_step_id: Option<String>,
    evidence_ids: Vec<String>,
    span: Option<(usize, usize)>,
    verify_falsify: Option<String>,
}

impl ClaimBuilder {
    pub fn new(id: impl Into<String>, statement: impl Into<String>, label: ClaimLabel) -> Self {
        Self {
            id: id.into(),
            statement: statement.into(),
            label,
            owning_step_id: None,
            evidence_ids: Vec::new(),
            span: None,
            verify_falsify: None,
        }
    }

    pub fn owning_step(mut self, step_id: impl Into<String>) -> Self {
        self.owning_step_id = Some(step_id.into());
        self
    }

    pub fn evidence_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.evidence_ids = ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn span(mut self, start: usize, end: usize) -> Self {
        self.span = Some((start, end));
        self
    }

    pub fn verify_falsify(mut self, text: impl Into<String>) -> Self {
        self.verify_falsify = Some(text.into());
        self
    }

    pub fn build(self) -> Result<Claim, RecordError> {
        let id = Token::identifier(self.id, "claim.id")?;

        if self.statement.trim().is_empty() {
            return Err(RecordError::EmptyStatement {
                claim_id: id.into_inner(),
            });
        }

        if let Some((start, end)) = self.span {
            if start > end {
                return Err(RecordError::InvalidSpan {
                    claim_id: id.into_inner(),
                    start,
                    end,
                });
            }
        }

        if let Some(owner) = &self.owning_step_id {
            Token::identifier(owner.as_str(), "claim.owning_step_id")?;
        }
        if let Some(text) = &self.verify_falsify {
            check_blankable_text(text, "claim.verify_falsify")?;
        }

        Ok(Claim {
            id,
            statement: self.statement,
            label: self.label,
            owning_step_id: self.owning_step_id,
            evidence_ids: self.evidence_ids,
            span: self.span,
            verify_falsify: self.verify_falsify,
        })
    }
}
