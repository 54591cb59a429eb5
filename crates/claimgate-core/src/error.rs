//! Error types and the reporting record they all render to.
//!
//! Every error exposes a stable `category()` token. Human-readable text comes
//! from `Display` and is only produced at the reporting boundary
//! ([`ErrorRecord`]); nothing ever parses it back.

use serde::Serialize;
use thiserror::Error;

use crate::checks::Violation;
use crate::types::{EvidenceStatus, EvidenceType, IndeterminateReason, SourceKind};
use crate::wire::{EnvelopeError, WireError};

/// Broad class of a defect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorClass {
    /// Wrong JSON type for a field
    Type,
    /// Right type, invalid value
    Value,
    /// Individually valid fields that disagree with each other
    Alignment,
    /// Whole-document graph violation
    Structural,
}

/// The reporting shape shared by every error: `{category, message, step_id?, claim_id?}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorRecord {
    pub category: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub claim_id: Option<String>,
}

impl From<&WireError> for ErrorRecord {
    fn from(err: &WireError) -> Self {
        Self {
            category: err.category().to_string(),
            message: err.to_string(),
            step_id: None,
            claim_id: None,
        }
    }
}

impl From<&Violation> for ErrorRecord {
    fn from(violation: &Violation) -> Self {
        Self {
            category: violation.category().to_string(),
            message: violation.to_string(),
            step_id: violation.step_id().map(str::to_string),
            claim_id: violation.claim_id().map(str::to_string),
        }
    }
}

impl From<&RecordError> for ErrorRecord {
    fn from(err: &RecordError) -> Self {
        Self {
            category: err.category().to_string(),
            message: err.to_string(),
            step_id: err.step_id().map(str::to_string),
            claim_id: err.claim_id().map(str::to_string),
        }
    }
}

/// A record failed its construction-time invariants.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error(transparent)]
    Field(#[from] WireError),

    #[error("Claim {claim_id}: statement must be non-empty after trimming whitespace")]
    EmptyStatement { claim_id: String },

    #[error("Claim {claim_id}: span start {start} is after span end {end}")]
    InvalidSpan {
        claim_id: String,
        start: usize,
        end: usize,
    },

    #[error("Step {step_id}: claim_ids cannot be empty")]
    EmptyClaimIds { step_id: String },

    #[error("Step {step_id}: duplicate claim_ids within step: {}", .duplicates.join(", "))]
    DuplicateClaimInStep {
        step_id: String,
        duplicates: Vec<String>,
    },

    #[error("Step {step_id}: status INDETERMINATE requires non-empty status_reason")]
    StepMissingReason { step_id: String },

    #[error("Evidence {evidence_id}: evidence_type={evidence_type} requires source.kind={expected}, got {actual}")]
    SourceKindMismatch {
        evidence_id: String,
        evidence_type: EvidenceType,
        expected: SourceKind,
        actual: SourceKind,
    },

    #[error("Evidence {evidence_id}: status indeterminate requires status_reason")]
    IndeterminateMissingReason { evidence_id: String },

    #[error("Evidence {evidence_id}: status_reason={reason} is only allowed when status is indeterminate (got {status})")]
    ReasonWithoutIndeterminate {
        evidence_id: String,
        status: EvidenceStatus,
        reason: IndeterminateReason,
    },

    #[error("Evidence {evidence_id}: notes must be non-empty after trimming whitespace")]
    EmptyNotes { evidence_id: String },
}

impl RecordError {
    pub fn category(&self) -> &'static str {
        match self {
            Self::Field(err) => err.category(),
            Self::EmptyStatement { .. } => "EMPTY_STATEMENT",
            Self::InvalidSpan { .. } => "INVALID_CLAIM_SPAN",
            Self::EmptyClaimIds { .. } => "EMPTY_CLAIM_IDS",
            Self::DuplicateClaimInStep { .. } => "DUPLICATE_CLAIM_IN_STEP",
            Self::StepMissingReason { .. } => "STEP_INDETERMINATE_MISSING_REASON",
            Self::SourceKindMismatch { .. } => "EVIDENCE_SOURCE_KIND_MISMATCH",
            Self::IndeterminateMissingReason { .. } => "INDETERMINATE_MISSING_REASON",
            Self::ReasonWithoutIndeterminate { .. } => "STATUS_REASON_WITHOUT_INDETERMINATE",
            Self::EmptyNotes { .. } => "EVIDENCE_NOTES_EMPTY",
        }
    }

    pub fn class(&self) -> ErrorClass {
        match self {
            Self::Field(err) => err.class(),
            Self::EmptyStatement { .. }
            | Self::InvalidSpan { .. }
            | Self::EmptyClaimIds { .. }
            | Self::DuplicateClaimInStep { .. }
            | Self::EmptyNotes { .. } => ErrorClass::Value,
            Self::StepMissingReason { .. }
            | Self::SourceKindMismatch { .. }
            | Self::IndeterminateMissingReason { .. }
            | Self::ReasonWithoutIndeterminate { .. } => ErrorClass::Alignment,
        }
    }

    pub fn step_id(&self) -> Option<&str> {
        match self {
            Self::EmptyClaimIds { step_id }
            | Self::DuplicateClaimInStep { step_id, .. }
            | Self::StepMissingReason { step_id } => Some(step_id),
            _ => None,
        }
    }

    pub fn claim_id(&self) -> Option<&str> {
        match self {
            Self::EmptyStatement { claim_id } | Self::InvalidSpan { claim_id, .. } => {
                Some(claim_id)
            }
            _ => None,
        }
    }
}

/// A document could not be assembled from its records.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReportError {
    #[error("report assembly failed: {}", render_all(.0))]
    IdCollision(Vec<Violation>),
}

impl ReportError {
    pub fn violations(&self) -> &[Violation] {
        match self {
            Self::IdCollision(violations) => violations,
        }
    }
}

fn render_all(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| format!("[{}] {}", v.category(), v))
        .collect::<Vec<_>>()
        .join("; ")
}

fn render_envelope(errors: &[EnvelopeError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Errors that can occur while turning raw input into a [`crate::ScientificReport`].
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Report envelope failed schema validation: {}", render_envelope(.0))]
    Schema(Vec<EnvelopeError>),

    #[error(transparent)]
    Field(#[from] WireError),

    #[error("{path}: {source}")]
    Record { path: String, source: RecordError },

    #[error(transparent)]
    Assembly(#[from] ReportError),
}

impl IngestError {
    /// Render this failure as reporting records.
    pub fn records(&self) -> Vec<ErrorRecord> {
        match self {
            Self::Json(err) => vec![ErrorRecord {
                category: "MALFORMED_INPUT".to_string(),
                message: err.to_string(),
                step_id: None,
                claim_id: None,
            }],
            Self::Yaml(err) => vec![ErrorRecord {
                category: "MALFORMED_INPUT".to_string(),
                message: err.to_string(),
                step_id: None,
                claim_id: None,
            }],
            Self::Schema(errors) => errors
                .iter()
                .map(|err| ErrorRecord {
                    category: "SCHEMA_VIOLATION".to_string(),
                    message: err.to_string(),
                    step_id: None,
                    claim_id: None,
                })
                .collect(),
            Self::Field(err) => vec![ErrorRecord::from(err)],
            Self::Record { path, source } => {
                let mut record = ErrorRecord::from(source);
                record.message = format!("{path}: {}", record.message);
                vec![record]
            }
            Self::Assembly(err) => err.violations().iter().map(ErrorRecord::from).collect(),
        }
    }
}
