//! Closed vocabularies, tagged unions and evaluation result types.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::checks::Violation;
use crate::error::ErrorRecord;
use crate::integrity::IntegrityAssessment;
use crate::wire::{parse_literal, LetterCase, Token, WireEnum, WireError};

macro_rules! wire_enum_impls {
    ($ty:ty, $field:literal) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.literal())
            }
        }

        impl FromStr for $ty {
            type Err = WireError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                parse_literal(s, $field)
            }
        }
    };
}

/// Epistemic basis of a claim. Exactly four variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClaimLabel {
    /// Derived through logical or mathematical steps
    Derived,
    /// Verified through computation or simulation
    Computed,
    /// Attributed to an external source
    Cited,
    /// Not yet verified
    Speculative,
}

impl ClaimLabel {
    pub fn is_speculative(self) -> bool {
        matches!(self, Self::Speculative)
    }
}

impl WireEnum for ClaimLabel {
    const VARIANTS: &'static [Self] = &[
        Self::Derived,
        Self::Computed,
        Self::Cited,
        Self::Speculative,
    ];
    const CASE: LetterCase = LetterCase::Upper;

    fn literal(self) -> &'static str {
        match self {
            Self::Derived => "DERIVED",
            Self::Computed => "COMPUTED",
            Self::Cited => "CITED",
            Self::Speculative => "SPECULATIVE",
        }
    }
}

wire_enum_impls!(ClaimLabel, "label");

/// Verification status of a derivation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StepStatus {
    #[default]
    Unchecked,
    Checked,
    Failed,
    /// Inconclusive; requires a status reason
    Indeterminate,
}

impl WireEnum for StepStatus {
    const VARIANTS: &'static [Self] = &[
        Self::Unchecked,
        Self::Checked,
        Self::Failed,
        Self::Indeterminate,
    ];
    const CASE: LetterCase = LetterCase::Upper;

    fn literal(self) -> &'static str {
        match self {
            Self::Unchecked => "UNCHECKED",
            Self::Checked => "CHECKED",
            Self::Failed => "FAILED",
            Self::Indeterminate => "INDETERMINATE",
        }
    }
}

wire_enum_impls!(StepStatus, "status");

/// Kind of support an evidence record provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EvidenceType {
    Derivation,
    Computation,
    Citation,
}

impl EvidenceType {
    /// The only source kind an evidence record of this type may point at.
    pub fn expected_source_kind(self) -> SourceKind {
        match self {
            Self::Derivation => SourceKind::StepId,
            Self::Computation => SourceKind::ToolRunId,
            Self::Citation => SourceKind::CitationId,
        }
    }
}

impl WireEnum for EvidenceType {
    const VARIANTS: &'static [Self] = &[Self::Derivation, Self::Computation, Self::Citation];
    const CASE: LetterCase = LetterCase::Lower;

    fn literal(self) -> &'static str {
        match self {
            Self::Derivation => "derivation",
            Self::Computation => "computation",
            Self::Citation => "citation",
        }
    }
}

wire_enum_impls!(EvidenceType, "type");

/// Outcome recorded on an evidence record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EvidenceStatus {
    Pass,
    Fail,
    Indeterminate,
}

impl WireEnum for EvidenceStatus {
    const VARIANTS: &'static [Self] = &[Self::Pass, Self::Fail, Self::Indeterminate];
    const CASE: LetterCase = LetterCase::Lower;

    fn literal(self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::Fail => "fail",
            Self::Indeterminate => "indeterminate",
        }
    }
}

wire_enum_impls!(EvidenceStatus, "status");

/// Why an evidence check could not reach a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IndeterminateReason {
    Unsupported,
    Domain,
    Singularity,
    Timeout,
    MissingBcIc,
    ToolError,
}

impl WireEnum for IndeterminateReason {
    const VARIANTS: &'static [Self] = &[
        Self::Unsupported,
        Self::Domain,
        Self::Singularity,
        Self::Timeout,
        Self::MissingBcIc,
        Self::ToolError,
    ];
    const CASE: LetterCase = LetterCase::Lower;

    fn literal(self) -> &'static str {
        match self {
            Self::Unsupported => "unsupported",
            Self::Domain => "domain",
            Self::Singularity => "singularity",
            Self::Timeout => "timeout",
            Self::MissingBcIc => "missing_bc_ic",
            Self::ToolError => "tool_error",
        }
    }
}

wire_enum_impls!(IndeterminateReason, "status_reason");

/// Discriminant of [`EvidenceSource`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    StepId,
    ToolRunId,
    CitationId,
}

impl WireEnum for SourceKind {
    const VARIANTS: &'static [Self] = &[Self::StepId, Self::ToolRunId, Self::CitationId];
    const CASE: LetterCase = LetterCase::Lower;

    fn literal(self) -> &'static str {
        match self {
            Self::StepId => "step_id",
            Self::ToolRunId => "tool_run_id",
            Self::CitationId => "citation_id",
        }
    }
}

wire_enum_impls!(SourceKind, "source.kind");

/// Discriminant of [`PayloadRef`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PayloadKind {
    LogId,
    SnippetRef,
    ExpressionRef,
}

impl WireEnum for PayloadKind {
    const VARIANTS: &'static [Self] = &[Self::LogId, Self::SnippetRef, Self::ExpressionRef];
    const CASE: LetterCase = LetterCase::Lower;

    fn literal(self) -> &'static str {
        match self {
            Self::LogId => "log_id",
            Self::SnippetRef => "snippet_ref",
            Self::ExpressionRef => "expression_ref",
        }
    }
}

wire_enum_impls!(PayloadKind, "payload_ref.kind");

/// Where a piece of evidence comes from.
///
/// Serializes as `{"kind": ..., "value": ...}`. The payload is a [`Token`],
/// so a source can only be built from a value that passed the token parser.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum EvidenceSource {
    StepId(Token),
    ToolRunId(Token),
    CitationId(Token),
}

impl EvidenceSource {
    pub fn from_parts(kind: SourceKind, value: Token) -> Self {
        match kind {
            SourceKind::StepId => Self::StepId(value),
            SourceKind::ToolRunId => Self::ToolRunId(value),
            SourceKind::CitationId => Self::CitationId(value),
        }
    }

    /// Build a source from typed parts, validating the value as an identifier.
    pub fn new(kind: SourceKind, value: impl Into<String>) -> Result<Self, WireError> {
        Ok(Self::from_parts(kind, Token::identifier(value, "source.value")?))
    }

    pub fn kind(&self) -> SourceKind {
        match self {
            Self::StepId(_) => SourceKind::StepId,
            Self::ToolRunId(_) => SourceKind::ToolRunId,
            Self::CitationId(_) => SourceKind::CitationId,
        }
    }

    pub fn value(&self) -> &str {
        match self {
            Self::StepId(v) | Self::ToolRunId(v) | Self::CitationId(v) => v.as_str(),
        }
    }
}

/// Pointer to the artifact that backs a piece of evidence.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum PayloadRef {
    LogId(Token),
    SnippetRef(Token),
    ExpressionRef(Token),
}

impl PayloadRef {
    pub fn from_parts(kind: PayloadKind, value: Token) -> Self {
        match kind {
            PayloadKind::LogId => Self::LogId(value),
            PayloadKind::SnippetRef => Self::SnippetRef(value),
            PayloadKind::ExpressionRef => Self::ExpressionRef(value),
        }
    }

    /// Build a payload reference from typed parts, validating the value.
    pub fn new(kind: PayloadKind, value: impl Into<String>) -> Result<Self, WireError> {
        Ok(Self::from_parts(
            kind,
            Token::identifier(value, "payload_ref.value")?,
        ))
    }

    pub fn kind(&self) -> PayloadKind {
        match self {
            Self::LogId(_) => PayloadKind::LogId,
            Self::SnippetRef(_) => PayloadKind::SnippetRef,
            Self::ExpressionRef(_) => PayloadKind::ExpressionRef,
        }
    }

    pub fn value(&self) -> &str {
        match self {
            Self::LogId(v) | Self::SnippetRef(v) | Self::ExpressionRef(v) => v.as_str(),
        }
    }
}

/// Final state of a document evaluation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum State {
    /// Structurally valid and fully supported.
    Finalize { summary: String },
    /// Structurally valid, but the integrity gate refuses to finalize.
    Incomplete { reasons: Vec<String> },
    /// One or more integrity rules are violated.
    Invalid { errors: Vec<ErrorRecord> },
}

/// Result of evaluating a whole document.
#[derive(Debug, Clone, Serialize)]
pub struct Evaluation {
    pub state: State,

    /// Every violation, in reporting order
    #[serde(skip)]
    pub violations: Vec<Violation>,

    pub integrity: IntegrityAssessment,

    pub evaluated_at: DateTime<Utc>,
}

impl Evaluation {
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn can_finalize(&self) -> bool {
        matches!(self.state, State::Finalize { .. })
    }
}
