//! Document-level checks over an assembled report.
//!
//! Each check is independent and reports every violation it finds; nothing
//! short-circuits. Checks always run in the same order:
//!
//! 1. [`StructureCheck`]: ownership and reference integrity
//! 2. [`EvidencePolicyCheck`]: per-claim evidence requirements
//!
//! Within a check, violations are ordered by rule, then by document order.

mod evidence_policy;
mod index;
mod structure;

pub use evidence_policy::EvidencePolicyCheck;
pub use index::ReportIndex;
pub use structure::StructureCheck;

use thiserror::Error;

use crate::error::ErrorClass;
use crate::report::ScientificReport;
use crate::types::ClaimLabel;

/// A whole-document integrity violation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    #[error("Step {step_id} references non-existent claim_id: {claim_id}")]
    DanglingClaimId { step_id: String, claim_id: String },

    #[error("Claim is not referenced by any step: {claim_id}")]
    OrphanClaim { claim_id: String },

    #[error("Claim {claim_id} is owned by multiple steps: {}", .owners.join(", "))]
    DuplicateClaimOwner {
        claim_id: String,
        owners: Vec<String>,
    },

    #[error("Step {step_id} depends on non-existent step_id: {dependency}")]
    DanglingStepDep { step_id: String, dependency: String },

    #[error("Duplicate claim id: {claim_id}")]
    ClaimIdCollision { claim_id: String },

    #[error("Duplicate step id: {step_id}")]
    StepIdCollision { step_id: String },

    #[error("Duplicate evidence id: {evidence_id}")]
    EvidenceIdCollision { evidence_id: String },

    #[error("Claim {claim_id} (label={label}) must have at least one evidence_id")]
    NonSpecMissingEvidence { claim_id: String, label: ClaimLabel },

    #[error("Claim {claim_id} (label=SPECULATIVE) must have non-empty verify_falsify")]
    SpecMissingVerifyFalsify { claim_id: String },

    #[error("Claim {claim_id} evidence_ids[{index}] is empty or whitespace-only")]
    EvidenceIdEmpty { claim_id: String, index: usize },

    #[error("Claim {claim_id} has duplicate evidence_ids: {}", .duplicates.join(", "))]
    EvidenceIdDupInClaim {
        claim_id: String,
        duplicates: Vec<String>,
    },

    #[error("Claim {claim_id} references non-existent evidence_id: {evidence_id}")]
    DanglingEvidenceId {
        claim_id: String,
        evidence_id: String,
    },
}

impl Violation {
    /// Stable machine-readable category token.
    pub fn category(&self) -> &'static str {
        match self {
            Self::DanglingClaimId { .. } => "DANGLING_CLAIM_ID",
            Self::OrphanClaim { .. } => "ORPHAN_CLAIM",
            Self::DuplicateClaimOwner { .. } => "DUPLICATE_CLAIM_OWNER",
            Self::DanglingStepDep { .. } => "DANGLING_STEP_DEP",
            Self::ClaimIdCollision { .. } => "CLAIM_ID_COLLISION",
            Self::StepIdCollision { .. } => "STEP_ID_COLLISION",
            Self::EvidenceIdCollision { .. } => "EVIDENCE_ID_COLLISION",
            Self::NonSpecMissingEvidence { .. } => "NON_SPEC_MISSING_EVIDENCE",
            Self::SpecMissingVerifyFalsify { .. } => "SPEC_MISSING_VERIFY_FALSIFY",
            Self::EvidenceIdEmpty { .. } => "EVIDENCE_ID_EMPTY",
            Self::EvidenceIdDupInClaim { .. } => "EVIDENCE_ID_DUP_IN_CLAIM",
            Self::DanglingEvidenceId { .. } => "DANGLING_EVIDENCE_ID",
        }
    }

    pub fn class(&self) -> ErrorClass {
        ErrorClass::Structural
    }

    pub fn step_id(&self) -> Option<&str> {
        match self {
            Self::DanglingClaimId { step_id, .. }
            | Self::DanglingStepDep { step_id, .. }
            | Self::StepIdCollision { step_id } => Some(step_id),
            _ => None,
        }
    }

    pub fn claim_id(&self) -> Option<&str> {
        match self {
            Self::DanglingClaimId { claim_id, .. }
            | Self::OrphanClaim { claim_id }
            | Self::DuplicateClaimOwner { claim_id, .. }
            | Self::ClaimIdCollision { claim_id }
            | Self::NonSpecMissingEvidence { claim_id, .. }
            | Self::SpecMissingVerifyFalsify { claim_id }
            | Self::EvidenceIdEmpty { claim_id, .. }
            | Self::EvidenceIdDupInClaim { claim_id, .. }
            | Self::DanglingEvidenceId { claim_id, .. } => Some(claim_id),
            _ => None,
        }
    }
}

/// A fixed rule set evaluated against a whole report.
pub trait Check {
    /// Short name used in log output.
    fn name(&self) -> &'static str;

    /// Evaluate the report and return every violation, in reporting order.
    fn evaluate(&self, report: &ScientificReport, index: &ReportIndex) -> Vec<Violation>;
}

/// Run every check in order against `report`.
pub fn run_all(report: &ScientificReport) -> Vec<Violation> {
    let index = ReportIndex::build(report);
    let checks: [&dyn Check; 2] = [&StructureCheck, &EvidencePolicyCheck];

    let mut violations = Vec::new();
    for check in checks {
        let found = check.evaluate(report, &index);
        tracing::debug!(check = check.name(), violations = found.len(), "check complete");
        violations.extend(found);
    }
    violations
}
