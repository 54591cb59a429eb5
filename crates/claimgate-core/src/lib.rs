//! # claimgate-core
//!
//! Fail-closed validation of scientific report documents.
//!
//! A report is a graph of claims (labelled assertions), derivation steps
//! (which own claims) and evidence (which supports claims). This crate
//! answers:
//! - Is every record well-formed?
//! - Does the graph hold together?
//! - May the report be finalized?
//!
//! ## Key Guarantees
//!
//! 1. **Fail-closed**: Input that is not exactly right is rejected, never
//!    trimmed, case-folded or otherwise repaired
//! 2. **Deterministic**: The same document always yields the same violations
//!    in the same order
//! 3. **Exhaustive**: Document-level checks report every violation, not just
//!    the first
//!
//! ## Example
//!
//! ```rust,ignore
//! use claimgate_core::{evaluate, ScientificReport, State};
//!
//! let report = ScientificReport::from_json(&std::fs::read_to_string("report.json")?)?;
//! let evaluation = evaluate(&report);
//!
//! match evaluation.state {
//!     State::Finalize { summary } => println!("FINALIZE: {}", summary),
//!     State::Incomplete { reasons } => println!("INCOMPLETE: {}", reasons.join("\n")),
//!     State::Invalid { errors } => println!("INVALID: {} error(s)", errors.len()),
//! }
//! ```

pub mod checks;
pub mod claim;
pub mod error;
pub mod evidence;
pub mod integrity;
pub mod report;
pub mod step;
pub mod types;
pub mod wire;

// Re-export main types at crate root
pub use checks::{Check, EvidencePolicyCheck, ReportIndex, StructureCheck, Violation};
pub use claim::{Claim, ClaimBuilder};
pub use error::{ErrorClass, ErrorRecord, IngestError, RecordError, ReportError};
pub use evidence::{EvidenceBuilder, EvidenceObject};
pub use integrity::{
    can_finalize, unsupported_rate, ConfigError, Finalization, IntegrityAggregator,
    IntegrityAssessment, IntegrityConfig,
};
pub use report::ScientificReport;
pub use step::{DerivationStep, StepBuilder};
pub use types::{
    ClaimLabel, Evaluation, EvidenceSource, EvidenceStatus, EvidenceType, IndeterminateReason,
    PayloadKind, PayloadRef, SourceKind, State, StepStatus,
};
pub use wire::{parse_report, Token, WireError};

use chrono::Utc;

/// Run every document-level check against `report`.
///
/// Structural violations come first, then evidence policy violations. The
/// result depends only on the report, so validating twice gives the same
/// list.
pub fn validate(report: &ScientificReport) -> Vec<Violation> {
    checks::run_all(report)
}

/// Evaluate a report with the default integrity configuration.
///
/// # Returns
///
/// An `Evaluation` containing:
/// - `state`: FINALIZE, INCOMPLETE, or INVALID
/// - `violations`: Every document-level violation
/// - `integrity`: Claim counts and the finalization decision
/// - `evaluated_at`: Timestamp of evaluation
pub fn evaluate(report: &ScientificReport) -> Evaluation {
    evaluate_with_config(report, &IntegrityConfig::default())
}

/// Evaluate a report with an explicit integrity configuration.
///
/// Any violation makes the report INVALID. Otherwise the integrity gate
/// decides between FINALIZE and INCOMPLETE.
pub fn evaluate_with_config(report: &ScientificReport, config: &IntegrityConfig) -> Evaluation {
    let violations = validate(report);
    let integrity = IntegrityAggregator::new(*config).assess(report.claims());

    let state = if !violations.is_empty() {
        State::Invalid {
            errors: violations.iter().map(ErrorRecord::from).collect(),
        }
    } else if !integrity.finalization.can_finalize {
        State::Incomplete {
            reasons: integrity.finalization.reasons.clone(),
        }
    } else {
        State::Finalize {
            summary: summarize(report),
        }
    };

    tracing::info!(
        report_id = report.report_id(),
        violations = violations.len(),
        state = state_name(&state),
        "report evaluated"
    );

    Evaluation {
        state,
        violations,
        integrity,
        evaluated_at: Utc::now(),
    }
}

fn state_name(state: &State) -> &'static str {
    match state {
        State::Finalize { .. } => "FINALIZE",
        State::Incomplete { .. } => "INCOMPLETE",
        State::Invalid { .. } => "INVALID",
    }
}

fn summarize(report: &ScientificReport) -> String {
    let speculative = report
        .claims()
        .iter()
        .filter(|c| c.label().is_speculative())
        .count();
    format!(
        "{} claim(s) across {} step(s) backed by {} evidence record(s); {} SPECULATIVE",
        report.claims().len(),
        report.steps().len(),
        report.evidence().len(),
        speculative
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_report_finalizes() {
        let report = ScientificReport::from_yaml(
            r#"
claims:
  - id: c1
    statement: "Energy is conserved"
    label: DERIVED
    evidence_ids: [ev-1]
steps:
  - id: s1
    claim_ids: [c1]
    status: CHECKED
evidence:
  - id: ev-1
    type: derivation
    source: {kind: step_id, value: s1}
    status: pass
    payload_ref: {kind: expression_ref, value: expr-1}
"#,
        )
        .unwrap();

        let evaluation = evaluate(&report);
        assert!(evaluation.is_valid());
        assert!(evaluation.can_finalize());
        match evaluation.state {
            State::Finalize { summary } => assert!(summary.starts_with("1 claim(s)")),
            other => panic!("expected FINALIZE, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_report_is_incomplete() {
        let report = ScientificReport::new(vec![], vec![], vec![]).unwrap();
        let evaluation = evaluate(&report);
        assert!(evaluation.is_valid());
        match &evaluation.state {
            State::Incomplete { reasons } => {
                assert_eq!(reasons[0], "No claims extracted - cannot finalize");
            }
            other => panic!("expected INCOMPLETE, got {other:?}"),
        }
    }

    #[test]
    fn test_violations_make_report_invalid() {
        let claim = Claim::new("c1", "Known result", ClaimLabel::Cited).unwrap();
        let step = DerivationStep::new("s1", ["c1"]).unwrap();
        let report = ScientificReport::new(vec![claim], vec![step], vec![]).unwrap();

        let evaluation = evaluate(&report);
        assert!(!evaluation.can_finalize());
        assert!(!evaluation.integrity.finalization.can_finalize);
        match &evaluation.state {
            State::Invalid { errors } => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].category, "NON_SPEC_MISSING_EVIDENCE");
                assert_eq!(errors[0].claim_id.as_deref(), Some("c1"));
            }
            other => panic!("expected INVALID, got {other:?}"),
        }
    }

    #[test]
    fn test_state_serializes_with_status_tag() {
        let report = ScientificReport::new(vec![], vec![], vec![]).unwrap();
        let value = serde_json::to_value(evaluate(&report)).unwrap();
        assert_eq!(value["state"]["status"], "INCOMPLETE");
        assert_eq!(value["integrity"]["total_claims"], 0);
        assert!(value.get("violations").is_none());
    }
}
