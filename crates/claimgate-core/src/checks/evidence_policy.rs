//! Per-claim evidence requirements.

use std::collections::HashSet;

use crate::claim::Claim;
use crate::report::ScientificReport;
use crate::types::ClaimLabel;

use super::{Check, ReportIndex, Violation};

/// The evidence policy check.
///
/// Rules, in reporting order:
/// 1. non-speculative claims cite at least one evidence id
/// 2. speculative claims state how they could be verified or falsified
/// 3. no empty or whitespace-only evidence id
/// 4. no evidence id listed twice by the same claim
/// 5. every non-empty evidence id resolves to an evidence record
pub struct EvidencePolicyCheck;

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

impl EvidencePolicyCheck {
    fn label_requirement(&self, claim: &Claim) -> Option<Violation> {
        match claim.label() {
            ClaimLabel::Derived | ClaimLabel::Computed | ClaimLabel::Cited => {
                if claim.evidence_ids().is_empty() {
                    Some(Violation::NonSpecMissingEvidence {
                        claim_id: claim.id().to_string(),
                        label: claim.label(),
                    })
                } else {
                    None
                }
            }
            ClaimLabel::Speculative => {
                if claim.verify_falsify().map_or(true, is_blank) {
                    Some(Violation::SpecMissingVerifyFalsify {
                        claim_id: claim.id().to_string(),
                    })
                } else {
                    None
                }
            }
        }
    }

    fn duplicates(&self, claim: &Claim) -> Option<Violation> {
        let mut seen = HashSet::new();
        let mut duplicates: Vec<String> = Vec::new();
        for id in claim.evidence_ids() {
            if !seen.insert(id.as_str()) && !duplicates.contains(id) {
                duplicates.push(id.clone());
            }
        }

        if duplicates.is_empty() {
            None
        } else {
            Some(Violation::EvidenceIdDupInClaim {
                claim_id: claim.id().to_string(),
                duplicates,
            })
        }
    }
}

impl Check for EvidencePolicyCheck {
    fn name(&self) -> &'static str {
        "evidence_policy"
    }

    fn evaluate(&self, report: &ScientificReport, index: &ReportIndex) -> Vec<Violation> {
        let claims = report.claims();

        let mut missing_evidence = Vec::new();
        let mut missing_verify_falsify = Vec::new();
        for violation in claims.iter().filter_map(|c| self.label_requirement(c)) {
            match violation {
                Violation::SpecMissingVerifyFalsify { .. } => {
                    missing_verify_falsify.push(violation)
                }
                _ => missing_evidence.push(violation),
            }
        }

        let empty_ids = claims.iter().flat_map(|claim| {
            claim
                .evidence_ids()
                .iter()
                .enumerate()
                .filter(|(_, id)| is_blank(id))
                .map(move |(position, _)| Violation::EvidenceIdEmpty {
                    claim_id: claim.id().to_string(),
                    index: position,
                })
        });

        let duplicates = claims.iter().filter_map(|c| self.duplicates(c));

        let dangling = claims.iter().flat_map(|claim| {
            claim
                .evidence_ids()
                .iter()
                .filter(move |id| !is_blank(id) && !index.has_evidence(id))
                .map(move |id| Violation::DanglingEvidenceId {
                    claim_id: claim.id().to_string(),
                    evidence_id: id.clone(),
                })
        });

        missing_evidence
            .into_iter()
            .chain(missing_verify_falsify)
            .chain(empty_ids)
            .chain(duplicates)
            .chain(dangling)
            .collect()
    }
}
