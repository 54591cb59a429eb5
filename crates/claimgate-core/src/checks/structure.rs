//! Ownership and reference integrity between steps and claims.
//!
//! Rules, in reporting order:
//! - every claim id a step lists must exist
//! - every claim is listed by at least one step
//! - no claim is listed by more than one step
//! - every `depends_on` entry must name an existing step

use crate::report::ScientificReport;

use super::{Check, ReportIndex, Violation};

/// The structural graph check.
pub struct StructureCheck;

impl StructureCheck {
    fn dangling_claim_ids(
        &self,
        report: &ScientificReport,
        index: &ReportIndex,
        out: &mut Vec<Violation>,
    ) {
        for step in report.steps() {
            for claim_id in step.claim_ids() {
                if !index.has_claim(claim_id) {
                    out.push(Violation::DanglingClaimId {
                        step_id: step.id().to_string(),
                        claim_id: claim_id.clone(),
                    });
                }
            }
        }
    }

    fn orphans(&self, report: &ScientificReport, index: &ReportIndex, out: &mut Vec<Violation>) {
        for claim in report.claims() {
            if index.owners_of(claim.id()).is_empty() {
                out.push(Violation::OrphanClaim {
                    claim_id: claim.id().to_string(),
                });
            }
        }
    }

    fn duplicate_owners(&self, index: &ReportIndex, out: &mut Vec<Violation>) {
        for (claim_id, owners) in index.ownership() {
            if owners.len() > 1 {
                out.push(Violation::DuplicateClaimOwner {
                    claim_id: claim_id.to_string(),
                    owners: owners.iter().map(|s| s.to_string()).collect(),
                });
            }
        }
    }

    fn dangling_step_deps(
        &self,
        report: &ScientificReport,
        index: &ReportIndex,
        out: &mut Vec<Violation>,
    ) {
        for step in report.steps() {
            for dependency in step.depends_on() {
                if !index.has_step(dependency) {
                    out.push(Violation::DanglingStepDep {
                        step_id: step.id().to_string(),
                        dependency: dependency.clone(),
                    });
                }
            }
        }
    }
}

impl Check for StructureCheck {
    fn name(&self) -> &'static str {
        "structure"
    }

    fn evaluate(&self, report: &ScientificReport, index: &ReportIndex) -> Vec<Violation> {
        let mut violations = Vec::new();
        self.dangling_claim_ids(report, index, &mut violations);
        self.orphans(report, index, &mut violations);
        self.duplicate_owners(index, &mut violations);
        self.dangling_step_deps(report, index, &mut violations);
        violations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claim::Claim;
    use crate::step::DerivationStep;
    use crate::types::ClaimLabel;

    fn claim(id: &str) -> Claim {
        Claim::builder(id, "a statement", ClaimLabel::Speculative)
            .verify_falsify("falsified by counterexample")
            .build()
            .unwrap()
    }

    fn run(claims: Vec<Claim>, steps: Vec<DerivationStep>) -> Vec<Violation> {
        let report = ScientificReport::new(claims, steps, vec![]).unwrap();
        let index = ReportIndex::build(&report);
        StructureCheck.evaluate(&report, &index)
    }

    #[test]
    fn test_single_owner_is_clean() {
        let violations = run(
            vec![claim("c1"), claim("c2")],
            vec![
                DerivationStep::new("s1", ["c1"]).unwrap(),
                DerivationStep::builder("s2", ["c2"])
                    .depends_on(["s1"])
                    .build()
                    .unwrap(),
            ],
        );
        assert!(violations.is_empty(), "{violations:?}");
    }

    #[test]
    fn test_orphan_reported_once() {
        let violations = run(
            vec![claim("c1"), claim("c2")],
            vec![DerivationStep::new("s1", ["c1"]).unwrap()],
        );
        assert_eq!(
            violations,
            vec![Violation::OrphanClaim {
                claim_id: "c2".to_string()
            }]
        );
    }

    #[test]
    fn test_duplicate_owner_names_every_step() {
        let violations = run(
            vec![claim("c1")],
            vec![
                DerivationStep::new("A", ["c1"]).unwrap(),
                DerivationStep::new("B", ["c1"]).unwrap(),
            ],
        );
        assert_eq!(
            violations,
            vec![Violation::DuplicateClaimOwner {
                claim_id: "c1".to_string(),
                owners: vec!["A".to_string(), "B".to_string()],
            }]
        );
    }

    #[test]
    fn test_dangling_references() {
        let violations = run(
            vec![claim("c1")],
            vec![DerivationStep::builder("s1", ["c1", "c404"])
                .depends_on(["s0", "s404"])
                .build()
                .unwrap()],
        );
        let categories: Vec<_> = violations.iter().map(Violation::category).collect();
        assert_eq!(
            categories,
            vec!["DANGLING_CLAIM_ID", "DANGLING_STEP_DEP", "DANGLING_STEP_DEP"]
        );
    }

    #[test]
    fn test_ordering_is_category_major() {
        // A dangling dep in the first step is reported after an orphan
        // claim that appears later in the document.
        let violations = run(
            vec![claim("c1"), claim("c2")],
            vec![
                DerivationStep::builder("s1", ["c1"])
                    .depends_on(["missing"])
                    .build()
                    .unwrap(),
                DerivationStep::new("s2", ["c9"]).unwrap(),
            ],
        );
        let categories: Vec<_> = violations.iter().map(Violation::category).collect();
        assert_eq!(
            categories,
            vec!["DANGLING_CLAIM_ID", "ORPHAN_CLAIM", "DANGLING_STEP_DEP"]
        );
    }
}
