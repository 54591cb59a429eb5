use std::collections::{HashMap, HashSet};

use crate::report::ScientificReport;

/// Lookup tables for one validation run.
///
/// Built once per run and dropped with it; nothing is cached on the report.
#[derive(Debug, Default)]
pub struct ReportIndex<'a> {
    claim_ids: HashSet<&'a str>,
    step_ids: HashSet<&'a str>,
    evidence_ids: HashSet<&'a str>,
    /// Claim id -> owning step ids, in first-seen order.
    owners: Vec<(&'a str, Vec<&'a str>)>,
    owner_slots: HashMap<&'a str, usize>,
}

impl<'a> ReportIndex<'a> {
    pub fn build(report: &'a ScientificReport) -> Self {
        let mut index = Self {
            claim_ids: report.claims().iter().map(|c| c.id()).collect(),
            step_ids: report.steps().iter().map(|s| s.id()).collect(),
            evidence_ids: report.evidence().iter().map(|e| e.id()).collect(),
            ..Self::default()
        };

        for step in report.steps() {
            for claim_id in step.claim_ids() {
                index.add_owner(claim_id, step.id());
            }
        }

        index
    }

    fn add_owner(&mut self, claim_id: &'a str, step_id: &'a str) {
        match self.owner_slots.get(claim_id) {
            Some(&slot) => self.owners[slot].1.push(step_id),
            None => {
                self.owner_slots.insert(claim_id, self.owners.len());
                self.owners.push((claim_id, vec![step_id]));
            }
        }
    }

    pub fn has_claim(&self, id: &str) -> bool {
        self.claim_ids.contains(id)
    }

    pub fn has_step(&self, id: &str) -> bool {
        self.step_ids.contains(id)
    }

    pub fn has_evidence(&self, id: &str) -> bool {
        self.evidence_ids.contains(id)
    }

    /// Steps listing `claim_id`, in document order. Empty for orphans.
    pub fn owners_of(&self, claim_id: &str) -> &[&'a str] {
        self.owner_slots
            .get(claim_id)
            .map(|&slot| self.owners[slot].1.as_slice())
            .unwrap_or_default()
    }

    /// Every listed claim id with its owners, in first-seen order.
    pub fn ownership(&self) -> impl Iterator<Item = (&'a str, &[&'a str])> + '_ {
        self.owners
            .iter()
            .map(|(claim_id, owners)| (*claim_id, owners.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claim::Claim;
    use crate::step::DerivationStep;
    use crate::types::ClaimLabel;

    #[test]
    fn test_ownership_keeps_first_seen_order() {
        let report = ScientificReport::new(
            vec![
                Claim::new("c1", "a", ClaimLabel::Speculative).unwrap(),
                Claim::new("c2", "b", ClaimLabel::Speculative).unwrap(),
            ],
            vec![
                DerivationStep::new("B", ["c2", "c1"]).unwrap(),
                DerivationStep::new("A", ["c1"]).unwrap(),
            ],
            vec![],
        )
        .unwrap();

        let index = ReportIndex::build(&report);
        let listed: Vec<_> = index.ownership().map(|(claim, _)| claim).collect();
        assert_eq!(listed, vec!["c2", "c1"]);
        assert_eq!(index.owners_of("c1"), &["B", "A"]);
        assert!(index.owners_of("c3").is_empty());
        assert!(index.has_claim("c1"));
        assert!(index.has_step("A"));
        assert!(!index.has_evidence("c1"));
    }
}
