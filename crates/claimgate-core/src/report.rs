//! Report assembly.

use std::collections::HashSet;

use serde::Serialize;

use crate::checks::Violation;
use crate::claim::Claim;
use crate::error::{IngestError, ReportError};
use crate::evidence::EvidenceObject;
use crate::step::DerivationStep;
use crate::wire::{self, Token, WireError};

/// A complete document: claims, the steps that own them and the evidence
/// behind them.
///
/// Ids are unique within each collection. Everything else about the graph
/// (ownership, references) is checked by [`crate::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScientificReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    report_id: Option<Token>,
    claims: Vec<Claim>,
    steps: Vec<DerivationStep>,
    evidence: Vec<EvidenceObject>,
}

impl ScientificReport {
    /// Assemble a report, rejecting id collisions.
    ///
    /// All collisions are reported together: claims first, then steps, then
    /// evidence, each in document order.
    pub fn new(
        claims: Vec<Claim>,
        steps: Vec<DerivationStep>,
        evidence: Vec<EvidenceObject>,
    ) -> Result<Self, ReportError> {
        let mut collisions: Vec<Violation> = Vec::new();
        collisions.extend(
            repeated(claims.iter().map(Claim::id))
                .into_iter()
                .map(|claim_id| Violation::ClaimIdCollision { claim_id }),
        );
        collisions.extend(
            repeated(steps.iter().map(DerivationStep::id))
                .into_iter()
                .map(|step_id| Violation::StepIdCollision { step_id }),
        );
        collisions.extend(
            repeated(evidence.iter().map(EvidenceObject::id))
                .into_iter()
                .map(|evidence_id| Violation::EvidenceIdCollision { evidence_id }),
        );

        if !collisions.is_empty() {
            tracing::warn!(collisions = collisions.len(), "report assembly rejected");
            return Err(ReportError::IdCollision(collisions));
        }

        tracing::debug!(
            claims = claims.len(),
            steps = steps.len(),
            evidence = evidence.len(),
            "report assembled"
        );

        Ok(Self {
            report_id: None,
            claims,
            steps,
            evidence,
        })
    }

    /// Attach a document identifier.
    pub fn with_report_id(mut self, report_id: impl Into<String>) -> Result<Self, WireError> {
        self.report_id = Some(Token::identifier(report_id, "report_id")?);
        Ok(self)
    }

    /// Parse a report from a JSON document.
    pub fn from_json(json: &str) -> Result<Self, IngestError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        wire::parse_report(&value)
    }

    /// Parse a report from a YAML document.
    pub fn from_yaml(yaml: &str) -> Result<Self, IngestError> {
        let value: serde_json::Value = serde_yaml::from_str(yaml)?;
        wire::parse_report(&value)
    }

    pub fn report_id(&self) -> Option<&str> {
        self.report_id.as_ref().map(Token::as_str)
    }

    pub fn claims(&self) -> &[Claim] {
        &self.claims
    }

    pub fn steps(&self) -> &[DerivationStep] {
        &self.steps
    }

    pub fn evidence(&self) -> &[EvidenceObject] {
        &self.evidence
    }

    pub fn is_empty(&self) -> bool {
        self.claims.is_empty() && self.steps.is_empty() && self.evidence.is_empty()
    }
}

/// Ids seen more than once, each listed once, in first-repeat order.
fn repeated<'a>(ids: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    let mut out = Vec::new();
    for id in ids {
        if !seen.insert(id) && reported.insert(id) {
            out.push(id.to_string());
        }
    }
    out
}
