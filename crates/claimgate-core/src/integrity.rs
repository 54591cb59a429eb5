//! Integrity Aggregator: decides whether a set of claims may be finalized.
//!
//! The rules are fixed:
//! 1. Zero claims never finalize. The caller gets a checklist of what to
//!    provide instead.
//! 2. Any non-speculative claim without evidence blocks finalization.
//! 3. Otherwise the claims may be finalized.
//!
//! Only the wording of the blocking report is configurable.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::claim::Claim;

/// Errors that can occur when loading an [`IntegrityConfig`].
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Config validation failed: {0}")]
    ValidationError(String),
}

/// How blocking reasons are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IntegrityConfig {
    /// Unsupported claims listed individually before truncating
    pub listing_limit: usize,

    /// Statement characters shown per listed claim
    pub statement_preview_chars: usize,
}

impl Default for IntegrityConfig {
    fn default() -> Self {
        Self {
            listing_limit: 5,
            statement_preview_chars: 80,
        }
    }
}

impl IntegrityConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.statement_preview_chars == 0 {
            return Err(ConfigError::ValidationError(
                "statement_preview_chars must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Outcome of the finalization check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finalization {
    pub can_finalize: bool,

    /// Human-readable blocking reasons; empty when `can_finalize` is true
    pub reasons: Vec<String>,
}

impl Finalization {
    fn allowed() -> Self {
        Self {
            can_finalize: true,
            reasons: Vec::new(),
        }
    }

    fn blocked(reasons: Vec<String>) -> Self {
        Self {
            can_finalize: false,
            reasons,
        }
    }
}

/// Counts and decision for a set of claims.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntegrityAssessment {
    pub total_claims: usize,
    pub non_speculative: usize,
    pub unsupported: usize,

    /// `unsupported / non_speculative`, or 0.0 when nothing is non-speculative
    pub unsupported_rate: f64,

    pub finalization: Finalization,
}

/// Fraction of non-speculative claims that carry no evidence.
///
/// Always within `[0.0, 1.0]`; 0.0 when there are no non-speculative claims.
pub fn unsupported_rate(claims: &[Claim]) -> f64 {
    let (non_speculative, unsupported) = count(claims);
    rate(unsupported, non_speculative)
}

/// Finalization check with the default rendering.
pub fn can_finalize(claims: &[Claim]) -> Finalization {
    IntegrityAggregator::default().finalization(claims)
}

fn count(claims: &[Claim]) -> (usize, usize) {
    let non_speculative = claims
        .iter()
        .filter(|c| !c.label().is_speculative())
        .count();
    let unsupported = claims.iter().filter(|c| !c.is_supported()).count();
    (non_speculative, unsupported)
}

fn rate(unsupported: usize, non_speculative: usize) -> f64 {
    if non_speculative == 0 {
        0.0
    } else {
        unsupported as f64 / non_speculative as f64
    }
}

/// The Integrity Aggregator.
#[derive(Debug, Clone, Default)]
pub struct IntegrityAggregator {
    config: IntegrityConfig,
}

impl IntegrityAggregator {
    pub fn new(config: IntegrityConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &IntegrityConfig {
        &self.config
    }

    /// Count the claims and decide whether they may be finalized.
    pub fn assess(&self, claims: &[Claim]) -> IntegrityAssessment {
        let (non_speculative, unsupported) = count(claims);
        let finalization = self.finalization(claims);

        tracing::info!(
            total_claims = claims.len(),
            non_speculative,
            unsupported,
            can_finalize = finalization.can_finalize,
            "finalization check"
        );

        IntegrityAssessment {
            total_claims: claims.len(),
            non_speculative,
            unsupported,
            unsupported_rate: rate(unsupported, non_speculative),
            finalization,
        }
    }

    /// Decide whether `claims` may be finalized, with the reasons if not.
    pub fn finalization(&self, claims: &[Claim]) -> Finalization {
        if claims.is_empty() {
            return Finalization::blocked(vec![
                "No claims extracted - cannot finalize".to_string(),
                "Checklist:".to_string(),
                "  - Provide derivation steps with explicit claims".to_string(),
                "  - OR provide equations/identities to verify".to_string(),
                "  - OR provide source attributions/citations".to_string(),
                "  - OR explicitly state 'no derivation possible yet' with explanation"
                    .to_string(),
            ]);
        }

        let unsupported: Vec<&Claim> = claims.iter().filter(|c| !c.is_supported()).collect();
        if unsupported.is_empty() {
            return Finalization::allowed();
        }

        let (non_speculative, _) = count(claims);
        let mut reasons = vec![
            format!(
                "Found {} unsupported non-SPECULATIVE claim(s)",
                unsupported.len()
            ),
            format!(
                "Unsupported claim rate: {}/{} = {:.2}%",
                unsupported.len(),
                non_speculative,
                rate(unsupported.len(), non_speculative) * 100.0
            ),
        ];

        for claim in unsupported.iter().take(self.config.listing_limit) {
            reasons.push(format!(
                "  - [{}] {}...",
                claim.label(),
                self.preview(claim.statement())
            ));
        }

        if unsupported.len() > self.config.listing_limit {
            reasons.push(format!(
                "  ... and {} more",
                unsupported.len() - self.config.listing_limit
            ));
        }

        Finalization::blocked(reasons)
    }

    fn preview(&self, statement: &str) -> String {
        statement
            .chars()
            .take(self.config.statement_preview_chars)
            .collect()
    }
}
