//! Record and document parsers.
//!
//! Each record parser opens the object (type, missing fields, unknown
//! fields), parses every field in declared order, then hands the typed values
//! to the record builder for the cross-field rules. The first failure aborts
//! the record.

use serde_json::Value;

use crate::claim::{Claim, ClaimBuilder};
use crate::error::{IngestError, RecordError};
use crate::evidence::{EvidenceBuilder, EvidenceObject};
use crate::report::ScientificReport;
use crate::step::{DerivationStep, StepBuilder};
use crate::types::{
    ClaimLabel, EvidenceSource, EvidenceStatus, EvidenceType, IndeterminateReason, PayloadKind,
    PayloadRef, SourceKind, StepStatus,
};

use super::enums::{parse_enum, parse_tagged};
use super::error::WireError;
use super::fields::{expect_array, parse_array, Fields};
use super::schema::validate_envelope;
use super::token::{check_blankable_text, expect_str, json_type_name, Token};

const CLAIM_REQUIRED: &[&str] = &["id", "statement", "label"];
const CLAIM_OPTIONAL: &[&str] = &["owning_step_id", "evidence_ids", "span", "verify_falsify"];

const STEP_REQUIRED: &[&str] = &["id", "claim_ids"];
const STEP_OPTIONAL: &[&str] = &["depends_on", "status", "status_reason"];

const EVIDENCE_REQUIRED: &[&str] = &["id", "type", "source", "status", "payload_ref"];
const EVIDENCE_OPTIONAL: &[&str] = &["status_reason", "notes"];

const REPORT_REQUIRED: &[&str] = &["claims", "steps", "evidence"];
const REPORT_OPTIONAL: &[&str] = &["report_id"];

fn identifiers(raw: &Value, field: &str) -> Result<Vec<String>, WireError> {
    parse_array(raw, field, |item, path| {
        Token::parse(item, path).map(Token::into_inner)
    })
}

fn parse_span(raw: &Value, field: &str) -> Result<(usize, usize), WireError> {
    let items = expect_array(raw, field)?;
    if items.len() != 2 {
        return Err(WireError::InvalidValue {
            field: field.to_string(),
            value: raw.to_string(),
            allowed: "[start, end]".to_string(),
        });
    }

    let bound = |index: usize| -> Result<usize, WireError> {
        let path = format!("{field}[{index}]");
        let item = &items[index];
        let value = item.as_u64().ok_or_else(|| WireError::TypeMismatch {
            field: path.clone(),
            expected: "non-negative integer",
            actual: json_type_name(item),
        })?;
        usize::try_from(value).map_err(|_| WireError::InvalidValue {
            field: path,
            value: value.to_string(),
            allowed: "a platform-sized offset".to_string(),
        })
    };

    Ok((bound(0)?, bound(1)?))
}

/// Parse one claim object.
pub fn parse_claim(raw: &Value, path: &str) -> Result<Claim, RecordError> {
    let fields = Fields::open(raw, path, CLAIM_REQUIRED, CLAIM_OPTIONAL)?;

    let id = Token::parse(fields.required("id")?, &fields.path("id"))?;
    let statement =
        Token::parse_free_text(fields.required("statement")?, &fields.path("statement"))?;
    let label: ClaimLabel = parse_enum(fields.required("label")?, &fields.path("label"))?;

    let mut builder = ClaimBuilder::new(id.into_inner(), statement.into_inner(), label);

    if let Some(raw) = fields.optional("owning_step_id") {
        let owner = Token::parse(raw, &fields.path("owning_step_id"))?;
        builder = builder.owning_step(owner.into_inner());
    }
    if let Some(raw) = fields.optional("evidence_ids") {
        builder = builder.evidence_ids(identifiers(raw, &fields.path("evidence_ids"))?);
    }
    if let Some(raw) = fields.optional("span") {
        let (start, end) = parse_span(raw, &fields.path("span"))?;
        builder = builder.span(start, end);
    }
    if let Some(raw) = fields.optional("verify_falsify") {
        // Blank text is left for the evidence policy check.
        let path = fields.path("verify_falsify");
        let text = expect_str(raw, &path)?;
        check_blankable_text(text, &path)?;
        builder = builder.verify_falsify(text);
    }

    builder.build()
}

/// Parse one derivation step object.
pub fn parse_step(raw: &Value, path: &str) -> Result<DerivationStep, RecordError> {
    let fields = Fields::open(raw, path, STEP_REQUIRED, STEP_OPTIONAL)?;

    let id = Token::parse(fields.required("id")?, &fields.path("id"))?;
    let claim_ids = identifiers(fields.required("claim_ids")?, &fields.path("claim_ids"))?;

    let mut builder = StepBuilder::new(id.into_inner(), claim_ids);

    if let Some(raw) = fields.optional("depends_on") {
        builder = builder.depends_on(identifiers(raw, &fields.path("depends_on"))?);
    }
    if let Some(raw) = fields.optional("status") {
        let status: StepStatus = parse_enum(raw, &fields.path("status"))?;
        builder = builder.status(status);
    }
    if let Some(raw) = fields.optional("status_reason") {
        let reason = Token::parse_free_text(raw, &fields.path("status_reason"))?;
        builder = builder.status_reason(reason.into_inner());
    }

    builder.build()
}

/// Parse one evidence object.
pub fn parse_evidence(raw: &Value, path: &str) -> Result<EvidenceObject, RecordError> {
    let fields = Fields::open(raw, path, EVIDENCE_REQUIRED, EVIDENCE_OPTIONAL)?;

    let id = Token::parse(fields.required("id")?, &fields.path("id"))?;
    let evidence_type: EvidenceType = parse_enum(fields.required("type")?, &fields.path("type"))?;
    let (kind, value) =
        parse_tagged::<SourceKind>(fields.required("source")?, &fields.path("source"))?;
    let status: EvidenceStatus = parse_enum(fields.required("status")?, &fields.path("status"))?;
    let (payload_kind, payload_value) =
        parse_tagged::<PayloadKind>(fields.required("payload_ref")?, &fields.path("payload_ref"))?;

    let mut builder = EvidenceBuilder::new(
        id.into_inner(),
        evidence_type,
        EvidenceSource::from_parts(kind, value),
        status,
        PayloadRef::from_parts(payload_kind, payload_value),
    );

    if let Some(raw) = fields.optional("status_reason") {
        let reason: IndeterminateReason = parse_enum(raw, &fields.path("status_reason"))?;
        builder = builder.status_reason(reason);
    }
    if let Some(raw) = fields.optional("notes") {
        let notes = Token::parse_free_text(raw, &fields.path("notes"))?;
        builder = builder.notes(notes.into_inner());
    }

    builder.build()
}

fn parse_records<T>(
    raw: &Value,
    field: &str,
    parse: fn(&Value, &str) -> Result<T, RecordError>,
) -> Result<Vec<T>, IngestError> {
    expect_array(raw, field)?
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let path = format!("{field}[{index}]");
            parse(item, &path).map_err(|err| match err {
                RecordError::Field(err) => IngestError::Field(err),
                source => IngestError::Record { path, source },
            })
        })
        .collect()
}

fn parse_document(raw: &Value) -> Result<ScientificReport, IngestError> {
    validate_envelope(raw).map_err(IngestError::Schema)?;

    let fields = Fields::open(raw, "", REPORT_REQUIRED, REPORT_OPTIONAL)?;
    let claims = parse_records(fields.required("claims")?, "claims", parse_claim)?;
    let steps = parse_records(fields.required("steps")?, "steps", parse_step)?;
    let evidence = parse_records(fields.required("evidence")?, "evidence", parse_evidence)?;

    let report = ScientificReport::new(claims, steps, evidence)?;
    match fields.optional("report_id") {
        Some(raw) => {
            let report_id = Token::parse(raw, "report_id")?;
            Ok(report.with_report_id(report_id.into_inner())?)
        }
        None => Ok(report),
    }
}

/// Parse a whole document into an assembled [`ScientificReport`].
///
/// Order: envelope schema, then claims, steps and evidence (each in
/// document order), then assembly. Stops at the first failure.
pub fn parse_report(raw: &Value) -> Result<ScientificReport, IngestError> {
    match parse_document(raw) {
        Ok(report) => {
            tracing::debug!(
                report_id = report.report_id(),
                claims = report.claims().len(),
                steps = report.steps().len(),
                evidence = report.evidence().len(),
                "report parsed"
            );
            Ok(report)
        }
        Err(err) => {
            tracing::warn!(error = %err, "report rejected at wire boundary");
            Err(err)
        }
    }
}
