//! JSON Schema for assessment documents.
//!
//! The schema lives in `schemas/assessment.schema.json` and is compiled once.
//! Violations are reported with dotted field paths
//! (`threatAnalysis.primaryThreats[0].risk`) rather than JSON pointers.

use jsonschema::error::ValidationErrorKind;
use serde_json::Value;
use std::sync::OnceLock;
use thiserror::Error;

/// Embedded assessment schema (loaded at compile time).
pub const ASSESSMENT_SCHEMA_JSON: &str = include_str!("../../../../schemas/assessment.schema.json");

/// Compiled JSON Schema validator (initialized once, reused).
static COMPILED_SCHEMA: OnceLock<Result<jsonschema::Validator, String>> = OnceLock::new();

/// Errors from schema loading.
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Failed to load schema: {0}")]
    LoadError(String),
}

/// One failed constraint, located by field path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    /// Dotted path to the offending field; empty for the document root
    pub path: String,
    pub message: String,
}

fn get_validator() -> Result<&'static jsonschema::Validator, SchemaError> {
    let result = COMPILED_SCHEMA.get_or_init(|| {
        let schema_value: Value = match serde_json::from_str(ASSESSMENT_SCHEMA_JSON) {
            Ok(v) => v,
            Err(e) => return Err(format!("Invalid schema JSON: {}", e)),
        };

        match jsonschema::options().build(&schema_value) {
            Ok(v) => Ok(v),
            Err(e) => Err(format!("Failed to compile schema: {}", e)),
        }
    });

    match result {
        Ok(v) => Ok(v),
        Err(e) => Err(SchemaError::LoadError(e.clone())),
    }
}

/// Check a raw document against the assessment schema.
///
/// Returns every violation, in the order the validator reports them.
pub fn check_assessment_schema(document: &Value) -> Result<(), Vec<FieldViolation>> {
    let validator = get_validator().map_err(|e| {
        vec![FieldViolation {
            path: String::new(),
            message: e.to_string(),
        }]
    })?;

    let violations: Vec<FieldViolation> = validator
        .iter_errors(document)
        .map(|e| {
            let mut path = pointer_to_path(&e.instance_path.to_string());
            // A missing property is reported against its parent object.
            if let ValidationErrorKind::Required { property } = &e.kind {
                if let Some(name) = property.as_str() {
                    path = join_path(&path, name);
                }
            }
            FieldViolation {
                path,
                message: e.to_string(),
            }
        })
        .collect();

    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}

/// `/threatAnalysis/primaryThreats/0/risk` -> `threatAnalysis.primaryThreats[0].risk`
pub(crate) fn pointer_to_path(pointer: &str) -> String {
    let mut path = String::new();
    for segment in pointer.split('/').filter(|s| !s.is_empty()) {
        let segment = segment.replace("~1", "/").replace("~0", "~");
        if segment.chars().all(|c| c.is_ascii_digit()) {
            path.push('[');
            path.push_str(&segment);
            path.push(']');
        } else {
            path = join_path(&path, &segment);
        }
    }
    path
}

fn join_path(parent: &str, field: &str) -> String {
    if parent.is_empty() {
        field.to_string()
    } else {
        format!("{}.{}", parent, field)
    }
}
