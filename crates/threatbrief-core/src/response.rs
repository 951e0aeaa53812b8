//! Turning raw generator text into a validated [`Assessment`].
//!
//! Two independent steps: [`strip_code_fences`] is a pure string transform,
//! [`parse_document`] turns the stripped text into an untyped JSON tree.
//! [`assessment_from_response`] chains them with [`validate`].

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;
use thiserror::Error;

use crate::assessment::{validate, Assessment, ValidationError};

lazy_static! {
    /// Whole payload wrapped in one fence, with an optional info tag
    /// (```json, ```JSON, ``` ...).
    static ref WRAPPING_FENCE: Regex = Regex::new(
        r"(?s)^```[A-Za-z0-9_+.-]*[ \t]*\r?\n?(?P<body>.*?)\r?\n?[ \t]*```$"
    ).unwrap();

    /// Opening fence line anywhere in the payload, for prose-wrapped blocks.
    static ref EMBEDDED_FENCE: Regex = Regex::new(
        r"(?s)```[A-Za-z0-9_+.-]*[ \t]*\r?\n(?P<body>.*?)\r?\n[ \t]*```"
    ).unwrap();
}

/// The payload could not be parsed as a structured document.
#[derive(Error, Debug)]
#[error("response is not a JSON document: {reason}")]
pub struct MalformedResponse {
    pub reason: String,
    /// Leading characters of the stripped payload, for diagnostics
    pub excerpt: String,
}

/// Why a raw response did not yield an assessment.
#[derive(Error, Debug)]
pub enum ResponseError {
    #[error(transparent)]
    Malformed(#[from] MalformedResponse),

    #[error("schema violation: {0}")]
    Schema(#[from] ValidationError),
}

/// Remove a surrounding code fence and trim whitespace.
///
/// A payload wrapped entirely in one fence yields its body. If the payload
/// is not wrapped but contains a fenced block, the first block's body is
/// returned. Anything else comes back trimmed and otherwise untouched.
pub fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();

    if let Some(caps) = WRAPPING_FENCE.captures(trimmed) {
        if let Some(body) = caps.name("body") {
            return body.as_str().trim();
        }
    }

    if let Some(caps) = EMBEDDED_FENCE.captures(trimmed) {
        if let Some(body) = caps.name("body") {
            return body.as_str().trim();
        }
    }

    trimmed
}

/// Parse stripped text as a JSON document.
pub fn parse_document(text: &str) -> Result<Value, MalformedResponse> {
    if text.is_empty() {
        return Err(MalformedResponse {
            reason: "empty payload".to_string(),
            excerpt: String::new(),
        });
    }

    serde_json::from_str(text).map_err(|e| MalformedResponse {
        reason: e.to_string(),
        excerpt: text.chars().take(80).collect(),
    })
}

/// Fence-strip, parse and validate one raw generator response.
pub fn assessment_from_response(raw: &str) -> Result<Assessment, ResponseError> {
    let document = parse_document(strip_code_fences(raw))?;
    Ok(validate(&document)?)
}
