//! # threatbrief-core
//!
//! Deterministic core of threatbrief: the assessment model and its
//! validation contract, the risk simulation engine, and the plain-text
//! report serializer.
//!
//! ## Key Guarantees
//!
//! 1. **Fail closed**: generator output becomes an [`Assessment`] only if
//!    every field validates; otherwise a [`ValidationError`] names the field
//! 2. **No network calls**: everything here is synchronous and pure
//! 3. **Deterministic**: simulation and rendering depend only on their inputs
//!
//! ## Example
//!
//! ```rust,ignore
//! use threatbrief_core::{assessment_from_response, serialize_report, simulate};
//!
//! let assessment = assessment_from_response(&raw_text)?;
//! let outcome = simulate(assessment.overall_risk_score, &toggles);
//! let report = serialize_report(&profile, &assessment, today);
//! ```

pub mod assessment;
pub mod attachments;
pub mod clipboard;
pub mod profile;
pub mod report;
pub mod response;
pub mod simulation;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export main types at crate root
pub use assessment::{validate, Assessment, FieldViolation, ValidationError};
pub use attachments::{Attachment, AttachmentError, AttachmentList, MAX_ATTACHMENTS};
pub use clipboard::{action_item, Excerpt};
pub use profile::{CompanySize, OrganizationProfile, ProfileError};
pub use report::{report_filename, serialize_report};
pub use response::{
    assessment_from_response, parse_document, strip_code_fences, MalformedResponse, ResponseError,
};
pub use simulation::{
    reduction_percent, simulate, RiskBand, SecurityControl, SimulationOutcome,
    SimulationToggleSet,
};
