//! Assessment data model and validation.
//!
//! Generator output is untrusted. It enters the system only through
//! [`validate`], which either returns a complete [`Assessment`] or a
//! [`ValidationError`] naming the offending field.

mod model;
mod schema;
mod validator;

pub use model::{
    ActionItem, Assessment, BenchmarkPosition, CompanyProfile, ComplianceFramework,
    ComplianceMapping, ComplianceStatus, IndustryBenchmark, Level, Severity, SwotAnalysis, Threat,
    ThreatAnalysis, TimelineBucket, ValueProp, Vulnerability,
};
pub use schema::{check_assessment_schema, FieldViolation, SchemaError, ASSESSMENT_SCHEMA_JSON};
pub use validator::{validate, ValidationError};
