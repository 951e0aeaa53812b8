//! Decode boundary between untrusted generator output and [`Assessment`].
//!
//! The document is checked against the embedded schema first, so every
//! violation carries a field path; only a fully conforming document is
//! decoded into the typed model. There is no partial result.

use serde_json::Value;
use std::fmt;

use super::model::Assessment;
use super::schema::{check_assessment_schema, FieldViolation};

/// A raw document failed assessment validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    violations: Vec<FieldViolation>,
}

impl ValidationError {
    fn new(violations: Vec<FieldViolation>) -> Self {
        debug_assert!(!violations.is_empty());
        Self { violations }
    }

    /// Path of the first offending field (empty for the document root).
    pub fn path(&self) -> &str {
        self.violations
            .first()
            .map(|v| v.path.as_str())
            .unwrap_or_default()
    }

    /// Paths of every offending field, in report order.
    pub fn paths(&self) -> Vec<&str> {
        self.violations.iter().map(|v| v.path.as_str()).collect()
    }

    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(first) = self.violations.first() else {
            return write!(f, "invalid assessment");
        };
        let path = if first.path.is_empty() {
            "<root>"
        } else {
            first.path.as_str()
        };
        write!(f, "invalid field `{}`: {}", path, first.message)?;
        if self.violations.len() > 1 {
            write!(f, " (and {} more)", self.violations.len() - 1)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Validate an untyped document and decode it into an [`Assessment`].
///
/// Whole-valued floats in integer fields (`75.0`) are accepted as the
/// matching integer.
pub fn validate(raw: &Value) -> Result<Assessment, ValidationError> {
    if let Err(violations) = check_assessment_schema(raw) {
        tracing::debug!(
            violations = violations.len(),
            first = %violations[0].path,
            "assessment failed schema check"
        );
        return Err(ValidationError::new(violations));
    }

    serde_json::from_value(with_integral_numbers(raw)).map_err(|e| {
        ValidationError::new(vec![FieldViolation {
            path: String::new(),
            message: e.to_string(),
        }])
    })
}

/// The schema's `integer` admits whole-valued floats such as `75.0`; turn
/// them into integers so the typed decode agrees with the schema.
fn with_integral_numbers(value: &Value) -> Value {
    match value {
        Value::Number(n) if !n.is_i64() && !n.is_u64() => match n.as_f64() {
            Some(f) if f.fract() == 0.0 && f >= 0.0 && f <= u32::MAX as f64 => {
                Value::from(f as u64)
            }
            _ => value.clone(),
        },
        Value::Array(items) => Value::Array(items.iter().map(with_integral_numbers).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), with_integral_numbers(v)))
                .collect(),
        ),
        _ => value.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::model::{ComplianceStatus, Level, Severity, TimelineBucket};
    use crate::test_support::minimal_assessment_json;
    use serde_json::json;

    #[test]
    fn test_minimal_document_validates() {
        let assessment = validate(&minimal_assessment_json(75)).unwrap();
        assert_eq!(assessment.overall_risk_score, 75);
        assert_eq!(assessment.threat_analysis.primary_threats[0].risk, Level::High);
        assert_eq!(assessment.vulnerabilities[0].severity, Severity::Critical);
        assert_eq!(
            assessment.action_plan[0].timeline_bucket(),
            TimelineBucket::Immediate
        );
    }

    #[test]
    fn test_missing_overall_risk_score_rejected() {
        let mut doc = minimal_assessment_json(75);
        doc.as_object_mut().unwrap().remove("overallRiskScore");
        let err = validate(&doc).unwrap_err();
        assert!(err.paths().contains(&"overallRiskScore"));
    }

    #[test]
    fn test_out_of_range_score_is_not_clamped() {
        let mut doc = minimal_assessment_json(75);
        doc["overallRiskScore"] = json!(150);
        let err = validate(&doc).unwrap_err();
        assert_eq!(err.path(), "overallRiskScore");
    }

    #[test]
    fn test_negative_urgency_rejected() {
        let mut doc = minimal_assessment_json(75);
        doc["vulnerabilities"][0]["urgencyScore"] = json!(-1);
        let err = validate(&doc).unwrap_err();
        assert_eq!(err.path(), "vulnerabilities[0].urgencyScore");
    }

    #[test]
    fn test_urgency_above_ten_rejected() {
        let mut doc = minimal_assessment_json(75);
        doc["threatAnalysis"]["primaryThreats"][0]["urgencyScore"] = json!(11);
        let err = validate(&doc).unwrap_err();
        assert_eq!(err.path(), "threatAnalysis.primaryThreats[0].urgencyScore");
    }

    #[test]
    fn test_string_score_rejected() {
        let mut doc = minimal_assessment_json(75);
        doc["overallRiskScore"] = json!("high");
        let err = validate(&doc).unwrap_err();
        assert_eq!(err.path(), "overallRiskScore");
        assert!(err.to_string().contains("overallRiskScore"));
    }

    #[test]
    fn test_empty_required_lists_rejected() {
        for (pointer, path) in [
            ("/threatAnalysis/primaryThreats", "threatAnalysis.primaryThreats"),
            ("/vulnerabilities", "vulnerabilities"),
            ("/actionPlan", "actionPlan"),
            ("/discoveryQuestions", "discoveryQuestions"),
            ("/companyProfile/keyInitiatives", "companyProfile.keyInitiatives"),
        ] {
            let mut doc = minimal_assessment_json(75);
            *doc.pointer_mut(pointer).unwrap() = json!([]);
            let err = validate(&doc).unwrap_err();
            assert_eq!(err.path(), path, "empty {} should be rejected", path);
        }
    }

    #[test]
    fn test_enum_match_is_case_sensitive() {
        let mut doc = minimal_assessment_json(75);
        doc["threatAnalysis"]["primaryThreats"][0]["risk"] = json!("high");
        let err = validate(&doc).unwrap_err();
        assert_eq!(err.path(), "threatAnalysis.primaryThreats[0].risk");

        let mut doc = minimal_assessment_json(75);
        doc["vulnerabilities"][0]["severity"] = json!("Low");
        assert!(validate(&doc).is_err());
    }

    #[test]
    fn test_timeline_matched_by_substring() {
        let mut doc = minimal_assessment_json(75);
        doc["actionPlan"][0]["timeline"] = json!("Immediate (within 30 days)");
        assert!(validate(&doc).is_ok());

        doc["actionPlan"][0]["timeline"] = json!("Next fiscal year");
        let err = validate(&doc).unwrap_err();
        assert_eq!(err.path(), "actionPlan[0].timeline");
    }

    #[test]
    fn test_whole_valued_float_scores_accepted() {
        let mut doc = minimal_assessment_json(75);
        doc["overallRiskScore"] = json!(75.0);
        doc["vulnerabilities"][0]["urgencyScore"] = json!(8.0);
        doc["actionPlan"][0]["priority"] = json!(1.0);
        let assessment = validate(&doc).unwrap();
        assert_eq!(assessment.overall_risk_score, 75);
        assert_eq!(assessment.vulnerabilities[0].urgency_score, 8);
        assert_eq!(assessment.action_plan[0].priority, 1);
    }

    #[test]
    fn test_fractional_score_rejected_with_path() {
        let mut doc = minimal_assessment_json(75);
        doc["overallRiskScore"] = json!(75.5);
        let err = validate(&doc).unwrap_err();
        assert_eq!(err.path(), "overallRiskScore");
    }

    #[test]
    fn test_oversized_priority_rejected_with_path() {
        let mut doc = minimal_assessment_json(75);
        doc["actionPlan"][1]["priority"] = json!(5_000_000_000u64);
        let err = validate(&doc).unwrap_err();
        assert_eq!(err.path(), "actionPlan[1].priority");
    }

    #[test]
    fn test_priority_must_be_positive() {
        let mut doc = minimal_assessment_json(75);
        doc["actionPlan"][0]["priority"] = json!(0);
        let err = validate(&doc).unwrap_err();
        assert_eq!(err.path(), "actionPlan[0].priority");
    }

    #[test]
    fn test_absent_compliance_mapping_is_valid() {
        let doc = minimal_assessment_json(75);
        assert!(doc.get("complianceMapping").is_none());
        let assessment = validate(&doc).unwrap();
        assert!(assessment.compliance_mapping.is_none());
    }

    #[test]
    fn test_null_compliance_mapping_treated_as_absent() {
        let mut doc = minimal_assessment_json(75);
        doc["complianceMapping"] = Value::Null;
        let assessment = validate(&doc).unwrap();
        assert!(assessment.compliance_mapping.is_none());
    }

    #[test]
    fn test_present_compliance_mapping_is_checked() {
        let mut doc = minimal_assessment_json(75);
        doc["complianceMapping"] = json!({
            "overallCompliance": "Partially compliant",
            "criticalGaps": ["No BAA inventory"],
            "frameworks": [
                { "name": "HIPAA", "priority": "High", "status": "Non-Compliant", "gaps": ["Audit logging"] }
            ]
        });
        let assessment = validate(&doc).unwrap();
        let mapping = assessment.compliance_mapping.unwrap();
        assert_eq!(mapping.frameworks[0].status, ComplianceStatus::NonCompliant);

        doc["complianceMapping"]["frameworks"][0]["status"] = json!("Unknown");
        let err = validate(&doc).unwrap_err();
        assert_eq!(err.path(), "complianceMapping.frameworks[0].status");
    }

    #[test]
    fn test_non_object_document_rejected() {
        let err = validate(&json!(["not", "an", "object"])).unwrap_err();
        assert_eq!(err.path(), "");
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let mut doc = minimal_assessment_json(40);
        doc["generatorNotes"] = json!("extra");
        assert!(validate(&doc).is_ok());
    }
}
