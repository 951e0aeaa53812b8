//! Plain-text report rendering.
//!
//! Section order is fixed. The only date in the output is the generation
//! date passed in by the caller, so the same inputs always render the same
//! bytes.

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;

use crate::assessment::{Assessment, ComplianceMapping};
use crate::profile::OrganizationProfile;

/// Width of the rule line framing each section title.
pub const RULE_WIDTH: usize = 50;

const BULLET: &str = "• ";
const NONE_LISTED: &str = "(none)";

/// Prefix for every continuation line of a multi-line value.
const CONTINUATION: &str = "  ";

lazy_static! {
    static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").unwrap();
}

/// Download name for a report: every whitespace run in the organization
/// name, leading and trailing ones included, becomes one underscore.
pub fn report_filename(profile: &OrganizationProfile) -> String {
    let name = WHITESPACE_RUN.replace_all(&profile.name, "_");
    format!("{}_Cybersecurity_Report.txt", name)
}

/// Render the full report for a validated assessment.
pub fn serialize_report(
    profile: &OrganizationProfile,
    assessment: &Assessment,
    generated_on: NaiveDate,
) -> String {
    let mut out = ReportWriter::default();

    out.line("CYBERSECURITY INTELLIGENCE REPORT");
    out.line(&format!("Company: {}", profile.name));
    out.line(&format!("Industry: {}", profile.industry));
    out.line(&format!("Generated: {}", generated_on.format("%Y-%m-%d")));

    let benchmark = &assessment.industry_benchmark;
    out.section("OVERALL RISK ASSESSMENT");
    out.line(&format!("Risk Score: {}/100", assessment.overall_risk_score));
    out.line(&format!("Industry Average: {}/100", benchmark.average_score));
    out.line(&format!(
        "Percentile: {}{} percentile ({})",
        benchmark.percentile,
        ordinal_suffix(benchmark.percentile),
        benchmark.comparison
    ));
    out.blank();
    out.line(&benchmark.industry_context);

    let company = &assessment.company_profile;
    out.section("COMPANY PROFILE");
    out.line(&company.summary);
    out.blank();
    out.labelled_bullets("Key Initiatives:", &company.key_initiatives);

    let threats = &assessment.threat_analysis;
    out.section("THREAT ANALYSIS");
    out.line("Primary Threats:");
    for threat in &threats.primary_threats {
        out.line(&format!(
            "{}{} ({} Risk - Urgency: {}/10)",
            BULLET, threat.threat_type, threat.risk, threat.urgency_score
        ));
        out.line(&format!("  {}", threat.description));
    }
    out.blank();
    out.labelled_bullets("Ransomware Types:", &threats.ransomware_types);
    out.blank();
    out.labelled_bullets("Attack Vectors:", &threats.attack_vectors);

    let swot = &assessment.swot_analysis;
    out.section("SWOT ANALYSIS");
    out.labelled_bullets("STRENGTHS:", &swot.strengths);
    out.blank();
    out.labelled_bullets("WEAKNESSES:", &swot.weaknesses);
    out.blank();
    out.labelled_bullets("OPPORTUNITIES:", &swot.opportunities);
    out.blank();
    out.labelled_bullets("THREATS:", &swot.threats);

    out.section("CRITICAL VULNERABILITIES");
    for vuln in &assessment.vulnerabilities {
        out.line(&format!(
            "{}{} ({} - Urgency: {}/10)",
            BULLET, vuln.area, vuln.severity, vuln.urgency_score
        ));
        out.line(&format!("  Impact: {}", vuln.impact));
    }

    if let Some(mapping) = &assessment.compliance_mapping {
        write_compliance(&mut out, mapping);
    }

    out.section("VALUE PROPOSITIONS");
    if assessment.value_props.is_empty() {
        out.line(NONE_LISTED);
    }
    for (i, prop) in assessment.value_props.iter().enumerate() {
        out.line(&format!("{}. Pain Point: {}", i + 1, prop.pain));
        out.line(&format!("   Solution: {}", prop.solution));
        out.line(&format!("   Benefit: {}", prop.benefit));
    }

    out.section("ACTION PLAN & ROADMAP");
    for item in &assessment.action_plan {
        out.line(&format!("{}. {}", item.priority, item.action));
        out.line(&format!("   Timeline: {}", item.timeline));
        out.line(&format!("   Resources Needed: {}", item.resources));
        out.line(&format!("   Expected Outcome: {}", item.expected_outcome));
    }

    out.section("DISCOVERY QUESTIONS");
    for (i, question) in assessment.discovery_questions.iter().enumerate() {
        out.line(&format!("{}. {}", i + 1, question));
    }

    out.section("PRE-MEETING BRIEF");
    out.line(&assessment.pre_meeting_brief);

    out.section("EXECUTIVE SUMMARY");
    out.line(&assessment.executive_summary);

    out.finish()
}

fn write_compliance(out: &mut ReportWriter, mapping: &ComplianceMapping) {
    out.section("COMPLIANCE MAPPING");
    out.line(&format!("Overall Compliance: {}", mapping.overall_compliance));
    out.blank();
    out.labelled_bullets("Critical Gaps:", &mapping.critical_gaps);
    out.blank();
    out.line("Frameworks:");
    if mapping.frameworks.is_empty() {
        out.line(NONE_LISTED);
    }
    for framework in &mapping.frameworks {
        out.line(&format!(
            "{}{} ({} Priority - {})",
            BULLET, framework.name, framework.priority, framework.status
        ));
        for gap in &framework.gaps {
            out.line(&format!("  - {}", gap));
        }
    }
}

fn ordinal_suffix(n: u8) -> &'static str {
    match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}

#[derive(Default)]
struct ReportWriter {
    buf: String,
}

impl ReportWriter {
    /// Write one line. Embedded newlines are kept, but each continuation
    /// line is indented so a value can never pass for a bullet, a numbered
    /// item, or a section rule of its own.
    fn line(&mut self, text: &str) {
        let mut rows = text.split('\n');
        if let Some(first) = rows.next() {
            self.buf.push_str(first);
        }
        for row in rows {
            self.buf.push('\n');
            self.buf.push_str(CONTINUATION);
            self.buf.push_str(row);
        }
        self.buf.push('\n');
    }

    fn blank(&mut self) {
        self.buf.push('\n');
    }

    fn section(&mut self, title: &str) {
        let rule = "=".repeat(RULE_WIDTH);
        self.blank();
        self.line(&rule);
        self.line(title);
        self.line(&rule);
    }

    fn labelled_bullets(&mut self, label: &str, items: &[String]) {
        self.line(label);
        if items.is_empty() {
            self.line(NONE_LISTED);
        }
        for item in items {
            self.line(&format!("{}{}", BULLET, item));
        }
    }

    fn finish(self) -> String {
        self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::validate;
    use crate::test_support::{acme_profile, minimal_assessment, minimal_assessment_json};
    use proptest::prelude::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 15).unwrap()
    }

    #[test]
    fn test_header() {
        let report = serialize_report(&acme_profile(), &minimal_assessment(75), date());
        assert!(report.starts_with(
            "CYBERSECURITY INTELLIGENCE REPORT\nCompany: Acme\nIndustry: Healthcare\nGenerated: 2026-10-15\n"
        ));
    }

    #[test]
    fn test_section_order() {
        let report = serialize_report(&acme_profile(), &minimal_assessment(75), date());
        let titles = [
            "OVERALL RISK ASSESSMENT",
            "COMPANY PROFILE",
            "THREAT ANALYSIS",
            "SWOT ANALYSIS",
            "CRITICAL VULNERABILITIES",
            "VALUE PROPOSITIONS",
            "ACTION PLAN & ROADMAP",
            "DISCOVERY QUESTIONS",
            "PRE-MEETING BRIEF",
            "EXECUTIVE SUMMARY",
        ];
        let positions: Vec<usize> = titles
            .iter()
            .map(|t| report.find(&format!("\n{}\n", t)).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_rule_lines_frame_titles() {
        let report = serialize_report(&acme_profile(), &minimal_assessment(75), date());
        let rule = "=".repeat(RULE_WIDTH);
        assert!(report.contains(&format!("{}\nSWOT ANALYSIS\n{}\n", rule, rule)));
    }

    #[test]
    fn test_lists_render_as_bullets_in_order() {
        let report = serialize_report(&acme_profile(), &minimal_assessment(75), date());
        assert!(report.contains("Key Initiatives:\n• EHR migration\n• Telehealth expansion\n"));
        assert!(report.contains("Ransomware Types:\n• LockBit\n• BlackCat\n"));
        assert!(report.contains("• Ransomware (High Risk - Urgency: 9/10)\n  Clinical systems"));
    }

    #[test]
    fn test_numbered_fields() {
        let report = serialize_report(&acme_profile(), &minimal_assessment(75), date());
        assert!(report.contains(
            "1. How often are backups tested?\n2. Who owns incident response?\n"
        ));
        assert!(report.contains("1. Deploy immutable backups\n   Timeline: Immediate\n"));
        assert!(report.contains("2. Roll out MFA\n   Timeline: 1-3 months\n"));
    }

    #[test]
    fn test_action_plan_is_not_resorted() {
        let mut doc = minimal_assessment_json(75);
        doc["actionPlan"][0]["priority"] = serde_json::json!(5);
        let assessment = validate(&doc).unwrap();
        let report = serialize_report(&acme_profile(), &assessment, date());
        let first = report.find("5. Deploy immutable backups").unwrap();
        let second = report.find("2. Roll out MFA").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_percentile_ordinal() {
        let report = serialize_report(&acme_profile(), &minimal_assessment(75), date());
        assert!(report.contains("Percentile: 60th percentile (above industry average)"));
        assert_eq!(ordinal_suffix(1), "st");
        assert_eq!(ordinal_suffix(22), "nd");
        assert_eq!(ordinal_suffix(13), "th");
        assert_eq!(ordinal_suffix(100), "th");
    }

    #[test]
    fn test_absent_compliance_emits_no_section() {
        let report = serialize_report(&acme_profile(), &minimal_assessment(75), date());
        assert!(!report.contains("COMPLIANCE"));
    }

    #[test]
    fn test_present_compliance_section() {
        let mut doc = minimal_assessment_json(75);
        doc["complianceMapping"] = serde_json::json!({
            "overallCompliance": "Partial",
            "criticalGaps": ["Access reviews"],
            "frameworks": [
                { "name": "HIPAA", "priority": "High", "status": "Non-Compliant", "gaps": ["Audit logs"] }
            ]
        });
        let assessment = validate(&doc).unwrap();
        let report = serialize_report(&acme_profile(), &assessment, date());
        let compliance = report.find("\nCOMPLIANCE MAPPING\n").unwrap();
        assert!(report.find("\nCRITICAL VULNERABILITIES\n").unwrap() < compliance);
        assert!(compliance < report.find("\nVALUE PROPOSITIONS\n").unwrap());
        assert!(report.contains("• HIPAA (High Priority - Non-Compliant)\n  - Audit logs\n"));
    }

    #[test]
    fn test_empty_optional_lists_are_marked() {
        let mut doc = minimal_assessment_json(75);
        doc["threatAnalysis"]["attackVectors"] = serde_json::json!([]);
        let assessment = validate(&doc).unwrap();
        let report = serialize_report(&acme_profile(), &assessment, date());
        assert!(report.contains("Attack Vectors:\n(none)\n"));
    }

    #[test]
    fn test_serialize_does_not_mutate_inputs() {
        let profile = acme_profile();
        let assessment = minimal_assessment(75);
        let (p, a) = (profile.clone(), assessment.clone());
        let _ = serialize_report(&profile, &assessment, date());
        assert_eq!(profile, p);
        assert_eq!(assessment, a);
    }

    #[test]
    fn test_report_filename() {
        assert_eq!(
            report_filename(&OrganizationProfile::new("Acme Health  Systems", "Healthcare")),
            "Acme_Health_Systems_Cybersecurity_Report.txt"
        );
        assert_eq!(
            report_filename(&OrganizationProfile::new(" Acme\t", "Healthcare")),
            "_Acme__Cybersecurity_Report.txt"
        );
    }

    #[test]
    fn test_multiline_item_cannot_forge_bullets() {
        let mut joined = minimal_assessment_json(75);
        joined["companyProfile"]["keyInitiatives"] =
            serde_json::json!(["EHR migration\n• Telehealth expansion"]);
        let joined = validate(&joined).unwrap();
        let split = minimal_assessment(75);
        assert_ne!(joined, split);

        let joined_report = serialize_report(&acme_profile(), &joined, date());
        let split_report = serialize_report(&acme_profile(), &split, date());
        assert_ne!(joined_report, split_report);
        assert!(joined_report
            .contains("Key Initiatives:\n• EHR migration\n  • Telehealth expansion\n"));
    }

    #[test]
    fn test_multiline_brief_cannot_forge_section() {
        let mut doc = minimal_assessment_json(75);
        doc["preMeetingBrief"] = serde_json::json!("Context.\n\nEXECUTIVE SUMMARY");
        let report = serialize_report(&acme_profile(), &validate(&doc).unwrap(), date());
        assert!(report.contains("Context.\n  \n  EXECUTIVE SUMMARY\n"));
        assert_eq!(report.matches("\nEXECUTIVE SUMMARY\n").count(), 1);
    }

    proptest! {
        #[test]
        fn prop_serialize_is_stable(score in 0u8..=100) {
            let profile = acme_profile();
            let assessment = minimal_assessment(score);
            let first = serialize_report(&profile, &assessment, date());
            let second = serialize_report(&profile, &assessment, date());
            prop_assert_eq!(first, second);
        }

        #[test]
        fn prop_differing_fields_render_differently(
            a in "[A-Za-z \n•.]{1,20}",
            b in "[A-Za-z \n•.]{1,20}",
        ) {
            prop_assume!(a != b);
            let mut doc_a = minimal_assessment_json(75);
            let mut doc_b = minimal_assessment_json(75);
            doc_a["swotAnalysis"]["weaknesses"][0] = serde_json::json!(a);
            doc_b["swotAnalysis"]["weaknesses"][0] = serde_json::json!(b);
            let report_a = serialize_report(&acme_profile(), &validate(&doc_a).unwrap(), date());
            let report_b = serialize_report(&acme_profile(), &validate(&doc_b).unwrap(), date());
            prop_assert_ne!(report_a, report_b);
        }
    }
}
