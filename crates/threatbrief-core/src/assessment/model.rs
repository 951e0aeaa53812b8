//! Typed assessment document.
//!
//! Field names follow the generator's camelCase wire format. Values of these
//! types only come out of [`super::validate`], so every range and enum
//! constraint of the schema already holds.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The validated result of one analysis request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assessment {
    /// Overall risk score, 0-100
    pub overall_risk_score: u8,

    pub industry_benchmark: IndustryBenchmark,

    pub company_profile: CompanyProfile,

    pub threat_analysis: ThreatAnalysis,

    pub swot_analysis: SwotAnalysis,

    pub vulnerabilities: Vec<Vulnerability>,

    pub value_props: Vec<ValueProp>,

    /// Questions for the first customer conversation, in order
    pub discovery_questions: Vec<String>,

    /// Ordered as the generator returned it; never re-sorted
    pub action_plan: Vec<ActionItem>,

    pub pre_meeting_brief: String,

    pub executive_summary: String,

    /// Only optional top-level section. `None` means "not present".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compliance_mapping: Option<ComplianceMapping>,
}

/// How the organization compares with its industry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndustryBenchmark {
    pub average_score: u8,
    pub percentile: u8,
    pub comparison: String,
    pub industry_context: String,
}

impl IndustryBenchmark {
    /// Classify the free-text comparison.
    pub fn position(&self) -> BenchmarkPosition {
        BenchmarkPosition::from_comparison(&self.comparison)
    }
}

/// Where the organization sits against the industry average.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BenchmarkPosition {
    Above,
    Below,
    At,
}

impl BenchmarkPosition {
    /// `above` wins over `below` when both appear.
    pub fn from_comparison(comparison: &str) -> Self {
        let text = comparison.to_lowercase();
        if text.contains("above") {
            BenchmarkPosition::Above
        } else if text.contains("below") {
            BenchmarkPosition::Below
        } else {
            BenchmarkPosition::At
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyProfile {
    pub summary: String,
    pub key_initiatives: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreatAnalysis {
    pub primary_threats: Vec<Threat>,
    pub ransomware_types: Vec<String>,
    pub attack_vectors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Threat {
    #[serde(rename = "type")]
    pub threat_type: String,
    pub risk: Level,
    pub description: String,
    /// 0-10
    pub urgency_score: u8,
}

/// Three-step rating shared by threat risk and framework priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Level {
    High,
    Medium,
    Low,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::High => write!(f, "High"),
            Level::Medium => write!(f, "Medium"),
            Level::Low => write!(f, "Low"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwotAnalysis {
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub opportunities: Vec<String>,
    pub threats: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vulnerability {
    pub area: String,
    pub severity: Severity,
    pub impact: String,
    /// 0-10
    pub urgency_score: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    Critical,
    High,
    Medium,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Critical => write!(f, "Critical"),
            Severity::High => write!(f, "High"),
            Severity::Medium => write!(f, "Medium"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueProp {
    pub pain: String,
    pub solution: String,
    pub benefit: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionItem {
    /// Positive, as given by the generator
    pub priority: u32,
    pub action: String,
    /// Verbatim text; contains one of the [`TimelineBucket`] markers
    pub timeline: String,
    pub resources: String,
    pub expected_outcome: String,
}

impl ActionItem {
    pub fn timeline_bucket(&self) -> TimelineBucket {
        TimelineBucket::from_timeline(&self.timeline)
    }
}

/// Coarse urgency of an action-plan timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TimelineBucket {
    Immediate,
    ShortTerm,
    MidTerm,
    LongTerm,
}

impl TimelineBucket {
    /// Substring markers accepted in a timeline, most urgent first.
    pub const MARKERS: [&'static str; 4] = ["Immediate", "1-3 months", "3-6 months", "6-12 months"];

    pub fn from_timeline(timeline: &str) -> Self {
        if timeline.contains("Immediate") {
            TimelineBucket::Immediate
        } else if timeline.contains("1-3") {
            TimelineBucket::ShortTerm
        } else if timeline.contains("3-6") {
            TimelineBucket::MidTerm
        } else {
            TimelineBucket::LongTerm
        }
    }

    /// Whether the text carries one of the accepted markers.
    pub fn is_recognized(timeline: &str) -> bool {
        Self::MARKERS.iter().any(|m| timeline.contains(m))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceMapping {
    pub overall_compliance: String,
    pub critical_gaps: Vec<String>,
    pub frameworks: Vec<ComplianceFramework>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceFramework {
    pub name: String,
    pub priority: Level,
    pub status: ComplianceStatus,
    pub gaps: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComplianceStatus {
    Compliant,
    Partial,
    #[serde(rename = "Non-Compliant")]
    NonCompliant,
}

impl fmt::Display for ComplianceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComplianceStatus::Compliant => write!(f, "Compliant"),
            ComplianceStatus::Partial => write!(f, "Partial"),
            ComplianceStatus::NonCompliant => write!(f, "Non-Compliant"),
        }
    }
}
