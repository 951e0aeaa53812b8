//! The analysis prompt sent to the generator.
//!
//! One user message: a role line, the organization profile, then the exact
//! JSON shape the reply must take. The reply is still untrusted and goes
//! through full validation.

use threatbrief_core::OrganizationProfile;

/// Opening line establishing the analyst role.
pub const ROLE_PREAMBLE: &str = "You are a cybersecurity sales intelligence analyst. Analyze this company and provide a comprehensive security assessment in JSON format.";

/// Shown for optional profile fields left blank.
pub const NOT_SPECIFIED: &str = "Not specified";

/// Shape of the expected reply. Kept valid JSON so it can be checked
/// against the assessment schema's required keys.
pub const ASSESSMENT_TEMPLATE: &str = r#"{
  "overallRiskScore": 75,
  "industryBenchmark": {
    "averageScore": 65,
    "percentile": 60,
    "comparison": "above/below/at industry average",
    "industryContext": "brief context about security in this industry"
  },
  "companyProfile": {
    "summary": "2-3 sentence summary of company priorities and strategic direction",
    "keyInitiatives": ["initiative 1", "initiative 2", "initiative 3"]
  },
  "threatAnalysis": {
    "primaryThreats": [
      {"type": "threat name", "risk": "High/Medium/Low", "description": "why this matters", "urgencyScore": 8}
    ],
    "ransomwareTypes": ["specific ransomware type 1", "specific ransomware type 2"],
    "attackVectors": ["vector 1", "vector 2", "vector 3"]
  },
  "swotAnalysis": {
    "strengths": ["strength 1", "strength 2"],
    "weaknesses": ["weakness 1", "weakness 2"],
    "opportunities": ["opportunity 1", "opportunity 2"],
    "threats": ["threat 1", "threat 2"]
  },
  "vulnerabilities": [
    {"area": "vulnerability area", "severity": "Critical/High/Medium", "impact": "business impact", "urgencyScore": 9}
  ],
  "complianceMapping": {
    "overallCompliance": "overall posture, e.g. Partially compliant",
    "criticalGaps": ["gap 1", "gap 2"],
    "frameworks": [
      {"name": "framework name", "priority": "High/Medium/Low", "status": "Compliant/Partial/Non-Compliant", "gaps": ["gap 1"]}
    ]
  },
  "valueProps": [
    {"pain": "specific pain point", "solution": "how the proposed solution addresses it", "benefit": "measurable benefit"}
  ],
  "discoveryQuestions": [
    "question 1",
    "question 2",
    "question 3",
    "question 4",
    "question 5"
  ],
  "actionPlan": [
    {
      "priority": 1,
      "action": "specific action to take",
      "timeline": "Immediate/1-3 months/3-6 months/6-12 months",
      "resources": "resources needed",
      "expectedOutcome": "what this achieves"
    }
  ],
  "preMeetingBrief": "Comprehensive 3-4 paragraph pre-call brief covering company context, key concerns, recommended talking points, and meeting objectives",
  "executiveSummary": "Concise 2-3 paragraph executive summary suitable for C-level presentation"
}"#;

/// Build the single prompt for analyzing `profile`.
pub fn build_analysis_prompt(profile: &OrganizationProfile) -> String {
    let size = profile.size.map(|s| s.label()).unwrap_or(NOT_SPECIFIED);

    let mut prompt = String::with_capacity(ASSESSMENT_TEMPLATE.len() + 512);
    prompt.push_str(ROLE_PREAMBLE);
    prompt.push_str("\n\nCompany Information:\n");
    push_field(&mut prompt, "Name", &profile.name);
    push_field(&mut prompt, "Industry", &profile.industry);
    push_field(&mut prompt, "Company Size", size);
    push_field(&mut prompt, "Current Initiatives", &profile.current_initiatives);
    push_field(&mut prompt, "Tech Stack", &profile.tech_stack);
    push_field(&mut prompt, "Known Concerns", &profile.concerns);
    prompt.push_str(
        "\nProvide your analysis in this exact JSON structure with NO additional text or markdown. \
         Return ONLY the JSON document. complianceMapping may be omitted if no framework applies:\n",
    );
    prompt.push_str(ASSESSMENT_TEMPLATE);
    prompt
}

fn push_field(prompt: &mut String, label: &str, value: &str) {
    let value = value.trim();
    prompt.push_str("- ");
    prompt.push_str(label);
    prompt.push_str(": ");
    prompt.push_str(if value.is_empty() { NOT_SPECIFIED } else { value });
    prompt.push('\n');
}
