//! Shared fixtures for unit tests.

use serde_json::{json, Value};

use crate::assessment::{validate, Assessment};
use crate::profile::OrganizationProfile;

/// Smallest document that satisfies every required field.
pub(crate) fn minimal_assessment_json(score: u8) -> Value {
    json!({
        "overallRiskScore": score,
        "industryBenchmark": {
            "averageScore": 65,
            "percentile": 60,
            "comparison": "above industry average",
            "industryContext": "Healthcare is a primary ransomware target."
        },
        "companyProfile": {
            "summary": "Regional hospital network modernizing its EHR platform.",
            "keyInitiatives": ["EHR migration", "Telehealth expansion"]
        },
        "threatAnalysis": {
            "primaryThreats": [
                {
                    "type": "Ransomware",
                    "risk": "High",
                    "description": "Clinical systems are high-value extortion targets.",
                    "urgencyScore": 9
                }
            ],
            "ransomwareTypes": ["LockBit", "BlackCat"],
            "attackVectors": ["Phishing", "Exposed RDP"]
        },
        "swotAnalysis": {
            "strengths": ["Dedicated security team"],
            "weaknesses": ["Legacy imaging systems"],
            "opportunities": ["Cloud backup modernization"],
            "threats": ["Regulatory penalties"]
        },
        "vulnerabilities": [
            {
                "area": "Backup infrastructure",
                "severity": "Critical",
                "impact": "Extended downtime after an attack",
                "urgencyScore": 8
            }
        ],
        "valueProps": [
            {
                "pain": "Slow recovery",
                "solution": "Immutable backups",
                "benefit": "Recovery in hours instead of weeks"
            }
        ],
        "discoveryQuestions": [
            "How often are backups tested?",
            "Who owns incident response?"
        ],
        "actionPlan": [
            {
                "priority": 1,
                "action": "Deploy immutable backups",
                "timeline": "Immediate",
                "resources": "Backup admin, vendor support",
                "expectedOutcome": "Ransomware-resilient recovery"
            },
            {
                "priority": 2,
                "action": "Roll out MFA",
                "timeline": "1-3 months",
                "resources": "IAM team",
                "expectedOutcome": "Reduced credential theft"
            }
        ],
        "preMeetingBrief": "Acme is mid-way through an EHR migration.",
        "executiveSummary": "Acme faces elevated ransomware exposure."
    })
}

pub(crate) fn minimal_assessment(score: u8) -> Assessment {
    validate(&minimal_assessment_json(score)).unwrap()
}

pub(crate) fn acme_profile() -> OrganizationProfile {
    OrganizationProfile::new("Acme", "Healthcare")
}
