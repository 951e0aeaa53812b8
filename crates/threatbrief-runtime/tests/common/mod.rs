//! Shared fixtures for runtime integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use threatbrief_runtime::{
    ChatMessage, CompletionConfig, CompletionResponse, LlmProvider, ProviderError, TokenUsage,
};

/// A minimal assessment document that passes validation.
pub fn assessment_json(score: u8) -> Value {
    json!({
        "overallRiskScore": score,
        "industryBenchmark": {
            "averageScore": 65,
            "percentile": 70,
            "comparison": "above industry average",
            "industryContext": "Healthcare is the most targeted sector for ransomware."
        },
        "companyProfile": {
            "summary": "Acme runs three hospitals and is consolidating its EHR.",
            "keyInitiatives": ["EHR consolidation"]
        },
        "threatAnalysis": {
            "primaryThreats": [
                {"type": "Ransomware", "risk": "High", "description": "Clinical downtime.", "urgencyScore": 9}
            ],
            "ransomwareTypes": ["BlackCat"],
            "attackVectors": ["Phishing", "Exposed RDP"]
        },
        "swotAnalysis": {
            "strengths": ["Dedicated SOC"],
            "weaknesses": ["Legacy imaging systems"],
            "opportunities": ["Cloud backup"],
            "threats": ["Vendor compromise"]
        },
        "vulnerabilities": [
            {"area": "Backups", "severity": "Critical", "impact": "No clean restore point", "urgencyScore": 10}
        ],
        "valueProps": [
            {"pain": "Slow recovery", "solution": "Immutable snapshots", "benefit": "Hours instead of weeks"}
        ],
        "discoveryQuestions": ["When was the last restore test?"],
        "actionPlan": [
            {
                "priority": 1,
                "action": "Isolate backup network",
                "timeline": "Immediate",
                "resources": "Infrastructure team",
                "expectedOutcome": "Backups survive domain compromise"
            }
        ],
        "preMeetingBrief": "Acme is mid-way through an EHR consolidation.",
        "executiveSummary": "Acme's recovery posture is its largest exposure."
    })
}

/// The assessment wrapped in a tagged code fence, as generators often reply.
pub fn fenced_reply(score: u8) -> String {
    format!("```json\n{:#}\n```", assessment_json(score))
}

enum Step {
    Reply { text: String, delay: Duration },
    Fail(ProviderError),
}

/// Provider that plays back a fixed script, one step per call.
pub struct MockProvider {
    script: Mutex<VecDeque<Step>>,
    calls: AtomicUsize,
}

impl MockProvider {
    pub fn new() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn reply(self, text: impl Into<String>) -> Self {
        self.reply_after(Duration::ZERO, text)
    }

    pub fn reply_after(self, delay: Duration, text: impl Into<String>) -> Self {
        self.script.lock().push_back(Step::Reply {
            text: text.into(),
            delay,
        });
        self
    }

    pub fn fail(self, err: ProviderError) -> Self {
        self.script.lock().push_back(Step::Fail(err));
        self
    }

    pub fn into_arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LlmProvider for MockProvider {
    async fn complete(
        &self,
        _messages: Vec<ChatMessage>,
        config: &CompletionConfig,
    ) -> Result<CompletionResponse, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let step = self
            .script
            .lock()
            .pop_front()
            .ok_or_else(|| ProviderError::HttpError("script exhausted".to_string()))?;

        match step {
            Step::Reply { text, delay } => {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                Ok(CompletionResponse {
                    content: text,
                    usage: TokenUsage::default(),
                    model: config.model.clone(),
                    stop_reason: Some("end_turn".to_string()),
                })
            }
            Step::Fail(err) => Err(err),
        }
    }

    async fn health_check(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        "mock"
    }
}
