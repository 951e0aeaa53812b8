//! Analysis orchestrator.
//!
//! Drives one analysis through a fixed state machine:
//!
//! ```text
//! Idle -> Requesting -> ParsingResponse -> Validating -> Ready
//!              \              \                \
//!               +--------------+----------------+--> Error(kind)
//! ```
//!
//! Exactly one generator request is sent per [`AnalysisOrchestrator::run_analysis`]
//! call. Failures are terminal for that call; nothing is retried.
//!
//! Calls may overlap. The reported phase belongs to the most recently
//! started call; an older call that finishes later leaves it alone.

use parking_lot::Mutex;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use thiserror::Error;

use threatbrief_core::{
    parse_document, strip_code_fences, validate, Assessment, MalformedResponse,
    OrganizationProfile, ProfileError, ValidationError,
};

use crate::config::RuntimeConfig;
use crate::prompts::build_analysis_prompt;
use crate::providers::{ChatMessage, CompletionConfig, LlmProvider, ProviderError};

/// Which of the four failure kinds ended an analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnalysisErrorKind {
    Precondition,
    Transport,
    MalformedResponse,
    SchemaViolation,
}

impl fmt::Display for AnalysisErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisErrorKind::Precondition => write!(f, "precondition"),
            AnalysisErrorKind::Transport => write!(f, "transport"),
            AnalysisErrorKind::MalformedResponse => write!(f, "malformed response"),
            AnalysisErrorKind::SchemaViolation => write!(f, "schema violation"),
        }
    }
}

/// Errors from running an analysis.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("cannot start analysis: {0}")]
    Precondition(#[from] ProfileError),

    #[error("analysis service failed: {0}")]
    Transport(#[from] ProviderError),

    #[error("analysis service replied with unusable content: {0}")]
    MalformedResponse(#[from] MalformedResponse),

    #[error("analysis service replied with an invalid assessment: {0}")]
    SchemaViolation(#[from] ValidationError),
}

impl AnalysisError {
    pub fn kind(&self) -> AnalysisErrorKind {
        match self {
            AnalysisError::Precondition(_) => AnalysisErrorKind::Precondition,
            AnalysisError::Transport(_) => AnalysisErrorKind::Transport,
            AnalysisError::MalformedResponse(_) => AnalysisErrorKind::MalformedResponse,
            AnalysisError::SchemaViolation(_) => AnalysisErrorKind::SchemaViolation,
        }
    }
}

/// Where the orchestrator is in its state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisPhase {
    Idle,
    Requesting,
    ParsingResponse,
    Validating,
    Ready,
    Error(AnalysisErrorKind),
}

impl AnalysisPhase {
    /// A request is outstanding or its reply is being processed.
    pub fn is_in_flight(&self) -> bool {
        matches!(
            self,
            AnalysisPhase::Requesting | AnalysisPhase::ParsingResponse | AnalysisPhase::Validating
        )
    }
}

impl fmt::Display for AnalysisPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisPhase::Idle => write!(f, "idle"),
            AnalysisPhase::Requesting => write!(f, "requesting"),
            AnalysisPhase::ParsingResponse => write!(f, "parsing response"),
            AnalysisPhase::Validating => write!(f, "validating"),
            AnalysisPhase::Ready => write!(f, "ready"),
            AnalysisPhase::Error(kind) => write!(f, "error ({})", kind),
        }
    }
}

/// Sequences prompt construction, the generator call, and validation.
pub struct AnalysisOrchestrator {
    provider: Arc<dyn LlmProvider>,
    completion: CompletionConfig,
    phase: Mutex<AnalysisPhase>,
    /// Number of the most recently started run.
    latest_run: AtomicU64,
}

impl AnalysisOrchestrator {
    pub fn new(provider: Arc<dyn LlmProvider>, completion: CompletionConfig) -> Self {
        Self {
            provider,
            completion,
            phase: Mutex::new(AnalysisPhase::Idle),
            latest_run: AtomicU64::new(0),
        }
    }

    pub fn builder() -> AnalysisOrchestratorBuilder {
        AnalysisOrchestratorBuilder::new()
    }

    /// Current phase of the most recently started invocation.
    pub fn phase(&self) -> AnalysisPhase {
        *self.phase.lock()
    }

    pub fn completion_config(&self) -> &CompletionConfig {
        &self.completion
    }

    /// Run one analysis for `profile`.
    ///
    /// A profile without a name or industry fails with
    /// [`AnalysisError::Precondition`] before any request is sent, and
    /// leaves the phase unchanged.
    pub async fn run_analysis(
        &self,
        profile: &OrganizationProfile,
    ) -> Result<Assessment, AnalysisError> {
        profile.check_ready()?;

        let run = self.latest_run.fetch_add(1, Ordering::SeqCst) + 1;
        let result = self.drive(run, profile).await;
        match &result {
            Ok(assessment) => {
                self.set_phase(run, AnalysisPhase::Ready);
                tracing::info!(
                    organization = %profile.name,
                    risk_score = assessment.overall_risk_score,
                    "analysis ready"
                );
            }
            Err(e) => {
                self.set_phase(run, AnalysisPhase::Error(e.kind()));
                tracing::warn!(
                    organization = %profile.name,
                    kind = %e.kind(),
                    error = %e,
                    "analysis failed"
                );
            }
        }
        result
    }

    async fn drive(
        &self,
        run: u64,
        profile: &OrganizationProfile,
    ) -> Result<Assessment, AnalysisError> {
        self.set_phase(run, AnalysisPhase::Requesting);
        let prompt = build_analysis_prompt(profile);
        tracing::debug!(
            provider = self.provider.name(),
            model = %self.completion.model,
            estimated_tokens = self.provider.estimate_tokens(&prompt),
            "sending analysis request"
        );

        let deadline = self.completion.timeout;
        let response = tokio::time::timeout(
            deadline,
            self.provider
                .complete(vec![ChatMessage::user(prompt)], &self.completion),
        )
        .await
        .map_err(|_| ProviderError::Timeout(deadline))??;
        tracing::debug!(
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            stop_reason = ?response.stop_reason,
            "analysis response received"
        );
        if response.is_truncated() {
            tracing::warn!(
                max_tokens = self.completion.max_tokens,
                "response hit the token limit and is likely incomplete"
            );
        }

        self.set_phase(run, AnalysisPhase::ParsingResponse);
        let document = parse_document(strip_code_fences(&response.content))?;

        self.set_phase(run, AnalysisPhase::Validating);
        Ok(validate(&document)?)
    }

    fn set_phase(&self, run: u64, phase: AnalysisPhase) {
        let mut current = self.phase.lock();
        if run != self.latest_run.load(Ordering::SeqCst) {
            tracing::debug!(run, phase = %phase, "superseded run, phase not recorded");
            return;
        }
        tracing::debug!(run, phase = %phase, "analysis phase");
        *current = phase;
    }
}

impl fmt::Debug for AnalysisOrchestrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalysisOrchestrator")
            .field("provider", &self.provider.name())
            .field("completion", &self.completion)
            .field("phase", &self.phase())
            .finish()
    }
}

/// Builder for [`AnalysisOrchestrator`].
pub struct AnalysisOrchestratorBuilder {
    provider: Option<Arc<dyn LlmProvider>>,
    completion: CompletionConfig,
}

impl AnalysisOrchestratorBuilder {
    pub fn new() -> Self {
        Self {
            provider: None,
            completion: CompletionConfig::default(),
        }
    }

    pub fn provider(mut self, provider: Arc<dyn LlmProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Take completion settings from runtime configuration.
    pub fn config(mut self, config: &RuntimeConfig) -> Self {
        self.completion = config.completion_config();
        self
    }

    pub fn completion(mut self, completion: CompletionConfig) -> Self {
        self.completion = completion;
        self
    }

    pub fn build(self) -> Result<AnalysisOrchestrator, ProviderError> {
        let provider = self
            .provider
            .ok_or_else(|| ProviderError::NotConfigured("No provider set".to_string()))?;

        Ok(AnalysisOrchestrator::new(provider, self.completion))
    }
}

impl Default for AnalysisOrchestratorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
