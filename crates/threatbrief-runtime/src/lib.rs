//! # threatbrief-runtime
//!
//! Async side of threatbrief: talks to the analysis generator and turns its
//! reply into a published [`Assessment`](threatbrief_core::Assessment).
//!
//! The generator is untrusted. Everything it returns passes through the
//! fence stripper, the document parser, and the schema validator in
//! `threatbrief-core` before anything is published.
//!
//! ## Example
//!
//! ```rust,ignore
//! use threatbrief_runtime::{AnalysisOrchestrator, ProviderRegistry, RuntimeConfig, Session};
//!
//! let config = RuntimeConfig::from_yaml_file("threatbrief.yaml")?;
//! let provider = ProviderRegistry::with_defaults().create(&config.provider, &config)?;
//! let orchestrator = AnalysisOrchestrator::builder()
//!     .provider(provider)
//!     .config(&config)
//!     .build()?;
//!
//! let session = Session::new();
//! session.analyze(&orchestrator, profile).await?;
//! let (filename, text) = session.report(today).unwrap();
//! ```

pub mod config;
pub mod orchestrator;
pub mod prompts;
pub mod providers;
pub mod session;

pub use config::{ConfigError, RuntimeConfig};
pub use orchestrator::{
    AnalysisError, AnalysisErrorKind, AnalysisOrchestrator, AnalysisOrchestratorBuilder,
    AnalysisPhase,
};
pub use prompts::build_analysis_prompt;
pub use providers::{
    ChatMessage, CompletionConfig, CompletionResponse, LlmProvider, ProviderError,
    ProviderFactory, ProviderRegistry, Role, TokenUsage,
};
pub use session::{AnalysisOutcome, PublishedAssessment, RequestTicket, Session};

#[cfg(feature = "anthropic")]
pub use providers::{AnthropicProvider, AnthropicProviderFactory, ANTHROPIC_API_KEY_ENV};
