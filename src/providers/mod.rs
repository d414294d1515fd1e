// Multi-provider quiz generation support
//
// This module provides an abstraction layer over the generative backends
// (Gemini, OpenRouter, OpenAI) behind one uniform contract. Adapters never
// raise to the caller: every attempt resolves to a `ProviderOutcome` the
// orchestrator can route on.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

use crate::generate::validate::{parse_quiz_response, ParseError};
use crate::quiz::QuizItem;

pub mod factory;
pub mod gemini;
pub mod openai;

pub use factory::create_providers;
pub use gemini::GeminiProvider;
pub use openai::OpenAiCompatProvider;

/// Upper bound on a single provider attempt. An unbounded network call
/// inside a user-facing request is an availability risk; a timeout is
/// treated exactly like any other recoverable failure.
pub const PROVIDER_TIMEOUT: Duration = Duration::from_secs(45);

/// Recoverable ways a provider attempt can fail. `Unavailable` is not here:
/// a missing credential is a routing signal, not an error.
#[derive(Debug, Error)]
pub enum ProviderFailure {
    #[error("provider call failed: {0}")]
    CallFailed(String),
    #[error("provider call timed out after {0:?}")]
    Timeout(Duration),
    #[error("provider response could not be parsed: {0}")]
    MalformedResponse(#[from] ParseError),
    #[error("generation blocked by the provider's content-safety filters")]
    SafetyBlocked,
}

/// What every adapter attempt resolves to.
#[derive(Debug)]
pub enum ProviderOutcome {
    Success(Vec<QuizItem>),
    RecoverableFailure(ProviderFailure),
    Unavailable,
}

/// Trait for generative quiz providers.
///
/// Adapters implement the raw completion call; the provided `generate`
/// wrapper applies the shared timeout and response validation so every
/// backend honors the same structural contract.
#[async_trait]
pub trait QuizProvider: Send + Sync {
    /// Send the rendered prompt and return the provider's raw text.
    async fn complete(&self, prompt: &str) -> Result<String, ProviderFailure>;

    /// Provider name (e.g. "gemini", "openrouter", "openai").
    fn name(&self) -> &str;

    /// Model identifier this adapter will call.
    fn default_model(&self) -> &str;

    /// True once credentials were supplied at construction time. A
    /// non-configured adapter is permanently `Unavailable` and never
    /// attempts a network call.
    fn is_configured(&self) -> bool;

    /// Providers sharing a safety policy source. Once one of them blocks an
    /// input, the orchestrator skips the others for that input instead of
    /// replaying it into the same filter.
    fn safety_domain(&self) -> &str {
        self.name()
    }

    /// Uniform adapter contract: bounded call, validated response, never
    /// panics, never raises.
    async fn generate(&self, prompt: &str, num_questions: usize) -> ProviderOutcome {
        if !self.is_configured() {
            return ProviderOutcome::Unavailable;
        }

        let raw = match tokio::time::timeout(PROVIDER_TIMEOUT, self.complete(prompt)).await {
            Err(_) => {
                return ProviderOutcome::RecoverableFailure(ProviderFailure::Timeout(
                    PROVIDER_TIMEOUT,
                ))
            }
            Ok(Err(failure)) => return ProviderOutcome::RecoverableFailure(failure),
            Ok(Ok(raw)) => raw,
        };

        match parse_quiz_response(&raw, num_questions) {
            Ok(items) => ProviderOutcome::Success(items),
            Err(e) => ProviderOutcome::RecoverableFailure(ProviderFailure::MalformedResponse(e)),
        }
    }
}
