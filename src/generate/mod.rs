// Quiz generation pipeline
//
// The orchestrator tries providers strictly in priority order, then falls
// through to local extraction. Its contract is "never raises, never returns
// nothing": every failure mode is recovered internally, and the worst case
// is a set of explicitly marked degraded placeholder items.

pub mod extractive;
pub mod prompt;
pub mod sampler;
pub mod summary;
pub mod validate;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::config::{load_settings, Settings};
use crate::nlp::LinguisticSupport;
use crate::providers::{self, ProviderFailure, ProviderOutcome, QuizProvider};
use crate::quiz::{QuizItem, QuizRequest, DEGRADED_MARKER};
use extractive::ExtractiveGenerator;

/// Character budget for the excerpt sent to providers and the summary path.
pub const MAX_SAMPLE_CHARS: usize = 4000;

/// The generation pipeline.
///
/// Built once at startup: the provider chain comes from configuration and
/// the linguistic resource is resolved here, never probed during request
/// handling. Everything else is request-scoped.
pub struct QuizGenerator {
    providers: Vec<Box<dyn QuizProvider>>,
    linguistic: LinguisticSupport,
}

impl QuizGenerator {
    /// Wire the pipeline from resolved settings.
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let providers = providers::create_providers(settings)?;
        let linguistic = LinguisticSupport::load(settings.lexicon_path.as_deref());
        Ok(Self {
            providers,
            linguistic,
        })
    }

    /// Wire the pipeline from explicit parts (used by tests and embedders).
    pub fn new(providers: Vec<Box<dyn QuizProvider>>, linguistic: LinguisticSupport) -> Self {
        Self {
            providers,
            linguistic,
        }
    }

    /// Generate a quiz. Never fails, never returns an empty list.
    pub async fn generate(&self, request: &QuizRequest) -> Vec<QuizItem> {
        let mut rng = SmallRng::from_entropy();
        self.generate_with_rng(request, &mut rng).await
    }

    /// Same as [`generate`](Self::generate) with an injected random source,
    /// so callers can make extraction deterministic.
    pub async fn generate_with_rng<R: Rng>(
        &self,
        request: &QuizRequest,
        rng: &mut R,
    ) -> Vec<QuizItem> {
        let excerpt = sampler::sample_text(&request.source_text, MAX_SAMPLE_CHARS);
        let prompt = prompt::build_prompt(&excerpt, request.num_questions, request.difficulty);

        let mut blocked_domains: Vec<String> = Vec::new();
        for provider in &self.providers {
            if blocked_domains.iter().any(|d| d == provider.safety_domain()) {
                tracing::info!(
                    provider = provider.name(),
                    "skipping provider whose safety domain already blocked this input"
                );
                continue;
            }

            match provider.generate(&prompt, request.num_questions).await {
                ProviderOutcome::Success(items) => {
                    tracing::info!(
                        provider = provider.name(),
                        count = items.len(),
                        "provider generation succeeded"
                    );
                    return items;
                }
                ProviderOutcome::Unavailable => {
                    tracing::debug!(provider = provider.name(), "provider not configured");
                }
                ProviderOutcome::RecoverableFailure(ProviderFailure::SafetyBlocked) => {
                    tracing::warn!(
                        provider = provider.name(),
                        "input blocked by content-safety filters"
                    );
                    blocked_domains.push(provider.safety_domain().to_string());
                }
                ProviderOutcome::RecoverableFailure(failure) => {
                    tracing::warn!(provider = provider.name(), %failure, "provider attempt failed");
                }
            }
        }

        if !blocked_domains.is_empty() {
            // A safety block is about the input, not the backend. Local
            // extraction of that same input would reproduce the flagged
            // content, so the degraded item explains instead.
            return safety_blocked_items(request.num_questions);
        }

        tracing::info!("provider chain exhausted; falling back to extractive generation");
        ExtractiveGenerator::new(&self.linguistic).generate(
            &request.source_text,
            request.num_questions,
            request.difficulty,
            rng,
        )
    }
}

/// Degraded item emitted when providers refused the input on safety grounds.
fn safety_blocked_items(num_questions: usize) -> Vec<QuizItem> {
    let item = QuizItem {
        question: format!("{DEGRADED_MARKER} Contenu Bloqué (Filtres de Sécurité)"),
        options: vec![
            "Réessayer".to_string(),
            "Changer de texte".to_string(),
            "Mode Local".to_string(),
            "Désactiver les filtres".to_string(),
        ],
        answer: "Changer de texte".to_string(),
        explanation: "Le fournisseur d'IA a détecté du contenu sensible dans votre document et a \
                      bloqué la génération par sécurité. Essayez un autre document ou retirez les \
                      passages sensibles."
            .to_string(),
    };
    vec![item; num_questions]
}

/// Sole inbound entry point for surrounding code: resolves configuration,
/// wires the pipeline and generates. Long-lived callers should build one
/// [`QuizGenerator`] instead so the lexicon loads once.
pub async fn generate_quiz(text: &str, num_questions: usize, difficulty: &str) -> Vec<QuizItem> {
    let settings = load_settings().unwrap_or_else(|e| {
        tracing::warn!("failed to load settings, running local-only: {e:#}");
        Settings::default()
    });
    let generator = match QuizGenerator::from_settings(&settings) {
        Ok(generator) => generator,
        Err(e) => {
            tracing::warn!("failed to wire providers, running local-only: {e:#}");
            QuizGenerator::new(Vec::new(), LinguisticSupport::Unavailable)
        }
    };
    let difficulty = difficulty.parse().unwrap_or_default();
    generator
        .generate(&QuizRequest::new(text, num_questions, difficulty))
        .await
}
