// Key-point summary generation
//
// Same resilience posture as quiz generation: provider chain first, lexicon
// keywords second, a fixed notice last. Never fails.

use once_cell::sync::Lazy;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use regex::Regex;

use super::{prompt, sampler, QuizGenerator, MAX_SAMPLE_CHARS};
use crate::nlp;
use crate::providers::PROVIDER_TIMEOUT;

/// Cap on returned key points.
const MAX_POINTS: usize = 10;
/// Character budget for the local keyword scan.
const LOCAL_SCAN_CHARS: usize = 2000;

// Leading list decorations models put in front of each point.
static LIST_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\d.\-*\s]+").expect("valid pattern"));

impl QuizGenerator {
    /// Extract the essential points of a document as a short list.
    pub async fn generate_summary(&self, text: &str) -> Vec<String> {
        let excerpt = sampler::sample_text(text, MAX_SAMPLE_CHARS);
        let request = prompt::build_summary_prompt(&excerpt);

        for provider in &self.providers {
            if !provider.is_configured() {
                continue;
            }
            match tokio::time::timeout(PROVIDER_TIMEOUT, provider.complete(&request)).await {
                Ok(Ok(raw)) => {
                    let points = parse_summary(&raw);
                    if !points.is_empty() {
                        return points;
                    }
                    tracing::warn!(provider = provider.name(), "summary response was empty");
                }
                Ok(Err(failure)) => {
                    tracing::warn!(provider = provider.name(), %failure, "summary attempt failed");
                }
                Err(_) => {
                    tracing::warn!(provider = provider.name(), "summary attempt timed out");
                }
            }
        }

        self.local_summary(text)
    }

    /// Lexicon-driven fallback: surface a handful of key concepts.
    fn local_summary(&self, text: &str) -> Vec<String> {
        if let Some(lexicon) = self.linguistic.lexicon() {
            let truncated: String = text.chars().take(LOCAL_SCAN_CHARS).collect();
            let mut keywords: Vec<&str> = Vec::new();
            let mut seen = std::collections::HashSet::new();
            for token in nlp::tokenize(&truncated) {
                if token.chars().count() > 4 && lexicon.is_noun(token) && seen.insert(token) {
                    keywords.push(token);
                }
            }
            if !keywords.is_empty() {
                let mut rng = SmallRng::from_entropy();
                keywords.shuffle(&mut rng);
                return keywords
                    .into_iter()
                    .take(5)
                    .map(|kw| format!("Concept clé : {kw}"))
                    .collect();
            }
        }
        vec!["Synthèse non disponible en mode local.".to_string()]
    }
}

/// Clean a provider's plain-text list into bare points.
fn parse_summary(raw: &str) -> Vec<String> {
    raw.lines()
        .map(|line| LIST_PREFIX.replace(line, "").trim().to_string())
        .filter(|line| !line.is_empty())
        .take(MAX_POINTS)
        .collect()
}
