// Provider factory
//
// Builds the adapter chain from configuration, preserving entry order:
// the order of `[[providers]]` entries IS the fallback priority.

use anyhow::{Context, Result};

use super::gemini::GeminiProvider;
use super::openai::OpenAiCompatProvider;
use super::QuizProvider;
use crate::config::{ProviderEntry, Settings};

/// Create one adapter per configured entry, in priority order. Entries
/// without credentials still produce an adapter; it reports itself
/// `Unavailable` and the orchestrator routes past it.
pub fn create_providers(settings: &Settings) -> Result<Vec<Box<dyn QuizProvider>>> {
    settings
        .providers
        .iter()
        .enumerate()
        .map(|(idx, entry)| {
            create_provider(entry).with_context(|| format!("Failed to create provider #{}", idx + 1))
        })
        .collect()
}

fn create_provider(entry: &ProviderEntry) -> Result<Box<dyn QuizProvider>> {
    Ok(match entry {
        ProviderEntry::Gemini { api_key, model } => {
            let mut provider = GeminiProvider::new(api_key.clone())?;
            if let Some(m) = model {
                provider = provider.with_model(m.clone());
            }
            Box::new(provider)
        }
        ProviderEntry::Openrouter { api_key, model } => {
            let mut provider = OpenAiCompatProvider::new_openrouter(api_key.clone())?;
            if let Some(m) = model {
                provider = provider.with_model(m.clone());
            }
            Box::new(provider)
        }
        ProviderEntry::Openai { api_key, model } => {
            let mut provider = OpenAiCompatProvider::new_openai(api_key.clone())?;
            if let Some(m) = model {
                provider = provider.with_model(m.clone());
            }
            Box::new(provider)
        }
    })
}
