// Configuration structs

use std::path::PathBuf;

use super::provider::ProviderEntry;

/// Resolved pipeline configuration.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    /// Provider entries in fallback priority order.
    pub providers: Vec<ProviderEntry>,

    /// CoNLL-U treebank backing the POS lexicon. `None` (or an unloadable
    /// path) disables linguistic extraction; the pipeline still works.
    pub lexicon_path: Option<PathBuf>,
}

impl Settings {
    pub fn with_providers(providers: Vec<ProviderEntry>) -> Self {
        Self {
            providers,
            lexicon_path: None,
        }
    }

    /// Number of entries carrying usable credentials.
    pub fn configured_count(&self) -> usize {
        self.providers.iter().filter(|p| p.is_configured()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_have_no_providers() {
        let settings = Settings::default();
        assert!(settings.providers.is_empty());
        assert_eq!(settings.configured_count(), 0);
        assert!(settings.lexicon_path.is_none());
    }

    #[test]
    fn test_configured_count_ignores_keyless_entries() {
        let settings = Settings::with_providers(vec![
            ProviderEntry::Gemini {
                api_key: Some("key".to_string()),
                model: None,
            },
            ProviderEntry::Openai {
                api_key: None,
                model: None,
            },
        ]);
        assert_eq!(settings.configured_count(), 1);
    }
}
