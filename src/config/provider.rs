// Provider configuration entries
//
// Serializes with a `type` tag, e.g.:
// ```toml
// [[providers]]
// type = "gemini"
// api_key = "AIza..."
// model = "gemini-2.0-flash"
// ```

use serde::{Deserialize, Serialize};

/// A single provider entry. Entry order in the config file is the fallback
/// priority order. `api_key` may be absent: the adapter is then constructed
/// but permanently unavailable, which lets the orchestrator fall through.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProviderEntry {
    Gemini {
        #[serde(default)]
        api_key: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        model: Option<String>,
    },
    Openrouter {
        #[serde(default)]
        api_key: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        model: Option<String>,
    },
    Openai {
        #[serde(default)]
        api_key: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        model: Option<String>,
    },
}

impl ProviderEntry {
    /// Short provider-type tag (e.g. "gemini").
    pub fn provider_type(&self) -> &'static str {
        match self {
            Self::Gemini { .. } => "gemini",
            Self::Openrouter { .. } => "openrouter",
            Self::Openai { .. } => "openai",
        }
    }

    /// True when a non-empty API key is present.
    pub fn is_configured(&self) -> bool {
        let key = match self {
            Self::Gemini { api_key, .. } => api_key,
            Self::Openrouter { api_key, .. } => api_key,
            Self::Openai { api_key, .. } => api_key,
        };
        key.as_deref().is_some_and(|k| !k.is_empty())
    }
}
