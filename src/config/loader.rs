// Configuration loader
// Loads provider credentials from ~/.eduquiz/config.toml or environment
// variables. Missing configuration is not an error: the pipeline runs in
// local-only mode with every adapter unavailable.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use super::provider::ProviderEntry;
use super::settings::Settings;

/// Load configuration: config file first, environment second.
pub fn load_settings() -> Result<Settings> {
    if let Some(home) = dirs::home_dir() {
        let config_path = home.join(".eduquiz/config.toml");
        if let Some(settings) = try_load_from_file(&config_path)? {
            return Ok(settings);
        }
    }
    Ok(settings_from_env())
}

/// Parse a config file if it exists. A present-but-corrupt file is an error
/// the operator should see at startup; an absent file is not.
pub fn try_load_from_file(path: &Path) -> Result<Option<Settings>> {
    if !path.exists() {
        return Ok(None);
    }

    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file {}", path.display()))?;

    #[derive(serde::Deserialize)]
    struct TomlConfig {
        #[serde(default)]
        providers: Vec<ProviderEntry>,
        #[serde(default)]
        lexicon_path: Option<PathBuf>,
    }

    let toml_config: TomlConfig = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse configuration file {}", path.display()))?;

    let mut settings = Settings::with_providers(toml_config.providers);
    // env var wins over the file for the lexicon so a shell session can
    // point at a different treebank without editing the config
    settings.lexicon_path = env_nonempty("EDUQUIZ_LEXICON_PATH")
        .map(PathBuf::from)
        .or(toml_config.lexicon_path);

    Ok(Some(settings))
}

/// Build settings from environment variables, in the fixed priority order
/// gemini → openrouter → openai.
pub fn settings_from_env() -> Settings {
    let providers = vec![
        ProviderEntry::Gemini {
            api_key: env_nonempty("GOOGLE_API_KEY"),
            model: env_nonempty("GEMINI_MODEL"),
        },
        ProviderEntry::Openrouter {
            api_key: env_nonempty("OPENROUTER_API_KEY"),
            model: env_nonempty("OPENROUTER_MODEL"),
        },
        ProviderEntry::Openai {
            api_key: env_nonempty("OPENAI_API_KEY"),
            model: env_nonempty("OPENAI_MODEL"),
        },
    ];

    Settings {
        providers,
        lexicon_path: env_nonempty("EDUQUIZ_LEXICON_PATH").map(PathBuf::from),
    }
}

fn env_nonempty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}
