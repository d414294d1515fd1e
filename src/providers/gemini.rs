// Google Gemini adapter - the primary generation backend
//
// Gemini supports native JSON output (responseMimeType) and reports
// content-safety decisions both as a prompt-level block reason and as a
// candidate finish reason; both map to `ProviderFailure::SafetyBlocked`.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{ProviderFailure, QuizProvider};
use crate::generate::prompt::SYSTEM_INSTRUCTION;

const REQUEST_TIMEOUT_SECS: u64 = 60;
const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Google Gemini API adapter.
pub struct GeminiProvider {
    client: Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
}

impl GeminiProvider {
    /// Create the adapter. A `None` or empty key makes it permanently
    /// unavailable; no network call is ever attempted.
    pub fn new(api_key: Option<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_key: api_key.filter(|k| !k.is_empty()),
            model: DEFAULT_MODEL.to_string(),
            base_url: GEMINI_BASE_URL.to_string(),
        })
    }

    /// Override the default model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Override the API endpoint (used by tests against a local server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl QuizProvider for GeminiProvider {
    async fn complete(&self, prompt: &str) -> Result<String, ProviderFailure> {
        let api_key = self.api_key.as_deref().unwrap_or_default();
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, api_key
        );

        let body = GeminiRequest {
            system_instruction: GeminiContent::user(SYSTEM_INSTRUCTION),
            contents: vec![GeminiContent::user(prompt)],
            generation_config: GeminiGenerationConfig {
                response_mime_type: "application/json",
                temperature: 0.7,
            },
        };

        tracing::debug!(model = %self.model, "sending request to Gemini API");

        let response = self
            .client
            .post(&url)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderFailure::Timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
                } else {
                    ProviderFailure::CallFailed(format!("Gemini request failed: {e}"))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            if error_body.to_lowercase().contains("safety") {
                return Err(ProviderFailure::SafetyBlocked);
            }
            return Err(ProviderFailure::CallFailed(format!(
                "Gemini API returned status {status}: {error_body}"
            )));
        }

        let parsed: GeminiResponse = response.json().await.map_err(|e| {
            ProviderFailure::CallFailed(format!("Gemini response body unreadable: {e}"))
        })?;

        if let Some(feedback) = &parsed.prompt_feedback {
            if feedback.block_reason.is_some() {
                return Err(ProviderFailure::SafetyBlocked);
            }
        }

        let candidate = parsed
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| ProviderFailure::CallFailed("Gemini returned no candidates".into()))?;

        if candidate.finish_reason.as_deref() == Some("SAFETY") {
            return Err(ProviderFailure::SafetyBlocked);
        }

        let text: String = candidate
            .content
            .parts
            .into_iter()
            .filter_map(|part| part.text)
            .collect::<Vec<_>>()
            .join("\n");

        if text.is_empty() {
            return Err(ProviderFailure::CallFailed(
                "Gemini returned an empty candidate".into(),
            ));
        }
        Ok(text)
    }

    fn name(&self) -> &str {
        "gemini"
    }

    fn default_model(&self) -> &str {
        &self.model
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn safety_domain(&self) -> &str {
        "google"
    }
}

// Gemini API types

#[derive(Debug, Serialize)]
struct GeminiRequest {
    #[serde(rename = "systemInstruction")]
    system_instruction: GeminiContent,
    contents: Vec<GeminiContent>,
    #[serde(rename = "generationConfig")]
    generation_config: GeminiGenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    role: String,
    parts: Vec<GeminiPart>,
}

impl GeminiContent {
    fn user(text: &str) -> Self {
        Self {
            role: "user".to_string(),
            parts: vec![GeminiPart {
                text: Some(text.to_string()),
            }],
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
struct GeminiGenerationConfig {
    #[serde(rename = "responseMimeType")]
    response_mime_type: &'static str,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(rename = "promptFeedback")]
    prompt_feedback: Option<GeminiPromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: GeminiCandidateContent,
    #[serde(rename = "finishReason")]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidateContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Deserialize)]
struct GeminiPromptFeedback {
    #[serde(rename = "blockReason")]
    block_reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::ProviderOutcome;

    const QUIZ_JSON: &str = r#"[{
        "question": "Quel organite produit l'énergie cellulaire ?",
        "options": ["La mitochondrie", "Le noyau", "Le ribosome", "La vacuole"],
        "answer": "La mitochondrie",
        "explanation": "La mitochondrie assure la respiration cellulaire."
    }]"#;

    fn gemini_body(text: &str) -> String {
        serde_json::json!({
            "candidates": [{
                "content": { "parts": [{ "text": text }], "role": "model" },
                "finishReason": "STOP"
            }]
        })
        .to_string()
    }

    #[test]
    fn test_missing_key_is_unconfigured() {
        let provider = GeminiProvider::new(None).unwrap();
        assert!(!provider.is_configured());
        let provider = GeminiProvider::new(Some(String::new())).unwrap();
        assert!(!provider.is_configured());
    }

    #[test]
    fn test_identity_and_model_override() {
        let provider = GeminiProvider::new(Some("test-key".to_string()))
            .unwrap()
            .with_model("gemini-1.5-flash");
        assert_eq!(provider.name(), "gemini");
        assert_eq!(provider.default_model(), "gemini-1.5-flash");
        assert_eq!(provider.safety_domain(), "google");
    }

    #[tokio::test]
    async fn test_unconfigured_never_calls_network() {
        // base_url points nowhere reachable; Unavailable must come back
        // before any connection attempt.
        let provider = GeminiProvider::new(None)
            .unwrap()
            .with_base_url("http://127.0.0.1:1");
        assert!(matches!(
            provider.generate("prompt", 3).await,
            ProviderOutcome::Unavailable
        ));
    }

    #[tokio::test]
    async fn test_successful_generation_parses_items() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/models/gemini-2.0-flash:generateContent")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(gemini_body(QUIZ_JSON))
            .create_async()
            .await;

        let provider = GeminiProvider::new(Some("test-key".to_string()))
            .unwrap()
            .with_base_url(server.url());

        match provider.generate("prompt", 3).await {
            ProviderOutcome::Success(items) => {
                assert_eq!(items.len(), 1);
                assert_eq!(items[0].answer, "La mitochondrie");
            }
            other => panic!("expected success, got {other:?}"),
        }
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_prompt_block_reason_maps_to_safety() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/models/gemini-2.0-flash:generateContent")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"candidates": [], "promptFeedback": {"blockReason": "SAFETY"}}"#)
            .create_async()
            .await;

        let provider = GeminiProvider::new(Some("test-key".to_string()))
            .unwrap()
            .with_base_url(server.url());

        assert!(matches!(
            provider.complete("prompt").await,
            Err(ProviderFailure::SafetyBlocked)
        ));
    }

    #[tokio::test]
    async fn test_http_error_is_call_failed() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/models/gemini-2.0-flash:generateContent")
            .match_query(mockito::Matcher::Any)
            .with_status(500)
            .with_body("internal error")
            .create_async()
            .await;

        let provider = GeminiProvider::new(Some("test-key".to_string()))
            .unwrap()
            .with_base_url(server.url());

        assert!(matches!(
            provider.complete("prompt").await,
            Err(ProviderFailure::CallFailed(_))
        ));
    }

    #[tokio::test]
    async fn test_error_body_mentioning_safety_maps_to_safety() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/models/gemini-2.0-flash:generateContent")
            .match_query(mockito::Matcher::Any)
            .with_status(400)
            .with_body(r#"{"error": {"message": "Request blocked by SAFETY settings"}}"#)
            .create_async()
            .await;

        let provider = GeminiProvider::new(Some("test-key".to_string()))
            .unwrap()
            .with_base_url(server.url());

        assert!(matches!(
            provider.complete("prompt").await,
            Err(ProviderFailure::SafetyBlocked)
        ));
    }

    #[tokio::test]
    async fn test_malformed_candidate_text_is_recoverable_parse_failure() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/models/gemini-2.0-flash:generateContent")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(gemini_body("ceci n'est pas du JSON"))
            .create_async()
            .await;

        let provider = GeminiProvider::new(Some("test-key".to_string()))
            .unwrap()
            .with_base_url(server.url());

        assert!(matches!(
            provider.generate("prompt", 3).await,
            ProviderOutcome::RecoverableFailure(ProviderFailure::MalformedResponse(_))
        ));
    }
}
