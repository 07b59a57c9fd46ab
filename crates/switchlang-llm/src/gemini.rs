//! Gemini Provider Implementation
//!
//! Provides integration with the Google Gemini `generateContent` REST API.
//!
//! # Features
//!
//! - Async HTTP communication, exposed synchronously through `LlmProvider`
//! - Configurable endpoint, model, timeout and retry count
//! - Retry logic with exponential backoff on transport errors, 429 and 5xx
//! - JSON response mode for structured generation
//! - Model listing
//!
//! # Examples
//!
//! ```no_run
//! use switchlang_llm::GeminiProvider;
//! use switchlang_domain::traits::LlmProvider;
//!
//! let provider = GeminiProvider::new("api-key", "gemini-3-flash-preview").unwrap();
//! let text = provider.generate("Say hello").unwrap();
//! ```

use crate::LlmError;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use switchlang_domain::traits::LlmProvider as LlmProviderTrait;
use tracing::{debug, warn};

/// Default Gemini API endpoint
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";

/// Default model
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

/// Default timeout for LLM requests (30 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default number of attempts per request
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Longest wait between attempts
const MAX_BACKOFF_SECS: u64 = 60;

const API_KEY_HEADER: &str = "x-goog-api-key";
const GENERATE_METHOD: &str = "generateContent";

/// Gemini API provider
///
/// The provider owns a current-thread tokio runtime that drives its HTTP
/// client. The synchronous `LlmProvider` methods must not be called from
/// inside another tokio runtime.
pub struct GeminiProvider {
    endpoint: String,
    model: String,
    api_key: String,
    client: reqwest::Client,
    runtime: tokio::runtime::Runtime,
    max_retries: u32,
}

/// Request body for the generateContent API
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    response_mime_type: &'a str,
}

/// Response from the generateContent API
#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

/// Response from the models list API
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListModelsResponse {
    #[serde(default)]
    models: Vec<ModelInfo>,
    next_page_token: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModelInfo {
    name: String,
    #[serde(default)]
    supported_generation_methods: Vec<String>,
}

impl GeminiProvider {
    /// Create a new Gemini provider against the public endpoint
    ///
    /// # Errors
    ///
    /// Returns `LlmError::Configuration` if the API key is empty or the HTTP
    /// client or runtime cannot be built.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self, LlmError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(LlmError::Configuration("API key is empty".to_string()));
        }

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| LlmError::Configuration(format!("Failed to start runtime: {}", e)))?;

        Ok(Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: model.into(),
            api_key,
            client: build_client(Duration::from_secs(DEFAULT_TIMEOUT_SECS))?,
            runtime,
            max_retries: DEFAULT_MAX_RETRIES,
        })
    }

    /// Use a different API endpoint (e.g. a proxy)
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the maximum number of attempts per request
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries.max(1);
        self
    }

    /// Set the per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, LlmError> {
        self.client = build_client(timeout)?;
        Ok(self)
    }

    /// Generate text using the Gemini API
    ///
    /// When `json_mode` is set the API is asked for an `application/json`
    /// response.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The network is unreachable or every attempt failed
    /// - The model is not available (HTTP 404)
    /// - The key is rejected or the request is invalid (other 4xx)
    /// - The response contains no text
    pub async fn generate_async(&self, prompt: &str, json_mode: bool) -> Result<String, LlmError> {
        let url = format!(
            "{}/v1beta/models/{}:{}",
            self.endpoint, self.model, GENERATE_METHOD
        );

        let request_body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config: json_mode.then_some(GenerationConfig {
                response_mime_type: "application/json",
            }),
        };

        debug!("Gemini request to model '{}', prompt {} chars", self.model, prompt.len());

        // Retry logic with exponential backoff
        let mut attempts = 0;
        let mut last_error = None;

        while attempts < self.max_retries {
            match self
                .client
                .post(&url)
                .header(API_KEY_HEADER, &self.api_key)
                .json(&request_body)
                .send()
                .await
            {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        let body = response.json::<GenerateContentResponse>().await.map_err(|e| {
                            LlmError::InvalidResponse(format!("Failed to parse response: {}", e))
                        })?;
                        return extract_text(body);
                    } else if status == reqwest::StatusCode::NOT_FOUND {
                        return Err(LlmError::ModelNotAvailable(self.model.clone()));
                    } else if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                        last_error = Some(LlmError::RateLimitExceeded);
                    } else {
                        let error_text = response
                            .text()
                            .await
                            .unwrap_or_else(|_| "Unknown error".to_string());
                        let error =
                            LlmError::Communication(format!("HTTP {}: {}", status, error_text));
                        if status.is_client_error() {
                            return Err(error);
                        }
                        last_error = Some(error);
                    }
                }
                Err(e) => {
                    last_error = Some(LlmError::Communication(format!("Request failed: {}", e)));
                }
            }

            attempts += 1;
            if attempts < self.max_retries {
                let delay = backoff_delay(attempts);
                warn!("Gemini attempt {} failed, retrying in {:?}", attempts, delay);
                tokio::time::sleep(delay).await;
            }
        }

        Err(last_error
            .unwrap_or_else(|| LlmError::Communication("Max retries exceeded".to_string())))
    }

    /// List models that support content generation, without the `models/`
    /// prefix
    pub async fn list_models_async(&self) -> Result<Vec<String>, LlmError> {
        let url = format!("{}/v1beta/models", self.endpoint);
        let mut names = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self
                .client
                .get(&url)
                .header(API_KEY_HEADER, &self.api_key)
                .query(&[("pageSize", "1000")]);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token.as_str())]);
            }

            let response = request
                .send()
                .await
                .map_err(|e| LlmError::Communication(format!("Request failed: {}", e)))?;

            let status = response.status();
            if !status.is_success() {
                let error_text = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unknown error".to_string());
                return Err(LlmError::Communication(format!("HTTP {}: {}", status, error_text)));
            }

            let page = response.json::<ListModelsResponse>().await.map_err(|e| {
                LlmError::InvalidResponse(format!("Failed to parse model list: {}", e))
            })?;

            names.extend(generation_models(page.models));

            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        Ok(names)
    }

    /// Blocking wrapper for [`GeminiProvider::list_models_async`]
    pub fn list_models(&self) -> Result<Vec<String>, LlmError> {
        self.runtime.block_on(self.list_models_async())
    }
}

impl LlmProviderTrait for GeminiProvider {
    type Error = LlmError;

    fn model_name(&self) -> &str {
        &self.model
    }

    fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
        self.runtime.block_on(self.generate_async(prompt, false))
    }

    fn generate_structured(&self, prompt: &str, _schema: &str) -> Result<String, Self::Error> {
        // The schema travels inside the prompt; the API is only told to emit JSON
        self.runtime.block_on(self.generate_async(prompt, true))
    }
}

fn build_client(timeout: Duration) -> Result<reqwest::Client, LlmError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| LlmError::Configuration(format!("Failed to build HTTP client: {}", e)))
}

/// Concatenate the text parts of the first candidate
fn extract_text(response: GenerateContentResponse) -> Result<String, LlmError> {
    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| LlmError::InvalidResponse("Response has no candidates".to_string()))?;

    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect::<String>())
        .unwrap_or_default();

    if text.is_empty() {
        return Err(LlmError::InvalidResponse("Candidate has no text".to_string()));
    }
    Ok(text)
}

fn generation_models(models: Vec<ModelInfo>) -> impl Iterator<Item = String> {
    models
        .into_iter()
        .filter(|m| m.supported_generation_methods.iter().any(|s| s == GENERATE_METHOD))
        .map(|m| strip_model_prefix(&m.name).to_string())
}

fn strip_model_prefix(name: &str) -> &str {
    name.rsplit('/').next().unwrap_or(name)
}

/// Exponential backoff after the `attempt`-th failure: 1s, 2s, 4s, capped
fn backoff_delay(attempt: u32) -> Duration {
    let secs = 2u64
        .checked_pow(attempt.saturating_sub(1))
        .map_or(MAX_BACKOFF_SECS, |secs| secs.min(MAX_BACKOFF_SECS));
    Duration::from_secs(secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gemini_provider_creation() {
        let provider = GeminiProvider::new("key", "gemini-pro").unwrap();
        assert_eq!(provider.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(provider.model_name(), "gemini-pro");
        assert_eq!(provider.max_retries, DEFAULT_MAX_RETRIES);
    }

    #[test]
    fn test_gemini_provider_rejects_empty_key() {
        let result = GeminiProvider::new("  ", DEFAULT_MODEL);
        assert!(matches!(result, Err(LlmError::Configuration(_))));
    }

    #[test]
    fn test_gemini_provider_builders() {
        let provider = GeminiProvider::new("key", DEFAULT_MODEL)
            .unwrap()
            .with_endpoint("http://localhost:8080/")
            .with_max_retries(0);
        assert_eq!(provider.endpoint, "http://localhost:8080");
        assert_eq!(provider.max_retries, 1);
    }

    #[test]
    fn test_backoff_delay_is_capped() {
        assert_eq!(backoff_delay(1), Duration::from_secs(1));
        assert_eq!(backoff_delay(3), Duration::from_secs(4));
        assert_eq!(backoff_delay(7), Duration::from_secs(MAX_BACKOFF_SECS));
        assert_eq!(backoff_delay(100), Duration::from_secs(MAX_BACKOFF_SECS));
        assert_eq!(backoff_delay(u32::MAX), Duration::from_secs(MAX_BACKOFF_SECS));
    }

    #[test]
    fn test_request_serialization() {
        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: "hi" }],
            }],
            generation_config: Some(GenerationConfig {
                response_mime_type: "application/json",
            }),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hi");
        assert_eq!(json["generationConfig"]["responseMimeType"], "application/json");

        let plain = GenerateContentRequest {
            contents: vec![],
            generation_config: None,
        };
        let json = serde_json::to_value(&plain).unwrap();
        assert!(json.get("generationConfig").is_none());
    }

    #[test]
    fn test_extract_text_joins_parts() {
        let response: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"Hello "},{"text":"world"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(extract_text(response).unwrap(), "Hello world");
    }

    #[test]
    fn test_extract_text_without_candidates() {
        let response: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert!(matches!(
            extract_text(response),
            Err(LlmError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_generation_models_filter() {
        let page: ListModelsResponse = serde_json::from_str(
            r#"{"models":[
                {"name":"models/gemini-3-flash-preview","supportedGenerationMethods":["generateContent","countTokens"]},
                {"name":"models/text-embedding-004","supportedGenerationMethods":["embedContent"]}
            ]}"#,
        )
        .unwrap();
        let names: Vec<String> = generation_models(page.models).collect();
        assert_eq!(names, vec!["gemini-3-flash-preview"]);
        assert!(page.next_page_token.is_none());
    }

    #[test]
    fn test_gemini_error_handling() {
        // Use invalid endpoint to trigger error
        let provider = GeminiProvider::new("key", DEFAULT_MODEL)
            .unwrap()
            .with_endpoint("http://localhost:99999")
            .with_max_retries(1);

        match provider.generate("test") {
            Err(LlmError::Communication(_)) => {} // Expected
            other => panic!("Expected Communication error, got {:?}", other.map(|_| ())),
        }
    }
}
