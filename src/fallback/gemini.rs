//! Google Gemini client for the fallback model

use std::time::Duration;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{FallbackError, FallbackModel};

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

/// Blocking Gemini `generateContent` client
///
/// The request timeout is enforced by the HTTP client, so a hung call
/// surfaces as [`FallbackError::Http`].
#[derive(Debug, Clone)]
pub struct GeminiModel {
    client: Client,
    api_key: String,
    model: String,
    temperature: f32,
    base_url: String,
}

impl GeminiModel {
    pub fn new(api_key: &str, model: &str, timeout: Duration) -> Result<Self, FallbackError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            api_key: api_key.to_string(),
            model: model.to_string(),
            temperature: 0.1,
            base_url: BASE_URL.to_string(),
        })
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Point the client at a different API root (proxies, tests)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

impl FallbackModel for GeminiModel {
    fn generate(&self, prompt: &str) -> Result<String, FallbackError> {
        let request = GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: self.temperature,
            },
        };

        debug!(model = %self.model, "calling fallback model");
        // Key travels in a header and errors drop the URL, so log lines never carry it
        let response = self
            .client
            .post(self.endpoint())
            .header(API_KEY_HEADER, &self.api_key)
            .json(&request)
            .send()
            .map_err(|e| FallbackError::Http(e.without_url()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(FallbackError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse = response
            .json()
            .map_err(|e| FallbackError::Http(e.without_url()))?;
        let text = parsed
            .candidates
            .into_iter()
            .filter_map(|c| c.content)
            .flat_map(|c| c.parts)
            .map(|p| p.text)
            .collect::<Vec<_>>()
            .join("");

        if text.trim().is_empty() {
            return Err(FallbackError::EmptyResponse);
        }
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint() {
        let model = GeminiModel::new("key", "gemini-pro", Duration::from_secs(5))
            .unwrap()
            .with_base_url("http://localhost:9999/v1beta/models/");
        assert_eq!(
            model.endpoint(),
            "http://localhost:9999/v1beta/models/gemini-pro:generateContent"
        );
    }

    #[test]
    fn test_request_shape() {
        let request = GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: "hello" }],
            }],
            generation_config: GenerationConfig { temperature: 0.5 },
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(json["generationConfig"]["temperature"], 0.5);
    }

    #[test]
    fn test_unreachable_host_is_error() {
        // Port 9 (discard) on localhost is not an HTTP server
        let model = GeminiModel::new("key", "gemini-pro", Duration::from_millis(500))
            .unwrap()
            .with_base_url("http://127.0.0.1:9");
        assert!(model.generate("hello").is_err());
    }

    #[test]
    fn test_transport_error_hides_api_key() {
        let model = GeminiModel::new("SECRET", "gemini-pro", Duration::from_millis(500))
            .unwrap()
            .with_base_url("http://127.0.0.1:9");
        let err = model.generate("hello").unwrap_err();
        assert!(matches!(err, FallbackError::Http(_)));
        assert!(!err.to_string().contains("SECRET"));
        assert!(!format!("{:?}", err).contains("SECRET"));
    }
}
