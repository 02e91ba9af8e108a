//! Fallback conversational model for queries no rule understands
//!
//! The model is an opaque text-in/text-out collaborator. Failures are typed
//! here and turned into a fixed apology by the pipeline.

mod gemini;

pub use gemini::GeminiModel;

use thiserror::Error;

use crate::core::config::Config;

#[derive(Debug, Error)]
pub enum FallbackError {
    #[error("No fallback model configured (set GEMINI_API_KEY)")]
    NotConfigured,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Model API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Model returned an empty response")]
    EmptyResponse,
}

/// Text generation used for unclassified queries
pub trait FallbackModel {
    fn generate(&self, prompt: &str) -> Result<String, FallbackError>;
}

impl<T: FallbackModel + ?Sized> FallbackModel for Box<T> {
    fn generate(&self, prompt: &str) -> Result<String, FallbackError> {
        (**self).generate(prompt)
    }
}

impl<T: FallbackModel + ?Sized> FallbackModel for &T {
    fn generate(&self, prompt: &str) -> Result<String, FallbackError> {
        (**self).generate(prompt)
    }
}

/// Stand-in used when no API key is configured; always fails
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineModel;

impl FallbackModel for OfflineModel {
    fn generate(&self, _prompt: &str) -> Result<String, FallbackError> {
        Err(FallbackError::NotConfigured)
    }
}

/// Build the fallback model described by the configuration
pub fn from_config(config: &Config) -> Box<dyn FallbackModel> {
    match config.gemini_api_key.as_deref().filter(|k| !k.trim().is_empty()) {
        Some(key) => match GeminiModel::new(key, config.genai_model(), config.fallback_timeout()) {
            Ok(model) => Box::new(model.with_temperature(config.temperature())),
            Err(e) => {
                tracing::warn!(error = %e, "could not build Gemini client, running offline");
                Box::new(OfflineModel)
            }
        },
        None => Box::new(OfflineModel),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo;

    impl FallbackModel for Echo {
        fn generate(&self, prompt: &str) -> Result<String, FallbackError> {
            Ok(prompt.to_uppercase())
        }
    }

    #[test]
    fn test_offline_model_fails() {
        assert!(matches!(
            OfflineModel.generate("hello"),
            Err(FallbackError::NotConfigured)
        ));
    }

    #[test]
    fn test_boxed_and_borrowed_models() {
        let boxed: Box<dyn FallbackModel> = Box::new(Echo);
        assert_eq!(boxed.generate("hi").unwrap(), "HI");
        let echo = Echo;
        assert_eq!((&echo).generate("ok").unwrap(), "OK");
    }

    #[test]
    fn test_from_config_without_key_is_offline() {
        let config = Config {
            gemini_api_key: Some("   ".to_string()),
            ..Config::default()
        };
        let model = from_config(&config);
        assert!(matches!(
            model.generate("hello"),
            Err(FallbackError::NotConfigured)
        ));
    }
}
