//! Configuration management with layered hierarchy

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Local config file looked up in the working directory
const LOCAL_CONFIG_FILE: &str = "batchbot.yaml";

const DEFAULT_MODEL: &str = "gemini-pro";
const DEFAULT_TEMPERATURE: f32 = 0.1;
const DEFAULT_TIMEOUT_SECS: u64 = 20;

/// Batch assistant configuration with layered hierarchy
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Path to the SQLite record store
    pub database: Option<PathBuf>,

    /// API key for the fallback model; no key means offline fallback
    pub gemini_api_key: Option<String>,

    /// Fallback model name
    pub genai_model: Option<String>,

    /// Sampling temperature for the fallback model
    pub temperature: Option<f32>,

    /// Timeout for one fallback model call
    pub fallback_timeout_secs: Option<u64>,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load() -> Self {
        let mut config = Config::default();

        // 1. Built-in defaults (resolved lazily by the accessors)

        // 2. Global user config (~/.config/batchbot/config.yaml)
        if let Some(global_path) = Self::global_config_path() {
            if let Some(global) = Self::read_file(&global_path) {
                config.merge(global);
            }
        }

        // 3. Local config (./batchbot.yaml)
        if let Some(local) = Self::read_file(Path::new(LOCAL_CONFIG_FILE)) {
            config.merge(local);
        }

        // 4. Environment variables
        config.apply_env(|key| std::env::var(key).ok());

        config
    }

    fn read_file(path: &Path) -> Option<Config> {
        if !path.exists() {
            return None;
        }
        let contents = std::fs::read_to_string(path).ok()?;
        match serde_yml::from_str::<Config>(&contents) {
            Ok(config) => Some(config),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring invalid config file");
                None
            }
        }
    }

    /// Apply environment overrides using the given lookup
    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(db) = lookup("BATCHBOT_DATABASE") {
            self.database = Some(PathBuf::from(db));
        }
        if let Some(key) = lookup("GEMINI_API_KEY") {
            self.gemini_api_key = Some(key);
        }
        if let Some(model) = lookup("GENAI_MODEL") {
            self.genai_model = Some(model);
        }
        if let Some(timeout) = lookup("BATCHBOT_FALLBACK_TIMEOUT").and_then(|t| t.parse().ok()) {
            self.fallback_timeout_secs = Some(timeout);
        }
    }

    /// Get the path to the global config file
    pub fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "batchbot")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        if other.database.is_some() {
            self.database = other.database;
        }
        if other.gemini_api_key.is_some() {
            self.gemini_api_key = other.gemini_api_key;
        }
        if other.genai_model.is_some() {
            self.genai_model = other.genai_model;
        }
        if other.temperature.is_some() {
            self.temperature = other.temperature;
        }
        if other.fallback_timeout_secs.is_some() {
            self.fallback_timeout_secs = other.fallback_timeout_secs;
        }
    }

    /// Get the database path, falling back to the user data directory
    pub fn database_path(&self) -> PathBuf {
        if let Some(ref path) = self.database {
            return path.clone();
        }

        directories::ProjectDirs::from("", "", "batchbot")
            .map(|dirs| dirs.data_dir().join("batches.db"))
            .unwrap_or_else(|| PathBuf::from("batches.db"))
    }

    pub fn genai_model(&self) -> &str {
        self.genai_model.as_deref().unwrap_or(DEFAULT_MODEL)
    }

    pub fn temperature(&self) -> f32 {
        self.temperature.unwrap_or(DEFAULT_TEMPERATURE)
    }

    pub fn fallback_timeout(&self) -> Duration {
        Duration::from_secs(self.fallback_timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    /// Copy of this config that is safe to print
    pub fn redacted(&self) -> Config {
        let mut config = self.clone();
        if config.gemini_api_key.is_some() {
            config.gemini_api_key = Some("********".to_string());
        }
        config
    }
}
