use std::path::PathBuf;

use thiserror::Error;

/// Application-level constants
pub const APP_NAME: &str = "GreenLight";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
pub const DEFAULT_LLM_MODEL: &str = "qwen2:0.5b";
pub const DEFAULT_EMBEDDING_MODEL: &str = "all-minilm";
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;
pub const DEFAULT_TOP_K: usize = 4;

/// Topics audited when none are configured.
pub const DEFAULT_TOPICS: &[&str] = &["GHG emissions"];

/// Filter used when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "greenlight=info,greenlight_lib=info"
}

/// Get the application data directory
/// (`~/.local/share/GreenLight` on Linux, platform equivalent elsewhere).
pub fn app_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Prebuilt rule index snapshot loaded by the retriever.
pub fn default_index_path() -> PathBuf {
    app_data_dir().join("vector_store").join("rules_index.json")
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },

    #[error("At least one audit topic must be configured")]
    NoTopics,
}

/// Runtime settings for an audit process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditConfig {
    pub ollama_url: String,
    pub llm_model: String,
    pub embedding_model: String,
    pub request_timeout_secs: u64,
    pub top_k: usize,
    pub index_path: PathBuf,
    pub topics: Vec<String>,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            ollama_url: DEFAULT_OLLAMA_URL.to_string(),
            llm_model: DEFAULT_LLM_MODEL.to_string(),
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            top_k: DEFAULT_TOP_K,
            index_path: default_index_path(),
            topics: DEFAULT_TOPICS.iter().map(|t| t.to_string()).collect(),
        }
    }
}

impl AuditConfig {
    /// Read settings from the process environment, after loading `.env` if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenv::dotenv() {
            tracing::debug!(path = %path.display(), "Loaded .env file");
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key lookup; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = non_empty(lookup("GREENLIGHT_OLLAMA_URL")) {
            config.ollama_url = url;
        }
        if let Some(model) = non_empty(lookup("GREENLIGHT_LLM_MODEL")) {
            config.llm_model = model;
        }
        if let Some(model) = non_empty(lookup("GREENLIGHT_EMBEDDING_MODEL")) {
            config.embedding_model = model;
        }
        if let Some(raw) = non_empty(lookup("GREENLIGHT_TIMEOUT_SECS")) {
            config.request_timeout_secs = parse_positive("GREENLIGHT_TIMEOUT_SECS", &raw)?;
        }
        if let Some(raw) = non_empty(lookup("GREENLIGHT_TOP_K")) {
            config.top_k = parse_positive("GREENLIGHT_TOP_K", &raw)?;
        }
        if let Some(path) = non_empty(lookup("GREENLIGHT_INDEX_PATH")) {
            config.index_path = PathBuf::from(path);
        }
        if let Some(raw) = lookup("GREENLIGHT_TOPICS") {
            config.topics = parse_topics(&raw)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Check invariants that env parsing enforces, for configs built in code.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.topics.iter().all(|t| t.trim().is_empty()) {
            return Err(ConfigError::NoTopics);
        }
        if self.top_k == 0 {
            return Err(ConfigError::InvalidValue {
                key: "top_k",
                value: "0".into(),
            });
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "request_timeout_secs",
                value: "0".into(),
            });
        }
        Ok(())
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_positive<T>(key: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr + PartialOrd + Default,
{
    match raw.parse::<T>() {
        Ok(v) if v > T::default() => Ok(v),
        _ => Err(ConfigError::InvalidValue {
            key,
            value: raw.to_string(),
        }),
    }
}

/// Comma-separated, order preserved, blanks dropped.
fn parse_topics(raw: &str) -> Result<Vec<String>, ConfigError> {
    let topics: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect();

    if topics.is_empty() {
        return Err(ConfigError::NoTopics);
    }
    Ok(topics)
}
