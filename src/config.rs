use crate::error::{Error, Result};
use std::path::PathBuf;

/// Classification strategy for a batch run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Keyword,
    Ai,
}

impl From<&str> for Strategy {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "ai" => Strategy::Ai,
            _ => Strategy::Keyword, // Default fallback
        }
    }
}

/// Settings for the remote completion service
#[derive(Debug, Clone)]
pub struct AiSettings {
    pub endpoint: String,
    pub model: String,
    /// Bearer credential; supplied through process configuration, never
    /// hard-coded
    pub api_key: Option<String>,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_secs: u64,
}

impl Default for AiSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://api.openai.com/v1/chat/completions".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key: None,
            temperature: 0.1,
            max_tokens: 150,
            timeout_secs: 30,
        }
    }
}

impl AiSettings {
    /// Defaults overlaid with ECONBOT_API_KEY / ECONBOT_MODEL /
    /// ECONBOT_ENDPOINT environment variables
    pub fn from_env() -> Self {
        let mut settings = Self::default();
        if let Ok(key) = std::env::var("ECONBOT_API_KEY") {
            if !key.is_empty() {
                settings.api_key = Some(key);
            }
        }
        if let Ok(model) = std::env::var("ECONBOT_MODEL") {
            if !model.is_empty() {
                settings.model = model;
            }
        }
        if let Ok(endpoint) = std::env::var("ECONBOT_ENDPOINT") {
            if !endpoint.is_empty() {
                settings.endpoint = endpoint;
            }
        }
        settings
    }
}

/// Configuration for a batch run
#[derive(Debug, Clone)]
pub struct Config {
    /// Record source: an aggregate array file or a category directory
    pub input: PathBuf,
    /// Corpus of record, overwritten only behind backup plus confirmation
    pub corpus_file: PathBuf,
    pub strategy: Strategy,
    pub ai: AiSettings,
    /// Fixed inter-record delay for the AI strategy
    pub delay_ms: u64,
    pub limit: Option<usize>,
}

impl Config {
    /// Create a new default configuration
    pub fn new(input: impl Into<PathBuf>, corpus_file: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            corpus_file: corpus_file.into(),
            strategy: Strategy::Keyword,
            ai: AiSettings::default(),
            delay_ms: 1000,
            limit: None,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if !self.input.exists() {
            return Err(Error::Config(format!(
                "Input path does not exist: {}",
                self.input.display()
            )));
        }
        Ok(())
    }
}

/// Builder for creating configurations
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder with default settings
    pub fn new(input: impl Into<PathBuf>, corpus_file: impl Into<PathBuf>) -> Self {
        Self {
            config: Config::new(input, corpus_file),
        }
    }

    /// Set the classification strategy
    pub fn strategy(mut self, strategy: Strategy) -> Self {
        self.config.strategy = strategy;
        self
    }

    /// Set strategy from string
    pub fn strategy_str(mut self, strategy: &str) -> Self {
        self.config.strategy = Strategy::from(strategy);
        self
    }

    /// Set the completion service settings
    pub fn ai(mut self, settings: AiSettings) -> Self {
        self.config.ai = settings;
        self
    }

    /// Set the inter-record delay in milliseconds
    pub fn delay_ms(mut self, delay_ms: u64) -> Self {
        self.config.delay_ms = delay_ms;
        self
    }

    /// Set the limit
    pub fn limit(mut self, limit: usize) -> Self {
        self.config.limit = Some(limit);
        self
    }

    /// Clear the limit
    pub fn no_limit(mut self) -> Self {
        self.config.limit = None;
        self
    }

    /// Build the final configuration
    pub fn build(self) -> Result<Config> {
        self.config.validate()?;
        Ok(self.config)
    }
}
