use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::models::domain::{default_tag_rules, default_vocabulary, MatchingRules, TagRule};

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
    #[serde(default)]
    pub ai: AiSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
    pub acquire_timeout_secs: Option<u64>,
    pub idle_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

/// Generation settings: thresholds and the keyword tables
#[derive(Debug, Clone, Deserialize)]
pub struct AiSettings {
    /// Location of the external model. Recorded only, never loaded.
    pub model_path: Option<String>,
    #[serde(default = "default_recommendation_threshold")]
    pub recommendation_threshold: f64,
    #[serde(default = "default_urgent_threshold")]
    pub urgent_threshold: f64,
    #[serde(default = "default_interview_reason_threshold")]
    pub interview_reason_threshold: f64,
    /// Seed for reproducible score jitter; thread RNG when unset
    pub jitter_seed: Option<u64>,
    #[serde(default = "default_vocabulary")]
    pub vocabulary: Vec<String>,
    #[serde(default = "default_tag_rules")]
    pub tag_rules: Vec<TagRule>,
}

impl Default for AiSettings {
    fn default() -> Self {
        Self {
            model_path: None,
            recommendation_threshold: default_recommendation_threshold(),
            urgent_threshold: default_urgent_threshold(),
            interview_reason_threshold: default_interview_reason_threshold(),
            jitter_seed: None,
            vocabulary: default_vocabulary(),
            tag_rules: default_tag_rules(),
        }
    }
}

fn default_recommendation_threshold() -> f64 { 75.0 }
fn default_urgent_threshold() -> f64 { 85.0 }
fn default_interview_reason_threshold() -> f64 { 80.0 }

impl AiSettings {
    pub fn rules(&self) -> MatchingRules {
        MatchingRules {
            vocabulary: self.vocabulary.clone(),
            tag_rules: self.tag_rules.clone(),
            recommendation_threshold: self.recommendation_threshold,
            urgent_threshold: self.urgent_threshold,
            interview_reason_threshold: self.interview_reason_threshold,
        }
    }
}

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with PRESS_)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., PRESS__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("PRESS")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        apply_env_overrides(settings)?.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("PRESS")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

/// Apply the conventional unprefixed variables
///
/// `DATABASE_URL` wins over `database.url`, `MODEL_PATH` over `ai.model_path`.
fn apply_env_overrides(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let mut builder = Config::builder().add_source(settings);

    if let Ok(database_url) = env::var("DATABASE_URL") {
        builder = builder.set_override("database.url", database_url)?;
    }
    if let Ok(model_path) = env::var("MODEL_PATH") {
        builder = builder.set_override("ai.model_path", model_path)?;
    }

    builder.build()
}
