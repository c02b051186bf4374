use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::models::options::{
    DEFAULT_MAX_ALTERNATIVES, DEFAULT_MAX_PRICE_DIFFERENCE_PERCENT, DEFAULT_MAX_RESULTS,
    DEFAULT_MIN_COMPATIBILITY_SCORE,
};
use crate::models::{MatchOptions, RecommendationOptions, ScoringWeights};

const ENV_PREFIX: &str = "CASEFIT";
const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub recommendations: RecommendationSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
    pub acquire_timeout_secs: Option<u64>,
    pub idle_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    #[serde(default = "default_min_compatibility_score")]
    pub min_compatibility_score: u8,
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    /// Hard ceiling on `maxResults` accepted from callers
    #[serde(default = "default_max_results_cap")]
    pub max_results_cap: usize,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            min_compatibility_score: default_min_compatibility_score(),
            max_results: default_max_results(),
            max_results_cap: default_max_results_cap(),
        }
    }
}

fn default_min_compatibility_score() -> u8 { DEFAULT_MIN_COMPATIBILITY_SCORE }
fn default_max_results() -> usize { DEFAULT_MAX_RESULTS }
fn default_max_results_cap() -> usize { 100 }

impl MatchingSettings {
    /// Search options with the configured defaults applied
    pub fn match_options(&self) -> MatchOptions {
        MatchOptions {
            min_compatibility_score: self.min_compatibility_score,
            max_results: self.max_results,
            ..MatchOptions::default()
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecommendationSettings {
    #[serde(default = "default_max_alternatives")]
    pub max_alternatives: usize,
    #[serde(default = "default_max_price_difference_percent")]
    pub max_price_difference_percent: f64,
}

impl Default for RecommendationSettings {
    fn default() -> Self {
        Self {
            max_alternatives: default_max_alternatives(),
            max_price_difference_percent: default_max_price_difference_percent(),
        }
    }
}

fn default_max_alternatives() -> usize { DEFAULT_MAX_ALTERNATIVES }
fn default_max_price_difference_percent() -> f64 { DEFAULT_MAX_PRICE_DIFFERENCE_PERCENT }

impl RecommendationSettings {
    pub fn recommendation_options(&self) -> RecommendationOptions {
        RecommendationOptions {
            max_alternatives: self.max_alternatives,
            max_price_difference_percent: self.max_price_difference_percent,
            ..RecommendationOptions::default()
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_dimension_weight")]
    pub dimension: f64,
    #[serde(default = "default_protection_weight")]
    pub protection: f64,
    #[serde(default = "default_features_weight")]
    pub features: f64,
    #[serde(default = "default_rating_weight")]
    pub rating: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            dimension: default_dimension_weight(),
            protection: default_protection_weight(),
            features: default_features_weight(),
            rating: default_rating_weight(),
        }
    }
}

fn default_dimension_weight() -> f64 { 0.40 }
fn default_protection_weight() -> f64 { 0.25 }
fn default_features_weight() -> f64 { 0.20 }
fn default_rating_weight() -> f64 { 0.15 }

impl WeightsConfig {
    /// Convert to scoring weights, rejecting negative weights or a sum other than 1.0
    pub fn to_scoring_weights(&self) -> Result<ScoringWeights, ConfigError> {
        let weights = ScoringWeights {
            dimension: self.dimension,
            protection: self.protection,
            features: self.features,
            rating: self.rating,
        };

        let parts = [weights.dimension, weights.protection, weights.features, weights.rating];
        if parts.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(ConfigError::Message(format!(
                "scoring weights must be non-negative: {:?}",
                weights
            )));
        }

        let total = weights.total();
        if (total - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(ConfigError::Message(format!(
                "scoring weights must sum to 1.0, got {}",
                total
            )));
        }

        Ok(weights)
    }
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

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with CASEFIT__)
    /// 5. DATABASE_URL
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., CASEFIT__SERVER__PORT -> server.port
            .add_source(env_source())
            .build()?;

        let settings = apply_database_url(settings)?;

        let settings: Settings = settings.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(env_source())
            .build()?;

        let settings: Settings = settings.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.scoring.weights.to_scoring_weights()?;

        if self.matching.max_results > self.matching.max_results_cap {
            return Err(ConfigError::Message(format!(
                "matching.max_results ({}) exceeds matching.max_results_cap ({})",
                self.matching.max_results, self.matching.max_results_cap
            )));
        }

        Ok(())
    }
}

fn env_source() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

/// A plain DATABASE_URL wins over every other database.url source
fn apply_database_url(settings: Config) -> Result<Config, ConfigError> {
    match std::env::var("DATABASE_URL") {
        Ok(url) if !url.is_empty() => Config::builder()
            .add_source(settings)
            .set_override("database.url", url)?
            .build(),
        _ => Ok(settings),
    }
}
