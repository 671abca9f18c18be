use chrono::NaiveDate;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

use crate::core::geo::CorridorTable;
use crate::core::matcher::{default_reference_date, MatchingConfig, DEFAULT_SCORING_VERSION};
use crate::core::normalizer::DEFAULT_HOME_COUNTRY;
use crate::core::scoring::{ScoringConfig, DEFAULT_MSME_BONUS};
use crate::models::ScoringWeights;

const ENV_PREFIX: &str = "TRADEMATCH";

/// Largest small-enterprise bonus accepted from configuration
const MAX_MSME_BONUS: f64 = 0.25;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
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
pub struct MatchingSettings {
    #[serde(default = "default_home_country")]
    pub home_country: String,
    #[serde(default = "default_reference_date")]
    pub reference_date: NaiveDate,
    #[serde(default = "default_msme_bonus")]
    pub msme_bonus: f64,
    #[serde(default = "default_max_limit")]
    pub max_limit: u16,
    #[serde(default)]
    pub weights: WeightsConfig,
    #[serde(default = "default_corridors")]
    pub corridors: Vec<CorridorEntry>,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            home_country: default_home_country(),
            reference_date: default_reference_date(),
            msme_bonus: default_msme_bonus(),
            max_limit: default_max_limit(),
            weights: WeightsConfig::default(),
            corridors: default_corridors(),
        }
    }
}

fn default_home_country() -> String { DEFAULT_HOME_COUNTRY.to_string() }
fn default_msme_bonus() -> f64 { DEFAULT_MSME_BONUS }
fn default_max_limit() -> u16 { 100 }

/// One trade lane, e.g. `{ industry = "Textiles", country = "USA", strength = 1.0 }`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CorridorEntry {
    pub industry: String,
    pub country: String,
    pub strength: f64,
}

fn default_corridors() -> Vec<CorridorEntry> {
    let mut entries: Vec<CorridorEntry> = CorridorTable::builtin_strengths()
        .into_iter()
        .filter_map(|(lane, strength)| {
            let (industry, country) = lane.rsplit_once('-')?;
            Some(CorridorEntry {
                industry: industry.to_string(),
                country: country.to_string(),
                strength,
            })
        })
        .collect();
    entries.sort_by(|a, b| (&a.industry, &a.country).cmp(&(&b.industry, &b.country)));
    entries
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default = "default_demand_weight")]
    pub demand_fit: f64,
    #[serde(default = "default_geo_weight")]
    pub geo_fit: f64,
    #[serde(default = "default_behavioral_weight")]
    pub behavioral_fit: f64,
    #[serde(default = "default_reliability_weight")]
    pub reliability: f64,
    #[serde(default = "default_scale_weight")]
    pub scale_fit: f64,
    #[serde(default = "default_outreach_weight")]
    pub outreach_receptiveness: f64,
    #[serde(default = "default_momentum_weight")]
    pub momentum: f64,
    #[serde(default = "default_trade_weight")]
    pub trade_signal: f64,
    #[serde(default = "default_safety_weight")]
    pub safety_score: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            demand_fit: default_demand_weight(),
            geo_fit: default_geo_weight(),
            behavioral_fit: default_behavioral_weight(),
            reliability: default_reliability_weight(),
            scale_fit: default_scale_weight(),
            outreach_receptiveness: default_outreach_weight(),
            momentum: default_momentum_weight(),
            trade_signal: default_trade_weight(),
            safety_score: default_safety_weight(),
        }
    }
}

impl WeightsConfig {
    pub fn to_weights(&self) -> ScoringWeights {
        ScoringWeights {
            demand_fit: self.demand_fit,
            geo_fit: self.geo_fit,
            behavioral_fit: self.behavioral_fit,
            reliability: self.reliability,
            scale_fit: self.scale_fit,
            outreach_receptiveness: self.outreach_receptiveness,
            momentum: self.momentum,
            trade_signal: self.trade_signal,
            safety_score: self.safety_score,
        }
    }
}

fn default_version() -> String { DEFAULT_SCORING_VERSION.to_string() }
fn default_demand_weight() -> f64 { 0.18 }
fn default_geo_weight() -> f64 { 0.15 }
fn default_behavioral_weight() -> f64 { 0.17 }
fn default_reliability_weight() -> f64 { 0.15 }
fn default_scale_weight() -> f64 { 0.12 }
fn default_outreach_weight() -> f64 { 0.10 }
fn default_momentum_weight() -> f64 { 0.08 }
fn default_trade_weight() -> f64 { 0.03 }
fn default_safety_weight() -> f64 { 0.02 }

impl MatchingSettings {
    /// Semantic checks the deserializer cannot express
    pub fn validate(&self) -> Result<(), ConfigError> {
        let weights = self.weights.to_weights();

        for (name, weight) in weights.entries() {
            if !weight.is_finite() || weight < 0.0 {
                return Err(ConfigError::Message(format!(
                    "matching.weights.{} must be a finite non-negative number, got {}",
                    name, weight
                )));
            }
        }
        if weights.sum() <= 0.0 {
            return Err(ConfigError::Message("matching.weights must not all be zero".to_string()));
        }

        for lane in &self.corridors {
            if !(0.0..=1.0).contains(&lane.strength) {
                return Err(ConfigError::Message(format!(
                    "corridor {}-{} strength must be within [0, 1], got {}",
                    lane.industry, lane.country, lane.strength
                )));
            }
        }

        if !(0.0..=MAX_MSME_BONUS).contains(&self.msme_bonus) {
            return Err(ConfigError::Message(format!(
                "matching.msme_bonus must be within [0, {}], got {}",
                MAX_MSME_BONUS, self.msme_bonus
            )));
        }

        if self.max_limit == 0 {
            return Err(ConfigError::Message("matching.max_limit must be at least 1".to_string()));
        }

        Ok(())
    }

    pub fn corridor_table(&self) -> CorridorTable {
        let strengths: HashMap<String, f64> = self
            .corridors
            .iter()
            .map(|lane| (CorridorTable::key(&lane.industry, &lane.country), lane.strength))
            .collect();
        CorridorTable::new(strengths)
    }

    pub fn to_matching_config(&self) -> MatchingConfig {
        MatchingConfig {
            scoring: ScoringConfig {
                weights: self.weights.to_weights(),
                corridors: self.corridor_table(),
                msme_bonus: self.msme_bonus,
            },
            reference_date: self.reference_date,
            version: self.weights.version.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    #[serde(default = "default_risk_map_capacity")]
    pub risk_map_capacity: u64,
    #[serde(default = "default_cache_ttl")]
    pub ttl_secs: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            risk_map_capacity: default_risk_map_capacity(),
            ttl_secs: default_cache_ttl(),
        }
    }
}

fn default_risk_map_capacity() -> u64 { 256 }
fn default_cache_ttl() -> u64 { 300 }

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
    /// 2. Configuration files (config/default.toml, config/local.toml)
    /// 3. Environment variables (prefixed with TRADEMATCH__)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            // Development overrides
            .add_source(File::with_name("config/local").required(false))
            // e.g., TRADEMATCH__SERVER__PORT -> server.port
            .add_source(environment())
            .build()?;

        Self::finish(settings)
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(environment())
            .build()?;

        Self::finish(settings)
    }

    fn finish(config: Config) -> Result<Self, ConfigError> {
        let settings: Settings = config.try_deserialize()?;
        settings.matching.validate()?;
        Ok(settings)
    }
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights_match_engine() {
        let weights = WeightsConfig::default();
        assert_eq!(weights.to_weights(), ScoringWeights::default());
        assert_eq!(weights.version, "cc-2025.1");
    }

    #[test]
    fn test_default_logging() {
        let level = default_log_level();
        let format = default_log_format();
        assert_eq!(level, "info");
        assert_eq!(format, "json");
    }

    #[test]
    fn test_default_corridors_cover_builtin_lanes() {
        let matching = MatchingSettings::default();
        assert_eq!(matching.corridors.len(), 11);
        assert_eq!(matching.corridor_table(), CorridorTable::default());
        assert!(matching.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_negative_weight() {
        let mut matching = MatchingSettings::default();
        matching.weights.momentum = -0.1;
        assert!(matching.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_all_zero_weights() {
        let mut matching = MatchingSettings::default();
        matching.weights = WeightsConfig {
            version: "zero".to_string(),
            demand_fit: 0.0,
            geo_fit: 0.0,
            behavioral_fit: 0.0,
            reliability: 0.0,
            scale_fit: 0.0,
            outreach_receptiveness: 0.0,
            momentum: 0.0,
            trade_signal: 0.0,
            safety_score: 0.0,
        };
        assert!(matching.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_out_of_range_values() {
        let mut matching = MatchingSettings::default();
        matching.corridors.push(CorridorEntry {
            industry: "Spices".to_string(),
            country: "UAE".to_string(),
            strength: 1.2,
        });
        assert!(matching.validate().is_err());

        let mut matching = MatchingSettings::default();
        matching.msme_bonus = 0.5;
        assert!(matching.validate().is_err());
    }

    #[test]
    fn test_matching_config_conversion() {
        let config = MatchingSettings::default().to_matching_config();
        assert_eq!(config.version, DEFAULT_SCORING_VERSION);
        assert_eq!(config.scoring.msme_bonus, 0.05);
        assert_eq!(config.reference_date, default_reference_date());
    }
}
