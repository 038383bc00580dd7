//! Configuration loading for the rule engine.
//!
//! Every rule parameter, the shared time step and the technology floor are
//! loaded from a single TOML file. Loading always validates.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Complete rule configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RulesConfig {
    /// RNG seed; 0 means entropy-seeded
    #[serde(default)]
    pub seed: u64,
    /// Length of one step (dt)
    pub time_interval: f64,
    /// Floor applied to technology after every step
    pub min_technology: f64,
    /// Total resource endowment shared by all rules
    pub resources: f64,
    pub over_settlement: OverSettlementConfig,
    pub food_production: FoodProductionConfig,
    pub research: ResearchConfig,
    pub education: EducationConfig,
    pub health: HealthConfig,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            time_interval: 1.0,
            min_technology: 0.01,
            resources: 1000.0,
            over_settlement: OverSettlementConfig::default(),
            food_production: FoodProductionConfig::default(),
            research: ResearchConfig::default(),
            education: EducationConfig::default(),
            health: HealthConfig::default(),
        }
    }
}

impl RulesConfig {
    /// Loads and validates configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parses and validates configuration from a TOML string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Checks every parameter against its admissible range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("time_interval", self.time_interval)?;
        non_negative("min_technology", self.min_technology)?;
        non_negative("resources", self.resources)?;

        let s = &self.over_settlement;
        positive("over_settlement.density", s.density)?;
        positive("over_settlement.death_time_constant", s.death_time_constant)?;

        let f = &self.food_production;
        positive("food_production.productivity", f.productivity)?;
        positive("food_production.demand", f.demand)?;
        positive("food_production.death_time_constant", f.death_time_constant)?;
        positive("food_production.birth_time_constant", f.birth_time_constant)?;

        let r = &self.research;
        positive("research.productivity", r.productivity)?;
        positive("research.cost", r.cost)?;
        positive("research.quantum", r.quantum)?;

        let e = &self.education;
        positive("education.productivity", e.productivity)?;
        positive("education.demand", e.demand)?;
        positive("education.time_constant", e.time_constant)?;

        let h = &self.health;
        positive("health.productivity", h.productivity)?;
        positive("health.demand", h.demand)?;
        positive("health.min_life_expectancy", h.min_life_expectancy)?;
        positive("health.max_life_expectancy", h.max_life_expectancy)?;
        if h.max_life_expectancy < h.min_life_expectancy {
            return Err(ConfigError::Invalid {
                field: "health.max_life_expectancy",
                value: h.max_life_expectancy,
                reason: "must not be below min_life_expectancy",
            });
        }
        Ok(())
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            value,
            reason: "must be a finite positive number",
        })
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            value,
            reason: "must be a finite non-negative number",
        })
    }
}

/// Crowding deaths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverSettlementConfig {
    /// Individuals sustained per unit of settlement resource
    pub density: f64,
    pub death_time_constant: f64,
}

impl Default for OverSettlementConfig {
    fn default() -> Self {
        Self {
            density: 1.0,
            death_time_constant: 10.0,
        }
    }
}

/// Famine deaths and births.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodProductionConfig {
    /// Food produced per farmer
    pub productivity: f64,
    /// Food required per individual
    pub demand: f64,
    pub death_time_constant: f64,
    pub birth_time_constant: f64,
}

impl Default for FoodProductionConfig {
    fn default() -> Self {
        Self {
            productivity: 1.0,
            demand: 0.5,
            death_time_constant: 5.0,
            birth_time_constant: 20.0,
        }
    }
}

/// Technology advances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchConfig {
    pub productivity: f64,
    /// Research output needed for one quantum
    pub cost: f64,
    /// Technology gained per sampled advance
    pub quantum: f64,
}

impl Default for ResearchConfig {
    fn default() -> Self {
        Self {
            productivity: 1.0,
            cost: 10.0,
            quantum: 0.01,
        }
    }
}

/// Knowledge loss.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EducationConfig {
    pub productivity: f64,
    pub demand: f64,
    pub time_constant: f64,
}

impl Default for EducationConfig {
    fn default() -> Self {
        Self {
            productivity: 1.0,
            demand: 0.1,
            time_constant: 10.0,
        }
    }
}

/// Natural deaths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthConfig {
    pub productivity: f64,
    pub demand: f64,
    pub min_life_expectancy: f64,
    pub max_life_expectancy: f64,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            productivity: 1.0,
            demand: 0.1,
            min_life_expectancy: 30.0,
            max_life_expectancy: 80.0,
        }
    }
}

/// Errors from loading or saving a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid {field} = {value}: {reason}")]
    Invalid {
        field: &'static str,
        value: f64,
        reason: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"
        seed = 1234
        time_interval = 0.5
        min_technology = 0.02
        resources = 500.0

        [over_settlement]
        density = 2.0
        death_time_constant = 10.0

        [food_production]
        productivity = 1.5
        demand = 0.5
        death_time_constant = 5.0
        birth_time_constant = 20.0

        [research]
        productivity = 1.0
        cost = 10.0
        quantum = 0.01

        [education]
        productivity = 1.0
        demand = 0.1
        time_constant = 10.0

        [health]
        productivity = 1.0
        demand = 0.1
        min_life_expectancy = 30.0
        max_life_expectancy = 80.0
    "#;

    #[test]
    fn test_parse_sample() {
        let config = RulesConfig::from_str(SAMPLE).unwrap();
        assert_eq!(config.seed, 1234);
        assert_eq!(config.time_interval, 0.5);
        assert_eq!(config.resources, 500.0);
        assert_eq!(config.over_settlement.density, 2.0);
        assert_eq!(config.food_production.productivity, 1.5);
        assert_eq!(config.health.max_life_expectancy, 80.0);
    }

    #[test]
    fn test_seed_defaults_to_entropy() {
        let without_seed = SAMPLE.replace("seed = 1234", "");
        let config = RulesConfig::from_str(&without_seed).unwrap();
        assert_eq!(config.seed, 0);
    }

    #[test]
    fn test_default_is_valid_and_round_trips() {
        let config = RulesConfig::default();
        config.validate().unwrap();
        let text = config.to_toml().unwrap();
        assert_eq!(RulesConfig::from_str(&text).unwrap(), config);
    }

    #[test]
    fn test_missing_section_is_a_parse_error() {
        let truncated = SAMPLE.split("[health]").next().unwrap();
        assert!(matches!(
            RulesConfig::from_str(truncated),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_rejects_non_positive_parameters() {
        let bad = SAMPLE.replace("cost = 10.0", "cost = 0.0");
        match RulesConfig::from_str(&bad) {
            Err(ConfigError::Invalid { field, value, .. }) => {
                assert_eq!(field, "research.cost");
                assert_eq!(value, 0.0);
            }
            other => panic!("expected invalid config, got {:?}", other),
        }

        let bad = SAMPLE.replace("time_interval = 0.5", "time_interval = -1.0");
        assert!(matches!(
            RulesConfig::from_str(&bad),
            Err(ConfigError::Invalid { field: "time_interval", .. })
        ));
    }

    #[test]
    fn test_rejects_inverted_life_expectancy() {
        let mut config = RulesConfig::default();
        config.health.max_life_expectancy = 20.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "health.max_life_expectancy", .. })
        ));
    }

    #[test]
    fn test_rejects_non_finite() {
        let mut config = RulesConfig::default();
        config.resources = f64::NAN;
        assert!(config.validate().is_err());
        config.resources = 0.0;
        config.validate().unwrap();
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let config = RulesConfig::from_file(file.path()).unwrap();
        assert_eq!(config.min_technology, 0.02);

        let missing = file.path().with_extension("missing");
        assert!(matches!(
            RulesConfig::from_file(&missing),
            Err(ConfigError::Io(_))
        ));
    }
}
