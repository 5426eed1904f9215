//! Mapper configuration

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{MapperError, MapperResult};
use crate::types::TriggerPolicy;

/// Smallest compute latency the model accepts, in clock cycles
///
/// A host may write CTRL before DIN, so DIN has to be sampled at least one
/// cycle after the triggering CTRL write.
pub const MIN_LATENCY_CYCLES: u32 = 1;

/// Largest compute latency the model accepts, in clock cycles
///
/// Hosts read STATUS five cycles after a request at the earliest.
pub const MAX_LATENCY_CYCLES: u32 = 5;

/// Configuration for the simulated mapper and its host driver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapperConfig {
    /// Which CTRL bits start a mapping
    pub trigger: TriggerPolicy,

    /// Clock cycles from a triggering CTRL write until STATUS.ready
    pub compute_latency_cycles: u32,

    /// Cycles the driver waits before reading STATUS
    pub poll_budget_cycles: u32,

    /// Reject unmapped addresses instead of ignoring them
    pub strict_addressing: bool,
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            trigger: TriggerPolicy::Start,
            compute_latency_cycles: 2,
            poll_budget_cycles: 20,
            strict_addressing: false,
        }
    }
}

impl MapperConfig {
    /// Parse a JSON configuration; missing fields take their defaults
    pub fn from_json_str(json: &str) -> MapperResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON configuration file
    pub fn from_json_file(path: impl AsRef<Path>) -> MapperResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Serialize as pretty-printed JSON
    pub fn to_json(&self) -> MapperResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check the model's field ranges
    pub fn validate(&self) -> MapperResult<()> {
        let range = MIN_LATENCY_CYCLES..=MAX_LATENCY_CYCLES;
        if !range.contains(&self.compute_latency_cycles) {
            return Err(MapperError::ConfigError(format!(
                "compute latency {} outside {}..={}",
                self.compute_latency_cycles, MIN_LATENCY_CYCLES, MAX_LATENCY_CYCLES
            )));
        }
        Ok(())
    }

    /// Check that the driver waits at least as long as the model computes
    pub fn validate_poll_budget(&self) -> MapperResult<()> {
        if self.poll_budget_cycles < self.compute_latency_cycles {
            return Err(MapperError::ConfigError(format!(
                "poll budget {} is shorter than compute latency {}",
                self.poll_budget_cycles, self.compute_latency_cycles
            )));
        }
        Ok(())
    }

    /// Builder: set trigger policy
    pub fn trigger(mut self, trigger: TriggerPolicy) -> Self {
        self.trigger = trigger;
        self
    }

    /// Builder: set compute latency
    pub fn latency(mut self, cycles: u32) -> Self {
        self.compute_latency_cycles = cycles;
        self
    }

    /// Builder: set driver poll budget
    pub fn poll_budget(mut self, cycles: u32) -> Self {
        self.poll_budget_cycles = cycles;
        self
    }

    /// Builder: enable strict addressing
    pub fn strict(mut self) -> Self {
        self.strict_addressing = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let cfg = MapperConfig::default();
        assert_eq!(cfg.trigger, TriggerPolicy::Start);
        assert!(cfg.validate().is_ok());
        assert!(cfg.validate_poll_budget().is_ok());
    }

    #[test]
    fn test_builder() {
        let cfg = MapperConfig::default()
            .trigger(TriggerPolicy::StartAndValid)
            .latency(3)
            .poll_budget(5)
            .strict();
        assert_eq!(cfg.trigger, TriggerPolicy::StartAndValid);
        assert_eq!(cfg.compute_latency_cycles, 3);
        assert_eq!(cfg.poll_budget_cycles, 5);
        assert!(cfg.strict_addressing);
    }

    #[test]
    fn test_validate_latency_range() {
        assert!(MapperConfig::default().latency(0).validate().is_err());
        assert!(MapperConfig::default().latency(6).validate().is_err());
        for latency in MIN_LATENCY_CYCLES..=MAX_LATENCY_CYCLES {
            assert!(MapperConfig::default().latency(latency).validate().is_ok());
        }
    }

    #[test]
    fn test_poll_budget_checked_separately() {
        let cfg = MapperConfig::default().latency(4).poll_budget(2);
        assert!(cfg.validate().is_ok());
        assert!(matches!(cfg.validate_poll_budget(), Err(MapperError::ConfigError(_))));
    }

    #[test]
    fn test_json_partial() {
        let cfg = MapperConfig::from_json_str(r#"{ "trigger": "start_and_valid", "poll_budget_cycles": 5 }"#)
            .unwrap();
        assert_eq!(cfg.trigger, TriggerPolicy::StartAndValid);
        assert_eq!(cfg.poll_budget_cycles, 5);
        assert_eq!(cfg.compute_latency_cycles, 2);
    }

    #[test]
    fn test_json_roundtrip() {
        let cfg = MapperConfig::default().latency(4).strict();
        let json = cfg.to_json().unwrap();
        assert_eq!(MapperConfig::from_json_str(&json).unwrap(), cfg);
    }

    #[test]
    fn test_json_errors() {
        assert!(matches!(
            MapperConfig::from_json_str("{ not json"),
            Err(MapperError::ConfigError(_))
        ));
        assert!(matches!(
            MapperConfig::from_json_str(r#"{ "compute_latency_cycles": 9 }"#),
            Err(MapperError::ConfigError(_))
        ));
        assert!(matches!(
            MapperConfig::from_json_file("/nonexistent/symmap.json"),
            Err(MapperError::Io(_))
        ));
    }
}
