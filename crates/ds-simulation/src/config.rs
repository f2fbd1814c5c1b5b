use std::time::Duration;

use ds_core::GenConfig;
use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};

/// Configuration for a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// RNG seed for world generation and in-run rolls.
    pub seed: u64,
    /// World generation settings.
    pub generation: GenConfig,
    /// Vitality at the start of a run.
    pub starting_vitality: i32,
    /// Upper bound for vitality after a resource pickup. `None` allows overshoot.
    pub vitality_cap: Option<i32>,
    /// Vitality restored by one resource cache.
    pub resource_bonus: i32,
    /// Full value of the enemy meter.
    pub enemy_meter_max: i32,
    /// Microphone amplitude above which a noise draws creatures.
    pub noise_threshold: u32,
    /// Per-room chance of a creature appearing after a loud noise.
    pub noise_spawn_chance: f64,
    /// Wall-clock milliseconds between day pulses.
    pub day_period_ms: u64,
    /// Wall-clock milliseconds between vitality pulses.
    pub vitality_period_ms: u64,
    /// Wall-clock milliseconds between enemy pulses.
    pub enemy_period_ms: u64,
    /// How long shutdown waits for timers to stop before moving on.
    pub shutdown_grace_ms: u64,
    /// Maximum event log size (oldest events dropped when exceeded). 0 = unlimited.
    pub max_events: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            generation: GenConfig::default(),
            starting_vitality: 100,
            vitality_cap: Some(100),
            resource_bonus: 33,
            enemy_meter_max: 100,
            noise_threshold: 10_000,
            noise_spawn_chance: 0.25,
            day_period_ms: 30_000,
            vitality_period_ms: 1_000,
            enemy_period_ms: 1_000,
            shutdown_grace_ms: 100,
            max_events: 0,
        }
    }
}

impl SimConfig {
    /// Set the RNG seed for deterministic runs.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the side length of the generated grid.
    pub fn with_grid_size(mut self, size: usize) -> Self {
        self.generation.grid_size = size;
        self
    }

    /// Replace the world generation settings.
    pub fn with_generation(mut self, generation: GenConfig) -> Self {
        self.generation = generation;
        self
    }

    /// Set the vitality cap (`None` = uncapped).
    pub fn with_vitality_cap(mut self, cap: Option<i32>) -> Self {
        self.vitality_cap = cap;
        self
    }

    /// Set the per-room creature chance used after a loud noise.
    pub fn with_noise_spawn_chance(mut self, chance: f64) -> Self {
        self.noise_spawn_chance = chance;
        self
    }

    /// Set the maximum event log size (0 = unlimited).
    pub fn with_max_events(mut self, max: usize) -> Self {
        self.max_events = max;
        self
    }

    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> SimResult<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| SimError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the engine cannot run with.
    pub fn validate(&self) -> SimResult<()> {
        self.generation.validate()?;
        if self.starting_vitality <= 0 {
            return Err(SimError::Config("starting_vitality must be positive".into()));
        }
        if self.enemy_meter_max <= 0 {
            return Err(SimError::Config("enemy_meter_max must be positive".into()));
        }
        if !(0.0..=1.0).contains(&self.noise_spawn_chance) {
            return Err(SimError::Config(format!(
                "noise_spawn_chance {} outside 0.0..=1.0",
                self.noise_spawn_chance
            )));
        }
        if self.day_period_ms == 0 || self.vitality_period_ms == 0 || self.enemy_period_ms == 0 {
            return Err(SimError::Config("timer periods must be non-zero".into()));
        }
        Ok(())
    }

    /// Interval between day pulses.
    pub fn day_period(&self) -> Duration {
        Duration::from_millis(self.day_period_ms)
    }

    /// Interval between vitality pulses.
    pub fn vitality_period(&self) -> Duration {
        Duration::from_millis(self.vitality_period_ms)
    }

    /// Interval between enemy pulses.
    pub fn enemy_period(&self) -> Duration {
        Duration::from_millis(self.enemy_period_ms)
    }

    /// How long each timer gets to confirm it stopped.
    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_millis(self.shutdown_grace_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_default_values() {
        let config = SimConfig::default();
        assert_eq!(config.seed, 42);
        assert_eq!(config.generation.grid_size, 20);
        assert_eq!(config.starting_vitality, 100);
        assert_eq!(config.resource_bonus, 33);
        assert_eq!(config.vitality_cap, Some(100));
        assert_eq!(config.day_period(), Duration::from_secs(30));
        assert_eq!(config.vitality_period(), Duration::from_secs(1));
        assert_eq!(config.max_events, 0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn config_builder_chain() {
        let config = SimConfig::default()
            .with_seed(123)
            .with_grid_size(9)
            .with_vitality_cap(None)
            .with_max_events(500);
        assert_eq!(config.seed, 123);
        assert_eq!(config.generation.grid_size, 9);
        assert_eq!(config.vitality_cap, None);
        assert_eq!(config.max_events, 500);
    }

    #[test]
    fn config_from_partial_json() {
        let config = SimConfig::from_json(
            r#"{"seed": 7, "generation": {"grid_size": 11}, "vitality_cap": null}"#,
        )
        .unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.generation.grid_size, 11);
        assert_eq!(config.generation.door_chance, 0.5);
        assert_eq!(config.vitality_cap, None);
        assert_eq!(config.resource_bonus, 33);
    }

    #[test]
    fn config_rejects_bad_values() {
        assert!(matches!(
            SimConfig::from_json(r#"{"generation": {"grid_size": 1}}"#),
            Err(SimError::Generation(_))
        ));
        assert!(matches!(
            SimConfig::from_json(r#"{"day_period_ms": 0}"#),
            Err(SimError::Config(_))
        ));
        assert!(matches!(
            SimConfig::from_json("not json"),
            Err(SimError::Config(_))
        ));
    }
}
