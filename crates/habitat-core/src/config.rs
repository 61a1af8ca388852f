//! Configuration loading and typed config structures for the Habitat
//! simulation.
//!
//! The configuration lives in `habitat-config.yaml` at the project root.
//! Every field has a default, so an empty file (or no file at all) yields a
//! runnable world. [`SimulationConfig::parameters`] turns the file shape
//! into the flat [`SimulationParameters`] the simulation consumes.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use tracing::warn;

use crate::parameters::SimulationParameters;
use crate::profiles::ProfileWeights;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse the YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level simulation configuration.
///
/// Mirrors the structure of `habitat-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SimulationConfig {
    /// World size, seed and pacing.
    #[serde(default)]
    pub world: WorldConfig,

    /// Initial populations and caps.
    #[serde(default)]
    pub population: PopulationConfig,

    /// Poisson arrival rates.
    #[serde(default)]
    pub spawning: SpawningConfig,

    /// Profile mix of initial humans.
    #[serde(default)]
    pub profiles: ProfileWeights,

    /// Simulation boundary parameters.
    #[serde(default)]
    pub simulation: SimulationBoundsConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SimulationConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// `HABITAT_SEED` overrides `world.seed` when set to an integer.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes to unit, not to an empty mapping.
        let mut config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("HABITAT_SEED") {
            match val.trim().parse::<u64>() {
                Ok(seed) => self.world.seed = seed,
                Err(err) => warn!(value = %val, error = %err, "Ignoring malformed HABITAT_SEED"),
            }
        }
    }

    /// Flatten into the parameters a [`crate::Simulation`] is configured with.
    pub const fn parameters(&self) -> SimulationParameters {
        SimulationParameters {
            world_width: self.world.width,
            world_height: self.world.height,
            seed: self.world.seed,
            max_ticks: self.simulation.max_ticks,
            initial_humans: self.population.initial_humans,
            initial_animals: self.population.initial_animals,
            initial_plants: self.population.initial_plants,
            max_animals: self.population.max_animals,
            max_plants: self.population.max_plants,
            animal_rate: self.spawning.animal_rate,
            plant_rate: self.spawning.plant_rate,
            profile_weights: self.profiles,
        }
    }

    /// Real-time pause between ticks.
    pub const fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.world.tick_interval_ms)
    }
}

/// World-level configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WorldConfig {
    /// World width in units.
    #[serde(default = "default_width")]
    pub width: f64,

    /// World height in units.
    #[serde(default = "default_height")]
    pub height: f64,

    /// Random seed for reproducibility.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Real-time milliseconds per tick. `0` runs as fast as possible.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            seed: default_seed(),
            tick_interval_ms: default_tick_interval_ms(),
        }
    }
}

/// Population parameters.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PopulationConfig {
    /// Humans placed at start.
    #[serde(default = "default_initial_population")]
    pub initial_humans: u32,

    /// Animals spawned at start.
    #[serde(default = "default_initial_population")]
    pub initial_animals: u32,

    /// Vegetables spawned at start.
    #[serde(default = "default_initial_population")]
    pub initial_plants: u32,

    /// Cap on living animals.
    #[serde(default = "default_population_cap")]
    pub max_animals: u32,

    /// Cap on uneaten vegetables.
    #[serde(default = "default_population_cap")]
    pub max_plants: u32,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            initial_humans: default_initial_population(),
            initial_animals: default_initial_population(),
            initial_plants: default_initial_population(),
            max_animals: default_population_cap(),
            max_plants: default_population_cap(),
        }
    }
}

/// Stochastic spawning rates, in mean arrivals per tick.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SpawningConfig {
    /// Animal arrival rate; `<= 0` disables.
    #[serde(default = "default_spawn_rate")]
    pub animal_rate: f64,

    /// Vegetable arrival rate; `<= 0` disables.
    #[serde(default = "default_spawn_rate")]
    pub plant_rate: f64,
}

impl Default for SpawningConfig {
    fn default() -> Self {
        Self {
            animal_rate: default_spawn_rate(),
            plant_rate: default_spawn_rate(),
        }
    }
}

/// Simulation boundary parameters.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SimulationBoundsConfig {
    /// Tick at which the run stops; `0` means unlimited.
    #[serde(default = "default_max_ticks")]
    pub max_ticks: u64,
}

impl Default for SimulationBoundsConfig {
    fn default() -> Self {
        Self {
            max_ticks: default_max_ticks(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions
// ---------------------------------------------------------------------------

const fn default_width() -> f64 {
    800.0
}

const fn default_height() -> f64 {
    600.0
}

const fn default_seed() -> u64 {
    42
}

const fn default_tick_interval_ms() -> u64 {
    16
}

const fn default_initial_population() -> u32 {
    20
}

const fn default_population_cap() -> u32 {
    300
}

const fn default_spawn_rate() -> f64 {
    0.35
}

const fn default_max_ticks() -> u64 {
    150_000
}

fn default_log_level() -> String {
    "info".to_owned()
}
