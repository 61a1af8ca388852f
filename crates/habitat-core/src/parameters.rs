//! Validated run parameters handed to [`crate::Simulation::set_parameters`].

use crate::error::SimulationError;
use crate::profiles::ProfileWeights;

/// Everything that shapes one run.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationParameters {
    /// World width in units.
    pub world_width: f64,
    /// World height in units.
    pub world_height: f64,
    /// Seed for every random draw the run makes.
    pub seed: u64,
    /// The run stops when the tick counter reaches this value; `0` means
    /// no limit.
    pub max_ticks: u64,
    /// Humans placed at start.
    pub initial_humans: u32,
    /// Animals spawned at start.
    pub initial_animals: u32,
    /// Vegetables spawned at start.
    pub initial_plants: u32,
    /// Cap on living animals.
    pub max_animals: u32,
    /// Cap on uneaten vegetables.
    pub max_plants: u32,
    /// Mean animal arrivals per tick; `<= 0` disables animal spawning.
    pub animal_rate: f64,
    /// Mean vegetable arrivals per tick; `<= 0` disables plant spawning.
    pub plant_rate: f64,
    /// Profile mix of initial humans.
    pub profile_weights: ProfileWeights,
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self {
            world_width: 800.0,
            world_height: 600.0,
            seed: 42,
            max_ticks: 150_000,
            initial_humans: 20,
            initial_animals: 20,
            initial_plants: 20,
            max_animals: 300,
            max_plants: 300,
            animal_rate: 0.35,
            plant_rate: 0.35,
            profile_weights: ProfileWeights::default(),
        }
    }
}

impl SimulationParameters {
    /// Reject parameters no run can use.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::InvalidConfig`] naming the first bad field.
    pub fn validate(&self) -> Result<(), SimulationError> {
        let invalid = |reason: String| Err(SimulationError::InvalidConfig { reason });

        for (name, side) in [("width", self.world_width), ("height", self.world_height)] {
            if !side.is_finite() || side <= 0.0 {
                return invalid(format!("world {name} must be positive, got {side}"));
            }
        }
        for (name, rate) in [("animal", self.animal_rate), ("plant", self.plant_rate)] {
            if rate.is_nan() {
                return invalid(format!("{name} spawn rate is not a number"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(SimulationParameters::default().validate().is_ok());
    }

    #[test]
    fn rejects_empty_world() {
        let params = SimulationParameters {
            world_height: 0.0,
            ..SimulationParameters::default()
        };
        let err = params.validate().unwrap_err();
        assert!(err.to_string().contains("height"));
    }

    #[test]
    fn negative_rate_disables_instead_of_failing() {
        let params = SimulationParameters {
            animal_rate: -1.0,
            ..SimulationParameters::default()
        };
        assert!(params.validate().is_ok());

        let params = SimulationParameters {
            plant_rate: f64::NAN,
            ..SimulationParameters::default()
        };
        assert!(params.validate().is_err());
    }
}
