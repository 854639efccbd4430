//! SA configuration.

use crate::error::ConfigError;

/// Configuration for the Simulated Annealing driver.
///
/// The temperature decays geometrically, `T ← alpha · T`, after every
/// inner loop of `iterations_per_temperature` proposals. The run ends once
/// `T ≤ final_temperature`.
///
/// # Examples
///
/// ```
/// use desk_assign::sa::SaConfig;
///
/// let config = SaConfig::default()
///     .with_initial_temperature(100.0)
///     .with_final_temperature(0.5)
///     .with_alpha(0.98)
///     .with_iterations_per_temperature(200);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SaConfig {
    /// Initial temperature. Higher values accept more worsening moves.
    pub initial_temperature: f64,

    /// The run stops when the temperature drops to this value or below.
    pub final_temperature: f64,

    /// Geometric cooling factor in (0, 1). Typical: 0.90–0.99.
    pub alpha: f64,

    /// Number of proposals at each temperature level.
    pub iterations_per_temperature: usize,

    /// Maximum total proposals (hard budget). 0 = no limit.
    pub max_iterations: usize,

    /// Random seed. `None` draws one from the thread RNG.
    pub seed: Option<u64>,
}

impl Default for SaConfig {
    fn default() -> Self {
        Self {
            initial_temperature: 200.0,
            final_temperature: 1.0,
            alpha: 0.95,
            iterations_per_temperature: 1000,
            max_iterations: 0,
            seed: None,
        }
    }
}

impl SaConfig {
    pub fn with_initial_temperature(mut self, t: f64) -> Self {
        self.initial_temperature = t;
        self
    }

    pub fn with_final_temperature(mut self, t: f64) -> Self {
        self.final_temperature = t;
        self
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_iterations_per_temperature(mut self, n: usize) -> Self {
        self.iterations_per_temperature = n;
        self
    }

    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Number of temperature levels the schedule visits, ignoring
    /// `max_iterations`.
    pub fn temperature_levels(&self) -> usize {
        let mut t = self.initial_temperature;
        let mut levels = 0;
        while t > self.final_temperature {
            t *= self.alpha;
            levels += 1;
        }
        levels
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.initial_temperature > 0.0) {
            return Err(ConfigError::new(
                "sa",
                "initial_temperature must be positive",
            ));
        }
        if !(self.final_temperature > 0.0) {
            return Err(ConfigError::new("sa", "final_temperature must be positive"));
        }
        if self.final_temperature >= self.initial_temperature {
            return Err(ConfigError::new(
                "sa",
                "final_temperature must be less than initial_temperature",
            ));
        }
        if !(self.alpha > 0.0 && self.alpha < 1.0) {
            return Err(ConfigError::new(
                "sa",
                format!("alpha must be in (0, 1), got {}", self.alpha),
            ));
        }
        if self.iterations_per_temperature == 0 {
            return Err(ConfigError::new(
                "sa",
                "iterations_per_temperature must be at least 1",
            ));
        }
        Ok(())
    }
}
