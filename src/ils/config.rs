//! Iterated Local Search configuration.

use crate::error::ConfigError;

/// Configuration parameters for Iterated Local Search.
///
/// # Examples
///
/// ```
/// use desk_assign::ils::IlsConfig;
///
/// let config = IlsConfig::default()
///     .with_max_iterations(50)
///     .with_local_search_iterations(1000)
///     .with_perturbation_strength(4);
/// assert_eq!(config.max_iterations, 50);
/// assert_eq!(config.perturbation_strength, 4);
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IlsConfig {
    /// Number of perturb + local search rounds after the first descent.
    pub max_iterations: usize,
    /// Proposal budget of each hill-climbing descent.
    pub local_search_iterations: usize,
    /// Number of unconditional moves applied by one perturbation.
    pub perturbation_strength: usize,
    /// Random seed. `None` draws one from the thread RNG.
    pub seed: Option<u64>,
}

impl Default for IlsConfig {
    fn default() -> Self {
        Self {
            max_iterations: 20,
            local_search_iterations: 500,
            perturbation_strength: 3,
            seed: None,
        }
    }
}

impl IlsConfig {
    /// Sets the number of outer iterations.
    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    /// Sets the proposal budget of each local search.
    pub fn with_local_search_iterations(mut self, n: usize) -> Self {
        self.local_search_iterations = n;
        self
    }

    /// Sets how many moves a perturbation applies.
    pub fn with_perturbation_strength(mut self, k: usize) -> Self {
        self.perturbation_strength = k;
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    ///
    /// Zero budgets are legal: a zero-strength perturbation leaves the
    /// solution unchanged and a zero-budget descent returns its start.
    pub fn validate(&self) -> Result<(), ConfigError> {
        Ok(())
    }
}
