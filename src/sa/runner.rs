//! SA execution loop.

use super::config::SaConfig;
use crate::error::ConfigError;
use crate::problem::SearchProblem;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Result of a Simulated Annealing run.
#[derive(Debug, Clone)]
pub struct SaResult<S: Clone, Sc> {
    /// The best solution found.
    pub best: S,

    /// Score of the best solution.
    pub best_score: Sc,

    /// Score of the solution the run started from.
    pub initial_score: Sc,

    /// Total number of proposals evaluated.
    pub iterations: usize,

    /// Number of temperature levels completed.
    pub temperature_levels: usize,

    /// Temperature when the algorithm stopped.
    pub final_temperature: f64,

    /// Number of accepted moves (including improvements).
    pub accepted_moves: usize,

    /// Number of strictly improving moves.
    pub improving_moves: usize,

    /// Best score after each temperature level, starting with the initial
    /// score.
    pub score_history: Vec<Sc>,
}

/// Executes the Simulated Annealing algorithm.
pub struct SaRunner;

impl SaRunner {
    /// Runs SA from `initial`, seeding a fresh generator from
    /// `config.seed`.
    pub fn run<P: SearchProblem>(
        problem: &P,
        initial: P::Solution,
        config: &SaConfig,
    ) -> Result<SaResult<P::Solution, P::Score>, ConfigError> {
        let seed = config.seed.unwrap_or_else(rand::random);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        Self::run_with_rng(problem, initial, config, &mut rng)
    }

    /// Runs SA drawing every random decision from `rng`.
    ///
    /// `config.seed` is ignored; the caller owns the seeding contract.
    #[tracing::instrument(level = "debug", name = "simulated_annealing", skip_all)]
    pub fn run_with_rng<P: SearchProblem, R: Rng>(
        problem: &P,
        initial: P::Solution,
        config: &SaConfig,
        rng: &mut R,
    ) -> Result<SaResult<P::Solution, P::Score>, ConfigError> {
        config.validate()?;

        let mut current_score = problem.evaluate(&initial);
        let mut current = initial;
        let initial_score = current_score;
        let mut best = current.clone();
        let mut best_score = current_score;

        let mut temperature = config.initial_temperature;
        let mut total_iterations = 0usize;
        let mut accepted_moves = 0usize;
        let mut improving_moves = 0usize;
        let mut levels = 0usize;
        let mut score_history = vec![best_score];

        tracing::debug!(
            initial = ?initial_score,
            t0 = config.initial_temperature,
            t_final = config.final_temperature,
            alpha = config.alpha,
            "annealing started"
        );

        while temperature > config.final_temperature {
            for _ in 0..config.iterations_per_temperature {
                if config.max_iterations > 0 && total_iterations >= config.max_iterations {
                    break;
                }

                let neighbor = problem.neighbor(&current, rng);
                let neighbor_score = problem.evaluate(&neighbor);

                // Metropolis acceptance; equal scores give exp(0) = 1.
                let accept = if neighbor_score > current_score {
                    improving_moves += 1;
                    true
                } else {
                    let delta = problem.energy_delta(&current_score, &neighbor_score);
                    rng.random::<f64>() < (delta / temperature).exp()
                };

                if accept {
                    current = neighbor;
                    current_score = neighbor_score;
                    accepted_moves += 1;

                    if current_score > best_score {
                        best = current.clone();
                        best_score = current_score;
                    }
                }

                total_iterations += 1;
            }

            levels += 1;
            score_history.push(best_score);
            tracing::trace!(
                level = levels,
                temperature,
                current = ?current_score,
                best = ?best_score,
                "temperature level done"
            );

            if config.max_iterations > 0 && total_iterations >= config.max_iterations {
                break;
            }

            temperature *= config.alpha;
        }

        tracing::debug!(
            best = ?best_score,
            iterations = total_iterations,
            accepted = accepted_moves,
            improving = improving_moves,
            "annealing finished"
        );

        Ok(SaResult {
            best,
            best_score,
            initial_score,
            iterations: total_iterations,
            temperature_levels: levels,
            final_temperature: temperature,
            accepted_moves,
            improving_moves,
            score_history,
        })
    }
}
