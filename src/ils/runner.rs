//! Iterated Local Search execution engine.
//!
//! # Algorithm
//!
//! 1. Hill-climb from the initial solution to a first local optimum x
//! 2. Repeat `max_iterations` times:
//!    a. **Perturbation**: apply k unconditional moves to x → x'
//!    b. **Local search**: hill-climb x' → x''
//!    c. If f(x'') beats the best, record it
//!    d. Continue from x'' whether it improved or not
//! 3. Return the best solution found
//!
//! The walk is non-elitist: it never resets to the best solution.
//!
//! # Reference
//!
//! Lourenço, H. R., Martin, O. C. & Stützle, T. (2003). "Iterated Local
//! Search", *Handbook of Metaheuristics*, 320-353.

use super::config::IlsConfig;
use crate::error::ConfigError;
use crate::problem::SearchProblem;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Outcome of one hill-climbing descent.
#[derive(Debug, Clone)]
pub struct HillClimb<S, Sc> {
    /// Final solution of the descent.
    pub solution: S,
    /// Its score.
    pub score: Sc,
    /// Scores of the accepted states in order, starting with the
    /// start solution's score. Strictly increasing.
    pub trajectory: Vec<Sc>,
}

impl<S, Sc> HillClimb<S, Sc> {
    /// Number of accepted (strictly improving) moves.
    pub fn improvements(&self) -> usize {
        self.trajectory.len().saturating_sub(1)
    }
}

/// Greedy ascent with a fixed proposal budget.
///
/// Each proposal is a single [`neighbor`](SearchProblem::neighbor) move,
/// accepted only if its score is strictly greater than the current one.
pub fn hill_climb<P: SearchProblem, R: Rng>(
    problem: &P,
    start: P::Solution,
    iterations: usize,
    rng: &mut R,
) -> HillClimb<P::Solution, P::Score> {
    let mut score = problem.evaluate(&start);
    let mut solution = start;
    let mut trajectory = vec![score];

    for _ in 0..iterations {
        let candidate = problem.neighbor(&solution, rng);
        let candidate_score = problem.evaluate(&candidate);
        if candidate_score > score {
            solution = candidate;
            score = candidate_score;
            trajectory.push(score);
        }
    }

    HillClimb {
        solution,
        score,
        trajectory,
    }
}

/// Result of an ILS run.
#[derive(Debug, Clone)]
pub struct IlsResult<S: Clone, Sc> {
    /// Best solution found.
    pub best: S,
    /// Score of the best solution.
    pub best_score: Sc,
    /// Score of the solution the run started from.
    pub initial_score: Sc,
    /// Outer iterations executed.
    pub iterations: usize,
    /// Outer iteration that produced the best solution (0 = first descent).
    pub best_iteration: usize,
    /// Accepted moves over all local searches.
    pub local_search_improvements: usize,
    /// Best score after the first descent and after each outer iteration.
    pub score_history: Vec<Sc>,
}

/// Iterated Local Search runner.
pub struct IlsRunner;

impl IlsRunner {
    /// Runs ILS from `initial`, seeding a fresh generator from
    /// `config.seed`.
    pub fn run<P: SearchProblem>(
        problem: &P,
        initial: P::Solution,
        config: &IlsConfig,
    ) -> Result<IlsResult<P::Solution, P::Score>, ConfigError> {
        let seed = config.seed.unwrap_or_else(rand::random);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        Self::run_with_rng(problem, initial, config, &mut rng)
    }

    /// Runs ILS drawing every random decision from `rng`.
    #[tracing::instrument(level = "debug", name = "iterated_local_search", skip_all)]
    pub fn run_with_rng<P: SearchProblem, R: Rng>(
        problem: &P,
        initial: P::Solution,
        config: &IlsConfig,
        rng: &mut R,
    ) -> Result<IlsResult<P::Solution, P::Score>, ConfigError> {
        config.validate()?;

        let initial_score = problem.evaluate(&initial);
        let descent = hill_climb(problem, initial, config.local_search_iterations, rng);
        let mut local_search_improvements = descent.improvements();

        let mut best = descent.solution.clone();
        let mut best_score = descent.score;
        let mut best_iteration = 0;
        let mut current = descent.solution;
        let mut score_history = Vec::with_capacity(config.max_iterations + 1);
        score_history.push(best_score);

        tracing::debug!(initial = ?initial_score, local_optimum = ?best_score, "first descent done");

        for iteration in 1..=config.max_iterations {
            let perturbed = problem.perturb(&current, config.perturbation_strength, rng);
            let descent = hill_climb(problem, perturbed, config.local_search_iterations, rng);
            local_search_improvements += descent.improvements();

            if descent.score > best_score {
                best = descent.solution.clone();
                best_score = descent.score;
                best_iteration = iteration;
            }
            tracing::trace!(iteration, candidate = ?descent.score, best = ?best_score, "ils iteration");

            current = descent.solution;
            score_history.push(best_score);
        }

        tracing::debug!(best = ?best_score, best_iteration, "ils finished");

        Ok(IlsResult {
            best,
            best_score,
            initial_score,
            iterations: config.max_iterations,
            best_iteration,
            local_search_improvements,
            score_history,
        })
    }
}
