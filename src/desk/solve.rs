//! End-to-end pipeline: construct, then improve.

use super::construct::{self, ConstructConfig};
use super::{Assignment, DeskProblem, Instance, Score, Weights};
use crate::error::Result;
use crate::ils::{IlsConfig, IlsRunner};
use crate::problem::SearchProblem;
use crate::sa::{SaConfig, SaRunner};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::{Duration, Instant};

/// Improvement heuristic applied to the constructed assignment.
#[derive(Debug, Clone)]
pub enum Method {
    Annealing(SaConfig),
    IteratedLocalSearch(IlsConfig),
}

impl Method {
    /// Short label used in reports: `SA` or `ILS`.
    pub fn name(&self) -> &'static str {
        match self {
            Method::Annealing(_) => "SA",
            Method::IteratedLocalSearch(_) => "ILS",
        }
    }
}

impl Default for Method {
    fn default() -> Self {
        Method::Annealing(SaConfig::default())
    }
}

/// Parameters of [`solve`].
///
/// `seed` seeds both the constructive builder and the improvement
/// heuristic, each with its own generator; the `seed` fields of the method
/// configs are ignored.
#[derive(Debug, Clone)]
pub struct SolveConfig {
    pub seed: u64,
    pub top_k: usize,
    pub randomize: bool,
    pub method: Method,
    /// Use [`Weights::exact_for`] instead of the reference weights.
    pub exact_weights: bool,
}

impl Default for SolveConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            top_k: 3,
            randomize: true,
            method: Method::default(),
            exact_weights: false,
        }
    }
}

impl SolveConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn with_randomize(mut self, randomize: bool) -> Self {
        self.randomize = randomize;
        self
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn with_exact_weights(mut self, exact: bool) -> Self {
        self.exact_weights = exact;
        self
    }

    fn construct_config(&self) -> ConstructConfig {
        ConstructConfig {
            seed: self.seed,
            randomize: self.randomize,
            top_k: self.top_k,
        }
    }
}

/// Counters of the improvement run.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchStats {
    Annealing {
        iterations: usize,
        temperature_levels: usize,
        accepted_moves: usize,
        improving_moves: usize,
    },
    IteratedLocalSearch {
        iterations: usize,
        best_iteration: usize,
        local_search_improvements: usize,
    },
}

/// Result of [`solve`].
#[derive(Debug, Clone)]
pub struct SolveOutcome {
    /// Best assignment found.
    pub assignment: Assignment,
    /// Score of the constructed assignment.
    pub initial_score: Score,
    /// Score of `assignment`.
    pub final_score: Score,
    pub stats: SearchStats,
    /// Wall time of construction plus improvement.
    pub elapsed: Duration,
}

/// Generator for the improvement phase: the builder's seed on ChaCha
/// stream 1, so the driver never replays the builder's draws.
fn search_rng(seed: u64) -> ChaCha8Rng {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    rng.set_stream(1);
    rng
}

/// Builds an initial assignment and improves it with the configured method.
///
/// Parameters are validated before any work starts.
#[tracing::instrument(level = "info", name = "solve", skip_all, fields(method = config.method.name(), seed = config.seed))]
pub fn solve(instance: &Instance, config: &SolveConfig) -> Result<SolveOutcome> {
    let started = Instant::now();
    let construct_config = config.construct_config();
    construct_config.validate()?;
    match &config.method {
        Method::Annealing(sa) => sa.validate()?,
        Method::IteratedLocalSearch(ils) => ils.validate()?,
    }

    let weights = if config.exact_weights {
        Weights::exact_for(instance)
    } else {
        Weights::REFERENCE
    };
    if !weights.is_exact_for(instance) {
        tracing::warn!(
            w1 = weights.hits,
            w2 = weights.cohesion,
            "surrogate weights do not separate score components on this instance; annealing acceptance may be distorted"
        );
    }

    let start = construct::build(instance, &construct_config)?;
    let problem = DeskProblem::new(instance).with_weights(weights);
    let initial_score = problem.evaluate(&start);
    tracing::info!(initial = %initial_score, "initial assignment built");

    let mut rng = search_rng(config.seed);
    let (assignment, final_score, stats) = match &config.method {
        Method::Annealing(sa) => {
            let result = SaRunner::run_with_rng(&problem, start, sa, &mut rng)?;
            let stats = SearchStats::Annealing {
                iterations: result.iterations,
                temperature_levels: result.temperature_levels,
                accepted_moves: result.accepted_moves,
                improving_moves: result.improving_moves,
            };
            (result.best, result.best_score, stats)
        }
        Method::IteratedLocalSearch(ils) => {
            let result = IlsRunner::run_with_rng(&problem, start, ils, &mut rng)?;
            let stats = SearchStats::IteratedLocalSearch {
                iterations: result.iterations,
                best_iteration: result.best_iteration,
                local_search_improvements: result.local_search_improvements,
            };
            (result.best, result.best_score, stats)
        }
    };

    let elapsed = started.elapsed();
    tracing::info!(final_score = %final_score, elapsed_ms = elapsed.as_millis() as u64, "search finished");

    Ok(SolveOutcome {
        assignment,
        initial_score,
        final_score,
        stats,
        elapsed,
    })
}
