//! Batch experiments: every (instance, method, seed) combination, timed
//! and scored, written as CSV.
//!
//! With the `parallel` feature the runs are spread over the rayon pool;
//! each run stays single-threaded and the row order is always instance,
//! then method, then seed.

use crate::desk::{solve, Instance, Method, Score, SolveConfig};
use crate::error::{ConfigError, Result};
use crate::ils::IlsConfig;
use crate::sa::SaConfig;
use std::io::Write;
use std::time::Duration;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Heuristic compared by the harness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MethodKind {
    /// Iterated local search; `iters` is the local-search budget.
    Ils,
    /// Simulated annealing from 200 down to 1 with α = 0.95; `iters` is the
    /// number of proposals per temperature.
    Sa,
}

impl MethodKind {
    pub const ALL: [MethodKind; 2] = [MethodKind::Ils, MethodKind::Sa];

    pub fn label(self) -> &'static str {
        match self {
            MethodKind::Ils => "ILS",
            MethodKind::Sa => "SA",
        }
    }

    /// Concrete method for a budget of `iters`.
    pub fn method(self, iters: usize) -> Method {
        match self {
            MethodKind::Ils => {
                Method::IteratedLocalSearch(IlsConfig::default().with_local_search_iterations(iters))
            }
            MethodKind::Sa => Method::Annealing(SaConfig::default().with_iterations_per_temperature(iters)),
        }
    }
}

impl std::str::FromStr for MethodKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "ILS" => Ok(MethodKind::Ils),
            "SA" => Ok(MethodKind::Sa),
            _ => Err(ConfigError::new("experiment", format!("unknown method `{s}`"))),
        }
    }
}

/// What to run.
#[derive(Debug, Clone)]
pub struct ExperimentPlan {
    pub methods: Vec<MethodKind>,
    pub seeds: Vec<u64>,
    pub top_k: usize,
    pub iters: usize,
}

impl Default for ExperimentPlan {
    fn default() -> Self {
        Self {
            methods: MethodKind::ALL.to_vec(),
            seeds: (1..=5).collect(),
            top_k: 3,
            iters: 1000,
        }
    }
}

impl ExperimentPlan {
    pub fn with_methods(mut self, methods: Vec<MethodKind>) -> Self {
        self.methods = methods;
        self
    }

    pub fn with_seeds(mut self, seeds: Vec<u64>) -> Self {
        self.seeds = seeds;
        self
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn with_iters(mut self, iters: usize) -> Self {
        self.iters = iters;
        self
    }

    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.top_k == 0 {
            return Err(ConfigError::new("experiment", "top_k must be at least 1"));
        }
        if self.iters == 0 {
            return Err(ConfigError::new("experiment", "iters must be at least 1"));
        }
        Ok(())
    }
}

/// One CSV line.
#[derive(Debug, Clone, PartialEq)]
pub struct ExperimentRow {
    pub instance: String,
    pub method: MethodKind,
    pub seed: u64,
    pub iters: usize,
    pub top_k: usize,
    pub score: Score,
    pub runtime: Duration,
}

pub const CSV_HEADER: &str = "instance,method,seed,iters,top_k,C1,C2,C3,runtime_sec";

/// Runs the plan over named instances.
///
/// The first failing run aborts the batch.
#[tracing::instrument(level = "info", name = "experiments", skip_all, fields(instances = instances.len()))]
pub fn run_experiments(instances: &[(String, Instance)], plan: &ExperimentPlan) -> Result<Vec<ExperimentRow>> {
    plan.validate()?;

    let jobs: Vec<(&str, &Instance, MethodKind, u64)> = instances
        .iter()
        .flat_map(move |(name, instance)| {
            plan.methods.iter().flat_map(move |&method| {
                plan.seeds
                    .iter()
                    .map(move |&seed| (name.as_str(), instance, method, seed))
            })
        })
        .collect();
    tracing::info!(runs = jobs.len(), "starting experiments");

    let run = |&(name, instance, method, seed): &(&str, &Instance, MethodKind, u64)| -> Result<ExperimentRow> {
        let config = SolveConfig::default()
            .with_seed(seed)
            .with_top_k(plan.top_k)
            .with_method(method.method(plan.iters));
        let outcome = solve(instance, &config)?;
        tracing::debug!(instance = name, method = method.label(), seed, score = %outcome.final_score, "run finished");
        Ok(ExperimentRow {
            instance: name.to_string(),
            method,
            seed,
            iters: plan.iters,
            top_k: plan.top_k,
            score: outcome.final_score,
            runtime: outcome.elapsed,
        })
    };

    #[cfg(feature = "parallel")]
    let rows = jobs.par_iter().map(run).collect::<Result<Vec<_>>>();
    #[cfg(not(feature = "parallel"))]
    let rows = jobs.iter().map(run).collect::<Result<Vec<_>>>();
    rows
}

fn csv_field(value: &str) -> std::borrow::Cow<'_, str> {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\"")).into()
    } else {
        value.into()
    }
}

/// Writes the header and one line per row.
pub fn write_csv<W: Write>(mut writer: W, rows: &[ExperimentRow]) -> std::io::Result<()> {
    writeln!(writer, "{CSV_HEADER}")?;
    for row in rows {
        writeln!(
            writer,
            "{},{},{},{},{},{},{},{},{:.6}",
            csv_field(&row.instance),
            row.method.label(),
            row.seed,
            row.iters,
            row.top_k,
            row.score.hits,
            row.score.cohesion,
            row.score.balance,
            row.runtime.as_secs_f64()
        )?;
    }
    writer.flush()
}
