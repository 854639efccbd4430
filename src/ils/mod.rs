//! Iterated Local Search (ILS).
//!
//! Alternates a greedy hill-climbing descent with random multi-move
//! perturbations to hop between basins of attraction. The best solution
//! ever seen is returned, while the walk itself always continues from the
//! latest local optimum.

mod config;
mod runner;

pub use config::IlsConfig;
pub use runner::{hill_climb, HillClimb, IlsResult, IlsRunner};
