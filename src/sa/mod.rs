//! Simulated Annealing (SA).
//!
//! A single-solution trajectory metaheuristic. Worsening moves are accepted
//! with probability `exp(Δ/T)`, where Δ is the (negative) change of the
//! problem's scalar energy and `T` a geometrically decaying temperature.
//! Improvements and best-so-far tracking use the problem's exact score
//! ordering.
//!
//! # References
//!
//! - Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"
//! - Cerny (1985), "Thermodynamical Approach to the Travelling Salesman Problem"

mod config;
mod runner;

pub use config::SaConfig;
pub use runner::{SaResult, SaRunner};
