//! Desk assignment for hybrid offices.
//!
//! Given employees, desks, days, desk preferences, teams, a presence
//! calendar and the zoning of desks, finds a per-day seating that
//! lexicographically maximizes
//!
//! 1. preference hits,
//! 2. team cohesion (team members sharing a zone),
//! 3. zone balance (smallest spread of occupancy between zones).
//!
//! A greedy constructive builder produces the initial seating, which is
//! then refined by one of two trajectory metaheuristics:
//!
//! - **Simulated Annealing (SA)**: Metropolis acceptance with geometric
//!   cooling.
//! - **Iterated Local Search (ILS)**: hill-climbing descents separated by
//!   random multi-swap perturbations.
//!
//! # Architecture
//!
//! The drivers in [`sa`] and [`ils`] are generic over [`SearchProblem`]
//! and know nothing about desks. [`desk`] holds the domain model and binds
//! it to the drivers through [`desk::DeskProblem`]. [`experiment`] runs
//! batches of seeded runs, and [`io`] (feature `serde`) reads and writes
//! the JSON formats.
//!
//! Every stochastic step draws from an explicitly seeded generator, so a
//! run is reproducible from its seed.

pub mod desk;
pub mod error;
pub mod experiment;
pub mod ils;
#[cfg(feature = "serde")]
pub mod io;
pub mod problem;
pub mod sa;

pub use error::{ConfigError, Error, InstanceError, Result};
pub use problem::SearchProblem;
