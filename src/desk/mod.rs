//! Desk assignment domain.
//!
//! An [`Instance`] lists employees, desks, days, desk preferences, groups,
//! a presence calendar and the zoning of desks. An [`Assignment`] maps every
//! (day, employee) pair to a desk or to nothing, with at most one employee
//! per desk per day. [`build`] produces a greedy initial assignment,
//! [`Evaluator`] scores it lexicographically and [`solve`] refines it with
//! simulated annealing or iterated local search.
//!
//! # Example
//!
//! ```
//! use desk_assign::desk::{solve, Instance, InstanceData, Method, SolveConfig};
//! use desk_assign::ils::IlsConfig;
//!
//! let data = InstanceData::new(["A", "B"], ["D1", "D2"], ["mon", "tue"])
//!     .with_zone("Z1", ["D1", "D2"])
//!     .with_preferences("A", ["D1"])
//!     .with_preferences("B", ["D2"]);
//! let instance = Instance::new(&data).unwrap();
//!
//! let config = SolveConfig::default()
//!     .with_seed(7)
//!     .with_method(Method::IteratedLocalSearch(IlsConfig::default()));
//! let outcome = solve(&instance, &config).unwrap();
//! assert_eq!(outcome.final_score.hits, 4);
//! ```

pub mod assignment;
pub mod construct;
pub mod instance;
pub mod neighborhood;
pub mod presence;
pub mod problem;
pub mod report;
pub mod score;
pub mod solve;
pub mod topology;
pub mod validate;

pub type EmployeeIdx = usize;
pub type DeskIdx = usize;
pub type DayIdx = usize;
pub type ZoneIdx = usize;
pub type GroupIdx = usize;

pub use assignment::{Assignment, NamedAssignment};
pub use construct::{build, ConstructConfig};
pub use instance::{Instance, InstanceData, NamedLists};
pub use neighborhood::{SwapMove, SwapNeighborhood};
pub use problem::DeskProblem;
pub use report::{DayReport, Report};
pub use score::{Evaluator, Score, Weights};
pub use solve::{solve, Method, SearchStats, SolveConfig, SolveOutcome};
pub use topology::Topology;
pub use validate::validate;
