//! Per-day breakdown of a score.

use super::{Assignment, Evaluator, Instance, Score};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DayReport {
    pub day: String,
    /// Employees holding a desk.
    pub assigned: usize,
    pub score: Score,
}

/// Per-day scores plus their total.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Report {
    pub days: Vec<DayReport>,
    pub total: Score,
}

impl Report {
    pub fn new(instance: &Instance, assignment: &Assignment) -> Self {
        let evaluator = Evaluator::new(instance);
        let days: Vec<DayReport> = instance
            .days()
            .iter()
            .enumerate()
            .map(|(day, id)| DayReport {
                day: id.clone(),
                assigned: assignment.seated_count(day),
                score: evaluator.day_score(assignment, day),
            })
            .collect();
        let total = days.iter().map(|d| d.score).sum();
        Self { days, total }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Per-day report:")?;
        for d in &self.days {
            writeln!(
                f,
                "- {}: assigned={} | C1={} C2={} C3={}",
                d.day, d.assigned, d.score.hits, d.score.cohesion, d.score.balance
            )?;
        }
        write!(
            f,
            "Totals: C1={} C2={} C3={}",
            self.total.hits, self.total.cohesion, self.total.balance
        )
    }
}
