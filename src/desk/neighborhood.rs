//! Two-employee desk swap neighborhood.

use super::{Assignment, DayIdx, EmployeeIdx, Instance};
use rand::Rng;

/// A desk exchange between two employees on one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapMove {
    pub day: DayIdx,
    pub first: EmployeeIdx,
    pub second: EmployeeIdx,
}

impl SwapMove {
    pub fn apply(&self, assignment: &mut Assignment) {
        assignment.swap(self.day, self.first, self.second);
    }
}

/// Random desk swaps restricted to a scope of days and employees.
///
/// A move picks a day of the scope uniformly, then two distinct in-scope
/// employees seated that day, and exchanges their desks. The set of desks
/// in use on each day never changes, so the one-employee-per-desk invariant
/// holds by construction. When the chosen day has fewer than two eligible
/// employees the move is a no-op.
#[derive(Debug, Clone)]
pub struct SwapNeighborhood {
    days: Vec<DayIdx>,
    employees: Vec<EmployeeIdx>,
}

impl SwapNeighborhood {
    /// Every day and every employee of `instance`.
    pub fn full(instance: &Instance) -> Self {
        Self {
            days: (0..instance.n_days()).collect(),
            employees: (0..instance.n_employees()).collect(),
        }
    }

    /// Only the given days and employees.
    pub fn scoped(days: Vec<DayIdx>, employees: Vec<EmployeeIdx>) -> Self {
        Self { days, employees }
    }

    pub fn days(&self) -> &[DayIdx] {
        &self.days
    }

    pub fn employees(&self) -> &[EmployeeIdx] {
        &self.employees
    }

    /// Draws a move, or `None` for a no-op.
    pub fn propose<R: Rng>(&self, assignment: &Assignment, rng: &mut R) -> Option<SwapMove> {
        if self.days.is_empty() {
            return None;
        }
        let day = self.days[rng.random_range(0..self.days.len())];
        let seated: Vec<EmployeeIdx> = self
            .employees
            .iter()
            .copied()
            .filter(|&e| assignment.get(day, e).is_some())
            .collect();
        if seated.len() < 2 {
            return None;
        }
        let i = rng.random_range(0..seated.len());
        let mut j = rng.random_range(0..seated.len() - 1);
        if j >= i {
            j += 1;
        }
        Some(SwapMove {
            day,
            first: seated[i],
            second: seated[j],
        })
    }

    /// Applies one random move in place.
    pub fn apply_random<R: Rng>(&self, assignment: &mut Assignment, rng: &mut R) -> Option<SwapMove> {
        let mv = self.propose(assignment, rng)?;
        mv.apply(assignment);
        Some(mv)
    }

    /// Copy of `assignment` with one random move applied.
    pub fn neighbor<R: Rng>(&self, assignment: &Assignment, rng: &mut R) -> Assignment {
        let mut next = assignment.clone();
        self.apply_random(&mut next, rng);
        next
    }
}
