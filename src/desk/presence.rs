//! Presence calendar and the per-day presence filter.

use super::{DayIdx, EmployeeIdx};

/// Allowed days per employee.
///
/// An employee with no allowed day is never present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Calendar {
    n_days: usize,
    allowed: Vec<bool>,
}

impl Calendar {
    /// Calendar in which nobody is present on any day.
    pub fn new(n_employees: usize, n_days: usize) -> Self {
        Self {
            n_days,
            allowed: vec![false; n_employees * n_days],
        }
    }

    /// Marks `employee` as present on `day`.
    pub fn allow(&mut self, employee: EmployeeIdx, day: DayIdx) {
        self.allowed[employee * self.n_days + day] = true;
    }

    #[inline]
    pub fn is_present(&self, employee: EmployeeIdx, day: DayIdx) -> bool {
        self.allowed[employee * self.n_days + day]
    }
}

/// Employees present on `day`, in the order of `employees`.
///
/// Without a calendar everybody is present.
pub fn present(day: DayIdx, calendar: Option<&Calendar>, employees: &[EmployeeIdx]) -> Vec<EmployeeIdx> {
    match calendar {
        None => employees.to_vec(),
        Some(calendar) => employees
            .iter()
            .copied()
            .filter(|&e| calendar.is_present(e, day))
            .collect(),
    }
}
