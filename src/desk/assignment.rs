//! Assignment storage.

use super::{DayIdx, DeskIdx, EmployeeIdx, Instance};
use crate::error::InstanceError;
use std::collections::BTreeMap;

/// Day → employee → desk id (or `None`), the external form of an
/// [`Assignment`].
pub type NamedAssignment = BTreeMap<String, BTreeMap<String, Option<String>>>;

/// Desk of every employee on every day.
///
/// Stored as one flat buffer indexed by `day * n_employees + employee`, so
/// every (day, employee) pair always has an entry and cloning is a single
/// buffer copy.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Assignment {
    n_days: usize,
    n_employees: usize,
    slots: Vec<Option<DeskIdx>>,
}

impl Assignment {
    /// Assignment with every employee unassigned on every day.
    pub fn unassigned(n_days: usize, n_employees: usize) -> Self {
        Self {
            n_days,
            n_employees,
            slots: vec![None; n_days * n_employees],
        }
    }

    /// Empty assignment shaped for `instance`.
    pub fn for_instance(instance: &Instance) -> Self {
        Self::unassigned(instance.n_days(), instance.n_employees())
    }

    pub fn n_days(&self) -> usize {
        self.n_days
    }

    pub fn n_employees(&self) -> usize {
        self.n_employees
    }

    #[inline]
    fn slot(&self, day: DayIdx, employee: EmployeeIdx) -> usize {
        debug_assert!(day < self.n_days && employee < self.n_employees);
        day * self.n_employees + employee
    }

    /// Desk of `employee` on `day`.
    #[inline]
    pub fn get(&self, day: DayIdx, employee: EmployeeIdx) -> Option<DeskIdx> {
        self.slots[self.slot(day, employee)]
    }

    /// Sets the desk of `employee` on `day`. The caller keeps desks unique
    /// per day.
    #[inline]
    pub fn set(&mut self, day: DayIdx, employee: EmployeeIdx, desk: Option<DeskIdx>) {
        let slot = self.slot(day, employee);
        self.slots[slot] = desk;
    }

    /// Desks of all employees on `day`, indexed by employee.
    pub fn day(&self, day: DayIdx) -> &[Option<DeskIdx>] {
        let start = day * self.n_employees;
        &self.slots[start..start + self.n_employees]
    }

    /// Exchanges the desks of two employees on `day`.
    pub fn swap(&mut self, day: DayIdx, a: EmployeeIdx, b: EmployeeIdx) {
        let (a, b) = (self.slot(day, a), self.slot(day, b));
        self.slots.swap(a, b);
    }

    /// `(employee, desk)` pairs of the employees seated on `day`.
    pub fn seated(&self, day: DayIdx) -> impl Iterator<Item = (EmployeeIdx, DeskIdx)> + '_ {
        self.day(day)
            .iter()
            .enumerate()
            .filter_map(|(e, desk)| desk.map(|d| (e, d)))
    }

    /// Number of employees with a desk on `day`.
    pub fn seated_count(&self, day: DayIdx) -> usize {
        self.day(day).iter().filter(|d| d.is_some()).count()
    }

    /// Whether no desk is used twice on any day.
    pub fn desks_unique(&self) -> bool {
        (0..self.n_days).all(|day| {
            let mut seen: Vec<DeskIdx> = self.seated(day).map(|(_, d)| d).collect();
            let n = seen.len();
            seen.sort_unstable();
            seen.dedup();
            seen.len() == n
        })
    }

    /// Converts to the id-based form covering every day and employee.
    pub fn to_named(&self, instance: &Instance) -> NamedAssignment {
        instance
            .days()
            .iter()
            .enumerate()
            .map(|(day, day_id)| {
                let row = instance
                    .employees()
                    .iter()
                    .enumerate()
                    .map(|(e, employee)| {
                        let desk = self.get(day, e).map(|d| instance.desks()[d].clone());
                        (employee.clone(), desk)
                    })
                    .collect();
                (day_id.clone(), row)
            })
            .collect()
    }

    /// Reads an id-based assignment. Missing entries become unassigned.
    ///
    /// Does not check desk uniqueness; run
    /// [`validate`](super::validate()) first for untrusted input.
    pub fn from_named(instance: &Instance, named: &NamedAssignment) -> Result<Self, InstanceError> {
        let mut assignment = Self::for_instance(instance);
        for (day_id, row) in named {
            let day = instance.day_index(day_id).ok_or_else(|| InstanceError::UnknownDay {
                context: "assignment".into(),
                id: day_id.clone(),
            })?;
            for (employee_id, desk_id) in row {
                let e = instance
                    .employee_index(employee_id)
                    .ok_or_else(|| InstanceError::UnknownEmployee {
                        context: format!("assignment on `{day_id}`"),
                        id: employee_id.clone(),
                    })?;
                let desk = desk_id
                    .as_deref()
                    .map(|id| {
                        instance.desk_index(id).ok_or_else(|| InstanceError::UnknownDesk {
                            context: format!("assignment on `{day_id}`"),
                            id: id.to_string(),
                        })
                    })
                    .transpose()?;
                assignment.set(day, e, desk);
            }
        }
        Ok(assignment)
    }
}
