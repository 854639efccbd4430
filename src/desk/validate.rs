//! Structural checks on an externally supplied assignment.

use super::{Instance, NamedAssignment};
use std::collections::BTreeSet;

/// Lists every structural violation of `named` against `instance`.
///
/// Checked per instance day: the day is present; every employee has an
/// entry; every entry names a known employee; every desk exists; no desk is
/// used twice. An empty list means the assignment is valid.
pub fn validate(instance: &Instance, named: &NamedAssignment) -> Vec<String> {
    let mut errors = Vec::new();

    for day in instance.days() {
        let Some(row) = named.get(day) else {
            errors.push(format!("missing day in solution: {day}"));
            continue;
        };

        let missing: Vec<&str> = instance
            .employees()
            .iter()
            .filter(|e| !row.contains_key(e.as_str()))
            .map(String::as_str)
            .collect();
        if !missing.is_empty() {
            errors.push(format!("day {day}: missing employees {missing:?}"));
        }

        let unknown: Vec<&str> = row
            .keys()
            .filter(|e| instance.employee_index(e).is_none())
            .map(String::as_str)
            .collect();
        if !unknown.is_empty() {
            errors.push(format!("day {day}: unknown employees {unknown:?}"));
        }

        let mut seen = BTreeSet::new();
        let mut duplicated = BTreeSet::new();
        let mut nonexistent = BTreeSet::new();
        for desk in row.values().flatten() {
            if instance.desk_index(desk).is_none() {
                nonexistent.insert(desk.as_str());
            }
            if !seen.insert(desk.as_str()) {
                duplicated.insert(desk.as_str());
            }
        }
        if !nonexistent.is_empty() {
            errors.push(format!("day {day}: nonexistent desks {nonexistent:?}"));
        }
        if !duplicated.is_empty() {
            errors.push(format!("day {day}: duplicate desks {duplicated:?}"));
        }
    }

    if !errors.is_empty() {
        tracing::debug!(violations = errors.len(), "assignment failed validation");
    }
    errors
}
