//! Lexicographic objective.
//!
//! A [`Score`] is the triple (preference hits, group cohesion, zone
//! balance), compared lexicographically: more hits always wins, cohesion
//! breaks ties on hits, balance breaks the rest.

use super::{Assignment, DayIdx, Instance};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

/// Objective triple. Higher is better on every component; the derived
/// ordering is lexicographic in field order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Score {
    /// (day, employee) pairs seated at one of their preferred desks.
    pub hits: i64,
    /// Sum over days and groups of the largest number of group members
    /// sharing a zone.
    pub cohesion: i64,
    /// Sum over days of `-(max - min)` zone occupancy. Never positive.
    pub balance: i64,
}

impl Score {
    pub const fn new(hits: i64, cohesion: i64, balance: i64) -> Self {
        Self {
            hits,
            cohesion,
            balance,
        }
    }

    /// Weighted scalar `hits·W1 + cohesion·W2 + balance`.
    ///
    /// Computed in `i128`: with order-exact weights on large instances the
    /// products exceed `i64`.
    pub fn surrogate(&self, weights: &Weights) -> i128 {
        i128::from(self.hits) * i128::from(weights.hits)
            + i128::from(self.cohesion) * i128::from(weights.cohesion)
            + i128::from(self.balance)
    }
}

impl Add for Score {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            hits: self.hits + rhs.hits,
            cohesion: self.cohesion + rhs.cohesion,
            balance: self.balance + rhs.balance,
        }
    }
}

impl AddAssign for Score {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sum for Score {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Score::default(), Add::add)
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.hits, self.cohesion, self.balance)
    }
}

/// Weights of the scalar surrogate.
///
/// The surrogate reproduces the lexicographic order only while cohesion and
/// balance stay below the weight ratios; [`Weights::exact_for`] derives
/// weights that guarantee it for a given instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Weights {
    /// Multiplier of preference hits (W1).
    pub hits: i64,
    /// Multiplier of cohesion (W2).
    pub cohesion: i64,
}

impl Default for Weights {
    fn default() -> Self {
        Self::REFERENCE
    }
}

impl Weights {
    /// W1 = 10000, W2 = 100.
    pub const REFERENCE: Weights = Weights {
        hits: 10_000,
        cohesion: 100,
    };

    /// Largest possible `|balance|` and cohesion for `instance`.
    fn bounds(instance: &Instance) -> (i128, i128) {
        let days = instance.n_days() as i128;
        let seats = instance.n_employees().min(instance.n_desks()) as i128;
        let grouped: i128 = (0..instance.n_groups())
            .map(|g| instance.group_members(g).len().min(instance.n_desks()) as i128)
            .sum();
        (days * seats, days * grouped)
    }

    /// Smallest weights for which the surrogate orders every pair of
    /// assignments of `instance` exactly like [`Score`]'s `Ord`.
    ///
    /// Each weight saturates at `i64::MAX`; [`is_exact_for`](Self::is_exact_for)
    /// reports whether the result is still exact.
    pub fn exact_for(instance: &Instance) -> Self {
        let (balance_span, cohesion_max) = Self::bounds(instance);
        Self::from_bounds(balance_span, cohesion_max)
    }

    fn from_bounds(balance_span: i128, cohesion_max: i128) -> Self {
        let clamp = |w: i128| i64::try_from(w).unwrap_or(i64::MAX);
        let cohesion = balance_span + 1;
        Self {
            hits: clamp(cohesion * cohesion_max + balance_span + 1),
            cohesion: clamp(cohesion),
        }
    }

    /// Whether the surrogate is order-exact on `instance`.
    pub fn is_exact_for(&self, instance: &Instance) -> bool {
        let (balance_span, cohesion_max) = Self::bounds(instance);
        self.is_exact_within(balance_span, cohesion_max)
    }

    fn is_exact_within(&self, balance_span: i128, cohesion_max: i128) -> bool {
        let (hits, cohesion) = (i128::from(self.hits), i128::from(self.cohesion));
        cohesion > balance_span && hits > cohesion * cohesion_max + balance_span
    }
}

/// Scores assignments of one instance.
#[derive(Debug, Clone, Copy)]
pub struct Evaluator<'a> {
    instance: &'a Instance,
}

impl<'a> Evaluator<'a> {
    pub fn new(instance: &'a Instance) -> Self {
        Self { instance }
    }

    pub fn instance(&self) -> &'a Instance {
        self.instance
    }

    /// Score of a full assignment; the sum of [`day_score`](Self::day_score)
    /// over all days.
    pub fn score(&self, assignment: &Assignment) -> Score {
        (0..self.instance.n_days())
            .map(|day| self.day_score(assignment, day))
            .sum()
    }

    /// Score contribution of a single day.
    pub fn day_score(&self, assignment: &Assignment, day: DayIdx) -> Score {
        let instance = self.instance;
        let topology = instance.topology();

        let hits = assignment
            .seated(day)
            .filter(|&(e, d)| instance.prefers(e, d))
            .count() as i64;

        let mut counts = vec![0i64; instance.n_zones()];
        let mut cohesion = 0;
        for g in 0..instance.n_groups() {
            counts.fill(0);
            for &e in instance.group_members(g) {
                if let Some(zone) = assignment.get(day, e).and_then(|d| topology.zone_of(d)) {
                    counts[zone] += 1;
                }
            }
            cohesion += counts.iter().copied().max().unwrap_or(0);
        }

        counts.fill(0);
        for (_, desk) in assignment.seated(day) {
            if let Some(zone) = topology.zone_of(desk) {
                counts[zone] += 1;
            }
        }
        let occupied = counts.iter().copied().filter(|&c| c > 0);
        let balance = match (occupied.clone().max(), occupied.min()) {
            (Some(max), Some(min)) => -(max - min),
            _ => 0,
        };

        Score {
            hits,
            cohesion,
            balance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::desk::{fixtures, InstanceData};

    fn seat(assignment: &mut Assignment, day: usize, pairs: &[(usize, usize)]) {
        for &(e, d) in pairs {
            assignment.set(day, e, Some(d));
        }
    }

    #[test]
    fn test_lexicographic_order() {
        assert!(Score::new(2, 0, -10) > Score::new(1, 50, 0));
        assert!(Score::new(1, 3, -10) > Score::new(1, 2, 0));
        assert!(Score::new(1, 3, -1) > Score::new(1, 3, -2));
        assert_eq!(Score::new(1, 1, 1).max(Score::new(1, 1, 0)), Score::new(1, 1, 1));
    }

    #[test]
    fn test_surrogate_reference_weights() {
        let score = Score::new(3, 4, -2);
        assert_eq!(score.surrogate(&Weights::default()), 30_000 + 400 - 2);
    }

    #[test]
    fn test_score_sum_and_display() {
        let total: Score = [Score::new(1, 2, -1), Score::new(0, 1, 0)].into_iter().sum();
        assert_eq!(total, Score::new(1, 3, -1));
        assert_eq!(total.to_string(), "(1, 3, -1)");
    }

    #[test]
    fn test_split_group_cohesion_is_one() {
        let instance = fixtures::split_group();
        let mut assignment = Assignment::for_instance(&instance);
        seat(&mut assignment, 0, &[(0, 0), (1, 1)]);
        assert_eq!(Evaluator::new(&instance).score(&assignment), Score::new(0, 1, 0));
    }

    #[test]
    fn test_hits_count_preferred_desks() {
        let data = fixtures::pair()
            .with_preferences("A", ["D2", "D1"])
            .with_preferences("B", ["D2"]);
        let instance = Instance::new(&data).unwrap();
        let mut assignment = Assignment::for_instance(&instance);
        seat(&mut assignment, 0, &[(0, 0), (1, 1)]);
        assert_eq!(Evaluator::new(&instance).score(&assignment).hits, 2);
        assignment.swap(0, 0, 1);
        assert_eq!(Evaluator::new(&instance).score(&assignment).hits, 1);
    }

    #[test]
    fn test_balance_ignores_empty_zones() {
        let data = InstanceData::new(["A", "B", "C"], ["D1", "D2", "D3", "D4", "X"], ["Mon"])
            .with_zone("Z1", ["D1", "D2", "D3"])
            .with_zone("Z2", ["D4"])
            .with_zone("Z3", Vec::<&str>::new());
        let instance = Instance::new(&data).unwrap();
        let evaluator = Evaluator::new(&instance);

        let mut assignment = Assignment::for_instance(&instance);
        seat(&mut assignment, 0, &[(0, 0), (1, 1), (2, 3)]);
        assert_eq!(evaluator.score(&assignment).balance, -1);

        // desk X has no zone and is not counted
        let mut assignment = Assignment::for_instance(&instance);
        seat(&mut assignment, 0, &[(0, 0), (1, 4)]);
        assert_eq!(evaluator.score(&assignment).balance, 0);

        assert_eq!(evaluator.score(&Assignment::for_instance(&instance)), Score::default());
    }

    #[test]
    fn test_cohesion_counts_largest_zone_per_group() {
        let instance = fixtures::office();
        let evaluator = Evaluator::new(&instance);
        let mut assignment = Assignment::for_instance(&instance);
        // red: e1, e2 in north, e3 in south -> 2; blue: e4 in south -> 1
        seat(&mut assignment, 0, &[(0, 0), (1, 1), (2, 2), (3, 3)]);
        let score = evaluator.day_score(&assignment, 0);
        assert_eq!(score.cohesion, 3);
        // hits: e1@d1, e2@d1? no (e2 sits on d2), e4@d4? no
        assert_eq!(score.hits, 1);
        // north 2, south 2
        assert_eq!(score.balance, 0);
        assert_eq!(evaluator.day_score(&assignment, 1), Score::default());
    }

    #[test]
    fn test_no_zones_means_zero_cohesion_and_balance() {
        let data = InstanceData::new(["A", "B"], ["D1", "D2"], ["Mon"]).with_group("G", ["A", "B"]);
        let instance = Instance::new(&data).unwrap();
        let mut assignment = Assignment::for_instance(&instance);
        seat(&mut assignment, 0, &[(0, 0), (1, 1)]);
        assert_eq!(Evaluator::new(&instance).score(&assignment), Score::default());
    }

    #[test]
    fn test_exact_weights() {
        let instance = fixtures::office();
        let weights = Weights::exact_for(&instance);
        assert!(weights.is_exact_for(&instance));
        // 3 days * min(8, 6) seats
        assert_eq!(weights.cohesion, 19);
        // cohesion <= 3 days * (3 + 3)
        assert_eq!(weights.hits, 19 * 18 + 18 + 1);
        assert!(Weights::REFERENCE.is_exact_for(&instance));

        let crowded = InstanceData::new(
            (0..200).map(|i| format!("e{i}")),
            (0..200).map(|i| format!("d{i}")),
            ["mon"],
        );
        let crowded = Instance::new(&crowded).unwrap();
        assert!(!Weights::REFERENCE.is_exact_for(&crowded));
    }

    #[test]
    fn test_surrogate_on_large_instance_does_not_overflow() {
        // one team of 6000 over a full year
        let employees: Vec<String> = (0..6000).map(|i| format!("e{i}")).collect();
        let data = InstanceData::new(
            employees.clone(),
            (0..6000).map(|i| format!("d{i}")),
            (0..365).map(|i| format!("day{i}")),
        )
        .with_group("all", employees);
        let instance = Instance::new(&data).unwrap();

        let weights = Weights::exact_for(&instance);
        assert!(weights.is_exact_for(&instance));
        assert_eq!(weights.cohesion, 2_190_001);
        assert_eq!(weights.hits, 2_190_001 * 2_190_000 + 2_190_000 + 1);

        let top = Score::new(6000 * 365, 6000 * 365, 0);
        let expected = 2_190_000i128 * i128::from(weights.hits) + 2_190_000i128 * 2_190_001;
        assert_eq!(top.surrogate(&weights), expected);

        // one unit of balance still separates two otherwise equal scores
        let worse = Score::new(6000 * 365, 6000 * 365, -1);
        assert_eq!(top.surrogate(&weights) - worse.surrogate(&weights), 1);
    }

    #[test]
    fn test_exact_weights_saturate_instead_of_overflowing() {
        let huge = i128::from(i64::MAX);
        let weights = Weights::from_bounds(huge, huge);
        assert_eq!(weights.hits, i64::MAX);
        assert_eq!(weights.cohesion, i64::MAX);
        assert!(!weights.is_exact_within(huge, huge));

        let small = Weights::from_bounds(3, 4);
        assert_eq!(small, Weights { hits: 4 * 4 + 3 + 1, cohesion: 4 });
        assert!(small.is_exact_within(3, 4));
    }
}
