//! Binds the desk domain to the generic search drivers.

use super::{Assignment, Evaluator, Instance, Score, SwapNeighborhood, Weights};
use crate::problem::SearchProblem;
use rand::Rng;

/// Desk assignment as a [`SearchProblem`]: swap moves, lexicographic
/// [`Score`], weighted surrogate as energy.
#[derive(Debug, Clone)]
pub struct DeskProblem<'a> {
    evaluator: Evaluator<'a>,
    neighborhood: SwapNeighborhood,
    weights: Weights,
}

impl<'a> DeskProblem<'a> {
    /// Full-scope swaps and the reference surrogate weights.
    pub fn new(instance: &'a Instance) -> Self {
        Self {
            evaluator: Evaluator::new(instance),
            neighborhood: SwapNeighborhood::full(instance),
            weights: Weights::REFERENCE,
        }
    }

    pub fn with_weights(mut self, weights: Weights) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_neighborhood(mut self, neighborhood: SwapNeighborhood) -> Self {
        self.neighborhood = neighborhood;
        self
    }

    pub fn evaluator(&self) -> &Evaluator<'a> {
        &self.evaluator
    }

    pub fn weights(&self) -> &Weights {
        &self.weights
    }
}

impl SearchProblem for DeskProblem<'_> {
    type Solution = Assignment;
    type Score = Score;

    fn evaluate(&self, assignment: &Assignment) -> Score {
        self.evaluator.score(assignment)
    }

    fn energy(&self, score: &Score) -> f64 {
        score.surrogate(&self.weights) as f64
    }

    fn energy_delta(&self, from: &Score, to: &Score) -> f64 {
        (to.surrogate(&self.weights) - from.surrogate(&self.weights)) as f64
    }

    fn neighbor<R: Rng>(&self, assignment: &Assignment, rng: &mut R) -> Assignment {
        self.neighborhood.neighbor(assignment, rng)
    }

    fn perturb<R: Rng>(&self, assignment: &Assignment, strength: usize, rng: &mut R) -> Assignment {
        let mut next = assignment.clone();
        for _ in 0..strength {
            self.neighborhood.apply_random(&mut next, rng);
        }
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::desk::{build, fixtures, ConstructConfig, InstanceData};
    use crate::ils::{hill_climb, IlsConfig, IlsRunner};
    use crate::sa::{SaConfig, SaRunner};
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn short_sa(seed: u64) -> SaConfig {
        SaConfig::default()
            .with_initial_temperature(50.0)
            .with_final_temperature(1.0)
            .with_alpha(0.8)
            .with_iterations_per_temperature(50)
            .with_seed(seed)
    }

    #[test]
    fn test_split_group_local_search_cannot_beat_one() {
        let instance = fixtures::split_group();
        let problem = DeskProblem::new(&instance);
        let start = build(&instance, &ConstructConfig::default()).unwrap();
        let before = problem.evaluate(&start);
        assert_eq!(before.cohesion, 1);

        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let descent = hill_climb(&problem, start, 200, &mut rng);
        assert_eq!(descent.score.cohesion, 1);
        assert!(descent.score >= before);
    }

    #[test]
    fn test_hill_climb_monotone_on_office() {
        let instance = fixtures::office();
        let problem = DeskProblem::new(&instance);
        let start = build(&instance, &ConstructConfig::default().with_seed(5)).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let descent = hill_climb(&problem, start, 500, &mut rng);
        for window in descent.trajectory.windows(2) {
            assert!(problem.energy(&window[1]) > problem.energy(&window[0]));
        }
        assert!(descent.solution.desks_unique());
    }

    #[test]
    fn test_swaps_reach_preferences() {
        // identity seating: every preference is one swap away
        let data = InstanceData::new(["A", "B", "C"], ["D1", "D2", "D3"], ["Mon", "Tue"])
            .with_preferences("A", ["D3"])
            .with_preferences("B", ["D1"])
            .with_preferences("C", ["D2"]);
        let instance = Instance::new(&data).unwrap();
        let problem = DeskProblem::new(&instance);
        let mut start = Assignment::for_instance(&instance);
        for day in 0..2 {
            for e in 0..3 {
                start.set(day, e, Some(e));
            }
        }
        let result = IlsRunner::run(&problem, start, &IlsConfig::default().with_seed(3)).unwrap();
        assert_eq!(result.best_score.hits, 6);
    }

    #[test]
    fn test_drivers_never_worse_than_start() {
        let instance = fixtures::office();
        let problem = DeskProblem::new(&instance);
        for seed in 0..5 {
            let start = build(&instance, &ConstructConfig::default().with_seed(seed)).unwrap();
            let initial = problem.evaluate(&start);

            let sa = SaRunner::run(&problem, start.clone(), &short_sa(seed)).unwrap();
            assert!(sa.best_score >= initial);
            assert_eq!(problem.evaluate(&sa.best), sa.best_score);
            assert!(sa.best.desks_unique());

            let config = IlsConfig::default()
                .with_max_iterations(5)
                .with_local_search_iterations(100)
                .with_seed(seed);
            let ils = IlsRunner::run(&problem, start, &config).unwrap();
            assert!(ils.best_score >= initial);
            assert_eq!(problem.evaluate(&ils.best), ils.best_score);
            assert!(ils.best.desks_unique());
        }
    }

    #[test]
    fn test_energy_delta_keeps_balance_under_exact_weights() {
        let instance = fixtures::office();
        let problem = DeskProblem::new(&instance).with_weights(Weights {
            hits: i64::MAX / 4,
            cohesion: 1 << 40,
        });
        let from = Score::new(1000, 500, -3);
        let to = Score::new(1000, 500, -2);
        assert_eq!(problem.energy_delta(&from, &to), 1.0);
        assert_eq!(problem.energy_delta(&to, &from), -1.0);
    }

    #[test]
    fn test_perturb_applies_k_swaps() {
        let instance = Instance::new(&fixtures::pair()).unwrap();
        let problem = DeskProblem::new(&instance);
        let mut start = Assignment::for_instance(&instance);
        start.set(0, 0, Some(0));
        start.set(0, 1, Some(1));
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        // with two seated employees every move is the same swap
        assert_ne!(problem.perturb(&start, 1, &mut rng), start);
        assert_eq!(problem.perturb(&start, 2, &mut rng), start);
        assert_eq!(problem.perturb(&start, 0, &mut rng), start);
    }

    fn arb_instance() -> impl Strategy<Value = InstanceData> {
        (1usize..8, 1usize..8, 1usize..4, 1usize..4).prop_flat_map(|(n_emp, n_desk, n_day, n_zone)| {
            let prefs = proptest::collection::vec(proptest::collection::vec(0..n_desk, 0..3), n_emp);
            let zone_of = proptest::collection::vec(0..n_zone + 1, n_desk);
            let group_of = proptest::collection::vec(0..3usize, n_emp);
            let absent = proptest::collection::vec(proptest::collection::vec(any::<bool>(), n_day), n_emp);
            let use_calendar = any::<bool>();
            (prefs, zone_of, group_of, absent, use_calendar).prop_map(
                move |(prefs, zone_of, group_of, absent, use_calendar)| {
                    let employees: Vec<String> = (0..n_emp).map(|i| format!("e{i}")).collect();
                    let desks: Vec<String> = (0..n_desk).map(|i| format!("d{i}")).collect();
                    let days: Vec<String> = (0..n_day).map(|i| format!("day{i}")).collect();
                    let mut data = InstanceData::new(employees.clone(), desks.clone(), days.clone());
                    for (e, list) in prefs.iter().enumerate() {
                        data = data.with_preferences(&employees[e], list.iter().map(|&d| desks[d].clone()));
                    }
                    // zone index n_zone means "no zone"
                    for z in 0..n_zone {
                        let members = (0..n_desk).filter(|&d| zone_of[d] == z).map(|d| desks[d].clone());
                        data = data.with_zone(format!("z{z}"), members);
                    }
                    for g in 0..2 {
                        let members = (0..n_emp).filter(|&e| group_of[e] == g).map(|e| employees[e].clone());
                        data = data.with_group(format!("g{g}"), members);
                    }
                    if use_calendar {
                        for (e, row) in absent.iter().enumerate() {
                            let allowed = row.iter().enumerate().filter(|&(_, &a)| !a).map(|(d, _)| days[d].clone());
                            data = data.with_calendar(&employees[e], allowed);
                        }
                    }
                    data
                },
            )
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(48))]

        #[test]
        fn prop_construction_and_search_keep_invariants(data in arb_instance(), seed in 0u64..1000) {
            let instance = Instance::new(&data).unwrap();
            let problem = DeskProblem::new(&instance);

            let start = build(&instance, &ConstructConfig::default().with_seed(seed)).unwrap();
            prop_assert!(start.desks_unique());
            prop_assert_eq!(start.n_days(), instance.n_days());
            prop_assert_eq!(start.n_employees(), instance.n_employees());
            prop_assert_eq!(&start, &build(&instance, &ConstructConfig::default().with_seed(seed)).unwrap());
            for day in 0..instance.n_days() {
                let present = instance.present(day);
                prop_assert_eq!(start.seated_count(day), present.len().min(instance.n_desks()));
            }

            let initial = problem.evaluate(&start);
            let sa = SaRunner::run(&problem, start.clone(), &short_sa(seed)).unwrap();
            prop_assert!(sa.best.desks_unique());
            prop_assert!(sa.best_score >= initial);

            let config = IlsConfig::default().with_max_iterations(3).with_local_search_iterations(30).with_seed(seed);
            let ils = IlsRunner::run(&problem, start, &config).unwrap();
            prop_assert!(ils.best.desks_unique());
            prop_assert!(ils.best_score >= initial);
        }
    }
}
