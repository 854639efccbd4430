//! Core trait shared by the search drivers.

use rand::Rng;
use std::fmt::Debug;

/// Defines a maximization problem for [`SaRunner`](crate::sa::SaRunner)
/// and [`IlsRunner`](crate::ils::IlsRunner).
///
/// The problem supplies a neighborhood and an evaluation. Scores are
/// compared with their [`Ord`] implementation (higher is better), so a
/// lexicographic objective is honoured exactly. The scalar
/// [`energy`](SearchProblem::energy) is only consulted for the magnitude of
/// a worsening move, i.e. the Metropolis acceptance probability.
///
/// # Examples
///
/// ```
/// use desk_assign::problem::SearchProblem;
/// use rand::Rng;
///
/// struct CountOnes { n: usize }
///
/// impl SearchProblem for CountOnes {
///     type Solution = Vec<bool>;
///     type Score = usize;
///
///     fn evaluate(&self, bits: &Vec<bool>) -> usize {
///         bits.iter().filter(|&&b| b).count()
///     }
///
///     fn energy(&self, score: &usize) -> f64 {
///         *score as f64
///     }
///
///     fn neighbor<R: Rng>(&self, bits: &Vec<bool>, rng: &mut R) -> Vec<bool> {
///         let mut new = bits.clone();
///         let i = rng.random_range(0..self.n);
///         new[i] = !new[i];
///         new
///     }
/// }
/// ```
pub trait SearchProblem: Send + Sync {
    /// The solution representation type.
    type Solution: Clone + Send;

    /// The objective value. Higher is better.
    type Score: Ord + Copy + Send + Debug;

    /// Scores a solution.
    fn evaluate(&self, solution: &Self::Solution) -> Self::Score;

    /// Scalar surrogate of a score, higher is better.
    fn energy(&self, score: &Self::Score) -> f64;

    /// Surrogate change when moving from `from` to `to`.
    ///
    /// Override when the surrogate is large enough that subtracting two
    /// `f64` energies loses the low-order components.
    fn energy_delta(&self, from: &Self::Score, to: &Self::Score) -> f64 {
        self.energy(to) - self.energy(from)
    }

    /// Returns a neighbor of `solution`. The input is left untouched.
    ///
    /// A neighbor equal to its input is allowed; callers tolerate no-op
    /// moves.
    fn neighbor<R: Rng>(&self, solution: &Self::Solution, rng: &mut R) -> Self::Solution;

    /// Applies `strength` consecutive neighbor moves unconditionally.
    fn perturb<R: Rng>(
        &self,
        solution: &Self::Solution,
        strength: usize,
        rng: &mut R,
    ) -> Self::Solution {
        let mut current = solution.clone();
        for _ in 0..strength {
            current = self.neighbor(&current, rng);
        }
        current
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Small problems used by the driver tests.

    use super::SearchProblem;
    use rand::Rng;
    use std::sync::Mutex;

    /// Integer line with a single peak at `target`; score is `-|x - target|`.
    pub struct Peak {
        pub target: i64,
    }

    impl SearchProblem for Peak {
        type Solution = i64;
        type Score = i64;

        fn evaluate(&self, &x: &i64) -> i64 {
            -(x - self.target).abs()
        }

        fn energy(&self, score: &i64) -> f64 {
            *score as f64
        }

        fn neighbor<R: Rng>(&self, &x: &i64, rng: &mut R) -> i64 {
            if rng.random_bool(0.5) {
                x + 1
            } else {
                x - 1
            }
        }
    }

    /// Lexicographic pair objective: first maximize `a`, then `b`.
    pub struct LexPair;

    impl SearchProblem for LexPair {
        type Solution = (i64, i64);
        type Score = (i64, i64);

        fn evaluate(&self, &(a, b): &(i64, i64)) -> (i64, i64) {
            (-(a - 3).abs(), -(b + 2).abs())
        }

        fn energy(&self, &(a, b): &(i64, i64)) -> f64 {
            a as f64 * 1000.0 + b as f64
        }

        fn neighbor<R: Rng>(&self, &(a, b): &(i64, i64), rng: &mut R) -> (i64, i64) {
            let step = if rng.random_bool(0.5) { 1 } else { -1 };
            if rng.random_bool(0.5) {
                (a + step, b)
            } else {
                (a, b + step)
            }
        }
    }

    /// Every solution scores the same; neighbors count upwards.
    pub struct Plateau;

    impl SearchProblem for Plateau {
        type Solution = i64;
        type Score = i64;

        fn evaluate(&self, _: &i64) -> i64 {
            0
        }

        fn energy(&self, score: &i64) -> f64 {
            *score as f64
        }

        fn neighbor<R: Rng>(&self, &x: &i64, _rng: &mut R) -> i64 {
            x + 1
        }
    }

    /// Score is the value itself. Neighbors never move, so every descent
    /// stops where it starts, and each perturbation steps one down. The
    /// input of every perturbation is recorded.
    #[derive(Default)]
    pub struct Staircase {
        pub perturbed_from: Mutex<Vec<i64>>,
    }

    impl SearchProblem for Staircase {
        type Solution = i64;
        type Score = i64;

        fn evaluate(&self, &x: &i64) -> i64 {
            x
        }

        fn energy(&self, score: &i64) -> f64 {
            *score as f64
        }

        fn neighbor<R: Rng>(&self, &x: &i64, _rng: &mut R) -> i64 {
            x
        }

        fn perturb<R: Rng>(&self, &x: &i64, strength: usize, _rng: &mut R) -> i64 {
            if let Ok(mut log) = self.perturbed_from.lock() {
                log.push(x);
            }
            x - strength as i64
        }
    }
}
