//! Greedy constructive assignment.
//!
//! Days are built independently. Present employees are processed one by
//! one (in shuffled order when randomized) and each takes the first
//! non-empty tier of free desks:
//!
//! 1. preferred desks inside the group's target zone,
//! 2. preferred desks anywhere,
//! 3. free desks inside the target zone,
//! 4. any free desk.
//!
//! The target zone is the zone the employee's group has used most so far
//! that day. Preference tiers sample among their first `top_k` entries,
//! desk tiers among the whole pool.

use super::{Assignment, DeskIdx, Instance, ZoneIdx};
use crate::error::ConfigError;
use rand::seq::{IndexedRandom, SliceRandom};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Parameters of the constructive builder.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConstructConfig {
    /// Seed of the builder's private generator.
    pub seed: u64,
    /// Shuffle processing order and sample desks; otherwise always take the
    /// first candidate in instance order.
    pub randomize: bool,
    /// Number of leading preferred desks sampled from.
    pub top_k: usize,
}

impl Default for ConstructConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            randomize: true,
            top_k: 3,
        }
    }
}

impl ConstructConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_randomize(mut self, randomize: bool) -> Self {
        self.randomize = randomize;
        self
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.top_k == 0 {
            return Err(ConfigError::new("construct", "top_k must be at least 1"));
        }
        Ok(())
    }
}

/// Builds an initial assignment.
///
/// The generator is created from `config.seed` for this call only, so equal
/// inputs always produce equal assignments.
pub fn build(instance: &Instance, config: &ConstructConfig) -> Result<Assignment, ConfigError> {
    config.validate()?;
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    Ok(build_with_rng(instance, config.randomize, config.top_k, &mut rng))
}

/// Builds an initial assignment drawing randomness from `rng`.
///
/// `top_k` is clamped to at least 1.
pub fn build_with_rng<R: Rng>(
    instance: &Instance,
    randomize: bool,
    top_k: usize,
    rng: &mut R,
) -> Assignment {
    let topology = instance.topology();
    let top_k = top_k.max(1);
    let mut assignment = Assignment::for_instance(instance);
    let mut used = vec![false; instance.n_desks()];
    // Per group: (zone, members seated there today) in first-use order.
    let mut zone_usage: Vec<Vec<(ZoneIdx, usize)>> = vec![Vec::new(); instance.n_groups()];

    for day in 0..instance.n_days() {
        let mut present = instance.present(day);
        if randomize {
            present.shuffle(rng);
        }
        used.fill(false);
        zone_usage.iter_mut().for_each(Vec::clear);

        for employee in present {
            let group = topology.group_of(employee);
            let target = group.and_then(|g| most_used(&zone_usage[g]));
            let in_target = |desk: DeskIdx| target.is_none_or(|z| topology.zone_of(desk) == Some(z));

            let preferred: Vec<DeskIdx> = instance
                .preferences(employee)
                .iter()
                .copied()
                .filter(|&d| !used[d])
                .collect();
            let preferred_in_target: Vec<DeskIdx> =
                preferred.iter().copied().filter(|&d| in_target(d)).collect();

            let chosen = if !preferred_in_target.is_empty() {
                pick(&preferred_in_target, top_k, randomize, rng)
            } else if !preferred.is_empty() {
                pick(&preferred, top_k, randomize, rng)
            } else {
                let free: Vec<DeskIdx> = (0..instance.n_desks()).filter(|&d| !used[d]).collect();
                let free_in_target: Vec<DeskIdx> =
                    free.iter().copied().filter(|&d| in_target(d)).collect();
                let pool = if free_in_target.is_empty() {
                    free
                } else {
                    free_in_target
                };
                pick(&pool, pool.len(), randomize, rng)
            };

            let Some(desk) = chosen else {
                continue;
            };
            assignment.set(day, employee, Some(desk));
            used[desk] = true;
            if let (Some(g), Some(zone)) = (group, topology.zone_of(desk)) {
                record_use(&mut zone_usage[g], zone);
            }
        }
    }

    assignment
}

/// Most used zone; ties go to the zone used first.
fn most_used(usage: &[(ZoneIdx, usize)]) -> Option<ZoneIdx> {
    let mut best: Option<(ZoneIdx, usize)> = None;
    for &(zone, count) in usage {
        if best.is_none_or(|(_, best_count)| count > best_count) {
            best = Some((zone, count));
        }
    }
    best.map(|(zone, _)| zone)
}

fn record_use(usage: &mut Vec<(ZoneIdx, usize)>, zone: ZoneIdx) {
    match usage.iter_mut().find(|(z, _)| *z == zone) {
        Some((_, count)) => *count += 1,
        None => usage.push((zone, 1)),
    }
}

fn pick<R: Rng>(candidates: &[DeskIdx], limit: usize, randomize: bool, rng: &mut R) -> Option<DeskIdx> {
    let head = &candidates[..limit.min(candidates.len())];
    if randomize {
        head.choose(rng).copied()
    } else {
        head.first().copied()
    }
}
