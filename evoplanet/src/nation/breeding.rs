//! Crossover and mutation of child genomes.

use crate::catalog::ChromosomeId;
use crate::individual::PolymerId;
use crate::land::{CrossoverPolicy, CrossoverPosition, MutationPolicy};
use crate::population::Population;

use rand::seq::index;
use rand::Rng;
use rand_distr::StandardNormal;

/// How many consecutive duplicate children at one walk position are
/// tolerated before a duplicate is accepted anyway.
const MAX_DUPLICATE_ATTEMPTS: u32 = 5;

/// Computes the cut position for one parent genome.
///
/// The cut is clamped so both halves keep at least one block, except
/// for single-block genomes where the left half is necessarily empty.
pub(crate) fn cut_position(policy: &CrossoverPolicy, len: usize, rng: &mut impl Rng) -> usize {
    let mut pos: i64 = match policy.position {
        CrossoverPosition::Center => (len / 2) as i64,
        CrossoverPosition::RelativeCenter => {
            let center = (len / 2) as f64;
            let draw: f64 = rng.sample::<f64, _>(StandardNormal) * policy.sigma_offset + center;
            draw.round() as i64
        }
        CrossoverPosition::Random => {
            if len > 1 {
                rng.gen_range(1..len) as i64
            } else {
                0
            }
        }
    };
    if pos < 1 {
        pos = 1;
    }
    if pos >= len as i64 {
        pos = len as i64 - 1;
    }
    pos.max(0) as usize
}

fn random_half(genome: &[ChromosomeId], cut: usize, rng: &mut impl Rng) -> Vec<ChromosomeId> {
    if rng.gen_bool(0.5) {
        genome[..cut].to_vec()
    } else {
        genome[cut..].to_vec()
    }
}

/// Mates every family and returns the child genomes alongside the
/// `(parent_a, parent_b)` id pair that produced each one.
///
/// Parent pairs are walked round-robin — `(0,1), (0,2), …, (1,2), …` —
/// cycling until `children_per_family` children exist per family. Each
/// child takes one random half from each parent of the pair. Duplicate
/// siblings are rejected unless the requested brood exceeds four times
/// the distinct-pair capacity, or one walk position has produced
/// [`MAX_DUPLICATE_ATTEMPTS`] duplicates in a row.
pub(crate) fn crossover_families(
    population: &Population,
    families: &[Vec<PolymerId>],
    policy: &CrossoverPolicy,
    children_per_family: usize,
    rng: &mut impl Rng,
) -> (Vec<Vec<ChromosomeId>>, Vec<(PolymerId, PolymerId)>) {
    let mut all_genomes = Vec::new();
    let mut all_parents = Vec::new();
    for family in families {
        let parents: Vec<_> = family
            .iter()
            .filter_map(|id| population.get(*id))
            .collect();
        let k = parents.len();
        if k < 2 || children_per_family == 0 {
            continue;
        }
        let pair_capacity = k * (k - 1) / 2;
        let cuts: Vec<usize> = parents
            .iter()
            .map(|p| cut_position(policy, p.genome.len(), rng))
            .collect();

        let mut brood: Vec<Vec<ChromosomeId>> = Vec::with_capacity(children_per_family);
        let mut brood_parents = Vec::with_capacity(children_per_family);
        let (mut a, mut b) = (0usize, 0usize);
        let mut duplicate_streak = 0;
        while brood.len() < children_per_family {
            b += 1;
            if b == k {
                a += 1;
                b = a + 1;
            }
            if a == k - 1 {
                a = 0;
                b = 1;
            }
            let mut child = random_half(&parents[a].genome, cuts[a], rng);
            child.extend(random_half(&parents[b].genome, cuts[b], rng));
            let pair = (parents[a].id, parents[b].id);

            if children_per_family > pair_capacity * 4
                || duplicate_streak >= MAX_DUPLICATE_ATTEMPTS
            {
                brood.push(child);
                brood_parents.push(pair);
            } else if !brood.contains(&child) {
                brood.push(child);
                brood_parents.push(pair);
                duplicate_streak = 0;
            } else {
                duplicate_streak += 1;
            }
        }
        all_genomes.extend(brood);
        all_parents.extend(brood_parents);
    }
    (all_genomes, all_parents)
}

/// Mutates a child genome in place.
///
/// The mutated-block count is a Gaussian draw around
/// `len * fraction_mutation`, clamped to `[0, len]`; mutation replaces
/// blocks, never removes them, so genomes never shrink. Independently,
/// one extra uniformly drawn block may be appended.
pub(crate) fn mutate(
    genome: &mut Vec<ChromosomeId>,
    policy: &MutationPolicy,
    chromosomes: &[ChromosomeId],
    rng: &mut impl Rng,
) {
    let len = genome.len();
    let mean = len as f64 * policy.fraction_mutation;
    let draw: f64 = rng.sample::<f64, _>(StandardNormal) * policy.sigma_offset + mean;
    let count = (draw.round() as i64).clamp(0, len as i64) as usize;
    if count > 0 {
        for slot in index::sample(rng, len, count) {
            genome[slot] = chromosomes[rng.gen_range(0..chromosomes.len())];
        }
    }
    if rng.gen::<f64>() < policy.extra_block_chance {
        genome.push(chromosomes[rng.gen_range(0..chromosomes.len())]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::individual::{Individual, Location};

    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn parent(id: PolymerId, genome: Vec<ChromosomeId>) -> Individual {
        let home = Location {
            planet: "p".into(),
            land: "l".into(),
            nation: "n".into(),
        };
        let mut individual = Individual::born(id, (0, 0), genome, "X".into(), home, 0);
        individual.fitness = Some(1.0);
        individual
    }

    fn center_policy() -> CrossoverPolicy {
        CrossoverPolicy {
            position: CrossoverPosition::Center,
            sigma_offset: 0.0,
        }
    }

    #[test]
    fn center_cut_of_length_four_is_two() {
        let mut rng = SmallRng::seed_from_u64(7);
        assert_eq!(cut_position(&center_policy(), 4, &mut rng), 2);
    }

    #[test]
    fn cuts_leave_both_halves_non_empty() {
        let mut rng = SmallRng::seed_from_u64(7);
        for policy in [
            center_policy(),
            CrossoverPolicy {
                position: CrossoverPosition::Random,
                sigma_offset: 0.0,
            },
            CrossoverPolicy {
                position: CrossoverPosition::RelativeCenter,
                sigma_offset: 2.5,
            },
        ] {
            for len in 2..10 {
                for _ in 0..50 {
                    let cut = cut_position(&policy, len, &mut rng);
                    assert!(cut >= 1 && cut < len, "cut {} for length {}", cut, len);
                }
            }
        }
    }

    #[test]
    fn children_concatenate_one_half_per_parent() {
        let population = Population::new(vec![
            parent(1, vec![10, 11, 12, 13]),
            parent(2, vec![20, 21, 22, 23]),
        ]);
        let mut rng = SmallRng::seed_from_u64(99);
        let (genomes, parent_pairs) = crossover_families(
            &population,
            &[vec![1, 2]],
            &center_policy(),
            3,
            &mut rng,
        );
        assert_eq!(genomes.len(), 3);
        assert_eq!(parent_pairs, vec![(1, 2); 3]);
        for genome in &genomes {
            // Center cuts of length-4 genomes give halves of size 2,
            // so every child has 4 blocks, 2 from each parent.
            assert_eq!(genome.len(), 4);
            assert_eq!(genome.iter().filter(|id| **id < 20).count(), 2);
        }
    }

    #[test]
    fn families_of_one_produce_no_children() {
        let population = Population::new(vec![parent(1, vec![10, 11])]);
        let mut rng = SmallRng::seed_from_u64(3);
        let (genomes, _) =
            crossover_families(&population, &[vec![1]], &center_policy(), 4, &mut rng);
        assert!(genomes.is_empty());
    }

    #[test]
    fn duplicate_fallback_still_fills_the_brood() {
        // Identical two-block parents can only ever produce a handful
        // of distinct children; the brood must still reach full size.
        let population = Population::new(vec![
            parent(1, vec![5, 5]),
            parent(2, vec![5, 5]),
        ]);
        let mut rng = SmallRng::seed_from_u64(11);
        let (genomes, _) =
            crossover_families(&population, &[vec![1, 2]], &center_policy(), 6, &mut rng);
        assert_eq!(genomes.len(), 6);
    }

    #[test]
    fn mutation_never_shrinks_a_genome() {
        let policy = MutationPolicy {
            fraction_mutation: 0.5,
            sigma_offset: 1.0,
            extra_block_chance: 0.0,
        };
        let chromosomes = [1, 2, 3, 4];
        let mut rng = SmallRng::seed_from_u64(13);
        for _ in 0..200 {
            let mut genome = vec![9, 9, 9];
            mutate(&mut genome, &policy, &chromosomes, &mut rng);
            assert_eq!(genome.len(), 3);
            assert!(genome.iter().all(|id| chromosomes.contains(id) || *id == 9));
        }
    }

    #[test]
    fn certain_extra_block_grows_by_exactly_one() {
        let policy = MutationPolicy {
            fraction_mutation: 0.0,
            sigma_offset: 0.0,
            extra_block_chance: 1.0,
        };
        let chromosomes = [1, 2, 3];
        let mut rng = SmallRng::seed_from_u64(17);
        let mut genome = vec![1];
        mutate(&mut genome, &policy, &chromosomes, &mut rng);
        assert_eq!(genome.len(), 2);
    }
}
