//! Pairing of parent candidates into families.

use crate::individual::{Individual, PolymerId, ValueMap};
use crate::nation::PartnerSelection;
use crate::population::Population;

use rand::seq::index;
use rand::Rng;

/// Similarity threshold above which two candidates are considered too
/// alike to pair under diversity-driven mating.
const SIMILARITY_CUTOFF: f64 = 0.5;

/// Tanimoto similarity over two feature vectors.
///
/// Returns `None` when the denominator is zero, i.e. no comparison is
/// possible; callers skip such pairs.
pub(crate) fn tanimoto(x: &ValueMap, y: &ValueMap, keys: &[String]) -> Option<f64> {
    let (mut xy, mut xx, mut yy) = (0.0, 0.0, 0.0);
    for key in keys {
        let a = x.get(key).copied().unwrap_or(0.0);
        let b = y.get(key).copied().unwrap_or(0.0);
        xy += a * b;
        xx += a * a;
        yy += b * b;
    }
    let denominator = xx + yy - xy;
    if denominator == 0.0 {
        None
    } else {
        Some(xy / denominator)
    }
}

/// Groups the candidate pool into families of `parents_per_family`.
///
/// Candidates that end up alone are discarded: an individual that
/// cannot find a mate does not reproduce.
pub(crate) fn pair_families(
    population: &Population,
    candidates: &[PolymerId],
    policy: PartnerSelection,
    parents_per_family: usize,
    feature_keys: &[String],
    rng: &mut impl Rng,
) -> Vec<Vec<PolymerId>> {
    match policy {
        PartnerSelection::Diversity => {
            diversity_pairing(population, candidates, parents_per_family, feature_keys)
        }
        PartnerSelection::Random => random_pairing(candidates, parents_per_family, rng),
    }
}

/// Fitness-descending greedy pairing: each leader takes the
/// dissimilar candidates it meets first, topping up with the least
/// similar of the rest when too few qualify.
fn diversity_pairing(
    population: &Population,
    candidates: &[PolymerId],
    parents_per_family: usize,
    feature_keys: &[String],
) -> Vec<Vec<PolymerId>> {
    let mut pool: Vec<&Individual> = candidates
        .iter()
        .filter_map(|id| population.get(*id))
        .collect();
    pool.sort_by(|a, b| b.rank_fitness().total_cmp(&a.rank_fitness()));

    let mut families = Vec::new();
    while let Some(leader) = pool.first() {
        let mut family = vec![leader.id];
        let mut too_similar: Vec<(PolymerId, f64)> = Vec::new();
        for other in &pool[1..] {
            let score = match tanimoto(&leader.features, &other.features, feature_keys) {
                Some(score) => score,
                None => continue,
            };
            if score < SIMILARITY_CUTOFF {
                family.push(other.id);
                if family.len() == parents_per_family {
                    break;
                }
            } else {
                too_similar.push((other.id, score));
            }
        }
        // Top up with the least similar leftovers, first-seen wins ties.
        while family.len() < parents_per_family && !too_similar.is_empty() {
            let mut least = 0;
            for (i, (_, score)) in too_similar.iter().enumerate().skip(1) {
                if *score < too_similar[least].1 {
                    least = i;
                }
            }
            family.push(too_similar.remove(least).0);
        }
        pool.retain(|member| !family.contains(&member.id));
        if family.len() > 1 {
            families.push(family);
        }
    }
    families
}

fn random_pairing(
    candidates: &[PolymerId],
    parents_per_family: usize,
    rng: &mut impl Rng,
) -> Vec<Vec<PolymerId>> {
    let mut pool: Vec<PolymerId> = candidates.to_vec();
    let mut families = Vec::new();
    while !pool.is_empty() {
        let family: Vec<PolymerId> = if pool.len() < parents_per_family {
            pool.drain(..).collect()
        } else {
            let mut chosen = index::sample(rng, pool.len(), parents_per_family).into_vec();
            chosen.sort_unstable_by(|a, b| b.cmp(a));
            chosen.into_iter().map(|i| pool.swap_remove(i)).collect()
        };
        if family.len() > 1 {
            families.push(family);
        }
    }
    families
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::individual::Location;

    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn keys() -> Vec<String> {
        vec!["a".to_string(), "b".to_string()]
    }

    fn candidate(id: PolymerId, fitness: f64, features: [f64; 2]) -> Individual {
        let home = Location {
            planet: "p".into(),
            land: "l".into(),
            nation: "n".into(),
        };
        let mut individual = Individual::born(id, (0, 0), vec![1], "A".into(), home, 0);
        individual.fitness = Some(fitness);
        individual.features.insert("a".into(), features[0]);
        individual.features.insert("b".into(), features[1]);
        individual
    }

    #[test]
    fn identical_vectors_have_similarity_one() {
        let x = candidate(1, 0.0, [1.0, 2.0]);
        assert_eq!(tanimoto(&x.features, &x.features, &keys()), Some(1.0));
    }

    #[test]
    fn zero_vectors_are_incomparable() {
        let x = candidate(1, 0.0, [0.0, 0.0]);
        let y = candidate(2, 0.0, [0.0, 0.0]);
        assert_eq!(tanimoto(&x.features, &y.features, &keys()), None);
    }

    #[test]
    fn diversity_pairs_dissimilar_candidates_first() {
        // 1 and 3 are orthogonal (similarity 0); 1 and 2 are identical.
        let population = Population::new(vec![
            candidate(1, 0.9, [1.0, 0.0]),
            candidate(2, 0.8, [1.0, 0.0]),
            candidate(3, 0.7, [0.0, 1.0]),
            candidate(4, 0.6, [0.0, 1.0]),
        ]);
        let mut rng = SmallRng::seed_from_u64(1);
        let families = pair_families(
            &population,
            &[1, 2, 3, 4],
            PartnerSelection::Diversity,
            2,
            &keys(),
            &mut rng,
        );
        assert_eq!(families, vec![vec![1, 3], vec![2, 4]]);
    }

    #[test]
    fn diversity_tops_up_from_the_least_similar() {
        // Everyone is similar to the leader; the least similar of the
        // rest must complete the family.
        let population = Population::new(vec![
            candidate(1, 0.9, [1.0, 0.0]),
            candidate(2, 0.8, [1.0, 0.1]),
            candidate(3, 0.7, [1.0, 0.4]),
        ]);
        let mut rng = SmallRng::seed_from_u64(1);
        let families = pair_families(
            &population,
            &[1, 2, 3],
            PartnerSelection::Diversity,
            2,
            &keys(),
            &mut rng,
        );
        // 3 is less similar to 1 than 2 is.
        assert_eq!(families[0], vec![1, 3]);
    }

    #[test]
    fn lone_candidates_are_discarded() {
        let population = Population::new(vec![
            candidate(1, 0.9, [1.0, 0.0]),
            candidate(2, 0.8, [0.0, 1.0]),
            candidate(3, 0.7, [0.5, 0.5]),
        ]);
        let mut rng = SmallRng::seed_from_u64(5);
        let families = pair_families(
            &population,
            &[1, 2, 3],
            PartnerSelection::Random,
            2,
            &keys(),
            &mut rng,
        );
        // Three candidates, two-parent families: one family, one death.
        assert_eq!(families.len(), 1);
        assert_eq!(families[0].len(), 2);
    }
}
