use crate::individual::{Individual, PolymerId};

use ahash::RandomState;
use rand::seq::index;
use rand::Rng;
use serde::{Deserialize, Serialize};

use std::collections::HashSet;

/// The individuals currently living in one nation.
///
/// A population is owned by exactly one nation at any instant; migration
/// moves individuals between populations, it never copies them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Population {
    members: Vec<Individual>,
}

impl Population {
    pub fn new(members: Vec<Individual>) -> Population {
        Population { members }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn members(&self) -> &[Individual] {
        &self.members
    }

    pub fn iter(&self) -> impl Iterator<Item = &Individual> {
        self.members.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Individual> {
        self.members.iter_mut()
    }

    pub(crate) fn push(&mut self, individual: Individual) {
        self.members.push(individual);
    }

    pub(crate) fn take_all(&mut self) -> Vec<Individual> {
        std::mem::take(&mut self.members)
    }

    pub(crate) fn replace(&mut self, members: Vec<Individual>) {
        self.members = members;
    }

    /// All member ids ranked by descending fitness. Unscored members
    /// rank last.
    pub(crate) fn ranked_ids(&self) -> Vec<PolymerId> {
        let mut ranked: Vec<&Individual> = self.members.iter().collect();
        ranked.sort_by(|a, b| b.rank_fitness().total_cmp(&a.rank_fitness()));
        ranked.iter().map(|m| m.id).collect()
    }

    /// Ranked ids restricted to members born in `nation`.
    pub(crate) fn ranked_ids_of_birth_nation(&self, nation: &str) -> Vec<PolymerId> {
        let mut ranked: Vec<&Individual> = self
            .members
            .iter()
            .filter(|m| m.birthplace.nation == nation)
            .collect();
        ranked.sort_by(|a, b| b.rank_fitness().total_cmp(&a.rank_fitness()));
        ranked.iter().map(|m| m.id).collect()
    }

    /// `n` member ids drawn uniformly without replacement.
    pub(crate) fn sample_ids(&self, rng: &mut impl Rng, n: usize) -> Vec<PolymerId> {
        let n = n.min(self.members.len());
        index::sample(rng, self.members.len(), n)
            .into_iter()
            .map(|i| self.members[i].id)
            .collect()
    }

    /// Removes and returns the members whose ids are listed, preserving
    /// relative order of the remainder.
    pub(crate) fn drain_ids(&mut self, ids: &HashSet<PolymerId, RandomState>) -> Vec<Individual> {
        let mut drained = Vec::with_capacity(ids.len());
        let mut kept = Vec::with_capacity(self.members.len() - ids.len().min(self.members.len()));
        for member in self.members.drain(..) {
            if ids.contains(&member.id) {
                drained.push(member);
            } else {
                kept.push(member);
            }
        }
        self.members = kept;
        drained
    }

    pub(crate) fn get(&self, id: PolymerId) -> Option<&Individual> {
        self.members.iter().find(|m| m.id == id)
    }

    /// Unique birth nations represented in the population, sorted for
    /// deterministic iteration.
    pub(crate) fn birth_nations(&self) -> Vec<String> {
        let mut nations: Vec<String> = self
            .members
            .iter()
            .map(|m| m.birthplace.nation.clone())
            .collect();
        nations.sort_unstable();
        nations.dedup();
        nations
    }

    pub(crate) fn count_birth_nation(&self, nation: &str) -> usize {
        self.members
            .iter()
            .filter(|m| m.birthplace.nation == nation)
            .count()
    }

    /// Unions every member's feature and property key sets, back-filling
    /// missing columns with zero. Run after immigration so newcomers and
    /// residents stay column-aligned.
    pub(crate) fn align_columns(&mut self) {
        let mut feature_keys: HashSet<String, RandomState> = HashSet::default();
        let mut property_keys: HashSet<String, RandomState> = HashSet::default();
        for member in &self.members {
            feature_keys.extend(member.features.keys().cloned());
            property_keys.extend(member.properties.keys().cloned());
        }
        for member in &mut self.members {
            for key in &feature_keys {
                member.features.entry(key.clone()).or_insert(0.0);
            }
            for key in &property_keys {
                member.properties.entry(key.clone()).or_insert(0.0);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::individual::Location;

    fn testling(id: PolymerId, fitness: f64, birth_nation: &str) -> Individual {
        let home = Location {
            planet: "p".into(),
            land: "l".into(),
            nation: birth_nation.into(),
        };
        let mut individual = Individual::born(id, (0, 0), vec![1, 2], "AB".into(), home, 0);
        individual.fitness = Some(fitness);
        individual
    }

    #[test]
    fn ranking_is_fitness_descending() {
        let population = Population::new(vec![
            testling(1, 0.2, "a"),
            testling(2, 0.9, "a"),
            testling(3, 0.5, "b"),
        ]);
        assert_eq!(population.ranked_ids(), vec![2, 3, 1]);
        assert_eq!(population.ranked_ids_of_birth_nation("a"), vec![2, 1]);
    }

    #[test]
    fn drain_splits_by_id() {
        let mut population = Population::new(vec![
            testling(1, 0.2, "a"),
            testling(2, 0.9, "a"),
            testling(3, 0.5, "a"),
        ]);
        let ids = [1, 3].into_iter().collect();
        let drained = population.drain_ids(&ids);
        assert_eq!(drained.iter().map(|m| m.id).collect::<Vec<_>>(), [1, 3]);
        assert_eq!(population.len(), 1);
        assert_eq!(population.members()[0].id, 2);
    }

    #[test]
    fn alignment_backfills_zero_columns() {
        let mut a = testling(1, 0.2, "a");
        a.features.insert("fp_1".into(), 1.0);
        let mut b = testling(2, 0.9, "b");
        b.features.insert("fp_2".into(), 2.0);
        b.properties.insert("gloss".into(), 0.5);

        let mut population = Population::new(vec![a, b]);
        population.align_columns();
        let members = population.members();
        assert_eq!(members[0].features["fp_2"], 0.0);
        assert_eq!(members[1].features["fp_1"], 0.0);
        assert_eq!(members[0].properties["gloss"], 0.0);
        assert_eq!(members[1].features["fp_2"], 2.0);
    }
}
