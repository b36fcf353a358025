//! Pluggable parent-selection schemes.
//!
//! A scheme turns a scored population and a per-birth-nation parent
//! quota into a candidate pool; pairing into families happens
//! afterwards and is a nation-level policy.

use crate::errors::ConfigurationError;
use crate::individual::PolymerId;
use crate::population::Population;

use rand::rngs::SmallRng;
use rand::seq::index;
use rand::SeedableRng;

use std::collections::BTreeMap;

/// Seed used by [`RandomSelection`], so repeated selection over the
/// same population is reproducible.
const RANDOM_SELECTION_SEED: u64 = 123;

/// Capability for choosing the parent candidate pool.
///
/// `quotas` maps each birth nation represented in the population to the
/// number of candidates wanted from it. A scheme takes at most the
/// quota from each birth-nation subpopulation.
pub trait SelectionScheme {
    fn select(&self, population: &Population, quotas: &BTreeMap<String, usize>) -> Vec<PolymerId>;
}

impl std::fmt::Debug for dyn SelectionScheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("dyn SelectionScheme")
    }
}

/// Takes each birth nation's quota's-worth of highest-fitness members.
#[derive(Debug, Clone, Copy, Default)]
pub struct EliteSelection;

impl SelectionScheme for EliteSelection {
    fn select(&self, population: &Population, quotas: &BTreeMap<String, usize>) -> Vec<PolymerId> {
        let mut candidates = Vec::new();
        for (nation, &quota) in quotas {
            let ranked = population.ranked_ids_of_birth_nation(nation);
            candidates.extend(ranked.into_iter().take(quota));
        }
        candidates
    }
}

/// Takes per-nation uniform samples of the quota size.
///
/// The RNG is re-seeded on every call, so the scheme is deterministic
/// across invocations over identical populations.
#[derive(Debug, Clone, Copy)]
pub struct RandomSelection {
    seed: u64,
}

impl RandomSelection {
    pub fn new(seed: u64) -> RandomSelection {
        RandomSelection { seed }
    }
}

impl Default for RandomSelection {
    fn default() -> RandomSelection {
        RandomSelection::new(RANDOM_SELECTION_SEED)
    }
}

impl SelectionScheme for RandomSelection {
    fn select(&self, population: &Population, quotas: &BTreeMap<String, usize>) -> Vec<PolymerId> {
        let mut rng = SmallRng::seed_from_u64(self.seed);
        let mut candidates = Vec::new();
        for (nation, &quota) in quotas {
            let ids = population.ranked_ids_of_birth_nation(nation);
            let n = quota.min(ids.len());
            candidates.extend(index::sample(&mut rng, ids.len(), n).into_iter().map(|i| ids[i]));
        }
        candidates
    }
}

/// Resolves a scheme by its configured name.
///
/// # Errors
/// Unknown names fail with [`ConfigurationError::UnknownSelectionScheme`].
pub fn scheme_by_name(name: &str) -> Result<Box<dyn SelectionScheme>, ConfigurationError> {
    match name {
        "elite" => Ok(Box::new(EliteSelection)),
        "random" => Ok(Box::<RandomSelection>::default()),
        other => Err(ConfigurationError::UnknownSelectionScheme(other.to_string())),
    }
}
