use crate::catalog::ChromosomeId;

use ahash::RandomState;
use serde::{Deserialize, Serialize};

use std::collections::HashMap;

/// Globally unique identifier of an individual. 0 is reserved to mean
/// "no parent".
pub type PolymerId = u64;

/// Named f64 columns attached to an individual (fingerprint features
/// or predicted properties).
pub type ValueMap = HashMap<String, f64, RandomState>;

/// A place in the planet → land → nation hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub planet: String,
    pub land: String,
    pub nation: String,
}

/// One simulated organism: genome, lineage, location and scores.
///
/// `id` is assigned exactly once by the planet and never reused.
/// `fitness` is `None` until the individual's nation has run a scoring
/// pass over its current generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Individual {
    pub id: PolymerId,
    /// `(0, 0)` for founders.
    pub parents: (PolymerId, PolymerId),
    /// Ordered chromosome ids; never empty.
    pub genome: Vec<ChromosomeId>,
    /// Realized form produced by the generative function.
    pub phenotype: String,
    /// Whether this individual was chosen as a parent during the
    /// selection of the generation that just ended.
    pub is_parent: bool,
    /// Immutable once created.
    pub birthplace: Location,
    /// Updated when the individual migrates.
    pub residence: Location,
    pub generation: u32,
    pub fitness: Option<f64>,
    /// Fingerprint columns.
    pub features: ValueMap,
    /// Property-prediction columns.
    pub properties: ValueMap,
    /// Requested destination nation while queued in the migration
    /// mailbox; `None` means "route me anywhere but home".
    pub destination: Option<String>,
}

impl Individual {
    /// Creates a newborn at `birthplace` with no scores attached.
    pub fn born(
        id: PolymerId,
        parents: (PolymerId, PolymerId),
        genome: Vec<ChromosomeId>,
        phenotype: String,
        birthplace: Location,
        generation: u32,
    ) -> Individual {
        Individual {
            id,
            parents,
            genome,
            phenotype,
            is_parent: false,
            residence: birthplace.clone(),
            birthplace,
            generation,
            fitness: None,
            features: ValueMap::default(),
            properties: ValueMap::default(),
            destination: None,
        }
    }

    /// Fitness for ranking purposes; unscored individuals sort last.
    pub(crate) fn rank_fitness(&self) -> f64 {
        self.fitness.unwrap_or(f64::NEG_INFINITY)
    }
}
