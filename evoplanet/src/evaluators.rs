//! Interfaces to the domain-specific collaborators the engine drives
//! but does not implement: feature extraction, property prediction,
//! fitness scoring, genome realization and result persistence.

use crate::catalog::{ChromosomeCatalog, ChromosomeId};
use crate::individual::Individual;

use rand::RngCore;

/// Attaches a feature vector ("fingerprint") to individuals.
///
/// Implementations may drop rows that fail to process; every surviving
/// row must carry a value for each returned feature key.
pub trait Fingerprinter {
    fn fingerprint(&self, rows: Vec<Individual>) -> (Vec<Individual>, Vec<String>);
}

/// Attaches predicted property values to fingerprinted individuals.
///
/// Any model state the prediction needs is owned by the implementation
/// itself.
pub trait Predictor {
    fn predict(&self, rows: Vec<Individual>, feature_keys: &[String]) -> Vec<Individual>;
}

/// Scores a population. Must return exactly one fitness value per row,
/// in row order.
pub trait FitnessFunction {
    fn score(&self, rows: &[Individual], feature_keys: &[String]) -> Vec<f64>;
}

/// Realizes a genome into a concrete artifact (e.g. a polymer SMILES
/// string). Returning `None` marks the embryo as non-viable; the engine
/// drops it silently.
pub trait GenerativeFunction {
    fn realize(
        &self,
        genome: &[ChromosomeId],
        catalog: &ChromosomeCatalog,
        rng: &mut dyn RngCore,
    ) -> Option<String>;
}

/// Side-effecting sink for per-tick population records, called once per
/// nation per tick after parents are marked. Failures are the sink's
/// concern, not the engine's.
pub trait CensusSink {
    fn record(&mut self, rows: &[Individual]);
}

/// Lets callers keep a shared handle to a sink installed on a planet,
/// e.g. `Arc<Mutex<EvolutionLogger>>`, and read it back afterwards.
impl<S: CensusSink> CensusSink for std::sync::Arc<std::sync::Mutex<S>> {
    fn record(&mut self, rows: &[Individual]) {
        self.lock().unwrap().record(rows);
    }
}

/// Runs fingerprint + predict over the rows in at most `num_workers`
/// contiguous chunks, evaluated in isolation and concatenated.
///
/// A chunk whose rows are all dropped by the fingerprinter contributes
/// nothing. Concatenation does not promise to restore the input row
/// order; rows carry their own identity. Returned feature keys are the
/// first-seen-ordered union over chunks.
pub(crate) fn fingerprint_and_predict(
    rows: Vec<Individual>,
    num_workers: usize,
    fingerprinter: &dyn Fingerprinter,
    predictor: &dyn Predictor,
) -> (Vec<Individual>, Vec<String>) {
    if rows.is_empty() {
        return (Vec::new(), Vec::new());
    }
    let chunk_size = (rows.len() + num_workers - 1) / num_workers;
    let mut merged = Vec::with_capacity(rows.len());
    let mut merged_keys: Vec<String> = Vec::new();

    let mut rows = rows;
    while !rows.is_empty() {
        let rest = rows.split_off(chunk_size.min(rows.len()));
        let chunk = std::mem::replace(&mut rows, rest);
        let (survivors, keys) = fingerprinter.fingerprint(chunk);
        if survivors.is_empty() {
            continue;
        }
        let predicted = predictor.predict(survivors, &keys);
        merged.extend(predicted);
        for key in keys {
            if !merged_keys.contains(&key) {
                merged_keys.push(key);
            }
        }
    }
    (merged, merged_keys)
}
