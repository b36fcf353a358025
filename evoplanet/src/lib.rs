//! A hierarchical genetic-algorithm engine for evolving chain-assembled
//! artifacts such as polymers.
//!
//! A [`Planet`] owns lands, and each [`Land`] hosts nations whose
//! populations evolve under the land's crossover and mutation policies.
//! The domain itself stays outside the engine: fingerprinting, property
//! prediction, fitness scoring and genome realization are supplied as
//! trait objects ([`Fingerprinter`], [`Predictor`], [`FitnessFunction`],
//! [`GenerativeFunction`]), so the same machinery evolves whatever the
//! collaborators describe. Nations exchange individuals through
//! planet-level migration, and an optional [`CensusSink`] records every
//! generation.
//!
//! Runs are deterministic for a fixed seed and fixed collaborators.
//!
//! # Example usage: evolving toy block-chains toward a target length
//! ```no_run
//! use evoplanet::{
//!     ChromosomeBlock, ChromosomeCatalog, Fingerprinter, FitnessFunction,
//!     GenerativeFunction, Individual, LandConfig, NationConfig, Planet,
//!     PlanetConfig, Predictor,
//! };
//!
//! struct BlockCounter;
//!
//! impl Fingerprinter for BlockCounter {
//!     fn fingerprint(&self, mut rows: Vec<Individual>) -> (Vec<Individual>, Vec<String>) {
//!         for row in &mut rows {
//!             row.features.insert("blocks".into(), row.genome.len() as f64);
//!         }
//!         (rows, vec!["blocks".into()])
//!     }
//! }
//!
//! struct NoModel;
//!
//! impl Predictor for NoModel {
//!     fn predict(&self, rows: Vec<Individual>, _: &[String]) -> Vec<Individual> {
//!         rows
//!     }
//! }
//!
//! struct TargetLength(f64);
//!
//! impl FitnessFunction for TargetLength {
//!     fn score(&self, rows: &[Individual], _: &[String]) -> Vec<f64> {
//!         rows.iter()
//!             .map(|r| -(r.features["blocks"] - self.0).abs())
//!             .collect()
//!     }
//! }
//!
//! struct Concatenate;
//!
//! impl GenerativeFunction for Concatenate {
//!     fn realize(
//!         &self,
//!         genome: &[u32],
//!         catalog: &ChromosomeCatalog,
//!         _: &mut dyn rand::RngCore,
//!     ) -> Option<String> {
//!         genome
//!             .iter()
//!             .map(|&id| catalog.get(id).map(String::from))
//!             .collect()
//!     }
//! }
//!
//! fn main() -> Result<(), evoplanet::EvolutionError> {
//!     let catalog = ChromosomeCatalog::from_blocks([
//!         ChromosomeBlock { id: 1, payload: "A".into(), connections: 2 },
//!         ChromosomeBlock { id: 2, payload: "B".into(), connections: 2 },
//!         ChromosomeBlock { id: 3, payload: "C".into(), connections: 3 },
//!     ]);
//!
//!     let mut planet = Planet::new(
//!         PlanetConfig { name: "terra".into(), random_seed: 42, num_workers: 2 },
//!         catalog,
//!         Box::new(BlockCounter),
//!         Box::new(NoModel),
//!     )?;
//!
//!     let land = planet.add_land(
//!         LandConfig { name: "pangaea".into(), ..LandConfig::default() },
//!         Box::new(Concatenate),
//!         Box::new(TargetLength(12.0)),
//!     )?;
//!     for name in ["arcadia", "boreas"] {
//!         planet.found_nation(
//!             land,
//!             NationConfig { name: name.into(), ..NationConfig::default() },
//!         )?;
//!     }
//!
//!     for _ in 0..30 {
//!         planet.advance_tick()?;
//!     }
//!     Ok(())
//! }
//! ```

pub mod logging;

mod catalog;
mod errors;
mod evaluators;
mod individual;
mod land;
mod nation;
mod planet;
mod population;
mod selection;

pub use catalog::{ChromosomeBlock, ChromosomeCatalog, ChromosomeId};
pub use errors::{ConfigurationError, EvolutionError, ResourceError, RoutingError};
pub use evaluators::{CensusSink, Fingerprinter, FitnessFunction, GenerativeFunction, Predictor};
pub use individual::{Individual, Location, PolymerId, ValueMap};
pub use land::{CrossoverPolicy, CrossoverPosition, Land, LandConfig, MutationPolicy};
pub use nation::{Nation, NationConfig};
pub use planet::{LandId, Planet, PlanetConfig};
pub use population::Population;
pub use selection::{scheme_by_name, EliteSelection, RandomSelection, SelectionScheme};
