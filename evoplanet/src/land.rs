use crate::catalog::ChromosomeId;
use crate::errors::ConfigurationError;
use crate::evaluators::{FitnessFunction, GenerativeFunction};
use crate::nation::Nation;
use crate::planet::PlanetCtx;

use log::debug;
use serde::{Deserialize, Serialize};

use std::str::FromStr;

/// Where the crossover cut lands in a parent's genome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrossoverPosition {
    /// Gaussian around the genome center, with
    /// [`CrossoverPolicy::sigma_offset`] as standard deviation.
    RelativeCenter,
    /// Exact integer center.
    Center,
    /// Uniform over every valid cut.
    Random,
}

impl FromStr for CrossoverPosition {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "relative_center" => Ok(Self::RelativeCenter),
            "center" => Ok(Self::Center),
            "random" => Ok(Self::Random),
            other => Err(ConfigurationError::UnknownCrossoverPosition(
                other.to_string(),
            )),
        }
    }
}

/// Crossover-cut policy shared by all nations on one land.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CrossoverPolicy {
    pub position: CrossoverPosition,
    /// Standard deviation of the cut from the center, in blocks.
    /// Only used by [`CrossoverPosition::RelativeCenter`].
    pub sigma_offset: f64,
}

/// Mutation policy shared by all nations on one land.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MutationPolicy {
    /// Mean fraction of a genome's blocks mutated per child.
    pub fraction_mutation: f64,
    /// Standard deviation of the mutated-block count.
    pub sigma_offset: f64,
    /// Chance of appending one extra uniformly drawn block.
    pub extra_block_chance: f64,
}

/// Configuration surface for one land. Policy names are plain strings
/// and are validated when the land is built.
///
/// # Examples
/// ```
/// use evoplanet::LandConfig;
///
/// let config = LandConfig {
///     name: "pangaea".into(),
///     crossover_position: "center".into(),
///     ..LandConfig::default()
/// };
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LandConfig {
    pub name: String,
    /// `"relative_center"`, `"center"` or `"random"`.
    pub crossover_position: String,
    pub crossover_sigma_offset: f64,
    pub fraction_mutation: f64,
    pub mutation_sigma_offset: f64,
    pub fraction_mutate_additional_block: f64,
}

impl Default for LandConfig {
    fn default() -> LandConfig {
        LandConfig {
            name: String::new(),
            crossover_position: "relative_center".to_string(),
            crossover_sigma_offset: 0.3,
            fraction_mutation: 0.2,
            mutation_sigma_offset: 0.25,
            fraction_mutate_additional_block: 0.05,
        }
    }
}

/// Environment shared by every nation on the land: genetic policies,
/// the allowed chromosome set, and the land-owned collaborators.
pub(crate) struct LandEnv {
    pub(crate) name: String,
    pub(crate) age: u32,
    pub(crate) crossover: CrossoverPolicy,
    pub(crate) mutation: MutationPolicy,
    pub(crate) chromosomes: Vec<ChromosomeId>,
    pub(crate) generative: Box<dyn GenerativeFunction>,
    pub(crate) fitness: Box<dyn FitnessFunction>,
}

/// A land owns nations and supplies the environment they evolve under.
pub struct Land {
    pub(crate) env: LandEnv,
    pub(crate) nations: Vec<Nation>,
}

impl Land {
    pub(crate) fn new(
        config: LandConfig,
        chromosomes: Vec<ChromosomeId>,
        generative: Box<dyn GenerativeFunction>,
        fitness: Box<dyn FitnessFunction>,
    ) -> Result<Land, ConfigurationError> {
        let position = config.crossover_position.parse()?;
        for sigma in [config.crossover_sigma_offset, config.mutation_sigma_offset] {
            if !sigma.is_finite() || sigma < 0.0 {
                return Err(ConfigurationError::NonFiniteSigma(sigma));
            }
        }
        Ok(Land {
            env: LandEnv {
                name: config.name,
                age: 0,
                crossover: CrossoverPolicy {
                    position,
                    sigma_offset: config.crossover_sigma_offset,
                },
                mutation: MutationPolicy {
                    fraction_mutation: config.fraction_mutation,
                    sigma_offset: config.mutation_sigma_offset,
                    extra_block_chance: config.fraction_mutate_additional_block,
                },
                chromosomes,
                generative,
                fitness,
            },
            nations: Vec::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.env.name
    }

    pub fn age(&self) -> u32 {
        self.env.age
    }

    pub fn nations(&self) -> &[Nation] {
        &self.nations
    }

    pub fn num_nations(&self) -> usize {
        self.nations.len()
    }

    /// Phase S over every nation on the land.
    pub(crate) fn score_and_emigrate(&mut self, ctx: &mut PlanetCtx, total_nations: usize) {
        let env = &self.env;
        for nation in &mut self.nations {
            nation.score_and_emigrate(env, ctx, total_nations);
        }
    }

    /// Phase P over every nation on the land.
    pub(crate) fn propagate_nations(&mut self, ctx: &mut PlanetCtx) {
        debug!("age of land {} is {}", self.env.name, self.env.age);
        self.env.age += 1;
        let env = &self.env;
        for nation in &mut self.nations {
            nation.propagate(env, ctx);
        }
    }
}
