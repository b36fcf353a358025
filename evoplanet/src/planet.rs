use crate::catalog::ChromosomeCatalog;
use crate::errors::{EvolutionError, ResourceError, RoutingError};
use crate::evaluators::{CensusSink, Fingerprinter, FitnessFunction, GenerativeFunction, Predictor};
use crate::individual::{Individual, Location, PolymerId};
use crate::land::{Land, LandConfig};
use crate::nation::{Nation, NationConfig};

use log::{debug, info};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Global configuration of a planet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanetConfig {
    pub name: String,
    /// Seed for the planet RNG; 0 means seed from entropy.
    pub random_seed: u64,
    /// Number of chunks the fingerprint + predict pass is split into.
    /// Must be at least 1.
    pub num_workers: usize,
}

impl Default for PlanetConfig {
    fn default() -> PlanetConfig {
        PlanetConfig {
            name: String::new(),
            random_seed: 0,
            num_workers: 1,
        }
    }
}

/// Handle to a land on a planet, returned by [`Planet::add_land`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LandId(pub(crate) usize);

/// Shared planet-level state threaded through every phase: the citizen
/// counter, the RNG, the migration mailbox and the planet-owned
/// collaborators. Explicit context passing keeps runs deterministic
/// under a fixed seed.
pub(crate) struct PlanetCtx {
    pub(crate) name: String,
    pub(crate) num_workers: usize,
    pub(crate) rng: SmallRng,
    /// Emigrants in transit between Phase S and Phase P of one tick.
    pub(crate) mailbox: Vec<Individual>,
    pub(crate) catalog: ChromosomeCatalog,
    pub(crate) fingerprinter: Box<dyn Fingerprinter>,
    pub(crate) predictor: Box<dyn Predictor>,
    pub(crate) census: Option<Box<dyn CensusSink>>,
    citizens: u64,
}

impl PlanetCtx {
    pub(crate) fn new(
        name: String,
        num_workers: usize,
        rng: SmallRng,
        catalog: ChromosomeCatalog,
        fingerprinter: Box<dyn Fingerprinter>,
        predictor: Box<dyn Predictor>,
    ) -> PlanetCtx {
        PlanetCtx {
            name,
            num_workers,
            rng,
            mailbox: Vec::new(),
            catalog,
            fingerprinter,
            predictor,
            census: None,
            citizens: 0,
        }
    }

    /// Hands out the next citizen id. Strictly increasing, never
    /// reused; 0 stays reserved for "no parent".
    pub(crate) fn next_id(&mut self) -> PolymerId {
        self.citizens += 1;
        self.citizens
    }

    /// Moves the allocator past externally assigned ids, so seeded
    /// populations cannot collide with freshly born individuals.
    pub(crate) fn reserve_ids(&mut self, up_to: PolymerId) {
        self.citizens = self.citizens.max(up_to);
    }

    #[cfg(test)]
    pub(crate) fn peek_citizens(&self) -> u64 {
        self.citizens
    }
}

/// The top of the hierarchy: owns lands, the id allocator, the RNG and
/// the cross-nation migration mailbox, and drives the tick loop.
///
/// # Examples
/// ```no_run
/// use evoplanet::{Planet, PlanetConfig, ChromosomeCatalog, LandConfig, NationConfig};
/// # use evoplanet::{Fingerprinter, Predictor, FitnessFunction, GenerativeFunction, Individual};
/// # struct Fp; struct Pr; struct Fit; struct Gen;
/// # impl Fingerprinter for Fp {
/// #     fn fingerprint(&self, rows: Vec<Individual>) -> (Vec<Individual>, Vec<String>) { (rows, vec![]) }
/// # }
/// # impl Predictor for Pr {
/// #     fn predict(&self, rows: Vec<Individual>, _: &[String]) -> Vec<Individual> { rows }
/// # }
/// # impl FitnessFunction for Fit {
/// #     fn score(&self, rows: &[Individual], _: &[String]) -> Vec<f64> { vec![1.0; rows.len()] }
/// # }
/// # impl GenerativeFunction for Gen {
/// #     fn realize(
/// #         &self,
/// #         genome: &[u32],
/// #         _: &ChromosomeCatalog,
/// #         _: &mut dyn rand::RngCore,
/// #     ) -> Option<String> { Some(format!("{:?}", genome)) }
/// # }
/// # let catalog = ChromosomeCatalog::from_blocks(std::iter::empty());
///
/// let mut planet = Planet::new(
///     PlanetConfig { name: "terra".into(), random_seed: 42, ..PlanetConfig::default() },
///     catalog,
///     Box::new(Fp),
///     Box::new(Pr),
/// )?;
/// let land = planet.add_land(LandConfig::default(), Box::new(Gen), Box::new(Fit))?;
/// planet.found_nation(land, NationConfig { name: "arcadia".into(), ..NationConfig::default() })?;
///
/// for _ in 0..10 {
///     planet.advance_tick()?;
/// }
/// # Ok::<(), evoplanet::EvolutionError>(())
/// ```
pub struct Planet {
    ctx: PlanetCtx,
    lands: Vec<Land>,
    age: u32,
}

impl std::fmt::Debug for Planet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Planet")
            .field("age", &self.age)
            .finish_non_exhaustive()
    }
}

impl Planet {
    /// Creates a planet with no lands.
    ///
    /// # Errors
    /// Fails with [`ResourceError::NoWorkers`] when the configured
    /// worker count is below 1.
    pub fn new(
        config: PlanetConfig,
        catalog: ChromosomeCatalog,
        fingerprinter: Box<dyn Fingerprinter>,
        predictor: Box<dyn Predictor>,
    ) -> Result<Planet, ResourceError> {
        if config.num_workers < 1 {
            return Err(ResourceError::NoWorkers(config.num_workers));
        }
        let rng = if config.random_seed == 0 {
            SmallRng::from_entropy()
        } else {
            SmallRng::seed_from_u64(config.random_seed)
        };
        Ok(Planet {
            ctx: PlanetCtx::new(
                config.name,
                config.num_workers,
                rng,
                catalog,
                fingerprinter,
                predictor,
            ),
            lands: Vec::new(),
            age: 0,
        })
    }

    /// Installs the persistence sink invoked once per nation per tick.
    ///
    /// To read collected records back afterwards, install a shared
    /// handle such as an `Arc<Mutex<EvolutionLogger>>` and keep a
    /// clone.
    pub fn set_census(&mut self, census: Box<dyn CensusSink>) {
        self.ctx.census = Some(census);
    }

    /// Adds a land drawing on the full chromosome catalog.
    pub fn add_land(
        &mut self,
        config: LandConfig,
        generative: Box<dyn GenerativeFunction>,
        fitness: Box<dyn FitnessFunction>,
    ) -> Result<LandId, EvolutionError> {
        let chromosomes = self.ctx.catalog.ids().to_vec();
        let land = Land::new(config, chromosomes, generative, fitness)?;
        self.lands.push(land);
        Ok(LandId(self.lands.len() - 1))
    }

    /// Founds a nation on the given land, generating its initial
    /// population.
    pub fn found_nation(&mut self, land: LandId, config: NationConfig) -> Result<(), EvolutionError> {
        let land = &mut self.lands[land.0];
        let nation = Nation::found(config, &land.env, &mut self.ctx)?;
        land.nations.push(nation);
        Ok(())
    }

    /// Founds a nation seeded with an existing population, e.g. the
    /// survivors of an earlier run, instead of random founders.
    ///
    /// Founders keep their ids, genomes and scores; their residence is
    /// re-homed to the new nation, and the planet's id allocator skips
    /// past the highest founder id.
    pub fn found_nation_with(
        &mut self,
        land: LandId,
        config: NationConfig,
        founders: Vec<Individual>,
    ) -> Result<(), EvolutionError> {
        let land = &mut self.lands[land.0];
        let nation = Nation::found_with(config, founders, &land.env, &mut self.ctx)?;
        land.nations.push(nation);
        Ok(())
    }

    pub fn age(&self) -> u32 {
        self.age
    }

    pub fn lands(&self) -> &[Land] {
        &self.lands
    }

    pub fn num_lands(&self) -> usize {
        self.lands.len()
    }

    pub fn num_nations(&self) -> usize {
        self.lands.iter().map(|l| l.num_nations()).sum()
    }

    /// Total individuals ever created on this planet.
    pub fn num_citizens(&self) -> u64 {
        self.ctx.citizens
    }

    /// Runs one full generation over every land and nation:
    /// score + emigrate, route queued migrants, then propagate.
    ///
    /// # Errors
    /// Propagates [`RoutingError`] from migrant routing. The tick is
    /// aborted; emigrants already removed from their origin are lost.
    pub fn advance_tick(&mut self) -> Result<(), EvolutionError> {
        info!("age of planet {}: {}", self.ctx.name, self.age);
        self.age += 1;
        let total_nations = self.num_nations();
        for land in &mut self.lands {
            land.score_and_emigrate(&mut self.ctx, total_nations);
        }
        if !self.ctx.mailbox.is_empty() {
            self.route_migrants()?;
        }
        for land in &mut self.lands {
            land.propagate_nations(&mut self.ctx);
        }
        Ok(())
    }

    /// Resolves every queued emigrant's destination and moves it into
    /// the addressed nation's population.
    ///
    /// A destination of `None` means "anywhere but the birth nation",
    /// chosen uniformly. Receiving populations re-align their feature
    /// and property columns so newcomers' missing columns read as zero.
    fn route_migrants(&mut self) -> Result<(), RoutingError> {
        let names: Vec<String> = self
            .lands
            .iter()
            .flat_map(|land| land.nations.iter().map(|n| n.name().to_string()))
            .collect();
        let batch = std::mem::take(&mut self.ctx.mailbox);
        debug!("routing {} migrants across {} nations", batch.len(), names.len());

        let mut resolved: Vec<(String, Individual)> = Vec::with_capacity(batch.len());
        for mut migrant in batch {
            let destination = match migrant.destination.take() {
                Some(requested) => {
                    if !names.contains(&requested) {
                        return Err(RoutingError::UnknownNation(requested));
                    }
                    requested
                }
                None => {
                    let foreign: Vec<&String> = names
                        .iter()
                        .filter(|name| **name != migrant.birthplace.nation)
                        .collect();
                    if foreign.is_empty() {
                        return Err(RoutingError::NoForeignNation(
                            migrant.birthplace.nation.clone(),
                        ));
                    }
                    foreign[self.ctx.rng.gen_range(0..foreign.len())].clone()
                }
            };
            resolved.push((destination, migrant));
        }

        let planet_name = &self.ctx.name;
        for land in &mut self.lands {
            for nation in &mut land.nations {
                if resolved.is_empty() {
                    break;
                }
                let mut undelivered = Vec::with_capacity(resolved.len());
                let mut arrivals = false;
                for (destination, mut migrant) in resolved {
                    if destination == nation.name() {
                        migrant.residence = Location {
                            planet: planet_name.clone(),
                            land: land.env.name.clone(),
                            nation: destination,
                        };
                        nation.accept_immigrant(migrant);
                        arrivals = true;
                    } else {
                        undelivered.push((destination, migrant));
                    }
                }
                resolved = undelivered;
                if arrivals {
                    nation.align_population_columns();
                }
            }
        }
        debug_assert!(resolved.is_empty(), "validated destinations must all deliver");
        Ok(())
    }
}
