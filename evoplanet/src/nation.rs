mod breeding;
mod mating;

use crate::errors::ConfigurationError;
use crate::evaluators::fingerprint_and_predict;
use crate::individual::{Individual, Location, PolymerId};
use crate::land::LandEnv;
use crate::planet::PlanetCtx;
use crate::population::Population;
use crate::selection::{scheme_by_name, SelectionScheme};

use ahash::RandomState;
use log::{debug, info, warn};
use rand::seq::index;
use rand::Rng;
use serde::{Deserialize, Serialize};

use std::collections::{BTreeMap, HashSet};
use std::str::FromStr;

/// How parents pick their mates within the candidate pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartnerSelection {
    /// Highest-fitness candidates choose the least similar partners
    /// (Tanimoto over feature vectors).
    Diversity,
    /// Partners are grouped uniformly at random.
    Random,
}

impl FromStr for PartnerSelection {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "diversity" => Ok(Self::Diversity),
            "random" => Ok(Self::Random),
            other => Err(ConfigurationError::UnknownPartnerSelection(
                other.to_string(),
            )),
        }
    }
}

/// How a nation picks which individuals emigrate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmigrationSelection {
    /// Uniform sample without replacement.
    Random,
    /// The highest-fitness individuals leave.
    Elite,
    /// The best of those who would not have been picked as parents.
    BestWorst,
}

impl FromStr for EmigrationSelection {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "random" => Ok(Self::Random),
            "elite" => Ok(Self::Elite),
            "best_worst" => Ok(Self::BestWorst),
            other => Err(ConfigurationError::UnknownEmigrationSelection(
                other.to_string(),
            )),
        }
    }
}

/// Configuration surface for one nation. Policy names are plain
/// strings, validated when the nation is founded — before any
/// population state exists.
///
/// # Examples
/// ```
/// use evoplanet::NationConfig;
///
/// let config = NationConfig {
///     name: "arcadia".into(),
///     num_families: 10,
///     emigration_selection: "elite".into(),
///     ..NationConfig::default()
/// };
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NationConfig {
    pub name: String,
    /// Number of founders generated at the nation's creation.
    pub num_population_initial: usize,
    /// Genome length of each founder.
    pub num_chromosomes_initial: usize,
    pub num_families: usize,
    pub num_parents_per_family: usize,
    pub num_children_per_family: usize,
    /// `"elite"` or `"random"`.
    pub selection_scheme: String,
    /// `"diversity"` or `"random"`.
    pub partner_selection: String,
    /// Fraction of the population that emigrates each tick.
    /// Clamped to `[0, 0.5]`.
    pub emigration_rate: f64,
    /// `"random"`, `"elite"` or `"best_worst"`.
    pub emigration_selection: String,
    /// Fraction of the parent pool reserved for migrants, when any
    /// are available. Clamped to `[0, 1]`.
    pub parent_migrant_percentage: f64,
    /// Destination nation → fraction of emigrants sent there.
    /// Normalized when the fractions sum to more than 1; any
    /// unallocated remainder is routed randomly.
    pub immigration_pattern: Vec<(String, f64)>,
}

impl Default for NationConfig {
    fn default() -> NationConfig {
        NationConfig {
            name: String::new(),
            num_population_initial: 180,
            num_chromosomes_initial: 4,
            num_families: 15,
            num_parents_per_family: 3,
            num_children_per_family: 12,
            selection_scheme: "elite".to_string(),
            partner_selection: "diversity".to_string(),
            emigration_rate: 0.1,
            emigration_selection: "best_worst".to_string(),
            parent_migrant_percentage: 0.1,
            immigration_pattern: Vec::new(),
        }
    }
}

/// A nation owns one population and runs its generation step.
pub struct Nation {
    name: String,
    generation: u32,
    num_families: usize,
    num_parents_per_family: usize,
    num_children_per_family: usize,
    partner_selection: PartnerSelection,
    emigration_rate: f64,
    emigration_selection: EmigrationSelection,
    parent_migrant_percentage: f64,
    immigration_pattern: Vec<(String, f64)>,
    scheme: Box<dyn SelectionScheme>,
    population: Population,
    feature_keys: Vec<String>,
}

impl std::fmt::Debug for Nation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Nation")
            .field("name", &self.name)
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

impl Nation {
    /// Validates the configuration and founds the initial population
    /// of randomly generated individuals. Founders that the generative
    /// function rejects as non-viable are dropped.
    pub(crate) fn found(
        config: NationConfig,
        env: &LandEnv,
        ctx: &mut PlanetCtx,
    ) -> Result<Nation, ConfigurationError> {
        let num_population_initial = config.num_population_initial;
        let num_chromosomes_initial = config.num_chromosomes_initial;
        let mut nation = Nation::from_config(config)?;

        let home = nation.home_location(env, ctx);
        let mut founders = Vec::with_capacity(num_population_initial);
        for _ in 0..num_population_initial {
            let genome: Vec<_> = (0..num_chromosomes_initial)
                .map(|_| env.chromosomes[ctx.rng.gen_range(0..env.chromosomes.len())])
                .collect();
            let phenotype = match env.generative.realize(&genome, &ctx.catalog, &mut ctx.rng) {
                Some(p) if !p.is_empty() => p,
                _ => continue,
            };
            founders.push(Individual::born(
                ctx.next_id(),
                (0, 0),
                genome,
                phenotype,
                home.clone(),
                0,
            ));
        }
        nation.population.replace(founders);
        Ok(nation)
    }

    /// Founds a nation from a caller-supplied population instead of
    /// random founders, so a run can be seeded from or resume an
    /// earlier one. Founders are taken verbatim apart from residence,
    /// which is re-homed here; the planet's id allocator skips past
    /// their ids so freshly born individuals never collide.
    pub(crate) fn found_with(
        config: NationConfig,
        mut founders: Vec<Individual>,
        env: &LandEnv,
        ctx: &mut PlanetCtx,
    ) -> Result<Nation, ConfigurationError> {
        let mut nation = Nation::from_config(config)?;

        if let Some(highest) = founders.iter().map(|f| f.id).max() {
            ctx.reserve_ids(highest);
        }
        let home = nation.home_location(env, ctx);
        for founder in &mut founders {
            founder.residence = home.clone();
        }
        nation.population.replace(founders);
        Ok(nation)
    }

    /// Validates every policy string and builds the nation with an
    /// empty population.
    fn from_config(config: NationConfig) -> Result<Nation, ConfigurationError> {
        let scheme = scheme_by_name(&config.selection_scheme)?;
        let partner_selection = config.partner_selection.parse()?;
        let emigration_selection = config.emigration_selection.parse()?;

        let mut emigration_rate = config.emigration_rate;
        if emigration_rate > 0.5 {
            warn!("emigration rate was {}, clamped to 0.5", emigration_rate);
            emigration_rate = 0.5;
        }
        if emigration_rate < 0.0 {
            warn!("emigration rate was {}, clamped to 0", emigration_rate);
            emigration_rate = 0.0;
        }
        let parent_migrant_percentage = config.parent_migrant_percentage.clamp(0.0, 1.0);

        let mut immigration_pattern = config.immigration_pattern;
        let total_fraction: f64 = immigration_pattern.iter().map(|(_, f)| f).sum();
        if total_fraction > 1.0 {
            for (_, fraction) in &mut immigration_pattern {
                *fraction /= total_fraction;
            }
        }

        Ok(Nation {
            name: config.name,
            generation: 0,
            num_families: config.num_families,
            num_parents_per_family: config.num_parents_per_family,
            num_children_per_family: config.num_children_per_family,
            partner_selection,
            emigration_rate,
            emigration_selection,
            parent_migrant_percentage,
            immigration_pattern,
            scheme,
            population: Population::default(),
            feature_keys: Vec::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    /// Effective (clamped) emigration rate.
    pub fn emigration_rate(&self) -> f64 {
        self.emigration_rate
    }

    /// Feature keys produced by the most recent fingerprint pass.
    pub fn feature_keys(&self) -> &[String] {
        &self.feature_keys
    }

    fn home_location(&self, env: &LandEnv, ctx: &PlanetCtx) -> Location {
        Location {
            planet: ctx.name.clone(),
            land: env.name.clone(),
            nation: self.name.clone(),
        }
    }

    /// Phase S: fingerprint + predict in worker-sized chunks, score
    /// fitness, and queue emigrants to the planet mailbox (skipped
    /// when this is the only nation on the planet).
    pub(crate) fn score_and_emigrate(
        &mut self,
        env: &LandEnv,
        ctx: &mut PlanetCtx,
        total_nations: usize,
    ) {
        let rows = self.population.take_all();
        let (rows, feature_keys) = fingerprint_and_predict(
            rows,
            ctx.num_workers,
            ctx.fingerprinter.as_ref(),
            ctx.predictor.as_ref(),
        );
        self.population.replace(rows);
        self.feature_keys = feature_keys;
        self.apply_fitness(env);

        if total_nations > 1 {
            self.emigrate(ctx);
        } else {
            debug!(
                "no other nations exist for the polymers of {} to immigrate to",
                self.name
            );
        }
    }

    /// Phase P: re-score (immigrants arrived unscored for this nation),
    /// select parents, persist the census, then breed the next
    /// generation and replace the population with it.
    pub(crate) fn propagate(&mut self, env: &LandEnv, ctx: &mut PlanetCtx) {
        debug!("{} of {} advances through time", self.name, env.name);
        self.apply_fitness(env);
        let families = self.select(ctx);

        if let Some(census) = ctx.census.as_mut() {
            census.record(self.population.members());
        }

        let (mut genomes, parent_pairs) = breeding::crossover_families(
            &self.population,
            &families,
            &env.crossover,
            self.num_children_per_family,
            &mut ctx.rng,
        );
        for genome in &mut genomes {
            breeding::mutate(genome, &env.mutation, &env.chromosomes, &mut ctx.rng);
        }

        let home = self.home_location(env, ctx);
        let next_generation = self.generation + 1;
        let mut children = Vec::with_capacity(genomes.len());
        for (genome, parents) in genomes.into_iter().zip(parent_pairs) {
            let phenotype = match env.generative.realize(&genome, &ctx.catalog, &mut ctx.rng) {
                Some(p) if !p.is_empty() => p,
                // Non-viable embryo; a normal outcome, not an error.
                _ => continue,
            };
            children.push(Individual::born(
                ctx.next_id(),
                parents,
                genome,
                phenotype,
                home.clone(),
                next_generation,
            ));
        }

        info!(
            "generation {} of {} has passed away; {} children born",
            self.generation,
            self.name,
            children.len()
        );
        self.population.replace(children);
        self.generation += 1;
    }

    /// Attaches one fitness value per individual.
    fn apply_fitness(&mut self, env: &LandEnv) {
        let scores = env
            .fitness
            .score(self.population.members(), &self.feature_keys);
        assert_eq!(
            scores.len(),
            self.population.len(),
            "fitness function must return one value per individual"
        );
        for (member, score) in self.population.iter_mut().zip(scores) {
            member.fitness = Some(score);
        }
    }

    /// Selects emigrants, removes them from the population, tags each
    /// with a destination request and queues them on the mailbox.
    fn emigrate(&mut self, ctx: &mut PlanetCtx) {
        let count = (self.population.len() as f64 * self.emigration_rate).round() as usize;
        if count == 0 {
            return;
        }
        let chosen: HashSet<PolymerId, RandomState> = match self.emigration_selection {
            EmigrationSelection::Random => {
                self.population.sample_ids(&mut ctx.rng, count).into_iter().collect()
            }
            EmigrationSelection::Elite => {
                self.population.ranked_ids().into_iter().take(count).collect()
            }
            EmigrationSelection::BestWorst => {
                let parent_slots = self.num_parents_per_family * self.num_families;
                let ranked = self.population.ranked_ids();
                ranked
                    .into_iter()
                    .skip(parent_slots)
                    .take(count)
                    .collect()
            }
        };
        let mut emigrants = self.population.drain_ids(&chosen);
        self.tag_destinations(&mut emigrants, &mut ctx.rng);
        debug!("{} polymers emigrate from {}", emigrants.len(), self.name);
        ctx.mailbox.extend(emigrants);
    }

    /// Applies the immigration pattern: a rounded share of the batch is
    /// tagged for each listed destination, spread over a uniformly
    /// sampled index set; everyone else is routed randomly.
    fn tag_destinations(&self, emigrants: &mut [Individual], rng: &mut impl Rng) {
        if self.immigration_pattern.is_empty() || emigrants.is_empty() {
            return;
        }
        let batch = emigrants.len();
        let total_fraction: f64 = self.immigration_pattern.iter().map(|(_, f)| f).sum();
        let tagged = ((total_fraction * batch as f64).round() as usize).min(batch);
        let slots = index::sample(rng, batch, tagged).into_vec();
        let mut cursor = 0;
        for (destination, fraction) in &self.immigration_pattern {
            let share = (fraction * batch as f64).round() as usize;
            for _ in 0..share {
                if cursor >= slots.len() {
                    return;
                }
                emigrants[slots[cursor]].destination = Some(destination.clone());
                cursor += 1;
            }
        }
    }

    pub(crate) fn accept_immigrant(&mut self, immigrant: Individual) {
        self.population.push(immigrant);
    }

    pub(crate) fn align_population_columns(&mut self) {
        self.population.align_columns();
    }

    /// Chooses the parent candidate pool, pairs it into families and
    /// marks every chosen individual as a parent. When more parents are
    /// wanted than the population holds, the selection scheme is
    /// skipped and everyone is a candidate.
    fn select(&mut self, ctx: &mut PlanetCtx) -> Vec<Vec<PolymerId>> {
        let parent_slots = self.num_families * self.num_parents_per_family;
        let candidates: Vec<PolymerId> = if parent_slots > self.population.len() {
            self.population.iter().map(|m| m.id).collect()
        } else {
            let quotas = self.parent_quotas(parent_slots);
            self.scheme.select(&self.population, &quotas)
        };

        let families = mating::pair_families(
            &self.population,
            &candidates,
            self.partner_selection,
            self.num_parents_per_family,
            &self.feature_keys,
            &mut ctx.rng,
        );

        let parent_ids: HashSet<PolymerId, RandomState> =
            families.iter().flatten().copied().collect();
        for member in self.population.iter_mut() {
            member.is_parent = parent_ids.contains(&member.id);
        }
        families
    }

    /// Distributes the reserved migrant-parent quota round-robin over
    /// the foreign birth nations present in the population, one unit
    /// per nation per round until the reserve or the migrants run out.
    /// The home nation receives whatever was not assigned.
    fn parent_quotas(&self, parent_slots: usize) -> BTreeMap<String, usize> {
        let mut quotas = BTreeMap::new();
        let origins = self.population.birth_nations();
        let reserve = (parent_slots as f64 * self.parent_migrant_percentage).round() as usize;
        let mut assigned = 0;

        if origins.len() > 1 && reserve > 0 {
            let mut available: BTreeMap<String, usize> = origins
                .iter()
                .filter(|origin| **origin != self.name)
                .map(|origin| (origin.clone(), self.population.count_birth_nation(origin)))
                .collect();
            for origin in available.keys() {
                quotas.insert(origin.clone(), 0);
            }
            'distribute: while assigned < reserve {
                let mut exhausted = true;
                for (origin, remaining) in &mut available {
                    if *remaining > 0 {
                        *remaining -= 1;
                        *quotas.entry(origin.clone()).or_insert(0) += 1;
                        assigned += 1;
                        exhausted = false;
                        if assigned == reserve {
                            break 'distribute;
                        }
                    }
                }
                if exhausted {
                    break;
                }
            }
        }
        quotas.insert(self.name.clone(), parent_slots - assigned);
        quotas
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::individual::Individual;
    use crate::testing::{planet_ctx, FlatFitness, JoinBlocks};
    use crate::{Land, LandConfig};

    fn test_land() -> Land {
        Land::new(
            LandConfig {
                name: "pangaea".into(),
                ..LandConfig::default()
            },
            vec![1, 2, 3],
            Box::new(JoinBlocks),
            Box::new(FlatFitness),
        )
        .unwrap()
    }

    fn found(config: NationConfig) -> (Nation, PlanetCtx) {
        let mut ctx = planet_ctx();
        let land = test_land();
        let nation = Nation::found(config, &land.env, &mut ctx).unwrap();
        (nation, ctx)
    }

    #[test]
    fn emigration_rate_is_clamped_high() {
        let (nation, _) = found(NationConfig {
            name: "n".into(),
            num_population_initial: 4,
            emigration_rate: 0.9,
            ..NationConfig::default()
        });
        assert_eq!(nation.emigration_rate(), 0.5);
    }

    #[test]
    fn emigration_rate_is_clamped_low() {
        let (nation, _) = found(NationConfig {
            name: "n".into(),
            num_population_initial: 4,
            emigration_rate: -0.2,
            ..NationConfig::default()
        });
        assert_eq!(nation.emigration_rate(), 0.0);
    }

    #[test]
    fn founders_have_no_parents_and_fresh_ids() {
        let (nation, _) = found(NationConfig {
            name: "n".into(),
            num_population_initial: 12,
            num_chromosomes_initial: 4,
            ..NationConfig::default()
        });
        let mut seen = std::collections::HashSet::new();
        for member in nation.population().iter() {
            assert_eq!(member.parents, (0, 0));
            assert!(member.id > 0);
            assert!(seen.insert(member.id));
            assert_eq!(member.genome.len(), 4);
        }
        assert_eq!(nation.population().len(), 12);
    }

    #[test]
    fn invalid_selection_scheme_fails_before_founding() {
        let mut ctx = planet_ctx();
        let land = test_land();
        let before = ctx.peek_citizens();
        let err = Nation::found(
            NationConfig {
                name: "n".into(),
                selection_scheme: "lottery".into(),
                ..NationConfig::default()
            },
            &land.env,
            &mut ctx,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigurationError::UnknownSelectionScheme(name) if name == "lottery"
        ));
        // No ids were handed out: no state was mutated.
        assert_eq!(ctx.peek_citizens(), before);
    }

    #[test]
    fn seeded_founders_are_kept_verbatim() {
        let mut ctx = planet_ctx();
        let land = test_land();
        let elsewhere = crate::Location {
            planet: "old".into(),
            land: "old".into(),
            nation: "old".into(),
        };
        let mut founders = Vec::new();
        for (id, fitness) in [(40, 0.25), (41, 0.5), (57, 0.75)] {
            let mut m =
                Individual::born(id, (1, 2), vec![3, 2, 1], "CBA".into(), elsewhere.clone(), 7);
            m.fitness = Some(fitness);
            founders.push(m);
        }
        let nation = Nation::found_with(
            NationConfig {
                name: "n".into(),
                ..NationConfig::default()
            },
            founders,
            &land.env,
            &mut ctx,
        )
        .unwrap();

        assert_eq!(nation.population().len(), 3);
        let first = nation.population().get(40).unwrap();
        assert_eq!(first.genome, vec![3, 2, 1]);
        assert_eq!(first.phenotype, "CBA");
        assert_eq!(first.parents, (1, 2));
        assert_eq!(first.generation, 7);
        assert_eq!(first.fitness, Some(0.25));
        assert_eq!(first.birthplace, elsewhere);
        assert_eq!(first.residence.nation, "n");
        // The allocator skipped past every seeded id.
        assert_eq!(ctx.next_id(), 58);
    }

    #[test]
    fn seeding_an_invalid_config_hands_the_founders_back_unfounded() {
        let mut ctx = planet_ctx();
        let land = test_land();
        let before = ctx.peek_citizens();
        let home = crate::Location {
            planet: "p".into(),
            land: "l".into(),
            nation: "n".into(),
        };
        let founders = vec![Individual::born(99, (0, 0), vec![1], "A".into(), home, 0)];
        let err = Nation::found_with(
            NationConfig {
                name: "n".into(),
                partner_selection: "astrology".into(),
                ..NationConfig::default()
            },
            founders,
            &land.env,
            &mut ctx,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigurationError::UnknownPartnerSelection(_)));
        assert_eq!(ctx.peek_citizens(), before);
    }

    #[test]
    fn oversubscribed_pattern_is_normalized() {
        let (nation, _) = found(NationConfig {
            name: "n".into(),
            num_population_initial: 4,
            immigration_pattern: vec![("a".into(), 1.5), ("b".into(), 0.5)],
            ..NationConfig::default()
        });
        let total: f64 = nation.immigration_pattern.iter().map(|(_, f)| f).sum();
        assert!((total - 1.0).abs() < 1e-12);
        assert!((nation.immigration_pattern[0].1 - 0.75).abs() < 1e-12);
    }

    #[test]
    fn migrant_parent_quota_is_distributed_round_robin() {
        let (mut nation, _) = found(NationConfig {
            name: "home".into(),
            num_population_initial: 0,
            num_families: 5,
            num_parents_per_family: 2,
            parent_migrant_percentage: 0.4,
            ..NationConfig::default()
        });
        let mut members = Vec::new();
        let mut id = 100;
        for (origin, count) in [("home", 6), ("east", 3), ("west", 1)] {
            for _ in 0..count {
                let loc = crate::Location {
                    planet: "p".into(),
                    land: "l".into(),
                    nation: origin.into(),
                };
                let mut m = Individual::born(id, (0, 0), vec![1], "A".into(), loc, 0);
                m.fitness = Some(1.0);
                id += 1;
                members.push(m);
            }
        }
        nation.population.replace(members);

        // 10 parent slots, reserve = 4: round one gives east and west
        // one each, round two gives east its second; west is exhausted
        // so east takes the fourth.
        let quotas = nation.parent_quotas(10);
        assert_eq!(quotas["east"], 3);
        assert_eq!(quotas["west"], 1);
        assert_eq!(quotas["home"], 6);
    }

    #[test]
    fn quota_reserve_caps_at_available_migrants() {
        let (mut nation, _) = found(NationConfig {
            name: "home".into(),
            num_population_initial: 0,
            parent_migrant_percentage: 1.0,
            ..NationConfig::default()
        });
        let mut members = Vec::new();
        for (i, origin) in [("home"), ("east")].iter().enumerate() {
            let loc = crate::Location {
                planet: "p".into(),
                land: "l".into(),
                nation: (*origin).into(),
            };
            let mut m = Individual::born(i as u64 + 1, (0, 0), vec![1], "A".into(), loc, 0);
            m.fitness = Some(1.0);
            members.push(m);
        }
        nation.population.replace(members);

        // Reserve of 8 but only one migrant exists; home absorbs the rest.
        let quotas = nation.parent_quotas(8);
        assert_eq!(quotas["east"], 1);
        assert_eq!(quotas["home"], 7);
    }

    #[test]
    fn fitness_attaches_one_score_per_member() {
        let (mut nation, mut ctx) = found(NationConfig {
            name: "n".into(),
            num_population_initial: 6,
            ..NationConfig::default()
        });
        let land = test_land();
        nation.score_and_emigrate(&land.env, &mut ctx, 1);
        assert!(nation.population().iter().all(|m| m.fitness.is_some()));
    }

    #[test]
    fn best_worst_emigration_spares_the_parent_tier() {
        let (mut nation, mut ctx) = found(NationConfig {
            name: "n".into(),
            num_population_initial: 0,
            num_families: 1,
            num_parents_per_family: 2,
            emigration_rate: 0.25,
            emigration_selection: "best_worst".into(),
            ..NationConfig::default()
        });
        let loc = crate::Location {
            planet: "p".into(),
            land: "l".into(),
            nation: "n".into(),
        };
        let mut members = Vec::new();
        for (id, fitness) in [(1, 0.9), (2, 0.8), (3, 0.7), (4, 0.6), (5, 0.5), (6, 0.4), (7, 0.3), (8, 0.2)] {
            let mut m = Individual::born(id, (0, 0), vec![1], "A".into(), loc.clone(), 0);
            m.fitness = Some(fitness);
            members.push(m);
        }
        nation.population.replace(members);

        nation.emigrate(&mut ctx);
        // 8 * 0.25 = 2 emigrants: the best two below the 2-parent tier.
        let left: Vec<_> = ctx.mailbox.iter().map(|m| m.id).collect();
        assert_eq!(left, vec![3, 4]);
        assert_eq!(nation.population().len(), 6);
    }
}
