use evoplanet::logging::{EvolutionLogger, ReportingLevel};
use evoplanet::{
    ChromosomeBlock, ChromosomeCatalog, Fingerprinter, FitnessFunction, GenerativeFunction,
    Individual, LandConfig, NationConfig, Planet, PlanetConfig, Predictor,
};

use log::info;
use rand::RngCore;

use std::sync::{Arc, Mutex};

const TICKS: u32 = 25;
const TARGET_LENGTH: f64 = 18.0;

/// Features every polymer carries: chain length and the count of each
/// monomer class.
struct MonomerCounts;

impl Fingerprinter for MonomerCounts {
    fn fingerprint(&self, mut rows: Vec<Individual>) -> (Vec<Individual>, Vec<String>) {
        let keys = vec![
            "length".to_string(),
            "rigid".to_string(),
            "flexible".to_string(),
        ];
        for row in &mut rows {
            let rigid = row.genome.iter().filter(|&&id| id % 2 == 0).count();
            row.features.insert("length".into(), row.genome.len() as f64);
            row.features.insert("rigid".into(), rigid as f64);
            row.features
                .insert("flexible".into(), (row.genome.len() - rigid) as f64);
        }
        (rows, keys)
    }
}

/// A stand-in property model: "stiffness" rises with the rigid-monomer
/// fraction.
struct StiffnessModel;

impl Predictor for StiffnessModel {
    fn predict(&self, mut rows: Vec<Individual>, _: &[String]) -> Vec<Individual> {
        for row in &mut rows {
            let stiffness = row.features["rigid"] / row.features["length"].max(1.0);
            row.properties.insert("stiffness".into(), stiffness);
        }
        rows
    }
}

/// Rewards chains close to the target length with a balanced monomer
/// mix.
struct BalancedChains;

impl FitnessFunction for BalancedChains {
    fn score(&self, rows: &[Individual], _: &[String]) -> Vec<f64> {
        rows.iter()
            .map(|row| {
                let length_term = -(row.features["length"] - TARGET_LENGTH).abs();
                let balance_term = -(row.properties["stiffness"] - 0.5).abs() * 10.0;
                length_term + balance_term
            })
            .collect()
    }
}

/// Joins monomer payloads head-to-tail.
struct Polymerize;

impl GenerativeFunction for Polymerize {
    fn realize(
        &self,
        genome: &[u32],
        catalog: &ChromosomeCatalog,
        _: &mut dyn RngCore,
    ) -> Option<String> {
        genome
            .iter()
            .map(|&id| catalog.get(id).map(String::from))
            .collect()
    }
}

fn monomer_catalog() -> ChromosomeCatalog {
    let payloads = ["CC", "c1ccccc1", "CCO", "C(=O)N", "CCC", "C1CCCCC1"];
    ChromosomeCatalog::from_blocks(payloads.iter().enumerate().map(|(i, p)| ChromosomeBlock {
        id: i as u32 + 1,
        payload: (*p).into(),
        connections: 2,
    }))
}

fn main() -> Result<(), evoplanet::EvolutionError> {
    env_logger::init();

    let mut planet = Planet::new(
        PlanetConfig {
            name: "terrarium".into(),
            random_seed: 42,
            num_workers: 4,
        },
        monomer_catalog(),
        Box::new(MonomerCounts),
        Box::new(StiffnessModel),
    )?;

    let logger = Arc::new(Mutex::new(EvolutionLogger::new(ReportingLevel::Champion)));
    planet.set_census(Box::new(Arc::clone(&logger)));

    let land = planet.add_land(
        LandConfig {
            name: "greenhouse".into(),
            ..LandConfig::default()
        },
        Box::new(Polymerize),
        Box::new(BalancedChains),
    )?;

    // Two nations with opposite emigration habits: the elitist one
    // exports its champions, the other a random sample.
    planet.found_nation(
        land,
        NationConfig {
            name: "arcadia".into(),
            num_population_initial: 120,
            emigration_rate: 0.1,
            emigration_selection: "elite".into(),
            ..NationConfig::default()
        },
    )?;
    planet.found_nation(
        land,
        NationConfig {
            name: "boreas".into(),
            num_population_initial: 120,
            emigration_rate: 0.1,
            emigration_selection: "random".into(),
            partner_selection: "random".into(),
            ..NationConfig::default()
        },
    )?;

    info!(
        "founded {} nations with {} citizens",
        planet.num_nations(),
        planet.num_citizens()
    );
    for _ in 0..TICKS {
        planet.advance_tick()?;
        info!(
            "tick {} done, {} citizens so far",
            planet.age(),
            planet.num_citizens()
        );
    }

    let logger = logger.lock().unwrap();
    for record in logger.iter() {
        println!("{}", record);
    }

    let best = planet
        .lands()
        .iter()
        .flat_map(|land| land.nations())
        .flat_map(|nation| nation.population().iter())
        .max_by(|a, b| {
            let (a, b) = (a.fitness.unwrap_or(f64::MIN), b.fitness.unwrap_or(f64::MIN));
            a.total_cmp(&b)
        });
    if let Some(best) = best {
        println!(
            "fittest polymer after {} ticks: {} (fitness {:?}, {} blocks)",
            TICKS,
            best.phenotype,
            best.fitness,
            best.genome.len()
        );
    }
    Ok(())
}
