//! In-memory census collection.
//!
//! [`EvolutionLogger`] is the default [`CensusSink`]: it keeps one
//! [`CensusRecord`] per nation per tick, with summary statistics and an
//! optionally-sampled slice of the population itself.

use crate::evaluators::CensusSink;
use crate::individual::Individual;

use std::fmt;

/// Defines how much of each censused population is retained.
#[derive(Clone, Copy, Debug)]
pub enum ReportingLevel {
    /// Clones the entire population.
    AllPolymers,
    /// Clones only the fittest individual.
    Champion,
    /// Clones no individuals.
    NoPolymers,
}

/// A struct for reporting basic statistical data.
#[derive(Clone, Debug)]
pub struct Stats {
    pub maximum: f64,
    pub minimum: f64,
    pub mean: f64,
    pub median: f64,
}

impl Stats {
    /// Returns statistics about numbers in a sequence.
    ///
    /// An empty sequence yields `NaN` throughout.
    ///
    /// # Examples
    /// ```
    /// use evoplanet::logging::Stats;
    ///
    /// let stats = Stats::from([-2.0, -1.0, 0.5, 1.0, 1.5].iter().copied());
    /// assert_eq!(stats.maximum, 1.5);
    /// assert_eq!(stats.minimum, -2.0);
    /// assert_eq!(stats.mean, 0.0);
    /// assert_eq!(stats.median, 0.5);
    /// ```
    pub fn from(data: impl Iterator<Item = f64>) -> Stats {
        let mut data: Vec<f64> = data.collect();
        if data.is_empty() {
            return Stats {
                maximum: f64::NAN,
                minimum: f64::NAN,
                mean: f64::NAN,
                median: f64::NAN,
            };
        }
        data.sort_unstable_by(f64::total_cmp);
        let (mut max, mut min, mut sum) = (f64::MIN, f64::MAX, 0.0);
        for d in &data {
            max = d.max(max);
            min = d.min(min);
            sum += d;
        }
        let mid = data.len() / 2;
        let median = if data.len() % 2 == 0 {
            (data[mid - 1] + data[mid]) / 2.0
        } else {
            data[mid]
        };
        Stats {
            maximum: max,
            minimum: min,
            mean: sum / data.len() as f64,
            median,
        }
    }
}

/// A reporting-level dependant store of individuals from a population.
#[derive(Clone, Debug)]
pub enum GenerationSample {
    /// Every individual present at census time.
    AllPolymers(Vec<Individual>),
    /// Only the fittest individual.
    Champion(Box<Individual>),
    /// Empty.
    None,
}

/// A snapshot of one nation at one tick.
#[derive(Clone, Debug)]
pub struct CensusRecord {
    pub nation: String,
    pub generation: u32,
    pub population_size: usize,
    pub parent_count: usize,
    pub fitness: Stats,
    pub sample: GenerationSample,
}

impl fmt::Display for CensusRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CensusRecord {{\n\
            \tnation: {:?}\n\
            \tgeneration: {:?}\n\
            \tpopulation_size: {:?}\n\
            \tparent_count: {:?}\n\
            \tfitness: {:?}\n\
            }}",
            &self.nation,
            &self.generation,
            &self.population_size,
            &self.parent_count,
            &self.fitness,
        )
    }
}

/// A log of the evolution of every censused nation over time.
///
/// # Examples
/// ```
/// use evoplanet::logging::{EvolutionLogger, ReportingLevel};
///
/// use std::sync::{Arc, Mutex};
///
/// let logger = Arc::new(Mutex::new(EvolutionLogger::new(ReportingLevel::Champion)));
/// // Install a clone with `Planet::set_census`, run some ticks, then
/// // read the records through the retained handle.
/// let handle = Arc::clone(&logger);
/// assert!(handle.lock().unwrap().iter().next().is_none());
/// ```
#[derive(Clone, Debug)]
pub struct EvolutionLogger {
    reporting_level: ReportingLevel,
    records: Vec<CensusRecord>,
}

impl EvolutionLogger {
    /// Returns a logger with the appropiate reporting level.
    pub fn new(reporting_level: ReportingLevel) -> EvolutionLogger {
        EvolutionLogger {
            reporting_level,
            records: vec![],
        }
    }

    /// Iterate over all collected snapshots, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &CensusRecord> {
        self.records.iter()
    }
}

impl CensusSink for EvolutionLogger {
    fn record(&mut self, rows: &[Individual]) {
        if rows.is_empty() {
            return;
        }
        let champion = rows
            .iter()
            .max_by(|a, b| a.rank_fitness().total_cmp(&b.rank_fitness()))
            .cloned();
        self.records.push(CensusRecord {
            nation: rows[0].residence.nation.clone(),
            generation: rows.iter().map(|r| r.generation).max().unwrap_or(0),
            population_size: rows.len(),
            parent_count: rows.iter().filter(|r| r.is_parent).count(),
            fitness: Stats::from(rows.iter().filter_map(|r| r.fitness)),
            sample: match self.reporting_level {
                ReportingLevel::AllPolymers => GenerationSample::AllPolymers(rows.to_vec()),
                ReportingLevel::Champion => match champion {
                    Some(c) => GenerationSample::Champion(Box::new(c)),
                    None => GenerationSample::None,
                },
                ReportingLevel::NoPolymers => GenerationSample::None,
            },
        });
    }
}
