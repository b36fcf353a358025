use std::error::Error;
use std::fmt;

/// An invalid policy value was supplied for a land or nation.
///
/// Raised while constructing the offending land/nation, before any
/// population state has been touched.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    UnknownCrossoverPosition(String),
    UnknownPartnerSelection(String),
    UnknownEmigrationSelection(String),
    UnknownSelectionScheme(String),
    NonFiniteSigma(f64),
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownCrossoverPosition(s) => {
                write!(f, "{:?} is not a valid crossover position", s)
            }
            Self::UnknownPartnerSelection(s) => {
                write!(f, "{:?} is not a valid partner selection mode", s)
            }
            Self::UnknownEmigrationSelection(s) => {
                write!(f, "{:?} is not a valid emigration selection mode", s)
            }
            Self::UnknownSelectionScheme(s) => {
                write!(f, "{:?} is not a known selection scheme", s)
            }
            Self::NonFiniteSigma(v) => {
                write!(f, "sigma must be finite and non-negative, got {}", v)
            }
        }
    }
}

impl Error for ConfigurationError {}

/// An emigrant could not be delivered to a destination nation.
///
/// Fatal: by the time routing runs, emigrants have already left their
/// origin population, so an aborted tick loses the queued batch.
#[derive(Debug, Clone, PartialEq)]
pub enum RoutingError {
    /// A requested destination names no existing nation.
    UnknownNation(String),
    /// A randomly-routed emigrant has nowhere to go but home.
    NoForeignNation(String),
}

impl fmt::Display for RoutingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownNation(name) => {
                write!(f, "{:?} is not a nation, cannot immigrate there", name)
            }
            Self::NoForeignNation(birth) => write!(
                f,
                "no nation other than {:?} exists to receive its emigrants",
                birth
            ),
        }
    }
}

impl Error for RoutingError {}

/// The planet was constructed with unusable resource limits.
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceError {
    /// Partitioned evaluation needs at least one worker.
    NoWorkers(usize),
}

impl fmt::Display for ResourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoWorkers(n) => write!(f, "worker count must be at least 1, got {}", n),
        }
    }
}

impl Error for ResourceError {}

/// Any fatal error surfaced by planet construction or a tick.
#[derive(Debug, Clone, PartialEq)]
pub enum EvolutionError {
    Configuration(ConfigurationError),
    Routing(RoutingError),
    Resource(ResourceError),
}

impl fmt::Display for EvolutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration(e) => e.fmt(f),
            Self::Routing(e) => e.fmt(f),
            Self::Resource(e) => e.fmt(f),
        }
    }
}

impl Error for EvolutionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Configuration(e) => Some(e),
            Self::Routing(e) => Some(e),
            Self::Resource(e) => Some(e),
        }
    }
}

impl From<ConfigurationError> for EvolutionError {
    fn from(e: ConfigurationError) -> Self {
        Self::Configuration(e)
    }
}

impl From<RoutingError> for EvolutionError {
    fn from(e: RoutingError) -> Self {
        Self::Routing(e)
    }
}

impl From<ResourceError> for EvolutionError {
    fn from(e: ResourceError) -> Self {
        Self::Resource(e)
    }
}
