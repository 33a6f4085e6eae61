use std::fmt;

/// Errors in a cashflow item definition.
///
/// Shape and sum checks are raised while an item is being built. Problems that
/// depend on which labels a chain actually visits (`MissingTransitionRow`) can
/// only surface the first time a simulation reaches them.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    EmptyOutcomes {
        item: String,
    },
    DuplicateOutcome {
        item: String,
        label: String,
    },
    ProbabilityLength {
        item: String,
        expected: usize,
        found: usize,
    },
    NegativeProbability {
        item: String,
        index: usize,
        value: f64,
    },
    NonFiniteProbability {
        item: String,
        index: usize,
    },
    ProbabilitySum {
        item: String,
        sum: f64,
    },
    /// A transition row or initial label names something that is not an outcome
    UnknownLabel {
        item: String,
        label: String,
    },
    DuplicateTransitionRow {
        item: String,
        label: String,
    },
    /// No row for the prior label; `prior: None` is the initial sentinel
    MissingTransitionRow {
        item: String,
        prior: Option<String>,
    },
    /// State-dependent transitions with neither an initial row nor an initial label
    MissingInitialCondition {
        item: String,
    },
    /// State-dependent continuous generator sampled without a starting value
    MissingInitialValue {
        item: String,
    },
    /// Continuous item built without a generating function
    MissingGenerator {
        item: String,
    },
    InvalidDistribution {
        distribution: &'static str,
        reason: &'static str,
    },
    /// Prior of the wrong kind for the item, e.g. an outcome index for a continuous item
    PriorMismatch {
        item: String,
        expected: &'static str,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EmptyOutcomes { item } => {
                write!(f, "item '{item}' has no outcomes")
            }
            ConfigError::DuplicateOutcome { item, label } => {
                write!(f, "item '{item}' declares outcome '{label}' more than once")
            }
            ConfigError::ProbabilityLength {
                item,
                expected,
                found,
            } => write!(
                f,
                "item '{item}': probability vector has {found} entries, expected {expected}"
            ),
            ConfigError::NegativeProbability { item, index, value } => write!(
                f,
                "item '{item}': probability at position {index} is negative ({value})"
            ),
            ConfigError::NonFiniteProbability { item, index } => write!(
                f,
                "item '{item}': probability at position {index} is not finite"
            ),
            ConfigError::ProbabilitySum { item, sum } => write!(
                f,
                "item '{item}': probabilities sum to {sum}, expected 1"
            ),
            ConfigError::UnknownLabel { item, label } => {
                write!(f, "item '{item}' has no outcome named '{label}'")
            }
            ConfigError::DuplicateTransitionRow { item, label } => write!(
                f,
                "item '{item}' has more than one transition row for '{label}'"
            ),
            ConfigError::MissingTransitionRow { item, prior } => match prior {
                Some(label) => write!(
                    f,
                    "item '{item}' has no transition row for prior label '{label}'"
                ),
                None => write!(f, "item '{item}' has no transition row for the initial period"),
            },
            ConfigError::MissingInitialCondition { item } => write!(
                f,
                "item '{item}' needs an initial transition row or an initial label"
            ),
            ConfigError::MissingInitialValue { item } => write!(
                f,
                "item '{item}' depends on its prior value but has no initial value"
            ),
            ConfigError::MissingGenerator { item } => {
                write!(f, "item '{item}' has no generating function")
            }
            ConfigError::InvalidDistribution {
                distribution,
                reason,
            } => write!(f, "invalid {distribution} parameters: {reason}"),
            ConfigError::PriorMismatch { item, expected } => {
                write!(f, "item '{item}' was given a prior that is not {expected}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Errors in the arguments handed to the engine
#[derive(Debug, Clone, PartialEq)]
pub enum ArgumentError {
    DuplicateItemName(String),
    /// Period counts must be non-negative whole numbers
    InvalidPeriodCount(String),
}

impl fmt::Display for ArgumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgumentError::DuplicateItemName(name) => {
                write!(f, "budget already contains an item named '{name}'")
            }
            ArgumentError::InvalidPeriodCount(raw) => {
                write!(f, "period count must be a non-negative integer, got {raw}")
            }
        }
    }
}

impl std::error::Error for ArgumentError {}

#[derive(Debug, Clone, PartialEq)]
pub enum SimulationError {
    Config(ConfigError),
    Argument(ArgumentError),
    /// Monte Carlo runs were cancelled by request
    Cancelled,
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimulationError::Config(e) => write!(f, "configuration error: {e}"),
            SimulationError::Argument(e) => write!(f, "invalid argument: {e}"),
            SimulationError::Cancelled => write!(f, "simulation cancelled"),
        }
    }
}

impl std::error::Error for SimulationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimulationError::Config(e) => Some(e),
            SimulationError::Argument(e) => Some(e),
            SimulationError::Cancelled => None,
        }
    }
}

impl From<ConfigError> for SimulationError {
    fn from(err: ConfigError) -> Self {
        SimulationError::Config(err)
    }
}

impl From<ArgumentError> for SimulationError {
    fn from(err: ArgumentError) -> Self {
        SimulationError::Argument(err)
    }
}

pub type Result<T> = std::result::Result<T, SimulationError>;
