//! Item Builder DSL
//!
//! Fluent construction of finite-outcome and continuous items. Validation is
//! deferred to `build`, so a builder can be filled in any order.
//!
//! # Examples
//!
//! ```ignore
//! use budgetsim_core::config::{ContinuousBuilder, FiniteOutcomeBuilder, GeneratorSpec};
//! use budgetsim_core::variate::NamedDistribution;
//!
//! // Repairs are rare, and never happen two months running
//! let repairs = FiniteOutcomeBuilder::new("Car repairs")
//!     .outcome("none", 0.0)
//!     .outcome("repair", -900.0)
//!     .initial_row([1.0, 0.0])
//!     .transition("none", [0.9, 0.1])
//!     .transition("repair", [1.0, 0.0])
//!     .build()?;
//!
//! // Utility bill that drifts from month to month
//! let utilities = ContinuousBuilder::new("Utilities")
//!     .spec(GeneratorSpec::RandomWalk {
//!         step: NamedDistribution::Normal { mean: 0.0, std_dev: 10.0 },
//!     })
//!     .initial_value(-150.0)
//!     .build()?;
//! ```

use crate::error::ConfigError;
use crate::model::{ContinuousItem, FiniteOutcomeItem, Generator, Transitions};
use crate::variate::{NamedDistribution, VariateSource};

use super::generators::{GeneratorSpec, InitialValueSpec};

/// Builder for a Markov-driven discrete item
#[derive(Debug, Clone)]
pub struct FiniteOutcomeBuilder {
    pub(crate) name: String,
    outcomes: Vec<(String, f64)>,
    transitions: Option<Transitions>,
    initial_label: Option<String>,
}

impl FiniteOutcomeBuilder {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            outcomes: Vec::new(),
            transitions: None,
            initial_label: None,
        }
    }

    /// Append an outcome; probability vectors follow the order outcomes are added
    #[must_use]
    pub fn outcome(mut self, label: impl Into<String>, value: f64) -> Self {
        self.outcomes.push((label.into(), value));
        self
    }

    /// Same probabilities every period, regardless of the previous outcome
    #[must_use]
    pub fn independent(mut self, probabilities: impl Into<Vec<f64>>) -> Self {
        self.transitions = Some(Transitions::Independent(probabilities.into()));
        self
    }

    /// Distribution for the first period of a state-dependent chain
    #[must_use]
    pub fn initial_row(mut self, probabilities: impl Into<Vec<f64>>) -> Self {
        match &mut self.transitions {
            Some(Transitions::Dependent { initial, .. }) => *initial = Some(probabilities.into()),
            _ => {
                self.transitions = Some(Transitions::Dependent {
                    initial: Some(probabilities.into()),
                    rows: Vec::new(),
                });
            }
        }
        self
    }

    /// Distribution of the next outcome when the previous one was `from`
    #[must_use]
    pub fn transition(mut self, from: impl Into<String>, probabilities: impl Into<Vec<f64>>) -> Self {
        let row = (from.into(), probabilities.into());
        match &mut self.transitions {
            Some(Transitions::Dependent { rows, .. }) => rows.push(row),
            _ => {
                self.transitions = Some(Transitions::Dependent {
                    initial: None,
                    rows: vec![row],
                });
            }
        }
        self
    }

    /// Outcome treated as the previous period before the first draw
    #[must_use]
    pub fn initial_label(mut self, label: impl Into<String>) -> Self {
        self.initial_label = Some(label.into());
        self
    }

    pub fn build(self) -> Result<FiniteOutcomeItem, ConfigError> {
        // No probabilities at all is a length mismatch, not a uniform default
        let transitions = self
            .transitions
            .unwrap_or_else(|| Transitions::Independent(Vec::new()));
        FiniteOutcomeItem::new(
            self.name,
            self.outcomes,
            &transitions,
            self.initial_label.as_deref(),
        )
    }
}

#[derive(Debug, Clone)]
enum PendingGenerator {
    Function(Generator),
    Spec(GeneratorSpec),
}

/// Builder for an item whose amount comes from a generating function
#[derive(Debug, Clone)]
pub struct ContinuousBuilder {
    pub(crate) name: String,
    generator: Option<PendingGenerator>,
    initial: Option<InitialValueSpec>,
}

impl ContinuousBuilder {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            generator: None,
            initial: None,
        }
    }

    #[must_use]
    pub fn generator(mut self, generator: Generator) -> Self {
        self.generator = Some(PendingGenerator::Function(generator));
        self
    }

    /// Generating function that ignores the prior
    #[must_use]
    pub fn function<F>(self, f: F) -> Self
    where
        F: Fn(&mut dyn VariateSource) -> f64 + Send + Sync + 'static,
    {
        self.generator(Generator::independent(f))
    }

    /// Generating function of the previous period's amount
    #[must_use]
    pub fn dependent_function<F>(self, f: F) -> Self
    where
        F: Fn(f64, &mut dyn VariateSource) -> f64 + Send + Sync + 'static,
    {
        self.generator(Generator::dependent(f))
    }

    #[must_use]
    pub fn spec(mut self, spec: GeneratorSpec) -> Self {
        self.generator = Some(PendingGenerator::Spec(spec));
        self
    }

    /// Independent draw from a named distribution every period
    #[must_use]
    pub fn draw(self, distribution: NamedDistribution) -> Self {
        self.spec(GeneratorSpec::Draw { distribution })
    }

    #[must_use]
    pub fn initial(mut self, initial: InitialValueSpec) -> Self {
        self.initial = Some(initial);
        self
    }

    #[must_use]
    pub fn initial_value(self, value: f64) -> Self {
        self.initial(InitialValueSpec::Fixed(value))
    }

    /// Start each run from a fresh draw instead of a fixed amount
    #[must_use]
    pub fn initial_draw(self, distribution: NamedDistribution) -> Self {
        self.initial(InitialValueSpec::Draw(distribution))
    }

    pub fn build(self) -> Result<ContinuousItem, ConfigError> {
        let generator = match self.generator {
            Some(PendingGenerator::Function(generator)) => generator,
            Some(PendingGenerator::Spec(spec)) => spec.to_generator()?,
            None => return Err(ConfigError::MissingGenerator { item: self.name }),
        };
        let initial = self
            .initial
            .as_ref()
            .map(InitialValueSpec::to_initial_value)
            .transpose()?;
        ContinuousItem::new(self.name, generator, initial)
    }
}
