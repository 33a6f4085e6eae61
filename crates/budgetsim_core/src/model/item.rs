//! Cashflow items
//!
//! Each item is immutable configuration. Run-local state lives in a `Prior`
//! owned by the caller, which passes it into `sample` and receives the next
//! prior back. The same item can therefore be shared by any number of
//! concurrent runs.

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashSet;

use super::markov::{TransitionRow, TransitionTable, Transitions};
use super::results::Label;
use crate::error::ConfigError;
use crate::variate::{Variate, VariateSource};

/// Conditioning input for an item's next draw
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Prior {
    /// Nothing sampled yet in this run
    #[default]
    Initial,
    /// Index of the previous outcome of a finite-outcome item
    Outcome(usize),
    /// Previous amount of a fixed or continuous item
    Value(f64),
}

/// One period's draw from an item
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub label: Label,
    pub value: f64,
    /// Prior to hand back on the next period
    pub next: Prior,
}

/// A modeled income or expense stream
#[derive(Debug, Clone)]
pub enum CashflowItem {
    Fixed(FixedItem),
    FiniteOutcome(FiniteOutcomeItem),
    Continuous(ContinuousItem),
}

impl CashflowItem {
    pub fn fixed(name: impl Into<String>, value: f64) -> Self {
        CashflowItem::Fixed(FixedItem {
            name: name.into(),
            value,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            CashflowItem::Fixed(item) => &item.name,
            CashflowItem::FiniteOutcome(item) => &item.name,
            CashflowItem::Continuous(item) => &item.name,
        }
    }

    /// Whether the next draw is conditioned on the previous one
    #[must_use]
    pub fn depends_on_prior(&self) -> bool {
        match self {
            CashflowItem::Fixed(_) => false,
            CashflowItem::FiniteOutcome(item) => item.table.depends_on_prior(),
            CashflowItem::Continuous(item) => item.generator.depends_on_prior(),
        }
    }

    /// Draw this period's `(label, value)` given the previous period's prior.
    ///
    /// Fixed items ignore the prior. Finite-outcome items accept `Initial` or
    /// `Outcome`, continuous items `Initial` or `Value`; anything else is a
    /// `PriorMismatch`.
    pub fn sample(
        &self,
        prior: Prior,
        source: &mut dyn VariateSource,
    ) -> Result<Sample, ConfigError> {
        match (self, prior) {
            (CashflowItem::Fixed(item), _) => Ok(item.sample()),
            (CashflowItem::FiniteOutcome(item), Prior::Initial) => item.sample(None, source),
            (CashflowItem::FiniteOutcome(item), Prior::Outcome(index)) => {
                item.sample(Some(index), source)
            }
            (CashflowItem::FiniteOutcome(item), Prior::Value(_)) => {
                Err(ConfigError::PriorMismatch {
                    item: item.name.clone(),
                    expected: "an outcome",
                })
            }
            (CashflowItem::Continuous(item), Prior::Initial) => item.sample(None, source),
            (CashflowItem::Continuous(item), Prior::Value(value)) => {
                item.sample(Some(value), source)
            }
            (CashflowItem::Continuous(item), Prior::Outcome(_)) => {
                Err(ConfigError::PriorMismatch {
                    item: item.name.clone(),
                    expected: "an amount",
                })
            }
        }
    }
}

impl From<FixedItem> for CashflowItem {
    fn from(item: FixedItem) -> Self {
        CashflowItem::Fixed(item)
    }
}

impl From<FiniteOutcomeItem> for CashflowItem {
    fn from(item: FiniteOutcomeItem) -> Self {
        CashflowItem::FiniteOutcome(item)
    }
}

impl From<ContinuousItem> for CashflowItem {
    fn from(item: ContinuousItem) -> Self {
        CashflowItem::Continuous(item)
    }
}

/// Constant amount every period
#[derive(Debug, Clone, PartialEq)]
pub struct FixedItem {
    pub name: String,
    pub value: f64,
}

impl FixedItem {
    fn sample(&self) -> Sample {
        Sample {
            label: Label::Amount(self.value),
            value: self.value,
            next: Prior::Value(self.value),
        }
    }
}

/// Discrete outcomes chosen by a Markov transition table
#[derive(Debug, Clone, PartialEq)]
pub struct FiniteOutcomeItem {
    name: String,
    labels: Vec<Arc<str>>,
    values: Vec<f64>,
    table: TransitionTable,
    initial_label: Option<usize>,
}

impl FiniteOutcomeItem {
    /// Build an item from ordered `(label, amount)` outcomes.
    ///
    /// Probability vectors are aligned with the outcome order.
    pub fn new(
        name: impl Into<String>,
        outcomes: Vec<(String, f64)>,
        transitions: &Transitions,
        initial_label: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let name = name.into();
        if outcomes.is_empty() {
            return Err(ConfigError::EmptyOutcomes { item: name });
        }

        let mut seen = FxHashSet::default();
        let mut labels = Vec::with_capacity(outcomes.len());
        let mut values = Vec::with_capacity(outcomes.len());
        for (label, value) in outcomes {
            if !seen.insert(label.clone()) {
                return Err(ConfigError::DuplicateOutcome { item: name, label });
            }
            labels.push(Arc::<str>::from(label));
            values.push(value);
        }

        let initial_label = initial_label
            .map(|label| {
                labels
                    .iter()
                    .position(|l| &**l == label)
                    .ok_or_else(|| ConfigError::UnknownLabel {
                        item: name.clone(),
                        label: label.to_string(),
                    })
            })
            .transpose()?;

        let table = TransitionTable::new(&name, &labels, transitions, initial_label)?;

        Ok(Self {
            name,
            labels,
            values,
            table,
            initial_label,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// `(label, amount)` pairs in declaration order
    pub fn outcomes(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.labels
            .iter()
            .map(|l| &**l)
            .zip(self.values.iter().copied())
    }

    #[must_use]
    pub fn label(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(|l| &**l)
    }

    #[must_use]
    pub fn initial_label(&self) -> Option<&str> {
        self.initial_label.and_then(|i| self.label(i))
    }

    #[must_use]
    pub fn table(&self) -> &TransitionTable {
        &self.table
    }

    /// Labels the chain can reach from its initial condition that have no row
    #[must_use]
    pub fn missing_reachable_rows(&self) -> Vec<&str> {
        self.table
            .missing_reachable_rows()
            .into_iter()
            .filter_map(|i| self.label(i))
            .collect()
    }

    fn row(&self, prior: Option<usize>) -> Result<&TransitionRow, ConfigError> {
        self.table
            .row_for(prior)
            .ok_or_else(|| ConfigError::MissingTransitionRow {
                item: self.name.clone(),
                prior: prior.map(|i| {
                    self.label(i)
                        .map_or_else(|| format!("#{i}"), str::to_string)
                }),
            })
    }

    pub fn sample(
        &self,
        prior: Option<usize>,
        source: &mut dyn VariateSource,
    ) -> Result<Sample, ConfigError> {
        let row = self.row(prior)?;
        let index = row.sample_index(source.uniform());
        Ok(Sample {
            label: Label::Outcome(Arc::clone(&self.labels[index])),
            value: self.values[index],
            next: Prior::Outcome(index),
        })
    }
}

pub type IndependentFn = dyn Fn(&mut dyn VariateSource) -> f64 + Send + Sync;
pub type DependentFn = dyn Fn(f64, &mut dyn VariateSource) -> f64 + Send + Sync;

/// Generating function of a continuous item, tagged by whether it reads the prior
#[derive(Clone)]
pub enum Generator {
    Independent(Arc<IndependentFn>),
    Dependent(Arc<DependentFn>),
}

impl Generator {
    pub fn independent<F>(f: F) -> Self
    where
        F: Fn(&mut dyn VariateSource) -> f64 + Send + Sync + 'static,
    {
        Generator::Independent(Arc::new(f))
    }

    pub fn dependent<F>(f: F) -> Self
    where
        F: Fn(f64, &mut dyn VariateSource) -> f64 + Send + Sync + 'static,
    {
        Generator::Dependent(Arc::new(f))
    }

    /// Fresh draw from `variate` every period
    #[must_use]
    pub fn draw(variate: Variate) -> Self {
        Self::independent(move |source| source.draw(&variate))
    }

    #[must_use]
    pub fn depends_on_prior(&self) -> bool {
        matches!(self, Generator::Dependent(_))
    }
}

impl fmt::Debug for Generator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Generator::Independent(_) => f.write_str("Generator::Independent(..)"),
            Generator::Dependent(_) => f.write_str("Generator::Dependent(..)"),
        }
    }
}

/// Starting amount of a state-dependent continuous item
#[derive(Debug, Clone)]
pub enum InitialValue {
    Fixed(f64),
    /// Drawn once at the start of every run
    Draw(Variate),
}

impl InitialValue {
    fn resolve(&self, source: &mut dyn VariateSource) -> f64 {
        match self {
            InitialValue::Fixed(value) => *value,
            InitialValue::Draw(variate) => source.draw(variate),
        }
    }
}

impl From<f64> for InitialValue {
    fn from(value: f64) -> Self {
        InitialValue::Fixed(value)
    }
}

/// Real-valued amount produced by a generating function
#[derive(Debug, Clone)]
pub struct ContinuousItem {
    name: String,
    generator: Generator,
    initial: Option<InitialValue>,
}

impl ContinuousItem {
    /// State-dependent generators must come with an initial value
    pub fn new(
        name: impl Into<String>,
        generator: Generator,
        initial: Option<InitialValue>,
    ) -> Result<Self, ConfigError> {
        let name = name.into();
        if generator.depends_on_prior() && initial.is_none() {
            return Err(ConfigError::MissingInitialValue { item: name });
        }
        Ok(Self {
            name,
            generator,
            initial,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn initial_value(&self) -> Option<&InitialValue> {
        self.initial.as_ref()
    }

    #[must_use]
    pub fn generator(&self) -> &Generator {
        &self.generator
    }

    /// `prior: None` marks the first period of a run
    pub fn sample(
        &self,
        prior: Option<f64>,
        source: &mut dyn VariateSource,
    ) -> Result<Sample, ConfigError> {
        let value = match &self.generator {
            Generator::Independent(f) => f(source),
            Generator::Dependent(f) => {
                let prior = match (prior, &self.initial) {
                    (Some(prior), _) => prior,
                    (None, Some(initial)) => initial.resolve(source),
                    (None, None) => {
                        return Err(ConfigError::MissingInitialValue {
                            item: self.name.clone(),
                        });
                    }
                };
                f(prior, source)
            }
        };
        Ok(Sample {
            label: Label::Amount(value),
            value,
            next: Prior::Value(value),
        })
    }
}
