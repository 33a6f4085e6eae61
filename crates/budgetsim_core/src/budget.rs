//! Budget: an ordered, name-unique collection of cashflow items stepped in lockstep

use rustc_hash::FxHashSet;

use crate::config::{BudgetBuilder, PeriodCount};
use crate::error::{ArgumentError, ConfigError};
use crate::model::{CashflowItem, PeriodTable, Prior, SimulationResult};
use crate::variate::VariateSource;

/// Items are configuration only. Every `simulate` call starts each item from
/// its own initial condition, so one `Budget` can serve many independent runs
/// at once.
#[derive(Debug, Clone)]
pub struct Budget {
    items: Vec<CashflowItem>,
}

impl Budget {
    /// Assemble a budget, rejecting duplicate item names
    pub fn new(items: impl IntoIterator<Item = CashflowItem>) -> Result<Self, ArgumentError> {
        let items: Vec<CashflowItem> = items.into_iter().collect();
        let mut names = FxHashSet::default();
        for item in &items {
            if !names.insert(item.name()) {
                return Err(ArgumentError::DuplicateItemName(item.name().to_string()));
            }
        }
        Ok(Self { items })
    }

    #[must_use]
    pub fn builder() -> BudgetBuilder {
        BudgetBuilder::new()
    }

    #[must_use]
    pub fn items(&self) -> &[CashflowItem] {
        &self.items
    }

    #[must_use]
    pub fn item(&self, name: &str) -> Option<&CashflowItem> {
        self.items.iter().find(|item| item.name() == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.items.iter().map(CashflowItem::name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Step every item forward for `periods` periods.
    ///
    /// Within a period items are sampled in declaration order; each item's
    /// output becomes its own prior for the next period. Any error aborts the
    /// run and no partial tables are returned.
    pub fn simulate(
        &self,
        periods: usize,
        source: &mut dyn VariateSource,
    ) -> Result<SimulationResult, ConfigError> {
        let _span =
            tracing::debug_span!("simulate", items = self.items.len(), periods).entered();

        let columns: Vec<String> = self.names().map(str::to_string).collect();
        let mut labels = PeriodTable::with_capacity(columns.clone(), periods);
        let mut values = PeriodTable::with_capacity(columns, periods);

        let mut priors = vec![Prior::Initial; self.items.len()];
        let mut label_row = Vec::with_capacity(self.items.len());
        let mut value_row = Vec::with_capacity(self.items.len());

        for _ in 0..periods {
            for (item, prior) in self.items.iter().zip(priors.iter_mut()) {
                let sample = item.sample(*prior, source)?;
                *prior = sample.next;
                label_row.push(sample.label);
                value_row.push(sample.value);
            }
            labels.push_row(label_row.drain(..));
            values.push_row(value_row.drain(..));
        }

        Ok(SimulationResult { labels, values })
    }

    pub fn simulate_periods(
        &self,
        periods: PeriodCount,
        source: &mut dyn VariateSource,
    ) -> Result<SimulationResult, ConfigError> {
        self.simulate(periods.get(), source)
    }

    /// Report transition rows a chain can reach but does not define.
    ///
    /// Such gaps only fail a run once the chain actually lands on the label, so
    /// this is a way to catch them before simulating.
    pub fn audit(&self) -> Vec<ConfigError> {
        let mut problems = Vec::new();
        for item in &self.items {
            let CashflowItem::FiniteOutcome(finite) = item else {
                continue;
            };
            for label in finite.missing_reachable_rows() {
                tracing::warn!(
                    item = finite.name(),
                    label,
                    "reachable outcome has no transition row"
                );
                problems.push(ConfigError::MissingTransitionRow {
                    item: finite.name().to_string(),
                    prior: Some(label.to_string()),
                });
            }
        }
        problems
    }
}
