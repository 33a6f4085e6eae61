//! Budget Builder
//!
//! Collects items in declaration order. Item construction errors are held
//! until `build`, which reports the first one.

use crate::budget::Budget;
use crate::error::{ConfigError, SimulationError};
use crate::model::CashflowItem;
use crate::variate::NamedDistribution;

use super::item_builder::{ContinuousBuilder, FiniteOutcomeBuilder};

#[derive(Debug, Default)]
pub struct BudgetBuilder {
    items: Vec<Result<CashflowItem, ConfigError>>,
}

impl BudgetBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Items
    // =========================================================================

    /// Same amount every period
    #[must_use]
    pub fn fixed(mut self, name: impl Into<String>, value: f64) -> Self {
        self.items.push(Ok(CashflowItem::fixed(name, value)));
        self
    }

    /// Add an already constructed item
    #[must_use]
    pub fn item(mut self, item: impl Into<CashflowItem>) -> Self {
        self.items.push(Ok(item.into()));
        self
    }

    #[must_use]
    pub fn finite(mut self, builder: FiniteOutcomeBuilder) -> Self {
        self.items.push(builder.build().map(CashflowItem::from));
        self
    }

    #[must_use]
    pub fn continuous(mut self, builder: ContinuousBuilder) -> Self {
        self.items.push(builder.build().map(CashflowItem::from));
        self
    }

    // =========================================================================
    // Shorthands
    // =========================================================================

    /// Continuous item drawn independently from `distribution` every period
    #[must_use]
    pub fn draw(self, name: impl Into<String>, distribution: NamedDistribution) -> Self {
        self.continuous(ContinuousBuilder::new(name).draw(distribution))
    }

    /// Finite-outcome item with the same probabilities every period
    #[must_use]
    pub fn choice<S: Into<String>>(
        self,
        name: impl Into<String>,
        outcomes: impl IntoIterator<Item = (S, f64, f64)>,
    ) -> Self {
        let mut builder = FiniteOutcomeBuilder::new(name);
        let mut probabilities = Vec::new();
        for (label, value, probability) in outcomes {
            builder = builder.outcome(label, value);
            probabilities.push(probability);
        }
        self.finite(builder.independent(probabilities))
    }

    pub fn build(self) -> Result<Budget, SimulationError> {
        let items = self.items.into_iter().collect::<Result<Vec<_>, _>>()?;
        let budget = Budget::new(items)?;
        tracing::debug!(items = budget.len(), "budget built");
        Ok(budget)
    }
}
