//! Budget configuration
//!
//! # Builder DSL
//!
//! ```ignore
//! use budgetsim_core::config::{BudgetBuilder, ContinuousBuilder, FiniteOutcomeBuilder};
//! use budgetsim_core::variate::NamedDistribution;
//!
//! let budget = BudgetBuilder::new()
//!     .fixed("Rent", -1_800.0)
//!     .finite(
//!         FiniteOutcomeBuilder::new("Salary")
//!             .outcome("base", 5_000.0)
//!             .outcome("promoted", 5_600.0)
//!             .initial_label("base")
//!             .transition("base", [0.97, 0.03])
//!             .transition("promoted", [0.0, 1.0]),
//!     )
//!     .continuous(
//!         ContinuousBuilder::new("Groceries").draw(NamedDistribution::Normal {
//!             mean: -600.0,
//!             std_dev: 80.0,
//!         }),
//!     )
//!     .build()?;
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ArgumentError;

pub mod builder;
pub mod generators;
pub mod item_builder;

pub use builder::BudgetBuilder;
pub use generators::{GeneratorSpec, InitialValueSpec};
pub use item_builder::{ContinuousBuilder, FiniteOutcomeBuilder};

/// Validated number of periods to simulate (zero is allowed)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(try_from = "i64", into = "u64")]
pub struct PeriodCount(usize);

impl PeriodCount {
    #[must_use]
    pub const fn new(periods: usize) -> Self {
        Self(periods)
    }

    #[must_use]
    pub const fn get(self) -> usize {
        self.0
    }
}

impl fmt::Display for PeriodCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<usize> for PeriodCount {
    fn from(periods: usize) -> Self {
        Self(periods)
    }
}

impl From<PeriodCount> for u64 {
    fn from(periods: PeriodCount) -> Self {
        periods.0 as u64
    }
}

impl TryFrom<i64> for PeriodCount {
    type Error = ArgumentError;

    fn try_from(raw: i64) -> Result<Self, Self::Error> {
        usize::try_from(raw)
            .map(Self)
            .map_err(|_| ArgumentError::InvalidPeriodCount(raw.to_string()))
    }
}

impl TryFrom<f64> for PeriodCount {
    type Error = ArgumentError;

    fn try_from(raw: f64) -> Result<Self, Self::Error> {
        if !raw.is_finite() || raw < 0.0 || raw.fract() != 0.0 || raw > usize::MAX as f64 {
            return Err(ArgumentError::InvalidPeriodCount(raw.to_string()));
        }
        Ok(Self(raw as usize))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_count_from_integers() {
        assert_eq!(PeriodCount::try_from(12_i64).unwrap().get(), 12);
        assert_eq!(PeriodCount::try_from(0_i64).unwrap().get(), 0);
        assert_eq!(
            PeriodCount::try_from(-1_i64),
            Err(ArgumentError::InvalidPeriodCount("-1".into()))
        );
    }

    #[test]
    fn test_period_count_from_floats() {
        assert_eq!(PeriodCount::try_from(3.0_f64).unwrap().get(), 3);
        assert!(PeriodCount::try_from(2.5_f64).is_err());
        assert!(PeriodCount::try_from(-4.0_f64).is_err());
        assert!(PeriodCount::try_from(f64::NAN).is_err());
        assert!(PeriodCount::try_from(f64::INFINITY).is_err());
    }
}
