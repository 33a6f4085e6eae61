//! Monthly budget simulation library
//!
//! A budget is an ordered set of cashflow items stepped forward in lockstep,
//! one draw per item per period. Three kinds of item are supported:
//! - Fixed amounts that never change
//! - Finite-outcome items whose next outcome follows a Markov transition table
//! - Continuous items driven by a generating function, optionally of the
//!   previous period's amount
//!
//! Single runs produce a table of outcome labels and a table of amounts.
//! Monte Carlo runs repeat that many times with reproducible seeding.
//!
//! # Builder DSL
//!
//! ```ignore
//! use budgetsim_core::config::{BudgetBuilder, FiniteOutcomeBuilder, PeriodCount};
//! use budgetsim_core::simulation::simulate;
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
//!     .build()?;
//!
//! let result = simulate(&budget, PeriodCount::new(12), 42)?;
//! println!("{}", result.final_balance());
//! ```

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod budget;
pub mod error;
pub mod simulation;
pub mod variate;

// ============================================================================
// Type definition modules
// ============================================================================

pub mod config;
pub mod model;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use budget::Budget;
pub use config::{
    BudgetBuilder, ContinuousBuilder, FiniteOutcomeBuilder, GeneratorSpec, InitialValueSpec,
    PeriodCount,
};
pub use error::{ArgumentError, ConfigError, SimulationError};
pub use model::{CashflowItem, Generator, Label, SimulationResult, Transitions};
pub use variate::{NamedDistribution, VariateSource};
