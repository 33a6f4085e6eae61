//! Command-line front end for the budget simulation engine
//!
//! Loads a YAML budget file, runs a seeded Monte Carlo batch through
//! `budgetsim_core`, and summarizes the resulting balances.

pub mod data;
pub mod logging;
pub mod report;
pub mod runner;

#[cfg(test)]
mod tests;

pub use data::{BudgetData, DataError, load_budget_file, save_budget_file};
pub use logging::init_logging;
pub use report::Report;
pub use runner::{RunOptions, run};
