//! Simulation results
//!
//! A run produces two aligned tables: outcome labels and numeric values, each
//! with one row per period (1-based) and one column per item in budget order.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use serde::{Serialize, Serializer};

/// Label cell: the outcome name for finite-outcome items, the amount itself otherwise
#[derive(Debug, Clone, PartialEq)]
pub enum Label {
    Outcome(Arc<str>),
    Amount(f64),
}

impl Label {
    #[must_use]
    pub fn as_outcome(&self) -> Option<&str> {
        match self {
            Label::Outcome(name) => Some(&**name),
            Label::Amount(_) => None,
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Outcome(name) => f.write_str(name),
            Label::Amount(value) => write!(f, "{value}"),
        }
    }
}

impl Serialize for Label {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Label::Outcome(name) => serializer.serialize_str(name),
            Label::Amount(value) => serializer.serialize_f64(*value),
        }
    }
}

/// Upper bound on cells reserved up front; longer runs grow as they go
const MAX_RESERVED_CELLS: usize = 1 << 20;

/// Period-by-item table stored row-major
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodTable<T> {
    columns: Vec<String>,
    periods: usize,
    cells: Vec<T>,
}

impl<T> PeriodTable<T> {
    pub(crate) fn with_capacity(columns: Vec<String>, periods: usize) -> Self {
        let reserved = columns
            .len()
            .checked_mul(periods)
            .map_or(MAX_RESERVED_CELLS, |cells| cells.min(MAX_RESERVED_CELLS));
        let cells = Vec::with_capacity(reserved);
        Self {
            columns,
            periods: 0,
            cells,
        }
    }

    /// Append one period's cells in column order
    pub(crate) fn push_row(&mut self, row: impl IntoIterator<Item = T>) {
        self.cells.extend(row);
        self.periods += 1;
        debug_assert_eq!(self.cells.len(), self.periods * self.columns.len());
    }

    #[must_use]
    pub fn periods(&self) -> usize {
        self.periods
    }

    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.periods == 0
    }

    /// Cells for `period`, counted from 1
    #[must_use]
    pub fn row(&self, period: usize) -> Option<&[T]> {
        if period == 0 || period > self.periods {
            return None;
        }
        let width = self.columns.len();
        let start = (period - 1) * width;
        Some(&self.cells[start..start + width])
    }

    /// `(period, cells)` pairs in period order
    pub fn rows(&self) -> impl Iterator<Item = (usize, &[T])> + '_ {
        let width = self.columns.len();
        (1..=self.periods).map(move |p| (p, &self.cells[(p - 1) * width..p * width]))
    }

    /// Every period's cell for the named item
    #[must_use]
    pub fn column(&self, name: &str) -> Option<impl Iterator<Item = &T> + '_> {
        let index = self.columns.iter().position(|c| c == name)?;
        let width = self.columns.len();
        Some(self.cells.iter().skip(index).step_by(width))
    }

    #[must_use]
    pub fn get(&self, period: usize, name: &str) -> Option<&T> {
        let index = self.columns.iter().position(|c| c == name)?;
        self.row(period).map(|row| &row[index])
    }
}

impl PeriodTable<f64> {
    /// Net amount across all items for each period
    #[must_use]
    pub fn period_totals(&self) -> Vec<f64> {
        self.rows().map(|(_, row)| row.iter().sum()).collect()
    }

    /// Running balance: cumulative sum of the period totals
    #[must_use]
    pub fn cumulative_totals(&self) -> Vec<f64> {
        let mut balance = 0.0;
        self.period_totals()
            .into_iter()
            .map(|total| {
                balance += total;
                balance
            })
            .collect()
    }
}

/// Output of one simulation run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationResult {
    pub labels: PeriodTable<Label>,
    pub values: PeriodTable<f64>,
}

impl SimulationResult {
    #[must_use]
    pub fn periods(&self) -> usize {
        self.values.periods()
    }

    /// Cumulative balance after the last period (0 for an empty run)
    #[must_use]
    pub fn final_balance(&self) -> f64 {
        self.values.cumulative_totals().last().copied().unwrap_or(0.0)
    }
}

/// Settings for a batch of independent runs
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonteCarloConfig {
    pub runs: usize,
    pub periods: usize,
    /// Master seed; every run derives its own stream from it
    pub seed: u64,
    /// Runs per independently seeded batch
    pub batch_size: usize,
}

impl Default for MonteCarloConfig {
    fn default() -> Self {
        Self {
            runs: 1_000,
            periods: 12,
            seed: 0,
            batch_size: 100,
        }
    }
}

/// Shared progress counter and cancel flag for Monte Carlo runs.
///
/// Cancellation is checked before each run starts; a run in progress always
/// completes.
#[derive(Debug, Default)]
pub struct MonteCarloProgress {
    completed: AtomicUsize,
    cancelled: AtomicBool,
}

impl MonteCarloProgress {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::Relaxed)
    }

    pub(crate) fn record_run(&self) {
        self.completed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Results from Monte Carlo simulation (multiple runs)
#[derive(Debug, Clone, Serialize)]
pub struct MonteCarloResult {
    pub runs: Vec<SimulationResult>,
}

impl MonteCarloResult {
    /// Final cumulative balance of every run, in run order
    #[must_use]
    pub fn final_balances(&self) -> Vec<f64> {
        self.runs.iter().map(SimulationResult::final_balance).collect()
    }

    /// Cumulative balance paths, one per run
    #[must_use]
    pub fn balance_paths(&self) -> Vec<Vec<f64>> {
        self.runs
            .iter()
            .map(|run| run.values.cumulative_totals())
            .collect()
    }
}
