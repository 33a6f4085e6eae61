//! Monte Carlo summary report
//!
//! Reduces a batch of runs to the statistics printed by the CLI: the spread of
//! the final cumulative balance, the median balance path, and the average
//! amount of each item.

use std::fmt;

use budgetsim_core::model::MonteCarloResult;
use serde::Serialize;

/// Percentiles reported for the final balance (as fractions)
pub const REPORT_PERCENTILES: [f64; 5] = [0.05, 0.25, 0.50, 0.75, 0.95];

/// Linearly interpolated percentile of already sorted values
///
/// Returns `None` for an empty slice.
pub fn percentile(sorted: &[f64], p: f64) -> Option<f64> {
    let last = sorted.len().checked_sub(1)?;
    let rank = p.clamp(0.0, 1.0) * last as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let weight = rank - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * weight)
}

fn sorted(values: impl IntoIterator<Item = f64>) -> Vec<f64> {
    let mut values: Vec<f64> = values.into_iter().collect();
    values.sort_by(f64::total_cmp);
    values
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Distribution {
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    /// `(percentile, value)` pairs, percentile as a fraction
    pub percentiles: Vec<(f64, f64)>,
}

impl Distribution {
    pub fn from_values(values: impl IntoIterator<Item = f64>) -> Option<Self> {
        let values = sorted(values);
        let n = values.len() as f64;
        let (&min, &max) = (values.first()?, values.last()?);
        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        let percentiles = REPORT_PERCENTILES
            .iter()
            .filter_map(|&p| percentile(&values, p).map(|v| (p, v)))
            .collect();
        Some(Self {
            mean,
            std_dev: variance.sqrt(),
            min,
            max,
            percentiles,
        })
    }

    pub fn percentile(&self, p: f64) -> Option<f64> {
        self.percentiles
            .iter()
            .find(|(q, _)| (q - p).abs() < 1e-9)
            .map(|(_, v)| *v)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemSummary {
    pub name: String,
    /// Average amount per period across all runs
    pub mean: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub runs: usize,
    pub periods: usize,
    pub seed: u64,
    /// Cumulative balance after the last period; `None` when nothing ran
    pub final_balance: Option<Distribution>,
    /// Median cumulative balance at the end of each period
    pub median_path: Vec<f64>,
    pub items: Vec<ItemSummary>,
}

impl Report {
    pub fn from_result(result: &MonteCarloResult, periods: usize, seed: u64) -> Self {
        let paths = result.balance_paths();
        let median_path = (0..periods)
            .filter_map(|t| {
                let column = sorted(paths.iter().filter_map(|path| path.get(t).copied()));
                percentile(&column, 0.5)
            })
            .collect();

        let items = result
            .runs
            .first()
            .map(|run| run.values.columns().to_vec())
            .unwrap_or_default()
            .into_iter()
            .map(|name| {
                let (total, count) = result
                    .runs
                    .iter()
                    .filter_map(|run| run.values.column(&name))
                    .flatten()
                    .fold((0.0, 0_usize), |(total, count), v| (total + v, count + 1));
                let mean = if count == 0 { 0.0 } else { total / count as f64 };
                ItemSummary { name, mean }
            })
            .collect();

        Self {
            runs: result.runs.len(),
            periods,
            seed,
            final_balance: Distribution::from_values(result.final_balances()),
            median_path,
            items,
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} runs x {} periods (seed {})",
            self.runs, self.periods, self.seed
        )?;

        if !self.items.is_empty() {
            writeln!(f)?;
            writeln!(f, "Average per period")?;
            let width = self.items.iter().map(|i| i.name.len()).max().unwrap_or(0);
            for item in &self.items {
                writeln!(f, "  {:<width$}  {:>12.2}", item.name, item.mean)?;
            }
        }

        let Some(balance) = &self.final_balance else {
            return Ok(());
        };
        writeln!(f)?;
        writeln!(f, "Final balance")?;
        writeln!(f, "  mean     {:>12.2}", balance.mean)?;
        writeln!(f, "  std dev  {:>12.2}", balance.std_dev)?;
        writeln!(f, "  min      {:>12.2}", balance.min)?;
        for (p, value) in &balance.percentiles {
            writeln!(f, "  P{:<7}{:>12.2}", (p * 100.0).round(), value)?;
        }
        writeln!(f, "  max      {:>12.2}", balance.max)?;

        if !self.median_path.is_empty() {
            writeln!(f)?;
            writeln!(f, "Median balance by period")?;
            for (t, value) in self.median_path.iter().enumerate() {
                writeln!(f, "  {:>4}  {:>12.2}", t + 1, value)?;
            }
        }
        Ok(())
    }
}
