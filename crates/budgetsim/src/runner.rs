//! Runs a budget file through the Monte Carlo engine

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use budgetsim_core::model::{MonteCarloConfig, MonteCarloProgress, MonteCarloResult};
use budgetsim_core::simulation::monte_carlo_simulate_with_progress;
use budgetsim_core::{Budget, PeriodCount};

use crate::data::{BudgetData, DataError};
use crate::report::Report;

const PROGRESS_INTERVAL: Duration = Duration::from_millis(100);

/// Command-line overrides for the settings stored in a budget file
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub periods: Option<PeriodCount>,
    pub runs: Option<usize>,
    pub seed: Option<u64>,
    pub batch_size: Option<usize>,
}

impl RunOptions {
    pub fn resolve(&self, data: &BudgetData) -> MonteCarloConfig {
        let defaults = MonteCarloConfig::default();
        MonteCarloConfig {
            runs: self.runs.unwrap_or(data.runs),
            periods: self.periods.unwrap_or(data.periods).get(),
            seed: self.seed.unwrap_or(data.seed),
            batch_size: self.batch_size.unwrap_or(defaults.batch_size),
        }
    }
}

/// Build the budget described by `data` and summarize a Monte Carlo batch of it
pub fn run(data: &BudgetData, options: &RunOptions) -> Result<Report, DataError> {
    let budget = data.to_budget()?;
    let config = options.resolve(data);

    // Gaps are only fatal once a run reaches them; audit logs each one up front
    let gaps = budget.audit();
    if !gaps.is_empty() {
        tracing::warn!(count = gaps.len(), "runs may fail on missing transition rows");
    }

    tracing::info!(
        items = budget.len(),
        runs = config.runs,
        periods = config.periods,
        seed = config.seed,
        "running simulation"
    );
    let result = run_with_progress(&budget, &config)?;
    Ok(Report::from_result(&result, config.periods, config.seed))
}

/// Run the batch while a reporter thread logs how far it has got
fn run_with_progress(
    budget: &Budget,
    config: &MonteCarloConfig,
) -> Result<MonteCarloResult, DataError> {
    let progress = MonteCarloProgress::new();
    let done = AtomicBool::new(false);

    let result = thread::scope(|scope| {
        scope.spawn(|| {
            while !done.load(Ordering::Relaxed) {
                thread::sleep(PROGRESS_INTERVAL);
                tracing::debug!(
                    completed = progress.completed(),
                    total = config.runs,
                    "simulation progress"
                );
            }
        });
        let result = monte_carlo_simulate_with_progress(budget, config, Some(&progress));
        done.store(true, Ordering::Relaxed);
        result
    });

    Ok(result?)
}
