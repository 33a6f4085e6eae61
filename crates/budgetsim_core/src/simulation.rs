use rand::rngs::SmallRng;
use rand::{RngCore, SeedableRng};
#[cfg(feature = "parallel")]
use rayon::iter::{IntoParallelIterator, ParallelIterator};

use crate::budget::Budget;
use crate::config::PeriodCount;
use crate::error::{Result, SimulationError};
use crate::model::{MonteCarloConfig, MonteCarloProgress, MonteCarloResult, SimulationResult};

/// Golden-ratio increment used to spread batch seeds apart
const BATCH_SEED_MIX: u64 = 0x9e37_79b9_7f4a_7c15;

/// Run `budget` once with a generator seeded from `seed`
pub fn simulate(budget: &Budget, periods: PeriodCount, seed: u64) -> Result<SimulationResult> {
    let mut rng = SmallRng::seed_from_u64(seed);
    Ok(budget.simulate(periods.get(), &mut rng)?)
}

pub fn monte_carlo_simulate(budget: &Budget, config: &MonteCarloConfig) -> Result<MonteCarloResult> {
    monte_carlo_simulate_with_progress(budget, config, None)
}

/// Run `config.runs` independent simulations.
///
/// Runs are grouped into batches; each batch seeds its own generator from the
/// master seed and hands a fresh seed to every run, so results are identical
/// for a given seed whether or not the batches execute in parallel.
pub fn monte_carlo_simulate_with_progress(
    budget: &Budget,
    config: &MonteCarloConfig,
    progress: Option<&MonteCarloProgress>,
) -> Result<MonteCarloResult> {
    let batch_size = config.batch_size.max(1);
    let num_batches = config.runs.div_ceil(batch_size);
    tracing::debug!(
        runs = config.runs,
        periods = config.periods,
        batches = num_batches,
        "starting monte carlo"
    );

    let run_batch = |batch: usize| -> Result<Vec<SimulationResult>> {
        let mut batch_rng =
            SmallRng::seed_from_u64(config.seed ^ (batch as u64).wrapping_mul(BATCH_SEED_MIX));
        let len = if batch == num_batches - 1 {
            config.runs - batch * batch_size
        } else {
            batch_size
        };

        let mut results = Vec::with_capacity(len);
        for _ in 0..len {
            if progress.is_some_and(MonteCarloProgress::is_cancelled) {
                return Err(SimulationError::Cancelled);
            }
            let mut rng = SmallRng::seed_from_u64(batch_rng.next_u64());
            results.push(budget.simulate(config.periods, &mut rng)?);
            if let Some(progress) = progress {
                progress.record_run();
            }
        }
        Ok(results)
    };

    #[cfg(feature = "parallel")]
    let batches: Vec<Vec<SimulationResult>> = (0..num_batches)
        .into_par_iter()
        .map(run_batch)
        .collect::<Result<_>>()?;

    #[cfg(not(feature = "parallel"))]
    let batches: Vec<Vec<SimulationResult>> =
        (0..num_batches).map(run_batch).collect::<Result<_>>()?;

    let runs: Vec<SimulationResult> = batches.into_iter().flatten().collect();
    tracing::debug!(runs = runs.len(), "monte carlo complete");
    Ok(MonteCarloResult { runs })
}
