mod item;
mod markov;
mod results;

pub use item::{
    CashflowItem, ContinuousItem, DependentFn, FiniteOutcomeItem, FixedItem, Generator,
    IndependentFn, InitialValue, Prior, Sample,
};
pub use markov::{PROBABILITY_TOLERANCE, TransitionRow, TransitionTable, Transitions};
pub use results::{
    Label, MonteCarloConfig, MonteCarloProgress, MonteCarloResult, PeriodTable, SimulationResult,
};
