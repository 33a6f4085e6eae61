//! Integration tests for the budget simulation engine
//!
//! Tests are organized by topic:
//! - `budget_simulation` - End-to-end runs of small budgets
//! - `markov_chains` - Statistical behavior of finite-outcome items
//! - `monte_carlo` - Batched, seeded multi-run simulation
//! - `builder_dsl` - Builder DSL for fluent budget setup

use std::collections::VecDeque;

use crate::variate::{Variate, VariateSource};

mod budget_simulation;
mod markov_chains;

/// Variate source that replays a fixed script.
///
/// `uniform` and non-constant `draw`s consume the script in order. Constant
/// variates return their value without consuming anything.
#[derive(Debug, Clone)]
pub(crate) struct ScriptedSource {
    script: VecDeque<f64>,
}

impl ScriptedSource {
    pub(crate) fn new(script: impl IntoIterator<Item = f64>) -> Self {
        Self {
            script: script.into_iter().collect(),
        }
    }

    fn pop(&mut self) -> f64 {
        self.script
            .pop_front()
            .expect("scripted variate source ran out of values")
    }
}

impl VariateSource for ScriptedSource {
    fn uniform(&mut self) -> f64 {
        self.pop()
    }

    fn draw(&mut self, variate: &Variate) -> f64 {
        match variate {
            Variate::Constant(value) => *value,
            _ => self.pop(),
        }
    }
}
