//! Markov transition tables for finite-outcome items
//!
//! A table maps the prior outcome (or the initial sentinel) to a probability
//! vector over the item's outcomes. Rows are stored as cumulative weights so a
//! draw is a single inverse-CDF scan.

use std::sync::Arc;

use rustc_hash::FxHashSet;

use crate::error::ConfigError;

/// Allowed deviation of a row's sum from 1
pub const PROBABILITY_TOLERANCE: f64 = 1e-6;

/// How an item's next outcome depends on its previous one
#[derive(Debug, Clone, PartialEq)]
pub enum Transitions {
    /// One probability vector used every period
    Independent(Vec<f64>),
    /// One row per prior outcome label, plus an optional row for the first period
    Dependent {
        initial: Option<Vec<f64>>,
        rows: Vec<(String, Vec<f64>)>,
    },
}

impl Transitions {
    #[must_use]
    pub fn depends_on_prior(&self) -> bool {
        matches!(self, Transitions::Dependent { .. })
    }
}

/// A validated probability vector stored as cumulative weights
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionRow {
    cumulative: Vec<f64>,
}

impl TransitionRow {
    pub fn new(item: &str, probabilities: &[f64], outcome_count: usize) -> Result<Self, ConfigError> {
        if probabilities.len() != outcome_count {
            return Err(ConfigError::ProbabilityLength {
                item: item.to_string(),
                expected: outcome_count,
                found: probabilities.len(),
            });
        }

        let mut cumulative = Vec::with_capacity(probabilities.len());
        let mut running = 0.0;
        for (index, &p) in probabilities.iter().enumerate() {
            if !p.is_finite() {
                return Err(ConfigError::NonFiniteProbability {
                    item: item.to_string(),
                    index,
                });
            }
            if p < 0.0 {
                return Err(ConfigError::NegativeProbability {
                    item: item.to_string(),
                    index,
                    value: p,
                });
            }
            running += p;
            cumulative.push(running);
        }

        if (running - 1.0).abs() > PROBABILITY_TOLERANCE {
            return Err(ConfigError::ProbabilitySum {
                item: item.to_string(),
                sum: running,
            });
        }

        Ok(Self { cumulative })
    }

    /// Probability of each outcome, recovered from the cumulative weights
    #[must_use]
    pub fn probabilities(&self) -> Vec<f64> {
        let mut previous = 0.0;
        self.cumulative
            .iter()
            .map(|&c| {
                let p = c - previous;
                previous = c;
                p
            })
            .collect()
    }

    /// Pick the first outcome whose cumulative weight strictly exceeds `u`.
    ///
    /// A row summing to slightly less than 1 can leave `u` past the last
    /// weight; that draw goes to the last outcome with non-zero probability.
    #[must_use]
    pub fn sample_index(&self, u: f64) -> usize {
        if let Some(index) = self.cumulative.iter().position(|&c| c > u) {
            return index;
        }
        self.last_positive()
    }

    fn last_positive(&self) -> usize {
        let mut previous = 0.0;
        let mut last = 0;
        for (index, &c) in self.cumulative.iter().enumerate() {
            if c > previous {
                last = index;
            }
            previous = c;
        }
        last
    }

    /// Outcomes this row can produce
    pub fn support(&self) -> impl Iterator<Item = usize> + '_ {
        let mut previous = 0.0;
        self.cumulative.iter().enumerate().filter_map(move |(i, &c)| {
            let positive = c > previous;
            previous = c;
            positive.then_some(i)
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
enum InitialCondition {
    Row(TransitionRow),
    /// First draw conditions on this outcome's own row
    Label(usize),
}

#[derive(Debug, Clone, PartialEq)]
enum Rows {
    Independent(TransitionRow),
    Dependent {
        initial: InitialCondition,
        rows: Vec<Option<TransitionRow>>,
    },
}

/// Validated transition table backing a finite-outcome item
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionTable {
    rows: Rows,
}

impl TransitionTable {
    /// Validate `transitions` against the item's ordered outcome labels.
    ///
    /// For state-dependent tables the first period uses the explicit initial
    /// row when one is given, otherwise the row of `initial_label`.
    pub fn new(
        item: &str,
        labels: &[Arc<str>],
        transitions: &Transitions,
        initial_label: Option<usize>,
    ) -> Result<Self, ConfigError> {
        let outcome_count = labels.len();
        match transitions {
            Transitions::Independent(probabilities) => Ok(Self {
                rows: Rows::Independent(TransitionRow::new(item, probabilities, outcome_count)?),
            }),
            Transitions::Dependent { initial, rows } => {
                let mut table: Vec<Option<TransitionRow>> = vec![None; outcome_count];
                let mut seen = FxHashSet::default();

                for (label, probabilities) in rows {
                    let index = labels
                        .iter()
                        .position(|l| **l == **label)
                        .ok_or_else(|| ConfigError::UnknownLabel {
                            item: item.to_string(),
                            label: label.clone(),
                        })?;
                    if !seen.insert(index) {
                        return Err(ConfigError::DuplicateTransitionRow {
                            item: item.to_string(),
                            label: label.clone(),
                        });
                    }
                    table[index] = Some(TransitionRow::new(item, probabilities, outcome_count)?);
                }

                let initial = match (initial, initial_label) {
                    (Some(probabilities), _) => InitialCondition::Row(TransitionRow::new(
                        item,
                        probabilities,
                        outcome_count,
                    )?),
                    (None, Some(index)) => {
                        if table.get(index).is_none_or(Option::is_none) {
                            return Err(ConfigError::MissingTransitionRow {
                                item: item.to_string(),
                                prior: labels.get(index).map(|l| l.to_string()),
                            });
                        }
                        InitialCondition::Label(index)
                    }
                    (None, None) => {
                        return Err(ConfigError::MissingInitialCondition {
                            item: item.to_string(),
                        });
                    }
                };

                Ok(Self {
                    rows: Rows::Dependent {
                        initial,
                        rows: table,
                    },
                })
            }
        }
    }

    #[must_use]
    pub fn depends_on_prior(&self) -> bool {
        matches!(self.rows, Rows::Dependent { .. })
    }

    /// Row governing the next draw; `prior: None` means nothing has been sampled yet
    #[must_use]
    pub fn row_for(&self, prior: Option<usize>) -> Option<&TransitionRow> {
        match &self.rows {
            Rows::Independent(row) => Some(row),
            Rows::Dependent { initial, rows } => {
                let index = match (prior, initial) {
                    (None, InitialCondition::Row(row)) => return Some(row),
                    (None, InitialCondition::Label(index)) => *index,
                    (Some(index), _) => index,
                };
                rows.get(index).and_then(Option::as_ref)
            }
        }
    }

    /// Outcomes reachable from the initial condition that have no row.
    ///
    /// Returned indices are sorted. Always empty for state-independent tables.
    #[must_use]
    pub fn missing_reachable_rows(&self) -> Vec<usize> {
        let Rows::Dependent { rows, .. } = &self.rows else {
            return Vec::new();
        };

        let mut visited = FxHashSet::default();
        let mut missing = Vec::new();
        let mut frontier: Vec<usize> = self
            .row_for(None)
            .map(|row| row.support().collect())
            .unwrap_or_default();

        while let Some(index) = frontier.pop() {
            if !visited.insert(index) {
                continue;
            }
            match rows.get(index).and_then(Option::as_ref) {
                Some(row) => frontier.extend(row.support().filter(|i| !visited.contains(i))),
                None => missing.push(index),
            }
        }

        missing.sort_unstable();
        missing
    }
}
