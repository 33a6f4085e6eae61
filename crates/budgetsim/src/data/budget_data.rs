use budgetsim_core::config::{
    ContinuousBuilder, FiniteOutcomeBuilder, GeneratorSpec, InitialValueSpec,
};
use budgetsim_core::{Budget, BudgetBuilder, PeriodCount, SimulationError};
use serde::{Deserialize, Serialize};

/// A budget file: simulation defaults plus the ordered item list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetData {
    /// Periods per run, usually months
    #[serde(default = "default_periods")]
    pub periods: PeriodCount,

    #[serde(default = "default_runs")]
    pub runs: usize,

    #[serde(default)]
    pub seed: u64,

    pub items: Vec<ItemData>,
}

fn default_periods() -> PeriodCount {
    PeriodCount::new(12)
}

fn default_runs() -> usize {
    1_000
}

/// YAML-friendly representation of a cashflow item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ItemData {
    Fixed {
        name: String,
        value: f64,
    },
    FiniteOutcome {
        name: String,
        outcomes: Vec<OutcomeData>,
        transitions: TransitionsData,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        initial_label: Option<String>,
    },
    Continuous {
        name: String,
        generator: GeneratorSpec,
        /// A number, or a distribution drawn at the start of each run
        #[serde(default, skip_serializing_if = "Option::is_none")]
        initial_value: Option<InitialValueSpec>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeData {
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TransitionsData {
    /// Same probabilities every period
    Independent { probabilities: Vec<f64> },
    /// One row per previous outcome
    Dependent {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        initial: Option<Vec<f64>>,
        rows: Vec<TransitionRowData>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionRowData {
    pub from: String,
    pub probabilities: Vec<f64>,
}

impl ItemData {
    pub fn name(&self) -> &str {
        match self {
            ItemData::Fixed { name, .. }
            | ItemData::FiniteOutcome { name, .. }
            | ItemData::Continuous { name, .. } => name,
        }
    }

    fn add_to(&self, builder: BudgetBuilder) -> BudgetBuilder {
        match self {
            ItemData::Fixed { name, value } => builder.fixed(name.clone(), *value),
            ItemData::FiniteOutcome {
                name,
                outcomes,
                transitions,
                initial_label,
            } => {
                let item = outcomes
                    .iter()
                    .fold(FiniteOutcomeBuilder::new(name.clone()), |item, outcome| {
                        item.outcome(outcome.label.clone(), outcome.value)
                    });
                let item = match transitions {
                    TransitionsData::Independent { probabilities } => {
                        item.independent(probabilities.clone())
                    }
                    TransitionsData::Dependent { initial, rows } => {
                        let item = match initial {
                            Some(initial) => item.initial_row(initial.clone()),
                            None => item,
                        };
                        rows.iter().fold(item, |item, row| {
                            item.transition(row.from.clone(), row.probabilities.clone())
                        })
                    }
                };
                let item = match initial_label {
                    Some(label) => item.initial_label(label.clone()),
                    None => item,
                };
                builder.finite(item)
            }
            ItemData::Continuous {
                name,
                generator,
                initial_value,
            } => {
                let item = ContinuousBuilder::new(name.clone()).spec(generator.clone());
                builder.continuous(match initial_value {
                    Some(initial) => item.initial(initial.clone()),
                    None => item,
                })
            }
        }
    }
}

impl BudgetData {
    /// Load from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_saphyr::Error> {
        serde_saphyr::from_str(yaml)
    }

    /// Save to YAML string
    pub fn to_yaml(&self) -> Result<String, serde_saphyr::ser::Error> {
        serde_saphyr::to_string(self)
    }

    /// Validate every item and assemble the budget in file order
    pub fn to_budget(&self) -> Result<Budget, SimulationError> {
        self.items
            .iter()
            .fold(BudgetBuilder::new(), |builder, item| item.add_to(builder))
            .build()
    }
}
