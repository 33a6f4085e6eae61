//! YAML budget files
//!
//! File layout:
//! ```yaml
//! periods: 12
//! runs: 1000
//! seed: 42
//! items:
//!   - type: Fixed
//!     name: Rent
//!     value: -1800
//!   - type: FiniteOutcome
//!     name: Salary
//!     outcomes:
//!       - { label: base, value: 5000 }
//!       - { label: promoted, value: 5600 }
//!     initial_label: base
//!     transitions:
//!       type: Dependent
//!       rows:
//!         - { from: base, probabilities: [0.97, 0.03] }
//!         - { from: promoted, probabilities: [0.0, 1.0] }
//!   - type: Continuous
//!     name: Groceries
//!     generator:
//!       type: Draw
//!       distribution: { type: Normal, mean: -600, std_dev: 80 }
//! ```

pub mod budget_data;

use std::fmt;
use std::fs;
use std::path::Path;

use budgetsim_core::SimulationError;

pub use budget_data::{BudgetData, ItemData, OutcomeData, TransitionRowData, TransitionsData};

/// Error types for loading budget files
#[derive(Debug)]
pub enum DataError {
    Io(String),
    Parse(String),
    Serialize(String),
    /// The file parsed but describes an invalid budget
    Invalid(SimulationError),
}

impl fmt::Display for DataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataError::Io(msg) => write!(f, "IO error: {msg}"),
            DataError::Parse(msg) => write!(f, "Parse error: {msg}"),
            DataError::Serialize(msg) => write!(f, "Serialization error: {msg}"),
            DataError::Invalid(err) => write!(f, "Invalid budget: {err}"),
        }
    }
}

impl std::error::Error for DataError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DataError::Invalid(err) => Some(err),
            _ => None,
        }
    }
}

impl From<SimulationError> for DataError {
    fn from(err: SimulationError) -> Self {
        DataError::Invalid(err)
    }
}

/// Read and parse a budget file
pub fn load_budget_file(path: &Path) -> Result<BudgetData, DataError> {
    let content = fs::read_to_string(path)
        .map_err(|e| DataError::Io(format!("{}: {e}", path.display())))?;
    let data = BudgetData::from_yaml(&content).map_err(|e| DataError::Parse(e.to_string()))?;
    tracing::debug!(path = %path.display(), items = data.items.len(), "loaded budget file");
    Ok(data)
}

pub fn save_budget_file(path: &Path, data: &BudgetData) -> Result<(), DataError> {
    let yaml = data
        .to_yaml()
        .map_err(|e| DataError::Serialize(e.to_string()))?;
    fs::write(path, yaml).map_err(|e| DataError::Io(format!("{}: {e}", path.display())))
}
