//! File-level tests for the CLI front end
//!
//! - `budget_files` - Loading, saving and running YAML budgets from disk
