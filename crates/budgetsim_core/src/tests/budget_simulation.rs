//! End-to-end tests of `Budget::simulate`
//!
//! These tests verify that:
//! - Fixed items repeat their constant every period
//! - Degenerate rows always yield their single outcome
//! - State-dependent continuous items thread their prior between periods
//! - Zero-period runs keep the column layout
//! - Identically seeded runs are bit-identical

use rand::SeedableRng;
use rand::rngs::StdRng;

use super::ScriptedSource;
use crate::budget::Budget;
use crate::config::{ContinuousBuilder, FiniteOutcomeBuilder, PeriodCount};
use crate::error::ConfigError;
use crate::model::{CashflowItem, FiniteOutcomeItem, Label, Transitions};
use crate::simulation::simulate;
use crate::variate::NamedDistribution;

fn only_item() -> CashflowItem {
    FiniteOutcomeItem::new(
        "bonus",
        vec![("only".into(), 10.0)],
        &Transitions::Independent(vec![1.0]),
        None,
    )
    .unwrap()
    .into()
}

/// A mixed budget exercising every item kind
fn household() -> Budget {
    Budget::builder()
        .fixed("rent", -1_500.0)
        .finite(
            FiniteOutcomeBuilder::new("salary")
                .outcome("base", 4_000.0)
                .outcome("overtime", 4_600.0)
                .outcome("unpaid leave", 0.0)
                .initial_label("base")
                .transition("base", [0.8, 0.15, 0.05])
                .transition("overtime", [0.6, 0.4, 0.0])
                .transition("unpaid leave", [0.5, 0.0, 0.5]),
        )
        .continuous(ContinuousBuilder::new("groceries").draw(NamedDistribution::Normal {
            mean: -500.0,
            std_dev: 60.0,
        }))
        .continuous(
            ContinuousBuilder::new("utilities")
                .dependent_function(|prior, source| prior + source.uniform() - 0.5)
                .initial_value(-120.0),
        )
        .continuous(
            ContinuousBuilder::new("repairs")
                .draw(NamedDistribution::Poisson { lambda: 0.3 }),
        )
        .build()
        .unwrap()
}

#[test]
fn test_fixed_and_degenerate_items() {
    let budget = Budget::new([CashflowItem::fixed("rent", -5.0), only_item()]).unwrap();
    let mut rng = StdRng::seed_from_u64(1);
    let result = budget.simulate(3, &mut rng).unwrap();

    assert_eq!(result.periods(), 3);
    assert_eq!(result.values.columns(), ["rent", "bonus"]);
    for (_, row) in result.values.rows() {
        assert_eq!(row, [-5.0, 10.0]);
    }
    let labels: Vec<&Label> = result.labels.column("bonus").unwrap().collect();
    assert_eq!(labels.len(), 3);
    assert!(labels.iter().all(|l| l.as_outcome() == Some("only")));
    assert!(
        result
            .labels
            .column("rent")
            .unwrap()
            .all(|l| *l == Label::Amount(-5.0))
    );
}

#[test]
fn test_identity_generator_propagates_initial_value() {
    let budget = Budget::builder()
        .continuous(
            ContinuousBuilder::new("savings")
                .dependent_function(|prior, _| prior)
                .initial_value(7.0),
        )
        .build()
        .unwrap();
    let result = budget.simulate(4, &mut ScriptedSource::new([])).unwrap();
    let values: Vec<f64> = result.values.column("savings").unwrap().copied().collect();
    assert_eq!(values, vec![7.0, 7.0, 7.0, 7.0]);
}

#[test]
fn test_fixed_items_constant_for_long_runs() {
    let budget = Budget::new([
        CashflowItem::fixed("rent", -1_250.5),
        CashflowItem::fixed("salary", 3_900.0),
    ])
    .unwrap();
    let mut rng = StdRng::seed_from_u64(99);
    let result = budget.simulate(240, &mut rng).unwrap();
    assert!(result.values.column("rent").unwrap().all(|v| *v == -1_250.5));
    assert!(result.values.column("salary").unwrap().all(|v| *v == 3_900.0));
    assert!((result.final_balance() - 240.0 * 2_649.5).abs() < 1e-6);
}

#[test]
fn test_zero_periods() {
    let budget = household();
    let mut rng = StdRng::seed_from_u64(5);
    let result = budget.simulate(0, &mut rng).unwrap();
    assert_eq!(result.periods(), 0);
    assert!(result.values.is_empty());
    assert_eq!(result.values.columns().len(), budget.len());
    assert_eq!(result.labels.columns().len(), budget.len());
    assert_eq!(result.final_balance(), 0.0);
}

#[test]
fn test_empty_budget() {
    let budget = Budget::new([]).unwrap();
    let mut rng = StdRng::seed_from_u64(5);
    let result = budget.simulate(3, &mut rng).unwrap();
    assert_eq!(result.periods(), 3);
    assert!(result.values.columns().is_empty());
}

#[test]
fn test_degenerate_rows_always_repeat() {
    let budget = Budget::builder()
        .finite(
            FiniteOutcomeBuilder::new("job")
                .outcome("employed", 3_000.0)
                .outcome("retired", 1_200.0)
                .initial_row([1.0, 0.0])
                .transition("employed", [0.0, 1.0])
                .transition("retired", [0.0, 1.0]),
        )
        .build()
        .unwrap();

    let mut rng = StdRng::seed_from_u64(2024);
    let result = budget.simulate(50, &mut rng).unwrap();
    let labels: Vec<&str> = result
        .labels
        .column("job")
        .unwrap()
        .filter_map(Label::as_outcome)
        .collect();
    assert_eq!(labels[0], "employed");
    assert!(labels[1..].iter().all(|l| *l == "retired"));
}

#[test]
fn test_labels_stay_within_outcome_set() {
    let budget = household();
    let allowed = ["base", "overtime", "unpaid leave"];
    for seed in 0..20 {
        let result = simulate(&budget, PeriodCount::new(60), seed).unwrap();
        for label in result.labels.column("salary").unwrap() {
            let outcome = label.as_outcome().unwrap();
            assert!(allowed.contains(&outcome), "unexpected label {outcome}");
        }
        // Values line up with the drawn label
        for period in 1..=result.periods() {
            let label = result.labels.get(period, "salary").unwrap().to_string();
            let value = *result.values.get(period, "salary").unwrap();
            let expected = match label.as_str() {
                "base" => 4_000.0,
                "overtime" => 4_600.0,
                _ => 0.0,
            };
            assert_eq!(value, expected);
        }
    }
}

#[test]
fn test_poisson_counts_are_whole() {
    let budget = household();
    let result = simulate(&budget, PeriodCount::new(120), 3).unwrap();
    assert!(
        result
            .values
            .column("repairs")
            .unwrap()
            .all(|v| v.fract() == 0.0 && *v >= 0.0)
    );
}

#[test]
fn test_seeded_runs_are_bit_identical() {
    let budget = household();
    let first = budget
        .simulate(36, &mut StdRng::seed_from_u64(77))
        .unwrap();
    let second = budget
        .simulate(36, &mut StdRng::seed_from_u64(77))
        .unwrap();
    assert_eq!(first, second);

    let third = budget
        .simulate(36, &mut StdRng::seed_from_u64(78))
        .unwrap();
    assert_ne!(first.values, third.values);
}

#[test]
fn test_budget_reusable_across_runs() {
    // Priors live in the run, so a second run starts from the initial condition again
    let budget = Budget::builder()
        .continuous(
            ContinuousBuilder::new("savings")
                .dependent_function(|prior, _| prior + 1.0)
                .initial_value(0.0),
        )
        .build()
        .unwrap();
    for _ in 0..2 {
        let result = budget.simulate(3, &mut ScriptedSource::new([])).unwrap();
        let values: Vec<f64> = result.values.column("savings").unwrap().copied().collect();
        assert_eq!(values, vec![1.0, 2.0, 3.0]);
    }
}

#[test]
fn test_missing_row_surfaces_during_run() {
    let budget = Budget::builder()
        .finite(
            FiniteOutcomeBuilder::new("car")
                .outcome("fine", 0.0)
                .outcome("broken", -700.0)
                .initial_label("fine")
                .transition("fine", [0.5, 0.5]),
        )
        .build()
        .unwrap();

    let problems = budget.audit();
    assert_eq!(
        problems,
        vec![ConfigError::MissingTransitionRow {
            item: "car".into(),
            prior: Some("broken".into()),
        }]
    );

    // 0.7 lands on "broken", which has nowhere to go
    let err = budget
        .simulate(2, &mut ScriptedSource::new([0.7, 0.7]))
        .unwrap_err();
    assert_eq!(err, problems[0]);

    // Staying on "fine" never touches the gap
    assert!(
        budget
            .simulate(3, &mut ScriptedSource::new([0.1, 0.2, 0.3]))
            .is_ok()
    );
}
