//! Statistical tests for finite-outcome and continuous items
//!
//! These are probabilistic checks run with fixed seeds and loose tolerances.

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::budget::Budget;
use crate::config::{ContinuousBuilder, FiniteOutcomeBuilder};
use crate::model::{Label, SimulationResult};
use crate::variate::NamedDistribution;

fn outcomes(result: &SimulationResult, item: &str) -> Vec<String> {
    result
        .labels
        .column(item)
        .unwrap()
        .map(Label::to_string)
        .collect()
}

/// Conditional frequency of `target` at period 2 given `given` at period 1
fn conditional_frequency(pairs: &[(String, String)], given: &str, target: &str) -> f64 {
    let matching: Vec<_> = pairs.iter().filter(|(first, _)| first == given).collect();
    let hits = matching.iter().filter(|(_, second)| second == target).count();
    hits as f64 / matching.len() as f64
}

#[test]
fn test_independent_outcomes_ignore_previous_period() {
    let budget = Budget::builder()
        .choice("tips", [("slow", 40.0, 0.3), ("busy", 160.0, 0.7)])
        .build()
        .unwrap();

    let mut rng = StdRng::seed_from_u64(42);
    let pairs: Vec<(String, String)> = (0..20_000)
        .map(|_| {
            let run = budget.simulate(2, &mut rng).unwrap();
            let labels = outcomes(&run, "tips");
            (labels[0].clone(), labels[1].clone())
        })
        .collect();

    let after_slow = conditional_frequency(&pairs, "slow", "slow");
    let after_busy = conditional_frequency(&pairs, "busy", "slow");
    assert!((after_slow - 0.3).abs() < 0.03, "P(slow|slow) = {after_slow}");
    assert!((after_busy - 0.3).abs() < 0.03, "P(slow|busy) = {after_busy}");
}

#[test]
fn test_independent_continuous_draws_uncorrelated() {
    let budget = Budget::builder()
        .continuous(ContinuousBuilder::new("groceries").draw(NamedDistribution::Normal {
            mean: -500.0,
            std_dev: 50.0,
        }))
        .build()
        .unwrap();

    let mut rng = StdRng::seed_from_u64(7);
    let (first, second): (Vec<f64>, Vec<f64>) = (0..10_000)
        .map(|_| {
            let run = budget.simulate(2, &mut rng).unwrap();
            let row1 = run.values.row(1).unwrap()[0];
            let row2 = run.values.row(2).unwrap()[0];
            (row1, row2)
        })
        .unzip();

    let n = first.len() as f64;
    let mean1 = first.iter().sum::<f64>() / n;
    let mean2 = second.iter().sum::<f64>() / n;
    let cov = first
        .iter()
        .zip(&second)
        .map(|(a, b)| (a - mean1) * (b - mean2))
        .sum::<f64>()
        / n;
    let var1 = first.iter().map(|a| (a - mean1).powi(2)).sum::<f64>() / n;
    let var2 = second.iter().map(|b| (b - mean2).powi(2)).sum::<f64>() / n;
    let correlation = cov / (var1 * var2).sqrt();

    assert!(correlation.abs() < 0.05, "correlation {correlation}");
    assert!((mean1 - -500.0).abs() < 2.0);
    assert!((mean2 - -500.0).abs() < 2.0);
}

#[test]
fn test_dependent_chain_reaches_stationary_mix() {
    // Stationary probability of "employed" is 0.5 / (0.1 + 0.5)
    let budget = Budget::builder()
        .finite(
            FiniteOutcomeBuilder::new("job")
                .outcome("employed", 3_000.0)
                .outcome("between jobs", 0.0)
                .initial_label("employed")
                .transition("employed", [0.9, 0.1])
                .transition("between jobs", [0.5, 0.5]),
        )
        .build()
        .unwrap();

    let mut rng = StdRng::seed_from_u64(123);
    let run = budget.simulate(50_000, &mut rng).unwrap();
    let labels = outcomes(&run, "job");
    let employed = labels.iter().filter(|l| *l == "employed").count() as f64 / labels.len() as f64;
    assert!(
        (employed - 5.0 / 6.0).abs() < 0.01,
        "employed share {employed}"
    );
}

#[test]
fn test_dependent_chain_follows_prior_row() {
    // From "employed" the chain never jumps straight to "retired"
    let budget = Budget::builder()
        .finite(
            FiniteOutcomeBuilder::new("job")
                .outcome("employed", 3_000.0)
                .outcome("between jobs", 0.0)
                .outcome("retired", 1_000.0)
                .initial_row([1.0, 0.0, 0.0])
                .transition("employed", [0.8, 0.2, 0.0])
                .transition("between jobs", [0.5, 0.3, 0.2])
                .transition("retired", [0.0, 0.0, 1.0]),
        )
        .build()
        .unwrap();

    let mut rng = StdRng::seed_from_u64(9);
    for _ in 0..200 {
        let run = budget.simulate(24, &mut rng).unwrap();
        let labels = outcomes(&run, "job");
        assert_eq!(labels[0], "employed");
        for window in labels.windows(2) {
            match window[0].as_str() {
                "employed" => assert_ne!(window[1], "retired"),
                "retired" => assert_eq!(window[1], "retired"),
                _ => {}
            }
        }
    }
}
