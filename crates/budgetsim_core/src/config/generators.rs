//! Declarative generating functions for continuous items
//!
//! Closures cannot be written down in a config file, so the common shapes of a
//! continuous cashflow are named here and turned into `Generator`s.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::model::{Generator, InitialValue};
use crate::variate::NamedDistribution;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GeneratorSpec {
    /// Independent draw every period
    Draw { distribution: NamedDistribution },
    /// `prior + step`
    RandomWalk { step: NamedDistribution },
    /// `prior * (1 + rate)`
    Growth { rate: NamedDistribution },
    /// `prior + speed * (mean - prior) + shock`
    MeanReverting {
        mean: f64,
        speed: f64,
        shock: NamedDistribution,
    },
}

impl GeneratorSpec {
    #[must_use]
    pub fn depends_on_prior(&self) -> bool {
        !matches!(self, GeneratorSpec::Draw { .. })
    }

    /// Validate the distributions and build the generating function
    pub fn to_generator(&self) -> Result<Generator, ConfigError> {
        match self {
            GeneratorSpec::Draw { distribution } => Ok(Generator::draw(distribution.build()?)),
            GeneratorSpec::RandomWalk { step } => {
                let step = step.build()?;
                Ok(Generator::dependent(move |prior, source| {
                    prior + source.draw(&step)
                }))
            }
            GeneratorSpec::Growth { rate } => {
                let rate = rate.build()?;
                Ok(Generator::dependent(move |prior, source| {
                    prior * (1.0 + source.draw(&rate))
                }))
            }
            GeneratorSpec::MeanReverting { mean, speed, shock } => {
                if !(0.0..=1.0).contains(speed) {
                    return Err(ConfigError::InvalidDistribution {
                        distribution: "MeanReverting",
                        reason: "speed must be between 0 and 1",
                    });
                }
                let (mean, speed) = (*mean, *speed);
                let shock = shock.build()?;
                Ok(Generator::dependent(move |prior, source| {
                    prior + speed * (mean - prior) + source.draw(&shock)
                }))
            }
        }
    }
}

/// Starting amount of a state-dependent item: a number, or a distribution
/// drawn once per run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InitialValueSpec {
    Fixed(f64),
    Draw(NamedDistribution),
}

impl InitialValueSpec {
    pub fn to_initial_value(&self) -> Result<InitialValue, ConfigError> {
        match self {
            InitialValueSpec::Fixed(value) => Ok(InitialValue::Fixed(*value)),
            InitialValueSpec::Draw(distribution) => Ok(InitialValue::Draw(distribution.build()?)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::ScriptedSource;

    fn constant(value: f64) -> NamedDistribution {
        NamedDistribution::Constant { value }
    }

    fn apply(spec: &GeneratorSpec, prior: f64) -> f64 {
        let mut source = ScriptedSource::new([]);
        match spec.to_generator().unwrap() {
            Generator::Dependent(f) => f(prior, &mut source),
            Generator::Independent(f) => f(&mut source),
        }
    }

    #[test]
    fn test_random_walk_adds_step() {
        let spec = GeneratorSpec::RandomWalk {
            step: constant(-25.0),
        };
        assert!(spec.depends_on_prior());
        assert_eq!(apply(&spec, 100.0), 75.0);
    }

    #[test]
    fn test_growth_compounds() {
        let spec = GeneratorSpec::Growth {
            rate: constant(0.5),
        };
        assert_eq!(apply(&spec, 100.0), 150.0);
    }

    #[test]
    fn test_mean_reverting_pulls_toward_mean() {
        let spec = GeneratorSpec::MeanReverting {
            mean: 200.0,
            speed: 0.25,
            shock: constant(0.0),
        };
        assert_eq!(apply(&spec, 100.0), 125.0);

        let bad = GeneratorSpec::MeanReverting {
            mean: 0.0,
            speed: 1.5,
            shock: constant(0.0),
        };
        assert!(bad.to_generator().is_err());
    }

    #[test]
    fn test_initial_value_spec_validates_distribution() {
        assert!(matches!(
            InitialValueSpec::Fixed(-150.0).to_initial_value(),
            Ok(InitialValue::Fixed(v)) if v == -150.0
        ));
        assert!(matches!(
            InitialValueSpec::Draw(constant(4.0)).to_initial_value(),
            Ok(InitialValue::Draw(_))
        ));
        let bad = InitialValueSpec::Draw(NamedDistribution::Normal {
            mean: -150.0,
            std_dev: -10.0,
        });
        assert!(matches!(
            bad.to_initial_value(),
            Err(ConfigError::InvalidDistribution { .. })
        ));
    }

    #[test]
    fn test_draw_is_independent() {
        let spec = GeneratorSpec::Draw {
            distribution: constant(9.0),
        };
        assert!(!spec.depends_on_prior());
        assert!(!spec.to_generator().unwrap().depends_on_prior());
        assert_eq!(apply(&spec, 1_000.0), 9.0);
    }
}
