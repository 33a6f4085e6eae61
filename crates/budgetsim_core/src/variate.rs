//! Random variate source
//!
//! The engine needs exactly two things from a random number generator: a
//! uniform draw in `[0, 1)` for discrete outcome selection, and draws from
//! named distributions for continuous generators. `VariateSource` captures that
//! capability so simulations can run against any seeded `rand::Rng`, or against
//! a scripted source in tests.

use rand::Rng;
use rand::distr::{Distribution, Uniform};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Supplier of uniform and named-distribution random draws
pub trait VariateSource {
    /// Draw a uniform variate in `[0, 1)`
    fn uniform(&mut self) -> f64;

    /// Draw from a validated distribution
    fn draw(&mut self, variate: &Variate) -> f64;

    /// Validate `distribution` and draw once from it
    fn draw_named(&mut self, distribution: &NamedDistribution) -> Result<f64, ConfigError> {
        let variate = distribution.build()?;
        Ok(self.draw(&variate))
    }
}

impl<R: Rng> VariateSource for R {
    fn uniform(&mut self) -> f64 {
        self.random::<f64>()
    }

    fn draw(&mut self, variate: &Variate) -> f64 {
        variate.sample(self)
    }
}

/// Serializable description of a distribution.
///
/// Uses struct variants throughout so the internally tagged form stays
/// readable in YAML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum NamedDistribution {
    Constant { value: f64 },
    Uniform { low: f64, high: f64 },
    Normal { mean: f64, std_dev: f64 },
    /// Parameters of the underlying normal (`ln X ~ N(mu, sigma)`)
    LogNormal { mu: f64, sigma: f64 },
    /// Location-scale Student's t for fat-tailed shocks
    StudentT { mean: f64, scale: f64, df: f64 },
    /// Counts, e.g. number of repair bills in a month
    Poisson { lambda: f64 },
    Exponential { rate: f64 },
    Triangular { min: f64, max: f64, mode: f64 },
}

impl NamedDistribution {
    /// Validate parameters and build a sampler
    pub fn build(&self) -> Result<Variate, ConfigError> {
        match *self {
            NamedDistribution::Constant { value } => {
                if value.is_finite() {
                    Ok(Variate::Constant(value))
                } else {
                    Err(ConfigError::InvalidDistribution {
                        distribution: "Constant",
                        reason: "value must be finite",
                    })
                }
            }
            NamedDistribution::Uniform { low, high } => Uniform::new(low, high)
                .map(Variate::Uniform)
                .map_err(|_| ConfigError::InvalidDistribution {
                    distribution: "Uniform",
                    reason: "low must be less than high and both finite",
                }),
            NamedDistribution::Normal { mean, std_dev } => {
                // rand_distr only checks that std_dev is finite
                if !(mean.is_finite() && std_dev.is_finite() && std_dev >= 0.0) {
                    return Err(ConfigError::InvalidDistribution {
                        distribution: "Normal",
                        reason: "mean must be finite and std_dev non-negative and finite",
                    });
                }
                rand_distr::Normal::new(mean, std_dev)
                    .map(Variate::Normal)
                    .map_err(|_| ConfigError::InvalidDistribution {
                        distribution: "Normal",
                        reason: "mean must be finite and std_dev non-negative and finite",
                    })
            }
            NamedDistribution::LogNormal { mu, sigma } => {
                if !(mu.is_finite() && sigma.is_finite() && sigma >= 0.0) {
                    return Err(ConfigError::InvalidDistribution {
                        distribution: "LogNormal",
                        reason: "mu must be finite and sigma non-negative and finite",
                    });
                }
                rand_distr::LogNormal::new(mu, sigma)
                    .map(Variate::LogNormal)
                    .map_err(|_| ConfigError::InvalidDistribution {
                        distribution: "LogNormal",
                        reason: "mu must be finite and sigma non-negative and finite",
                    })
            }
            NamedDistribution::StudentT { mean, scale, df } => {
                if !(scale.is_finite() && scale >= 0.0 && mean.is_finite() && df.is_finite()) {
                    return Err(ConfigError::InvalidDistribution {
                        distribution: "StudentT",
                        reason: "mean, scale and df must be finite, scale non-negative",
                    });
                }
                rand_distr::StudentT::new(df)
                    .map(|dist| Variate::StudentT { mean, scale, dist })
                    .map_err(|_| ConfigError::InvalidDistribution {
                        distribution: "StudentT",
                        reason: "degrees of freedom must be positive and finite",
                    })
            }
            NamedDistribution::Poisson { lambda } => rand_distr::Poisson::new(lambda)
                .map(Variate::Poisson)
                .map_err(|_| ConfigError::InvalidDistribution {
                    distribution: "Poisson",
                    reason: "lambda must be positive and finite",
                }),
            NamedDistribution::Exponential { rate } => {
                // A zero rate would only ever produce infinite amounts
                if !(rate.is_finite() && rate > 0.0) {
                    return Err(ConfigError::InvalidDistribution {
                        distribution: "Exponential",
                        reason: "rate must be positive and finite",
                    });
                }
                rand_distr::Exp::new(rate)
                    .map(Variate::Exponential)
                    .map_err(|_| ConfigError::InvalidDistribution {
                        distribution: "Exponential",
                        reason: "rate must be positive and finite",
                    })
            }
            NamedDistribution::Triangular { min, max, mode } => {
                if !(min.is_finite() && max.is_finite() && mode.is_finite()) {
                    return Err(ConfigError::InvalidDistribution {
                        distribution: "Triangular",
                        reason: "min, max and mode must be finite",
                    });
                }
                rand_distr::Triangular::new(min, max, mode)
                    .map(Variate::Triangular)
                    .map_err(|_| ConfigError::InvalidDistribution {
                        distribution: "Triangular",
                        reason: "requires min <= mode <= max",
                    })
            }
        }
    }
}

/// A validated, ready-to-sample distribution
#[derive(Debug, Clone)]
pub enum Variate {
    Constant(f64),
    Uniform(Uniform<f64>),
    Normal(rand_distr::Normal<f64>),
    LogNormal(rand_distr::LogNormal<f64>),
    StudentT {
        mean: f64,
        scale: f64,
        dist: rand_distr::StudentT<f64>,
    },
    Poisson(rand_distr::Poisson<f64>),
    Exponential(rand_distr::Exp<f64>),
    Triangular(rand_distr::Triangular<f64>),
}

impl Variate {
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match self {
            Variate::Constant(value) => *value,
            Variate::Uniform(d) => d.sample(rng),
            Variate::Normal(d) => d.sample(rng),
            Variate::LogNormal(d) => d.sample(rng),
            Variate::StudentT { mean, scale, dist } => mean + scale * dist.sample(rng),
            Variate::Poisson(d) => Distribution::<f64>::sample(d, rng),
            Variate::Exponential(d) => d.sample(rng),
            Variate::Triangular(d) => d.sample(rng),
        }
    }
}
