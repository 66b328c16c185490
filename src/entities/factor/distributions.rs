use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Allowed slack when checking that probabilities sum to one
const PROBABILITY_TOLERANCE: f64 = 1e-6;

/// Measurement distributions, tagged with their packed type name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "_type")]
pub enum Distribution {
    #[serde(rename = "IncrementalInference.PackedNormal")]
    Normal { mu: f64, sigma: f64 },

    #[serde(rename = "IncrementalInference.PackedRayleigh")]
    Rayleigh { sigma: f64 },

    /// Multivariate normal; `cov` is row-major n×n
    #[serde(rename = "IncrementalInference.PackedFullNormal")]
    FullNormal { mu: Vec<f64>, cov: Vec<f64> },

    #[serde(rename = "IncrementalInference.PackedUniform")]
    Uniform { a: f64, b: f64 },

    #[serde(rename = "IncrementalInference.PackedCategorical")]
    Categorical { p: Vec<f64> },
}

impl Distribution {
    pub fn normal(mu: f64, sigma: f64) -> Result<Self, ValidationError> {
        let dist = Distribution::Normal { mu, sigma };
        dist.validate()?;
        Ok(dist)
    }

    pub fn rayleigh(sigma: f64) -> Result<Self, ValidationError> {
        let dist = Distribution::Rayleigh { sigma };
        dist.validate()?;
        Ok(dist)
    }

    pub fn full_normal(mu: Vec<f64>, cov: Vec<f64>) -> Result<Self, ValidationError> {
        let dist = Distribution::FullNormal { mu, cov };
        dist.validate()?;
        Ok(dist)
    }

    /// Diagonal-covariance normal from per-coordinate standard deviations
    pub fn diagonal_normal(mu: Vec<f64>, sigmas: &[f64]) -> Result<Self, ValidationError> {
        if mu.len() != sigmas.len() {
            return Err(ValidationError::new(
                "cov",
                format!("{} means but {} deviations", mu.len(), sigmas.len()),
            ));
        }
        let n = sigmas.len();
        let mut cov = vec![0.0; n * n];
        for (i, sigma) in sigmas.iter().enumerate() {
            cov[i * n + i] = sigma * sigma;
        }
        Self::full_normal(mu, cov)
    }

    pub fn uniform(a: f64, b: f64) -> Result<Self, ValidationError> {
        let dist = Distribution::Uniform { a, b };
        dist.validate()?;
        Ok(dist)
    }

    pub fn categorical(p: Vec<f64>) -> Result<Self, ValidationError> {
        let dist = Distribution::Categorical { p };
        dist.validate()?;
        Ok(dist)
    }

    /// Packed type name, as written under `_type`
    pub fn type_name(&self) -> &'static str {
        match self {
            Distribution::Normal { .. } => "IncrementalInference.PackedNormal",
            Distribution::Rayleigh { .. } => "IncrementalInference.PackedRayleigh",
            Distribution::FullNormal { .. } => "IncrementalInference.PackedFullNormal",
            Distribution::Uniform { .. } => "IncrementalInference.PackedUniform",
            Distribution::Categorical { .. } => "IncrementalInference.PackedCategorical",
        }
    }

    /// Dimension of the measurement this distribution describes
    pub fn dimension(&self) -> usize {
        match self {
            Distribution::FullNormal { mu, .. } => mu.len(),
            _ => 1,
        }
    }

    /// Check parameter constraints
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            Distribution::Normal { sigma, .. } | Distribution::Rayleigh { sigma } => {
                if !(*sigma > 0.0) {
                    return Err(ValidationError::new(
                        "sigma",
                        format!("must be positive, got {}", sigma),
                    ));
                }
            }
            Distribution::FullNormal { mu, cov } => {
                if mu.is_empty() {
                    return Err(ValidationError::new("mu", "must not be empty"));
                }
                if cov.len() != mu.len() * mu.len() {
                    return Err(ValidationError::new(
                        "cov",
                        format!(
                            "expected {}x{} entries, got {}",
                            mu.len(),
                            mu.len(),
                            cov.len()
                        ),
                    ));
                }
            }
            Distribution::Uniform { a, b } => {
                if !(a < b) {
                    return Err(ValidationError::new(
                        "b",
                        format!("upper bound {} must exceed lower bound {}", b, a),
                    ));
                }
            }
            Distribution::Categorical { p } => {
                if p.is_empty() || p.iter().any(|x| *x < 0.0) {
                    return Err(ValidationError::new(
                        "p",
                        "probabilities must be non-empty and non-negative",
                    ));
                }
                let total: f64 = p.iter().sum();
                if (total - 1.0).abs() > PROBABILITY_TOLERANCE {
                    return Err(ValidationError::new(
                        "p",
                        format!("probabilities sum to {}, not 1", total),
                    ));
                }
            }
        }
        Ok(())
    }
}
