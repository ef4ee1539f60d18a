//! Artifact-loaded risk classifier adapter.
//!
//! The trained model ships as a JSON artifact exported from the original
//! training pipeline: a standard scaler (per-feature mean and scale) and a
//! Gaussian naive-Bayes model (per-class log priors, feature means, and
//! feature variances). The artifact is read once at startup; evaluation is
//! pure arithmetic.

use std::path::Path;

use serde::Deserialize;

use crate::domain::ports::{ClassifierError, RiskClassifier};
use crate::domain::{FEATURE_COUNT, FeatureVector, RiskLabel};

/// Number of classes in the binary model.
const CLASS_COUNT: usize = 2;

#[derive(Debug, Deserialize)]
struct ScalerDto {
    mean: Vec<f64>,
    scale: Vec<f64>,
}

#[derive(Debug, Deserialize)]
struct ModelDto {
    class_log_priors: Vec<f64>,
    theta: Vec<Vec<f64>>,
    variance: Vec<Vec<f64>>,
}

#[derive(Debug, Deserialize)]
struct ArtifactDto {
    scaler: ScalerDto,
    model: ModelDto,
}

fn expect_len(name: &str, len: usize, expected: usize) -> Result<(), ClassifierError> {
    if len == expected {
        Ok(())
    } else {
        Err(ClassifierError::artifact(format!(
            "{name} has {len} entries, expected {expected}"
        )))
    }
}

fn expect_rows(name: &str, rows: &[Vec<f64>]) -> Result<(), ClassifierError> {
    expect_len(name, rows.len(), CLASS_COUNT)?;
    for (index, row) in rows.iter().enumerate() {
        expect_len(&format!("{name}[{index}]"), row.len(), FEATURE_COUNT)?;
    }
    Ok(())
}

/// Gaussian naive-Bayes classifier over standardised features.
#[derive(Debug)]
pub struct ArtifactClassifier {
    mean: Vec<f64>,
    scale: Vec<f64>,
    class_log_priors: Vec<f64>,
    theta: Vec<Vec<f64>>,
    variance: Vec<Vec<f64>>,
}

impl ArtifactClassifier {
    /// Load and validate a trained artifact from disk.
    ///
    /// # Errors
    ///
    /// Returns [`ClassifierError::Artifact`] when the file is unreadable, not
    /// valid JSON, or the wrong shape for the 8-feature binary model.
    pub fn from_path(path: &Path) -> Result<Self, ClassifierError> {
        let raw = std::fs::read(path).map_err(|err| {
            ClassifierError::artifact(format!("cannot read {}: {err}", path.display()))
        })?;
        let dto: ArtifactDto = serde_json::from_slice(&raw).map_err(|err| {
            ClassifierError::artifact(format!("invalid JSON in {}: {err}", path.display()))
        })?;
        Self::from_dto(dto)
    }

    fn from_dto(dto: ArtifactDto) -> Result<Self, ClassifierError> {
        expect_len("scaler.mean", dto.scaler.mean.len(), FEATURE_COUNT)?;
        expect_len("scaler.scale", dto.scaler.scale.len(), FEATURE_COUNT)?;
        expect_len(
            "model.class_log_priors",
            dto.model.class_log_priors.len(),
            CLASS_COUNT,
        )?;
        expect_rows("model.theta", &dto.model.theta)?;
        expect_rows("model.variance", &dto.model.variance)?;

        if dto.scaler.scale.iter().any(|scale| *scale <= 0.0) {
            return Err(ClassifierError::artifact(
                "scaler.scale entries must be positive",
            ));
        }
        if dto
            .model
            .variance
            .iter()
            .flatten()
            .any(|variance| *variance <= 0.0)
        {
            return Err(ClassifierError::artifact(
                "model.variance entries must be positive",
            ));
        }

        Ok(Self {
            mean: dto.scaler.mean,
            scale: dto.scaler.scale,
            class_log_priors: dto.model.class_log_priors,
            theta: dto.model.theta,
            variance: dto.model.variance,
        })
    }

    fn standardise(&self, features: &FeatureVector) -> Result<Vec<f64>, ClassifierError> {
        let standardised: Vec<f64> = features
            .as_array()
            .iter()
            .zip(self.mean.iter().zip(self.scale.iter()))
            .map(|(value, (mean, scale))| (value - mean) / scale)
            .collect();

        if standardised.iter().any(|value| !value.is_finite()) {
            return Err(ClassifierError::invalid_features(
                "features overflow after standardisation",
            ));
        }
        Ok(standardised)
    }

    fn log_likelihood(&self, class: usize, standardised: &[f64]) -> f64 {
        let prior = self.class_log_priors.get(class).copied().unwrap_or(0.0);
        standardised
            .iter()
            .zip(
                self.theta
                    .get(class)
                    .into_iter()
                    .flatten()
                    .zip(self.variance.get(class).into_iter().flatten()),
            )
            .fold(prior, |acc, (value, (theta, variance))| {
                let diff = value - theta;
                acc - 0.5 * (2.0 * std::f64::consts::PI * variance).ln()
                    - diff * diff / (2.0 * variance)
            })
    }
}

impl RiskClassifier for ArtifactClassifier {
    fn predict(&self, features: &FeatureVector) -> Result<RiskLabel, ClassifierError> {
        let standardised = self.standardise(features)?;
        let negative = self.log_likelihood(0, &standardised);
        let positive = self.log_likelihood(1, &standardised);

        Ok(if positive > negative {
            RiskLabel::Positive
        } else {
            RiskLabel::Negative
        })
    }
}
