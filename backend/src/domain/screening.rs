//! Screening inputs and outputs for the risk classifier.
//!
//! The classifier consumes a fixed-shape numeric feature vector; field order
//! is part of the contract with the trained artifact and must never change.

use std::fmt;

/// Number of features the trained classifier expects.
pub const FEATURE_COUNT: usize = 8;

/// Raw numeric inputs gathered from the screening form.
///
/// A plain carrier with no invariants; [`FeatureVector::try_from_inputs`]
/// validates it into the domain type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureInputs {
    /// Number of pregnancies.
    pub pregnancies: f64,
    /// Plasma glucose concentration.
    pub glucose: f64,
    /// Diastolic blood pressure (mm Hg).
    pub blood_pressure: f64,
    /// Triceps skin fold thickness (mm).
    pub skin_thickness: f64,
    /// Two-hour serum insulin (mu U/ml).
    pub insulin: f64,
    /// Body mass index.
    pub bmi: f64,
    /// Diabetes pedigree function.
    pub diabetes_pedigree: f64,
    /// Age in years.
    pub age: f64,
}

/// Validation errors returned by [`FeatureVector::try_from_inputs`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeatureVectorError {
    /// A feature was NaN or infinite.
    NotFinite {
        /// Name of the offending field.
        field: &'static str,
    },
}

impl fmt::Display for FeatureVectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFinite { field } => write!(f, "feature '{field}' must be a finite number"),
        }
    }
}

impl std::error::Error for FeatureVectorError {}

/// Ordered, finite feature vector accepted by the classifier.
///
/// ## Invariants
/// - Every component is a finite `f64`.
/// - [`FeatureVector::as_array`] yields components in artifact order:
///   pregnancies, glucose, blood pressure, skin thickness, insulin, BMI,
///   diabetes pedigree function, age.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    /// Validate raw inputs into an ordered feature vector.
    pub fn try_from_inputs(inputs: FeatureInputs) -> Result<Self, FeatureVectorError> {
        let fields = [
            ("pregnancies", inputs.pregnancies),
            ("glucose", inputs.glucose),
            ("bloodPressure", inputs.blood_pressure),
            ("skinThickness", inputs.skin_thickness),
            ("insulin", inputs.insulin),
            ("bmi", inputs.bmi),
            ("diabetesPedigree", inputs.diabetes_pedigree),
            ("age", inputs.age),
        ];
        for (field, value) in fields {
            if !value.is_finite() {
                return Err(FeatureVectorError::NotFinite { field });
            }
        }
        Ok(Self(fields.map(|(_, value)| value)))
    }

    /// Components in the order the trained artifact expects.
    pub fn as_array(&self) -> [f64; FEATURE_COUNT] {
        self.0
    }
}

/// Binary outcome produced by the risk classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskLabel {
    /// Label `0`: low predicted risk.
    Negative,
    /// Label `1`: elevated predicted risk.
    Positive,
}

impl RiskLabel {
    /// Numeric label as the trained model emits it.
    pub fn as_index(self) -> u8 {
        match self {
            Self::Negative => 0,
            Self::Positive => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    fn inputs() -> FeatureInputs {
        FeatureInputs {
            pregnancies: 2.0,
            glucose: 120.0,
            blood_pressure: 70.0,
            skin_thickness: 25.0,
            insulin: 80.0,
            bmi: 28.5,
            diabetes_pedigree: 0.45,
            age: 33.0,
        }
    }

    #[test]
    fn array_order_matches_artifact_contract() {
        let vector = FeatureVector::try_from_inputs(inputs()).expect("valid inputs");
        assert_eq!(
            vector.as_array(),
            [2.0, 120.0, 70.0, 25.0, 80.0, 28.5, 0.45, 33.0]
        );
    }

    #[rstest]
    #[case(f64::NAN, "glucose")]
    #[case(f64::INFINITY, "glucose")]
    fn non_finite_features_are_rejected(#[case] bad: f64, #[case] field: &'static str) {
        let mut raw = inputs();
        raw.glucose = bad;
        let err = FeatureVector::try_from_inputs(raw).expect_err("must fail");
        assert_eq!(err, FeatureVectorError::NotFinite { field });
    }

    #[rstest]
    #[case(RiskLabel::Negative, 0)]
    #[case(RiskLabel::Positive, 1)]
    fn labels_map_to_model_indices(#[case] label: RiskLabel, #[case] expected: u8) {
        assert_eq!(label.as_index(), expected);
    }
}
