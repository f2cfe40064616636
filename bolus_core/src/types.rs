//! Core domain types for the Bolus calculator.
//!
//! This module defines the values that flow through a single calculation:
//! - Dose inputs (glucose readings, carbs, and the two ratios)
//! - Dose breakdown (meal, correction, total)
//!
//! Glucose values are mg/dL throughout. Doses are insulin units.

use crate::{Field, ValidationError};
use serde::{Deserialize, Serialize};

// ============================================================================
// Inputs
// ============================================================================

/// A validated parameter set for one dose calculation.
///
/// Fields are private so the only way to obtain a value is through
/// [`DoseInputs::new`], which guarantees strictly positive glucose values and
/// ratios and non-negative carbs.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct DoseInputs {
    current_bg: f64,
    target_bg: f64,
    carbs: f64,
    icr: f64,
    isf: f64,
}

impl DoseInputs {
    /// Build inputs, rejecting anything the calculator cannot divide by or
    /// would misinterpret.
    ///
    /// Non-finite values are rejected alongside out-of-range ones.
    pub fn new(
        current_bg: f64,
        target_bg: f64,
        carbs: f64,
        icr: f64,
        isf: f64,
    ) -> Result<Self, ValidationError> {
        let positive = [
            (Field::CurrentBg, current_bg),
            (Field::TargetBg, target_bg),
            (Field::Icr, icr),
            (Field::Isf, isf),
        ];

        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                tracing::debug!("Rejecting {} = {}: must be > 0", field, value);
                return Err(ValidationError::InvalidMagnitude);
            }
        }

        if !(carbs.is_finite() && carbs >= 0.0) {
            tracing::debug!("Rejecting carbs = {}: must be >= 0", carbs);
            return Err(ValidationError::InvalidMagnitude);
        }

        Ok(Self {
            current_bg,
            target_bg,
            carbs,
            icr,
            isf,
        })
    }

    /// Measured blood glucose (mg/dL)
    pub fn current_bg(&self) -> f64 {
        self.current_bg
    }

    /// Desired blood glucose (mg/dL)
    pub fn target_bg(&self) -> f64 {
        self.target_bg
    }

    /// Carbohydrate to be consumed (grams)
    pub fn carbs(&self) -> f64 {
        self.carbs
    }

    /// Grams of carbohydrate covered by one unit
    pub fn icr(&self) -> f64 {
        self.icr
    }

    /// mg/dL drop per unit
    pub fn isf(&self) -> f64 {
        self.isf
    }
}

// ============================================================================
// Result
// ============================================================================

/// Dose breakdown produced by one calculation
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DoseResult {
    /// Units to cover the meal, never negative
    pub meal_dose: f64,
    /// Units to move glucose to target; negative when already below target
    pub correction_dose: f64,
    /// Units to take, never negative
    pub total_dose: f64,
}

impl DoseResult {
    /// True when the correction asks for less insulin, i.e. glucose is under target
    pub fn below_target(&self) -> bool {
        self.correction_dose < 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_inputs_accepted() {
        let inputs = DoseInputs::new(180.0, 100.0, 60.0, 10.0, 40.0).unwrap();
        assert_eq!(inputs.current_bg(), 180.0);
        assert_eq!(inputs.target_bg(), 100.0);
        assert_eq!(inputs.carbs(), 60.0);
        assert_eq!(inputs.icr(), 10.0);
        assert_eq!(inputs.isf(), 40.0);
    }

    #[test]
    fn test_zero_carbs_accepted() {
        assert!(DoseInputs::new(90.0, 120.0, 0.0, 10.0, 40.0).is_ok());
    }

    #[test]
    fn test_zero_denominators_rejected() {
        assert_eq!(
            DoseInputs::new(180.0, 100.0, 60.0, 0.0, 40.0),
            Err(ValidationError::InvalidMagnitude)
        );
        assert_eq!(
            DoseInputs::new(180.0, 100.0, 60.0, 10.0, 0.0),
            Err(ValidationError::InvalidMagnitude)
        );
    }

    #[test]
    fn test_non_positive_glucose_rejected() {
        assert!(DoseInputs::new(0.0, 100.0, 60.0, 10.0, 40.0).is_err());
        assert!(DoseInputs::new(180.0, -5.0, 60.0, 10.0, 40.0).is_err());
    }

    #[test]
    fn test_negative_carbs_rejected() {
        assert_eq!(
            DoseInputs::new(180.0, 100.0, -1.0, 10.0, 40.0),
            Err(ValidationError::InvalidMagnitude)
        );
    }

    #[test]
    fn test_non_finite_rejected() {
        assert!(DoseInputs::new(f64::NAN, 100.0, 60.0, 10.0, 40.0).is_err());
        assert!(DoseInputs::new(180.0, 100.0, f64::INFINITY, 10.0, 40.0).is_err());
        assert!(DoseInputs::new(180.0, 100.0, 60.0, 10.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_below_target() {
        let result = DoseResult {
            meal_dose: 0.0,
            correction_dose: -0.75,
            total_dose: 0.0,
        };
        assert!(result.below_target());
    }
}
