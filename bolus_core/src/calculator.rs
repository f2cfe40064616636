//! Bolus dose calculation.
//!
//! The calculation is a pure transform: no I/O, no logging, no retained state.
//! All precondition checking happens when [`DoseInputs`] is constructed.

use crate::{DoseInputs, DoseResult};

/// Compute the meal, correction and total dose for validated inputs.
///
/// - meal = carbs / ICR, floored at zero
/// - correction = (current - target) / ISF, reported as computed
/// - total = raw meal + correction, floored at zero
pub fn compute_dose(inputs: &DoseInputs) -> DoseResult {
    let meal_dose = inputs.carbs() / inputs.icr();

    let bg_difference = inputs.current_bg() - inputs.target_bg();
    let correction_dose = bg_difference / inputs.isf();

    let total_dose = meal_dose + correction_dose;

    DoseResult {
        meal_dose: meal_dose.max(0.0),
        correction_dose,
        total_dose: total_dose.max(0.0),
    }
}
