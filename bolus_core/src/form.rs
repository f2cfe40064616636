//! Form controller sitting in front of the calculator.
//!
//! Raw text from the user is checked in a fixed order (settings present,
//! required fields filled, text numeric, magnitudes in range) and only a fully
//! valid request reaches [`compute_dose`].

use crate::{compute_dose, DoseInputs, DoseResult, Field, RatioSettings, ValidationError};

/// Raw dose request as typed by the user
#[derive(Clone, Debug, Default)]
pub struct DoseForm {
    pub current_bg: String,
    pub target_bg: String,
    /// Blank means no carbs
    pub carbs: String,
}

impl DoseForm {
    pub fn new(
        current_bg: impl Into<String>,
        target_bg: impl Into<String>,
        carbs: impl Into<String>,
    ) -> Self {
        Self {
            current_bg: current_bg.into(),
            target_bg: target_bg.into(),
            carbs: carbs.into(),
        }
    }

    /// Merge the form with stored ratios and validate the result.
    pub fn validate(&self, settings: &RatioSettings) -> Result<DoseInputs, ValidationError> {
        if !settings.is_configured() {
            tracing::debug!("Ratios not configured, refusing to calculate");
            return Err(ValidationError::UnconfiguredRatios);
        }

        for (field, text) in [
            (Field::CurrentBg, &self.current_bg),
            (Field::TargetBg, &self.target_bg),
        ] {
            if text.trim().is_empty() {
                tracing::debug!("{} left blank", field);
                return Err(ValidationError::MissingField(field));
            }
        }

        let current_bg = parse_field(Field::CurrentBg, &self.current_bg)?;
        let target_bg = parse_field(Field::TargetBg, &self.target_bg)?;
        let carbs = if self.carbs.trim().is_empty() {
            0.0
        } else {
            parse_field(Field::Carbs, &self.carbs)?
        };
        let (icr, isf) = settings.ratios()?;

        DoseInputs::new(current_bg, target_bg, carbs, icr, isf)
    }

    /// Validate and calculate. Either every component is produced or none is.
    ///
    /// Inputs so large that a component overflows are refused as invalid.
    pub fn calculate(&self, settings: &RatioSettings) -> Result<DoseResult, ValidationError> {
        let inputs = self.validate(settings)?;
        let result = compute_dose(&inputs);

        let finite = [result.meal_dose, result.correction_dose, result.total_dose]
            .iter()
            .all(|dose| dose.is_finite());
        if !finite {
            tracing::debug!("Dose overflowed for {:?}", inputs);
            return Err(ValidationError::InvalidMagnitude);
        }

        Ok(result)
    }
}

/// True for empty text or an unsigned decimal: digits, at most one dot, digits.
pub fn is_numeric_text(text: &str) -> bool {
    let mut seen_dot = false;
    text.chars().all(|c| match c {
        '0'..='9' => true,
        '.' if !seen_dot => {
            seen_dot = true;
            true
        }
        _ => false,
    })
}

/// Parse one field's text into a finite number.
pub(crate) fn parse_field(field: Field, text: &str) -> Result<f64, ValidationError> {
    let trimmed = text.trim();
    let malformed = || ValidationError::Malformed(field, trimmed.to_string());

    if !is_numeric_text(trimmed) {
        tracing::debug!("{} is not numeric text: {:?}", field, trimmed);
        return Err(malformed());
    }

    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(malformed()),
    }
}
