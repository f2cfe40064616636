//! Error types for the bolus_core library.

use std::fmt;
use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for bolus_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// User input rejected before any calculation
    #[error("{}: {}", .0.title(), .0)]
    Validation(#[from] ValidationError),
}

/// Input fields known to the form and the settings store
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
    CurrentBg,
    TargetBg,
    Carbs,
    Icr,
    Isf,
}

impl Field {
    /// Human-facing label for the field
    pub fn label(&self) -> &'static str {
        match self {
            Field::CurrentBg => "Current BG",
            Field::TargetBg => "Target BG",
            Field::Carbs => "Carbs",
            Field::Icr => "ICR",
            Field::Isf => "ISF",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Reasons a dose request or a settings change is refused.
///
/// None of these ever reach the calculator: they are raised by the form and
/// the settings store before any arithmetic happens.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A required field was left blank
    #[error("Please fill in Current BG and Target BG fields to calculate insulin dose. ({0} is empty)")]
    MissingField(Field),

    /// A required-positive value is zero or negative, or carbs is negative
    #[error("Current BG, Target BG, ICR, and ISF must be greater than 0, and Carbs cannot be negative.")]
    InvalidMagnitude,

    /// ICR or ISF has not been stored yet
    #[error("Please configure your ICR and ISF values in settings first.")]
    UnconfiguredRatios,

    /// Text is not an unsigned decimal number
    #[error("{0} must be a number, got {1:?}.")]
    Malformed(Field, String),

    /// Settings save attempted with a blank ratio
    #[error("Please provide both ICR and ISF values.")]
    IncompleteRatios,

    /// Settings save attempted with a zero ratio
    #[error("Values must be greater than 0.")]
    NonPositiveRatio(Field),
}

impl ValidationError {
    /// Short heading shown above the message
    pub fn title(&self) -> &'static str {
        match self {
            ValidationError::MissingField(_) => "Missing Information",
            ValidationError::UnconfiguredRatios => "Settings Required",
            ValidationError::InvalidMagnitude
            | ValidationError::Malformed(..)
            | ValidationError::IncompleteRatios
            | ValidationError::NonPositiveRatio(_) => "Invalid Values",
        }
    }
}
