#![forbid(unsafe_code)]

//! Core domain model and business logic for the Bolus calculator.
//!
//! This crate provides:
//! - Domain types (dose inputs, dose breakdown)
//! - The dose calculation itself
//! - Form validation in front of the calculation
//! - Ratio settings persistence
//! - Dose formatting for display
//! - Configuration and logging setup shared by binaries

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod calculator;
pub mod form;
pub mod settings;
pub mod display;

// Re-export commonly used types
pub use error::{Error, Field, Result, ValidationError};
pub use types::*;
pub use config::Config;
pub use calculator::compute_dose;
pub use form::{is_numeric_text, DoseForm};
pub use settings::RatioSettings;
pub use display::{format_units, to_fixed};
