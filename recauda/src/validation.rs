//! Synchronous form validation.
//!
//! Messages are user-facing (Spanish). A form is valid when its
//! [`FieldErrors`] is empty.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Generic message for a missing required value
pub const REQUIRED: &str = "Este campo es requerido";

/// A form field that can carry an error
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Field {
    /// Person's given name
    FirstName,
    /// Person's family name
    LastName,
    /// Phone number
    Phone,
    /// Event name
    EventName,
    /// Price of one raffle number
    NumberPrice,
    /// Numbers on offer
    TotalNumbers,
    /// First selling day
    StartDate,
    /// Last selling day
    EndDate,
    /// Name of the food item at an index
    FoodItemName(usize),
    /// Price of the food item at an index
    FoodItemPrice(usize),
    /// First number of a manual range
    FromNumber,
    /// Last number of a manual range
    ToNumber,
    /// Numbers or portions requested
    Quantity,
    /// Event picked in a selector
    Event,
    /// Organisation behind an account
    Organization,
    /// Account holder's name, as one string
    FullName,
}

/// Why a field was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Value missing, with the field-specific message
    #[error("{0}")]
    Required(&'static str),

    /// Fewer characters than allowed
    #[error("Debe tener al menos {min} caracteres")]
    TooShort {
        /// Minimum length
        min: usize,
    },

    /// Fewer digits than allowed
    #[error("Debe tener al menos {min} dígitos")]
    TooFewDigits {
        /// Minimum digit count
        min: usize,
    },

    /// Value present but unusable
    #[error("{0}")]
    Invalid(&'static str),
}

/// Per-field errors for one form step
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<Field, ValidationError>);

impl FieldErrors {
    /// No errors
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error, replacing any previous one for the field
    pub fn insert(&mut self, field: Field, error: ValidationError) {
        self.0.insert(field, error);
    }

    /// Record the outcome of a check; `Ok` leaves the field untouched
    pub fn check(&mut self, field: Field, result: Result<(), ValidationError>) {
        if let Err(error) = result {
            self.insert(field, error);
        }
    }

    /// Error for a field
    #[must_use]
    pub fn get(&self, field: Field) -> Option<&ValidationError> {
        self.0.get(&field)
    }

    /// Rendered message for a field
    #[must_use]
    pub fn message(&self, field: Field) -> Option<String> {
        self.get(field).map(ToString::to_string)
    }

    /// Drop the error of a field (called when the user edits it)
    pub fn clear(&mut self, field: Field) {
        self.0.remove(&field);
    }

    /// True when the form is valid
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of rejected fields
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Rejected fields in field order
    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.0.keys().copied()
    }
}

/// Thresholds shared by every form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationRules {
    /// Minimum name length, in characters, after trimming
    pub name_min_length: usize,
    /// Minimum phone digit count
    pub phone_min_digits: usize,
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self {
            name_min_length: 2,
            phone_min_digits: 8,
        }
    }
}

/// Reject empty or whitespace-only values.
///
/// # Errors
///
/// [`ValidationError::Required`] with `message` when `value` is blank.
pub fn require(value: &str, message: &'static str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::Required(message))
    } else {
        Ok(())
    }
}

/// Required name of at least `rules.name_min_length` characters.
///
/// # Errors
///
/// Blank values fail with `required`; short ones with [`ValidationError::TooShort`].
pub fn validate_name(
    value: &str,
    rules: &ValidationRules,
    required: &'static str,
) -> Result<(), ValidationError> {
    require(value, required)?;
    if value.trim().chars().count() < rules.name_min_length {
        return Err(ValidationError::TooShort {
            min: rules.name_min_length,
        });
    }
    Ok(())
}

/// Required phone with at least `rules.phone_min_digits` digits once
/// separators are stripped.
///
/// # Errors
///
/// Blank values fail with `required`; short ones with [`ValidationError::TooFewDigits`].
pub fn validate_phone(
    value: &str,
    rules: &ValidationRules,
    required: &'static str,
) -> Result<(), ValidationError> {
    require(value, required)?;
    if digits_only(value).len() < rules.phone_min_digits {
        return Err(ValidationError::TooFewDigits {
            min: rules.phone_min_digits,
        });
    }
    Ok(())
}

/// Keep only ASCII digits
#[must_use]
pub fn digits_only(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}

/// Quantities never go below one
#[must_use]
pub fn clamp_quantity(quantity: u32) -> u32 {
    quantity.max(1)
}

/// Interpret typed quantity input.
///
/// Empty input reads as zero (fixed on blur); anything else that is not a
/// positive integer keeps `current`.
#[must_use]
pub fn parse_quantity_input(input: &str, current: u32) -> u32 {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return 0;
    }
    match trimmed.parse::<u32>() {
        Ok(n) if n >= 1 => n,
        _ => current,
    }
}

/// Parse a non-negative amount typed with either decimal separator
#[must_use]
pub fn parse_amount(input: &str) -> Option<f64> {
    let normalised = input.trim().replace(',', ".");
    normalised
        .parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite() && *amount >= 0.0)
}
