//! Form-level input validation
//!
//! Metric derivation assumes clean, non-negative numbers. These checks run
//! before a submission and report every problem at once, per field.

use std::fmt;
use std::ops::RangeInclusive;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::models::{RawFinancialInputs, StudentProfile};

/// Accepted student ages
pub const AGE_RANGE: RangeInclusive<u32> = 16..=100;

/// A problem with a single form field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Check every financial field is a finite, non-negative amount
pub fn validate_inputs(inputs: &RawFinancialInputs) -> Vec<FieldError> {
    inputs
        .iter()
        .filter_map(|(field, value)| {
            if !value.is_finite() {
                Some(FieldError::new(field.name(), "must be a number"))
            } else if value < 0.0 {
                Some(FieldError::new(field.name(), "cannot be negative"))
            } else {
                None
            }
        })
        .collect()
}

/// Check the profile's age range and required text fields
pub fn validate_profile(profile: &StudentProfile) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if !AGE_RANGE.contains(&profile.age) {
        errors.push(FieldError::new(
            "age",
            format!(
                "must be between {} and {}",
                AGE_RANGE.start(),
                AGE_RANGE.end()
            ),
        ));
    }

    let required = [
        ("gender", &profile.gender),
        ("year_in_school", &profile.year_in_school),
        ("major", &profile.major),
        ("preferred_payment_method", &profile.preferred_payment_method),
    ];
    for (name, value) in required {
        if value.trim().is_empty() {
            errors.push(FieldError::new(name, "is required"));
        }
    }

    errors
}

/// Validate a full submission, failing with every field error found
pub fn validate_submission(profile: &StudentProfile, inputs: &RawFinancialInputs) -> Result<()> {
    let mut errors = validate_profile(profile);
    errors.extend(validate_inputs(inputs));
    if errors.is_empty() {
        Ok(())
    } else {
        Err(Error::Validation(errors))
    }
}
