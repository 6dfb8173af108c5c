//! Payload validation for registration and profile updates.
//!
//! Rules are evaluated as an explicit ordered list per payload so the
//! resulting [`FieldError`] sequence is reproducible: fields in declaration
//! order, rules in declaration order within a field. An empty required field
//! reports only the required violation; a non-empty field reports every rule
//! it breaks.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Phone numbers must carry the Indonesian country prefix.
pub const PHONE_PREFIX: &str = "+62";

const FULL_NAME_MIN: usize = 3;
const FULL_NAME_MAX: usize = 60;
const PHONE_MIN: usize = 10;
const PHONE_MAX: usize = 13;
const PASSWORD_MIN: usize = 6;
const PASSWORD_MAX: usize = 64;

const REQUIRED_MESSAGE: &str = "field is required";
const PASSWORD_MIX_MESSAGE: &str =
    "must contain at least 1 capital character, 1 number, and 1 special (non-alphanumeric) character";

/// A single violated rule on a named payload field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct RegisterUser {
    pub full_name: String,
    pub phone_number: String,
    pub password: String,
}

impl RegisterUser {
    #[must_use]
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();

        check_text(&mut errors, "full_name", &self.full_name, FULL_NAME_MIN, FULL_NAME_MAX);
        check_text(&mut errors, "phone_number", &self.phone_number, PHONE_MIN, PHONE_MAX);
        check_prefix(&mut errors, "phone_number", &self.phone_number);
        check_text(&mut errors, "password", &self.password, PASSWORD_MIN, PASSWORD_MAX);

        // The composite rule is reported on top of any length violation, but
        // an absent password only reports "field is required".
        if !self.password.is_empty() && !password_mix_ok(&self.password) {
            errors.push(FieldError::new("password", PASSWORD_MIX_MESSAGE));
        }

        errors
    }
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct UpdateUser {
    pub full_name: Option<String>,
    pub phone_number: Option<String>,
}

impl UpdateUser {
    #[must_use]
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();

        if let Some(full_name) = &self.full_name {
            check_len(&mut errors, "full_name", full_name, FULL_NAME_MIN, FULL_NAME_MAX);
        }
        if let Some(phone_number) = &self.phone_number {
            check_len(&mut errors, "phone_number", phone_number, PHONE_MIN, PHONE_MAX);
            check_prefix(&mut errors, "phone_number", phone_number);
        }

        errors
    }
}

fn check_text(errors: &mut Vec<FieldError>, field: &str, value: &str, min: usize, max: usize) {
    if value.is_empty() {
        errors.push(FieldError::new(field, REQUIRED_MESSAGE));
        return;
    }
    check_len(errors, field, value, min, max);
}

fn check_len(errors: &mut Vec<FieldError>, field: &str, value: &str, min: usize, max: usize) {
    // Lengths are counted in characters, not bytes
    let length = value.chars().count();
    if length < min {
        errors.push(FieldError::new(
            field,
            format!("length is less than minimum allowed length of {min}"),
        ));
    }
    if length > max {
        errors.push(FieldError::new(
            field,
            format!("length is more than maximum allowed length of {max}"),
        ));
    }
}

fn check_prefix(errors: &mut Vec<FieldError>, field: &str, value: &str) {
    if !value.is_empty() && !value.starts_with(PHONE_PREFIX) {
        errors.push(FieldError::new(
            field,
            format!("value should begin with {PHONE_PREFIX}"),
        ));
    }
}

// Single scan setting one flag per character class; all three must end true.
fn password_mix_ok(password: &str) -> bool {
    let mut has_uppercase = false;
    let mut has_digit = false;
    let mut has_symbol = false;

    for c in password.chars() {
        if c.is_numeric() {
            has_digit = true;
        } else if c.is_uppercase() {
            has_uppercase = true;
        } else if c.is_ascii_punctuation() {
            has_symbol = true;
        }
    }

    has_uppercase && has_digit && has_symbol
}
