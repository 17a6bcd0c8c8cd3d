/// Input validators for request bodies.
/// Every check trims surrounding whitespace (except for passwords), enforces
/// length bounds and rejects control characters.

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::ValidationError;

pub const MIN_USERNAME_LENGTH: usize = 3;
pub const MAX_USERNAME_LENGTH: usize = 50;
pub const MIN_PASSWORD_LENGTH: usize = 8;
pub const MAX_PASSWORD_LENGTH: usize = 50;
pub const MIN_NAME_LENGTH: usize = 3;
pub const MAX_NAME_LENGTH: usize = 50;
pub const MAX_TEXT_LENGTH: usize = 255;

lazy_static! {
    static ref USERNAME_REGEX: Regex = Regex::new(r"^[A-Za-z0-9._-]+$").unwrap();
}

/// Field must be present and non-blank. Returns the trimmed value.
pub fn required(field: &str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyField(field.to_string()));
    }
    Ok(trimmed.to_string())
}

/// Login passwords are checked for presence only; the stored hash decides the rest.
pub fn required_secret(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::EmptyField(field.to_string()));
    }
    Ok(())
}

fn length_between(
    field: &str,
    value: &str,
    min: usize,
    max: usize,
) -> Result<(), ValidationError> {
    let len = value.chars().count();
    if len < min {
        return Err(ValidationError::TooShort(field.to_string(), min));
    }
    if len > max {
        return Err(ValidationError::TooLong(field.to_string(), max));
    }
    Ok(())
}

fn reject_control_characters(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.chars().any(|c| c.is_control()) {
        return Err(ValidationError::InvalidFormat(field.to_string()));
    }
    Ok(())
}

pub fn is_valid_username(username: &str) -> Result<String, ValidationError> {
    let username = required("username", username)?;
    length_between("username", &username, MIN_USERNAME_LENGTH, MAX_USERNAME_LENGTH)?;

    if !USERNAME_REGEX.is_match(&username) {
        return Err(ValidationError::InvalidFormat("username".to_string()));
    }

    Ok(username)
}

/// Passwords are never trimmed.
pub fn is_valid_password(password: &str) -> Result<(), ValidationError> {
    required_secret("password", password)?;
    length_between("password", password, MIN_PASSWORD_LENGTH, MAX_PASSWORD_LENGTH)?;
    reject_control_characters("password", password)
}

/// First and last names.
pub fn is_valid_name(field: &str, name: &str) -> Result<String, ValidationError> {
    let name = required(field, name)?;
    length_between(field, &name, MIN_NAME_LENGTH, MAX_NAME_LENGTH)?;
    reject_control_characters(field, &name)?;
    Ok(name)
}

/// Free text such as book titles and authors.
pub fn is_valid_text(field: &str, value: &str) -> Result<String, ValidationError> {
    let value = required(field, value)?;
    length_between(field, &value, 1, MAX_TEXT_LENGTH)?;
    reject_control_characters(field, &value)?;
    Ok(value)
}
