// Common validation types and traits

use super::error::ApiError;

#[derive(Debug)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<ValidationError>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
        }
    }

    pub fn add_error(&mut self, field: &str, message: &str) {
        self.is_valid = false;
        self.errors.push(ValidationError {
            field: field.to_string(),
            message: message.to_string(),
        });
    }

    pub fn merge(&mut self, other: ValidationResult) {
        self.is_valid &= other.is_valid;
        self.errors.extend(other.errors);
    }

    /// `Ok(())` when valid, otherwise the collected errors as an `ApiError`
    pub fn into_result(self) -> Result<(), ApiError> {
        if self.is_valid {
            Ok(())
        } else {
            Err(self.into())
        }
    }
}

pub trait Validator<T> {
    fn validate(&self, data: &T) -> ValidationResult;
}

/// Checks a list of free-text entries (skills, keywords) for count and length
pub fn validate_string_list(
    result: &mut ValidationResult,
    field: &str,
    items: &[String],
    max_items: usize,
    max_len: usize,
) {
    if items.len() > max_items {
        result.add_error(field, &format!("At most {} entries are allowed", max_items));
    }
    for (index, item) in items.iter().enumerate() {
        if item.trim().is_empty() {
            result.add_error(&format!("{}[{}]", field, index), "Entry cannot be empty");
        } else if item.len() > max_len {
            result.add_error(
                &format!("{}[{}]", field, index),
                &format!("Entry must be at most {} characters", max_len),
            );
        }
    }
}
