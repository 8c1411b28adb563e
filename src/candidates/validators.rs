// src/candidates/validators.rs

use crate::common::upload::UploadedFile;
use crate::common::{ValidationResult, Validator};

// ============================================================================
// Upload Validators
// ============================================================================

pub const MAX_FILENAME_LENGTH: usize = 255;

pub struct UploadValidator {
    pub max_bytes: usize,
}

impl Validator<UploadedFile> for UploadValidator {
    fn validate(&self, data: &UploadedFile) -> ValidationResult {
        let mut result = ValidationResult::new();

        if data.filename.trim().is_empty() {
            result.add_error("filename", "File name is required");
        } else if data.filename.len() > MAX_FILENAME_LENGTH {
            result.add_error(
                "filename",
                &format!("File name must be at most {} characters", MAX_FILENAME_LENGTH),
            );
        }

        if data.bytes.len() > self.max_bytes {
            result.add_error(
                "file",
                &format!("File must be at most {} bytes", self.max_bytes),
            );
        }

        result
    }
}

pub const MAX_CANDIDATE_NAME_LENGTH: usize = 255;

/// Optional `candidate_name` override sent with an upload
pub struct CandidateNameValidator;

impl<'a> Validator<Option<&'a str>> for CandidateNameValidator {
    fn validate(&self, data: &Option<&'a str>) -> ValidationResult {
        let mut result = ValidationResult::new();

        if let Some(name) = data {
            if name.chars().count() > MAX_CANDIDATE_NAME_LENGTH {
                result.add_error(
                    "candidate_name",
                    &format!(
                        "Candidate name must be at most {} characters",
                        MAX_CANDIDATE_NAME_LENGTH
                    ),
                );
            }
        }

        result
    }
}
