// src/jobs/validators.rs

use super::models::*;
use crate::common::validation::validate_string_list;
use crate::common::{ValidationResult, Validator};

// ============================================================================
// Job Validators
// ============================================================================

pub const MAX_TITLE_LENGTH: usize = 255;
pub const MAX_JD_TEXT_LENGTH: usize = 50_000;
pub const MAX_SKILLS: usize = 50;
pub const MAX_SKILL_LENGTH: usize = 100;

pub struct JobValidator;

impl Validator<CreateJob> for JobValidator {
    fn validate(&self, data: &CreateJob) -> ValidationResult {
        let mut result = ValidationResult::new();

        // Validate title
        if data.title.trim().is_empty() {
            result.add_error("title", "Job title is required");
        } else if data.title.chars().count() > MAX_TITLE_LENGTH {
            result.add_error(
                "title",
                &format!("Job title must be at most {} characters", MAX_TITLE_LENGTH),
            );
        }

        // Validate description
        if data.jd_text.trim().is_empty() {
            result.add_error("jd_text", "jd_text cannot be empty");
        } else if data.jd_text.chars().count() > MAX_JD_TEXT_LENGTH {
            result.add_error(
                "jd_text",
                &format!("jd_text must be at most {} characters", MAX_JD_TEXT_LENGTH),
            );
        }

        validate_string_list(
            &mut result,
            "required_skills",
            &data.required_skills,
            MAX_SKILLS,
            MAX_SKILL_LENGTH,
        );
        validate_string_list(
            &mut result,
            "nice_to_have_skills",
            &data.nice_to_have_skills,
            MAX_SKILLS,
            MAX_SKILL_LENGTH,
        );

        result
    }
}
