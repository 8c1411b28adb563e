// src/matching/validators.rs

use super::models::MatchQuery;
use super::pipeline::{DEFAULT_TOP_K, MAX_TOP_K};
use crate::candidates::validators::CandidateNameValidator;
use crate::common::{ValidationResult, Validator};

pub struct MatchQueryValidator;

impl Validator<MatchQuery> for MatchQueryValidator {
    fn validate(&self, data: &MatchQuery) -> ValidationResult {
        let mut result = ValidationResult::new();

        let top_k = data.top_k.unwrap_or(DEFAULT_TOP_K);
        if !(1..=MAX_TOP_K).contains(&top_k) {
            result.add_error("top_k", &format!("top_k must be between 1 and {}", MAX_TOP_K));
        }

        result
    }
}

/// Text fields sent alongside the resume in a one-shot match
pub struct SingleMatchFieldsValidator;

pub struct SingleMatchFields<'a> {
    pub jd_text: Option<&'a str>,
    pub candidate_name: Option<&'a str>,
    pub title: Option<&'a str>,
}

impl<'a> Validator<SingleMatchFields<'a>> for SingleMatchFieldsValidator {
    fn validate(&self, data: &SingleMatchFields<'a>) -> ValidationResult {
        let mut result = ValidationResult::new();

        if data.jd_text.is_none() {
            result.add_error("jd_text", "jd_text cannot be empty");
        }
        result.merge(CandidateNameValidator.validate(&data.candidate_name));
        if let Some(title) = data.title {
            if title.chars().count() > 255 {
                result.add_error("title", "Job title must be at most 255 characters");
            }
        }

        result
    }
}
