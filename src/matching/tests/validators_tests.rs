// src/matching/tests/validators_tests.rs

#[cfg(test)]
mod tests {
    use crate::common::Validator;
    use crate::matching::models::MatchQuery;
    use crate::matching::validators::*;

    #[test]
    fn test_top_k_defaults_when_missing() {
        let result = MatchQueryValidator.validate(&MatchQuery { top_k: None });
        assert!(result.is_valid);
    }

    #[test]
    fn test_top_k_bounds() {
        for top_k in [1, 5, 50] {
            let result = MatchQueryValidator.validate(&MatchQuery { top_k: Some(top_k) });
            assert!(result.is_valid, "top_k {} should be accepted", top_k);
        }
        for top_k in [-3, 0, 51] {
            let result = MatchQueryValidator.validate(&MatchQuery { top_k: Some(top_k) });
            assert!(!result.is_valid, "top_k {} should be rejected", top_k);
            assert_eq!(result.errors[0].field, "top_k");
        }
    }

    #[test]
    fn test_single_match_requires_jd_text() {
        let fields = SingleMatchFields {
            jd_text: None,
            candidate_name: Some("Jane"),
            title: None,
        };
        let result = SingleMatchFieldsValidator.validate(&fields);
        assert!(!result.is_valid);
        assert!(result.errors.iter().any(|e| e.field == "jd_text"));
    }

    #[test]
    fn test_single_match_name_and_title_length() {
        let long = "n".repeat(256);
        let fields = SingleMatchFields {
            jd_text: Some("Python developer"),
            candidate_name: Some(&long),
            title: Some(&long),
        };
        let result = SingleMatchFieldsValidator.validate(&fields);
        assert!(result.errors.iter().any(|e| e.field == "candidate_name"));
        assert!(result.errors.iter().any(|e| e.field == "title"));
    }
}
