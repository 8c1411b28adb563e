// src/candidates/tests/validators_tests.rs

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use crate::candidates::validators::*;
    use crate::common::upload::UploadedFile;
    use crate::common::Validator;

    fn upload(filename: &str, size: usize) -> UploadedFile {
        UploadedFile {
            filename: filename.to_string(),
            bytes: Bytes::from(vec![b'a'; size]),
        }
    }

    #[test]
    fn test_upload_validator_valid_file() {
        let validator = UploadValidator { max_bytes: 1024 };
        let result = validator.validate(&upload("resume.pdf", 512));
        assert!(result.is_valid);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_upload_validator_blank_filename() {
        let validator = UploadValidator { max_bytes: 1024 };
        let result = validator.validate(&upload("   ", 10));
        assert!(!result.is_valid);
        assert!(result.errors.iter().any(|e| e.field == "filename"));
    }

    #[test]
    fn test_upload_validator_long_filename() {
        let validator = UploadValidator { max_bytes: 1024 };
        let name = format!("{}.txt", "a".repeat(MAX_FILENAME_LENGTH));
        let result = validator.validate(&upload(&name, 10));
        assert!(!result.is_valid);
        assert!(result.errors.iter().any(|e| e.field == "filename"));
    }

    #[test]
    fn test_upload_validator_too_large() {
        let validator = UploadValidator { max_bytes: 100 };
        let result = validator.validate(&upload("resume.txt", 101));
        assert!(!result.is_valid);
        assert!(result.errors.iter().any(|e| e.field == "file"));

        // Exactly at the limit is fine
        assert!(validator.validate(&upload("resume.txt", 100)).is_valid);
    }

    #[test]
    fn test_candidate_name_validator() {
        let at_limit = "n".repeat(MAX_CANDIDATE_NAME_LENGTH);
        let too_long = "n".repeat(MAX_CANDIDATE_NAME_LENGTH + 1);

        assert!(CandidateNameValidator.validate(&None).is_valid);
        assert!(CandidateNameValidator.validate(&Some(at_limit.as_str())).is_valid);

        let result = CandidateNameValidator.validate(&Some(too_long.as_str()));
        assert!(!result.is_valid);
        assert_eq!(result.errors[0].field, "candidate_name");
    }
}
