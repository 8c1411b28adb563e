// src/services/prompts.rs
//! Prompt text for the recruiter-style LLM evaluation

/// Max characters of resume / JD text sent to the model
pub const MAX_PROMPT_CHARS: usize = 12_000;

pub const EVALUATION_SYSTEM_PROMPT: &str = r#"You are an impartial technical recruiter assistant.
Compare a candidate resume against a job description and grade the fit.

Rules:
- Base every statement on facts present in the resume and the job description.
- Write 3 to 5 short, factual summary bullets about the candidate's fit.
- Assign an integer fit_score from 1 to 10 (1 = no fit, 5 = borderline, 8+ = strong fit).
- List 2 to 3 key strengths relevant to the role.
- List 0 to 3 specific concerns (missing skills, seniority gaps, unclear experience). Use an empty list if there are none.
- Give a short reasoning paragraph explaining the score.

Output only a single JSON object with exactly these keys and no other text:
{
  "summary_bullets": ["..."],
  "fit_score": 7,
  "key_strengths": ["..."],
  "concerns": ["..."],
  "reasoning": "..."
}"#;

/// User message carrying the job description and the candidate resume
pub fn evaluation_user_prompt(job_description: &str, candidate_name: &str, resume_text: &str) -> String {
    format!(
        "JOB DESCRIPTION:\n{}\n\nRESUME ({}):\n{}\n\nRespond with the JSON object only.",
        truncate_chars(job_description.trim(), MAX_PROMPT_CHARS),
        candidate_name.trim(),
        truncate_chars(resume_text.trim(), MAX_PROMPT_CHARS),
    )
}

/// Cut text to at most `max_chars` characters on a char boundary
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_chars_respects_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(truncate_chars("", 3), "");
    }

    #[test]
    fn test_user_prompt_is_bounded() {
        let resume = "x".repeat(MAX_PROMPT_CHARS * 2);
        let prompt = evaluation_user_prompt("Rust engineer", "Jane", &resume);
        assert!(prompt.contains("RESUME (Jane):"));
        assert!(prompt.len() < MAX_PROMPT_CHARS + 200);
    }

    #[test]
    fn test_system_prompt_names_every_field() {
        for key in ["summary_bullets", "fit_score", "key_strengths", "concerns", "reasoning"] {
            assert!(EVALUATION_SYSTEM_PROMPT.contains(key), "missing {}", key);
        }
    }
}
