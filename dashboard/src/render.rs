// dashboard/src/render.rs
//! Plain-text rendering of API responses

use std::fmt::Write;

use crate::client::{Candidate, JdDetails, JobListItem, MatchResult};

fn list_or_dash(items: &[String]) -> String {
    if items.is_empty() {
        "-".to_string()
    } else {
        items.join(", ")
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let mut out: String = text.chars().take(max.saturating_sub(1)).collect();
        out.push('…');
        out
    }
}

pub fn candidate(c: &Candidate) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Candidate {} ({})", c.name, c.id);
    let _ = writeln!(out, "  Email:      {}", c.email.as_deref().unwrap_or("-"));
    let _ = writeln!(out, "  Phone:      {}", c.phone.as_deref().unwrap_or("-"));
    let _ = writeln!(out, "  Experience: {} years", c.experience_years);
    let _ = writeln!(out, "  Skills:     {}", list_or_dash(&c.skills));
    let _ = writeln!(out, "  Education:  {}", list_or_dash(&c.education));
    out
}

pub fn jd_details(d: &JdDetails) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Title:        {}", d.title);
    let _ = writeln!(out, "Required:     {}", list_or_dash(&d.required_skills));
    let _ = writeln!(out, "Nice to have: {}", list_or_dash(&d.nice_to_have_skills));
    if !d.responsibilities.is_empty() {
        let _ = writeln!(out, "Responsibilities:");
        for item in &d.responsibilities {
            let _ = writeln!(out, "  - {}", item);
        }
    }
    out
}

pub fn jobs(jobs: &[JobListItem]) -> String {
    if jobs.is_empty() {
        return "No jobs yet. Add one with `add-job`.\n".to_string();
    }
    let mut out = String::new();
    for job in jobs {
        let _ = writeln!(out, "{:<12} {}", job.id, job.title);
    }
    out
}

/// Score breakdown table, one row per result in the given order
pub fn score_table(results: &[MatchResult]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>3}  {:<24} {:>6} {:>6} {:>5} {:>5} {:>4}  {}",
        "#", "Candidate", "Score", "Sim%", "Req", "Nice", "Fit", "Band"
    );
    for (rank, r) in results.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>3}  {:<24} {:>6.2} {:>6.2} {:>5.2} {:>5.2} {:>4}  {}",
            rank + 1,
            truncate(&r.candidate_name, 24),
            r.score,
            r.similarity_percent,
            r.components.required_coverage,
            r.components.nice_to_have_coverage,
            r.evaluation.fit_score,
            r.fit_band
        );
    }
    out
}

/// Table followed by each candidate's justification
pub fn match_results(results: &[MatchResult]) -> String {
    if results.is_empty() {
        return "No results.\n".to_string();
    }
    let mut out = score_table(results);
    for r in results {
        let _ = writeln!(out, "\n── {} ({}) ──", r.candidate_name, r.created_at);
        out.push_str(r.justification.trim_end());
        out.push('\n');
    }
    out
}

/// Comma separated CLI list, blanks dropped
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{Evaluation, ScoreComponents};

    fn result(name: &str, score: f32) -> MatchResult {
        MatchResult {
            id: "M_1".into(),
            candidate_id: "C_1".into(),
            candidate_name: name.into(),
            job_id: "J_1".into(),
            similarity_percent: 64.5,
            fit_band: "Strong fit".into(),
            score,
            components: ScoreComponents {
                similarity: 0.645,
                required_coverage: 1.0,
                nice_to_have_coverage: 0.5,
                llm_fit: 0.8,
            },
            evaluation: Evaluation { fit_score: 8 },
            justification: "**Fit score:** 8/10\n".into(),
            created_at: "2026-01-01T00:00:00Z".into(),
        }
    }

    #[test]
    fn test_split_list() {
        assert_eq!(split_list(" python, ,SQL ,"), vec!["python", "SQL"]);
        assert!(split_list("").is_empty());
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghij", 5), "abcd…");
    }

    #[test]
    fn test_score_table_rows() {
        let table = score_table(&[result("Jane Doe", 82.5), result("Marco Rossi", 30.0)]);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].contains("Jane Doe"));
        assert!(lines[1].contains("82.50"));
        assert!(lines[1].contains("Strong fit"));
        assert!(lines[2].trim_start().starts_with('2'));
    }

    #[test]
    fn test_match_results_includes_justification() {
        let text = match_results(&[result("Jane Doe", 82.5)]);
        assert!(text.contains("**Fit score:** 8/10"));
        assert_eq!(match_results(&[]), "No results.\n");
    }

    #[test]
    fn test_jobs_empty_hint() {
        assert!(jobs(&[]).contains("add-job"));
        let listed = jobs(&[JobListItem {
            id: "J_1".into(),
            title: "Data Engineer".into(),
        }]);
        assert!(listed.contains("Data Engineer"));
    }
}
