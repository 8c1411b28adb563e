// src/jobs/extract.rs
//! Heuristic job description parsing: title, skills and responsibilities

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::candidates::extract::extract_skills;

pub const FALLBACK_TITLE: &str = "General Role";
const MAX_ITEMS: usize = 50;
const MAX_ITEM_CHARS: usize = 100;

lazy_static! {
    static ref TITLE_PATTERNS: Vec<Regex> = [
        r"(?i)we[’']?re\s+(?:seeking|hiring|looking\s+for)\s+an?\s+([A-Za-z0-9 /&\-]{2,80})",
        r"(?i)job\s+title\s*[:\-]?\s*([A-Za-z0-9 /&\-]{2,80})",
        r"(?i)position\s*[:\-]\s*([A-Za-z0-9 /&\-]{2,80})",
        r"(?i)about\s+the\s+role\s*[:\-]\s*([A-Za-z0-9 /&\-]{2,80})",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect();
    static ref ROLE_NOUN_REGEX: Regex = Regex::new(
        r"\b((?:[A-Z][A-Za-z]*\s+){0,4}(?:Engineer|Developer|Manager|Analyst|Scientist|Architect|Designer))\b"
    )
    .unwrap();
    static ref SECTION_HEADER_REGEX: Regex = Regex::new(
        r"(?im)(?:^|\n)\s*(requirements|what you['’]ll need|qualifications|skills required|required skills|preferred|nice[- ]?to[- ]?have|good to have|bonus points|bonus|responsibilities|what you['’]ll do|key tasks|duties|your role|what we offer|benefits|about us)\b\s*[:\-]?"
    )
    .unwrap();
    static ref ITEM_SPLIT_REGEX: Regex = Regex::new(r"[,;/\n•]").unwrap();
    static ref SENTENCE_SPLIT_REGEX: Regex = Regex::new(r"[.;\n•]").unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Required,
    NiceToHave,
    Responsibilities,
    Other,
}

fn classify(header: &str) -> Section {
    let header = header.to_lowercase();
    if header.starts_with("requirements")
        || (header.starts_with("what you") && header.ends_with("need"))
        || header.starts_with("qualifications")
        || header.contains("skills")
    {
        Section::Required
    } else if header.starts_with("preferred")
        || header.starts_with("nice")
        || header.starts_with("good to have")
        || header.starts_with("bonus")
    {
        Section::NiceToHave
    } else if header.starts_with("responsibilities")
        || header.starts_with("what you")
        || header.starts_with("key tasks")
        || header.starts_with("duties")
        || header.starts_with("your role")
    {
        Section::Responsibilities
    } else {
        Section::Other
    }
}

/// Structured fields pulled out of a free-text job description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JdDetails {
    pub title: String,
    pub required_skills: Vec<String>,
    pub nice_to_have_skills: Vec<String>,
    pub responsibilities: Vec<String>,
    pub raw_text: String,
}

pub fn extract_jd_details(text: &str) -> JdDetails {
    let text = text.replace('\r', "");
    let sections = split_sections(&text);

    let section_body = |wanted: Section| {
        sections
            .iter()
            .find(|(kind, _)| *kind == wanted)
            .map(|(_, body)| *body)
    };

    let mut required_skills = section_body(Section::Required)
        .map(split_items)
        .unwrap_or_default();
    if required_skills.is_empty() {
        // No requirements section: fall back to known skill names anywhere in the text
        required_skills = extract_skills(&text).skills;
    }

    let nice_to_have_skills = section_body(Section::NiceToHave)
        .map(split_items)
        .unwrap_or_default();

    let responsibilities = section_body(Section::Responsibilities)
        .map(split_sentences)
        .unwrap_or_default();

    JdDetails {
        title: extract_title(&text),
        required_skills,
        nice_to_have_skills,
        responsibilities,
        raw_text: text.trim().to_string(),
    }
}

/// (kind, body) for every recognized header, body running to the next header
fn split_sections(text: &str) -> Vec<(Section, &str)> {
    let headers: Vec<(Section, usize, usize)> = SECTION_HEADER_REGEX
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let name = caps.get(1)?;
            Some((classify(name.as_str()), whole.start(), whole.end()))
        })
        .collect();

    headers
        .iter()
        .enumerate()
        .map(|(i, (kind, _, body_start))| {
            let body_end = headers.get(i + 1).map(|(_, start, _)| *start).unwrap_or(text.len());
            (*kind, &text[*body_start..body_end])
        })
        .collect()
}

fn clean_item(item: &str) -> &str {
    item.trim_matches(|c: char| c.is_whitespace() || "-–:;,.*•".contains(c))
}

fn dedup_push(items: &mut Vec<String>, item: &str) {
    if !items.iter().any(|existing| existing.eq_ignore_ascii_case(item)) {
        items.push(item.to_string());
    }
}

fn split_items(body: &str) -> Vec<String> {
    let mut items = Vec::new();
    for item in ITEM_SPLIT_REGEX.split(body).map(clean_item) {
        if item.chars().count() > 2 && item.chars().count() <= MAX_ITEM_CHARS {
            dedup_push(&mut items, item);
        }
        if items.len() == MAX_ITEMS {
            break;
        }
    }
    items
}

fn split_sentences(body: &str) -> Vec<String> {
    let mut items = Vec::new();
    for sentence in SENTENCE_SPLIT_REGEX.split(body).map(clean_item) {
        if sentence.chars().count() > 5 {
            dedup_push(&mut items, sentence);
        }
        if items.len() == MAX_ITEMS {
            break;
        }
    }
    items
}

fn extract_title(text: &str) -> String {
    for pattern in TITLE_PATTERNS.iter() {
        if let Some(title) = pattern.captures(text).and_then(|caps| caps.get(1)) {
            let title = clean_item(title.as_str());
            if title.chars().count() >= 2 {
                return title.to_string();
            }
        }
    }

    ROLE_NOUN_REGEX
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_else(|| FALLBACK_TITLE.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const JD: &str = "Job Title: Senior Data Engineer\n\
        We build data platforms for retail.\n\
        Responsibilities:\n\
        - Design and run batch pipelines.\n\
        - Collaborate with analytics teams.\n\
        Requirements:\n\
        - Python\n\
        - SQL, Airflow; Spark\n\
        Nice to have:\n\
        - Kafka\n\
        - dbt\n\
        Benefits:\n\
        - Remote first\n";

    #[test]
    fn test_title_from_label() {
        assert_eq!(extract_jd_details(JD).title, "Senior Data Engineer");
    }

    #[test]
    fn test_title_from_role_noun() {
        let details = extract_jd_details("Join us as a Backend Developer working on payments.");
        assert_eq!(details.title, "Backend Developer");
    }

    #[test]
    fn test_title_fallback() {
        assert_eq!(extract_jd_details("help wanted").title, FALLBACK_TITLE);
    }

    #[test]
    fn test_sections() {
        let details = extract_jd_details(JD);
        assert_eq!(details.required_skills, vec!["Python", "SQL", "Airflow", "Spark"]);
        assert_eq!(details.nice_to_have_skills, vec!["Kafka", "dbt"]);
        assert_eq!(
            details.responsibilities,
            vec!["Design and run batch pipelines", "Collaborate with analytics teams"]
        );
        assert!(!details.required_skills.iter().any(|s| s.contains("Remote")));
    }

    #[test]
    fn test_required_skills_fall_back_to_dictionary() {
        let details = extract_jd_details("Looking for someone strong in Docker and Kubernetes.");
        assert_eq!(details.required_skills, vec!["docker", "kubernetes"]);
        assert!(details.nice_to_have_skills.is_empty());
        assert!(details.responsibilities.is_empty());
    }
}
