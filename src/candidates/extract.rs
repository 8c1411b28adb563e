// src/candidates/extract.rs
//! Rule-based profile extraction from resume text

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Years above this are treated as a misread (e.g. a date fragment)
const MAX_PLAUSIBLE_YEARS: f64 = 50.0;
const MAX_EDUCATION_LINES: usize = 10;

pub const UNKNOWN_NAME: &str = "Unknown";

const SKILL_DICTIONARY: &[(&str, &[&str])] = &[
    (
        "programming_languages",
        &[
            "python", "java", "javascript", "typescript", "c++", "c#", "ruby", "php", "swift",
            "kotlin", "go", "rust", "scala", "perl", "dart", "objective-c", "sql", "bash",
            "powershell",
        ],
    ),
    (
        "frameworks",
        &[
            "react", "angular", "vue", "django", "flask", "fastapi", "spring", "spring boot",
            "express", "node.js", "next.js", "nuxt.js", "laravel", "symfony", "rails", "asp.net",
            ".net core", "flutter", "react native", "tensorflow", "pytorch", "keras",
            "scikit-learn",
        ],
    ),
    (
        "cloud_devops",
        &[
            "aws", "azure", "gcp", "google cloud", "docker", "kubernetes", "jenkins", "gitlab ci",
            "github actions", "terraform", "ansible", "circleci", "travis ci", "heroku",
            "digitalocean",
        ],
    ),
    (
        "databases",
        &[
            "mysql", "postgresql", "mongodb", "redis", "elasticsearch", "cassandra", "dynamodb",
            "oracle", "sql server", "sqlite", "neo4j", "couchdb", "mariadb",
        ],
    ),
    (
        "tools_technologies",
        &[
            "git", "jira", "confluence", "agile", "scrum", "kanban", "rest api", "graphql",
            "microservices", "ci/cd", "tdd", "machine learning", "deep learning", "nlp",
            "computer vision", "data analysis", "data science", "big data", "hadoop", "spark",
            "tableau", "power bi", "excel", "sap", "salesforce",
        ],
    ),
];

struct SkillPattern {
    category: &'static str,
    skill: &'static str,
    regex: Regex,
}

lazy_static! {
    static ref EMAIL_REGEX: Regex =
        Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").unwrap();
    static ref PHONE_REGEX: Regex = Regex::new(r"\+?\d[\d \-]{8,}\d").unwrap();
    static ref NON_LETTERS: Regex = Regex::new(r"[^A-Za-z\s]").unwrap();
    static ref EXPERIENCE_REGEX: Regex =
        Regex::new(r"(?i)\b(\d{1,2})\s*\+?\s*(?:years?|yrs?)\b").unwrap();
    static ref EDUCATION_REGEX: Regex = Regex::new(
        r"(?i)\b(?:bachelor|master|ph\.?\s?d|doctorate|b\.?\s?tech|m\.?\s?tech|mba|mca|bca|b\.?\s?sc|m\.?\s?sc|diploma)\b"
    )
    .unwrap();
    // Skill names contain '+', '#', '.', '/', so word boundaries are spelled out
    static ref SKILL_PATTERNS: Vec<SkillPattern> = SKILL_DICTIONARY
        .iter()
        .flat_map(|&(category, skills)| {
            skills.iter().map(move |&skill| SkillPattern {
                category,
                skill,
                regex: Regex::new(&format!(
                    r"(?i)(?:^|[^A-Za-z0-9+#.])({}{})(?:$|[^A-Za-z0-9+#])",
                    regex::escape(skill),
                    if skill.ends_with("api") { "s?" } else { "" }
                ))
                .unwrap(),
            })
        })
        .collect();
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillSet {
    /// Deduplicated, dictionary order
    pub skills: Vec<String>,
    pub categorized: BTreeMap<String, Vec<String>>,
}

/// Everything pulled out of a resume besides the raw text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeProfile {
    pub contact: ContactInfo,
    pub skills: SkillSet,
    pub experience_years: f64,
    pub education: Vec<String>,
}

pub fn extract_profile(text: &str) -> ResumeProfile {
    ResumeProfile {
        contact: extract_contact_info(text),
        skills: extract_skills(text),
        experience_years: extract_experience_years(text),
        education: extract_education(text),
    }
}

pub fn extract_contact_info(text: &str) -> ContactInfo {
    let name = text
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(|line| NON_LETTERS.replace_all(line, "").to_string())
        .filter(|candidate| candidate.split_whitespace().count() >= 2)
        .map(|candidate| title_case(&candidate))
        .unwrap_or_else(|| UNKNOWN_NAME.to_string());

    let email = EMAIL_REGEX.find(text).map(|m| m.as_str().to_string());
    let phone = PHONE_REGEX
        .find(text)
        .map(|m| m.as_str().replace(' ', ""));

    ContactInfo { name, email, phone }
}

fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Whole-word, case-insensitive dictionary matches
pub fn extract_skills(text: &str) -> SkillSet {
    let mut set = SkillSet::default();
    for pattern in SKILL_PATTERNS.iter() {
        if pattern.regex.is_match(text) && !set.skills.iter().any(|s| s == pattern.skill) {
            set.skills.push(pattern.skill.to_string());
            set.categorized
                .entry(pattern.category.to_string())
                .or_default()
                .push(pattern.skill.to_string());
        }
    }
    set
}

/// First "N years" mention, 0 when absent or implausible
pub fn extract_experience_years(text: &str) -> f64 {
    EXPERIENCE_REGEX
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .filter(|years| *years < MAX_PLAUSIBLE_YEARS)
        .unwrap_or(0.0)
}

/// Lines that mention a degree
pub fn extract_education(text: &str) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    for line in text.lines().map(str::trim) {
        if EDUCATION_REGEX.is_match(line) && !lines.iter().any(|l| l == line) {
            lines.push(line.to_string());
            if lines.len() == MAX_EDUCATION_LINES {
                break;
            }
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESUME: &str = "jane q. doe\n\
        jane.doe@example.com | +1 415 555 0134\n\
        Senior backend engineer with 7 years of experience.\n\
        Skills: Python, Django, PostgreSQL, Docker, C++, CI/CD, REST API design\n\
        Education\n\
        Bachelor of Science in Computer Science, State University\n\
        MBA, Business School 2019\n";

    #[test]
    fn test_contact_info() {
        let contact = extract_contact_info(RESUME);
        assert_eq!(contact.name, "Jane Q Doe");
        assert_eq!(contact.email.as_deref(), Some("jane.doe@example.com"));
        assert_eq!(contact.phone.as_deref(), Some("+14155550134"));
    }

    #[test]
    fn test_single_word_first_line_is_unknown() {
        let contact = extract_contact_info("Resume\nsomething else");
        assert_eq!(contact.name, UNKNOWN_NAME);
        assert!(contact.email.is_none());
        assert!(contact.phone.is_none());
    }

    #[test]
    fn test_skills_whole_word_and_categorized() {
        let skills = extract_skills(RESUME);
        for expected in ["python", "django", "postgresql", "docker", "c++", "ci/cd", "rest api"] {
            assert!(skills.skills.contains(&expected.to_string()), "missing {}", expected);
        }
        // "go" must not match inside other words
        assert!(!skills.skills.contains(&"go".to_string()));
        assert_eq!(
            skills.categorized.get("databases"),
            Some(&vec!["postgresql".to_string()])
        );
    }

    #[test]
    fn test_rest_api_matches_plural() {
        let skills = extract_skills("5 years Python backend engineer, built REST APIs");
        assert!(skills.skills.contains(&"rest api".to_string()));
        assert!(skills.skills.contains(&"python".to_string()));

        assert!(!extract_skills("restapis").skills.contains(&"rest api".to_string()));
    }

    #[test]
    fn test_skills_are_deduplicated() {
        let skills = extract_skills("python PYTHON Python");
        assert_eq!(skills.skills, vec!["python"]);
    }

    #[test]
    fn test_experience_years() {
        assert_eq!(extract_experience_years(RESUME), 7.0);
        assert_eq!(extract_experience_years("5+ yrs in data"), 5.0);
        assert_eq!(extract_experience_years("no numbers here"), 0.0);
        assert_eq!(extract_experience_years("99 years of wisdom"), 0.0);
    }

    #[test]
    fn test_education_lines() {
        let education = extract_education(RESUME);
        assert_eq!(education.len(), 2);
        assert!(education[0].starts_with("Bachelor of Science"));
        assert!(education[1].starts_with("MBA"));
    }

    #[test]
    fn test_extract_profile_combines_everything() {
        let profile = extract_profile(RESUME);
        assert_eq!(profile.contact.name, "Jane Q Doe");
        assert_eq!(profile.experience_years, 7.0);
        assert!(!profile.skills.skills.is_empty());
        assert_eq!(profile.education.len(), 2);
    }
}
