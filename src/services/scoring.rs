// src/services/scoring.rs
//! Resume/JD similarity and composite ranking score

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub const WEIGHT_SIMILARITY: f32 = 0.45;
pub const WEIGHT_REQUIRED: f32 = 0.35;
pub const WEIGHT_NICE_TO_HAVE: f32 = 0.10;
pub const WEIGHT_LLM: f32 = 0.10;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ScoringError {
    #[error("Embedding dimension mismatch: {left} vs {right}")]
    DimensionMismatch { left: usize, right: usize },

    #[error("Cannot compare empty embeddings")]
    EmptyVector,
}

/// Cosine similarity in [-1, 1]. Zero-norm vectors give 0.0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32, ScoringError> {
    if a.is_empty() || b.is_empty() {
        return Err(ScoringError::EmptyVector);
    }
    if a.len() != b.len() {
        tracing::warn!(
            a_len = a.len(),
            b_len = b.len(),
            "embedding dimension mismatch"
        );
        return Err(ScoringError::DimensionMismatch {
            left: a.len(),
            right: b.len(),
        });
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }

    Ok((dot / (norm_a * norm_b)).clamp(-1.0, 1.0))
}

/// Similarity as a 0-100 percentage, two decimals
pub fn similarity_percent(similarity: f32) -> f32 {
    round_to(similarity.clamp(0.0, 1.0) * 100.0, 2)
}

fn round_to(value: f32, decimals: i32) -> f32 {
    let factor = 10f32.powi(decimals);
    (value * factor).round() / factor
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum FitBand {
    Strong,
    Moderate,
    Weak,
}

impl FitBand {
    pub fn label(&self) -> &'static str {
        match self {
            FitBand::Strong => "Strong fit",
            FitBand::Moderate => "Moderate fit",
            FitBand::Weak => "Weak fit",
        }
    }
}

/// Band for a similarity percentage
pub fn fit_band(percent: f32) -> FitBand {
    if percent >= 60.0 {
        FitBand::Strong
    } else if percent >= 40.0 {
        FitBand::Moderate
    } else {
        FitBand::Weak
    }
}

/// Share of required / nice-to-have skills a candidate lists
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillCoverage {
    pub required: f32,
    pub nice_to_have: f32,
    pub matched_required: Vec<String>,
    pub missing_required: Vec<String>,
}

pub fn skill_coverage(
    candidate_skills: &[String],
    required: &[String],
    nice_to_have: &[String],
) -> SkillCoverage {
    let have: HashSet<String> = candidate_skills
        .iter()
        .map(|s| s.trim().to_lowercase())
        .collect();

    let (matched_required, missing_required): (Vec<String>, Vec<String>) = required
        .iter()
        .cloned()
        .partition(|s| have.contains(&s.trim().to_lowercase()));
    let nice_hits = nice_to_have
        .iter()
        .filter(|s| have.contains(&s.trim().to_lowercase()))
        .count();

    SkillCoverage {
        required: matched_required.len() as f32 / required.len().max(1) as f32,
        nice_to_have: nice_hits as f32 / nice_to_have.len().max(1) as f32,
        matched_required,
        missing_required,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponents {
    pub similarity: f32,
    pub required_coverage: f32,
    pub nice_to_have_coverage: f32,
    pub llm_fit: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeScore {
    /// Weighted score as a 0-100 percentage
    pub score: f32,
    pub components: ScoreComponents,
}

/// Weighted blend of similarity, skill coverage and the LLM fit score (1-10)
pub fn composite_score(
    similarity: f32,
    coverage: &SkillCoverage,
    llm_fit_score: Option<u8>,
) -> CompositeScore {
    let similarity = similarity.clamp(0.0, 1.0);
    let required = coverage.required.clamp(0.0, 1.0);
    let nice = coverage.nice_to_have.clamp(0.0, 1.0);
    let llm = llm_fit_score
        .map(|fit| (fit as f32 / 10.0).clamp(0.0, 1.0))
        .unwrap_or(0.0);

    let score = WEIGHT_SIMILARITY * similarity
        + WEIGHT_REQUIRED * required
        + WEIGHT_NICE_TO_HAVE * nice
        + WEIGHT_LLM * llm;

    CompositeScore {
        score: round_to(score * 100.0, 2),
        components: ScoreComponents {
            similarity: round_to(similarity, 3),
            required_coverage: round_to(required, 3),
            nice_to_have_coverage: round_to(nice, 3),
            llm_fit: round_to(llm, 3),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skills(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_cosine_identical_vectors() {
        let a = vec![0.3, -0.2, 0.9];
        let sim = cosine_similarity(&a, &a).unwrap();
        assert!((sim - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_is_symmetric() {
        let a = vec![1.0, 2.0, 3.0];
        let b = vec![-2.0, 0.5, 1.0];
        assert_eq!(
            cosine_similarity(&a, &b).unwrap(),
            cosine_similarity(&b, &a).unwrap()
        );
    }

    #[test]
    fn test_cosine_opposite_and_orthogonal() {
        let sim = cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]).unwrap();
        assert!((sim + 1.0).abs() < 1e-6);
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).unwrap(), 0.0);
    }

    #[test]
    fn test_cosine_zero_vector() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]).unwrap(), 0.0);
    }

    #[test]
    fn test_cosine_dimension_mismatch() {
        assert_eq!(
            cosine_similarity(&[1.0, 0.0, 0.0], &[1.0, 0.0]),
            Err(ScoringError::DimensionMismatch { left: 3, right: 2 })
        );
        assert_eq!(cosine_similarity(&[], &[]), Err(ScoringError::EmptyVector));
    }

    #[test]
    fn test_similarity_percent() {
        assert_eq!(similarity_percent(0.71234), 71.23);
        assert_eq!(similarity_percent(-0.4), 0.0);
        assert_eq!(similarity_percent(1.2), 100.0);
    }

    #[test]
    fn test_fit_band_thresholds() {
        assert_eq!(fit_band(60.0), FitBand::Strong);
        assert_eq!(fit_band(59.99), FitBand::Moderate);
        assert_eq!(fit_band(40.0), FitBand::Moderate);
        assert_eq!(fit_band(12.0), FitBand::Weak);
    }

    #[test]
    fn test_skill_coverage_is_case_insensitive() {
        let coverage = skill_coverage(
            &skills(&["Python", "docker", "SQL"]),
            &skills(&["python", "sql", "kubernetes", "aws"]),
            &skills(&["Docker"]),
        );
        assert_eq!(coverage.required, 0.5);
        assert_eq!(coverage.nice_to_have, 1.0);
        assert_eq!(coverage.matched_required, skills(&["python", "sql"]));
        assert_eq!(coverage.missing_required, skills(&["kubernetes", "aws"]));
    }

    #[test]
    fn test_skill_coverage_empty_lists() {
        let coverage = skill_coverage(&skills(&["rust"]), &[], &[]);
        assert_eq!(coverage.required, 0.0);
        assert_eq!(coverage.nice_to_have, 0.0);
    }

    #[test]
    fn test_composite_score_weights() {
        let coverage = SkillCoverage {
            required: 1.0,
            nice_to_have: 1.0,
            matched_required: vec![],
            missing_required: vec![],
        };
        let perfect = composite_score(1.0, &coverage, Some(10));
        assert_eq!(perfect.score, 100.0);

        let no_llm = composite_score(1.0, &coverage, None);
        assert_eq!(no_llm.score, 90.0);
        assert_eq!(no_llm.components.llm_fit, 0.0);
    }

    #[test]
    fn test_composite_score_rounds_components() {
        let coverage = skill_coverage(&skills(&["go"]), &skills(&["go", "rust", "c"]), &[]);
        let result = composite_score(0.55555, &coverage, Some(7));
        assert_eq!(result.components.similarity, 0.556);
        assert_eq!(result.components.required_coverage, 0.333);
        assert_eq!(result.components.llm_fit, 0.7);
        // 0.45*0.55555 + 0.35*0.33333 + 0.10*0.7
        assert!((result.score - 43.67).abs() < 0.011, "score {}", result.score);
    }
}
